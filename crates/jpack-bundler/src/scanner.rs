/// Line scanner for `require("...")` calls
///
/// This is a textual recognizer, not a parser: only a call whose argument is
/// a single quoted literal of path-safe characters counts as a dependency.
/// `require(name)` with a variable, or anything on a `//` comment line, is
/// plain text. Scanning never rewrites the source; concatenating the text of
/// every segment reproduces the input exactly.

use std::sync::LazyLock;
use regex::Regex;

static REQUIRE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"require\(["']([./A-Za-z0-9_-]+)["']\);?"#).expect("require pattern is valid")
});

/// A piece of scanned source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied through untouched
    Text(String),
    /// A recognized require call
    Require {
        /// The quoted target, e.g. `./foo`
        target: String,
        /// The full matched call text, e.g. `require("./foo");`
        call: String,
    },
}

impl Segment {
    /// Source text this segment stands for
    pub fn text(&self) -> &str {
        match self {
            Segment::Text(text) => text,
            Segment::Require { call, .. } => call,
        }
    }
}

/// Whether a line is a line comment and must not be scanned
pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with("//")
}

/// Whether `text` holds at least one recognizable require call
pub fn contains_require(text: &str) -> bool {
    REQUIRE_PATTERN.is_match(text)
}

/// Scan a whole text, one line at a time
pub fn scan(text: &str) -> Vec<Segment> {
    let mut scanner = Scanner::new();
    for line in text.split_inclusive('\n') {
        scanner.push_line(line);
    }
    scanner.finish()
}

/// Incremental scanner fed one line at a time
///
/// Consecutive plain text is merged into a single `Text` segment.
#[derive(Debug, Default)]
pub struct Scanner {
    segments: Vec<Segment>,
    current: String,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan one line, including its trailing newline if it has one
    pub fn push_line(&mut self, line: &str) {
        if is_comment(line) {
            self.current.push_str(line);
            return;
        }

        // A line may hold several calls (minified sources), so keep
        // matching against the remainder after each one.
        let mut rest = line;
        while let Some(found) = REQUIRE_PATTERN.captures(rest) {
            let whole = found.get(0).expect("group 0 always participates");
            self.current.push_str(&rest[..whole.start()]);
            self.flush();
            self.segments.push(Segment::Require {
                target: found[1].to_string(),
                call: whole.as_str().to_string(),
            });
            rest = &rest[whole.end()..];
        }
        self.current.push_str(rest);
    }

    /// Append text that must not be scanned
    pub fn push_verbatim(&mut self, text: &str) {
        self.current.push_str(text);
    }

    /// Close the scan and return the segments in source order
    pub fn finish(mut self) -> Vec<Segment> {
        self.flush();
        self.segments
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.segments.push(Segment::Text(std::mem::take(&mut self.current)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requires(segments: &[Segment]) -> Vec<&str> {
        segments
            .iter()
            .filter_map(|s| match s {
                Segment::Require { target, .. } => Some(target.as_str()),
                Segment::Text(_) => None,
            })
            .collect()
    }

    fn rejoin(segments: &[Segment]) -> String {
        segments.iter().map(Segment::text).collect()
    }

    #[test]
    fn test_text_without_requires_is_one_segment() {
        let source = "var x = 1;\nmodule.exports = x;";
        let segments = scan(source);
        assert_eq!(segments, vec![Segment::Text(source.to_string())]);
    }

    #[test]
    fn test_single_require() {
        let source = "var b = require(\"./b\");\nb();\n";
        let segments = scan(source);

        assert_eq!(
            segments,
            vec![
                Segment::Text("var b = ".to_string()),
                Segment::Require {
                    target: "./b".to_string(),
                    call: "require(\"./b\");".to_string(),
                },
                Segment::Text("\nb();\n".to_string()),
            ]
        );
    }

    #[test]
    fn test_many_requires_on_one_line() {
        let source = "var a=require('./a'),b=require('../lib/b-c_d.js');c(require(\"x\"))";
        let segments = scan(source);

        assert_eq!(requires(&segments), vec!["./a", "../lib/b-c_d.js", "x"]);
        assert_eq!(rejoin(&segments), source);
    }

    #[test]
    fn test_dynamic_require_is_text() {
        let source = "var m = require(name);\nvar n = require('./a' + suffix);\n";
        let segments = scan(source);
        assert!(requires(&segments).is_empty());
        assert_eq!(rejoin(&segments), source);
    }

    #[test]
    fn test_comment_lines_are_skipped() {
        let source = "// var a = require('./a');\n  // require('./b')\nvar c = require('./c');\n";
        let segments = scan(source);
        assert_eq!(requires(&segments), vec!["./c"]);
        assert_eq!(rejoin(&segments), source);
    }

    #[test]
    fn test_contains_require() {
        assert!(contains_require("module.exports = require('./b');"));
        assert!(!contains_require("module.exports = require(b);"));
    }

    #[test]
    fn test_crlf_is_preserved() {
        let source = "var a = require('./a');\r\nvar b = 2;\r\n";
        assert_eq!(rejoin(&scan(source)), source);
    }
}
