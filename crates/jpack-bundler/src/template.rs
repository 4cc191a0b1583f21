/// Template compilation bridge
///
/// Component templates can either ship as markup strings or be compiled into
/// render functions by an external compiler. The compiler is a capability
/// behind the [`TemplateCompiler`] trait so the graph builder never depends
/// on a particular implementation.

use std::io::Write as _;
use std::process::{Command, Stdio};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Output of a template compiler: function bodies, not whole functions
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompiledTemplate {
    pub render: String,
    #[serde(rename = "staticRenderFns", default)]
    pub static_render_fns: Vec<String>,
}

impl CompiledTemplate {
    /// Component option text spliced in front of the component's export body
    pub fn to_component_options(&self) -> String {
        let mut out = format!("render: function() {{{}}}", self.render);
        if !self.static_render_fns.is_empty() {
            out.push_str(",staticRenderFns: [");
            for body in &self.static_render_fns {
                out.push_str("function() {");
                out.push_str(body);
                out.push_str("},");
            }
            out.push(']');
        }
        out
    }
}

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}: {stderr}")]
    Exit {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("unreadable compiler output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("{0}")]
    Rejected(String),
}

/// Turns template markup into render function bodies
pub trait TemplateCompiler {
    fn compile(&self, markup: &str) -> Result<CompiledTemplate, TemplateError>;
}

/// Runs an external program per template
///
/// The markup is written to the program's stdin; the program must print a
/// JSON object `{"render": "...", "staticRenderFns": ["..."]}` on stdout.
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    program: String,
    args: Vec<String>,
}

impl CommandCompiler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Build from a whitespace-separated command line such as
    /// `node template-compiler.js`
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let program = words.next()?;
        Some(words.fold(Self::new(program), |compiler, word| compiler.arg(word)))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl TemplateCompiler for CommandCompiler {
    fn compile(&self, markup: &str) -> Result<CompiledTemplate, TemplateError> {
        debug!(program = %self.program, bytes = markup.len(), "compiling template");

        let spawn_error = |source| TemplateError::Spawn {
            program: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(markup.as_bytes()).map_err(spawn_error)?;
        }

        let output = child.wait_with_output().map_err(spawn_error)?;
        if !output.status.success() {
            return Err(TemplateError::Exit {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

/// Module text exporting `text` as a string literal
pub fn string_module(text: &str) -> String {
    format!("module.exports = \"{}\";\n", escape_string(text))
}

/// Escape text for a double-quoted script string literal
pub fn escape_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_module_escapes() {
        assert_eq!(
            string_module("<a href=\"x\">\\</a>\n"),
            "module.exports = \"<a href=\\\"x\\\">\\\\</a>\\n\";\n"
        );
    }

    #[test]
    fn test_component_options_without_statics() {
        let compiled = CompiledTemplate {
            render: "with(this){return _c('div')}".to_string(),
            static_render_fns: vec![],
        };
        assert_eq!(
            compiled.to_component_options(),
            "render: function() {with(this){return _c('div')}}"
        );
    }

    #[test]
    fn test_component_options_with_statics() {
        let compiled = CompiledTemplate {
            render: "r()".to_string(),
            static_render_fns: vec!["s0()".to_string(), "s1()".to_string()],
        };
        assert_eq!(
            compiled.to_component_options(),
            "render: function() {r()},staticRenderFns: [function() {s0()},function() {s1()},]"
        );
    }

    #[test]
    fn test_compiler_output_parses() {
        let parsed: CompiledTemplate =
            serde_json::from_str(r#"{"render":"r()","staticRenderFns":["s()"]}"#).unwrap();
        assert_eq!(parsed.static_render_fns, vec!["s()".to_string()]);

        let parsed: CompiledTemplate = serde_json::from_str(r#"{"render":"r()"}"#).unwrap();
        assert!(parsed.static_render_fns.is_empty());
    }

    #[test]
    fn test_command_line_split() {
        let compiler = CommandCompiler::from_command_line("node  template-compiler.js").unwrap();
        assert_eq!(compiler.program(), "node");
        assert_eq!(compiler.args, vec!["template-compiler.js".to_string()]);
        assert!(CommandCompiler::from_command_line("   ").is_none());
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let compiler = CommandCompiler::new("jpack-no-such-template-compiler");
        let err = compiler.compile("<div></div>").unwrap_err();
        assert!(matches!(err, TemplateError::Spawn { .. }));
    }
}
