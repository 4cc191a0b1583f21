/// Single-file component decomposition
///
/// A component file holds up to three kinds of top-level regions, each
/// opened and closed by a tag on a line of its own:
///
/// ```text
/// <template>
///   <div>{{ message }}</div>
/// </template>
/// <script>
/// module.exports = {
///   data: function() { return { message: 'hi' }; }
/// };
/// </script>
/// <style>
/// div { color: red; }
/// </style>
/// ```
///
/// Style blocks go to the [`StyleCollector`], the template is captured for
/// the graph builder, and only script lines are kept for dependency
/// scanning. The template must come before the script's export statement,
/// which is where its render functions (or a reference to it) get spliced.

use std::path::Path;
use tracing::debug;
use crate::error::{BundleError, Result};
use crate::scanner;
use crate::styles::StyleCollector;

/// File suffix marking a single-file component
pub const COMPONENT_SUFFIX: &str = ".vue";

/// Suffix of the synthetic module holding an uncompiled template
pub const TEMPLATE_SUFFIX: &str = ".template";

const EXPORT_MARKER: &str = "module.exports";

pub fn is_component(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().ends_with(COMPONENT_SUFFIX))
}

/// One line of a component's script region
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptLine {
    /// Script source, with its newline
    Source(String),
    /// Where the template must be spliced, right after the export line
    TemplateSlot,
}

/// A component split into the parts the graph builder needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Template markup, without the outer `<template>` tags
    pub template: Option<String>,
    pub script: Vec<ScriptLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Outside,
    Script,
}

/// Split a component file, sending its style blocks to `styles`
pub fn decompose(path: &Path, text: &str, styles: &mut StyleCollector) -> Result<Component> {
    let mut lines = text.split_inclusive('\n');
    let mut template: Option<String> = None;
    let mut script = Vec::new();
    let mut region = Region::Outside;
    let mut slotted = false;

    while let Some(line) = lines.next() {
        let trimmed = line.trim();

        if trimmed.starts_with("<style") {
            if trimmed.contains("scoped") {
                return Err(BundleError::ScopedStyle(path.to_path_buf()));
            }
            let css = read_style(path, &mut lines)?;
            styles.push(path, css);
            continue;
        }

        if trimmed.starts_with("<template") {
            template = Some(read_template(path, &mut lines)?);
            continue;
        }

        if trimmed.starts_with("<script") {
            region = Region::Script;
            continue;
        }

        if trimmed == "</script>" {
            region = Region::Outside;
            continue;
        }

        if region != Region::Script {
            continue;
        }

        script.push(ScriptLine::Source(line.to_string()));

        if !slotted && opens_export_object(trimmed) {
            if template.is_none() {
                return Err(BundleError::MissingTemplate(path.to_path_buf()));
            }
            script.push(ScriptLine::TemplateSlot);
            slotted = true;
        }
    }

    debug!(
        component = %path.display(),
        has_template = template.is_some(),
        script_lines = script.len(),
        "decomposed component"
    );

    Ok(Component { template, script })
}

/// Whether a script line starts the component's exported options object,
/// e.g. `module.exports = {`
fn opens_export_object(trimmed: &str) -> bool {
    trimmed.starts_with(EXPORT_MARKER) && trimmed.ends_with('{') && !scanner::contains_require(trimmed)
}

fn read_style<'a>(path: &Path, lines: &mut impl Iterator<Item = &'a str>) -> Result<String> {
    let mut css = String::new();
    for line in lines {
        if line.trim() == "</style>" {
            return Ok(css);
        }
        css.push_str(line);
        if !line.ends_with('\n') {
            css.push('\n');
        }
    }
    Err(BundleError::UnterminatedRegion {
        file: path.to_path_buf(),
        tag: "style",
    })
}

fn read_template<'a>(path: &Path, lines: &mut impl Iterator<Item = &'a str>) -> Result<String> {
    let mut markup = String::new();
    let mut depth = 1usize;
    for line in lines {
        if line.trim() == "</template>" && depth == 1 {
            return Ok(markup);
        }

        // Nested tags may open and close on the same line
        let opens = line.matches("<template").count();
        let closes = line.matches("</template>").count();
        depth = (depth + opens).saturating_sub(closes).max(1);

        markup.push_str(line);
        if !line.ends_with('\n') {
            markup.push('\n');
        }
    }
    Err(BundleError::UnterminatedRegion {
        file: path.to_path_buf(),
        tag: "template",
    })
}
