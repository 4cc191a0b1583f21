/// Stylesheet accumulation for component `<style>` blocks

use std::path::{Path, PathBuf};
use tracing::debug;

/// One `<style>` block lifted out of a component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleBlock {
    /// Component the block came from
    pub component: PathBuf,
    /// Raw CSS, every line with its newline
    pub css: String,
}

/// Append-only buffer of style blocks in first-visited order
#[derive(Debug, Default)]
pub struct StyleCollector {
    blocks: Vec<StyleBlock>,
}

impl StyleCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, component: &Path, css: String) {
        debug!(component = %component.display(), bytes = css.len(), "collected style block");
        self.blocks.push(StyleBlock {
            component: component.to_path_buf(),
            css,
        });
    }

    pub fn blocks(&self) -> &[StyleBlock] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// All collected CSS concatenated in traversal order
    pub fn render(&self) -> String {
        self.blocks.iter().map(|b| b.css.as_str()).collect()
    }
}
