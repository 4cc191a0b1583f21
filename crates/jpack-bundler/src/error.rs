/// Error types for the bundler

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BundleError>;

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot resolve '{target}' required from {from}")]
    FileNotFound { target: String, from: PathBuf },

    #[error("Circular dependency detected: {0}")]
    CircularDependency(String),

    #[error("Template needs to be defined before <script> in {0}")]
    MissingTemplate(PathBuf),

    #[error("Scoped styles are not supported (in {0})")]
    ScopedStyle(PathBuf),

    #[error("Unterminated <{tag}> block in {file}")]
    UnterminatedRegion { file: PathBuf, tag: &'static str },

    #[error("Template compiler failed for {file}: {message}")]
    TemplateCompiler { file: PathBuf, message: String },

    #[error("Failed to write {path}: {message}")]
    Output { path: PathBuf, message: String },

    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

impl BundleError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BundleError::Read {
            path: path.into(),
            source,
        }
    }

    pub fn not_found(target: impl Into<String>, from: impl Into<PathBuf>) -> Self {
        BundleError::FileNotFound {
            target: target.into(),
            from: from.into(),
        }
    }

    pub fn template_compiler(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        BundleError::TemplateCompiler {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn output(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        BundleError::Output {
            path: path.into(),
            message: message.into(),
        }
    }
}
