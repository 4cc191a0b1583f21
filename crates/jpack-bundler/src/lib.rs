/// jpack bundler
///
/// Walks a tree of script files linked by `require(...)` calls and packs
/// them, together with decomposed single-file components, into one bundle
/// driven by a CommonJS-style runtime loader.

pub mod driver;
pub mod error;
pub mod bundle;
pub mod runtime;
pub mod module;
pub mod resolver;
pub mod scanner;
pub mod component;
pub mod styles;
pub mod template;
pub mod vendor;

pub use driver::{Bundler, BundleOptions, BundleOutput};
pub use error::{BundleError, Result};
pub use bundle::BundleWriter;
pub use module::{GraphBuilder, Module, ModuleGraph, ModuleId};
pub use resolver::{PathResolver, Resolution};
pub use styles::StyleCollector;
pub use template::{CommandCompiler, CompiledTemplate, TemplateCompiler, TemplateError};
