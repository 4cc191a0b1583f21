/// Bundler driver that orchestrates resolution, serialization and output

use std::collections::HashSet;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;
use crate::bundle::BundleWriter;
use crate::error::{BundleError, Result};
use crate::module::{GraphBuilder, ModuleId};
use crate::resolver::{PathResolver, DEFAULT_EXTENSIONS};
use crate::template::{CommandCompiler, TemplateCompiler};
use crate::vendor;

/// Command used to compile templates when none is configured
pub const DEFAULT_TEMPLATE_COMMAND: &str = "node template-compiler.js";

/// Result of a successful build, held entirely in memory
#[derive(Debug, Clone)]
pub struct BundleOutput {
    /// Id of the entry module
    pub entry: ModuleId,
    /// Number of modules in the bundle
    pub module_count: usize,
    /// Complete bundle text, loader prefix included
    pub javascript: String,
    /// Concatenated component styles
    pub css: String,
}

/// Options for a build
#[derive(Debug, Clone)]
pub struct BundleOptions {
    /// Root source file or directory
    pub root: PathBuf,
    /// Bundle file to write
    pub output: PathBuf,
    /// Directories whose entries name vendor libraries
    pub vendor_dirs: Vec<PathBuf>,
    /// Vendor names given directly, in addition to `vendor_dirs`
    pub vendor_names: HashSet<String>,
    /// Compile component templates into render functions
    pub compile_templates: bool,
    /// Command line of the external template compiler
    pub template_command: String,
    /// Where to write collected component styles (optional)
    pub css_output: Option<PathBuf>,
    /// Extensions tried for targets that do not exist as written
    pub extensions: Vec<String>,
}

impl BundleOptions {
    pub fn new(root: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            output: output.into(),
            vendor_dirs: vendor::default_vendor_dirs(),
            vendor_names: HashSet::new(),
            compile_templates: false,
            template_command: DEFAULT_TEMPLATE_COMMAND.to_string(),
            css_output: None,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    pub fn vendor_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.vendor_dirs = dirs;
        self
    }

    pub fn vendor_name(mut self, name: impl Into<String>) -> Self {
        self.vendor_names.insert(name.into());
        self
    }

    pub fn compile_templates(mut self, compile: bool) -> Self {
        self.compile_templates = compile;
        self
    }

    pub fn template_command(mut self, command: impl Into<String>) -> Self {
        self.template_command = command.into();
        self
    }

    pub fn css_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.css_output = Some(path.into());
        self
    }

    pub fn extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }
}

/// The bundler
pub struct Bundler {
    options: BundleOptions,
}

impl Bundler {
    pub fn new(options: BundleOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BundleOptions {
        &self.options
    }

    /// Build the bundle in memory, using the configured template compiler
    pub fn bundle(&self) -> Result<BundleOutput> {
        if !self.options.compile_templates {
            return self.build(None);
        }

        let compiler = CommandCompiler::from_command_line(&self.options.template_command)
            .ok_or_else(|| BundleError::template_compiler(&self.options.root, "empty template compiler command"))?;
        self.bundle_with(&compiler)
    }

    /// Build the bundle in memory with a caller-supplied template compiler
    pub fn bundle_with(&self, compiler: &dyn TemplateCompiler) -> Result<BundleOutput> {
        self.build(Some(compiler))
    }

    /// Build and then write the outputs; nothing is written if the build fails
    pub fn run(&self) -> Result<BundleOutput> {
        let output = self.bundle()?;
        self.write(&output)?;
        Ok(output)
    }

    /// Write a finished build to the configured paths
    ///
    /// Each file is replaced by a single rename, but the two renames are not
    /// atomic together. The stylesheet goes first so a failure there leaves
    /// the previous bundle in place.
    pub fn write(&self, output: &BundleOutput) -> Result<()> {
        let bundle = stage(&self.options.output, &output.javascript)?;
        if let Some(path) = &self.options.css_output {
            persist(stage(path, &output.css)?, path)?;
        }
        persist(bundle, &self.options.output)?;

        info!(
            output = %self.options.output.display(),
            bytes = output.javascript.len(),
            "wrote bundle"
        );
        Ok(())
    }

    fn build(&self, compiler: Option<&dyn TemplateCompiler>) -> Result<BundleOutput> {
        let mut vendor = vendor::vendor_names(&self.options.vendor_dirs)?;
        vendor.extend(self.options.vendor_names.iter().cloned());

        let resolver = PathResolver::new(vendor).with_extensions(self.options.extensions.clone());
        let mut builder = GraphBuilder::new(resolver);
        if let Some(compiler) = compiler {
            builder = builder.template_compiler(compiler);
        }

        let graph = builder.build(&self.options.root)?;
        let javascript = BundleWriter::new().write_graph(&graph)?;

        Ok(BundleOutput {
            entry: graph.entry(),
            module_count: graph.len(),
            javascript,
            css: graph.styles().render(),
        })
    }
}

/// Write `contents` to a temporary file next to `path`
fn stage(path: &Path, contents: &str) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|e| BundleError::output(path, e.to_string()))?;
    file.write_all(contents.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|e| BundleError::output(path, e.to_string()))?;
    Ok(file)
}

/// Move a staged file over its destination
fn persist(file: NamedTempFile, path: &Path) -> Result<()> {
    file.persist(path)
        .map(|_| ())
        .map_err(|e| BundleError::output(path, e.error.to_string()))
}
