/// Module graph construction
///
/// This module handles:
/// - Reading each reachable file exactly once, keyed by its normalized path
/// - Recursing into require targets depth-first, in source order
/// - Assigning numeric ids in completion order, starting at 1
/// - Detecting circular dependencies
/// - Decomposing components and collecting their styles

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use crate::component::{self, ScriptLine, TEMPLATE_SUFFIX};
use crate::error::{BundleError, Result};
use crate::resolver::{normalize, parent_dir, PathResolver, Resolution};
use crate::scanner::{self, Scanner, Segment};
use crate::styles::StyleCollector;
use crate::template::{string_module, TemplateCompiler};

/// Numeric module identity understood by the runtime loader
///
/// The loader treats a falsy id as "no entry", so ids start at 1.
pub type ModuleId = u32;

const FIRST_ID: ModuleId = 1;

/// Text preceding a require whose target is a template file to compile inline
const TEMPLATE_OPTION: &str = "template: ";

/// A resolved file (or synthetic template) in the bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub id: ModuleId,
    /// Normalized path, also the memoization key
    pub path: PathBuf,
    /// Module body placed inside the loader's function wrapper
    pub text: String,
    /// Literal require target -> id of the module it resolved to
    pub dependencies: BTreeMap<String, ModuleId>,
}

/// Every module reachable from a root, in id order
#[derive(Debug)]
pub struct ModuleGraph {
    modules: Vec<Module>,
    entry: ModuleId,
    styles: StyleCollector,
}

impl ModuleGraph {
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn entry(&self) -> ModuleId {
        self.entry
    }

    pub fn get(&self, id: ModuleId) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }

    pub fn entry_module(&self) -> Option<&Module> {
        self.get(self.entry)
    }

    pub fn styles(&self) -> &StyleCollector {
        &self.styles
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Single traversal context owning the id counter and the style buffer
pub struct GraphBuilder<'a> {
    resolver: PathResolver,
    compiler: Option<&'a dyn TemplateCompiler>,
    next_id: ModuleId,
    modules: Vec<Module>,
    /// Completed modules by path, as indices into `modules`
    completed: HashMap<PathBuf, usize>,
    /// Files currently being resolved, outermost first
    in_progress: Vec<PathBuf>,
    styles: StyleCollector,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(resolver: PathResolver) -> Self {
        Self {
            resolver,
            compiler: None,
            next_id: FIRST_ID,
            modules: Vec::new(),
            completed: HashMap::new(),
            in_progress: Vec::new(),
            styles: StyleCollector::new(),
        }
    }

    /// Compile component templates into render functions instead of
    /// shipping them as markup strings
    pub fn template_compiler(mut self, compiler: &'a dyn TemplateCompiler) -> Self {
        self.compiler = Some(compiler);
        self
    }

    /// Resolve everything reachable from `root`
    pub fn build(mut self, root: impl AsRef<Path>) -> Result<ModuleGraph> {
        let root = self.resolver.resolve_root(root.as_ref())?;
        info!(root = %root.display(), "resolving module graph");

        let entry = self.visit(root)?;

        info!(modules = self.modules.len(), entry, "module graph resolved");
        Ok(ModuleGraph {
            modules: self.modules,
            entry,
            styles: self.styles,
        })
    }

    fn visit(&mut self, path: PathBuf) -> Result<ModuleId> {
        if let Some(&idx) = self.completed.get(&path) {
            debug!(path = %path.display(), id = self.modules[idx].id, "reusing resolved module");
            return Ok(self.modules[idx].id);
        }

        if let Some(pos) = self.in_progress.iter().position(|p| *p == path) {
            let chain = self.in_progress[pos..]
                .iter()
                .chain(std::iter::once(&path))
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(BundleError::CircularDependency(chain));
        }

        debug!(path = %path.display(), "resolving module");
        let source = std::fs::read_to_string(&path).map_err(|e| BundleError::read(&path, e))?;

        self.in_progress.push(path.clone());
        let linked = self.link_file(&path, &source);
        self.in_progress.pop();
        let (text, dependencies) = linked?;

        Ok(self.complete(path, text, dependencies))
    }

    fn link_file(&mut self, path: &Path, source: &str) -> Result<(String, BTreeMap<String, ModuleId>)> {
        if is_html(path) {
            return Ok((string_module(source), BTreeMap::new()));
        }

        let segments = if component::is_component(path) {
            self.scan_component(path, source)?
        } else {
            scanner::scan(source)
        };

        self.link(path, segments)
    }

    /// Decompose a component and scan its script, splicing in the template
    fn scan_component(&mut self, path: &Path, source: &str) -> Result<Vec<Segment>> {
        let component = component::decompose(path, source, &mut self.styles)?;
        let mut scanner = Scanner::new();

        for line in component.script {
            match line {
                ScriptLine::Source(line) => scanner.push_line(&line),
                ScriptLine::TemplateSlot => {
                    // decompose() only emits a slot after capturing a template
                    let markup = component
                        .template
                        .as_deref()
                        .ok_or_else(|| BundleError::MissingTemplate(path.to_path_buf()))?;

                    match self.compiler {
                        Some(compiler) => {
                            let compiled = compiler
                                .compile(markup)
                                .map_err(|e| BundleError::template_compiler(path, e.to_string()))?;
                            scanner.push_verbatim(&compiled.to_component_options());
                            scanner.push_verbatim(",");
                        }
                        None => {
                            let name = self.add_template_module(path, markup);
                            scanner.push_line(&format!("{TEMPLATE_OPTION}require('{name}'),"));
                        }
                    }
                }
            }
        }

        Ok(scanner.finish())
    }

    /// Register `<component>.template` as a sibling module exporting the markup
    fn add_template_module(&mut self, component: &Path, markup: &str) -> String {
        let name = format!(
            "{}{}",
            component.file_name().unwrap_or_default().to_string_lossy(),
            TEMPLATE_SUFFIX
        );
        let path = normalize(&parent_dir(component).join(&name));
        self.complete(path, string_module(markup), BTreeMap::new());
        name
    }

    /// Resolve the require segments of one file, recursing depth-first
    fn link(&mut self, path: &Path, segments: Vec<Segment>) -> Result<(String, BTreeMap<String, ModuleId>)> {
        let mut text = String::new();
        let mut dependencies = BTreeMap::new();

        for segment in segments {
            let (target, call) = match segment {
                Segment::Text(t) => {
                    text.push_str(&t);
                    continue;
                }
                Segment::Require { target, call } => (target, call),
            };

            if self.compiler.is_some() && text.ends_with(TEMPLATE_OPTION) {
                text.truncate(text.len() - TEMPLATE_OPTION.len());
                text.push_str(&self.compile_template_file(path, &target)?);
                continue;
            }

            // Synthetic modules only exist in the table, never on disk
            let sibling = normalize(&parent_dir(path).join(&target));
            let resolution = if self.completed.contains_key(&sibling) {
                Resolution::File(sibling)
            } else {
                self.resolver.resolve(path, &target)?
            };

            if let Resolution::File(dep_path) = resolution {
                let id = self.visit(dep_path)?;
                dependencies.insert(target, id);
            }
            text.push_str(&call);
        }

        Ok((text, dependencies))
    }

    /// Compile an external template file named by `template: require(...)`
    fn compile_template_file(&self, from: &Path, target: &str) -> Result<String> {
        let file = normalize(&parent_dir(from).join(target));
        let markup = std::fs::read_to_string(&file).map_err(|e| BundleError::read(&file, e))?;

        let compiler = self
            .compiler
            .ok_or_else(|| BundleError::template_compiler(&file, "template compilation is disabled"))?;
        let compiled = compiler
            .compile(&markup)
            .map_err(|e| BundleError::template_compiler(&file, e.to_string()))?;

        debug!(template = %file.display(), from = %from.display(), "inlined compiled template");
        Ok(compiled.to_component_options())
    }

    fn complete(&mut self, path: PathBuf, text: String, dependencies: BTreeMap<String, ModuleId>) -> ModuleId {
        let id = self.next_id;
        self.next_id += 1;

        debug!(id, path = %path.display(), dependencies = dependencies.len(), "module complete");
        self.completed.insert(path.clone(), self.modules.len());
        self.modules.push(Module {
            id,
            path,
            text,
            dependencies,
        });
        id
    }
}

fn is_html(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "html")
}
