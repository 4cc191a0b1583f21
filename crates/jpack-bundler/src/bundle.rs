/// Bundle serialization
///
/// Renders a module table into the wire format the runtime loader reads:
///
/// ```text
/// <loader prefix>({ 1:[function(require,module,exports){...},{}], 2:[...,{"./b": 1}] }, {}, [2]);
/// ```

use std::fmt::Write as _;
use crate::error::Result;
use crate::module::{Module, ModuleGraph, ModuleId};
use crate::runtime::LOADER_PREFIX;
use crate::template::escape_string;

/// Serializes modules into bundle text
pub struct BundleWriter {
    output: String,
}

impl BundleWriter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    /// Render a whole graph with its entry module
    pub fn write_graph(self, graph: &ModuleGraph) -> Result<String> {
        self.write_bundle(graph.modules(), graph.entry())
    }

    /// Render `modules` (in the given order) with `entry` as the module to run
    pub fn write_bundle(mut self, modules: &[Module], entry: ModuleId) -> Result<String> {
        self.output.push_str(LOADER_PREFIX);
        self.output.push_str("({ ");
        for (i, module) in modules.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.write_module(module)?;
        }
        write!(self.output, " }}, {{}}, [{}]);", entry)?;
        Ok(self.output)
    }

    fn write_module(&mut self, module: &Module) -> Result<()> {
        write!(self.output, "{}:[function(require,module,exports){{", module.id)?;
        self.output.push_str(&module.text);
        self.output.push_str("},{");
        for (i, (name, id)) in module.dependencies.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            write!(self.output, "\"{}\": {}", escape_string(name), id)?;
        }
        self.output.push_str("}]");
        Ok(())
    }
}

impl Default for BundleWriter {
    fn default() -> Self {
        Self::new()
    }
}
