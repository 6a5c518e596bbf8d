//! Bit-range resolution for ports, port maps and abstraction widths.

use weave_ipxact::{Port, PortMap, Range};
use weave_ir::Bounds;

use crate::const_eval::ExpressionEvaluator;
use crate::scope::ScopeChain;

/// Resolves ranges of one instance within its scope chain.
pub struct BoundsEvaluator<'s> {
    scope: ScopeChain<'s>,
    evaluator: &'s dyn ExpressionEvaluator,
}

impl<'s> BoundsEvaluator<'s> {
    /// Creates an evaluator over `scope`.
    pub fn new(scope: ScopeChain<'s>, evaluator: &'s dyn ExpressionEvaluator) -> Self {
        Self { scope, evaluator }
    }

    /// Evaluates one expression. Empty in, empty out.
    pub fn expression(&self, expression: &str) -> String {
        self.evaluator.evaluate(expression, &self.scope)
    }

    /// Resolves an optional range; `None` yields the empty pair.
    pub fn range(&self, range: Option<&Range>) -> Bounds {
        match range {
            Some(r) => Bounds::new(self.expression(&r.left), self.expression(&r.right)),
            None => Bounds::empty(),
        }
    }

    /// The declared vector range of a physical port.
    pub fn physical(&self, port: &Port) -> Bounds {
        self.range(port.vector.as_ref())
    }

    /// The logical range a port map slices, if it declares one.
    pub fn logical(&self, port_map: &PortMap) -> Bounds {
        self.range(port_map.logical_port.range.as_ref())
    }

    /// The range a port takes through a port map: the logical range when
    /// fully specified, the physical range otherwise.
    pub fn port_map(&self, port_map: &PortMap, port: &Port) -> Bounds {
        let logical = self.logical(port_map);
        if logical.left.is_empty() || logical.right.is_empty() {
            self.physical(port)
        } else {
            logical
        }
    }

    /// The range of a wire `width` bits wide: `(width)-1` down to `0`.
    pub fn from_width(&self, width: &str) -> Bounds {
        let width = width.trim();
        if width.is_empty() {
            return Bounds::empty();
        }
        Bounds::new(self.expression(&format!("({width})-1")), "0")
    }
}
