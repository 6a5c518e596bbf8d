//! Design elaboration: from an IP-XACT design to a generation model.
//!
//! Elaboration is a single pass over an immutable snapshot of the design and
//! its library. Instances are resolved first ([`instance`]), then bus-level
//! interconnections ([`interface`]), then ad-hoc connections ([`adhoc`]).
//! Entries that cannot be resolved are left out and reported as
//! [`Diagnostic`]s; the pass itself never fails. [`hierarchy`] repeats the
//! pass for every sub-design below the top.
//!
//! Everything is processed in declaration order and the first contributor of
//! a shared value wins, so the same input always yields the same model.

#![warn(missing_docs)]

pub mod adhoc;
pub mod bounds;
pub mod const_eval;
pub mod context;
pub mod errors;
#[cfg(test)]
mod fixture;
pub mod hierarchy;
pub mod instance;
pub mod interface;
pub mod scope;
pub mod top;

pub use const_eval::{ConstEvaluator, ExpressionEvaluator};
pub use context::ElaborationContext;
pub use hierarchy::{elaborate_hierarchy, elaborate_hierarchy_with, DesignElaboration, MAX_DESIGNS};
pub use scope::{ParameterTable, ScopeChain};
pub use top::resolve_top_design;

use weave_diagnostics::{Diagnostic, Severity};
use weave_ipxact::{Component, Design, DesignConfiguration, Library, View};
use weave_ir::GenerationModel;

static EVALUATOR: ConstEvaluator = ConstEvaluator;

/// Switches for one elaboration pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElaborateOptions {
    /// Report bus interfaces that no interconnection references (W308).
    pub warn_unconnected_interfaces: bool,
}

impl From<&weave_config::ElaborateConfig> for ElaborateOptions {
    fn from(config: &weave_config::ElaborateConfig) -> Self {
        Self {
            warn_unconnected_interfaces: config.warn_unconnected_interfaces,
        }
    }
}

/// The documents at the root of an elaboration.
#[derive(Debug, Clone, Copy)]
pub struct TopDesign<'a> {
    /// The component the design implements.
    pub component: &'a Component,
    /// The active view of that component.
    pub view: &'a View,
    /// The design to elaborate.
    pub design: &'a Design,
    /// The configuration selecting instance views, if any.
    pub configuration: Option<&'a DesignConfiguration>,
}

/// The result of one elaboration pass.
#[derive(Debug)]
pub struct Elaboration<'a> {
    /// The generation model.
    pub model: GenerationModel<'a>,
    /// Everything that was skipped or degraded, in the order it was found.
    pub diagnostics: Vec<Diagnostic>,
}

impl Elaboration<'_> {
    /// Returns `true` if any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    /// Counts diagnostics of one severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// Elaborates `design` as the implementation of `top_component` in
/// `top_view`.
pub fn elaborate<'a>(
    top_component: &'a Component,
    top_view: &'a View,
    design: &'a Design,
    configuration: Option<&'a DesignConfiguration>,
    library: &'a dyn Library,
    options: ElaborateOptions,
) -> Elaboration<'a> {
    let top = TopDesign {
        component: top_component,
        view: top_view,
        design,
        configuration,
    };
    elaborate_top(top, library, options)
}

/// Elaborates a resolved [`TopDesign`] with the built-in expression evaluator.
pub fn elaborate_top<'a>(
    top: TopDesign<'a>,
    library: &'a dyn Library,
    options: ElaborateOptions,
) -> Elaboration<'a> {
    elaborate_with(top, library, &EVALUATOR, options)
}

/// Elaborates with a caller-supplied expression evaluator.
pub fn elaborate_with<'a>(
    top: TopDesign<'a>,
    library: &'a dyn Library,
    evaluator: &'a dyn ExpressionEvaluator,
    options: ElaborateOptions,
) -> Elaboration<'a> {
    let _span = tracing::debug_span!("elaborate", design = %top.design.vlnv).entered();

    let mut ctx = ElaborationContext::new(top, library, evaluator, options);
    let model = build_model(&mut ctx);
    Elaboration {
        model,
        diagnostics: ctx.take_diagnostics(),
    }
}

/// Runs instance, interconnection and ad-hoc resolution over `ctx`.
pub(crate) fn build_model<'a>(ctx: &mut ElaborationContext<'a>) -> GenerationModel<'a> {
    let mut model = GenerationModel::new();

    model.instances = instance::resolve_instances(ctx);
    interface::resolve_interconnections(ctx, &mut model);
    tracing::debug!(
        interconnections = model.interconnections.len(),
        wires = model.wires.len(),
        "interconnections resolved"
    );
    adhoc::resolve_adhocs(ctx, &mut model);
    tracing::debug!(
        adhocs = model.adhocs.len(),
        top_tie_offs = model.top_tie_offs.len(),
        "ad-hoc connections resolved"
    );
    model
}
