//! Shared elaboration state.
//!
//! [`ElaborationContext`] holds the read-only inputs of one pass together with
//! the parameter tables built for the top component and for each resolved
//! instance, and collects the diagnostics of the pass. The generation model
//! under construction is kept outside the context so resolvers can read
//! scopes while mutating the model.

use std::collections::HashMap;

use weave_diagnostics::{Diagnostic, DiagnosticSink};
use weave_ipxact::{
    Component, ComponentInstantiation, Design, DesignConfiguration, Library, Parameter, View,
};

use crate::bounds::BoundsEvaluator;
use crate::const_eval::ExpressionEvaluator;
use crate::scope::{ParameterTable, ScopeChain};
use crate::{ElaborateOptions, TopDesign};

/// Read-only inputs and scopes of one elaboration pass.
pub struct ElaborationContext<'a> {
    /// The component the design implements.
    pub top: &'a Component,
    /// The active view of the top component.
    pub top_view: &'a View,
    /// The component instantiation of the top view, if any.
    pub top_instantiation: Option<&'a ComponentInstantiation>,
    /// The design being elaborated.
    pub design: &'a Design,
    /// The design configuration selecting instance views.
    pub configuration: Option<&'a DesignConfiguration>,
    /// Document lookup.
    pub library: &'a dyn Library,
    /// Expression evaluation.
    pub evaluator: &'a dyn ExpressionEvaluator,
    /// Pass switches.
    pub options: ElaborateOptions,
    sink: DiagnosticSink,
    top_scope: ParameterTable,
    instance_scopes: HashMap<String, ParameterTable>,
}

impl<'a> ElaborationContext<'a> {
    /// Creates a context and builds the top scope.
    pub fn new(
        top: TopDesign<'a>,
        library: &'a dyn Library,
        evaluator: &'a dyn ExpressionEvaluator,
        options: ElaborateOptions,
    ) -> Self {
        let top_instantiation = top
            .view
            .component_instantiation_ref
            .as_deref()
            .and_then(|name| top.component.find_component_instantiation(name));
        let top_scope = ParameterTable::for_top(top.component, top_instantiation, top.design);
        Self {
            top: top.component,
            top_view: top.view,
            top_instantiation,
            design: top.design,
            configuration: top.configuration,
            library,
            evaluator,
            options,
            sink: DiagnosticSink::new(),
            top_scope,
            instance_scopes: HashMap::new(),
        }
    }

    /// Replaces the top scope, for a design elaborated as the implementation
    /// of an instance one level up.
    pub fn with_top_scope(mut self, table: ParameterTable) -> Self {
        self.top_scope = table;
        self
    }

    /// Reports a diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        self.sink.emit(diag);
    }

    /// Drains every diagnostic reported so far, in emission order.
    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        self.sink.take_all()
    }

    /// Registers the parameter table of a resolved instance.
    pub fn add_instance_scope(&mut self, instance: impl Into<String>, table: ParameterTable) {
        self.instance_scopes.insert(instance.into(), table);
    }

    /// The scope of top-level expressions.
    pub fn top_chain(&self) -> ScopeChain<'_> {
        ScopeChain::new(&self.top_scope)
    }

    /// The scope of an instance's expressions: its own table shadowing the
    /// top table. Falls back to the top scope for unknown instances.
    pub fn instance_chain(&self, instance: &str) -> ScopeChain<'_> {
        let top = self.top_chain();
        match self.instance_scopes.get(instance) {
            Some(table) => ScopeChain::shadowing(table, &top),
            None => top,
        }
    }

    /// The parameters of a resolved instance with every value reduced in the
    /// instance's scope. Empty for unknown instances.
    pub fn resolved_parameters(&self, instance: &str) -> Vec<Parameter> {
        let Some(table) = self.instance_scopes.get(instance) else {
            return Vec::new();
        };
        let chain = self.instance_chain(instance);
        table
            .parameters()
            .iter()
            .map(|p| Parameter {
                value: self.evaluator.evaluate(&p.value, &chain),
                ..p.clone()
            })
            .collect()
    }

    /// A bounds evaluator for an instance.
    pub fn bounds(&self, instance: &str) -> BoundsEvaluator<'_> {
        BoundsEvaluator::new(self.instance_chain(instance), self.evaluator)
    }
}
