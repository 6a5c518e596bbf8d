//! Parameter scopes used to evaluate bound and width expressions.
//!
//! Each instance gets a [`ParameterTable`] built from its component's
//! parameters (with configurable element values applied) and the module
//! parameters of its active component instantiation. The top component gets
//! one from its own parameters. A [`ScopeChain`] layers tables so that inner
//! tables shadow outer ones: an instance expression sees its own parameters
//! first and falls back to the top component's.

use weave_ipxact::parameter::apply_overrides;
use weave_ipxact::{
    Component, ComponentInstance, ComponentInstantiation, ConfigurableElementValue, Design,
    Parameter, ViewConfiguration,
};

/// A flat, named list of parameters.
#[derive(Debug, Clone, Default)]
pub struct ParameterTable {
    label: String,
    parameters: Vec<Parameter>,
}

impl ParameterTable {
    /// Creates a table.
    pub fn new(label: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        Self {
            label: label.into(),
            parameters,
        }
    }

    /// Builds the table of the top component: its parameters, the module
    /// parameters of its active instantiation, and the design's parameters.
    pub fn for_top(
        top: &Component,
        instantiation: Option<&ComponentInstantiation>,
        design: &Design,
    ) -> Self {
        let mut parameters = top.parameters.clone();
        if let Some(inst) = instantiation {
            parameters.extend(inst.module_parameters.iter().cloned());
        }
        parameters.extend(design.parameters.iter().cloned());
        Self::new(format!("top `{}`", top.vlnv.name), parameters)
    }

    /// Builds the top table of a sub-design: the resolved parameters of the
    /// instance it implements, then the design's parameters.
    pub fn for_sub_design(instance: &str, resolved: Vec<Parameter>, design: &Design) -> Self {
        let mut parameters = resolved;
        parameters.extend(design.parameters.iter().cloned());
        Self::new(format!("instance `{instance}`"), parameters)
    }

    /// Builds the table of one instance.
    ///
    /// Parameter values are overridden first by the instance's configurable
    /// element values, then by those of its view configuration, so the view
    /// configuration has the last word.
    pub fn for_instance(
        instance: &ComponentInstance,
        component: &Component,
        instantiation: &ComponentInstantiation,
        view_configuration: Option<&ViewConfiguration>,
    ) -> Self {
        let view_cevs: &[ConfigurableElementValue] = view_configuration
            .map(|v| v.configurable_element_values.as_slice())
            .unwrap_or_default();
        let overridden = |params: &[Parameter]| {
            let params = apply_overrides(params, &instance.configurable_element_values);
            apply_overrides(&params, view_cevs)
        };
        let mut parameters = overridden(&component.parameters);
        parameters.extend(overridden(&instantiation.module_parameters));
        Self::new(format!("instance `{}`", instance.instance_name), parameters)
    }

    /// Returns a description of where the table comes from.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the parameters in declaration order.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Finds the parameter an expression reference names.
    ///
    /// Value ids take priority over names, so a parameter whose name happens
    /// to equal another parameter's id cannot hide it.
    pub fn find(&self, reference: &str) -> Option<&Parameter> {
        self.parameters
            .iter()
            .find(|p| p.value_id.as_deref() == Some(reference))
            .or_else(|| self.parameters.iter().find(|p| p.name == reference))
    }
}

/// An ordered stack of parameter tables, innermost first.
#[derive(Debug, Clone)]
pub struct ScopeChain<'s> {
    tables: Vec<&'s ParameterTable>,
}

impl<'s> ScopeChain<'s> {
    /// Creates a chain with a single table.
    pub fn new(table: &'s ParameterTable) -> Self {
        Self {
            tables: vec![table],
        }
    }

    /// Creates a chain where `inner` shadows every table of `outer`.
    pub fn shadowing(inner: &'s ParameterTable, outer: &ScopeChain<'s>) -> Self {
        let mut tables = Vec::with_capacity(outer.tables.len() + 1);
        tables.push(inner);
        tables.extend(outer.tables.iter().copied());
        Self { tables }
    }

    /// Returns the number of tables.
    pub fn depth(&self) -> usize {
        self.tables.len()
    }

    /// Finds a referenced parameter, searching inner tables first.
    ///
    /// Also returns the chain the parameter's own value must be evaluated
    /// in: the table it was found in and everything outside it. A top
    /// parameter therefore never sees instance parameters.
    pub fn lookup(&self, reference: &str) -> Option<(&'s Parameter, ScopeChain<'s>)> {
        self.tables.iter().copied().enumerate().find_map(|(level, table)| {
            table.find(reference).map(|p| {
                (
                    p,
                    ScopeChain {
                        tables: self.tables[level..].to_vec(),
                    },
                )
            })
        })
    }
}
