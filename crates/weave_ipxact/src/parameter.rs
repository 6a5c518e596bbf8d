//! Parameters and configurable element values.

use serde::{Deserialize, Serialize};

/// A named, expression-valued parameter.
///
/// Expressions elsewhere in a document refer to a parameter either by its
/// `value_id` (the IP-XACT `parameterId`) or by its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// The parameter name.
    pub name: String,
    /// The unique id expressions use to reference this parameter.
    #[serde(default)]
    pub value_id: Option<String>,
    /// The value expression.
    pub value: String,
}

impl Parameter {
    /// Creates a parameter without a value id.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_id: None,
            value: value.into(),
        }
    }

    /// Sets the value id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.value_id = Some(id.into());
        self
    }

    /// Returns `true` if `reference` names this parameter by id or by name.
    pub fn is_referenced_by(&self, reference: &str) -> bool {
        self.value_id.as_deref() == Some(reference) || self.name == reference
    }
}

/// An override of a parameter value, keyed by the parameter's value id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurableElementValue {
    /// The value id (or name) of the overridden parameter.
    pub reference_id: String,
    /// The replacement value expression.
    pub value: String,
}

impl ConfigurableElementValue {
    /// Creates a new configurable element value.
    pub fn new(reference_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            reference_id: reference_id.into(),
            value: value.into(),
        }
    }
}

/// Applies `overrides` to `parameters`, returning overridden copies.
///
/// The first override that references a parameter wins.
pub fn apply_overrides(
    parameters: &[Parameter],
    overrides: &[ConfigurableElementValue],
) -> Vec<Parameter> {
    parameters
        .iter()
        .map(|p| {
            let mut p = p.clone();
            if let Some(cev) = overrides.iter().find(|c| p.is_referenced_by(&c.reference_id)) {
                p.value = cev.value.clone();
            }
            p
        })
        .collect()
}
