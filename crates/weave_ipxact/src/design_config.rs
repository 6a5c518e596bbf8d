//! Design configurations: per-instance active views.

use serde::{Deserialize, Serialize};
use weave_common::Vlnv;

use crate::parameter::ConfigurableElementValue;

/// The view selection for one instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfiguration {
    /// The instance the selection applies to.
    pub instance_name: String,
    /// The selected view name.
    pub view_ref: String,
    /// Parameter overrides applied on top of the instance's own overrides.
    #[serde(default)]
    pub configurable_element_values: Vec<ConfigurableElementValue>,
}

/// A design configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignConfiguration {
    /// The configuration identifier.
    pub vlnv: Vlnv,
    /// The design this configuration applies to.
    #[serde(default)]
    pub design_ref: Option<Vlnv>,
    /// Per-instance view selections.
    #[serde(default)]
    pub view_configurations: Vec<ViewConfiguration>,
}

impl DesignConfiguration {
    /// Creates an empty configuration.
    pub fn new(vlnv: Vlnv) -> Self {
        Self {
            vlnv,
            design_ref: None,
            view_configurations: Vec::new(),
        }
    }

    /// Selects `view` for `instance`.
    pub fn with_active_view(mut self, instance: impl Into<String>, view: impl Into<String>) -> Self {
        self.view_configurations.push(ViewConfiguration {
            instance_name: instance.into(),
            view_ref: view.into(),
            configurable_element_values: Vec::new(),
        });
        self
    }

    /// Returns the view configuration for an instance.
    pub fn view_configuration(&self, instance: &str) -> Option<&ViewConfiguration> {
        self.view_configurations
            .iter()
            .find(|v| v.instance_name == instance)
    }

    /// Returns the active view name for an instance.
    pub fn active_view(&self, instance: &str) -> Option<&str> {
        self.view_configuration(instance)
            .map(|v| v.view_ref.as_str())
    }
}
