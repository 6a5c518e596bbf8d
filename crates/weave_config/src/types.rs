//! Configuration types deserialized from `weave.toml`.

use serde::Deserialize;
use std::path::PathBuf;
use weave_common::Vlnv;

/// The top-level project configuration parsed from `weave.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Project metadata.
    pub project: ProjectMeta,
    /// The component to elaborate and how to find its design.
    pub top: TopConfig,
    /// Where IP-XACT documents are loaded from.
    #[serde(default)]
    pub library: LibraryConfig,
    /// Elaboration switches.
    #[serde(default)]
    pub elaborate: ElaborateConfig,
}

/// Core project metadata.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string.
    #[serde(default)]
    pub version: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
}

/// The top-level component and its elaboration inputs.
#[derive(Debug, Clone, Deserialize)]
pub struct TopConfig {
    /// The top component VLNV, written `vendor:library:name:version`.
    pub component: Vlnv,
    /// The active view of the top component.
    pub view: String,
    /// The design to elaborate; derived from the top view when absent.
    #[serde(default)]
    pub design: Option<Vlnv>,
    /// The design configuration; derived from the top view when absent.
    #[serde(default)]
    pub design_configuration: Option<Vlnv>,
}

/// Library search path configuration.
#[derive(Debug, Deserialize)]
pub struct LibraryConfig {
    /// Directories scanned for documents, relative to the project root.
    #[serde(default = "default_library_paths")]
    pub paths: Vec<PathBuf>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            paths: default_library_paths(),
        }
    }
}

fn default_library_paths() -> Vec<PathBuf> {
    vec![PathBuf::from("ipxact")]
}

/// Elaboration switches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ElaborateConfig {
    /// Warn about bus interfaces no interconnection references.
    #[serde(default)]
    pub warn_unconnected_interfaces: bool,
}
