//! Shared pipeline helpers for CLI commands.
//!
//! Both commands run the same steps:
//!
//! 1. Find project root (walk up looking for `weave.toml`)
//! 2. Load config via `weave_config`
//! 3. Load every document under the configured library paths
//! 4. Resolve the top component, view, design and design configuration
//! 5. Elaborate the top design and every sub-design below it
//! 6. Render diagnostics

use std::path::{Path, PathBuf};

use weave_config::{ProjectConfig, CONFIG_FILE};
use weave_diagnostics::{Diagnostic, DiagnosticRenderer, DiagnosticSink, Severity, TerminalRenderer};
use weave_elaborate::{DesignElaboration, ElaborateOptions};
use weave_ipxact::MemoryLibrary;

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing `weave.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir, dir → itself).
/// Otherwise walks up from the current directory looking for `weave.toml`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        find_project_root(&std::env::current_dir()?)
    }
}

/// A loaded project: its configuration, library, and the diagnostics
/// collected so far.
pub struct Project {
    /// The parsed `weave.toml`.
    pub config: ProjectConfig,
    /// Every document found under the library paths.
    pub library: MemoryLibrary,
    /// Loader, resolution and elaboration diagnostics.
    pub sink: DiagnosticSink,
}

impl Project {
    /// Loads the configuration and library of the project rooted at `dir`.
    pub fn load(dir: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let config = weave_config::load_config(dir)?;
        let paths = weave_config::resolve_library_paths(dir, &config);
        let sink = DiagnosticSink::new();
        let library = weave_ipxact::load_library(&paths, &sink);
        tracing::debug!(
            project = %config.project.name,
            documents = library.len(),
            "project loaded"
        );
        Ok(Self {
            config,
            library,
            sink,
        })
    }

    /// Elaborates the configured top design and its sub-designs.
    ///
    /// Returns `None` when the top design cannot be resolved; the reason is
    /// in the sink. Elaboration diagnostics are appended to the sink too.
    pub fn elaborate(&self) -> Option<Vec<DesignElaboration<'_>>> {
        let top = &self.config.top;
        let resolved = weave_elaborate::resolve_top_design(
            &self.library,
            &top.component,
            &top.view,
            top.design.as_ref(),
            top.design_configuration.as_ref(),
            &self.sink,
        )?;
        let options = ElaborateOptions::from(&self.config.elaborate);
        let mut designs = weave_elaborate::elaborate_hierarchy(resolved, &self.library, options);
        for design in &mut designs {
            self.sink
                .extend(std::mem::take(&mut design.elaboration.diagnostics));
        }
        tracing::debug!(designs = designs.len(), "hierarchy elaborated");
        Some(designs)
    }
}

/// Renders diagnostics to stderr and prints a summary unless quiet.
pub fn report_diagnostics(diagnostics: &[Diagnostic], global: &GlobalArgs) {
    let renderer = TerminalRenderer::new(global.color);
    for diag in diagnostics {
        if global.quiet && !diag.severity.is_error() {
            continue;
        }
        eprintln!("{}", renderer.render(diag));
    }
    if !global.quiet {
        eprintln!("   Result: {}", summary(diagnostics));
    }
}

/// Formats diagnostic counts, e.g. `0 error(s), 2 warning(s), 1 note(s)`.
pub fn summary(diagnostics: &[Diagnostic]) -> String {
    let count = |s: Severity| diagnostics.iter().filter(|d| d.severity == s).count();
    format!(
        "{} error(s), {} warning(s), {} note(s)",
        count(Severity::Error),
        count(Severity::Warning),
        count(Severity::Note)
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    pub(crate) const TOML: &str = r#"
[project]
name = "soc"
version = "0.1.0"

[top]
component = "acme:soc:top:1.0"
view = "hier"
"#;

    pub(crate) const TOP: &str = r#"{
  "kind": "component",
  "vlnv": "acme:soc:top:1.0",
  "ports": [{ "name": "irq", "direction": "out" }],
  "views": [{ "name": "hier", "design_instantiation_ref": "d" }],
  "design_instantiations": [{ "name": "d", "design_ref": "acme:soc:top.design:1.0" }]
}"#;

    pub(crate) const TIMER: &str = r#"{
  "kind": "component",
  "vlnv": "acme:ip:timer:1.0",
  "ports": [{ "name": "irq", "direction": "out" }],
  "views": [{ "name": "rtl", "component_instantiation_ref": "verilog" }],
  "component_instantiations": [{ "name": "verilog", "module_name": "timer_core" }]
}"#;

    pub(crate) const DESIGN: &str = r#"{
  "kind": "design",
  "vlnv": "acme:soc:top.design:1.0",
  "component_instances": [
    { "instance_name": "u_timer", "component_ref": "acme:ip:timer:1.0" },
    { "instance_name": "u_gone", "component_ref": "acme:ip:gone:1.0" }
  ],
  "ad_hoc_connections": [{
    "name": "irq",
    "internal_port_references": [{ "component_ref": "u_timer", "port_ref": "irq" }],
    "external_port_references": [{ "port_ref": "irq" }]
  }]
}"#;

    /// Writes a project whose design has one resolvable and one missing instance.
    pub(crate) fn write_project(dir: &Path) {
        let lib = dir.join("ipxact");
        fs::create_dir_all(&lib).unwrap();
        fs::write(dir.join(CONFIG_FILE), TOML).unwrap();
        fs::write(lib.join("top.json"), TOP).unwrap();
        fs::write(lib.join("timer.json"), TIMER).unwrap();
        fs::write(lib.join("design.json"), DESIGN).unwrap();
    }

    #[test]
    fn find_root_walks_up() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), TOML).unwrap();
        let nested = tmp.path().join("ipxact").join("ip");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_project_root(&nested).unwrap(), tmp.path());
    }

    #[test]
    fn find_root_fails_without_config() {
        let tmp = TempDir::new().unwrap();
        let err = find_project_root(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("weave.toml"));
    }

    #[test]
    fn config_flag_accepts_file_or_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), TOML).unwrap();
        let mut global = GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: Some(tmp.path().join(CONFIG_FILE).display().to_string()),
        };
        assert_eq!(resolve_project_root(&global).unwrap(), tmp.path());
        global.config = Some(tmp.path().display().to_string());
        assert_eq!(resolve_project_root(&global).unwrap(), tmp.path());
    }

    #[test]
    fn project_elaborates_with_skipped_instance() {
        let tmp = TempDir::new().unwrap();
        write_project(tmp.path());
        let project = Project::load(tmp.path()).unwrap();
        assert_eq!(project.library.len(), 3);

        let designs = project.elaborate().unwrap();
        assert_eq!(designs.len(), 1);
        assert_eq!(designs[0].module_name, "top_0");
        let model = &designs[0].elaboration.model;
        assert_eq!(model.instances.len(), 1);
        let timer = model.instance("u_timer").unwrap();
        assert_eq!(timer.module_name(), "timer_core");
        assert_eq!(timer.assignment("irq").unwrap().external_name(), Some("irq"));

        // The missing instance is reported through the project sink.
        let diags = project.sink.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code.to_string(), "W300");
        assert!(designs[0].elaboration.diagnostics.is_empty());
        assert!(!project.sink.has_errors());
    }

    #[test]
    fn unresolved_top_is_an_error() {
        let tmp = TempDir::new().unwrap();
        write_project(tmp.path());
        fs::remove_file(tmp.path().join("ipxact").join("design.json")).unwrap();
        let project = Project::load(tmp.path()).unwrap();
        assert!(project.elaborate().is_none());
        assert!(project.sink.has_errors());
    }

    #[test]
    fn summary_counts() {
        let sink = DiagnosticSink::new();
        assert_eq!(summary(&sink.diagnostics()), "0 error(s), 0 warning(s), 0 note(s)");
    }
}
