//! `weave check`: elaborate and report diagnostics only.

use crate::pipeline::{report_diagnostics, resolve_project_root, Project};
use crate::GlobalArgs;

/// Runs the `weave check` command.
///
/// Returns exit code 0 if no errors, 1 if there are errors or the top design
/// cannot be resolved.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let project = Project::load(&project_dir)?;

    if !global.quiet {
        eprintln!(
            "   Checking {} v{}",
            project.config.project.name, project.config.project.version
        );
    }

    let elaborated = project.elaborate().is_some();
    report_diagnostics(&project.sink.diagnostics(), global);

    if !elaborated || project.sink.has_errors() {
        Ok(1)
    } else {
        Ok(0)
    }
}
