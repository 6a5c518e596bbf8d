//! `weave elaborate`: build the generation models and print them.

use weave_elaborate::DesignElaboration;

use crate::pipeline::{report_diagnostics, resolve_project_root, Project};
use crate::report::{HierarchyDocument, HierarchyReport};
use crate::{ElaborateArgs, GlobalArgs, ReportFormat};

/// Runs the `weave elaborate` command.
///
/// Diagnostics go to stderr, the models to stdout or `--output`. Returns
/// exit code 0 if no errors, 1 if there are errors.
pub fn run(args: &ElaborateArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let project = Project::load(&project_dir)?;

    if !global.quiet {
        eprintln!(
            "   Elaborating {} v{}",
            project.config.project.name, project.config.project.version
        );
    }

    let designs = project.elaborate();
    report_diagnostics(&project.sink.diagnostics(), global);
    let Some(designs) = designs else {
        return Ok(1);
    };

    let rendered = render(args.format, &designs)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            if !global.quiet {
                eprintln!("      Wrote {path}");
            }
        }
        None => print!("{rendered}"),
    }

    Ok(if project.sink.has_errors() { 1 } else { 0 })
}

fn render(
    format: ReportFormat,
    designs: &[DesignElaboration<'_>],
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(HierarchyReport(designs).to_string()),
        ReportFormat::Json => {
            let mut json = serde_json::to_string_pretty(&HierarchyDocument::new(designs))?;
            json.push('\n');
            Ok(json)
        }
    }
}
