//! Finding the design behind a component view.
//!
//! A hierarchical view references a design configuration instantiation, a
//! design instantiation, or both. A configuration found in the library names
//! the design; otherwise the design instantiation does.

use weave_common::Vlnv;
use weave_diagnostics::DiagnosticSink;
use weave_ipxact::{Component, Library, View};

use crate::errors;
use crate::TopDesign;

/// The design-level documents a view refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewReferences {
    /// The design.
    pub design: Option<Vlnv>,
    /// The design configuration.
    pub design_configuration: Option<Vlnv>,
}

/// Follows the design and design configuration instantiations of `view`.
pub fn view_references(component: &Component, view: &View, library: &dyn Library) -> ViewReferences {
    let configuration = view
        .design_configuration_instantiation_ref
        .as_deref()
        .and_then(|name| component.find_design_configuration_instantiation(name))
        .map(|i| i.design_configuration_ref.clone());
    let from_configuration = configuration
        .as_ref()
        .and_then(|c| library.design_configuration(c))
        .and_then(|c| c.design_ref.clone());
    let design = from_configuration.or_else(|| {
        view.design_instantiation_ref
            .as_deref()
            .and_then(|name| component.find_design_instantiation(name))
            .map(|i| i.design_ref.clone())
    });
    ViewReferences {
        design,
        design_configuration: configuration,
    }
}

/// Resolves the top component, its view, and the design to elaborate.
///
/// `design` and `design_configuration` override what the view references.
/// Failures are reported to `sink` as errors and yield `None`. A design
/// configuration that cannot be found is reported as a warning and dropped.
pub fn resolve_top_design<'a>(
    library: &'a dyn Library,
    component: &Vlnv,
    view: &str,
    design: Option<&Vlnv>,
    design_configuration: Option<&Vlnv>,
    sink: &DiagnosticSink,
) -> Option<TopDesign<'a>> {
    let Some(top) = library.component(component) else {
        sink.emit(errors::error_top_not_found(component));
        return None;
    };
    let Some(top_view) = top.find_view(view) else {
        sink.emit(errors::error_top_view_not_found(&top.vlnv, view));
        return None;
    };

    let refs = view_references(top, top_view, library);
    let configuration_ref = design_configuration.or(refs.design_configuration.as_ref());
    let configuration = configuration_ref.and_then(|v| library.design_configuration(v));
    if let (Some(missing), None) = (configuration_ref, configuration) {
        tracing::warn!(configuration = %missing, "design configuration not found");
        sink.emit(errors::warn_missing_design_document(
            &top.vlnv,
            "design configuration",
            missing,
        ));
    }

    let design_ref = design
        .cloned()
        .or_else(|| configuration.and_then(|c| c.design_ref.clone()))
        .or(refs.design);
    let Some(design) = design_ref.as_ref().and_then(|v| library.design(v)) else {
        sink.emit(errors::error_design_not_found(&top.vlnv, view));
        return None;
    };

    tracing::debug!(
        top = %top.vlnv,
        design = %design.vlnv,
        configured = configuration.is_some(),
        "resolved top design"
    );
    Some(TopDesign {
        component: top,
        view: top_view,
        design,
        configuration,
    })
}
