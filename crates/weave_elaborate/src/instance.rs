//! Instance resolution: from design instances to generation instances.

use weave_ipxact::ComponentInstance;
use weave_ir::GenerationInstance;

use crate::context::ElaborationContext;
use crate::errors;
use crate::scope::ParameterTable;
use crate::top::view_references;

/// Resolves every design instance in declaration order.
///
/// An instance whose component, active view or component instantiation
/// cannot be found is reported and left out; the rest are returned and their
/// parameter tables registered with `ctx`.
pub fn resolve_instances<'a>(ctx: &mut ElaborationContext<'a>) -> Vec<GenerationInstance<'a>> {
    let design = ctx.design;
    let mut resolved = Vec::with_capacity(design.component_instances.len());
    for instance in &design.component_instances {
        if let Some(gi) = resolve_instance(ctx, instance) {
            tracing::trace!(instance = %gi.name, view = %gi.view.name, "instance resolved");
            resolved.push(gi);
        }
    }
    tracing::debug!(
        resolved = resolved.len(),
        declared = design.component_instances.len(),
        "instances resolved"
    );
    resolved
}

fn resolve_instance<'a>(
    ctx: &mut ElaborationContext<'a>,
    instance: &'a ComponentInstance,
) -> Option<GenerationInstance<'a>> {
    let design = &ctx.design.vlnv;
    let name = instance.instance_name.as_str();

    let Some(component) = ctx.library.component(&instance.component_ref) else {
        ctx.emit(errors::warn_unresolved_component(design, name, &instance.component_ref));
        return None;
    };

    let Some(view_name) = ctx.configuration.and_then(|c| c.active_view(name)) else {
        ctx.emit(errors::warn_missing_active_view(design, name));
        return None;
    };
    let Some(view) = component.find_view(view_name) else {
        ctx.emit(errors::warn_unknown_view(design, name, &component.vlnv, view_name));
        return None;
    };

    let Some(instantiation) = view
        .component_instantiation_ref
        .as_deref()
        .and_then(|i| component.find_component_instantiation(i))
    else {
        ctx.emit(errors::warn_missing_instantiation(design, name, &component.vlnv, view_name));
        return None;
    };

    let view_configuration = ctx.configuration.and_then(|c| c.view_configuration(name));
    let table = ParameterTable::for_instance(instance, component, instantiation, view_configuration);
    ctx.add_instance_scope(name, table);

    let refs = view_references(component, view, ctx.library);
    let mut gi = GenerationInstance::new(name, component, view, instantiation);
    gi.design = refs.design;
    gi.design_configuration = refs.design_configuration;
    Some(gi)
}
