//! Sub-design elaboration.
//!
//! An instance whose active view references both a design and a design
//! configuration is implemented by that design, which is elaborated in turn
//! with the instance's resolved parameters as its top scope. Designs are
//! visited depth first in instance order, parent before children.
//!
//! Every elaborated design then gets a unique module name: the base module
//! name followed by `_N`, where `N` counts the earlier designs with the same
//! base name. The instance a sub-design implements takes the same name.

use std::collections::HashMap;

use weave_common::Vlnv;
use weave_ipxact::Library;

use crate::context::ElaborationContext;
use crate::errors;
use crate::scope::ParameterTable;
use crate::{build_model, ElaborateOptions, Elaboration, ExpressionEvaluator, TopDesign, EVALUATOR};

/// The most designs one hierarchy elaborates, the top design included.
pub const MAX_DESIGNS: usize = 1000;

/// One elaborated design of a hierarchy.
#[derive(Debug)]
pub struct DesignElaboration<'a> {
    /// Instance names from the top design down to the instance this design
    /// implements. Empty for the top design.
    pub path: Vec<String>,
    /// The unique HDL module name of this design.
    pub module_name: String,
    /// The documents this design was elaborated from.
    pub top: TopDesign<'a>,
    /// The model and the diagnostics of this design.
    pub elaboration: Elaboration<'a>,
}

impl DesignElaboration<'_> {
    /// Returns `true` for the top design.
    pub fn is_top(&self) -> bool {
        self.path.is_empty()
    }

    /// The dotted instance path, e.g. `u_sub.u_core`.
    pub fn instance_path(&self) -> String {
        self.path.join(".")
    }
}

/// A design waiting to be elaborated.
struct Pending<'a> {
    top: TopDesign<'a>,
    scope: Option<ParameterTable>,
    path: Vec<String>,
    /// Designs from the top down to the parent, for recursion checks.
    ancestors: Vec<Vlnv>,
    /// The parent design's index and the implemented instance's index.
    parent: Option<(usize, usize)>,
    module_base: String,
}

/// Elaborates `top` and every sub-design below it with the built-in
/// expression evaluator.
pub fn elaborate_hierarchy<'a>(
    top: TopDesign<'a>,
    library: &'a dyn Library,
    options: ElaborateOptions,
) -> Vec<DesignElaboration<'a>> {
    elaborate_hierarchy_with(top, library, &EVALUATOR, options)
}

/// Elaborates `top` and every sub-design below it.
///
/// The top design comes first, then each sub-design after its parent, in
/// instance order. A sub-design that cannot be found, that instantiates
/// itself, or that would exceed [`MAX_DESIGNS`] is reported in its parent's
/// diagnostics and skipped.
pub fn elaborate_hierarchy_with<'a>(
    top: TopDesign<'a>,
    library: &'a dyn Library,
    evaluator: &'a dyn ExpressionEvaluator,
    options: ElaborateOptions,
) -> Vec<DesignElaboration<'a>> {
    let mut designs: Vec<DesignElaboration<'a>> = Vec::new();
    let mut parents: Vec<Option<(usize, usize)>> = Vec::new();
    let mut stack = vec![Pending {
        top,
        scope: None,
        path: Vec::new(),
        ancestors: Vec::new(),
        parent: None,
        module_base: top_module_base(&top),
    }];

    while let Some(pending) = stack.pop() {
        let _span = tracing::debug_span!(
            "elaborate",
            design = %pending.top.design.vlnv,
            depth = pending.path.len()
        )
        .entered();

        let mut ctx = ElaborationContext::new(pending.top, library, evaluator, options);
        if let Some(scope) = pending.scope {
            ctx = ctx.with_top_scope(scope);
        }
        let model = build_model(&mut ctx);

        let index = designs.len();
        let mut ancestors = pending.ancestors;
        ancestors.push(pending.top.design.vlnv.clone());

        let mut children = Vec::new();
        for (position, gi) in model.instances.iter().enumerate() {
            let (Some(design_ref), Some(configuration_ref)) = (&gi.design, &gi.design_configuration)
            else {
                continue;
            };
            let design = library.design(design_ref);
            let configuration = library.design_configuration(configuration_ref);
            let (Some(design), Some(configuration)) = (design, configuration) else {
                if design.is_none() {
                    ctx.emit(errors::warn_missing_design_document(
                        &gi.component.vlnv,
                        "design",
                        design_ref,
                    ));
                }
                if configuration.is_none() {
                    ctx.emit(errors::warn_missing_design_document(
                        &gi.component.vlnv,
                        "design configuration",
                        configuration_ref,
                    ));
                }
                continue;
            };
            if ancestors.contains(&design.vlnv) {
                ctx.emit(errors::warn_recursive_design(
                    &ctx.design.vlnv,
                    &gi.name,
                    &design.vlnv,
                ));
                continue;
            }
            // Elaborated, current, queued and about to be queued.
            if designs.len() + 1 + stack.len() + children.len() >= MAX_DESIGNS {
                ctx.emit(errors::warn_hierarchy_limit(&ctx.design.vlnv, &gi.name, MAX_DESIGNS));
                continue;
            }

            let resolved = ctx.resolved_parameters(&gi.name);
            let mut path = pending.path.clone();
            path.push(gi.name.clone());
            children.push(Pending {
                top: TopDesign {
                    component: gi.component,
                    view: gi.view,
                    design,
                    configuration: Some(configuration),
                },
                scope: Some(ParameterTable::for_sub_design(&gi.name, resolved, design)),
                path,
                ancestors: ancestors.clone(),
                parent: Some((index, position)),
                module_base: gi.module_name().to_string(),
            });
        }
        tracing::debug!(sub_designs = children.len(), "design elaborated");

        designs.push(DesignElaboration {
            path: pending.path,
            module_name: pending.module_base,
            top: pending.top,
            elaboration: Elaboration {
                model,
                diagnostics: ctx.take_diagnostics(),
            },
        });
        parents.push(pending.parent);
        stack.extend(children.into_iter().rev());
    }

    assign_module_names(&mut designs, &parents);
    designs
}

/// The module name of the top design before numbering.
fn top_module_base(top: &TopDesign<'_>) -> String {
    top.view
        .component_instantiation_ref
        .as_deref()
        .and_then(|name| top.component.find_component_instantiation(name))
        .and_then(|i| i.module_name.clone())
        .unwrap_or_else(|| top.component.vlnv.name.clone())
}

/// Numbers module names per base name in visiting order and copies each
/// name onto the instance the design implements.
fn assign_module_names(designs: &mut [DesignElaboration<'_>], parents: &[Option<(usize, usize)>]) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for (index, parent) in parents.iter().enumerate() {
        let base = std::mem::take(&mut designs[index].module_name);
        let count = seen.entry(base.clone()).or_insert(0);
        let name = format!("{base}_{count}");
        *count += 1;

        if let Some((design, position)) = *parent {
            if let Some(gi) = designs[design].elaboration.model.instances.get_mut(position) {
                gi.module = Some(name.clone());
            }
        }
        designs[index].module_name = name;
    }
}
