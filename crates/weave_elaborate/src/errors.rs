//! Diagnostic codes and helper functions for elaboration warnings and errors.
//!
//! Warning codes `W300`--`W315` cover entries the pass skips or degrades
//! (unresolved components, dangling references, duplicate connections,
//! sub-designs that cannot be elaborated).
//! `N300` reports a fallback in width resolution. Error codes `E302`--`E304`
//! cover a top component whose design cannot be found at all.

use weave_common::Vlnv;
use weave_diagnostics::{Category, Diagnostic, DiagnosticCode, Label, Location};

/// Instance component not found in the library.
pub const W300: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 300,
};

/// Instance has no usable active view.
pub const W301: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 301,
};

/// Active view names no component instantiation.
pub const W302: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 302,
};

/// Connection references an instance the design does not contain.
pub const W303: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 303,
};

/// Interconnection references an unknown bus interface of an instance.
pub const W304: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 304,
};

/// Hierarchical interface names an unknown top bus interface.
pub const W305: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 305,
};

/// Port map or port reference names an unknown physical port.
pub const W306: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 306,
};

/// Bus interface is an endpoint of more than one interconnection.
pub const W307: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 307,
};

/// Bus interface is not an endpoint of any interconnection.
pub const W308: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 308,
};

/// Ad-hoc external reference names an unknown top port.
pub const W309: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 309,
};

/// Top bus interface has no port map for a logical port.
pub const W310: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 310,
};

/// Ad-hoc connection replaces an earlier port binding.
pub const W311: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 311,
};

/// Referenced design or design configuration not found.
pub const W312: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 312,
};

/// Ad-hoc connection references more than one top port.
pub const W313: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 313,
};

/// Design hierarchy exceeds the elaboration limit.
pub const W314: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 314,
};

/// Design instantiates itself through its own hierarchy.
pub const W315: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 315,
};

/// Abstraction definition not found; physical bounds used.
pub const N300: DiagnosticCode = DiagnosticCode {
    category: Category::Note,
    number: 300,
};

/// Top component not found in the library.
pub const E302: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 302,
};

/// Top component has no view with the configured name.
pub const E303: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 303,
};

/// No design could be found for the top component.
pub const E304: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 304,
};

fn instance_location(design: &Vlnv, instance: &str) -> Location {
    Location::document(design).at(format!("instance `{instance}`"))
}

/// Creates a diagnostic for an instance whose component is not in the library.
pub fn warn_unresolved_component(design: &Vlnv, instance: &str, component: &Vlnv) -> Diagnostic {
    Diagnostic::warning(
        W300,
        format!("component `{component}` of instance `{instance}` not found; instance skipped"),
        instance_location(design, instance),
    )
    .with_help("add the component document to a library path")
}

/// Creates a diagnostic for an instance with no active view.
pub fn warn_missing_active_view(design: &Vlnv, instance: &str) -> Diagnostic {
    Diagnostic::warning(
        W301,
        format!("instance `{instance}` has no active view; instance skipped"),
        instance_location(design, instance),
    )
    .with_help("select a view for the instance in the design configuration")
}

/// Creates a diagnostic for an active view the component does not declare.
pub fn warn_unknown_view(design: &Vlnv, instance: &str, component: &Vlnv, view: &str) -> Diagnostic {
    Diagnostic::warning(
        W301,
        format!("active view `{view}` of instance `{instance}` not found; instance skipped"),
        instance_location(design, instance),
    )
    .with_label(Label::secondary(
        Location::document(component),
        "component declares no such view",
    ))
}

/// Creates a diagnostic for a view without a component instantiation.
pub fn warn_missing_instantiation(
    design: &Vlnv,
    instance: &str,
    component: &Vlnv,
    view: &str,
) -> Diagnostic {
    Diagnostic::warning(
        W302,
        format!(
            "view `{view}` of instance `{instance}` has no component instantiation; instance skipped"
        ),
        instance_location(design, instance),
    )
    .with_label(Label::secondary(
        Location::document(component).at(format!("view `{view}`")),
        "view declared here",
    ))
}

/// Creates a diagnostic for a connection naming an unknown instance.
pub fn warn_unknown_instance(design: &Vlnv, connection: &str, instance: &str) -> Diagnostic {
    Diagnostic::warning(
        W303,
        format!("connection `{connection}` references unknown instance `{instance}`"),
        Location::document(design).at(format!("connection `{connection}`")),
    )
}

/// Creates a diagnostic for an interconnection naming an unknown bus interface.
pub fn warn_unknown_bus_interface(
    design: &Vlnv,
    connection: &str,
    instance: &str,
    bus: &str,
) -> Diagnostic {
    Diagnostic::warning(
        W304,
        format!("instance `{instance}` has no bus interface `{bus}`"),
        Location::document(design).at(format!("connection `{connection}`")),
    )
}

/// Creates a diagnostic for a hierarchical interface unknown to the top component.
pub fn warn_unknown_top_interface(
    design: &Vlnv,
    top: &Vlnv,
    connection: &str,
    bus: &str,
) -> Diagnostic {
    Diagnostic::warning(
        W305,
        format!("top component has no bus interface `{bus}`; connection `{connection}` is wired internally"),
        Location::document(design).at(format!("connection `{connection}`")),
    )
    .with_label(Label::secondary(Location::document(top), "top component"))
}

/// Creates a diagnostic for a port name the component does not declare.
pub fn warn_unknown_port(location: Location, instance: &str, port: &str) -> Diagnostic {
    Diagnostic::warning(
        W306,
        format!("instance `{instance}` has no port `{port}`"),
        location,
    )
}

/// Creates a diagnostic for a bus interface claimed by a second interconnection.
pub fn warn_duplicate_connection(
    design: &Vlnv,
    instance: &str,
    bus: &str,
    kept: &str,
    ignored: &str,
) -> Diagnostic {
    Diagnostic::warning(
        W307,
        format!("bus interface `{bus}` of instance `{instance}` is connected more than once"),
        Location::document(design).at(format!("connection `{ignored}`")),
    )
    .with_note(format!("connection `{kept}` is used"))
}

/// Creates a diagnostic for a bus interface no interconnection references.
pub fn warn_unconnected_interface(design: &Vlnv, instance: &str, bus: &str) -> Diagnostic {
    Diagnostic::warning(
        W308,
        format!("bus interface `{bus}` of instance `{instance}` is not connected"),
        instance_location(design, instance),
    )
}

/// Creates a diagnostic for an ad-hoc external reference to an unknown top port.
pub fn warn_unknown_top_port(design: &Vlnv, connection: &str, port: &str) -> Diagnostic {
    Diagnostic::warning(
        W309,
        format!("top component has no port `{port}`"),
        Location::document(design).at(format!("ad-hoc connection `{connection}`")),
    )
}

/// Creates a diagnostic for a logical port the top bus interface does not map.
pub fn warn_unmapped_top_logical(top: &Vlnv, bus: &str, logical: &str) -> Diagnostic {
    Diagnostic::warning(
        W310,
        format!("top bus interface `{bus}` does not map logical port `{logical}`; port left unconnected"),
        Location::document(top).at(format!("bus interface `{bus}`")),
    )
}

/// Creates a diagnostic for an ad-hoc connection replacing an earlier binding.
pub fn warn_port_rebound(
    design: &Vlnv,
    instance: &str,
    port: &str,
    connection: &str,
    replaced: &str,
) -> Diagnostic {
    Diagnostic::warning(
        W311,
        format!("port `{port}` of instance `{instance}` is rebound by ad-hoc connection `{connection}`"),
        instance_location(design, instance),
    )
    .with_note(format!("the earlier {replaced} binding is replaced"))
}

/// Creates a diagnostic for a referenced design-level document missing from
/// the library.
pub fn warn_missing_design_document(owner: &Vlnv, kind: &str, missing: &Vlnv) -> Diagnostic {
    Diagnostic::warning(
        W312,
        format!("{kind} `{missing}` not found"),
        Location::document(owner),
    )
}

/// Creates a diagnostic for an ad-hoc connection naming several top ports.
pub fn warn_several_top_ports(
    design: &Vlnv,
    connection: &str,
    kept: &str,
    superseded: &[&str],
) -> Diagnostic {
    Diagnostic::warning(
        W313,
        format!("ad-hoc connection references several top ports; binding to `{kept}`"),
        Location::document(design).at(format!("ad-hoc connection `{connection}`")),
    )
    .with_note(format!("superseded: {}", superseded.join(", ")))
}

/// Creates a diagnostic for a sub-design skipped at the hierarchy limit.
pub fn warn_hierarchy_limit(design: &Vlnv, instance: &str, limit: usize) -> Diagnostic {
    Diagnostic::warning(
        W314,
        format!("design hierarchy exceeds {limit} designs; sub-design of `{instance}` not elaborated"),
        instance_location(design, instance),
    )
}

/// Creates a diagnostic for a sub-design that is already being elaborated.
pub fn warn_recursive_design(design: &Vlnv, instance: &str, sub_design: &Vlnv) -> Diagnostic {
    Diagnostic::warning(
        W315,
        format!("sub-design `{sub_design}` of instance `{instance}` instantiates itself"),
        instance_location(design, instance),
    )
}

/// Creates a diagnostic for an abstraction definition missing from the library.
pub fn note_unresolved_abstraction(component: &Vlnv, bus: &str, abstraction: &Vlnv) -> Diagnostic {
    Diagnostic::note(
        N300,
        format!("abstraction definition `{abstraction}` not found; physical port bounds used"),
        Location::document(component).at(format!("bus interface `{bus}`")),
    )
}

/// Creates a diagnostic for a top component missing from the library.
pub fn error_top_not_found(top: &Vlnv) -> Diagnostic {
    Diagnostic::error(E302, format!("top component `{top}` not found"), Location::NONE)
        .with_help("set `top.component` in weave.toml to a component in the library")
}

/// Creates a diagnostic for a top view the component does not declare.
pub fn error_top_view_not_found(top: &Vlnv, view: &str) -> Diagnostic {
    Diagnostic::error(
        E303,
        format!("top component has no view `{view}`"),
        Location::document(top),
    )
}

/// Creates a diagnostic for a top component whose design cannot be found.
pub fn error_design_not_found(top: &Vlnv, view: &str) -> Diagnostic {
    Diagnostic::error(
        E304,
        format!("no design found for view `{view}` of the top component"),
        Location::document(top).at(format!("view `{view}`")),
    )
    .with_help("reference a design from the view, or set `top.design` in weave.toml")
}
