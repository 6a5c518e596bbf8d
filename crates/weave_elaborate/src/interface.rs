//! Bus-level connections: interconnections and their wires.
//!
//! Every bus interface of every resolved instance is matched against the
//! design's interconnections. Endpoints of the same source interconnection
//! share one [`Interconnection`] record. Port maps then bind each physical
//! port either to a top-level port (when the interconnection ends at a bus
//! interface of the top component) or to a wire keyed by logical port name.

use std::collections::HashMap;

use weave_diagnostics::Location;
use weave_ipxact::{
    AbstractionDefinition, AbstractionType, BusInterface, Component, Interconnection as Connection,
    View,
};
use weave_ir::{
    Arena, AssignmentOrigin, Binding, GenerationInstance, GenerationModel, Interconnection,
    InterconnectionId, PortAssignment, PortRef, Wire, WireId, WireOwner,
};

use crate::context::ElaborationContext;
use crate::errors;

/// Builds the interconnections of every resolved instance in `model`.
pub fn resolve_interconnections<'a>(ctx: &ElaborationContext<'a>, model: &mut GenerationModel<'a>) {
    report_dangling_endpoints(ctx, &model.instances);

    let GenerationModel {
        instances,
        interconnections,
        wires,
        ..
    } = model;
    // Design interconnection index -> generation record.
    let mut by_source: HashMap<usize, InterconnectionId> = HashMap::new();

    for gi in instances.iter_mut() {
        let component = gi.component;
        for bus in &component.bus_interfaces {
            let Some(index) = select_connection(ctx, &gi.name, &bus.name) else {
                continue;
            };
            let source = &ctx.design.interconnections[index];
            let id = *by_source
                .entry(index)
                .or_insert_with(|| create_interconnection(ctx, interconnections, source));

            let ic = &mut interconnections[id];
            if ic.bus_type.is_none() {
                ic.bus_type = Some(bus.bus_type.clone());
            }
            let top_interface = ic.top_interface.clone();
            gi.interfaces.insert(bus.name.clone(), id);

            let top_bus = top_interface
                .as_deref()
                .and_then(|name| ctx.top.bus_interface(name));
            let mut binder = PortMapBinder {
                ctx,
                gi: &mut *gi,
                component,
                bus,
                top_bus,
                id,
                interconnections: &mut *interconnections,
                wires: &mut *wires,
            };
            binder.bind();
        }
    }
}

/// Picks the design interconnection that owns `(instance, bus)`.
///
/// The first one in declaration order wins; any later one is reported.
fn select_connection(ctx: &ElaborationContext<'_>, instance: &str, bus: &str) -> Option<usize> {
    let design = ctx.design;
    let mut candidates = design
        .interconnections
        .iter()
        .enumerate()
        .filter(|(_, c)| c.references(instance, bus));

    let Some((index, kept)) = candidates.next() else {
        if ctx.options.warn_unconnected_interfaces {
            ctx.emit(errors::warn_unconnected_interface(&design.vlnv, instance, bus));
        }
        return None;
    };
    for (_, ignored) in candidates {
        ctx.emit(errors::warn_duplicate_connection(
            &design.vlnv,
            instance,
            bus,
            &kept.name,
            &ignored.name,
        ));
    }
    Some(index)
}

fn create_interconnection(
    ctx: &ElaborationContext<'_>,
    interconnections: &mut Arena<InterconnectionId, Interconnection>,
    source: &Connection,
) -> InterconnectionId {
    let mut ic = Interconnection::new(&source.name);
    if let Some(hier) = source.hier_interfaces.first() {
        if ctx.top.bus_interface(&hier.bus_ref).is_some() {
            ic.top_interface = Some(hier.bus_ref.clone());
        } else {
            ctx.emit(errors::warn_unknown_top_interface(
                &ctx.design.vlnv,
                &ctx.top.vlnv,
                &source.name,
                &hier.bus_ref,
            ));
        }
    }
    tracing::trace!(
        interconnection = %source.name,
        hierarchical = ic.is_hierarchical(),
        "interconnection created"
    );
    interconnections.alloc(ic)
}

/// Binds the port maps of one bus interface of one instance.
struct PortMapBinder<'c, 'a, 'm> {
    ctx: &'c ElaborationContext<'a>,
    gi: &'m mut GenerationInstance<'a>,
    component: &'a Component,
    bus: &'a BusInterface,
    top_bus: Option<&'a BusInterface>,
    id: InterconnectionId,
    interconnections: &'m mut Arena<InterconnectionId, Interconnection>,
    wires: &'m mut Arena<WireId, Wire>,
}

impl<'a> PortMapBinder<'_, 'a, '_> {
    fn bind(&mut self) {
        let ctx = self.ctx;
        let (component, bus) = (self.component, self.bus);
        let view: &'a View = self.gi.view;
        let bounds = ctx.bounds(&self.gi.name);

        for abstraction in bus
            .abstraction_types
            .iter()
            .filter(|t| t.applies_to_view(&view.name))
        {
            let definition = self.abstraction_definition(abstraction);
            for port_map in &abstraction.port_maps {
                let Some(physical) = &port_map.physical_port else {
                    continue;
                };
                let Some(port) = component.port(&physical.name) else {
                    ctx.emit(errors::warn_unknown_port(
                        Location::document(&component.vlnv)
                            .at(format!("bus interface `{}`", bus.name)),
                        &self.gi.name,
                        &physical.name,
                    ));
                    continue;
                };
                let logical = port_map.logical_port.name.as_str();
                if logical.is_empty() || self.gi.assignment(&port.name).is_some() {
                    continue;
                }
                let port_bounds = bounds.port_map(port_map, port);

                if let Some(top_bus) = self.top_bus {
                    let external = top_physical_port(top_bus, &ctx.top_view.name, logical);
                    let binding = match external {
                        Some(external) => Binding::External(external.to_string()),
                        None => {
                            ctx.emit(errors::warn_unmapped_top_logical(
                                &ctx.top.vlnv,
                                &top_bus.name,
                                logical,
                            ));
                            Binding::Unconnected
                        }
                    };
                    self.gi.assign(
                        port.name.clone(),
                        PortAssignment::new(port_bounds, binding, AssignmentOrigin::BusInterface),
                    );
                    continue;
                }

                let wire_bounds = definition
                    .and_then(|d| d.wire_width(logical, bus.interface_mode))
                    .map(|width| bounds.from_width(width))
                    .filter(|b| !b.is_empty())
                    .unwrap_or_else(|| port_bounds.clone());
                let wire = self.wire_for(logical);
                self.wires[wire].connect(PortRef::new(&self.gi.name, &port.name), wire_bounds);
                self.gi.assign(
                    port.name.clone(),
                    PortAssignment::new(port_bounds, Binding::Wire(wire), AssignmentOrigin::BusInterface),
                );
            }
        }
    }

    /// Looks up the abstraction definition of `abstraction`, noting a miss.
    fn abstraction_definition(&self, abstraction: &AbstractionType) -> Option<&'a AbstractionDefinition> {
        let vlnv = abstraction.abstraction_ref.as_ref()?;
        let definition = self.ctx.library.abstraction_definition(vlnv);
        if definition.is_none() {
            self.ctx.emit(errors::note_unresolved_abstraction(
                &self.component.vlnv,
                &self.bus.name,
                vlnv,
            ));
        }
        definition
    }

    /// Returns the wire for `logical`, creating it on first use.
    fn wire_for(&mut self, logical: &str) -> WireId {
        let ic = &mut self.interconnections[self.id];
        if let Some(&wire) = ic.wires.get(logical) {
            return wire;
        }
        let wire = self
            .wires
            .alloc(Wire::new(ic.wire_name(logical), WireOwner::Interconnection(self.id)));
        ic.wires.insert(logical.to_string(), wire);
        wire
    }
}

/// The physical port a top bus interface maps `logical` to in `view`.
fn top_physical_port<'b>(top_bus: &'b BusInterface, view: &str, logical: &str) -> Option<&'b str> {
    top_bus
        .abstraction_types
        .iter()
        .filter(|t| t.applies_to_view(view))
        .flat_map(|t| t.port_maps.iter())
        .find(|pm| pm.logical_port.name == logical)
        .and_then(|pm| pm.physical_port.as_ref())
        .map(|p| p.name.as_str())
}

/// Reports interconnection endpoints that name an unknown instance, or a bus
/// interface the resolved instance's component does not have.
fn report_dangling_endpoints(ctx: &ElaborationContext<'_>, instances: &[GenerationInstance<'_>]) {
    let design = ctx.design;
    for connection in &design.interconnections {
        for endpoint in connection.endpoints() {
            let name = endpoint.component_ref.as_str();
            if design.instance(name).is_none() {
                ctx.emit(errors::warn_unknown_instance(&design.vlnv, &connection.name, name));
                continue;
            }
            let Some(gi) = instances.iter().find(|gi| gi.name == name) else {
                continue;
            };
            if gi.component.bus_interface(&endpoint.bus_ref).is_none() {
                ctx.emit(errors::warn_unknown_bus_interface(
                    &design.vlnv,
                    &connection.name,
                    name,
                    &endpoint.bus_ref,
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{bus, codes, connection, leaf, Fixture};
    use crate::ElaborateOptions;
    use weave_common::Vlnv;
    use weave_ipxact::{Direction, Document, HierInterface, InterfaceMode, Port, PortMap};
    use weave_ir::Bounds;

    fn apb_pair() -> Vec<Component> {
        vec![
            leaf(
                "master",
                vec![Port::new("paddr", Direction::Out).with_vector("31", "0")],
                vec![bus("m", InterfaceMode::Master, vec![PortMap::new("PADDR", "paddr")])],
            ),
            leaf(
                "slave",
                vec![Port::new("addr", Direction::In).with_vector("11", "0")],
                vec![bus("s", InterfaceMode::Slave, vec![PortMap::new("PADDR", "addr")])],
            ),
        ]
    }

    #[test]
    fn endpoints_share_interconnection_and_wire() {
        let mut fx = Fixture::new(apb_pair(), &[("u_m", "master"), ("u_s", "slave")]);
        fx.design
            .interconnections
            .push(connection("apb0", ("u_m", "m"), ("u_s", "s")));
        let result = fx.run(ElaborateOptions::default());
        let model = &result.model;

        assert!(result.diagnostics.is_empty());
        let m = model.instance("u_m").unwrap();
        let s = model.instance("u_s").unwrap();
        assert_eq!(m.interfaces["m"], s.interfaces["s"]);
        assert_eq!(model.interconnections.len(), 1);

        let wire = model.wire_of("u_m", "paddr").unwrap();
        assert_eq!(wire.name, "apb0_PADDR");
        assert_eq!(wire.ports.len(), 2);
        // The master contributed first.
        assert_eq!(wire.bounds, Bounds::new("31", "0"));
        assert_eq!(model.wire_of("u_s", "addr").unwrap().name, "apb0_PADDR");
        assert_eq!(
            s.assignment("addr").unwrap().bounds,
            Bounds::new("11", "0")
        );
        let ic = model.interconnection_of("u_s", "s").unwrap();
        assert_eq!(ic.bus_type, Some(Vlnv::new("acme", "bus", "apb", "1.0")));
    }

    #[test]
    fn second_connection_of_an_interface_is_ignored() {
        let mut fx = Fixture::new(apb_pair(), &[("u_m", "master"), ("u_s", "slave")]);
        fx.design
            .interconnections
            .push(connection("first", ("u_m", "m"), ("u_s", "s")));
        fx.design
            .interconnections
            .push(connection("second", ("u_s", "s"), ("u_m", "m")));
        let result = fx.run(ElaborateOptions::default());

        assert_eq!(codes(&result), vec![errors::W307, errors::W307]);
        assert_eq!(result.model.interconnections.len(), 1);
        assert_eq!(
            result.model.interconnection_of("u_s", "s").unwrap().name,
            "first"
        );
    }

    #[test]
    fn unconnected_interface_reported_when_enabled() {
        let fx = Fixture::new(apb_pair(), &[("u_m", "master")]);
        assert!(fx.run(ElaborateOptions::default()).diagnostics.is_empty());

        let result = fx.run(ElaborateOptions {
            warn_unconnected_interfaces: true,
        });
        assert_eq!(codes(&result), vec![errors::W308]);
        assert!(result.model.instance("u_m").unwrap().interfaces.is_empty());
    }

    #[test]
    fn dangling_endpoints_reported() {
        let mut fx = Fixture::new(apb_pair(), &[("u_m", "master"), ("u_s", "slave")]);
        fx.design
            .interconnections
            .push(connection("c0", ("u_m", "m"), ("ghost", "s")));
        fx.design
            .interconnections
            .push(connection("c1", ("u_s", "nope"), ("u_s", "s")));
        let result = fx.run(ElaborateOptions::default());
        assert_eq!(codes(&result), vec![errors::W303, errors::W304]);
    }

    #[test]
    fn hierarchical_interface_binds_top_ports() {
        let mut fx = Fixture::new(apb_pair(), &[("u_s", "slave")]);
        fx.top
            .ports
            .push(Port::new("s_paddr", Direction::In).with_vector("11", "0"));
        fx.top.bus_interfaces.push(bus(
            "top_if",
            InterfaceMode::Slave,
            vec![PortMap::new("PADDR", "s_paddr")],
        ));
        let mut c = connection("conn1", ("u_s", "s"), ("u_s", "s"));
        c.active_interfaces.clear();
        c.hier_interfaces.push(HierInterface {
            bus_ref: "top_if".to_string(),
        });
        fx.design.interconnections.push(c);

        let result = fx.run(ElaborateOptions::default());
        let model = &result.model;
        let ic = model.interconnection_of("u_s", "s").unwrap();
        assert_eq!(ic.top_interface.as_deref(), Some("top_if"));
        assert!(ic.wires.is_empty());
        assert!(model.wires.is_empty());
        let a = model.instance("u_s").unwrap().assignment("addr").unwrap();
        assert_eq!(a.external_name(), Some("s_paddr"));
    }

    #[test]
    fn unmapped_top_logical_leaves_port_unconnected() {
        let mut fx = Fixture::new(apb_pair(), &[("u_s", "slave")]);
        fx.top.ports.push(Port::new("pwrite", Direction::In));
        fx.top.bus_interfaces.push(bus(
            "top_if",
            InterfaceMode::Slave,
            vec![PortMap::new("PWRITE", "pwrite")],
        ));
        let mut c = connection("conn1", ("u_s", "s"), ("u_s", "s"));
        c.active_interfaces.clear();
        c.hier_interfaces.push(HierInterface {
            bus_ref: "top_if".to_string(),
        });
        fx.design.interconnections.push(c);

        let result = fx.run(ElaborateOptions::default());
        assert_eq!(codes(&result), vec![errors::W310]);
        let a = result.model.instance("u_s").unwrap().assignment("addr").unwrap();
        assert!(a.is_unconnected());
        assert_eq!(a.bounds, Bounds::new("11", "0"));
        assert_eq!(a.origin, AssignmentOrigin::BusInterface);
    }

    #[test]
    fn unknown_top_interface_wires_internally() {
        let mut fx = Fixture::new(apb_pair(), &[("u_s", "slave")]);
        let mut c = connection("conn1", ("u_s", "s"), ("u_s", "s"));
        c.active_interfaces.clear();
        c.hier_interfaces.push(HierInterface {
            bus_ref: "missing".to_string(),
        });
        fx.design.interconnections.push(c);

        let result = fx.run(ElaborateOptions::default());
        assert_eq!(codes(&result), vec![errors::W305]);
        assert_eq!(result.model.wire_of("u_s", "addr").unwrap().name, "conn1_PADDR");
    }

    #[test]
    fn missing_physical_port_reported() {
        let comp = leaf(
            "broken",
            Vec::new(),
            vec![bus("m", InterfaceMode::Master, vec![PortMap::new("PADDR", "paddr")])],
        );
        let mut fx = Fixture::new(
            vec![comp, apb_pair().remove(1)],
            &[("u_b", "broken"), ("u_s", "slave")],
        );
        fx.design
            .interconnections
            .push(connection("c0", ("u_b", "m"), ("u_s", "s")));
        let result = fx.run(ElaborateOptions::default());
        assert_eq!(codes(&result), vec![errors::W306]);
        // The slave still gets its wire.
        assert!(result.model.wire_of("u_s", "addr").is_some());
    }

    #[test]
    fn abstraction_width_sizes_wire() {
        let mut pair = apb_pair();
        let abstraction = Vlnv::new("acme", "bus", "apb.absDef", "1.0");
        for comp in &mut pair {
            comp.bus_interfaces[0].abstraction_types[0].abstraction_ref = Some(abstraction.clone());
        }
        let mut def = AbstractionDefinition::new(abstraction);
        def.ports.push(weave_ipxact::PortAbstraction {
            logical_name: "PADDR".to_string(),
            wire: Some(weave_ipxact::WireAbstraction {
                on_master: Some(weave_ipxact::WirePort::with_width("8")),
                on_slave: Some(weave_ipxact::WirePort::with_width("8")),
                on_system: Vec::new(),
            }),
        });
        let mut fx = Fixture::new(pair, &[("u_m", "master"), ("u_s", "slave")]);
        fx.library = fx.library.with(Document::AbstractionDefinition(def));
        fx.design
            .interconnections
            .push(connection("apb0", ("u_m", "m"), ("u_s", "s")));

        let result = fx.run(ElaborateOptions::default());
        assert!(result.diagnostics.is_empty());
        let wire = result.model.wire_of("u_m", "paddr").unwrap();
        assert_eq!(wire.bounds, Bounds::new("7", "0"));
        // Port assignments keep their physical range.
        let a = result.model.instance("u_m").unwrap().assignment("paddr").unwrap();
        assert_eq!(a.bounds, Bounds::new("31", "0"));
    }

    #[test]
    fn unresolved_abstraction_falls_back_to_port_bounds() {
        let mut pair = apb_pair();
        pair[0].bus_interfaces[0].abstraction_types[0].abstraction_ref =
            Some(Vlnv::new("acme", "bus", "gone", "1.0"));
        let mut fx = Fixture::new(pair, &[("u_m", "master"), ("u_s", "slave")]);
        fx.design
            .interconnections
            .push(connection("apb0", ("u_m", "m"), ("u_s", "s")));
        let result = fx.run(ElaborateOptions::default());
        assert_eq!(codes(&result), vec![errors::N300]);
        assert_eq!(
            result.model.wire_of("u_m", "paddr").unwrap().bounds,
            Bounds::new("31", "0")
        );
    }
}
