//! Ad-hoc connections: point-to-point port wiring outside bus interfaces.
//!
//! Connections without an external reference are grouped into bundles: two
//! connections belong to the same bundle when they share an internal port
//! reference, directly or through a chain of other connections. Each bundle
//! owns one wire. Connections with an external reference bind their internal
//! ports straight to a top-level port, or tie the top port off when there is
//! nothing inside to connect.
//!
//! Ad-hoc connections are applied after bus interfaces and win over them: a
//! port that is already bound is rebound, with a warning.

use std::collections::HashMap;

use petgraph::unionfind::UnionFind;
use weave_diagnostics::Location;
use weave_ipxact::{AdHocConnection, Design, Direction, InternalPortReference, Port};
use weave_ir::{
    AdHoc, AdHocId, Arena, AssignmentOrigin, Binding, GenerationInstance, GenerationModel,
    PortAssignment, PortRef, TieOff, Wire, WireId, WireOwner,
};

use crate::context::ElaborationContext;
use crate::errors;

/// Ad-hoc connections merged through shared internal ports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle<'d> {
    /// The name of the first connection in the bundle.
    pub name: &'d str,
    /// Every distinct internal port, in order of first appearance.
    pub ports: Vec<&'d InternalPortReference>,
    /// The first non-empty tied value among the connections.
    pub tie_off: Option<&'d str>,
}

/// Resolves a tied value for `port`.
///
/// `required` is the direction a port must have to be driven by a constant;
/// inout ports always qualify. Returns `None` for an empty value.
pub fn connect_tie_off(value: &str, port: &Port, required: Direction) -> Option<TieOff> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if port.direction != required && port.direction != Direction::InOut {
        return Some(TieOff::Open);
    }
    if value.eq_ignore_ascii_case("default") {
        return Some(match &port.default_value {
            Some(default) if !default.trim().is_empty() => TieOff::Value(default.trim().to_string()),
            _ => TieOff::Open,
        });
    }
    if value.eq_ignore_ascii_case("open") {
        return Some(TieOff::Open);
    }
    Some(TieOff::Value(value.to_string()))
}

/// Groups the internal-only ad-hoc connections of `design` into bundles.
///
/// Membership does not depend on declaration order; bundles are ordered by
/// their first connection.
pub fn group_internal(design: &Design) -> Vec<Bundle<'_>> {
    let internal: Vec<&AdHocConnection> = design
        .ad_hoc_connections
        .iter()
        .filter(|c| !c.is_external() && !c.internal_port_references.is_empty())
        .collect();

    let mut keys: HashMap<&InternalPortReference, usize> = HashMap::new();
    for r in internal.iter().copied().flat_map(|c| &c.internal_port_references) {
        let next = keys.len();
        keys.entry(r).or_insert(next);
    }

    let mut sets = UnionFind::<usize>::new(keys.len());
    for connection in &internal {
        let mut refs = connection.internal_port_references.iter();
        if let Some(first) = refs.next() {
            for other in refs {
                sets.union(keys[first], keys[other]);
            }
        }
    }

    let mut bundles: Vec<Bundle<'_>> = Vec::new();
    let mut by_root: HashMap<usize, usize> = HashMap::new();
    for connection in internal {
        let root = sets.find(keys[&connection.internal_port_references[0]]);
        let index = *by_root.entry(root).or_insert_with(|| {
            bundles.push(Bundle {
                name: &connection.name,
                ports: Vec::new(),
                tie_off: None,
            });
            bundles.len() - 1
        });
        let bundle = &mut bundles[index];
        for r in &connection.internal_port_references {
            if !bundle.ports.contains(&r) {
                bundle.ports.push(r);
            }
        }
        if bundle.tie_off.is_none() {
            bundle.tie_off = connection
                .tied_value
                .as_deref()
                .filter(|v| !v.trim().is_empty());
        }
    }
    bundles
}

/// Builds the ad-hoc bundles, port assignments and top tie-offs of `model`.
pub fn resolve_adhocs<'a>(ctx: &ElaborationContext<'a>, model: &mut GenerationModel<'a>) {
    report_dangling_references(ctx, &model.instances);
    resolve_bundles(ctx, model);
    resolve_external(ctx, model);
}

fn resolve_bundles<'a>(ctx: &ElaborationContext<'a>, model: &mut GenerationModel<'a>) {
    let GenerationModel {
        instances,
        wires,
        adhocs,
        ..
    } = model;

    let mut membership: HashMap<(&str, &str), AdHocId> = HashMap::new();
    for bundle in group_internal(ctx.design) {
        let id = adhocs.next_id();
        let wire = wires.alloc(Wire::new(bundle.name, WireOwner::AdHoc(id)));
        for &r in &bundle.ports {
            membership
                .entry((r.component_ref.as_str(), r.port_ref.as_str()))
                .or_insert(id);
        }
        adhocs.alloc(AdHoc {
            name: bundle.name.to_string(),
            wire,
            ports: bundle
                .ports
                .iter()
                .map(|r| PortRef::new(&r.component_ref, &r.port_ref))
                .collect(),
            tie_off: bundle.tie_off.map(str::to_string),
        });
    }
    if membership.is_empty() {
        return;
    }

    for gi in instances.iter_mut() {
        let component = gi.component;
        let bounds = ctx.bounds(&gi.name);
        for port in &component.ports {
            let Some(&id) = membership.get(&(gi.name.as_str(), port.name.as_str())) else {
                continue;
            };
            let adhoc = &adhocs[id];
            let port_bounds = bounds.physical(port);
            let tie_off = adhoc
                .tie_off
                .as_deref()
                .and_then(|value| connect_tie_off(value, port, Direction::In));
            let binding = match tie_off {
                Some(tie_off) => Binding::TieOff(tie_off),
                None => {
                    wires[adhoc.wire].connect(
                        PortRef::new(&gi.name, &port.name),
                        port_bounds.clone(),
                    );
                    Binding::Wire(adhoc.wire)
                }
            };
            rebind(
                ctx,
                gi,
                wires,
                &port.name,
                PortAssignment::new(port_bounds, binding, AssignmentOrigin::AdHoc),
                &adhoc.name,
            );
        }
    }
}

fn resolve_external<'a>(ctx: &ElaborationContext<'a>, model: &mut GenerationModel<'a>) {
    let design = ctx.design;
    for connection in design.ad_hoc_connections.iter().filter(|c| c.is_external()) {
        let top_ports: Vec<&Port> = connection
            .external_port_references
            .iter()
            .filter_map(|r| {
                let port = ctx.top.port(&r.port_ref);
                if port.is_none() {
                    ctx.emit(errors::warn_unknown_top_port(
                        &design.vlnv,
                        &connection.name,
                        &r.port_ref,
                    ));
                }
                port
            })
            .collect();

        if connection.internal_port_references.is_empty() {
            let value = connection.tied_value.as_deref().unwrap_or_default();
            for port in top_ports {
                if let Some(tie_off) = connect_tie_off(value, port, Direction::Out) {
                    model
                        .top_tie_offs
                        .entry(port.name.clone())
                        .or_insert(tie_off);
                }
            }
            continue;
        }

        // Each external reference rebinds the internal ports; the last stands.
        let Some((external, superseded)) = top_ports.split_last() else {
            continue;
        };
        if !superseded.is_empty() {
            let names: Vec<&str> = superseded.iter().map(|p| p.name.as_str()).collect();
            ctx.emit(errors::warn_several_top_ports(
                &design.vlnv,
                &connection.name,
                &external.name,
                &names,
            ));
        }

        let GenerationModel { instances, wires, .. } = &mut *model;
        for r in &connection.internal_port_references {
            let Some(gi) = instances.iter_mut().find(|gi| gi.name == r.component_ref) else {
                continue;
            };
            let component = gi.component;
            let Some(port) = component.port(&r.port_ref) else {
                continue;
            };
            let port_bounds = ctx.bounds(&gi.name).physical(port);
            rebind(
                ctx,
                gi,
                wires,
                &port.name,
                PortAssignment::new(
                    port_bounds,
                    Binding::External(external.name.clone()),
                    AssignmentOrigin::AdHoc,
                ),
                &connection.name,
            );
        }
    }
}

/// Binds a port for an ad-hoc connection, replacing an earlier binding.
///
/// A replaced wire binding also leaves the wire. Replacing a port that a bus
/// interface left unconnected is silent.
fn rebind(
    ctx: &ElaborationContext<'_>,
    gi: &mut GenerationInstance<'_>,
    wires: &mut Arena<WireId, Wire>,
    port: &str,
    assignment: PortAssignment,
    connection: &str,
) {
    let Some(replaced) = gi.rebind(port, assignment) else {
        return;
    };
    if let Binding::Wire(old) = replaced.binding {
        wires[old].disconnect(&PortRef::new(&gi.name, port));
    }
    if !replaced.is_unconnected() {
        ctx.emit(errors::warn_port_rebound(
            &ctx.design.vlnv,
            &gi.name,
            port,
            connection,
            &replaced.origin.to_string(),
        ));
    }
}

/// Reports internal references to unknown instances, and to ports a resolved
/// instance's component does not have.
fn report_dangling_references(ctx: &ElaborationContext<'_>, instances: &[GenerationInstance<'_>]) {
    let design = ctx.design;
    for connection in &design.ad_hoc_connections {
        for r in &connection.internal_port_references {
            let name = r.component_ref.as_str();
            if design.instance(name).is_none() {
                ctx.emit(errors::warn_unknown_instance(&design.vlnv, &connection.name, name));
                continue;
            }
            let Some(gi) = instances.iter().find(|gi| gi.name == name) else {
                continue;
            };
            if gi.component.port(&r.port_ref).is_none() {
                ctx.emit(errors::warn_unknown_port(
                    Location::document(&design.vlnv)
                        .at(format!("ad-hoc connection `{}`", connection.name)),
                    name,
                    &r.port_ref,
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
    use weave_ipxact::{InterfaceMode, PortMap};
    use weave_ir::Bounds;

    fn port(direction: Direction) -> Port {
        Port::new("p", direction)
    }

    #[test]
    fn tie_off_values() {
        let input = port(Direction::In);
        assert_eq!(connect_tie_off("", &input, Direction::In), None);
        assert_eq!(
            connect_tie_off("1'b0", &input, Direction::In),
            Some(TieOff::Value("1'b0".to_string()))
        );
        assert_eq!(connect_tie_off("OPEN", &input, Direction::In), Some(TieOff::Open));
    }

    #[test]
    fn tie_off_default() {
        let with_default = port(Direction::In).with_default("4'hf");
        assert_eq!(
            connect_tie_off("default", &with_default, Direction::In),
            Some(TieOff::Value("4'hf".to_string()))
        );
        assert_eq!(
            connect_tie_off("Default", &port(Direction::In), Direction::In),
            Some(TieOff::Open)
        );
    }

    #[test]
    fn tie_off_direction() {
        assert_eq!(
            connect_tie_off("0", &port(Direction::Out), Direction::In),
            Some(TieOff::Open)
        );
        assert_eq!(
            connect_tie_off("0", &port(Direction::InOut), Direction::In),
            Some(TieOff::Value("0".to_string()))
        );
        assert_eq!(
            connect_tie_off("0", &port(Direction::Out), Direction::Out),
            Some(TieOff::Value("0".to_string()))
        );
    }

    fn chain_design(order: &[usize]) -> Design {
        let all = [
            AdHocConnection::internal("a", [("u0", "x"), ("u1", "y")]),
            AdHocConnection::internal("b", [("u2", "z"), ("u3", "w")]),
            AdHocConnection::internal("c", [("u1", "y"), ("u2", "z")]),
        ];
        let mut design = Design::new(crate::fixture::v("d"));
        for &i in order {
            design.ad_hoc_connections.push(all[i].clone());
        }
        design
    }

    fn partition(design: &Design) -> Vec<Vec<String>> {
        let mut groups: Vec<Vec<String>> = group_internal(design)
            .iter()
            .map(|b| {
                let mut ports: Vec<String> = b
                    .ports
                    .iter()
                    .map(|r| format!("{}.{}", r.component_ref, r.port_ref))
                    .collect();
                ports.sort();
                ports
            })
            .collect();
        groups.sort();
        groups
    }

    #[test]
    fn grouping_is_order_independent() {
        // `a` and `b` only meet through `c`, which comes last.
        let forward = chain_design(&[0, 1, 2]);
        let bundles = group_internal(&forward);
        assert_eq!(bundles.len(), 1);
        assert_eq!(bundles[0].name, "a");
        assert_eq!(bundles[0].ports.len(), 4);

        for order in [[2, 1, 0], [1, 0, 2], [1, 2, 0]] {
            assert_eq!(partition(&chain_design(&order)), partition(&forward));
        }
        assert_eq!(group_internal(&chain_design(&[1, 0, 2]))[0].name, "b");
    }

    #[test]
    fn disjoint_connections_stay_apart() {
        let design = chain_design(&[0, 1]);
        let bundles = group_internal(&design);
        let names: Vec<_> = bundles.iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn bundle_takes_first_tied_value() {
        let mut design = chain_design(&[0, 2]);
        design.ad_hoc_connections[0].tied_value = Some(" ".to_string());
        design.ad_hoc_connections[1].tied_value = Some("1".to_string());
        assert_eq!(group_internal(&design)[0].tie_off, Some("1"));
    }

    #[test]
    fn external_connections_not_grouped() {
        let mut design = chain_design(&[0]);
        design
            .ad_hoc_connections
            .push(AdHocConnection::internal("ext", [("u0", "x")]).with_external("pad"));
        assert_eq!(group_internal(&design).len(), 1);
    }

    fn three_leaves() -> Fixture {
        let comps = vec![
            leaf(
                "drv",
                vec![Port::new("o", Direction::Out).with_vector("3", "0")],
                Vec::new(),
            ),
            leaf(
                "rcv",
                vec![
                    Port::new("i", Direction::In).with_vector("7", "0"),
                    Port::new("en", Direction::In),
                ],
                Vec::new(),
            ),
        ];
        Fixture::new(comps, &[("u_d", "drv"), ("u_r0", "rcv"), ("u_r1", "rcv")])
    }

    #[test]
    fn bundle_wire_drives_every_port() {
        let mut fx = three_leaves();
        fx.design.ad_hoc_connections.push(AdHocConnection::internal(
            "net",
            [("u_d", "o"), ("u_r0", "i"), ("u_r1", "i")],
        ));
        let result = fx.run(ElaborateOptions::default());
        let model = &result.model;

        assert!(result.diagnostics.is_empty());
        assert_eq!(model.adhocs.len(), 1);
        let adhoc = model.adhocs.values().next().unwrap();
        let wire = &model.wires[adhoc.wire];
        assert_eq!(wire.name, "net");
        assert_eq!(wire.ports.len(), 3);
        // Ports are visited in instance order, so the driver sizes the wire.
        assert_eq!(wire.bounds, Bounds::new("3", "0"));
        let a = model.instance("u_r1").unwrap().assignment("i").unwrap();
        assert_eq!(a.wire(), Some(adhoc.wire));
        assert_eq!(a.bounds, Bounds::new("7", "0"));
        assert_eq!(a.origin, AssignmentOrigin::AdHoc);
    }

    #[test]
    fn tied_bundle_binds_inputs_to_constant() {
        let mut fx = three_leaves();
        fx.design.ad_hoc_connections.push(
            AdHocConnection::internal("tie", [("u_d", "o"), ("u_r0", "en")]).with_tied_value("1'b1"),
        );
        let result = fx.run(ElaborateOptions::default());
        let model = &result.model;

        let en = model.instance("u_r0").unwrap().assignment("en").unwrap();
        assert_eq!(en.tie_off(), Some(&TieOff::Value("1'b1".to_string())));
        let o = model.instance("u_d").unwrap().assignment("o").unwrap();
        assert_eq!(o.tie_off(), Some(&TieOff::Open));
        assert!(model.wires.values().all(|w| w.ports.is_empty()));
    }

    #[test]
    fn external_reference_binds_without_wire() {
        let mut fx = three_leaves();
        fx.top.ports.push(Port::new("irq", Direction::Out));
        fx.design.ad_hoc_connections.push(
            AdHocConnection::internal("pass", [("u_d", "o"), ("u_r0", "i")]).with_external("irq"),
        );
        let result = fx.run(ElaborateOptions::default());
        let model = &result.model;

        assert!(result.diagnostics.is_empty());
        assert!(model.adhocs.is_empty());
        assert!(model.wires.is_empty());
        for (inst, port) in [("u_d", "o"), ("u_r0", "i")] {
            let a = model.instance(inst).unwrap().assignment(port).unwrap();
            assert_eq!(a.external_name(), Some("irq"));
        }
    }

    #[test]
    fn top_port_tie_off() {
        let mut fx = three_leaves();
        fx.top.ports.push(Port::new("done", Direction::Out));
        fx.top.ports.push(Port::new("start", Direction::In));
        let mut tie = AdHocConnection::internal("tie", [("u_d", "o")]).with_tied_value("0");
        tie.internal_port_references.clear();
        fx.design
            .ad_hoc_connections
            .push(tie.clone().with_external("done"));
        fx.design
            .ad_hoc_connections
            .push(tie.clone().with_external("start"));
        fx.design.ad_hoc_connections.push(tie.with_external("nope"));

        let result = fx.run(ElaborateOptions::default());
        assert_eq!(codes(&result), vec![errors::W309]);
        let ties = &result.model.top_tie_offs;
        assert_eq!(ties["done"], TieOff::Value("0".to_string()));
        assert_eq!(ties["start"], TieOff::Open);
    }

    #[test]
    fn external_reference_rebinds_bundle_port() {
        let mut fx = three_leaves();
        fx.top.ports.push(Port::new("pad", Direction::In));
        fx.design.ad_hoc_connections.push(AdHocConnection::internal(
            "net",
            [("u_d", "o"), ("u_r0", "i")],
        ));
        fx.design.ad_hoc_connections.push(
            AdHocConnection::internal("from_pad", [("u_r0", "i")]).with_external("pad"),
        );
        let result = fx.run(ElaborateOptions::default());
        assert_eq!(codes(&result), vec![errors::W311]);
        assert_eq!(
            result.diagnostics[0].notes,
            vec!["the earlier ad-hoc binding is replaced"]
        );
        let a = result.model.instance("u_r0").unwrap().assignment("i").unwrap();
        assert_eq!(a.external_name(), Some("pad"));
        let wire = result.model.wire_of("u_d", "o").unwrap();
        assert_eq!(wire.ports, vec![PortRef::new("u_d", "o")]);
    }

    #[test]
    fn last_top_port_wins() {
        let mut fx = three_leaves();
        fx.top.ports.push(Port::new("a", Direction::In).with_vector("7", "0"));
        fx.top.ports.push(Port::new("b", Direction::In).with_vector("7", "0"));
        fx.design.ad_hoc_connections.push(
            AdHocConnection::internal("ext", [("u_r0", "i")])
                .with_external("a")
                .with_external("b"),
        );
        let result = fx.run(ElaborateOptions::default());
        assert_eq!(codes(&result), vec![errors::W313]);
        assert_eq!(result.diagnostics[0].notes, vec!["superseded: a"]);
        let a = result.model.instance("u_r0").unwrap().assignment("i").unwrap();
        assert_eq!(a.external_name(), Some("b"));
    }

    #[test]
    fn adhoc_rebinds_bus_port_and_leaves_wire() {
        let comps = vec![
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
        ];
        let mut fx = Fixture::new(comps, &[("u_m", "master"), ("u_s", "slave")]);
        fx.top.ports.push(Port::new("addr_i", Direction::In).with_vector("11", "0"));
        fx.design
            .interconnections
            .push(connection("apb0", ("u_m", "m"), ("u_s", "s")));
        fx.design.ad_hoc_connections.push(
            AdHocConnection::internal("addr_pad", [("u_s", "addr")]).with_external("addr_i"),
        );

        let result = fx.run(ElaborateOptions::default());
        assert_eq!(codes(&result), vec![errors::W311]);
        assert!(result.diagnostics[0].message.contains("`addr_pad`"));
        let model = &result.model;
        let a = model.instance("u_s").unwrap().assignment("addr").unwrap();
        assert_eq!(a.external_name(), Some("addr_i"));
        assert_eq!(a.origin, AssignmentOrigin::AdHoc);
        let wire = model.wire_of("u_m", "paddr").unwrap();
        assert_eq!(wire.ports, vec![PortRef::new("u_m", "paddr")]);
    }

    #[test]
    fn dangling_references_reported() {
        let mut fx = three_leaves();
        fx.design.ad_hoc_connections.push(AdHocConnection::internal(
            "net",
            [("u_d", "o"), ("ghost", "i"), ("u_r0", "bogus")],
        ));
        let result = fx.run(ElaborateOptions::default());
        assert_eq!(codes(&result), vec![errors::W303, errors::W306]);
        let wire = result.model.wire_of("u_d", "o").unwrap();
        assert_eq!(wire.ports, vec![PortRef::new("u_d", "o")]);
    }
}
