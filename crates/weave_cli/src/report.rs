//! Rendering of elaborated designs: an indented text report and the JSON
//! document written by `--format json`.

use std::fmt;

use serde::Serialize;
use weave_common::Vlnv;
use weave_elaborate::DesignElaboration;
use weave_ir::{Binding, Bounds, GenerationModel, TieOff, WireId};

/// Formats every design of a hierarchy, each under a header line.
///
/// ```text
/// design acme:soc:top.design:1.0 (module soc_0)
/// instance u_sub (acme:ip:sub:1.0, view hier, module sub_0)
/// ...
/// design acme:ip:sub.design:1.0 (module sub_0, instance u_sub)
/// ```
pub struct HierarchyReport<'d, 'a>(pub &'d [DesignElaboration<'a>]);

impl fmt::Display for HierarchyReport<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for design in self.0 {
            write!(f, "design {} (module {}", design.top.design.vlnv, design.module_name)?;
            if !design.is_top() {
                write!(f, ", instance {}", design.instance_path())?;
            }
            writeln!(f, ")")?;
            write!(f, "{}", TextReport(&design.elaboration.model))?;
        }
        Ok(())
    }
}

/// One design in the JSON document.
#[derive(Serialize)]
pub struct DesignEntry<'d, 'a> {
    /// Dotted instance path; empty for the top design.
    pub path: String,
    /// Unique module name.
    pub module: &'d str,
    /// The elaborated design.
    pub design: &'d Vlnv,
    /// Its generation model.
    pub model: &'d GenerationModel<'a>,
}

/// The JSON document: every design of the hierarchy, top first.
#[derive(Serialize)]
pub struct HierarchyDocument<'d, 'a> {
    /// The designs in elaboration order.
    pub designs: Vec<DesignEntry<'d, 'a>>,
}

impl<'d, 'a> HierarchyDocument<'d, 'a> {
    /// Collects the serializable view of `designs`.
    pub fn new(designs: &'d [DesignElaboration<'a>]) -> Self {
        Self {
            designs: designs
                .iter()
                .map(|d| DesignEntry {
                    path: d.instance_path(),
                    module: &d.module_name,
                    design: &d.top.design.vlnv,
                    model: &d.elaboration.model,
                })
                .collect(),
        }
    }
}

/// Formats a model as an indented text report.
///
/// ```text
/// instance u_uart (acme:ip:uart:1.0, view rtl, module uart_core)
///   interface apb -> apb0
///   port paddr [11:0] -> wire apb0_PADDR
/// interconnection apb0 (acme:bus:apb:1.0)
///   wire apb0_PADDR [31:0]: u_cpu.paddr, u_uart.paddr
/// ```
pub struct TextReport<'m, 'a>(pub &'m GenerationModel<'a>);

impl fmt::Display for TextReport<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let model = self.0;

        for gi in &model.instances {
            writeln!(
                f,
                "instance {} ({}, view {}, module {})",
                gi.name,
                gi.component.vlnv,
                gi.view.name,
                gi.module_name()
            )?;
            if let Some(design) = &gi.design {
                writeln!(f, "  design {design}")?;
            }
            for (bus, id) in &gi.interfaces {
                writeln!(f, "  interface {bus} -> {}", model.interconnections[*id].name)?;
            }
            for (port, assignment) in &gi.port_assignments {
                write!(f, "  port {port}{} -> ", spaced(&assignment.bounds))?;
                match &assignment.binding {
                    Binding::Wire(id) => writeln!(f, "wire {}", model.wires[*id].name)?,
                    Binding::External(name) => writeln!(f, "top port {name}")?,
                    Binding::TieOff(tie_off) => writeln!(f, "{}", tie_off_text(tie_off))?,
                    Binding::Unconnected => writeln!(f, "unconnected")?,
                }
            }
        }

        for (_, ic) in model.interconnections.iter() {
            write!(f, "interconnection {}", ic.name)?;
            if let Some(bus_type) = &ic.bus_type {
                write!(f, " ({bus_type})")?;
            }
            if let Some(top) = &ic.top_interface {
                write!(f, " -> top interface {top}")?;
            }
            writeln!(f)?;
            for wire in ic.wires.values() {
                wire_line(f, model, *wire)?;
            }
        }

        for (_, adhoc) in model.adhocs.iter() {
            write!(f, "ad-hoc {}", adhoc.name)?;
            if let Some(value) = &adhoc.tie_off {
                write!(f, " (tied {value})")?;
            }
            writeln!(f)?;
            wire_line(f, model, adhoc.wire)?;
        }

        for (port, tie_off) in &model.top_tie_offs {
            writeln!(f, "top port {port} {}", tie_off_text(tie_off))?;
        }
        Ok(())
    }
}

fn wire_line(f: &mut fmt::Formatter<'_>, model: &GenerationModel<'_>, id: WireId) -> fmt::Result {
    let wire = &model.wires[id];
    let ports: Vec<String> = wire.ports.iter().map(ToString::to_string).collect();
    writeln!(
        f,
        "  wire {}{}: {}",
        wire.name,
        spaced(&wire.bounds),
        ports.join(", ")
    )
}

fn spaced(bounds: &Bounds) -> String {
    if bounds.is_empty() {
        String::new()
    } else {
        format!(" {bounds}")
    }
}

fn tie_off_text(tie_off: &TieOff) -> String {
    match tie_off {
        TieOff::Value(value) => format!("tied to {value}"),
        TieOff::Open => "open".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_elaborate::{ElaborateOptions, TopDesign};
    use weave_ipxact::{Component, ComponentInstantiation, Design, MemoryLibrary, View};
    use weave_ir::{
        AssignmentOrigin, GenerationInstance, Interconnection, PortAssignment, PortRef, Wire,
        WireOwner,
    };

    #[test]
    fn renders_instances_and_wires() {
        let comp = Component::new(Vlnv::new("acme", "ip", "uart", "1.0"));
        let view = View::new("rtl", "verilog");
        let inst = ComponentInstantiation::new("verilog");

        let mut model = GenerationModel::new();
        let mut ic = Interconnection::new("apb0");
        ic.bus_type = Some(Vlnv::new("acme", "bus", "apb", "1.0"));
        let ic = model.interconnections.alloc(ic);
        let wire = model
            .wires
            .alloc(Wire::new("apb0_PADDR", WireOwner::Interconnection(ic)));
        model.interconnections[ic]
            .wires
            .insert("PADDR".to_string(), wire);
        model.wires[wire].connect(PortRef::new("u0", "paddr"), Bounds::new("31", "0"));

        let mut gi = GenerationInstance::new("u0", &comp, &view, &inst);
        gi.interfaces.insert("apb".to_string(), ic);
        gi.assign(
            "paddr",
            PortAssignment::new(Bounds::new("31", "0"), Binding::Wire(wire), AssignmentOrigin::BusInterface),
        );
        gi.assign(
            "test_mode",
            PortAssignment::new(
                Bounds::empty(),
                Binding::TieOff(TieOff::Value("1'b0".to_string())),
                AssignmentOrigin::AdHoc,
            ),
        );
        gi.assign(
            "pwrite",
            PortAssignment::new(Bounds::empty(), Binding::Unconnected, AssignmentOrigin::BusInterface),
        );
        model.instances.push(gi);
        model.top_tie_offs.insert("done".to_string(), TieOff::Open);

        let text = TextReport(&model).to_string();
        let expected = "\
instance u0 (acme:ip:uart:1.0, view rtl, module uart)
  interface apb -> apb0
  port paddr [31:0] -> wire apb0_PADDR
  port pwrite -> unconnected
  port test_mode -> tied to 1'b0
interconnection apb0 (acme:bus:apb:1.0)
  wire apb0_PADDR [31:0]: u0.paddr
top port done open
";
        assert_eq!(text, expected);
    }

    #[test]
    fn hierarchy_heads_each_design() {
        let top = Component::new(Vlnv::new("acme", "soc", "top", "1.0"));
        let view = View::new("hier", "verilog");
        let design = Design::new(Vlnv::new("acme", "soc", "top.design", "1.0"));
        let library = MemoryLibrary::new();
        let top = TopDesign {
            component: &top,
            view: &view,
            design: &design,
            configuration: None,
        };
        let designs = weave_elaborate::elaborate_hierarchy(top, &library, ElaborateOptions::default());

        assert_eq!(
            HierarchyReport(&designs).to_string(),
            "design acme:soc:top.design:1.0 (module top_0)\n"
        );
        let json = serde_json::to_value(HierarchyDocument::new(&designs)).unwrap();
        assert_eq!(json["designs"][0]["module"], "top_0");
        assert_eq!(json["designs"][0]["path"], "");
        assert!(json["designs"][0]["model"]["instances"]
            .as_array()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn empty_model_renders_nothing() {
        assert_eq!(TextReport(&GenerationModel::new()).to_string(), "");
    }
}
