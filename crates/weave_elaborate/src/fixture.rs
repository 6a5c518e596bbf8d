//! Builders for small elaboration fixtures.

use weave_common::Vlnv;
use weave_diagnostics::DiagnosticCode;
use weave_ipxact::{
    AbstractionType, ActiveInterface, BusInterface, Component, ComponentInstance,
    ComponentInstantiation, Design, DesignConfiguration, Document, Interconnection, InterfaceMode,
    MemoryLibrary, Port, PortMap, View,
};

use crate::{elaborate, ElaborateOptions, Elaboration};

pub(crate) fn v(name: &str) -> Vlnv {
    Vlnv::new("acme", "ip", name, "1.0")
}

pub(crate) fn bus(name: &str, mode: InterfaceMode, maps: Vec<PortMap>) -> BusInterface {
    BusInterface {
        name: name.to_string(),
        bus_type: Vlnv::new("acme", "bus", "apb", "1.0"),
        interface_mode: mode,
        abstraction_types: vec![AbstractionType {
            abstraction_ref: None,
            view_refs: Vec::new(),
            port_maps: maps,
        }],
    }
}

pub(crate) fn leaf(name: &str, ports: Vec<Port>, buses: Vec<BusInterface>) -> Component {
    let mut c = Component::new(v(name));
    c.ports = ports;
    c.bus_interfaces = buses;
    c.views.push(View::new("rtl", "verilog"));
    c.component_instantiations
        .push(ComponentInstantiation::new("verilog"));
    c
}

pub(crate) fn connection(name: &str, a: (&str, &str), b: (&str, &str)) -> Interconnection {
    Interconnection {
        name: name.to_string(),
        start_interface: ActiveInterface::new(a.0, a.1),
        active_interfaces: vec![ActiveInterface::new(b.0, b.1)],
        hier_interfaces: Vec::new(),
    }
}

pub(crate) struct Fixture {
    pub(crate) top: Component,
    pub(crate) top_view: View,
    pub(crate) design: Design,
    pub(crate) config: DesignConfiguration,
    pub(crate) library: MemoryLibrary,
}

impl Fixture {
    pub(crate) fn new(components: Vec<Component>, instances: &[(&str, &str)]) -> Self {
        let mut design = Design::new(v("top.design"));
        let mut config = DesignConfiguration::new(v("top.cfg"));
        for (inst, comp) in instances {
            design
                .component_instances
                .push(ComponentInstance::new(*inst, v(comp)));
            config = config.with_active_view(*inst, "rtl");
        }
        let mut library = MemoryLibrary::new();
        for c in components {
            library = library.with(Document::Component(c));
        }
        Self {
            top: Component::new(v("top")),
            top_view: View::new("hier", "top"),
            design,
            config,
            library,
        }
    }

    pub(crate) fn run(&self, options: ElaborateOptions) -> Elaboration<'_> {
        elaborate(
            &self.top,
            &self.top_view,
            &self.design,
            Some(&self.config),
            &self.library,
            options,
        )
    }
}

pub(crate) fn codes(result: &Elaboration<'_>) -> Vec<DiagnosticCode> {
    result.diagnostics.iter().map(|d| d.code).collect()
}
