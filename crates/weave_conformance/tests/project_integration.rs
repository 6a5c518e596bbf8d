//! End to end: documents on disk, project configuration, top resolution and
//! elaboration.

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use weave_conformance::*;
use weave_diagnostics::DiagnosticSink;
use weave_elaborate::{elaborate_top, resolve_top_design, ElaborateOptions};
use weave_ipxact::loader::{E300, E301};
use weave_ipxact::{
    AdHocConnection, DesignConfigurationInstantiation, DesignInstantiation, Direction, Document,
    InterfaceMode, Port,
};

/// A system whose top view references its design and configuration.
fn system() -> Soc {
    let mut soc = Soc::new()
        .component(apb_master("cpu"))
        .component(apb_slave("uart"))
        .instance("u_cpu", "cpu")
        .instance("u_uart", "uart")
        .instance("u_lost", "lost")
        .configure("u_uart", &[("addr_w", "16")])
        .top_port(Port::new("irq", Direction::Out))
        .top_port(Port::new("paddr", Direction::In).with_vector("31", "0"))
        .top_bus(bus_interface("top_if", InterfaceMode::Slave, &[("PADDR", "paddr")]))
        .connect("apb0", &[("u_cpu", "apb_m"), ("u_uart", "apb_s")])
        .adhoc(AdHocConnection::internal("irq", Vec::<(&str, &str)>::new())
            .with_external("irq")
            .with_tied_value("1'b0"));
    soc.configuration.design_ref = Some(soc.design.vlnv.clone());

    soc.top.design_instantiations.push(DesignInstantiation {
        name: "design".to_string(),
        design_ref: soc.design.vlnv.clone(),
    });
    soc.top
        .design_configuration_instantiations
        .push(DesignConfigurationInstantiation {
            name: "config".to_string(),
            design_configuration_ref: soc.configuration.vlnv.clone(),
        });
    soc.top.views[0].design_instantiation_ref = Some("design".to_string());
    soc.top.views[0].design_configuration_instantiation_ref = Some("config".to_string());
    soc
}

fn write(dir: &Path, file: &str, document: &Document) {
    fs::write(dir.join(file), serde_json::to_string_pretty(document).unwrap()).unwrap();
}

/// Writes every document of `soc` under `<root>/ipxact`.
fn write_library(root: &Path, soc: &Soc) {
    let lib = root.join("ipxact");
    fs::create_dir_all(&lib).unwrap();
    write(&lib, "soc.json", &Document::Component(soc.top.clone()));
    write(&lib, "soc.design.json", &Document::Design(soc.design.clone()));
    write(
        &lib,
        "soc.designcfg.json",
        &Document::DesignConfiguration(soc.configuration.clone()),
    );
    for (i, document) in soc.library.documents().enumerate() {
        write(&lib, &format!("ip{i}.json"), document);
    }
}

#[test]
fn on_disk_project_matches_in_memory_elaboration() {
    let soc = system();
    let tmp = TempDir::new().unwrap();
    write_library(tmp.path(), &soc);

    let config = make_config(&soc.top.vlnv, TOP_VIEW);
    let paths = weave_config::resolve_library_paths(tmp.path(), &config);
    let sink = DiagnosticSink::new();
    let library = weave_ipxact::load_library(&paths, &sink);
    assert!(sink.is_empty());
    assert_eq!(library.len(), 5);

    let top = resolve_top_design(
        &library,
        &config.top.component,
        &config.top.view,
        config.top.design.as_ref(),
        config.top.design_configuration.as_ref(),
        &sink,
    )
    .unwrap();
    assert_eq!(top.design.vlnv, soc.design.vlnv);
    assert_eq!(top.configuration.unwrap().vlnv, soc.configuration.vlnv);

    let from_disk = elaborate_top(top, &library, ElaborateOptions::from(&config.elaborate));
    let in_memory = soc.elaborate();
    assert_eq!(
        from_disk.model.fingerprint().unwrap(),
        in_memory.model.fingerprint().unwrap()
    );
    assert_eq!(codes(&from_disk), codes(&in_memory));
    assert_eq!(warning_count(&from_disk), 1);

    let uart = from_disk.model.instance("u_uart").unwrap();
    assert_eq!(uart.assignment("s_paddr").unwrap().bounds.to_string(), "[15:0]");
    assert!(from_disk.model.top_tie_offs.contains_key("irq"));
}

#[test]
fn broken_files_are_reported_and_skipped() {
    let soc = system();
    let tmp = TempDir::new().unwrap();
    write_library(tmp.path(), &soc);
    let lib = tmp.path().join("ipxact");
    fs::write(lib.join("broken.json"), "{ not json").unwrap();
    write(&lib, "zz_duplicate.json", &Document::Component(apb_master("cpu")));

    let config = make_config(&soc.top.vlnv, TOP_VIEW);
    let sink = DiagnosticSink::new();
    let library =
        weave_ipxact::load_library(&weave_config::resolve_library_paths(tmp.path(), &config), &sink);
    let found: Vec<_> = sink.diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(found, vec![E300, E301]);
    assert_eq!(library.len(), 5);

    // The rest of the library still elaborates.
    let top = resolve_top_design(&library, &config.top.component, TOP_VIEW, None, None, &sink)
        .unwrap();
    let result = elaborate_top(top, &library, ElaborateOptions::default());
    assert_eq!(result.model.instances.len(), 2);
}

#[test]
fn explicit_design_overrides_top_view() {
    let soc = system();
    let tmp = TempDir::new().unwrap();
    write_library(tmp.path(), &soc);

    let mut alternate = soc.design.clone();
    alternate.vlnv = vlnv("soc.alt");
    alternate.component_instances.truncate(1);
    alternate.interconnections.clear();
    alternate.ad_hoc_connections.clear();
    write(&tmp.path().join("ipxact"), "soc.alt.json", &Document::Design(alternate));

    let mut config = make_config(&soc.top.vlnv, TOP_VIEW);
    config.top.design = Some(vlnv("soc.alt"));
    let sink = DiagnosticSink::new();
    let library =
        weave_ipxact::load_library(&weave_config::resolve_library_paths(tmp.path(), &config), &sink);
    let top = resolve_top_design(
        &library,
        &config.top.component,
        &config.top.view,
        config.top.design.as_ref(),
        None,
        &sink,
    )
    .unwrap();
    assert_eq!(top.design.vlnv, vlnv("soc.alt"));

    let result = elaborate_top(top, &library, ElaborateOptions::default());
    let names: Vec<_> = result.model.instances.iter().map(|gi| gi.name.as_str()).collect();
    assert_eq!(names, vec!["u_cpu"]);
}

#[test]
fn missing_top_component_is_an_error() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("ipxact")).unwrap();
    let config = make_config(&vlnv("nothing"), TOP_VIEW);
    let sink = DiagnosticSink::new();
    let library =
        weave_ipxact::load_library(&weave_config::resolve_library_paths(tmp.path(), &config), &sink);
    assert!(library.is_empty());

    let top = resolve_top_design(&library, &config.top.component, TOP_VIEW, None, None, &sink);
    assert!(top.is_none());
    assert!(sink.has_errors());
}
