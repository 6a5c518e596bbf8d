//! Read-only IP-XACT document model consumed by elaboration.
//!
//! Covers the subset of IP-XACT that design elaboration reads: components
//! (ports, bus interfaces, views, instantiations, parameters), designs
//! (instances, interconnections, ad-hoc connections), design configurations,
//! and abstraction definitions. Documents are looked up by [`Vlnv`] through the
//! [`Library`] trait.
//!
//! [`Vlnv`]: weave_common::Vlnv

#![warn(missing_docs)]

pub mod abstraction;
pub mod component;
pub mod design;
pub mod design_config;
pub mod document;
pub mod library;
pub mod loader;
pub mod parameter;

pub use abstraction::{AbstractionDefinition, PortAbstraction, WireAbstraction, WirePort};
pub use component::{
    AbstractionType, BusInterface, Component, ComponentInstantiation, DesignConfigurationInstantiation,
    DesignInstantiation, Direction, InterfaceMode, LogicalPort, PhysicalPort, Port, PortMap, Range,
    View,
};
pub use design::{
    ActiveInterface, AdHocConnection, ComponentInstance, Design, ExternalPortReference,
    HierInterface, Interconnection, InternalPortReference,
};
pub use design_config::{DesignConfiguration, ViewConfiguration};
pub use document::{Document, DocumentKind};
pub use library::{Library, LibraryError, MemoryLibrary};
pub use loader::load_library;
pub use parameter::{ConfigurableElementValue, Parameter};
