//! The generation model produced by one elaboration pass.

use serde::Serialize;
use std::collections::BTreeMap;
use weave_common::ContentHash;

use crate::adhoc::AdHoc;
use crate::arena::Arena;
use crate::assignment::TieOff;
use crate::ids::{AdHocId, InterconnectionId, WireId};
use crate::instance::GenerationInstance;
use crate::interconnection::Interconnection;
use crate::wire::Wire;

/// The flat, resolved view of one design.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationModel<'a> {
    /// Resolved instances, in design order.
    pub instances: Vec<GenerationInstance<'a>>,
    /// Shared interconnections, in order of first reference.
    pub interconnections: Arena<InterconnectionId, Interconnection>,
    /// Every wire, owned by an interconnection or a bundle.
    pub wires: Arena<WireId, Wire>,
    /// Ad-hoc bundles.
    pub adhocs: Arena<AdHocId, AdHoc>,
    /// Constants driven onto top component ports.
    pub top_tie_offs: BTreeMap<String, TieOff>,
}

impl<'a> GenerationModel<'a> {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds an instance by name.
    pub fn instance(&self, name: &str) -> Option<&GenerationInstance<'a>> {
        self.instances.iter().find(|i| i.name == name)
    }

    /// Finds an interconnection by its source connection name.
    pub fn interconnection_named(&self, name: &str) -> Option<(InterconnectionId, &Interconnection)> {
        self.interconnections.iter().find(|(_, ic)| ic.name == name)
    }

    /// Returns the interconnection that bus interface `bus` of `instance`
    /// takes part in.
    pub fn interconnection_of(&self, instance: &str, bus: &str) -> Option<&Interconnection> {
        let id = *self.instance(instance)?.interfaces.get(bus)?;
        Some(&self.interconnections[id])
    }

    /// Returns the wire a port is bound to.
    pub fn wire_of(&self, instance: &str, port: &str) -> Option<&Wire> {
        let id = self.instance(instance)?.assignment(port)?.wire()?;
        Some(&self.wires[id])
    }

    /// Returns a hash of the serialized model.
    ///
    /// Two passes over the same inputs produce the same fingerprint.
    pub fn fingerprint(&self) -> Result<ContentHash, serde_json::Error> {
        let sections = [
            serde_json::to_vec(&self.instances)?,
            serde_json::to_vec(&self.interconnections)?,
            serde_json::to_vec(&self.wires)?,
            serde_json::to_vec(&self.adhocs)?,
            serde_json::to_vec(&self.top_tie_offs)?,
        ];
        Ok(ContentHash::from_parts(sections.iter().map(Vec::as_slice)))
    }
}
