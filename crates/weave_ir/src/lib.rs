//! The generation model: the flat, resolved result of design elaboration.
//!
//! A [`GenerationModel`] lists every successfully resolved instance of a
//! design together with the shared [`Interconnection`]s, [`Wire`]s and
//! [`AdHoc`] bundles its ports are bound to. Shared records live in
//! [`Arena`]s and are referred to by typed ids, so two instances joined by
//! the same connection hold the same [`InterconnectionId`].
//!
//! HDL emitters consume this model read-only.

#![warn(missing_docs)]

pub mod adhoc;
pub mod arena;
pub mod assignment;
pub mod bounds;
pub mod ids;
pub mod instance;
pub mod interconnection;
pub mod model;
pub mod wire;

pub use adhoc::AdHoc;
pub use arena::{Arena, ArenaId};
pub use assignment::{AssignmentOrigin, Binding, PortAssignment, TieOff};
pub use bounds::Bounds;
pub use ids::{AdHocId, InterconnectionId, WireId};
pub use instance::GenerationInstance;
pub use interconnection::Interconnection;
pub use model::GenerationModel;
pub use wire::{PortRef, Wire, WireOwner};
