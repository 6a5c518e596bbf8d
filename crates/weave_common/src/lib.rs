//! Shared foundational types used across the weave IP-XACT toolchain.
//!
//! This crate provides the [`Vlnv`] document identifier and [`ContentHash`]
//! used to fingerprint generation models.

#![warn(missing_docs)]

pub mod hash;
pub mod vlnv;

pub use hash::ContentHash;
pub use vlnv::{ParseVlnvError, Vlnv};
