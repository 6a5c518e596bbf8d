//! Locations inside IP-XACT documents that diagnostics point at.

use serde::{Deserialize, Serialize};
use std::fmt;
use weave_common::Vlnv;

/// A position inside the document graph: a document and an element path in it.
///
/// IP-XACT inputs carry no byte offsets once loaded, so a location names the
/// owning document and a human-readable element path such as
/// `instance u0 / bus interface axi`.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Location {
    /// The document the element lives in, if known.
    pub document: Option<Vlnv>,
    /// The element path within the document.
    pub element: Vec<String>,
}

impl Location {
    /// A location used when nothing more specific is available.
    pub const NONE: Location = Location {
        document: None,
        element: Vec::new(),
    };

    /// Creates a location pointing at a whole document.
    pub fn document(vlnv: &Vlnv) -> Self {
        Self {
            document: Some(vlnv.clone()),
            element: Vec::new(),
        }
    }

    /// Appends one element path segment.
    pub fn at(mut self, segment: impl Into<String>) -> Self {
        self.element.push(segment.into());
        self
    }

    /// Returns `true` if this location carries no information.
    pub fn is_none(&self) -> bool {
        self.document.is_none() && self.element.is_empty()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.document {
            Some(vlnv) => write!(f, "{vlnv}")?,
            None => write!(f, "<unknown document>")?,
        }
        for segment in &self.element {
            write!(f, " / {segment}")?;
        }
        Ok(())
    }
}
