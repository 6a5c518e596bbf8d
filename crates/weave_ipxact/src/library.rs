//! Library lookup: mapping VLNVs to loaded documents.

use std::collections::BTreeMap;
use weave_common::Vlnv;

use crate::abstraction::AbstractionDefinition;
use crate::component::Component;
use crate::design::Design;
use crate::design_config::DesignConfiguration;
use crate::document::{Document, DocumentKind};

/// Errors raised while building a library.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// Two documents share a VLNV.
    #[error("duplicate {kind} `{vlnv}`")]
    Duplicate {
        /// The shared identifier.
        vlnv: Vlnv,
        /// The kind of the rejected document.
        kind: DocumentKind,
    },

    /// A document file could not be read.
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    /// A document file could not be parsed.
    #[error("failed to parse document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Resolves document identifiers to documents.
///
/// The typed accessors fail closed: a VLNV that resolves to a document of a
/// different kind yields `None`, the same as an unknown VLNV.
pub trait Library {
    /// Returns the document with the given identifier.
    fn resolve(&self, vlnv: &Vlnv) -> Option<&Document>;

    /// Returns the component with the given identifier.
    fn component(&self, vlnv: &Vlnv) -> Option<&Component> {
        self.resolve(vlnv).and_then(Document::as_component)
    }

    /// Returns the design with the given identifier.
    fn design(&self, vlnv: &Vlnv) -> Option<&Design> {
        self.resolve(vlnv).and_then(Document::as_design)
    }

    /// Returns the design configuration with the given identifier.
    fn design_configuration(&self, vlnv: &Vlnv) -> Option<&DesignConfiguration> {
        self.resolve(vlnv).and_then(Document::as_design_configuration)
    }

    /// Returns the abstraction definition with the given identifier.
    fn abstraction_definition(&self, vlnv: &Vlnv) -> Option<&AbstractionDefinition> {
        self.resolve(vlnv).and_then(Document::as_abstraction_definition)
    }
}

/// An in-memory library keyed by VLNV.
#[derive(Debug, Default, Clone)]
pub struct MemoryLibrary {
    documents: BTreeMap<Vlnv, Document>,
}

impl MemoryLibrary {
    /// Creates an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document, rejecting a second document with the same VLNV.
    pub fn insert(&mut self, document: Document) -> Result<(), LibraryError> {
        let vlnv = document.vlnv().clone();
        if self.documents.contains_key(&vlnv) {
            return Err(LibraryError::Duplicate {
                vlnv,
                kind: document.kind(),
            });
        }
        self.documents.insert(vlnv, document);
        Ok(())
    }

    /// Adds a document, builder style. Duplicates are ignored.
    pub fn with(mut self, document: Document) -> Self {
        let _ = self.insert(document);
        self
    }

    /// Returns the number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` if the library is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Iterates documents in VLNV order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }
}

impl Library for MemoryLibrary {
    fn resolve(&self, vlnv: &Vlnv) -> Option<&Document> {
        self.documents.get(vlnv)
    }
}
