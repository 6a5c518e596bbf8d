//! The tagged union of document kinds a library can hold.

use serde::{Deserialize, Serialize};
use std::fmt;
use weave_common::Vlnv;

use crate::abstraction::AbstractionDefinition;
use crate::component::Component;
use crate::design::Design;
use crate::design_config::DesignConfiguration;

/// Any IP-XACT document known to a library.
///
/// Serialized with a `kind` tag, e.g. `{"kind": "component", "vlnv": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Document {
    /// A component.
    Component(Component),
    /// A design.
    Design(Design),
    /// A design configuration.
    DesignConfiguration(DesignConfiguration),
    /// An abstraction definition.
    AbstractionDefinition(AbstractionDefinition),
}

/// The kind of a [`Document`], without its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// A component.
    Component,
    /// A design.
    Design,
    /// A design configuration.
    DesignConfiguration,
    /// An abstraction definition.
    AbstractionDefinition,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DocumentKind::Component => "component",
            DocumentKind::Design => "design",
            DocumentKind::DesignConfiguration => "design configuration",
            DocumentKind::AbstractionDefinition => "abstraction definition",
        };
        f.write_str(s)
    }
}

impl Document {
    /// Returns the document identifier.
    pub fn vlnv(&self) -> &Vlnv {
        match self {
            Document::Component(c) => &c.vlnv,
            Document::Design(d) => &d.vlnv,
            Document::DesignConfiguration(d) => &d.vlnv,
            Document::AbstractionDefinition(a) => &a.vlnv,
        }
    }

    /// Returns the document kind.
    pub fn kind(&self) -> DocumentKind {
        match self {
            Document::Component(_) => DocumentKind::Component,
            Document::Design(_) => DocumentKind::Design,
            Document::DesignConfiguration(_) => DocumentKind::DesignConfiguration,
            Document::AbstractionDefinition(_) => DocumentKind::AbstractionDefinition,
        }
    }

    /// Returns the component, or `None` for any other kind.
    pub fn as_component(&self) -> Option<&Component> {
        match self {
            Document::Component(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the design, or `None` for any other kind.
    pub fn as_design(&self) -> Option<&Design> {
        match self {
            Document::Design(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the design configuration, or `None` for any other kind.
    pub fn as_design_configuration(&self) -> Option<&DesignConfiguration> {
        match self {
            Document::DesignConfiguration(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the abstraction definition, or `None` for any other kind.
    pub fn as_abstraction_definition(&self) -> Option<&AbstractionDefinition> {
        match self {
            Document::AbstractionDefinition(a) => Some(a),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_fail_closed() {
        let doc = Document::Design(Design::new(Vlnv::new("acme", "soc", "top", "1.0")));
        assert_eq!(doc.kind(), DocumentKind::Design);
        assert!(doc.as_design().is_some());
        assert!(doc.as_component().is_none());
        assert!(doc.as_abstraction_definition().is_none());
        assert!(doc.as_design_configuration().is_none());
    }

    #[test]
    fn tagged_json() {
        let json = r#"{"kind":"abstraction_definition","vlnv":"amba:bus:apb_rtl:1.0"}"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.kind(), DocumentKind::AbstractionDefinition);
        assert_eq!(doc.vlnv(), &Vlnv::new("amba", "bus", "apb_rtl", "1.0"));
        assert_eq!(format!("{}", doc.kind()), "abstraction definition");
    }
}
