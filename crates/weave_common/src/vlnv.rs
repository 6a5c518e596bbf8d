//! Vendor-Library-Name-Version identifiers for IP-XACT documents.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The unique identifier of an IP-XACT document.
///
/// Written and parsed as `vendor:library:name:version`. Ordering is
/// lexicographic by field, which keeps library listings deterministic.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Vlnv {
    /// The vendor, usually a reversed domain name.
    pub vendor: String,
    /// The library the document belongs to.
    pub library: String,
    /// The document name.
    pub name: String,
    /// The document version.
    pub version: String,
}

impl Vlnv {
    /// Creates a new identifier from its four parts.
    pub fn new(
        vendor: impl Into<String>,
        library: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            vendor: vendor.into(),
            library: library.into(),
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Debug for Vlnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vlnv({self})")
    }
}

impl fmt::Display for Vlnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.vendor, self.library, self.name, self.version
        )
    }
}

/// Error type for parsing VLNV strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid VLNV '{input}': expected vendor:library:name:version")]
pub struct ParseVlnvError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for Vlnv {
    type Err = ParseVlnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        match parts.as_slice() {
            [vendor, library, name, version] if !name.is_empty() => {
                Ok(Vlnv::new(*vendor, *library, *name, *version))
            }
            _ => Err(ParseVlnvError {
                input: s.to_string(),
            }),
        }
    }
}

impl Serialize for Vlnv {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Vlnv {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
