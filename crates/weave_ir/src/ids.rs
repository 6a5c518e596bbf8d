//! Opaque id newtypes for the shared records of a generation model.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Creates an id from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// Id of an [`Interconnection`](crate::Interconnection) in a generation model.
    InterconnectionId
);

define_id!(
    /// Id of a [`Wire`](crate::Wire) in a generation model.
    WireId
);

define_id!(
    /// Id of an [`AdHoc`](crate::AdHoc) bundle in a generation model.
    AdHocId
);
