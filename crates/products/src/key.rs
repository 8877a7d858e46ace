//! Session-local stable keys.
//!
//! Keys are arena indices handed out by a [`KeyAllocator`]. They identify an
//! attribute, an attribute value or a variant row for the lifetime of one
//! editing session, independently of any display text.

use serde::{Deserialize, Serialize};

macro_rules! session_key {
    ($(#[$meta:meta])* $t:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $t(u32);

        impl $t {
            pub const fn index(self) -> u32 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "#{}", self.0)
            }
        }

        impl From<u32> for $t {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }
    };
}

session_key!(
    /// Stable key of an attribute ("Color").
    AttributeKey
);
session_key!(
    /// Stable key of one attribute value ("Red"); survives renames.
    ValueKey
);
session_key!(
    /// Stable key of a variant row in the editor table.
    RowKey
);

/// Monotonic key source. Keys are never reused within one allocator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyAllocator {
    next: u32,
}

impl KeyAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next key of any session key type.
    pub fn next<K: From<u32>>(&mut self) -> K {
        // Starts at 1 so that the `Default` key never names a real row.
        self.next += 1;
        K::from(self.next)
    }
}
