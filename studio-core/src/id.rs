//! Identifiers for pages, elements and resources.
//!
//! Fresh ids are time-ordered UUIDs (millisecond timestamp followed by random
//! bits), so uniqueness holds without any registry. Ids are kept as strings:
//! seeded content uses readable ids such as `page-1`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generate a new unique identifier string.
#[must_use]
pub fn generate_id() -> String {
    Uuid::now_v7().to_string()
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new unique ID.
            #[must_use]
            pub fn generate() -> Self {
                Self(generate_id())
            }

            /// Wrap an existing identifier string.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Unique identifier for a page.
    PageId
);

string_id!(
    /// Unique identifier for an element.
    ElementId
);

string_id!(
    /// Unique identifier for a resource.
    ResourceId
);
