// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! ID generation abstractions.

use ulid::Ulid;

/// Trait for truncating identifiers to a short prefix.
pub trait ShortId {
    /// Returns a string slice truncated to at most `n` characters.
    fn short(&self, n: usize) -> &str;
}

impl ShortId for str {
    fn short(&self, n: usize) -> &str {
        if self.len() <= n {
            self
        } else {
            &self[..n]
        }
    }
}

/// Define a newtype ID wrapper around `String`.
///
/// Generates `new()`, `as_str()`, `short()`, `Display`, `From<String>`, `From<&str>`,
/// `PartialEq<str>`, `PartialEq<&str>`, and `Borrow<str>` implementations.
///
/// ```ignore
/// define_id! {
///     pub struct MyId;
/// }
/// ```
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns a string slice truncated to at most `n` characters.
            pub fn short(&self, n: usize) -> &str {
                if self.0.len() <= n {
                    &self.0
                } else {
                    &self.0[..n]
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

/// Generates unique, lexicographically sortable identifiers.
pub trait IdGen: Send + Sync {
    /// Returns a freshly generated ULID string (no prefix).
    fn next(&self) -> String;
}

/// ULID-based ID generator for production use.
///
/// ULIDs are monotonic within a millisecond and sortable by creation time,
/// matching the `msg-<ulid-26>` / `thrd-<ulid-26>` / `usr-<ulid-26>` layout in §6.
#[derive(Clone, Default)]
pub struct UlidIdGen;

impl IdGen for UlidIdGen {
    fn next(&self) -> String {
        Ulid::new().to_string()
    }
}

/// Build a prefixed entity id, e.g. `msg-01J...`.
pub fn prefixed(prefix: &str, gen: &dyn IdGen) -> String {
    format!("{prefix}-{}", gen.next())
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
