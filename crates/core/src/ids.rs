// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier types.
//!
//! `JobId`/`WorkerId`/`BreakpointId` are system-generated (random, via
//! [`crate::define_id!`]). `FlowId`/`RoutineId` are user-chosen names — a
//! flow author picks them, so they are plain interned strings rather than
//! nanoid-backed buffers.

crate::define_id! {
    /// Unique identifier for one logical execution context (one `post` lineage).
    pub struct JobId("job-");
}

crate::define_id! {
    /// Unique identifier for a runtime worker (thread-pool owner process).
    pub struct WorkerId("wkr-");
}

crate::define_id! {
    /// Unique identifier for an installed breakpoint.
    pub struct BreakpointId("brk-");
}

/// Generate a newtype wrapper around a user-chosen `String` identifier.
///
/// Unlike [`crate::define_id!`], these are never randomly generated — they
/// are supplied by the flow author (`flow_id`, routine ids) and must compare
/// and hash like plain strings.
#[macro_export]
macro_rules! string_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

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
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;
