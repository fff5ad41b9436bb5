// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! flowmesh-dsl: parses the external flow-definition mapping (spec.md §6.3)
//! from YAML or JSON into a `Flow`, and serializes a `Flow` back to the
//! same shape. Routine construction goes through a [`RoutineFactory`], the
//! "thin lookup table, not part of the core" spec.md §1 calls for.

mod builder;
mod document;
mod error;
mod factory;

pub use builder::{build, parse, parse_document, serialize, to_document};
pub use document::{ConnectionDocument, Format, FlowDocument, RoutineDocument};
pub use error::DslError;
pub use factory::RoutineFactory;
