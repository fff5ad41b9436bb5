// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `RoutineFactory`: the "thin lookup table, not part of the core" spec.md
//! §1 calls for — a registry mapping a document's `class` string to a
//! constructor that builds a fully formed `Routine` (slots, events, logic,
//! activation policy already attached; `config` is applied afterward via
//! `Routine::set_config`).

use flowmesh_core::Routine;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::DslError;

type Constructor = dyn Fn(&str) -> Result<Routine, DslError> + Send + Sync;

/// Registry of routine classes, looked up by name when building a `Flow`
/// from a [`crate::document::FlowDocument`].
#[derive(Clone, Default)]
pub struct RoutineFactory {
    constructors: HashMap<String, Arc<Constructor>>,
}

impl RoutineFactory {
    pub fn new() -> Self {
        Self { constructors: HashMap::new() }
    }

    /// Registers `class`. The constructor receives the routine's id (so it
    /// can name the `Routine` it builds) and must attach whatever slots,
    /// events, logic and activation policy that class implies; `config`
    /// entries from the document are applied by the caller afterward.
    pub fn register(
        &mut self,
        class: impl Into<String>,
        ctor: impl Fn(&str) -> Result<Routine, DslError> + Send + Sync + 'static,
    ) {
        self.constructors.insert(class.into(), Arc::new(ctor));
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.constructors.contains_key(class)
    }

    pub fn build(&self, id: &str, class: &str) -> Result<Routine, DslError> {
        let ctor = self
            .constructors
            .get(class)
            .ok_or_else(|| DslError::UnknownClass { routine: id.to_string(), class: class.to_string() })?;
        ctor(id)
    }
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
