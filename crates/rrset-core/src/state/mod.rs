// # Resource State Implementations
//
// This module provides implementations of the ResourceState trait for
// different persistence strategies.

pub mod file;
pub mod memory;

pub use file::FileResourceState;
pub use memory::MemoryResourceState;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::traits::{Field, FieldValue};

/// Fields and identifier of one resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceData {
    /// External identifier, once created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Field values keyed by schema name
    #[serde(default)]
    pub fields: BTreeMap<Field, FieldValue>,
}

impl ResourceData {
    /// Builder helper for seeding a field
    pub fn with(mut self, field: Field, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field, value.into());
        self
    }
}
