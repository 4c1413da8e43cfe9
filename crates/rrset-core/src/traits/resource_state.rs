// # Resource State Trait
//
// Defines the interface to the declarative resource state a lifecycle
// operation reads its desired fields from and writes its results back to.
//
// ## Purpose
//
// The state holds:
// - The desired fields of one record set (name, zone, type, ttl, values)
// - The external identifier assigned by the server once created
//
// Operations only ever touch the state of the resource they were invoked for.
//
// ## Implementations
//
// - In-memory: `MemoryResourceState`
// - JSON file: `FileResourceState`
//
// ## Usage
//
// ```rust,ignore
// use rrset_core::traits::{Field, ResourceState};
//
// let zone_id = state.get_string(Field::ZoneId).await?;
// state.set_id("rs-123").await?;
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::Error;

/// Fields of the declarative record-set resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    ZoneId,
    Type,
    Ttl,
    RecordAddresses,
    RecordNsdnames,
    RecordCname,
    RecordText,
}

impl Field {
    /// Schema name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::ZoneId => "zone_id",
            Field::Type => "type",
            Field::Ttl => "ttl",
            Field::RecordAddresses => "record_addresses",
            Field::RecordNsdnames => "record_nsdnames",
            Field::RecordCname => "record_cname",
            Field::RecordText => "record_text",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed field value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    String(String),
    Set(BTreeSet<String>),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<BTreeSet<String>> for FieldValue {
    fn from(value: BTreeSet<String>) -> Self {
        FieldValue::Set(value)
    }
}

/// Trait for declarative resource state implementations
///
/// Holds the fields of a single record-set resource and owns its external
/// identifier.
///
/// # Ownership Rules
///
/// - The lifecycle manager is the only writer of the identifier
/// - Stores must not call the DNS API or decide when to converge
/// - Writes must be visible to the next read on the same store
#[async_trait]
pub trait ResourceState: Send + Sync {
    /// Read a field
    ///
    /// # Returns
    ///
    /// - `Ok(Some(FieldValue))`: The current value
    /// - `Ok(None)`: Field not set
    /// - `Err(Error)`: Storage error
    async fn get(&self, field: Field) -> Result<Option<FieldValue>, Error>;

    /// Write a field
    async fn set(&self, field: Field, value: FieldValue) -> Result<(), Error>;

    /// The external identifier, if the resource exists
    async fn id(&self) -> Result<Option<String>, Error>;

    /// Record the external identifier
    async fn set_id(&self, id: &str) -> Result<(), Error>;

    /// Forget the external identifier (resource no longer exists)
    async fn clear_id(&self) -> Result<(), Error>;

    /// Read a string field, treating an unset field as empty
    async fn get_string(&self, field: Field) -> Result<String, Error> {
        match self.get(field).await? {
            None => Ok(String::new()),
            Some(FieldValue::String(s)) => Ok(s),
            Some(other) => Err(type_mismatch(field, "string", &other)),
        }
    }

    /// Read an integer field
    async fn get_int(&self, field: Field) -> Result<Option<i64>, Error> {
        match self.get(field).await? {
            None => Ok(None),
            Some(FieldValue::Int(i)) => Ok(Some(i)),
            Some(other) => Err(type_mismatch(field, "integer", &other)),
        }
    }

    /// Read a set field, treating an unset field as the empty set
    async fn get_set(&self, field: Field) -> Result<BTreeSet<String>, Error> {
        match self.get(field).await? {
            None => Ok(BTreeSet::new()),
            Some(FieldValue::Set(s)) => Ok(s),
            Some(other) => Err(type_mismatch(field, "set", &other)),
        }
    }
}

fn type_mismatch(field: Field, expected: &str, got: &FieldValue) -> Error {
    Error::state_store(format!("field {field} is not a {expected}: {got:?}"))
}
