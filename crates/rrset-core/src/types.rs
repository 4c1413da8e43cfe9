//! Wire-level record-set types shared by the core and API clients
//!
//! JSON field names follow the API's camelCase convention.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// DNS record type of a record set
///
/// Types without dedicated handling are carried verbatim in `Other` and
/// treated as address-bearing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum RecordType {
    /// IPv4 address records
    A,
    /// IPv6 address records
    Aaaa,
    /// Canonical name
    Cname,
    /// Name server delegation
    Ns,
    /// Start of authority (server-managed, read-only)
    Soa,
    /// Free text
    Txt,
    /// Any other type name, e.g. "PTR"
    Other(String),
}

impl RecordType {
    /// Name as used on the wire
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Ns => "NS",
            RecordType::Soa => "SOA",
            RecordType::Txt => "TXT",
            RecordType::Other(name) => name,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = crate::Error;

    /// Type names are matched exactly; the server's names are upper case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err(crate::Error::invalid_input("record type is empty")),
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            "CNAME" => Ok(RecordType::Cname),
            "NS" => Ok(RecordType::Ns),
            "SOA" => Ok(RecordType::Soa),
            "TXT" => Ok(RecordType::Txt),
            other => Ok(RecordType::Other(other.to_string())),
        }
    }
}

impl TryFrom<String> for RecordType {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        match value {
            RecordType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// A single record value, tagged by the field the API expects
///
/// Serializes as a single-key object, e.g. `{"address": "10.0.0.1"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Record {
    #[serde(rename = "address")]
    Address(String),
    #[serde(rename = "nsdname")]
    NsdName(String),
    #[serde(rename = "cname")]
    CName(String),
    #[serde(rename = "text")]
    Text(String),
}

impl Record {
    pub fn address(&self) -> Option<&str> {
        match self {
            Record::Address(v) => Some(v),
            _ => None,
        }
    }

    pub fn nsdname(&self) -> Option<&str> {
        match self {
            Record::NsdName(v) => Some(v),
            _ => None,
        }
    }

    pub fn cname(&self) -> Option<&str> {
        match self {
            Record::CName(v) => Some(v),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Record::Text(v) => Some(v),
            _ => None,
        }
    }
}

/// A record set as exchanged with the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSet {
    /// Server-assigned identifier (absent on create requests)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Zone the record set belongs to
    pub zone_id: String,

    /// Record set name, relative to the zone
    pub name: String,

    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,

    /// Time-to-live in seconds; server default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,

    /// Record values
    #[serde(default)]
    pub records: Vec<Record>,

    /// Owning account (server-computed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,

    /// Server-side record set status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Server-side tracking object for one record set mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSetChange {
    /// Change identifier
    pub id: String,

    /// Raw status string ("Pending", "Complete", "Failed", ...)
    #[serde(default)]
    pub status: String,

    /// Add, Update or Delete
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    /// Record set as of this change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_set: Option<RecordSet>,

    /// Zone snapshot, opaque to this crate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<serde_json::Value>,
}

/// Response body of create, update and delete calls
///
/// This is the accepted change itself; its `id` is the change id to poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSetUpdate {
    /// Change to poll for convergence
    #[serde(rename = "id")]
    pub change_id: String,

    /// Record set the change applies to
    pub record_set: RecordSet,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<serde_json::Value>,
}

/// Identifies the change a convergence wait is tracking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeHandle {
    pub zone_id: String,
    pub record_set_id: String,
    pub change_id: String,
}

impl ChangeHandle {
    pub fn new(
        zone_id: impl Into<String>,
        record_set_id: impl Into<String>,
        change_id: impl Into<String>,
    ) -> Self {
        Self {
            zone_id: zone_id.into(),
            record_set_id: record_set_id.into(),
            change_id: change_id.into(),
        }
    }
}

impl fmt::Display for ChangeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (zone {}, record set {})",
            self.change_id, self.zone_id, self.record_set_id
        )
    }
}
