//! Record translator
//!
//! Turns a declarative record-set description into the record list the API
//! accepts. Translation is pure: no I/O, no logging side effects beyond
//! `trace!`, and the same spec always yields the same records in the same
//! order.
//!
//! | type      | value               | records produced                      |
//! |-----------|---------------------|---------------------------------------|
//! | SOA       | -                   | always rejected (server-managed)      |
//! | CNAME     | `CName`             | one, must end in `.`                  |
//! | TXT       | `Text`              | one, verbatim (empty allowed)         |
//! | NS        | `NsdNames`          | one per name, verbatim                |
//! | A / AAAA  | `Addresses`         | one per address, `[` `]` stripped     |

use std::collections::BTreeSet;

use crate::error::{Result, ValidationError};
use crate::traits::{Field, ResourceState};
use crate::types::{Record, RecordSet, RecordType};

/// Type-dependent value of a record set
///
/// Only the shape matching the record type is ever carried, so values of
/// inactive fields cannot leak into a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValue {
    Addresses(BTreeSet<String>),
    NsdNames(BTreeSet<String>),
    CName(String),
    Text(String),
    /// No value (SOA)
    None,
}

/// Declarative description of one record set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSetSpec {
    pub name: String,
    pub zone_id: String,
    pub record_type: RecordType,
    pub ttl: Option<u32>,
    pub value: RecordValue,
}

impl RecordSetSpec {
    /// Build a spec from the resource state
    ///
    /// Reads only the value field that is active for the record type; the
    /// other value fields are ignored whatever they contain.
    pub async fn from_state(state: &dyn ResourceState) -> Result<Self> {
        let name = state.get_string(Field::Name).await?;
        let zone_id = state.get_string(Field::ZoneId).await?;
        let record_type: RecordType = state.get_string(Field::Type).await?.parse()?;

        let ttl = match state.get_int(Field::Ttl).await? {
            None => None,
            Some(ttl) => Some(u32::try_from(ttl).map_err(|_| {
                crate::Error::invalid_input(format!("ttl out of range: {ttl}"))
            })?),
        };

        let value = match &record_type {
            RecordType::Soa => RecordValue::None,
            RecordType::Cname => RecordValue::CName(state.get_string(Field::RecordCname).await?),
            RecordType::Txt => RecordValue::Text(state.get_string(Field::RecordText).await?),
            RecordType::Ns => RecordValue::NsdNames(state.get_set(Field::RecordNsdnames).await?),
            RecordType::A | RecordType::Aaaa | RecordType::Other(_) => {
                RecordValue::Addresses(state.get_set(Field::RecordAddresses).await?)
            }
        };

        Ok(Self {
            name,
            zone_id,
            record_type,
            ttl,
            value,
        })
    }

    /// Translate into a request body, optionally for an existing record set
    pub fn to_record_set(&self, id: Option<String>) -> Result<RecordSet> {
        Ok(RecordSet {
            id,
            zone_id: self.zone_id.clone(),
            name: self.name.clone(),
            record_type: self.record_type.clone(),
            ttl: self.ttl,
            records: translate(self)?,
            account: None,
            status: None,
        })
    }
}

/// Translate a record-set spec into wire records
///
/// The number of records equals the size of the input set; values that become
/// equal after canonicalization are kept as separate records.
pub fn translate(spec: &RecordSetSpec) -> std::result::Result<Vec<Record>, ValidationError> {
    let records = match (&spec.record_type, &spec.value) {
        (RecordType::Soa, _) => {
            return Err(ValidationError::Unsupported {
                record_type: RecordType::Soa,
            });
        }
        (RecordType::Cname, RecordValue::CName(cname)) => {
            if !cname.ends_with('.') {
                return Err(ValidationError::MalformedCName {
                    cname: cname.clone(),
                });
            }
            vec![Record::CName(cname.clone())]
        }
        (RecordType::Txt, RecordValue::Text(text)) => vec![Record::Text(text.clone())],
        (RecordType::Ns, RecordValue::NsdNames(names)) => {
            names.iter().cloned().map(Record::NsdName).collect()
        }
        (
            RecordType::A | RecordType::Aaaa | RecordType::Other(_),
            RecordValue::Addresses(addresses),
        ) => addresses
            .iter()
            .map(|address| Record::Address(strip_brackets(address)))
            .collect(),
        (record_type, _) => {
            return Err(ValidationError::MismatchedValue {
                record_type: record_type.clone(),
                expected: expected_shape(record_type),
            });
        }
    };

    tracing::trace!("Translated {} record(s) for {}", records.len(), spec.name);
    Ok(records)
}

fn expected_shape(record_type: &RecordType) -> &'static str {
    match record_type {
        RecordType::Cname => "record_cname",
        RecordType::Txt => "record_text",
        RecordType::Ns => "record_nsdnames",
        RecordType::A | RecordType::Aaaa | RecordType::Other(_) => "record_addresses",
        RecordType::Soa => "no value",
    }
}

// The API answers 400 to IPv6 addresses written as `[::1]`.
fn strip_brackets(address: &str) -> String {
    address.chars().filter(|c| *c != '[' && *c != ']').collect()
}
