//! Test doubles and common utilities for contract tests
//!
//! The mock API answers change lookups from a script and records every
//! submission, so tests can assert both outcomes and call counts.

#![allow(dead_code)]

use rrset_core::config::ConvergenceConfig;
use rrset_core::error::{Error, Result};
use rrset_core::state::{MemoryResourceState, ResourceData};
use rrset_core::traits::{DnsApi, Field, VirtualClock};
use rrset_core::types::{RecordSet, RecordSetChange, RecordSetUpdate};
use std::collections::{BTreeSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One scripted answer to a change lookup
#[derive(Debug, Clone)]
pub enum ChangeReply {
    /// API answers with this status code
    Error(u16),
    /// Change exists with this status string
    Status(&'static str),
}

pub const NOT_FOUND: ChangeReply = ChangeReply::Error(404);
pub const PENDING: ChangeReply = ChangeReply::Status("Pending");
pub const COMPLETE: ChangeReply = ChangeReply::Status("Complete");
pub const FAILED: ChangeReply = ChangeReply::Status("Failed");

pub const RECORD_SET_ID: &str = "rs-1";

/// A mock DnsApi that tracks calls
///
/// Change lookups consume the script in order; the last entry repeats.
pub struct MockDnsApi {
    script: Mutex<VecDeque<ChangeReply>>,
    /// Status code to fail submissions with, if any
    submit_error: Mutex<Option<u16>>,
    /// Name the server reports on reads
    server_name: Mutex<Option<String>>,
    submitted: Mutex<Vec<RecordSet>>,
    deleted: Mutex<Vec<String>>,
    create_call_count: AtomicUsize,
    update_call_count: AtomicUsize,
    delete_call_count: AtomicUsize,
    get_call_count: AtomicUsize,
    change_call_count: AtomicUsize,
}

impl MockDnsApi {
    pub fn new(script: Vec<ChangeReply>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            submit_error: Mutex::new(None),
            server_name: Mutex::new(None),
            submitted: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            create_call_count: AtomicUsize::new(0),
            update_call_count: AtomicUsize::new(0),
            delete_call_count: AtomicUsize::new(0),
            get_call_count: AtomicUsize::new(0),
            change_call_count: AtomicUsize::new(0),
        })
    }

    /// Mock whose changes complete on the first lookup
    pub fn completing() -> Arc<Self> {
        Self::new(vec![COMPLETE])
    }

    /// Reject every submission with `status`
    pub fn fail_submissions(&self, status: u16) {
        *self.submit_error.lock().unwrap() = Some(status);
    }

    /// Report `name` as the record set name on reads
    pub fn set_server_name(&self, name: &str) {
        *self.server_name.lock().unwrap() = Some(name.to_string());
    }

    /// Record sets sent by create and update, in order
    pub fn submitted(&self) -> Vec<RecordSet> {
        self.submitted.lock().unwrap().clone()
    }

    /// Record set ids sent by delete, in order
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn create_call_count(&self) -> usize {
        self.create_call_count.load(Ordering::SeqCst)
    }

    pub fn update_call_count(&self) -> usize {
        self.update_call_count.load(Ordering::SeqCst)
    }

    pub fn delete_call_count(&self) -> usize {
        self.delete_call_count.load(Ordering::SeqCst)
    }

    pub fn get_call_count(&self) -> usize {
        self.get_call_count.load(Ordering::SeqCst)
    }

    /// Number of change lookups, i.e. poller ticks
    pub fn change_call_count(&self) -> usize {
        self.change_call_count.load(Ordering::SeqCst)
    }

    fn submission_error(&self) -> Option<Error> {
        self.submit_error
            .lock()
            .unwrap()
            .map(|status| Error::api(status, "submission rejected"))
    }

    fn accepted(&self, record_set: RecordSet, change_id: &str) -> RecordSetUpdate {
        RecordSetUpdate {
            change_id: change_id.to_string(),
            record_set,
            status: Some("Pending".to_string()),
            change_type: None,
            user_id: None,
            created: None,
            zone: None,
        }
    }
}

#[async_trait::async_trait]
impl DnsApi for MockDnsApi {
    async fn create_record_set(&self, record_set: &RecordSet) -> Result<RecordSetUpdate> {
        self.create_call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = self.submission_error() {
            return Err(e);
        }
        self.submitted.lock().unwrap().push(record_set.clone());

        let mut created = record_set.clone();
        created.id = Some(RECORD_SET_ID.to_string());
        Ok(self.accepted(created, "change-create"))
    }

    async fn update_record_set(&self, record_set: &RecordSet) -> Result<RecordSetUpdate> {
        self.update_call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = self.submission_error() {
            return Err(e);
        }
        self.submitted.lock().unwrap().push(record_set.clone());
        Ok(self.accepted(record_set.clone(), "change-update"))
    }

    async fn delete_record_set(&self, zone_id: &str, record_set_id: &str) -> Result<RecordSetUpdate> {
        self.delete_call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = self.submission_error() {
            return Err(e);
        }
        self.deleted.lock().unwrap().push(record_set_id.to_string());

        let record_set = RecordSet {
            id: Some(record_set_id.to_string()),
            zone_id: zone_id.to_string(),
            name: "deleted".to_string(),
            record_type: rrset_core::types::RecordType::A,
            ttl: None,
            records: Vec::new(),
            account: None,
            status: None,
        };
        Ok(self.accepted(record_set, "change-delete"))
    }

    async fn get_record_set(&self, zone_id: &str, record_set_id: &str) -> Result<RecordSet> {
        self.get_call_count.fetch_add(1, Ordering::SeqCst);

        let last = self.submitted.lock().unwrap().last().cloned();
        let server_name = self.server_name.lock().unwrap().clone();
        let mut record_set = last.unwrap_or(RecordSet {
            id: None,
            zone_id: zone_id.to_string(),
            name: "www".to_string(),
            record_type: rrset_core::types::RecordType::A,
            ttl: Some(300),
            records: Vec::new(),
            account: None,
            status: None,
        });
        record_set.id = Some(record_set_id.to_string());
        record_set.account = Some("account-1".to_string());
        record_set.status = Some("Active".to_string());
        if let Some(name) = server_name {
            record_set.name = name;
        }
        Ok(record_set)
    }

    async fn record_set_change(
        &self,
        _zone_id: &str,
        _record_set_id: &str,
        change_id: &str,
    ) -> Result<RecordSetChange> {
        self.change_call_count.fetch_add(1, Ordering::SeqCst);

        let reply = {
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.pop_front().unwrap()
            } else {
                script.front().cloned().unwrap()
            }
        };

        match reply {
            ChangeReply::Error(status) => Err(Error::api(status, format!("change {change_id}"))),
            ChangeReply::Status(status) => Ok(RecordSetChange {
                id: change_id.to_string(),
                status: status.to_string(),
                change_type: None,
                user_id: Some("user-1".to_string()),
                created: None,
                record_set: None,
                zone: None,
            }),
        }
    }

    fn client_name(&self) -> &'static str {
        "mock"
    }
}

/// Convergence timing that keeps virtual-time tests short
pub fn fast_convergence() -> ConvergenceConfig {
    ConvergenceConfig {
        delay_ms: 10,
        min_interval_secs: 1,
        timeout_secs: 30,
        poll_interval_ms: 100,
    }
}

/// A fresh virtual clock
pub fn clock() -> Arc<VirtualClock> {
    Arc::new(VirtualClock::new())
}

/// State describing an A record set with the given addresses
pub fn a_record_state(name: &str, addresses: &[&str]) -> MemoryResourceState {
    let addresses: BTreeSet<String> = addresses.iter().map(|a| a.to_string()).collect();
    MemoryResourceState::from_data(
        ResourceData::default()
            .with(Field::Name, name)
            .with(Field::ZoneId, "zone-1")
            .with(Field::Type, "A")
            .with(Field::Ttl, 300i64)
            .with(Field::RecordAddresses, addresses),
    )
}
