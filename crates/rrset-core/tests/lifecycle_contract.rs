//! Contract Test: Record-Set Lifecycle
//!
//! Verifies what create, read, update and delete submit to the API and what
//! they leave behind in the resource state.
//!
//! Constraints verified:
//! - Invalid descriptions are rejected before anything is submitted
//! - A create that is accepted records its id even if convergence fails
//! - A delete forgets the id only once its change is complete
//! - Read copies only the server name back and never polls
//! - Record types without dedicated handling are sent as addresses
//! - Update, read and delete refuse to run without an id

mod common;

use common::*;
use rrset_core::error::{Error, ValidationError};
use rrset_core::lifecycle::RecordSetManager;
use rrset_core::state::{MemoryResourceState, ResourceData};
use rrset_core::traits::{Field, FieldValue, ResourceState};
use rrset_core::types::RecordType;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

fn manager(api: &Arc<MockDnsApi>) -> RecordSetManager {
    RecordSetManager::new(api.clone(), clock(), fast_convergence()).unwrap()
}

async fn seeded_with_id(state: MemoryResourceState) -> MemoryResourceState {
    state.set_id(RECORD_SET_ID).await.unwrap();
    state
}

#[tokio::test]
async fn create_records_id_and_server_name() {
    let api = MockDnsApi::completing();
    api.set_server_name("www.example.com.");
    let state = a_record_state("www", &["10.0.0.1", "10.0.0.2"]);

    assert_ok!(manager(&api).create(&state).await);

    assert_eq!(state.id().await.unwrap().as_deref(), Some(RECORD_SET_ID));
    assert_eq!(state.get_string(Field::Name).await.unwrap(), "www.example.com.");

    let submitted = api.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].id, None);
    assert_eq!(submitted[0].zone_id, "zone-1");
    assert_eq!(submitted[0].record_type, RecordType::A);
    assert_eq!(submitted[0].ttl, Some(300));
    let addresses: Vec<_> = submitted[0].records.iter().filter_map(|r| r.address()).collect();
    assert_eq!(addresses, vec!["10.0.0.1", "10.0.0.2"]);

    assert_eq!(api.change_call_count(), 1);
    assert_eq!(api.get_call_count(), 1);
}

#[tokio::test]
async fn invalid_cname_is_rejected_before_submission() {
    let api = MockDnsApi::completing();
    let state = MemoryResourceState::from_data(
        ResourceData::default()
            .with(Field::Name, "alias")
            .with(Field::ZoneId, "zone-1")
            .with(Field::Type, "CNAME")
            .with(Field::RecordCname, "target.example.com"),
    );

    let err = assert_err!(manager(&api).create(&state).await);

    assert!(matches!(
        err,
        Error::Validation(ValidationError::MalformedCName { .. })
    ));
    assert_eq!(api.create_call_count(), 0);
    assert_eq!(state.id().await.unwrap(), None);
}

#[tokio::test]
async fn soa_is_never_submitted() {
    let api = MockDnsApi::completing();
    let state = MemoryResourceState::from_data(
        ResourceData::default()
            .with(Field::Name, "@")
            .with(Field::ZoneId, "zone-1")
            .with(Field::Type, "SOA"),
    );

    let err = assert_err!(manager(&api).create(&state).await);

    assert!(matches!(
        err,
        Error::Validation(ValidationError::Unsupported {
            record_type: RecordType::Soa
        })
    ));
    assert_eq!(api.create_call_count(), 0);
}

#[tokio::test]
async fn other_record_types_are_submitted_as_addresses() {
    let api = MockDnsApi::completing();
    let state = MemoryResourceState::from_data(
        ResourceData::default()
            .with(Field::Name, "1")
            .with(Field::ZoneId, "zone-1")
            .with(Field::Type, "PTR")
            .with(
                Field::RecordAddresses,
                BTreeSet::from(["host.example.com.".to_string()]),
            )
            .with(Field::RecordText, "ignored"),
    );

    assert_ok!(manager(&api).create(&state).await);

    let submitted = api.submitted();
    assert_eq!(submitted[0].record_type, RecordType::Other("PTR".to_string()));
    assert_eq!(submitted[0].records.len(), 1);
    assert_eq!(submitted[0].records[0].address(), Some("host.example.com."));
}

#[tokio::test]
async fn rejected_submission_leaves_state_untouched() {
    let api = MockDnsApi::completing();
    api.fail_submissions(409);
    let state = a_record_state("www", &["10.0.0.1"]);

    let err = assert_err!(manager(&api).create(&state).await);

    assert_eq!(err.status(), Some(409));
    assert_eq!(state.id().await.unwrap(), None);
    assert_eq!(api.change_call_count(), 0);
}

#[tokio::test]
async fn failed_create_keeps_id_for_inspection() {
    let api = MockDnsApi::new(vec![PENDING, FAILED]);
    let state = a_record_state("www", &["10.0.0.1"]);

    let err = assert_err!(manager(&api).create(&state).await);

    assert!(matches!(err, Error::ChangeFailed { .. }));
    assert_eq!(state.id().await.unwrap().as_deref(), Some(RECORD_SET_ID));
    // no refresh after a failed change
    assert_eq!(api.get_call_count(), 0);
}

#[tokio::test]
async fn create_ignores_inactive_value_fields() {
    let api = MockDnsApi::completing();
    let state = a_record_state("www", &["[2001:db8::1]"]);
    state.set(Field::Type, "AAAA".into()).await.unwrap();
    state.set(Field::RecordText, "stale text".into()).await.unwrap();
    state.set(Field::RecordCname, "stale.example.com.".into()).await.unwrap();
    state
        .set(
            Field::RecordNsdnames,
            BTreeSet::from(["ns1.example.com.".to_string()]).into(),
        )
        .await
        .unwrap();

    assert_ok!(manager(&api).create(&state).await);

    let records = &api.submitted()[0].records;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].address(), Some("2001:db8::1"));
}

#[tokio::test]
async fn update_submits_existing_id_and_waits() {
    let api = MockDnsApi::new(vec![NOT_FOUND, COMPLETE]);
    let state = seeded_with_id(a_record_state("www", &["10.0.0.9"])).await;

    assert_ok!(manager(&api).update(&state).await);

    let submitted = api.submitted();
    assert_eq!(api.update_call_count(), 1);
    assert_eq!(submitted[0].id.as_deref(), Some(RECORD_SET_ID));
    assert_eq!(submitted[0].records[0].address(), Some("10.0.0.9"));
    assert_eq!(api.change_call_count(), 2);
    assert_eq!(api.get_call_count(), 1);
}

#[tokio::test]
async fn operations_on_existing_record_sets_require_an_id() {
    let api = MockDnsApi::completing();
    let manager = manager(&api);
    let state = a_record_state("www", &["10.0.0.1"]);

    assert!(matches!(
        manager.update(&state).await,
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        manager.read(&state).await,
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        manager.delete(&state).await,
        Err(Error::InvalidInput(_))
    ));

    assert_eq!(api.update_call_count(), 0);
    assert_eq!(api.get_call_count(), 0);
    assert_eq!(api.delete_call_count(), 0);
}

#[tokio::test]
async fn read_is_idempotent_and_never_polls() {
    let api = MockDnsApi::completing();
    api.set_server_name("www.example.com.");
    let manager = manager(&api);
    let state = seeded_with_id(a_record_state("www", &["10.0.0.1"])).await;

    assert_ok!(manager.read(&state).await);
    let first = state.snapshot().await;
    assert_ok!(manager.read(&state).await);

    assert_eq!(state.snapshot().await, first);
    assert_eq!(
        first.fields.get(&Field::Name),
        Some(&FieldValue::String("www.example.com.".to_string()))
    );
    assert_eq!(api.get_call_count(), 2);
    assert_eq!(api.change_call_count(), 0);
}

#[tokio::test]
async fn read_copies_only_the_name() {
    let api = MockDnsApi::completing();
    api.set_server_name("www.example.com.");
    let state = seeded_with_id(a_record_state("www", &["10.0.0.1"])).await;
    let mut expected = state.snapshot().await;
    expected
        .fields
        .insert(Field::Name, FieldValue::String("www.example.com.".to_string()));

    assert_ok!(manager(&api).read(&state).await);

    // the server's account and records are not written back
    assert_eq!(state.snapshot().await, expected);
}

#[tokio::test]
async fn failed_delete_keeps_id() {
    let api = MockDnsApi::new(vec![FAILED]);
    let state = seeded_with_id(a_record_state("www", &["10.0.0.1"])).await;

    let err = assert_err!(manager(&api).delete(&state).await);

    assert!(matches!(err, Error::ChangeFailed { .. }));
    assert_eq!(state.id().await.unwrap().as_deref(), Some(RECORD_SET_ID));
}

#[tokio::test]
async fn completed_delete_clears_id() {
    let api = MockDnsApi::new(vec![NOT_FOUND, PENDING, COMPLETE]);
    let state = seeded_with_id(a_record_state("www", &["10.0.0.1"])).await;

    assert_ok!(manager(&api).delete(&state).await);

    assert_eq!(state.id().await.unwrap(), None);
    assert_eq!(api.deleted(), vec![RECORD_SET_ID.to_string()]);
    assert_eq!(api.change_call_count(), 3);
}

#[tokio::test]
async fn invalid_convergence_config_is_rejected() {
    let api = MockDnsApi::completing();
    let mut config = fast_convergence();
    config.timeout_secs = 0;

    let result = RecordSetManager::new(api, clock(), config);

    assert!(matches!(result, Err(Error::Config(_))));
}
