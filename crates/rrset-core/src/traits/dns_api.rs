// # DNS API Trait
//
// Defines the interface to the remote DNS-as-a-service API.
//
// ## Implementations
//
// - VinylDNS: `rrset-vinyldns` crate
//
// ## Usage
//
// ```rust,ignore
// use rrset_core::DnsApi;
//
// let update = api.create_record_set(&record_set).await?;
// let change = api
//     .record_set_change(&record_set.zone_id, &record_set_id, &update.change_id)
//     .await?;
// println!("change {} is {}", change.id, change.status);
// ```

use async_trait::async_trait;

use crate::types::{RecordSet, RecordSetChange, RecordSetUpdate};

/// Trait for DNS API client implementations
///
/// Mutating calls are asynchronous on the server side: they return a change
/// identifier that must be polled with [`DnsApi::record_set_change`] until the
/// change is complete. Polling is owned by the convergence poller, never by
/// the client.
///
/// # Errors
///
/// Failures the server answered must be reported as `Error::Api` with the
/// response status code, so callers can tell "not found" apart from real
/// failures. Failures with no response (connect, timeout, decode) use
/// `Error::Http` or `Error::Json`.
///
/// # Client Rules
///
/// - One request per call
/// - No retries, backoff or sleeping (owned by the poller)
/// - No access to resource state
#[async_trait]
pub trait DnsApi: Send + Sync {
    /// Submit a new record set
    ///
    /// # Returns
    ///
    /// The provisional record set (with its assigned id) and the change to poll
    async fn create_record_set(&self, record_set: &RecordSet)
    -> Result<RecordSetUpdate, crate::Error>;

    /// Replace an existing record set; `record_set.id` must be set
    async fn update_record_set(&self, record_set: &RecordSet)
    -> Result<RecordSetUpdate, crate::Error>;

    /// Delete a record set
    async fn delete_record_set(
        &self,
        zone_id: &str,
        record_set_id: &str,
    ) -> Result<RecordSetUpdate, crate::Error>;

    /// Fetch a record set; 404 when it does not exist
    async fn get_record_set(
        &self,
        zone_id: &str,
        record_set_id: &str,
    ) -> Result<RecordSet, crate::Error>;

    /// Look up a change; 404 while the change is not yet visible
    async fn record_set_change(
        &self,
        zone_id: &str,
        record_set_id: &str,
        change_id: &str,
    ) -> Result<RecordSetChange, crate::Error>;

    /// Client name for logging (e.g. "vinyldns")
    fn client_name(&self) -> &'static str;
}
