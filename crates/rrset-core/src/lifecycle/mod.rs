//! Record-set lifecycle orchestration
//!
//! The [`RecordSetManager`] is responsible for:
//! - Building the record-set request from resource state (translator)
//! - Submitting the mutation to the DNS API
//! - Waiting for the resulting change to converge (poller)
//! - Writing the identifier and server-confirmed fields back to state
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐   fields    ┌──────────────────┐   RecordSet   ┌──────────┐
//! │ ResourceState │───────────▶│ RecordSetManager │──────────────▶│  DnsApi  │
//! │               │◀───────────│                  │◀──────────────│          │
//! └───────────────┘  id, name   └──────────────────┘   change id   └──────────┘
//!                                        │                              ▲
//!                                        ▼                              │
//!                               ┌───────────────────┐   lookups         │
//!                               │ ConvergencePoller │───────────────────┘
//!                               └───────────────────┘
//! ```
//!
//! ## Failure Handling
//!
//! Nothing is rolled back. Validation and submission errors leave the state
//! untouched. When a create is accepted but does not converge, the identifier
//! stays recorded so a later read can inspect what the server holds. A delete
//! clears the identifier only after its change is complete.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::ConvergenceConfig;
use crate::convergence::ConvergencePoller;
use crate::error::{Error, Result};
use crate::traits::{Clock, DnsApi, Field, FieldValue, ResourceState};
use crate::translate::RecordSetSpec;
use crate::types::ChangeHandle;

/// Create, read, update and delete one record set at a time
///
/// Each call works only on the state it is given, so one manager can serve
/// any number of independent resources, concurrently if the caller wishes.
pub struct RecordSetManager {
    /// DNS API for submissions and reads
    api: Arc<dyn DnsApi>,

    /// Poller sharing the same API
    poller: ConvergencePoller,
}

impl RecordSetManager {
    /// Create a new manager
    ///
    /// # Parameters
    ///
    /// - `api`: DNS API client
    /// - `clock`: Time source for convergence waits
    /// - `config`: Convergence timing
    pub fn new(
        api: Arc<dyn DnsApi>,
        clock: Arc<dyn Clock>,
        config: ConvergenceConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            poller: ConvergencePoller::new(Arc::clone(&api), clock, config),
            api,
        })
    }

    /// Create the record set described by `state`
    ///
    /// On success the state holds the server identifier and refreshed fields.
    pub async fn create(&self, state: &dyn ResourceState) -> Result<()> {
        let spec = RecordSetSpec::from_state(state).await?;
        info!(
            "Creating {} record set {} in zone {}",
            spec.record_type, spec.name, spec.zone_id
        );

        let request = spec.to_record_set(None)?;
        let created = self.api.create_record_set(&request).await?;

        let record_set_id = created.record_set.id.clone().ok_or_else(|| {
            Error::Other(format!(
                "{} accepted record set {} without returning its id",
                self.api.client_name(),
                spec.name
            ))
        })?;
        state.set_id(&record_set_id).await?;
        debug!("Record set {} provisionally has id {}", spec.name, record_set_id);

        let handle = ChangeHandle::new(&spec.zone_id, &record_set_id, &created.change_id);
        if let Err(e) = self.poller.await_convergence(&handle).await {
            warn!(
                "Record set {} ({}) did not converge; keeping its id for inspection",
                spec.name, record_set_id
            );
            return Err(e);
        }

        self.read(state).await
    }

    /// Refresh local fields from the server
    ///
    /// Only the name is copied back. The poller is not involved.
    pub async fn read(&self, state: &dyn ResourceState) -> Result<()> {
        let record_set_id = require_id(state, "read").await?;
        let zone_id = state.get_string(Field::ZoneId).await?;
        info!("Reading record set {}", record_set_id);

        let record_set = self.api.get_record_set(&zone_id, &record_set_id).await?;
        state
            .set(Field::Name, FieldValue::String(record_set.name))
            .await?;

        Ok(())
    }

    /// Apply the fields in `state` to the existing record set
    ///
    /// The record type is not expected to change; replacing a record set with
    /// one of another type is a delete followed by a create.
    pub async fn update(&self, state: &dyn ResourceState) -> Result<()> {
        let record_set_id = require_id(state, "update").await?;
        let spec = RecordSetSpec::from_state(state).await?;
        info!("Updating record set {} ({})", spec.name, record_set_id);

        let request = spec.to_record_set(Some(record_set_id.clone()))?;
        let updated = self.api.update_record_set(&request).await?;

        let handle = ChangeHandle::new(&spec.zone_id, &record_set_id, &updated.change_id);
        self.poller.await_convergence(&handle).await?;

        self.read(state).await
    }

    /// Delete the record set and forget its identifier
    pub async fn delete(&self, state: &dyn ResourceState) -> Result<()> {
        let record_set_id = require_id(state, "delete").await?;
        let zone_id = state.get_string(Field::ZoneId).await?;
        info!("Deleting record set {}", record_set_id);

        let deleted = self.api.delete_record_set(&zone_id, &record_set_id).await?;

        let handle = ChangeHandle::new(&zone_id, &record_set_id, &deleted.change_id);
        self.poller.await_convergence(&handle).await?;

        state.clear_id().await?;
        info!("Record set {} deleted", record_set_id);
        Ok(())
    }
}

async fn require_id(state: &dyn ResourceState, operation: &str) -> Result<String> {
    state
        .id()
        .await?
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            Error::invalid_input(format!(
                "cannot {operation} a record set that has no identifier"
            ))
        })
}
