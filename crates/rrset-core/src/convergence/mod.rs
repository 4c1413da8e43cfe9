//! Convergence poller
//!
//! After a mutation is submitted the server applies it asynchronously. The
//! poller looks up the change until it is complete, failed, or the wait budget
//! runs out.
//!
//! ## State Machine
//!
//! ```text
//!             settle delay
//!                  │
//!                  ▼
//!        ┌───▶ [ lookup ] ──── 404 ──────────┐
//!        │         │                          │
//!        │         ├── "Pending" / "" ────────┤
//!        │         │                          ▼
//!        │         │                     wait ≥ min interval
//!        │         │                     (deadline checked every
//!        │         │                      poll interval)
//!        │         │                          │
//!        └─────────┼──────────────────────────┘
//!                  │
//!                  ├── "Complete" ──▶ Ok(change)
//!                  ├── "Failed" ────▶ Err(ChangeFailed)
//!                  ├── other status ▶ Err(UnexpectedStatus)
//!                  ├── other error ─▶ Err(unchanged)
//!                  └── deadline ────▶ Err(Timeout)
//! ```
//!
//! The loop runs inline in the calling task. It spawns nothing and holds no
//! locks; every wait gets its own local state.

pub mod status;

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info};

use crate::config::ConvergenceConfig;
use crate::error::{Error, Result};
use crate::traits::{Clock, DnsApi};
use crate::types::{ChangeHandle, RecordSetChange};

pub use status::{ChangeState, ChangeStatus};

/// Drives a change to a terminal state
pub struct ConvergencePoller {
    api: Arc<dyn DnsApi>,
    clock: Arc<dyn Clock>,
    config: ConvergenceConfig,
}

impl ConvergencePoller {
    pub fn new(api: Arc<dyn DnsApi>, clock: Arc<dyn Clock>, config: ConvergenceConfig) -> Self {
        Self { api, clock, config }
    }

    pub fn config(&self) -> &ConvergenceConfig {
        &self.config
    }

    /// Wait until the change is complete
    ///
    /// # Returns
    ///
    /// - `Ok(RecordSetChange)`: the change as last reported, status "Complete"
    /// - `Err(Error::ChangeFailed)`: the server reported "Failed"
    /// - `Err(Error::UnexpectedStatus)`: a status outside the known set
    /// - `Err(Error::Timeout)`: still pending when the timeout expired
    /// - `Err(_)`: any lookup error other than 404, unchanged
    pub async fn await_convergence(&self, handle: &ChangeHandle) -> Result<RecordSetChange> {
        let started = self.clock.now();
        // `None` is a point too far away for `Instant` to represent.
        let deadline = started.checked_add(self.config.timeout());

        info!("Waiting for change {} to complete", handle);

        self.wait_until(started.checked_add(self.config.delay()), deadline).await;

        let mut ticks = 0usize;
        loop {
            if deadline.is_some_and(|deadline| self.clock.now() >= deadline) {
                let elapsed = self.clock.now() - started;
                error!(
                    "Change {} still pending after {:?} ({} lookups)",
                    handle, elapsed, ticks
                );
                return Err(Error::Timeout {
                    change_id: handle.change_id.clone(),
                    elapsed,
                });
            }

            ticks += 1;
            match self.tick(handle).await? {
                ChangeStatus::Complete(change) => {
                    info!(
                        "Change {} complete after {} lookup(s)",
                        handle.change_id, ticks
                    );
                    return Ok(change);
                }
                ChangeStatus::Failed(change) => {
                    error!("record set status Failed: {:?}", change);
                    return Err(Error::ChangeFailed {
                        change_id: handle.change_id.clone(),
                        change: Box::new(change),
                    });
                }
                ChangeStatus::Unknown(change) => {
                    error!(
                        "Change {} reported unexpected status {:?}",
                        handle.change_id, change.status
                    );
                    return Err(Error::UnexpectedStatus {
                        change_id: handle.change_id.clone(),
                        status: change.status,
                    });
                }
                ChangeStatus::NotYetVisible => {
                    debug!("Change {} not visible yet (lookup {})", handle.change_id, ticks);
                }
                ChangeStatus::Pending(change) => {
                    debug!(
                        "Change {} status {:?} (lookup {})",
                        handle.change_id, change.status, ticks
                    );
                }
            }

            let next_tick = self.clock.now().checked_add(self.config.min_interval());
            self.wait_until(next_tick, deadline).await;
        }
    }

    /// Perform one change lookup and classify the result
    ///
    /// A 404 means the change has not propagated to the read path yet and is
    /// reported as [`ChangeStatus::NotYetVisible`]. Every other error is
    /// returned as is.
    pub async fn tick(&self, handle: &ChangeHandle) -> Result<ChangeStatus> {
        match self
            .api
            .record_set_change(&handle.zone_id, &handle.record_set_id, &handle.change_id)
            .await
        {
            Ok(change) => Ok(ChangeStatus::from_change(change)),
            Err(e) if e.is_not_found() => Ok(ChangeStatus::NotYetVisible),
            Err(e) => {
                error!(
                    "Change lookup via {} failed for {}: {}",
                    self.api.client_name(),
                    handle,
                    e
                );
                Err(e)
            }
        }
    }

    /// Sleep until `target` in slices of at most one poll interval, returning
    /// early once `deadline` has passed
    ///
    /// A `None` bound is never reached.
    async fn wait_until(&self, target: Option<Instant>, deadline: Option<Instant>) {
        let poll_interval = self.config.poll_interval();
        loop {
            let now = self.clock.now();
            let mut slice = poll_interval;
            for bound in [target, deadline].into_iter().flatten() {
                if now >= bound {
                    return;
                }
                slice = slice.min(bound - now);
            }
            self.clock.sleep(slice).await;
        }
    }
}
