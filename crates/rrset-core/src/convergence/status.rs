//! Change status model
//!
//! Raw status strings reported by the change lookup are classified into a
//! small state set the poller can act on.

use crate::types::RecordSetChange;

/// Classification of a raw change status string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeState {
    /// "Pending", or the empty string
    Pending,
    /// "Complete"
    Complete,
    /// "Failed"
    Failed,
    /// Anything else, carried verbatim
    Unknown(String),
}

impl ChangeState {
    /// Classify a raw status string
    ///
    /// The empty status is treated as pending. It has been observed from the
    /// server without documented meaning and is handled as an API quirk.
    pub fn from_status(status: &str) -> Self {
        match status {
            "Pending" | "" => ChangeState::Pending,
            "Complete" => ChangeState::Complete,
            "Failed" => ChangeState::Failed,
            other => ChangeState::Unknown(other.to_string()),
        }
    }
}

/// Outcome of one change lookup
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeStatus {
    /// The lookup answered 404: the change has not reached the read path yet
    NotYetVisible,
    /// Still processing
    Pending(RecordSetChange),
    /// Applied
    Complete(RecordSetChange),
    /// Rejected by the server
    Failed(RecordSetChange),
    /// Status outside the known set
    Unknown(RecordSetChange),
}

impl ChangeStatus {
    /// Classify a change returned by the lookup
    pub fn from_change(change: RecordSetChange) -> Self {
        match ChangeState::from_status(&change.status) {
            ChangeState::Pending => ChangeStatus::Pending(change),
            ChangeState::Complete => ChangeStatus::Complete(change),
            ChangeState::Failed => ChangeStatus::Failed(change),
            ChangeState::Unknown(_) => ChangeStatus::Unknown(change),
        }
    }

    /// Classified state; not-yet-visible counts as pending
    pub fn state(&self) -> ChangeState {
        match self {
            ChangeStatus::NotYetVisible => ChangeState::Pending,
            ChangeStatus::Pending(_) => ChangeState::Pending,
            ChangeStatus::Complete(_) => ChangeState::Complete,
            ChangeStatus::Failed(_) => ChangeState::Failed,
            ChangeStatus::Unknown(change) => ChangeState::Unknown(change.status.clone()),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state() == ChangeState::Pending
    }

    /// Raw change object, when the lookup returned one
    pub fn change(&self) -> Option<&RecordSetChange> {
        match self {
            ChangeStatus::NotYetVisible => None,
            ChangeStatus::Pending(change)
            | ChangeStatus::Complete(change)
            | ChangeStatus::Failed(change)
            | ChangeStatus::Unknown(change) => Some(change),
        }
    }
}
