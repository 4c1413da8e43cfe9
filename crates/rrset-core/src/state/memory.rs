// # Memory Resource State
//
// In-memory implementation of ResourceState.
//
// ## Purpose
//
// Holds one resource's fields for the lifetime of the process. Used by
// embedders that keep resource state themselves, and by tests.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::ResourceData;
use crate::Error;
use crate::traits::{Field, FieldValue, ResourceState};

/// In-memory resource state
///
/// Clones share the same underlying data.
///
/// # Example
///
/// ```rust,no_run
/// use rrset_core::state::{MemoryResourceState, ResourceData};
/// use rrset_core::traits::{Field, ResourceState};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let state = MemoryResourceState::from_data(
///         ResourceData::default()
///             .with(Field::Name, "www")
///             .with(Field::Type, "TXT"),
///     );
///
///     state.set_id("rs-1").await?;
///     assert_eq!(state.id().await?, Some("rs-1".to_string()));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryResourceState {
    inner: Arc<RwLock<ResourceData>>,
}

impl MemoryResourceState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state seeded with `data`
    pub fn from_data(data: ResourceData) -> Self {
        Self {
            inner: Arc::new(RwLock::new(data)),
        }
    }

    /// Copy of the current data
    pub async fn snapshot(&self) -> ResourceData {
        self.inner.read().await.clone()
    }
}

#[async_trait]
impl ResourceState for MemoryResourceState {
    async fn get(&self, field: Field) -> Result<Option<FieldValue>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.fields.get(&field).cloned())
    }

    async fn set(&self, field: Field, value: FieldValue) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.fields.insert(field, value);
        Ok(())
    }

    async fn id(&self) -> Result<Option<String>, Error> {
        Ok(self.inner.read().await.id.clone())
    }

    async fn set_id(&self, id: &str) -> Result<(), Error> {
        self.inner.write().await.id = Some(id.to_string());
        Ok(())
    }

    async fn clear_id(&self) -> Result<(), Error> {
        self.inner.write().await.id = None;
        Ok(())
    }
}
