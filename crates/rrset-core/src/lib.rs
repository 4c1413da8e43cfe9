// # rrset-core
//
// Core library for managing DNS record sets against a DNS-as-a-service API.
//
// ## Architecture Overview
//
// - **ResourceState**: Trait for the fields and identifier of one record set
// - **DnsApi**: Trait for the record-set endpoints of the DNS service
// - **Clock**: Trait for time, so convergence waits can run on virtual time
// - **translate**: Pure conversion of a record-set description into records
// - **ConvergencePoller**: Waits for an asynchronous change to complete
// - **RecordSetManager**: Create/read/update/delete built on the above
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Translation, waiting and orchestration are separate
// 2. **Library-First**: The CLI is a thin layer over this crate
// 3. **No Hidden State**: Every wait owns its own local state; nothing is global
// 4. **Deterministic Tests**: All waits go through the Clock trait

pub mod config;
pub mod convergence;
pub mod error;
pub mod lifecycle;
pub mod state;
pub mod traits;
pub mod translate;
pub mod types;

// Re-export core types for convenience
pub use config::{ClientConfig, ConvergenceConfig, RrsetConfig};
pub use convergence::{ChangeState, ChangeStatus, ConvergencePoller};
pub use error::{Error, Result, ValidationError};
pub use lifecycle::RecordSetManager;
pub use state::{FileResourceState, MemoryResourceState, ResourceData};
pub use traits::{Clock, DnsApi, Field, FieldValue, ResourceState, SystemClock, VirtualClock};
pub use translate::{RecordSetSpec, RecordValue, translate};
pub use types::{ChangeHandle, Record, RecordSet, RecordSetChange, RecordSetUpdate, RecordType};
