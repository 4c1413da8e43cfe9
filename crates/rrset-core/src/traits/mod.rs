//! Core traits for record-set lifecycle management
//!
//! This module defines the abstract interfaces the core drives.
//!
//! - [`DnsApi`]: Submit mutations and look up changes on the remote API
//! - [`ResourceState`]: Declarative resource fields and identifier
//! - [`Clock`]: Time source for the convergence poller

pub mod clock;
pub mod dns_api;
pub mod resource_state;

pub use clock::{Clock, SystemClock, VirtualClock};
pub use dns_api::DnsApi;
pub use resource_state::{Field, FieldValue, ResourceState};
