//! # vigia-sheets
//!
//! The remote spreadsheet acting as Vigía's database: one worksheet per
//! collection form, addressed by a fixed spreadsheet identifier.
//!
//! - Service-account authentication with an expiry-cached access token
//! - Lazy worksheet creation and header reconciliation (missing schema
//!   columns are appended, never reordered)
//! - Batched appends, so a multi-row submission commits atomically
//! - TTL-memoized reads, invalidated explicitly after every write
//! - Locate-by-uid update and delete
//!
//! The store talks to a [`backend::SheetsBackend`]; production uses the
//! HTTP implementation, tests use [`memory::InMemoryBackend`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod backend;
pub mod error;
pub mod memory;
pub mod store;

pub use backend::{HttpBackend, SheetsBackend};
pub use error::{Error, Result};
pub use store::{reconcile_headers, SheetsStore, StoreConfig};
