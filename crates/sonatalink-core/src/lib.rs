//! SonataLink Core - Shared types for the SonataLink integration
//!
//! This crate provides the configuration-entry types produced by the setup
//! flow and the JSON-file store that persists them.

pub mod entry;
pub mod store;

pub use entry::{AuthToken, ConfigEntry, ConnectionInfo, EntryId, DEFAULT_NAME, DOMAIN};
pub use store::{EntryStore, StoreError, StoreResult};
