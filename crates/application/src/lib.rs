//! Relay Application - Use cases and ports
//!
//! This crate owns the stateful core: the entity store holding the
//! collection tree, the tab registry holding open working copies, the
//! workbench that keeps both in step, and the dispatcher that sends a
//! snapshot through the HTTP client port.

pub mod dispatch;
pub mod entity_store;
pub mod error;
pub mod ports;
pub mod tab_registry;
pub mod workbench;

#[cfg(test)]
mod test_support;

pub use dispatch::{DEFAULT_TIMEOUT_MS, DispatchError, Dispatcher};
pub use entity_store::EntityStore;
pub use error::{ApplicationError, ApplicationResult};
pub use ports::{Clock, HttpClient, StateStorage, StorageError, TransportError};
pub use tab_registry::TabRegistry;
pub use workbench::{EditOutcome, Workbench};
