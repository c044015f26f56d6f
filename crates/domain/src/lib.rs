//! Relay Domain - Core business types
//!
//! This crate defines the data model for the Relay API client: the
//! collection tree, stored requests and their patches, open tabs and the
//! dispatch descriptors. All types here are pure Rust with no I/O.

pub mod auth;
pub mod collection;
pub mod error;
pub mod id;
pub mod persistence;
pub mod request;
pub mod response;
pub mod tab;

pub use auth::{ApiKeyPlacement, AuthConfig};
pub use collection::{Collection, Folder};
pub use error::{DomainError, DomainResult};
pub use id::{Id, generate_id};
pub use persistence::{CollectionsState, PersistedState, TabsState};
pub use request::{Header, HttpMethod, QueryParam, QueryParams, RequestPatch, SavedRequest};
pub use response::{DispatchRequest, HeaderMap, HttpResponse, ResponseDescriptor};
pub use tab::{Tab, TabId};
