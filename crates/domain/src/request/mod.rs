//! Request-related types

mod header;
mod method;
mod patch;
pub mod query;
mod saved;

pub use header::{CONTENT_TYPE, Header, JSON_CONTENT_TYPE, default_headers};
pub use method::HttpMethod;
pub use patch::RequestPatch;
pub use query::{QueryParam, QueryParams};
pub use saved::SavedRequest;
