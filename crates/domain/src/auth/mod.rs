//! Authentication types

mod types;

pub use types::{ApiKeyPlacement, AuthConfig};
