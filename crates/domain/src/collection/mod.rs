//! Collection and folder types

mod item;

pub use item::{Collection, Folder, find_request, find_request_mut};
