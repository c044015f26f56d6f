//! State storage adapters.

mod file_state_storage;
mod memory_state_storage;

pub use file_state_storage::FileStateStorage;
pub use memory_state_storage::MemoryStateStorage;
