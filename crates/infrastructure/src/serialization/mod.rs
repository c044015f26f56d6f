//! Stable JSON serialization for state files.
//!
//! Output is pretty-printed with 2-space indentation and a trailing
//! newline so state files diff cleanly.

mod json;

pub use json::*;
