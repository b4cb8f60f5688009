//! prompt-board/crates/domains/src/lib.rs
//!
//! Entities, errors and port definitions shared by every other crate.

pub mod address;
pub mod errors;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use address::*;
pub use errors::*;
pub use models::*;
pub use ports::*;
