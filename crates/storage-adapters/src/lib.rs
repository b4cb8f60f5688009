//! # storage-adapters
//!
//! Implementations of `PromptRepository`.
//!
//! `memory` keeps everything in process and is what tests and throwaway runs
//! use. `sqlite` (feature `db-sqlite`) is the persistent backend.

pub mod memory;
#[cfg(feature = "db-sqlite")]
pub mod sqlite;

pub use memory::MemoryPromptRepository;
#[cfg(feature = "db-sqlite")]
pub use sqlite::SqlitePromptRepository;
