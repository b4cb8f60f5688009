//! # services
//!
//! Business rules of the catalog: category grouping, ownership checks and the
//! prompt lifecycle built on top of the storage port.

pub mod categories;
pub mod ownership;
pub mod prompt_service;

pub use categories::{parse_categories, CategoryIndex};
pub use ownership::{can_edit, is_admin};
pub use prompt_service::{Catalog, PromptService};
