//! # Ports
//!
//! Any adapter must implement these traits to be used by the binary.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{NewPrompt, Prompt, PromptChanges};

/// Data persistence contract for prompts.
///
/// Each call is a single-record operation; callers get no cross-call
/// consistency guarantees.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PromptRepository: Send + Sync {
    /// All prompts. Callers must not rely on the order.
    async fn list_prompts(&self) -> anyhow::Result<Vec<Prompt>>;
    async fn get_prompt(&self, id: Uuid) -> anyhow::Result<Option<Prompt>>;
    /// Persists a prompt and returns the id storage assigned to it.
    async fn create_prompt(&self, prompt: NewPrompt) -> anyhow::Result<Uuid>;
    /// Returns `false` when no prompt has this id.
    async fn update_prompt(&self, id: Uuid, changes: PromptChanges) -> anyhow::Result<bool>;
    /// Returns `false` when no prompt has this id.
    async fn delete_prompt(&self, id: Uuid) -> anyhow::Result<bool>;
    async fn count_prompts(&self) -> anyhow::Result<u64>;
}

/// Signs the short notices carried across a redirect.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait NoticeSigner: Send + Sync {
    /// Encodes `message` into a token safe to store in a cookie.
    fn sign(&self, message: &str) -> String;
    /// Returns the message if the token is intact, `None` otherwise.
    fn verify(&self, token: &str) -> Option<String>;
}
