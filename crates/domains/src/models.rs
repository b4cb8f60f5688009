//! # Domain Models
//!
//! The prompt record and the value types that flow in and out of storage.
//! Identifiers are UUID v7 so they stay time-ordered.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

/// Offset of the civil timezone every `created_at` is recorded in (UTC+8).
pub const CATALOG_UTC_OFFSET_SECS: i32 = 8 * 3600;

/// A stored prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Raw category field, e.g. `"writing, code，misc"`.
    pub category: String,
    /// Address of the client that created the record. Never rewritten.
    pub creator_ip: String,
    pub created_at: DateTime<FixedOffset>,
}

/// Everything storage needs to persist a new prompt. Storage assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPrompt {
    pub title: String,
    pub content: String,
    pub category: String,
    pub creator_ip: String,
    pub created_at: DateTime<FixedOffset>,
}

/// The only fields an edit may touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptChanges {
    pub title: String,
    pub content: String,
    pub category: String,
}

/// Raw values submitted through the add/edit forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl PromptDraft {
    /// Checks the required fields and yields the editable field set.
    ///
    /// Emptiness is judged after trimming; the stored values are kept as submitted.
    pub fn validate(self) -> Result<PromptChanges, DomainError> {
        let title = required(self.title, "title")?;
        let content = required(self.content, "content")?;
        Ok(PromptChanges {
            title,
            content,
            category: self.category.unwrap_or_default(),
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, DomainError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DomainError::ValidationError(format!("{field} must not be empty"))),
    }
}

impl From<&Prompt> for PromptDraft {
    fn from(prompt: &Prompt) -> Self {
        Self {
            title: Some(prompt.title.clone()),
            content: Some(prompt.content.clone()),
            category: Some(prompt.category.clone()),
        }
    }
}

/// The current time in the catalog's civil timezone.
pub fn catalog_now() -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(CATALOG_UTC_OFFSET_SECS).unwrap_or(Utc.fix());
    Utc::now().with_timezone(&offset)
}

/// Administrator addresses, fixed at startup and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct AdminSet(Arc<HashSet<String>>);

impl AdminSet {
    /// Parses a comma-separated address list. Entries are trimmed, empties dropped.
    pub fn from_csv(raw: &str) -> Self {
        raw.split(',')
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn contains(&self, ip: &str) -> bool {
        self.0.contains(ip)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<String> for AdminSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(Arc::new(iter.into_iter().collect()))
    }
}
