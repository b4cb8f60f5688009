//! Askama page templates and the view models they render.

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use domains::{DomainError, Prompt, PromptDraft};
use services::{Catalog, CategoryIndex};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One prompt as shown on the list page.
pub struct PromptCard<'a> {
    pub prompt: &'a Prompt,
    pub created_at: String,
    /// The viewer may edit and delete this prompt
    pub editable: bool,
}

pub struct CategorySection<'a> {
    pub name: &'a str,
    pub cards: Vec<PromptCard<'a>>,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage<'a> {
    pub sections: Vec<CategorySection<'a>>,
    pub total: usize,
    pub uncategorized: usize,
    pub current_ip: &'a str,
    pub is_admin: bool,
    pub notice: Option<String>,
}

impl<'a> IndexPage<'a> {
    pub fn new(catalog: &'a Catalog, index: &CategoryIndex<'a>, notice: Option<String>) -> Self {
        let sections = index
            .sections()
            .map(|(name, prompts)| CategorySection {
                name,
                cards: prompts
                    .iter()
                    .copied()
                    .map(|prompt| PromptCard {
                        prompt,
                        created_at: prompt.created_at.format(DATETIME_FORMAT).to_string(),
                        editable: catalog.can_edit(prompt),
                    })
                    .collect(),
            })
            .collect();

        Self {
            sections,
            total: catalog.prompts.len(),
            uncategorized: index.uncategorized(),
            current_ip: &catalog.viewer,
            is_admin: catalog.is_admin,
            notice,
        }
    }
}

/// Values echoed back into the add/edit forms.
#[derive(Debug, Default)]
pub struct FormValues {
    pub title: String,
    pub content: String,
    pub category: String,
}

impl From<PromptDraft> for FormValues {
    fn from(draft: PromptDraft) -> Self {
        Self {
            title: draft.title.unwrap_or_default(),
            content: draft.content.unwrap_or_default(),
            category: draft.category.unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "add.html")]
pub struct AddPage {
    pub form: FormValues,
    pub notice: Option<String>,
}

#[derive(Template)]
#[template(path = "edit.html")]
pub struct EditPage {
    pub id: String,
    pub form: FormValues,
    pub notice: Option<String>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub message: String,
    pub notice: Option<String>,
}

/// Renders `template` into an HTML response with `status`.
pub fn render<T: Template>(template: &T, status: StatusCode) -> Result<Response, DomainError> {
    let html = template
        .render()
        .map_err(|e| DomainError::Internal(format!("template rendering failed: {e}")))?;
    Ok((status, Html(html)).into_response())
}
