//! # Handlers
//!
//! Each handler resolves the client address, calls `PromptService` and turns
//! the outcome into a page, a redirect, or a redirect carrying a notice.

use askama::Template;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use domains::{DomainError, PromptDraft};

use crate::extract::ClientAddr;
use crate::flash;
use crate::state::AppState;
use crate::views::{render, AddPage, EditPage, ErrorPage, FormValues, IndexPage};

pub const NOT_FOUND_NOTICE: &str = "Prompt not found";

/// `GET /`: every categorized prompt, grouped by label.
pub async fn index(
    State(state): State<AppState>,
    ClientAddr(ip): ClientAddr,
    headers: HeaderMap,
) -> Response {
    let pending = flash::take_notice(&headers, state.signer.as_ref());

    let mut response = match state.prompts.catalog(&ip).await {
        Ok(catalog) => {
            let index = catalog.index();
            let page = IndexPage::new(&catalog, &index, pending.message);
            show(&state, &page, StatusCode::OK)
        }
        Err(e) => recover(&state, e),
    };

    if pending.present {
        flash::clear_notice(&mut response);
    }
    response
}

/// `GET /add`
pub async fn add_form(State(state): State<AppState>) -> Response {
    let page = AddPage {
        form: FormValues::default(),
        notice: None,
    };
    show(&state, &page, StatusCode::OK)
}

/// `POST /add`
pub async fn add_prompt(
    State(state): State<AppState>,
    ClientAddr(ip): ClientAddr,
    Form(draft): Form<PromptDraft>,
) -> Response {
    match state.prompts.create(draft.clone(), &ip).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(DomainError::ValidationError(reason)) => {
            let page = AddPage {
                form: draft.into(),
                notice: Some(reason),
            };
            show(&state, &page, StatusCode::BAD_REQUEST)
        }
        Err(e) => recover(&state, e),
    }
}

/// `GET /edit/{id}`
pub async fn edit_form(
    State(state): State<AppState>,
    ClientAddr(ip): ClientAddr,
    Path(id): Path<String>,
) -> Response {
    match state.prompts.fetch_for_edit(&id, &ip).await {
        Ok(prompt) => {
            let page = EditPage {
                id: prompt.id.to_string(),
                form: PromptDraft::from(&prompt).into(),
                notice: None,
            };
            show(&state, &page, StatusCode::OK)
        }
        Err(e) => recover(&state, e),
    }
}

/// `POST /edit/{id}`
pub async fn edit_prompt(
    State(state): State<AppState>,
    ClientAddr(ip): ClientAddr,
    Path(id): Path<String>,
    Form(draft): Form<PromptDraft>,
) -> Response {
    match state.prompts.update(&id, draft.clone(), &ip).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(DomainError::ValidationError(reason)) => {
            let page = EditPage {
                id,
                form: draft.into(),
                notice: Some(reason),
            };
            show(&state, &page, StatusCode::BAD_REQUEST)
        }
        Err(e) => recover(&state, e),
    }
}

/// `POST /delete/{id}`
pub async fn delete_prompt(
    State(state): State<AppState>,
    ClientAddr(ip): ClientAddr,
    Path(id): Path<String>,
) -> Response {
    match state.prompts.delete(&id, &ip).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) => recover(&state, e),
    }
}

fn show<T: Template>(state: &AppState, page: &T, status: StatusCode) -> Response {
    render(page, status).unwrap_or_else(|e| recover(state, e))
}

/// Maps a failed operation to what the visitor sees.
///
/// Missing prompts and ownership denials go back to the list with a notice.
/// Everything else is logged and answered with the generic error page.
fn recover(state: &AppState, err: DomainError) -> Response {
    match err {
        DomainError::NotFound(id) => {
            tracing::info!(prompt_id = %id, "prompt not found");
            flash::redirect_with_notice(state.signer.as_ref(), NOT_FOUND_NOTICE)
        }
        DomainError::Forbidden(action) => {
            let notice = format!("You do not have permission to {action} this prompt");
            flash::redirect_with_notice(state.signer.as_ref(), &notice)
        }
        DomainError::ValidationError(reason) => {
            let page = ErrorPage {
                message: reason,
                notice: None,
            };
            show(state, &page, StatusCode::BAD_REQUEST)
        }
        DomainError::StorageUnavailable(e) => {
            tracing::error!(error = %format_args!("{e:#}"), "storage unavailable");
            server_error()
        }
        DomainError::Internal(msg) => {
            tracing::error!(error = %msg, "internal error");
            server_error()
        }
    }
}

fn server_error() -> Response {
    let page = ErrorPage {
        message: "The server hit an unexpected error. Please try again later.".to_string(),
        notice: None,
    };
    render(&page, StatusCode::INTERNAL_SERVER_ERROR).unwrap_or_else(|e| {
        tracing::error!(error = %e, "error page failed to render");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    })
}
