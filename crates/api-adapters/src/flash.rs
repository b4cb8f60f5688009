//! One-shot notices carried across a redirect in a signed cookie.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Redirect, Response};
use domains::NoticeSigner;

pub const FLASH_COOKIE: &str = "pb_flash";

/// Redirects to the list page with `message` queued for display.
pub fn redirect_with_notice(signer: &dyn NoticeSigner, message: &str) -> Response {
    let cookie = format!(
        "{FLASH_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
        signer.sign(message)
    );
    let mut response = Redirect::to("/").into_response();
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        // Signed tokens are base64/hex only, so this is unreachable in practice
        Err(e) => tracing::warn!(error = %e, "dropping unencodable notice"),
    }
    response
}

/// A notice read from the request.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PendingNotice {
    /// The verified message, if the cookie was intact.
    pub message: Option<String>,
    /// Whether a flash cookie was sent at all (and so needs clearing).
    pub present: bool,
}

/// Reads and verifies the flash cookie, if any.
pub fn take_notice(headers: &HeaderMap, signer: &dyn NoticeSigner) -> PendingNotice {
    let token = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == FLASH_COOKIE)
        .map(|(_, token)| token);

    match token {
        Some(token) => PendingNotice {
            message: signer.verify(token),
            present: true,
        },
        None => PendingNotice::default(),
    }
}

/// Expires the flash cookie on `response`.
pub fn clear_notice(response: &mut Response) {
    let expired = HeaderValue::from_static("pb_flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax");
    response.headers_mut().append(SET_COOKIE, expired);
}
