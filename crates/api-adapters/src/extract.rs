//! Request extractors.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use domains::RequestOrigin;

use crate::state::AppState;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// The requesting client's address under the configured `AddressPolicy`.
///
/// The peer address comes from `ConnectInfo`, so the server must be started
/// with `into_make_service_with_connect_info::<SocketAddr>()`. Without it the
/// peer is unknown and resolves to an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddr(pub String);

impl FromRequestParts<AppState> for ClientAddr {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let forwarded_for = parts
            .headers
            .get(X_FORWARDED_FOR)
            .and_then(|value| value.to_str().ok());
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        let origin = RequestOrigin { forwarded_for, peer };
        Ok(ClientAddr(state.address_policy.resolve(&origin)))
    }
}
