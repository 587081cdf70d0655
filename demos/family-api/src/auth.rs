//! Session gate for the data endpoints.
//!
//! One shared household identity: a request is authorized when it carries a
//! session cookie whose signature checks out. Handlers opt in by taking
//! [`RequireSession`] as an extractor argument.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

/// Pull one cookie's value out of a `Cookie` header.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k == name).then_some(v)
    })
}

/// Whether the request carries a valid session cookie.
pub fn has_session(parts: &Parts, state: &AppState) -> bool {
    parts
        .headers
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|header| cookie_value(header, ringshelf::config::SESSION_COOKIE))
        .map(|value| state.signer.verify(value))
        .unwrap_or(false)
}

/// Extractor that rejects the request with 401 unless the session cookie
/// verifies.
pub struct RequireSession;

impl FromRequestParts<Arc<AppState>> for RequireSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if has_session(parts, state) {
            Ok(RequireSession)
        } else {
            Err(AppError::unauthorized())
        }
    }
}
