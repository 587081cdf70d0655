use std::sync::Arc;

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::request::Parts;
use axum::response::{AppendHeaders, IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use ringshelf::config::{SESSION_COOKIE, SESSION_MAX_AGE_SECS};

use crate::auth;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginBody {
    pub passcode: Option<String>,
    /// Accepted alias, so password-manager autofill keeps working.
    pub password: Option<String>,
}

/// POST /api/login
///
/// Compare the submitted passcode against the household secret and set the
/// signed session cookie on success.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, AppError> {
    let passcode = body.passcode.or(body.password).unwrap_or_default();
    if passcode.is_empty() || !state.signer.passcode_matches(&passcode) {
        return Err(AppError {
            status: axum::http::StatusCode::UNAUTHORIZED,
            message: "Wrong passcode".into(),
        });
    }

    let cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE,
        state.signer.mint(),
        SESSION_MAX_AGE_SECS,
    );
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(json!({ "ok": true })),
    ))
}

/// POST /api/logout
pub async fn logout() -> impl IntoResponse {
    let cookie = format!("{}=; Path=/; Max-Age=0", SESSION_COOKIE);
    (
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(json!({ "ok": true })),
    )
}

/// GET /api/me
///
/// Session check; never 401s, just reports whether the cookie verifies.
pub async fn me(State(state): State<Arc<AppState>>, parts: Parts) -> Json<serde_json::Value> {
    let ok = auth::has_session(&parts, &state);
    Json(json!({ "ok": ok }))
}
