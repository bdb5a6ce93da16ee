//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use inventory_core::ports::PortError;
use std::sync::Arc;
use tracing::{error, warn};

use crate::web::notice::reject;
use crate::web::state::{AppState, CurrentUser};

pub const SESSION_COOKIE: &str = "session";

/// Reads the session token from the `session` cookie, falling back to a
/// `Bearer` authorization header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|c| {
            c.trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .filter(|token| !token.is_empty());

    from_cookie
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
        })
        .map(str::to_string)
}

/// Middleware that resolves the session token to a user.
///
/// If valid, inserts a `CurrentUser` into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(access_token) = session_token(req.headers()) else {
        return reject(
            StatusCode::UNAUTHORIZED,
            "You must be logged in to perform this action",
        )
        .into_response();
    };

    let user = match state.auth.get_user(&access_token).await {
        Ok(user) => user,
        Err(PortError::Unauthorized) => {
            warn!("Rejected stale or invalid session token");
            return reject(StatusCode::UNAUTHORIZED, "Your session has expired").into_response();
        }
        Err(e) => {
            error!("Failed to validate session: {:?}", e);
            return reject(StatusCode::UNAUTHORIZED, "Unable to verify your session")
                .into_response();
        }
    };

    req.extensions_mut().insert(CurrentUser {
        id: user.id,
        email: user.email,
        access_token,
    });

    next.run(req).await
}
