//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for sign-up, login, logout and session lookup.
//! Credentials never touch this service's storage: they go straight to the
//! hosted auth provider, and the access token it issues becomes the
//! `session` cookie.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use inventory_core::{NewProfile, PortError};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::web::forms::{LoginForm, RegisterForm};
use crate::web::middleware::{session_token, SESSION_COOKIE};
use crate::web::notice::{port_failure, reject, HandlerResult, Notice, NoticeBody, ValidatedJson};
use crate::web::state::{AppState, CurrentUser};
use crate::web::views::{ProfileView, UserView};

//=========================================================================================
// Response Types
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub notice: Notice,
    pub user: UserView,
}

#[derive(Serialize, ToSchema)]
pub struct SessionResponse {
    pub user: UserView,
    pub profile: Option<ProfileView>,
}

fn session_cookie(token: &str, max_age: i64) -> String {
    format!(
        "{}={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE, token, max_age
    )
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/signup - Create an account and its profile
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = RegisterForm,
    responses(
        (status = 201, description = "Account created successfully", body = AuthResponse),
        (status = 422, description = "Invalid form input or account rejected", body = NoticeBody),
        (status = 500, description = "Internal server error", body = NoticeBody)
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    ValidatedJson(form): ValidatedJson<RegisterForm>,
) -> HandlerResult<impl IntoResponse> {
    // 1. Create the account with the auth provider
    let user = state
        .auth
        .sign_up(&form.email, &form.password)
        .await
        .map_err(|e| port_failure(e, "Failed to create user account"))?;

    // 2. Create the profile row that belongs to it
    state
        .store
        .create_profile(NewProfile {
            id: user.id,
            full_name: form.full_name.trim().to_string(),
            company_name: form.company_name.trim().to_string(),
        })
        .await
        .map_err(|e| {
            error!(user_id = %user.id, "Account created without a profile");
            port_failure(e, "Failed to create profile")
        })?;

    info!(user_id = %user.id, "New account registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            notice: Notice::success("Account created successfully"),
            user: user.into(),
        }),
    ))
}

/// POST /auth/login - Sign in with e-mail and password
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginForm,
    responses(
        (status = 200, description = "Logged in successfully", body = AuthResponse),
        (status = 401, description = "Invalid email or password", body = NoticeBody),
        (status = 422, description = "Invalid form input", body = NoticeBody)
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    ValidatedJson(form): ValidatedJson<LoginForm>,
) -> HandlerResult<impl IntoResponse> {
    let session = match state.auth.sign_in(&form.email, &form.password).await {
        Ok(session) => session,
        Err(PortError::Unauthorized) => {
            return Err(reject(StatusCode::UNAUTHORIZED, "Invalid email or password"));
        }
        Err(e) => return Err(port_failure(e, "Failed to sign in")),
    };

    let cookie = session_cookie(&session.access_token, session.expires_in);
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            notice: Notice::success("Logged in successfully"),
            user: session.user.into(),
        }),
    ))
}

/// POST /auth/logout - End the session at the provider and clear the cookie
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "No active session", body = NoticeBody)
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> HandlerResult<impl IntoResponse> {
    let token = session_token(&headers)
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "No session found"))?;

    match state.auth.sign_out(&token).await {
        Ok(()) => {}
        // An already-expired token still gets its cookie cleared.
        Err(PortError::Unauthorized) => warn!("Logout with an expired session token"),
        Err(e) => return Err(port_failure(e, "Failed to logout")),
    }

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, session_cookie("", 0))],
        Json(Notice::success("Logged out")),
    ))
}

/// GET /auth/session - The signed-in user and their profile
#[utoipa::path(
    get,
    path = "/auth/session",
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 401, description = "No active session", body = NoticeBody)
    )
)]
pub async fn session_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> HandlerResult<Json<SessionResponse>> {
    let profile = match state.store.get_profile(user.id).await {
        Ok(profile) => Some(ProfileView::from(profile)),
        Err(PortError::NotFound(_)) => None,
        Err(e) => return Err(port_failure(e, "Failed to load profile")),
    };

    Ok(Json(SessionResponse {
        user: UserView {
            id: user.id,
            email: user.email,
        },
        profile,
    }))
}
