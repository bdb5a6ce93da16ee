//! services/api/src/adapters/supabase_auth.rs
//!
//! This module contains the adapter for the hosted backend's authentication
//! REST endpoints (GoTrue). It implements the `AuthProvider` port; password
//! storage, token issuance and session expiry all stay on the backend.

use async_trait::async_trait;
use inventory_core::domain::{AuthSession, AuthUser};
use inventory_core::ports::{AuthProvider, PortError, PortResult};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `AuthProvider` against `{project_url}/auth/v1`.
#[derive(Clone)]
pub struct SupabaseAuthAdapter {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseAuthAdapter {
    /// Creates a new `SupabaseAuthAdapter` with its own HTTP client.
    pub fn new(project_url: &str, api_key: String) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(Self::with_client(client, project_url, api_key))
    }

    /// Creates an adapter from an existing client.
    pub fn with_client(client: Client, project_url: &str, api_key: String) -> Self {
        Self {
            client,
            base_url: format!("{}/auth/v1", project_url.trim_end_matches('/')),
            api_key,
        }
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", &self.api_key)
    }
}

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Deserialize)]
struct GoTrueUser {
    id: Uuid,
    email: Option<String>,
}
impl GoTrueUser {
    fn to_domain(self) -> AuthUser {
        AuthUser {
            id: self.id,
            email: self.email,
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    user: GoTrueUser,
}

/// Pulls the human-readable message out of a GoTrue error body.
fn error_message(body: &Value) -> String {
    ["msg", "error_description", "message", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .unwrap_or("request rejected by auth provider")
        .to_string()
}

async fn read_json(response: Response) -> PortResult<Value> {
    response
        .json::<Value>()
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))
}

fn transport(e: reqwest::Error) -> PortError {
    PortError::Unexpected(format!("auth provider unreachable: {}", e))
}

//=========================================================================================
// `AuthProvider` Trait Implementation
//=========================================================================================

#[async_trait]
impl AuthProvider for SupabaseAuthAdapter {
    async fn sign_up(&self, email: &str, password: &str) -> PortResult<AuthUser> {
        let response = self
            .request(self.client.post(format!("{}/signup", self.base_url)))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = read_json(response).await?;
        if !status.is_success() {
            return Err(if status.is_client_error() {
                PortError::Rejected(error_message(&body))
            } else {
                PortError::Unexpected(format!("sign-up failed with {}", status))
            });
        }

        // With e-mail confirmation off the body is a session wrapping the user;
        // with it on, the body is the bare user.
        let user = body.get("user").cloned().unwrap_or(body);
        let user: GoTrueUser =
            serde_json::from_value(user).map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(user.to_domain())
    }

    async fn sign_in(&self, email: &str, password: &str) -> PortResult<AuthSession> {
        let response = self
            .request(
                self.client
                    .post(format!("{}/token?grant_type=password", self.base_url)),
            )
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status.is_client_error() {
            return Err(PortError::Unauthorized);
        }
        if !status.is_success() {
            return Err(PortError::Unexpected(format!("sign-in failed with {}", status)));
        }

        let token = response
            .json::<TokenResponse>()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(AuthSession {
            access_token: token.access_token,
            expires_in: token.expires_in,
            user: token.user.to_domain(),
        })
    }

    async fn sign_out(&self, access_token: &str) -> PortResult<()> {
        let response = self
            .request(self.client.post(format!("{}/logout", self.base_url)))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport)?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(PortError::Unauthorized),
            status => Err(PortError::Unexpected(format!("sign-out failed with {}", status))),
        }
    }

    async fn get_user(&self, access_token: &str) -> PortResult<AuthUser> {
        let response = self
            .request(self.client.get(format!("{}/user", self.base_url)))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(PortError::Unauthorized);
        }
        if !status.is_success() {
            return Err(PortError::Unexpected(format!("user lookup failed with {}", status)));
        }

        let user = response
            .json::<GoTrueUser>()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(user.to_domain())
    }
}
