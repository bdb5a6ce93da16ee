//! services/api/src/web/notice.rs
//!
//! The notice payload every handler answers with, plus the helpers that turn
//! port and validation failures into `(StatusCode, Json<NoticeBody>)`.

use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    Json,
};
use inventory_core::{BillingError, PortError, StockError};
use serde::{de::DeserializeOwned, Serialize};
use tracing::error;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

//=========================================================================================
// Payloads
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient message for the user: the JSON counterpart of a toast.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldMessage {
    pub field: String,
    pub message: String,
}

/// Body of every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct NoticeBody {
    pub notice: Notice,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldMessage>,
}

/// Body of every successful write: the notice plus the reloaded listing.
#[derive(Debug, Serialize)]
pub struct Mutation<T> {
    pub notice: Notice,
    pub data: T,
}

impl<T> Mutation<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            notice: Notice::success(message),
            data,
        }
    }
}

pub type HandlerError = (StatusCode, Json<NoticeBody>);
pub type HandlerResult<T> = Result<T, HandlerError>;

//=========================================================================================
// Failure Helpers
//=========================================================================================

pub fn reject(status: StatusCode, message: impl Into<String>) -> HandlerError {
    (
        status,
        Json(NoticeBody {
            notice: Notice::error(message),
            errors: Vec::new(),
        }),
    )
}

/// 422 carrying every field message; the notice repeats the first one.
pub fn invalid(errors: Vec<FieldMessage>) -> HandlerError {
    let message = errors
        .first()
        .map(|e| e.message.clone())
        .unwrap_or_else(|| "Invalid input".to_string());
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(NoticeBody {
            notice: Notice::error(message),
            errors,
        }),
    )
}

/// Logs the port error and answers with a generic notice.
pub fn port_failure(err: PortError, message: &str) -> HandlerError {
    error!("{}: {:?}", message, err);
    match err {
        PortError::NotFound(_) => reject(StatusCode::NOT_FOUND, "Not found"),
        PortError::Unauthorized => reject(
            StatusCode::UNAUTHORIZED,
            "You must be logged in to perform this action",
        ),
        PortError::Rejected(reason) => reject(StatusCode::UNPROCESSABLE_ENTITY, reason),
        PortError::Unexpected(_) => reject(StatusCode::INTERNAL_SERVER_ERROR, message),
    }
}

pub fn stock_rejection(err: StockError) -> HandlerError {
    reject(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
}

pub fn billing_rejection(err: BillingError) -> HandlerError {
    reject(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
}

/// `category_id` -> `Category`, `sheet_number` -> `Sheet number`.
fn field_label(field: &str) -> String {
    let words = field.trim_end_matches("_id").replace('_', " ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => words,
    }
}

fn default_message(field: &str, code: &str) -> String {
    match code {
        "required" => format!("{} is required", field_label(field)),
        _ => format!("{} is invalid", field_label(field)),
    }
}

/// Flattens validator output into messages ordered by field name.
pub fn field_messages(errors: &ValidationErrors) -> Vec<FieldMessage> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);
    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldMessage {
                field: field.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| default_message(field, &e.code)),
            })
        })
        .collect()
}

//=========================================================================================
// Validated JSON Extractor
//=========================================================================================

/// `Json<T>` that also runs `T::validate()`; failures become 422 notices
/// before the handler body runs.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = HandlerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| reject(rejection.status(), rejection.body_text()))?;
        value
            .validate()
            .map_err(|errors| invalid(field_messages(&errors)))?;
        Ok(Self(value))
    }
}
