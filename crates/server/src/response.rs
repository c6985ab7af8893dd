//! Error responses for the HTTP API.
//!
//! Request validation failures become `422` with a field-level `detail`
//! list. Everything else becomes a generic `500`; the cause is logged and
//! never sent to the client.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use salesqa_core::AppError;
use serde::Serialize;
use serde_json::json;

/// One entry of a validation error `detail` list.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidationDetail {
    /// Error kind ("missing", "json_invalid", "model_attributes_type", ...)
    #[serde(rename = "type")]
    pub kind: String,

    /// Location of the offending input, e.g. `["body", "question"]`
    pub loc: Vec<String>,

    /// Human-readable message
    pub msg: String,
}

/// Error returned by route handlers.
#[derive(Debug)]
pub enum ApiError {
    /// The request body failed validation.
    Validation(Vec<ValidationDetail>),

    /// A collaborator failed while serving the request.
    Internal(AppError),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError::Internal(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(vec![validation_detail(&rejection)])
    }
}

/// Describe a rejected JSON body.
fn validation_detail(rejection: &JsonRejection) -> ValidationDetail {
    let text = rejection.body_text();

    match rejection {
        JsonRejection::JsonDataError(_) => match missing_field(&text) {
            Some(field) => ValidationDetail {
                kind: "missing".to_string(),
                loc: vec!["body".to_string(), field],
                msg: "Field required".to_string(),
            },
            None => ValidationDetail {
                kind: "model_attributes_type".to_string(),
                loc: vec!["body".to_string()],
                msg: text,
            },
        },
        JsonRejection::JsonSyntaxError(_) => ValidationDetail {
            kind: "json_invalid".to_string(),
            loc: vec!["body".to_string()],
            msg: text,
        },
        JsonRejection::MissingJsonContentType(_) => ValidationDetail {
            kind: "content_type".to_string(),
            loc: vec!["header".to_string(), "content-type".to_string()],
            msg: text,
        },
        _ => ValidationDetail {
            kind: "body_read".to_string(),
            loc: vec!["body".to_string()],
            msg: text,
        },
    }
}

/// Extract the field name from serde's "missing field `name`" message.
fn missing_field(message: &str) -> Option<String> {
    let rest = message.split("missing field `").nth(1)?;
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(detail) => {
                tracing::debug!("Rejected request: {:?}", detail);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "detail": detail })),
                )
                    .into_response()
            }
            ApiError::Internal(err) => {
                tracing::error!("Request failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal Server Error" })),
                )
                    .into_response()
            }
        }
    }
}
