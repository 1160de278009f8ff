//! The uniform result envelope and the response normalizer.
//!
//! # Design
//! Every operation returns `ApiResponse<T>` instead of `Result`. Business
//! errors (non-2xx below 500) keep the service's status and whatever error
//! it sent, even a plain-text one. Anything that goes wrong on the way
//! (transport failure, 5xx, a success body we cannot decode) collapses into
//! one fixed internal-error envelope; the cause is logged and dropped.

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::ClientError;
use crate::http::HttpResponse;

pub const INTERNAL_ERROR_STATUS: u16 = 500;
pub const INTERNAL_ERROR_CODE: &str = "InternalServerError";
pub const INTERNAL_ERROR_MESSAGE: &str =
    "An internal exception happened while calling iTwins Service";

/// Error object reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ErrorDetail>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl ApiErrorBody {
    /// Error object as the service sent it. Shapes that do not fit the
    /// schema keep their text in `message`.
    fn from_service(value: Value) -> Self {
        match value {
            Value::String(message) => Self::with_message(message),
            other => serde_json::from_value(other.clone())
                .unwrap_or_else(|_| Self::with_message(other.to_string())),
        }
    }

    fn with_message(message: String) -> Self {
        Self {
            code: String::new(),
            message,
            details: None,
            target: None,
        }
    }
}

/// One entry of `details`, e.g. a single invalid property of an
/// `InvalidiTwinsRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

/// HAL pagination links of a collection response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorBody>,
    /// `_links` of the body, kept even when `data` was unwrapped from a
    /// named property.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl<T> ApiResponse<T> {
    /// The fixed envelope for failures the caller cannot act on.
    pub fn internal_error() -> Self {
        Self {
            status: INTERNAL_ERROR_STATUS,
            data: None,
            error: Some(ApiErrorBody {
                code: INTERNAL_ERROR_CODE.to_string(),
                message: INTERNAL_ERROR_MESSAGE.to_string(),
                details: None,
                target: None,
            }),
            links: None,
        }
    }

    /// Log `err` and replace it with the internal-error envelope.
    pub fn from_client_error(err: &ClientError) -> Self {
        warn!(error = %err, "iTwins request failed before a usable response");
        Self::internal_error()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status) && self.error.is_none()
    }

    /// `href` of the next page, if the service reported one.
    pub fn next_link(&self) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|l| l.next.as_ref())
            .map(|l| l.href.as_str())
    }
}

/// Turn a raw response into an envelope, unwrapping `property` from the body
/// when given.
///
/// Non-2xx answers below 500 always keep their status, even when the body
/// is not the JSON the service usually sends.
pub fn normalize<T: DeserializeOwned>(
    response: HttpResponse,
    property: Option<&str>,
) -> ApiResponse<T> {
    let status = response.status;
    if status >= INTERNAL_ERROR_STATUS {
        warn!(status, "iTwins service returned a server error");
        return ApiResponse::internal_error();
    }

    let empty = ApiResponse {
        status,
        data: None,
        error: None,
        links: None,
    };
    let text = response.body.trim();
    if text.is_empty() {
        return empty;
    }

    let body: Value = match serde_json::from_str(text) {
        Ok(body) => body,
        Err(_) if is_business_error(status) => {
            return ApiResponse {
                error: Some(ApiErrorBody::with_message(text.to_string())),
                ..empty
            }
        }
        Err(e) => {
            return ApiResponse::from_client_error(&ClientError::Deserialization(e.to_string()))
        }
    };

    match body.get("error") {
        None | Some(Value::Null) => {}
        Some(error) => {
            return ApiResponse {
                error: Some(ApiErrorBody::from_service(error.clone())),
                ..empty
            }
        }
    }

    let links = body
        .get("_links")
        .and_then(|l| serde_json::from_value::<Links>(l.clone()).ok());

    let payload = match property {
        Some(name) => body.get(name).cloned().unwrap_or(Value::Null),
        None => body,
    };
    if payload.is_null() {
        return ApiResponse { links, ..empty };
    }

    match serde_json::from_value::<T>(payload) {
        Ok(data) => ApiResponse {
            status,
            data: Some(data),
            error: None,
            links,
        },
        Err(e) if is_business_error(status) => {
            warn!(status, error = %e, "dropping undecodable payload of an error response");
            ApiResponse { links, ..empty }
        }
        Err(e) => ApiResponse::from_client_error(&ClientError::Deserialization(e.to_string())),
    }
}

fn is_business_error(status: u16) -> bool {
    !(200..300).contains(&status) && status < INTERNAL_ERROR_STATUS
}

/// Like [`normalize`] for operations whose body carries nothing the caller
/// needs: `data` is always `None`, status and error still pass through.
pub fn normalize_empty(response: HttpResponse) -> ApiResponse<()> {
    let envelope = normalize::<IgnoredAny>(response, None);
    ApiResponse {
        status: envelope.status,
        data: None,
        error: envelope.error,
        links: envelope.links,
    }
}
