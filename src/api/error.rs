//! Typed API errors

use thiserror::Error;

use crate::api::response::ErrorBody;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API error ({status_code} {kind}): {detail}")]
    Api {
        status_code: u16,
        kind: String,
        detail: String,
    },

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("rate limited: gave up after {attempts} attempts")]
    RateLimited { attempts: u32 },
}

impl ApiError {
    /// Build from a non-2xx status and its raw body
    pub fn from_response(status: u16, text: &str) -> Self {
        let body: ErrorBody = serde_json::from_str(text).unwrap_or_default();
        let detail = body
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| text.trim().to_string());

        if status == 401 {
            return Self::Auth(detail);
        }

        Self::Api {
            status_code: body.status_code.unwrap_or(status),
            kind: body.kind.or(body.code).unwrap_or_else(|| "unknown".to_string()),
            detail,
        }
    }

    /// HTTP status behind the error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Api { status_code, .. } => *status_code,
            Self::Auth(_) => 401,
            Self::RateLimited { .. } => 429,
        }
    }
}
