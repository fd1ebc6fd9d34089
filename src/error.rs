use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Rejected locally before any upstream call, e.g. an empty site.
    #[error("{0}")]
    InvalidInput(String),

    /// Request body could not be decoded into a search request.
    #[error("{0}")]
    Validation(String),

    /// The answering API failed; carries the error's display text.
    #[error("{0}")]
    Upstream(String),

    #[error("Not Found")]
    NotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed,
}

impl SearchError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SearchError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SearchError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SearchError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SearchError::NotFound => StatusCode::NOT_FOUND,
            SearchError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            SearchError::Upstream(msg) => json!({ "error": ascii_escape(&msg) }),
            other => json!({ "detail": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

/// Escapes every non-ASCII character as `\xHH`, `\uHHHH` or `\UHHHHHHHH`
/// so the message survives any ASCII-only transport.
pub fn ascii_escape(s: &str) -> String {
    if s.is_ascii() {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        let cp = c as u32;
        match cp {
            0..=0x7f => out.push(c),
            0x80..=0xff => out.push_str(&format!("\\x{cp:02x}")),
            0x100..=0xffff => out.push_str(&format!("\\u{cp:04x}")),
            _ => out.push_str(&format!("\\U{cp:08x}")),
        }
    }
    out
}
