use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid API url: {0}")]
    InvalidUrl(String),

    /// The server answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Rejected locally before anything was sent.
    #[error("{0}")]
    InvalidInput(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Build an `Api` error from a status and the raw response text.
    ///
    /// Understands the server's `{code, message}` body and falls back to
    /// an `{error}` field or the bare text.
    pub(crate) fn from_response(status: u16, text: &str) -> Self {
        #[derive(Deserialize)]
        struct Body {
            code: Option<String>,
            message: Option<String>,
            error: Option<String>,
        }

        match serde_json::from_str::<Body>(text) {
            Ok(body) => Self::Api {
                status,
                code: body.code,
                message: body
                    .message
                    .or(body.error)
                    .unwrap_or_else(|| format!("HTTP error! status: {status}")),
            },
            Err(_) if !text.trim().is_empty() => Self::Api {
                status,
                code: None,
                message: text.trim().to_string(),
            },
            Err(_) => Self::Api {
                status,
                code: None,
                message: format!("HTTP error! status: {status}"),
            },
        }
    }
}
