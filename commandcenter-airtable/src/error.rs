//! Record store errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordStoreError {
    /// Non-2xx response. `body` is the response text, verbatim.
    #[error("Airtable API error: {status} {status_text} - {body}")]
    Api {
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RecordStoreError {
    pub fn api(status: u16, status_text: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    /// Remote status code, when the store answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

pub type RecordStoreResult<T> = Result<T, RecordStoreError>;
