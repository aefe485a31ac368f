use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProfileError>;

/// Shown when the server gives no usable error message.
pub const GENERIC_UPDATE_FAILURE: &str = "Update failed";
pub const GENERIC_UPLOAD_FAILURE: &str = "Failed to upload photo";
pub const GENERIC_DELETE_FAILURE: &str = "Failed to delete account";
pub const EMPTY_FIELDS: &str = "Name and Email cannot be empty";

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("{0}")]
    ValidationFailed(String),

    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Operation not allowed in {0:?} mode")]
    InvalidMode(crate::state::ViewMode),

    #[error("Another request is still in flight")]
    Busy,

    #[error("Cancelled by user")]
    Cancelled,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProfileError {
    /// Message for the user-facing alert, falling back to `generic` for
    /// failures that carry nothing readable.
    pub fn user_message(&self, generic: &str) -> String {
        match self {
            ProfileError::ValidationFailed(message) => message.clone(),
            ProfileError::RequestFailed { message, .. } if !message.trim().is_empty() => {
                message.clone()
            }
            _ => generic.to_string(),
        }
    }
}

impl From<reqwest::Error> for ProfileError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            return Self::Decode(e.to_string());
        }
        if let Some(status) = e.status() {
            return Self::RequestFailed {
                status: status.as_u16(),
                message: String::new(),
            };
        }
        Self::NetworkUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for ProfileError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

impl From<url::ParseError> for ProfileError {
    fn from(e: url::ParseError) -> Self {
        Self::Other(anyhow::anyhow!(e))
    }
}
