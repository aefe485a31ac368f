//! Backend access: the versioned route table and the API seam the
//! controller talks through.

use std::{fmt, future::Future, str::FromStr};

use reqwest::Method;
use thiserror::Error;

use crate::error::Result;
use crate::models::{PendingEdit, PhotoFile, UserProfile};

mod http;

pub use http::HttpProfileApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Me,
    UpdateProfile,
    UploadPhoto,
    Logout,
    DeleteAccount,
}

/// Pinned set of verbs and paths the client speaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiContract {
    #[default]
    V1,
}

impl ApiContract {
    pub fn route(&self, endpoint: Endpoint) -> (Method, &'static str) {
        match self {
            ApiContract::V1 => match endpoint {
                Endpoint::Me => (Method::GET, "/api/me"),
                Endpoint::UpdateProfile => (Method::PUT, "/api/update-profile"),
                Endpoint::UploadPhoto => (Method::PATCH, "/api/upload-photo"),
                Endpoint::Logout => (Method::POST, "/api/logout"),
                Endpoint::DeleteAccount => (Method::DELETE, "/api/delete-account"),
            },
        }
    }
}

impl fmt::Display for ApiContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiContract::V1 => write!(f, "v1"),
        }
    }
}

#[derive(Error, Debug)]
#[error("Unknown API contract: {0}")]
pub struct UnknownContract(String);

impl FromStr for ApiContract {
    type Err = UnknownContract;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(ApiContract::V1),
            _ => Err(UnknownContract(s.to_string())),
        }
    }
}

/// The calls the profile page makes. Implementations carry the session
/// credentials themselves.
pub trait ProfileApi {
    /// Current identity. Any failure means "not signed in" to callers.
    fn me(&self) -> impl Future<Output = Result<UserProfile>> + Send;

    fn update_profile(&self, edit: &PendingEdit) -> impl Future<Output = Result<()>> + Send;

    /// Returns the URL the new photo is served from.
    fn upload_photo(&self, file: &PhotoFile) -> impl Future<Output = Result<String>> + Send;

    fn logout(&self) -> impl Future<Output = Result<()>> + Send;

    fn delete_account(&self) -> impl Future<Output = Result<()>> + Send;
}
