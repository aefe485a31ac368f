use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ProfileError, Result, EMPTY_FIELDS};

/// Account as returned by the identity endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub photo: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        // Anything the server invents later is not trusted with admin UI.
        match s.as_str() {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::User => "user".to_string(),
            Role::Admin => "admin".to_string(),
        }
    }
}

/// Unsaved name/email captured from the inputs while editing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEdit {
    pub name: String,
    pub email: String,
}

impl PendingEdit {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn from_profile(profile: &UserProfile) -> Self {
        Self::new(profile.name.clone(), profile.email.clone())
    }

    /// Trimmed copy, rejected when either field ends up empty.
    pub fn validated(&self) -> Result<PendingEdit> {
        let name = self.name.trim();
        let email = self.email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(ProfileError::ValidationFailed(EMPTY_FIELDS.to_string()));
        }
        Ok(PendingEdit::new(name, email))
    }
}

/// A single file picked for the photo upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFile {
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl PhotoFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: None,
            bytes,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadPhotoResponse {
    pub url: String,
}

/// Optional JSON error body on failed mutations.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let photo: Option<String> = Option::deserialize(deserializer)?;
    Ok(photo.filter(|p| !p.trim().is_empty()))
}
