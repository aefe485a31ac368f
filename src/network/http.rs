use reqwest::{
    multipart::{Form, Part},
    Client, RequestBuilder, Response, StatusCode,
};
use tracing::{debug, warn};

use super::{Endpoint, ProfileApi};
use crate::config::ClientConfig;
use crate::error::{ProfileError, Result};
use crate::models::{ErrorBody, PendingEdit, PhotoFile, UploadPhotoResponse, UserProfile};

/// `ProfileApi` over HTTP. Keeps a cookie store so the session cookie set
/// at login travels with every call.
#[derive(Debug, Clone)]
pub struct HttpProfileApi {
    client: Client,
    config: ClientConfig,
}

impl HttpProfileApi {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self::with_client(client, config))
    }

    /// Use a prepared client, e.g. one sharing a cookie jar with the login flow.
    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(&self, endpoint: Endpoint) -> Result<RequestBuilder> {
        let (method, path) = self.config.contract.route(endpoint);
        let url = self.config.endpoint(path)?;
        debug!("{method} {url}");
        Ok(self.client.request(method, url))
    }
}

impl ProfileApi for HttpProfileApi {
    async fn me(&self) -> Result<UserProfile> {
        let response = self.request(Endpoint::Me)?.send().await?;
        match response.status() {
            status if status.is_success() => Ok(response.json::<UserProfile>().await?),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ProfileError::Unauthenticated),
            _ => Err(failure(response).await),
        }
    }

    async fn update_profile(&self, edit: &PendingEdit) -> Result<()> {
        let response = self
            .request(Endpoint::UpdateProfile)?
            .json(edit)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        Ok(())
    }

    async fn upload_photo(&self, file: &PhotoFile) -> Result<String> {
        let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if let Some(mime) = &file.mime {
            part = part.mime_str(mime)?;
        }
        let form = Form::new().part("photo", part);

        let response = self
            .request(Endpoint::UploadPhoto)?
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        let body: UploadPhotoResponse = response.json().await?;
        Ok(body.url)
    }

    async fn logout(&self) -> Result<()> {
        let response = self.request(Endpoint::Logout)?.send().await?;
        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        Ok(())
    }

    async fn delete_account(&self) -> Result<()> {
        let response = self.request(Endpoint::DeleteAccount)?.send().await?;
        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        Ok(())
    }
}

/// Turns a non-success response into `RequestFailed`, keeping whatever the
/// server said in a form fit for an alert.
async fn failure(response: Response) -> ProfileError {
    let status = response.status().as_u16();
    let text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            warn!("Could not read error body for status {status}: {e}");
            String::new()
        }
    };

    let message = server_message(&text);
    if message.is_empty() && !text.trim().is_empty() {
        debug!("Dropping unreadable error body for status {status}");
    }
    ProfileError::RequestFailed { status, message }
}

const MAX_MESSAGE_LEN: usize = 200;

/// The `error` field of a JSON object, a JSON string, or a single short line
/// of plain text. Anything else (markup, stack traces) yields an empty
/// message so the caller's generic text is shown instead.
fn server_message(text: &str) -> String {
    let text = text.trim();
    if let Ok(body) = serde_json::from_str::<ErrorBody>(text) {
        return body.error.map(|e| e.trim().to_string()).unwrap_or_default();
    }
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::String(message)) => plain_line(message.trim()),
        Ok(_) => String::new(),
        Err(_) => plain_line(text),
    }
}

fn plain_line(text: &str) -> String {
    let readable = !text.starts_with('<')
        && text.chars().count() <= MAX_MESSAGE_LEN
        && !text.chars().any(char::is_control);
    if readable {
        text.to_string()
    } else {
        String::new()
    }
}
