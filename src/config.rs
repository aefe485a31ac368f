use std::{env, fmt::Display, str::FromStr};

use anyhow::Context;
use tracing::{info, warn};
use url::Url;

use crate::error::Result;
use crate::network::ApiContract;

const DEFAULT_BASE_URL: &str = "http://localhost:8080/";
const DEFAULT_LOGIN_PATH: &str = "/login";
const DEFAULT_IMAGES_PATH: &str = "/Profile-Images";
const DEFAULT_PHOTO: &str = "default.jpg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: Url,
    pub login_path: String,
    pub images_path: String,
    pub default_photo: String,
    pub contract: ApiContract,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("Default base url is valid"),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            images_path: DEFAULT_IMAGES_PATH.to_string(),
            default_photo: DEFAULT_PHOTO.to_string(),
            contract: ApiContract::default(),
        }
    }
}

impl ClientConfig {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup. Missing or invalid values keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            base_url: try_load(&lookup, "PROFILE_BASE_URL", defaults.base_url),
            login_path: try_load(&lookup, "PROFILE_LOGIN_PATH", defaults.login_path),
            images_path: try_load(&lookup, "PROFILE_IMAGES_PATH", defaults.images_path),
            default_photo: try_load(&lookup, "PROFILE_DEFAULT_PHOTO", defaults.default_photo),
            contract: try_load(&lookup, "PROFILE_API_CONTRACT", defaults.contract),
        }
    }

    /// Absolute URL of an API path on the configured origin.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Where a stored photo filename is served from, or the default asset.
    pub fn photo_url(&self, photo: Option<&str>) -> String {
        let file = photo
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(&self.default_photo);
        format!("{}/{}", self.images_path.trim_end_matches('/'), file)
    }

    pub fn default_photo_url(&self) -> String {
        self.photo_url(None)
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Some(raw) = lookup(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };

    parse(key, &raw).unwrap_or_else(|e| {
        warn!("{e:#}, using default: {default}");
        default
    })
}

fn parse<T>(key: &str, raw: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("Invalid {key} value {raw:?}"))
}
