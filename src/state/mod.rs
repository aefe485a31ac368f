use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::{PendingEdit, UserProfile};

mod controller;

pub use controller::{
    ProfileViewController, CONFIRM_DELETE, GUEST_EMAIL, GUEST_NAME, LOGIN_LABEL, PHOTO_UPDATED,
    PROFILE_UPDATED, REQUEST_PENDING,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    View,
    Edit,
}

/// Everything the page session knows about the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileState {
    /// Last server-confirmed profile; `None` for guests and before load.
    pub profile: Option<UserProfile>,
    pub mode: ViewMode,
    /// Only `Some` while in `Edit` mode.
    pub pending: Option<PendingEdit>,
    /// Last known-good photo URL, without freshness token.
    pub photo_url: Option<String>,
    pub in_flight: bool,
}

impl ProfileState {
    pub fn is_guest(&self) -> bool {
        self.profile.is_none()
    }
}

/// Hands out cache-busting tokens: wall-clock milliseconds, forced to
/// increase strictly between calls.
#[derive(Debug, Default)]
pub struct FreshnessClock {
    last: u64,
}

impl FreshnessClock {
    pub fn next(&mut self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        self.last = now.max(self.last + 1);
        self.last
    }
}

pub const FRESHNESS_PARAM: &str = "t";

/// Appends the freshness token as a query parameter.
pub fn cache_busted(url: &str, token: u64) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{FRESHNESS_PARAM}={token}")
}
