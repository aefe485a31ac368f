//! Client core for the account profile page: loads the signed-in user,
//! drives the view/edit toggle, photo upload, logout and account deletion,
//! and gates admin-only elements. The page itself is reached through
//! [`bridge::PageView`], the backend through [`network::ProfileApi`].

pub mod bridge;
pub mod config;
pub mod error;
pub mod models;
pub mod network;
pub mod state;

use tracing_subscriber::{fmt, EnvFilter};

pub use bridge::{Capabilities, ElementId, PageEvent, PageModel, PageView};
pub use config::ClientConfig;
pub use error::{ProfileError, Result};
pub use models::{PendingEdit, PhotoFile, Role, UserProfile};
pub use network::{ApiContract, HttpProfileApi, ProfileApi};
pub use state::{ProfileState, ProfileViewController, ViewMode};

/// Installs the fmt subscriber, filtered by `RUST_LOG`. Later calls are
/// no-ops.
pub fn init_logging() {
    let _ = fmt().with_env_filter(EnvFilter::from_default_env()).try_init();
}
