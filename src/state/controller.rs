use tracing::{debug, error, info, warn};

use super::{cache_busted, FreshnessClock, ProfileState, ViewMode};
use crate::bridge::{Capabilities, ElementId, PageEvent, PageView, MUTATION_CONTROLS};
use crate::config::ClientConfig;
use crate::error::{
    ProfileError, Result, GENERIC_DELETE_FAILURE, GENERIC_UPDATE_FAILURE, GENERIC_UPLOAD_FAILURE,
};
use crate::models::{PendingEdit, PhotoFile, Role, UserProfile};
use crate::network::ProfileApi;

pub const GUEST_NAME: &str = "Guest";
pub const GUEST_EMAIL: &str = "-";
pub const LOGIN_LABEL: &str = "Login";
pub const PROFILE_UPDATED: &str = "Profile updated successfully!";
pub const PHOTO_UPDATED: &str = "Photo updated!";
pub const CONFIRM_DELETE: &str = "Delete your account? This cannot be undone.";
pub const REQUEST_PENDING: &str = "Please wait for the current request to finish.";

/// Owns the profile page for one session.
///
/// Every operation reports its own failures to the page (alert for user
/// actions, log for background checks) before returning them, so hosts
/// are free to drop the `Err`.
pub struct ProfileViewController<A, P> {
    api: A,
    page: P,
    config: ClientConfig,
    state: ProfileState,
    clock: FreshnessClock,
}

impl<A, P> ProfileViewController<A, P>
where
    A: ProfileApi,
    P: PageView,
{
    pub fn new(api: A, page: P, config: ClientConfig) -> Self {
        Self {
            api,
            page,
            config,
            state: ProfileState::default(),
            clock: FreshnessClock::default(),
        }
    }

    pub fn state(&self) -> &ProfileState {
        &self.state
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::of(&self.page)
    }

    /// Routes a page event to its operation.
    pub async fn dispatch(&mut self, event: PageEvent) -> Result<()> {
        debug!("Page event: {event:?}");
        match event {
            PageEvent::EditClicked => self.enter_edit_mode(),
            PageEvent::CancelClicked => self.cancel_edit(),
            PageEvent::SaveClicked => self.save_edit().await,
            PageEvent::ChangePhotoClicked => {
                self.choose_photo();
                Ok(())
            }
            PageEvent::PhotoSelected(file) => self.upload_photo(file).await,
            PageEvent::LogoutClicked => {
                self.logout().await;
                Ok(())
            }
            PageEvent::DeleteAccountClicked => self.delete_account().await,
        }
    }

    /// Page entry: gate on identity, then render the profile and admin
    /// elements from that same identity.
    pub async fn boot(&mut self) -> Result<()> {
        let profile = self.enforce_auth_gate().await?;
        self.show_admin(profile.role);
        self.show_profile(profile);
        Ok(())
    }

    pub async fn load_profile(&mut self) -> Result<()> {
        match self.api.me().await {
            Ok(profile) => {
                info!("Loaded profile {}", profile.id);
                self.show_profile(profile);
                Ok(())
            }
            Err(e) => {
                warn!("Identity check failed, showing guest view: {e}");
                self.degrade_to_guest();
                Err(e)
            }
        }
    }

    pub fn enter_edit_mode(&mut self) -> Result<()> {
        if !self.capabilities().edit {
            debug!("Edit controls absent, ignoring");
            return Ok(());
        }
        self.require_mode(ViewMode::View)?;
        let Some(profile) = &self.state.profile else {
            debug!("No profile loaded, cannot edit");
            return Err(ProfileError::Unauthenticated);
        };

        let pending = PendingEdit::from_profile(profile);
        self.page.set_value(ElementId::ProfileNameInput, &pending.name);
        self.page.set_value(ElementId::ProfileEmailInput, &pending.email);
        self.show_edit_controls();
        self.state.pending = Some(pending);
        self.state.mode = ViewMode::Edit;
        debug!("Entered edit mode");
        Ok(())
    }

    pub fn cancel_edit(&mut self) -> Result<()> {
        self.require_mode(ViewMode::Edit)?;

        self.state.pending = None;
        if let Some(profile) = &self.state.profile {
            self.page.set_value(ElementId::ProfileNameInput, &profile.name);
            self.page.set_value(ElementId::ProfileEmailInput, &profile.email);
        }
        self.show_view_controls();
        self.state.mode = ViewMode::View;
        debug!("Edit cancelled");
        Ok(())
    }

    pub async fn save_edit(&mut self) -> Result<()> {
        self.require_mode(ViewMode::Edit)?;
        self.ensure_idle()?;

        let captured = self.capture_inputs();
        self.state.pending = Some(captured.clone());
        let edit = match captured.validated() {
            Ok(edit) => edit,
            Err(e) => {
                debug!("Rejected edit: {e}");
                self.page.alert(&e.user_message(GENERIC_UPDATE_FAILURE));
                return Err(e);
            }
        };

        let result = {
            let _in_flight = InFlight::begin(&mut self.state, &mut self.page);
            self.api.update_profile(&edit).await
        };

        if let Err(e) = result {
            error!("Profile update failed: {e}");
            self.page.alert(&e.user_message(GENERIC_UPDATE_FAILURE));
            return Err(e);
        }

        if let Some(profile) = self.state.profile.as_mut() {
            profile.name = edit.name.clone();
            profile.email = edit.email.clone();
        }
        self.page.set_text(ElementId::ProfileName, &edit.name);
        self.page.set_text(ElementId::ProfileEmail, &edit.email);
        self.page.set_value(ElementId::ProfileNameInput, &edit.name);
        self.page.set_value(ElementId::ProfileEmailInput, &edit.email);
        self.show_view_controls();
        self.state.pending = None;
        self.state.mode = ViewMode::View;

        info!("Profile updated");
        self.page.alert(PROFILE_UPDATED);
        Ok(())
    }

    /// The change-photo control opens the file picker.
    pub fn choose_photo(&mut self) {
        if self.capabilities().photo {
            self.page.open_file_picker();
        }
    }

    pub async fn upload_photo(&mut self, file: Option<PhotoFile>) -> Result<()> {
        let Some(file) = file else {
            debug!("No photo selected");
            return Ok(());
        };
        if !self.capabilities().photo {
            debug!("Photo controls absent, ignoring upload");
            return Ok(());
        }
        self.ensure_idle()?;

        let result = {
            let _in_flight = InFlight::begin(&mut self.state, &mut self.page);
            self.api.upload_photo(&file).await
        };

        match result {
            Ok(url) => {
                let src = cache_busted(&url, self.clock.next());
                self.page.set_photo_sources(&src);
                self.state.photo_url = Some(url);
                info!("Photo {} uploaded", file.file_name);
                self.page.alert(PHOTO_UPDATED);
                Ok(())
            }
            Err(e) => {
                error!("Photo upload failed: {e}");
                self.page.alert(GENERIC_UPLOAD_FAILURE);
                Err(e)
            }
        }
    }

    /// Always ends on the login page, whatever the server says.
    pub async fn logout(&mut self) {
        if let Err(e) = self.api.logout().await {
            warn!("Logout request failed: {e}");
        }
        self.state = ProfileState::default();
        self.page.navigate(&self.config.login_path);
    }

    pub async fn delete_account(&mut self) -> Result<()> {
        if !self.capabilities().delete {
            debug!("Delete control absent, ignoring");
            return Ok(());
        }
        self.ensure_idle()?;
        if !self.page.confirm(CONFIRM_DELETE) {
            debug!("Account deletion declined");
            return Err(ProfileError::Cancelled);
        }

        let result = {
            let _in_flight = InFlight::begin(&mut self.state, &mut self.page);
            self.api.delete_account().await
        };

        match result {
            Ok(()) => {
                info!("Account deleted");
                self.state = ProfileState::default();
                self.page.navigate(&self.config.login_path);
                Ok(())
            }
            Err(e) => {
                error!("Account deletion failed: {e}");
                self.page.alert(&e.user_message(GENERIC_DELETE_FAILURE));
                Err(e)
            }
        }
    }

    /// Reveals the page only for a signed-in user; everyone else is sent to
    /// the login page before anything is shown.
    pub async fn enforce_auth_gate(&mut self) -> Result<UserProfile> {
        match self.api.me().await {
            Ok(profile) => {
                debug!("Auth gate passed for {}", profile.id);
                self.page.reveal_body();
                Ok(profile)
            }
            Err(e) => {
                warn!("Auth check failed, redirecting to login: {e}");
                self.page.navigate(&self.config.login_path);
                Err(e)
            }
        }
    }

    pub async fn apply_admin_visibility(&mut self) -> Result<()> {
        match self.api.me().await {
            Ok(profile) => {
                self.show_admin(profile.role);
                Ok(())
            }
            Err(e) => {
                warn!("Admin check failed: {e}");
                self.show_admin(Role::User);
                Err(e)
            }
        }
    }

    fn show_profile(&mut self, profile: UserProfile) {
        self.page.set_text(ElementId::ProfileName, &profile.name);
        self.page.set_text(ElementId::ProfileEmail, &profile.email);
        self.page.set_value(ElementId::ProfileNameInput, &profile.name);
        self.page.set_value(ElementId::ProfileEmailInput, &profile.email);

        let url = self.config.photo_url(profile.photo.as_deref());
        self.page.set_photo_sources(&cache_busted(&url, self.clock.next()));
        self.show_view_controls();

        self.state.profile = Some(profile);
        self.state.mode = ViewMode::View;
        self.state.pending = None;
        self.state.photo_url = Some(url);
    }

    fn degrade_to_guest(&mut self) {
        self.page.set_text(ElementId::ProfileName, GUEST_NAME);
        self.page.set_text(ElementId::ProfileEmail, GUEST_EMAIL);
        self.page.set_value(ElementId::ProfileNameInput, "");
        self.page.set_value(ElementId::ProfileEmailInput, "");
        self.show_view_controls();

        for id in MUTATION_CONTROLS {
            self.page.remove(id);
        }
        self.page
            .replace_with_link(ElementId::LogoutButton, LOGIN_LABEL, &self.config.login_path);

        // The default asset never changes, so it goes out without a token.
        let url = self.config.default_photo_url();
        self.page.set_photo_sources(&url);
        self.show_admin(Role::User);

        self.state.profile = None;
        self.state.mode = ViewMode::View;
        self.state.pending = None;
        self.state.photo_url = Some(url);
    }

    fn show_admin(&mut self, role: Role) {
        if !self.capabilities().admin {
            debug!("No admin elements on this page");
            return;
        }
        let admin = role == Role::Admin;
        self.page.set_visible(ElementId::AdminNav, admin);
        self.page.set_visible(ElementId::AdminBadge, admin);
        debug!("Admin elements visible: {admin}");
    }

    fn show_view_controls(&mut self) {
        self.toggle_fields(false);
    }

    fn show_edit_controls(&mut self) {
        self.toggle_fields(true);
    }

    fn toggle_fields(&mut self, editing: bool) {
        for id in [ElementId::ProfileName, ElementId::ProfileEmail, ElementId::EditButton] {
            self.page.set_visible(id, !editing);
        }
        for id in [
            ElementId::ProfileNameInput,
            ElementId::ProfileEmailInput,
            ElementId::SaveButton,
            ElementId::CancelButton,
        ] {
            self.page.set_visible(id, editing);
        }
    }

    fn capture_inputs(&self) -> PendingEdit {
        let fallback = self.state.pending.clone().unwrap_or_default();
        PendingEdit::new(
            self.page
                .value(ElementId::ProfileNameInput)
                .unwrap_or(fallback.name),
            self.page
                .value(ElementId::ProfileEmailInput)
                .unwrap_or(fallback.email),
        )
    }

    fn require_mode(&self, expected: ViewMode) -> Result<()> {
        if self.state.mode != expected {
            debug!("Expected {expected:?} mode, in {:?}", self.state.mode);
            return Err(ProfileError::InvalidMode(self.state.mode));
        }
        Ok(())
    }

    fn ensure_idle(&mut self) -> Result<()> {
        if self.state.in_flight {
            warn!("Request already in flight");
            self.page.alert(REQUEST_PENDING);
            return Err(ProfileError::Busy);
        }
        Ok(())
    }
}

/// Marks a mutating request as in flight while it lives: the flag is set
/// and the mutation controls disabled. Dropping it undoes both, also when
/// the request future is dropped before completing.
struct InFlight<'a, P: PageView> {
    state: &'a mut ProfileState,
    page: &'a mut P,
}

impl<'a, P: PageView> InFlight<'a, P> {
    fn begin(state: &'a mut ProfileState, page: &'a mut P) -> Self {
        state.in_flight = true;
        for id in MUTATION_CONTROLS {
            page.set_enabled(id, false);
        }
        Self { state, page }
    }
}

impl<P: PageView> Drop for InFlight<'_, P> {
    fn drop(&mut self) {
        self.state.in_flight = false;
        for id in MUTATION_CONTROLS {
            self.page.set_enabled(id, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::bridge::PageModel;

    #[derive(Default)]
    struct CountingApi {
        mutations: AtomicUsize,
    }

    impl CountingApi {
        fn mutated(&self) -> Result<()> {
            self.mutations.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    impl ProfileApi for CountingApi {
        async fn me(&self) -> Result<UserProfile> {
            Ok(UserProfile {
                id: "65f0".into(),
                name: "Ana".into(),
                email: "ana@x.com".into(),
                photo: None,
                role: Role::User,
            })
        }

        async fn update_profile(&self, _edit: &PendingEdit) -> Result<()> {
            self.mutated()
        }

        async fn upload_photo(&self, _file: &PhotoFile) -> Result<String> {
            self.mutated()?;
            Ok("/Profile-Images/65f0.png".into())
        }

        async fn logout(&self) -> Result<()> {
            Ok(())
        }

        async fn delete_account(&self) -> Result<()> {
            self.mutated()
        }
    }

    #[tokio::test]
    async fn mutations_wait_for_the_request_in_flight() {
        let mut c = ProfileViewController::new(
            CountingApi::default(),
            PageModel::profile_page(),
            ClientConfig::default(),
        );
        c.load_profile().await.unwrap();
        c.enter_edit_mode().unwrap();
        c.state.in_flight = true;

        assert!(matches!(c.save_edit().await, Err(ProfileError::Busy)));
        let file = PhotoFile::new("me.png", vec![1, 2, 3]);
        assert!(matches!(
            c.upload_photo(Some(file)).await,
            Err(ProfileError::Busy)
        ));
        assert!(matches!(c.delete_account().await, Err(ProfileError::Busy)));

        assert_eq!(c.page.alerts(), [REQUEST_PENDING; 3]);
        assert!(c.page.confirmations().is_empty());
        assert_eq!(c.api.mutations.load(Ordering::SeqCst), 0);
        assert_eq!(c.state.mode, ViewMode::Edit);
    }
}
