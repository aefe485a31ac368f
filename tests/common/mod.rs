#![allow(dead_code)]

use std::cell::{Ref, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use profile_core::{
    ClientConfig, ElementId, PageModel, PageView, PendingEdit, PhotoFile, ProfileApi,
    ProfileError, ProfileViewController, Result, Role, UserProfile,
};
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Me,
    Update(PendingEdit),
    Upload(String),
    Logout,
    Delete,
}

/// Scripted backend that records every call.
#[derive(Default)]
pub struct FakeApi {
    identity: Option<UserProfile>,
    unreachable: bool,
    update_failure: Option<(u16, String)>,
    upload_urls: Mutex<VecDeque<String>>,
    logout_fails: bool,
    delete_fails: bool,
    hold: Mutex<Option<Arc<Notify>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn signed_in(profile: UserProfile) -> Self {
        Self {
            identity: Some(profile),
            ..Self::default()
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn failing_update(mut self, status: u16, message: &str) -> Self {
        self.update_failure = Some((status, message.to_string()));
        self
    }

    pub fn with_upload_url(self, url: &str) -> Self {
        self.upload_urls.lock().unwrap().push_back(url.to_string());
        self
    }

    pub fn failing_logout(mut self) -> Self {
        self.logout_fails = true;
        self
    }

    pub fn failing_delete(mut self) -> Self {
        self.delete_fails = true;
        self
    }

    /// The next update, upload or delete waits for `gate` before answering.
    pub fn holding_next(self, gate: Arc<Notify>) -> Self {
        *self.hold.lock().unwrap() = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutating_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| *c != Call::Me)
            .collect()
    }

    fn record(&self, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.unreachable {
            return Err(ProfileError::NetworkUnavailable("connection refused".into()));
        }
        Ok(())
    }

    async fn wait_if_held(&self) {
        let gate = self.hold.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

impl ProfileApi for FakeApi {
    async fn me(&self) -> Result<UserProfile> {
        self.record(Call::Me)?;
        self.identity.clone().ok_or(ProfileError::Unauthenticated)
    }

    async fn update_profile(&self, edit: &PendingEdit) -> Result<()> {
        self.record(Call::Update(edit.clone()))?;
        self.wait_if_held().await;
        match &self.update_failure {
            Some((status, message)) => Err(ProfileError::RequestFailed {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    async fn upload_photo(&self, file: &PhotoFile) -> Result<String> {
        self.record(Call::Upload(file.file_name.clone()))?;
        self.wait_if_held().await;
        self.upload_urls
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(ProfileError::RequestFailed {
                status: 400,
                message: "Invalid file".into(),
            })
    }

    async fn logout(&self) -> Result<()> {
        self.record(Call::Logout)?;
        if self.logout_fails {
            return Err(ProfileError::RequestFailed {
                status: 500,
                message: String::new(),
            });
        }
        Ok(())
    }

    async fn delete_account(&self) -> Result<()> {
        self.record(Call::Delete)?;
        self.wait_if_held().await;
        if self.delete_fails {
            return Err(ProfileError::RequestFailed {
                status: 500,
                message: String::new(),
            });
        }
        Ok(())
    }
}

pub fn user(role: Role) -> UserProfile {
    UserProfile {
        id: "65f0c0ffee".into(),
        name: "Ana".into(),
        email: "ana@x.com".into(),
        photo: Some("65f0c0ffee.png".into()),
        role,
    }
}

pub type Controller = ProfileViewController<FakeApi, PageModel>;

pub fn controller(api: FakeApi) -> Controller {
    controller_on(api, PageModel::profile_page())
}

pub fn controller_on(api: FakeApi, page: PageModel) -> Controller {
    ProfileViewController::new(api, page, ClientConfig::default())
}

pub fn photo(name: &str) -> PhotoFile {
    PhotoFile::new(name, vec![0xff, 0xd8, 0xff]).with_mime("image/jpeg")
}

/// Strips the `t` freshness token from a photo URL.
pub fn without_token(src: &str) -> &str {
    src.split(['?', '&']).next().unwrap_or(src)
}

pub fn token_of(src: &str) -> Option<&str> {
    src.split(['?', '&']).find_map(|p| p.strip_prefix("t="))
}

/// A `PageModel` the test keeps a handle on, so the page can be inspected
/// while a controller operation is still pending.
#[derive(Clone, Default)]
pub struct SharedPage(Rc<RefCell<PageModel>>);

impl SharedPage {
    pub fn new(page: PageModel) -> Self {
        Self(Rc::new(RefCell::new(page)))
    }

    pub fn borrow(&self) -> Ref<'_, PageModel> {
        self.0.borrow()
    }
}

impl PageView for SharedPage {
    fn has(&self, id: ElementId) -> bool {
        self.0.borrow().has(id)
    }

    fn set_text(&mut self, id: ElementId, text: &str) {
        self.0.borrow_mut().set_text(id, text)
    }

    fn value(&self, id: ElementId) -> Option<String> {
        self.0.borrow().value(id)
    }

    fn set_value(&mut self, id: ElementId, value: &str) {
        self.0.borrow_mut().set_value(id, value)
    }

    fn set_visible(&mut self, id: ElementId, visible: bool) {
        self.0.borrow_mut().set_visible(id, visible)
    }

    fn set_enabled(&mut self, id: ElementId, enabled: bool) {
        self.0.borrow_mut().set_enabled(id, enabled)
    }

    fn remove(&mut self, id: ElementId) {
        self.0.borrow_mut().remove(id)
    }

    fn replace_with_link(&mut self, id: ElementId, label: &str, href: &str) {
        self.0.borrow_mut().replace_with_link(id, label, href)
    }

    fn set_photo_sources(&mut self, src: &str) {
        self.0.borrow_mut().set_photo_sources(src)
    }

    fn reveal_body(&mut self) {
        self.0.borrow_mut().reveal_body()
    }

    fn open_file_picker(&mut self) {
        self.0.borrow_mut().open_file_picker()
    }

    fn alert(&mut self, message: &str) {
        self.0.borrow_mut().alert(message)
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.0.borrow_mut().confirm(message)
    }

    fn navigate(&mut self, href: &str) {
        self.0.borrow_mut().navigate(href)
    }
}

pub fn shared_controller(
    api: FakeApi,
    page: &SharedPage,
) -> ProfileViewController<FakeApi, SharedPage> {
    ProfileViewController::new(api, page.clone(), ClientConfig::default())
}
