//! The seam between the controller and whatever renders the page.
//!
//! Hosts implement [`PageView`] over their element tree (a browser DOM, a
//! test double, a native shell) and forward user input as [`PageEvent`]s.
//! Elements are addressed by [`ElementId`]; an implementation must treat
//! every call on an element it does not have as a no-op.

use crate::models::PhotoFile;

mod page;

pub use page::{Element, PageModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementId {
    ProfileName,
    ProfileEmail,
    ProfileNameInput,
    ProfileEmailInput,
    EditButton,
    SaveButton,
    CancelButton,
    ChangePhotoButton,
    PhotoFileInput,
    LogoutButton,
    DeleteAccountButton,
    ProfileImage,
    AdminNav,
    AdminBadge,
}

impl ElementId {
    pub const ALL: [ElementId; 14] = [
        ElementId::ProfileName,
        ElementId::ProfileEmail,
        ElementId::ProfileNameInput,
        ElementId::ProfileEmailInput,
        ElementId::EditButton,
        ElementId::SaveButton,
        ElementId::CancelButton,
        ElementId::ChangePhotoButton,
        ElementId::PhotoFileInput,
        ElementId::LogoutButton,
        ElementId::DeleteAccountButton,
        ElementId::ProfileImage,
        ElementId::AdminNav,
        ElementId::AdminBadge,
    ];

    /// The `id` attribute the page markup uses.
    pub fn dom_id(&self) -> &'static str {
        match self {
            ElementId::ProfileName => "profileName",
            ElementId::ProfileEmail => "profileEmail",
            ElementId::ProfileNameInput => "profileNameInput",
            ElementId::ProfileEmailInput => "profileEmailInput",
            ElementId::EditButton => "editBtn",
            ElementId::SaveButton => "saveBtn",
            ElementId::CancelButton => "cancelBtn",
            ElementId::ChangePhotoButton => "changePhotoBtn",
            ElementId::PhotoFileInput => "profileFile",
            ElementId::LogoutButton => "logoutBtn",
            ElementId::DeleteAccountButton => "deleteAccountBtn",
            ElementId::ProfileImage => "profile-image",
            ElementId::AdminNav => "adminNav",
            ElementId::AdminBadge => "adminBadge",
        }
    }

    pub fn from_dom_id(id: &str) -> Option<ElementId> {
        Self::ALL.into_iter().find(|e| e.dom_id() == id)
    }
}

/// Controls that can change the account. Disabled while a request is in
/// flight, removed for guests.
pub const MUTATION_CONTROLS: [ElementId; 5] = [
    ElementId::EditButton,
    ElementId::SaveButton,
    ElementId::CancelButton,
    ElementId::ChangePhotoButton,
    ElementId::DeleteAccountButton,
];

const EDIT_GROUP: [ElementId; 7] = [
    ElementId::EditButton,
    ElementId::SaveButton,
    ElementId::CancelButton,
    ElementId::ProfileName,
    ElementId::ProfileEmail,
    ElementId::ProfileNameInput,
    ElementId::ProfileEmailInput,
];

const PHOTO_GROUP: [ElementId; 2] = [ElementId::ChangePhotoButton, ElementId::PhotoFileInput];

pub trait PageView {
    fn has(&self, id: ElementId) -> bool;

    fn set_text(&mut self, id: ElementId, text: &str);

    /// Current value of an input element.
    fn value(&self, id: ElementId) -> Option<String>;

    fn set_value(&mut self, id: ElementId, value: &str);

    fn set_visible(&mut self, id: ElementId, visible: bool);

    fn set_enabled(&mut self, id: ElementId, enabled: bool);

    fn remove(&mut self, id: ElementId);

    /// Swap the element for a plain link. The element id is gone afterwards.
    fn replace_with_link(&mut self, id: ElementId, label: &str, href: &str);

    /// Point `#profile-image` and every `.profile-img` at `src`.
    fn set_photo_sources(&mut self, src: &str);

    fn reveal_body(&mut self);

    fn open_file_picker(&mut self);

    /// Blocking notification.
    fn alert(&mut self, message: &str);

    fn confirm(&mut self, message: &str) -> bool;

    fn navigate(&mut self, href: &str);
}

/// Feature groups the current page can drive, derived from which elements
/// exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub edit: bool,
    pub photo: bool,
    pub logout: bool,
    pub delete: bool,
    pub admin: bool,
}

impl Capabilities {
    pub fn of<P: PageView + ?Sized>(page: &P) -> Self {
        Self {
            edit: EDIT_GROUP.iter().all(|id| page.has(*id)),
            photo: PHOTO_GROUP.iter().all(|id| page.has(*id)),
            logout: page.has(ElementId::LogoutButton),
            delete: page.has(ElementId::DeleteAccountButton),
            admin: page.has(ElementId::AdminNav) || page.has(ElementId::AdminBadge),
        }
    }
}

/// User input forwarded by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    EditClicked,
    CancelClicked,
    SaveClicked,
    ChangePhotoClicked,
    /// The file input changed; `None` when the picker was dismissed.
    PhotoSelected(Option<PhotoFile>),
    LogoutClicked,
    DeleteAccountClicked,
}
