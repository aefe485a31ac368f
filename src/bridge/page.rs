use std::collections::{BTreeMap, VecDeque};

use super::{ElementId, PageView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub text: String,
    pub value: String,
    pub visible: bool,
    pub enabled: bool,
}

impl Element {
    fn shown() -> Self {
        Self {
            text: String::new(),
            value: String::new(),
            visible: true,
            enabled: true,
        }
    }

    fn hidden() -> Self {
        Self {
            visible: false,
            ..Self::shown()
        }
    }
}

/// In-memory page. Renders nothing; records what the controller did so
/// headless hosts and tests can inspect it.
#[derive(Debug, Clone)]
pub struct PageModel {
    elements: BTreeMap<ElementId, Element>,
    /// `src` of each `.profile-img`.
    photo_slots: Vec<String>,
    links: Vec<(String, String)>,
    body_visible: bool,
    alerts: Vec<String>,
    confirmations: Vec<String>,
    confirm_answers: VecDeque<bool>,
    navigations: Vec<String>,
    file_picker_opened: usize,
}

impl PageModel {
    /// A page with no elements at all.
    pub fn empty() -> Self {
        Self {
            elements: BTreeMap::new(),
            photo_slots: Vec::new(),
            links: Vec::new(),
            body_visible: false,
            alerts: Vec::new(),
            confirmations: Vec::new(),
            confirm_answers: VecDeque::new(),
            navigations: Vec::new(),
            file_picker_opened: 0,
        }
    }

    /// The profile page as served: display fields shown, inputs and
    /// save/cancel hidden, admin elements hidden, body hidden until the
    /// auth gate passes, one navbar avatar.
    pub fn profile_page() -> Self {
        let mut page = Self::empty();
        for id in ElementId::ALL {
            let element = match id {
                ElementId::ProfileNameInput
                | ElementId::ProfileEmailInput
                | ElementId::SaveButton
                | ElementId::CancelButton
                | ElementId::PhotoFileInput
                | ElementId::AdminNav
                | ElementId::AdminBadge => Element::hidden(),
                _ => Element::shown(),
            };
            page.elements.insert(id, element);
        }
        page.photo_slots.push(String::new());
        page
    }

    pub fn with(mut self, id: ElementId) -> Self {
        self.elements.entry(id).or_insert_with(Element::shown);
        self
    }

    pub fn without(mut self, id: ElementId) -> Self {
        self.elements.remove(&id);
        self
    }

    pub fn with_photo_slots(mut self, count: usize) -> Self {
        self.photo_slots = vec![String::new(); count];
        self
    }

    /// Queue the answers the next `confirm` prompts receive. Unanswered
    /// prompts are declined.
    pub fn answer_confirm(&mut self, answer: bool) {
        self.confirm_answers.push_back(answer);
    }

    /// Stand-in for typing into an input.
    pub fn type_into(&mut self, id: ElementId, value: &str) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.value = value.to_string();
        }
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.element(id).map(|e| e.text.as_str())
    }

    pub fn is_visible(&self, id: ElementId) -> bool {
        self.element(id).is_some_and(|e| e.visible)
    }

    pub fn is_enabled(&self, id: ElementId) -> bool {
        self.element(id).is_some_and(|e| e.enabled)
    }

    /// `src` of `#profile-image` followed by each `.profile-img`.
    pub fn photo_sources(&self) -> Vec<&str> {
        self.elements
            .get(&ElementId::ProfileImage)
            .map(|e| e.value.as_str())
            .into_iter()
            .chain(self.photo_slots.iter().map(String::as_str))
            .collect()
    }

    pub fn links(&self) -> &[(String, String)] {
        &self.links
    }

    pub fn body_visible(&self) -> bool {
        self.body_visible
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn confirmations(&self) -> &[String] {
        &self.confirmations
    }

    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    pub fn file_picker_opened(&self) -> usize {
        self.file_picker_opened
    }
}

impl Default for PageModel {
    fn default() -> Self {
        Self::profile_page()
    }
}

impl PageView for PageModel {
    fn has(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    fn set_text(&mut self, id: ElementId, text: &str) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.text = text.to_string();
        }
    }

    fn value(&self, id: ElementId) -> Option<String> {
        self.elements.get(&id).map(|e| e.value.clone())
    }

    fn set_value(&mut self, id: ElementId, value: &str) {
        self.type_into(id, value);
    }

    fn set_visible(&mut self, id: ElementId, visible: bool) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.visible = visible;
        }
    }

    fn set_enabled(&mut self, id: ElementId, enabled: bool) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.enabled = enabled;
        }
    }

    fn remove(&mut self, id: ElementId) {
        self.elements.remove(&id);
    }

    fn replace_with_link(&mut self, id: ElementId, label: &str, href: &str) {
        if self.elements.remove(&id).is_some() {
            self.links.push((label.to_string(), href.to_string()));
        }
    }

    fn set_photo_sources(&mut self, src: &str) {
        if let Some(image) = self.elements.get_mut(&ElementId::ProfileImage) {
            image.value = src.to_string();
        }
        for slot in &mut self.photo_slots {
            *slot = src.to_string();
        }
    }

    fn reveal_body(&mut self) {
        self.body_visible = true;
    }

    fn open_file_picker(&mut self) {
        if self.has(ElementId::PhotoFileInput) {
            self.file_picker_opened += 1;
        }
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.confirmations.push(message.to_string());
        self.confirm_answers.pop_front().unwrap_or(false)
    }

    fn navigate(&mut self, href: &str) {
        self.navigations.push(href.to_string());
    }
}
