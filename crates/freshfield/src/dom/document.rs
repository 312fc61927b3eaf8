use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use freshfield_api::FreshfieldError;
use log::debug;

use super::node::Node;
use super::{MODAL_CLASS, STYLES_ID};
use crate::render::StyleTheme;

/// Identifies one presented modal; stale instances can no longer touch the
/// modal slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalInstance(u64);

#[derive(Debug)]
struct AttachedModal {
    instance: ModalInstance,
    node: Node,
}

#[derive(Debug)]
struct AttachedStyles {
    theme: StyleTheme,
    node: Node,
}

#[derive(Debug, Default)]
struct DocumentState {
    containers: HashMap<String, Node>,
    modal: Option<AttachedModal>,
    styles: Option<AttachedStyles>,
    scroll_locked: bool,
    next_instance: u64,
}

/// The host page as seen by the SDK: named containers, a single modal slot,
/// a single stylesheet slot and the page scroll lock.
///
/// Cloning yields another handle to the same page.
#[derive(Debug, Clone, Default)]
pub struct Document {
    state: Arc<Mutex<DocumentState>>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_container(self, id: &str) -> Self {
        self.add_container(id);
        self
    }

    pub fn add_container(&self, id: &str) {
        self.lock()
            .containers
            .entry(id.to_string())
            .or_insert_with(|| Node::new("div").with_id(id));
    }

    #[must_use]
    pub fn has_container(&self, id: &str) -> bool {
        self.lock().containers.contains_key(id)
    }

    #[must_use]
    pub fn container(&self, id: &str) -> Option<Node> {
        self.lock().containers.get(id).cloned()
    }

    #[must_use]
    pub fn container_html(&self, id: &str) -> Option<String> {
        self.lock().containers.get(id).map(Node::to_html)
    }

    /// Replace everything inside container `id` with `content`.
    ///
    /// # Errors
    /// Returns [`FreshfieldError::ContainerNotFound`] when the page has no
    /// such container.
    pub fn replace_container_content(
        &self,
        id: &str,
        content: Node,
    ) -> Result<Node, FreshfieldError> {
        let mut state = self.lock();
        let container = state
            .containers
            .get_mut(id)
            .ok_or_else(|| FreshfieldError::container_not_found(id))?;
        container.children = vec![content];
        Ok(container.clone())
    }

    /// Attach `node` as the page's modal, removing any previous one first.
    /// The scroll lock held by the previous modal is handed to the new one.
    pub(crate) fn attach_modal(&self, mut node: Node) -> ModalInstance {
        node.add_class(MODAL_CLASS);
        let mut state = self.lock();
        if let Some(previous) = state.modal.take() {
            debug!("Replacing modal instance {:?}", previous.instance);
            state.scroll_locked = false;
        }

        state.next_instance += 1;
        let instance = ModalInstance(state.next_instance);
        state.scroll_locked = true;
        state.modal = Some(AttachedModal { instance, node });
        instance
    }

    /// Apply `edit` to the modal node if `instance` is still attached.
    pub(crate) fn edit_modal(&self, instance: ModalInstance, edit: impl FnOnce(&mut Node)) -> bool {
        let mut state = self.lock();
        match state.modal.as_mut() {
            Some(attached) if attached.instance == instance => {
                edit(&mut attached.node);
                true
            }
            _ => false,
        }
    }

    /// Remove the modal and release the scroll lock, if `instance` is still
    /// attached.
    pub(crate) fn detach_modal(&self, instance: ModalInstance) -> bool {
        let mut state = self.lock();
        if state
            .modal
            .as_ref()
            .is_some_and(|attached| attached.instance == instance)
        {
            state.modal = None;
            state.scroll_locked = false;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub(crate) fn is_modal_attached(&self, instance: ModalInstance) -> bool {
        self.lock()
            .modal
            .as_ref()
            .is_some_and(|attached| attached.instance == instance)
    }

    #[must_use]
    pub fn modal(&self) -> Option<Node> {
        self.lock().modal.as_ref().map(|attached| attached.node.clone())
    }

    #[must_use]
    pub fn is_scroll_locked(&self) -> bool {
        self.lock().scroll_locked
    }

    /// Inject the stylesheet for `theme` unless it is already present.
    /// Returns whether the page changed.
    pub fn ensure_styles(&self, theme: StyleTheme) -> bool {
        let mut state = self.lock();
        if state
            .styles
            .as_ref()
            .is_some_and(|styles| styles.theme == theme)
        {
            return false;
        }

        let node = Node::new("style")
            .with_id(STYLES_ID)
            .with_markup(theme.stylesheet());
        state.styles = Some(AttachedStyles { theme, node });
        true
    }

    #[must_use]
    pub fn styles(&self) -> Option<Node> {
        self.lock().styles.as_ref().map(|styles| styles.node.clone())
    }

    fn lock(&self) -> MutexGuard<'_, DocumentState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_container_is_configuration_error() {
        let document = Document::new();

        let result = document.replace_container_content("_ffUpdatesContainer", Node::new("p"));

        assert_eq!(
            result,
            Err(FreshfieldError::container_not_found("_ffUpdatesContainer"))
        );
    }

    #[test]
    fn replace_container_content_drops_previous_children() {
        let document = Document::new().with_container("c");
        document
            .replace_container_content("c", Node::new("p").with_text("one"))
            .expect("container exists");
        document
            .replace_container_content("c", Node::new("p").with_text("two"))
            .expect("container exists");

        assert_eq!(
            document.container_html("c").as_deref(),
            Some("<div id=\"c\"><p>two</p></div>")
        );
    }

    #[test]
    fn attaching_replaces_previous_modal_and_keeps_single_lock() {
        let document = Document::new();

        let first = document.attach_modal(Node::new("div").with_text("first"));
        let second = document.attach_modal(Node::new("div").with_text("second"));

        assert!(!document.is_modal_attached(first));
        assert!(document.is_modal_attached(second));
        assert_eq!(
            document
                .modal()
                .and_then(|node| node.text().map(str::to_string))
                .as_deref(),
            Some("second")
        );
        assert!(document.is_scroll_locked());

        assert!(!document.detach_modal(first));
        assert!(document.is_scroll_locked());
        assert!(document.detach_modal(second));
        assert!(!document.is_scroll_locked());
        assert!(document.modal().is_none());
    }

    #[test]
    fn stale_instance_cannot_edit_modal() {
        let document = Document::new();
        let first = document.attach_modal(Node::new("div"));
        let _second = document.attach_modal(Node::new("div"));

        assert!(!document.edit_modal(first, |node| node.add_class("_ffClosing")));
        assert!(
            !document
                .modal()
                .is_some_and(|node| node.has_class("_ffClosing"))
        );
    }

    #[test]
    fn ensure_styles_is_idempotent_per_theme() {
        let document = Document::new();

        assert!(document.ensure_styles(StyleTheme::Base));
        assert!(!document.ensure_styles(StyleTheme::Base));
        assert!(document.ensure_styles(StyleTheme::Carrot));

        let styles = document.styles().expect("styles injected");
        assert_eq!(styles.id.as_deref(), Some(STYLES_ID));
        assert!(styles.markup().is_some_and(|css| css.contains("--color-green")));
    }
}
