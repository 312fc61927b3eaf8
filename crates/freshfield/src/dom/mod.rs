//! Minimal model of the host page the SDK renders into.

mod document;
mod node;

pub use document::{Document, ModalInstance};
pub use node::{Content, Node};

/// Container the update list is rendered into.
pub const UPDATES_CONTAINER_ID: &str = "_ffUpdatesContainer";
/// Container the subscription form is rendered into.
pub const SUBSCRIPTION_CONTAINER_ID: &str = "_ffSubscriptionContainer";
pub const MODAL_CLASS: &str = "_ffModal";
pub const STYLES_ID: &str = "_ffStyles";
