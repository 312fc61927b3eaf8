//! Freshfield SDK for embedding a product changelog in a host page.
//!
//! [`Freshfield`] fetches the update feed, renders it into the page's
//! updates container, presents the latest update as a modal and drives the
//! email subscription form. The host page is modelled by [`Document`].

pub mod callbacks;
pub mod dom;
pub mod form;
pub mod logging;
pub mod modal;
pub mod render;
mod sdk;

#[cfg(test)]
mod test_support;

pub use callbacks::{Callback, ErrorCallback, Predicate, callback, error_callback};
pub use dom::{
    Document, Node, SUBSCRIPTION_CONTAINER_ID, UPDATES_CONTAINER_ID,
};
pub use form::{
    FormState, FormView, SubscriptionForm, SubscriptionMessages, SubscriptionWidgetOptions,
};
pub use logging::{LoggingOptions, init_logging, set_logging_enabled};
pub use modal::{ModalHandle, ModalOptions};
pub use render::{ModalTheme, StyleTheme};
pub use sdk::{Freshfield, HtmlOptions, Subscription};

pub use freshfield_api::{
    ErrorKind, Feature, FeatureKind, FreshfieldError, HttpRequest, HttpResponse, HttpTransport,
    IconFormat, SubscriptionAdded, SubscriptionResponse, SubscriptionStatus, Update,
};
pub use freshfield_core::{AuthHeader, ClientConfig, FetchOptions, IconLookup, IconResolver};
