//! Email subscription form: validation, submission and the timed success
//! window.

mod messages;
mod validation;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use freshfield_api::FreshfieldError;
use freshfield_core::SubscriptionSink;
use log::{debug, error, warn};

use crate::callbacks::{Callback, ErrorCallback, Predicate};
use crate::dom::{Document, Node};

pub use messages::SubscriptionMessages;
pub use validation::{ValidationError, validate_email};

pub const DEFAULT_SUCCESS_WINDOW: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Validating,
    Submitting,
    Success,
    ErrorShown,
}

impl FormState {
    /// Input and button are disabled while a submission is in flight or its
    /// success is on display.
    #[must_use]
    pub fn is_locked(self) -> bool {
        matches!(self, Self::Submitting | Self::Success)
    }
}

#[derive(Clone)]
pub struct SubscriptionWidgetOptions {
    pub placeholder: String,
    pub button_text: String,
    pub loading_text: String,
    pub success_text: String,
    pub messages: SubscriptionMessages,
    /// How long the success label stays before the form resets.
    pub success_window: Duration,
    /// Extra pause after the response arrives and before it is shown.
    pub response_delay: Duration,
    /// Last-chance gate called with the validated email.
    pub before_send: Option<Predicate>,
    pub on_success: Option<Callback>,
    pub on_error: Option<ErrorCallback>,
}

impl Default for SubscriptionWidgetOptions {
    fn default() -> Self {
        Self {
            placeholder: "Enter your email...".to_string(),
            button_text: "Subscribe".to_string(),
            loading_text: "Subscribing...".to_string(),
            success_text: "Subscribed!".to_string(),
            messages: SubscriptionMessages::default(),
            success_window: DEFAULT_SUCCESS_WINDOW,
            response_delay: Duration::ZERO,
            before_send: None,
            on_success: None,
            on_error: None,
        }
    }
}

/// Snapshot of what the form currently displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub state: FormState,
    pub email: String,
    /// Last error message. Kept after typing hides it.
    pub error: Option<String>,
    pub error_visible: bool,
    pub button_label: String,
    pub disabled: bool,
}

#[derive(Debug)]
struct FormInner {
    state: FormState,
    email: String,
    error: Option<String>,
    error_visible: bool,
    /// Bumped by every accepted submit; a success reset only applies to the
    /// submit that scheduled it.
    generation: u64,
}

impl FormInner {
    fn show_error(&mut self, message: String) {
        self.error = Some(message);
        self.error_visible = true;
        self.state = FormState::ErrorShown;
    }
}

#[derive(Clone)]
struct Mount {
    document: Document,
    container_id: String,
}

/// Controller of one subscription form. Clones share the same form.
#[derive(Clone)]
pub struct SubscriptionForm {
    inner: Arc<Mutex<FormInner>>,
    sink: Arc<dyn SubscriptionSink>,
    options: Arc<SubscriptionWidgetOptions>,
    mount: Option<Mount>,
}

impl SubscriptionForm {
    pub fn new(sink: Arc<dyn SubscriptionSink>, options: SubscriptionWidgetOptions) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FormInner {
                state: FormState::Idle,
                email: String::new(),
                error: None,
                error_visible: false,
                generation: 0,
            })),
            sink,
            options: Arc::new(options),
            mount: None,
        }
    }

    /// Render into container `container_id` now and after every state
    /// change.
    ///
    /// # Errors
    /// Returns [`FreshfieldError::ContainerNotFound`] when the page has no
    /// such container.
    pub fn mount(
        mut self,
        document: &Document,
        container_id: &str,
    ) -> Result<Self, FreshfieldError> {
        document.replace_container_content(container_id, self.render())?;
        self.mount = Some(Mount {
            document: document.clone(),
            container_id: container_id.to_string(),
        });
        Ok(self)
    }

    #[must_use]
    pub fn state(&self) -> FormState {
        self.lock().state
    }

    #[must_use]
    pub fn view(&self) -> FormView {
        let inner = self.lock();
        let button_label = match inner.state {
            FormState::Submitting => &self.options.loading_text,
            FormState::Success => &self.options.success_text,
            _ => &self.options.button_text,
        };
        FormView {
            state: inner.state,
            email: inner.email.clone(),
            error: inner.error.clone(),
            error_visible: inner.error_visible,
            button_label: button_label.clone(),
            disabled: inner.state.is_locked(),
        }
    }

    /// The user typed into the email field. Ignored while the field is
    /// disabled. Returns whether the value was accepted.
    pub fn input(&self, value: &str) -> bool {
        {
            let mut inner = self.lock();
            if inner.state.is_locked() {
                return false;
            }
            inner.email = value.to_string();
            if inner.error_visible {
                inner.error_visible = false;
                inner.state = FormState::Idle;
            }
        }
        self.refresh();
        true
    }

    /// Run one submission through validation, the caller's gate and the
    /// subscription call. Returns the state the form settled in. A submit
    /// while the form is locked is ignored.
    pub async fn submit(&self) -> FormState {
        let email = {
            let mut inner = self.lock();
            if inner.state.is_locked() {
                debug!("Ignoring submit while form is {:?}", inner.state);
                return inner.state;
            }

            inner.generation += 1;
            inner.error = None;
            inner.error_visible = false;
            inner.state = FormState::Validating;

            match validate_email(&inner.email) {
                Ok(email) => {
                    let email = email.to_string();
                    inner.state = FormState::Submitting;
                    Some(email)
                }
                Err(ValidationError::Required) => {
                    inner.show_error(self.options.messages.required.clone());
                    None
                }
                Err(ValidationError::Invalid) => {
                    inner.show_error(self.options.messages.invalid.clone());
                    None
                }
            }
        };
        self.refresh();

        let Some(email) = email else {
            return FormState::ErrorShown;
        };

        if let Some(before_send) = &self.options.before_send
            && !before_send.evaluate(&email).await
        {
            debug!("Subscription cancelled by caller");
            return self.fail(self.options.messages.cancelled.clone());
        }

        let result = self.sink.subscribe(&email).await;
        if !self.options.response_delay.is_zero() {
            tokio::time::sleep(self.options.response_delay).await;
        }

        match result {
            Ok(_) => self.succeed(&email),
            Err(failure) => {
                warn!("Subscription failed: {failure}");
                let state = self.fail(self.options.messages.resolve_failure(&failure));
                if let Some(on_error) = &self.options.on_error {
                    on_error(&failure, &email);
                }
                state
            }
        }
    }

    /// The form as a render tree.
    #[must_use]
    pub fn render(&self) -> Node {
        let view = self.view();

        let mut input = Node::new("input")
            .with_class("_ffSubscriptionInput")
            .with_attr("type", "email")
            .with_attr("placeholder", &self.options.placeholder)
            .with_attr("value", &view.email);
        let mut button = Node::new("button")
            .with_class("_ffSubscriptionButton")
            .with_attr("type", "submit")
            .with_text(&view.button_label);
        if view.disabled {
            input.set_attr("disabled", "disabled");
            button.set_attr("disabled", "disabled");
        }

        let mut form = Node::new("form")
            .with_class("_ffSubscriptionForm")
            .with_children([input, button]);
        if view.error_visible
            && let Some(message) = view.error
        {
            form.children.push(
                Node::new("p")
                    .with_class("_ffSubscriptionError")
                    .with_text(message),
            );
        }
        form
    }

    fn succeed(&self, email: &str) -> FormState {
        let generation = {
            let mut inner = self.lock();
            inner.email.clear();
            inner.error = None;
            inner.error_visible = false;
            inner.state = FormState::Success;
            inner.generation
        };
        self.refresh();

        if let Some(on_success) = &self.options.on_success {
            on_success(email);
        }

        let form = self.clone();
        let window = self.options.success_window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            form.reset_after_success(generation);
        });

        FormState::Success
    }

    fn fail(&self, message: String) -> FormState {
        self.lock().show_error(message);
        self.refresh();
        FormState::ErrorShown
    }

    fn reset_after_success(&self, generation: u64) {
        {
            let mut inner = self.lock();
            if inner.generation != generation || inner.state != FormState::Success {
                return;
            }
            inner.state = FormState::Idle;
        }
        self.refresh();
    }

    fn refresh(&self) {
        let Some(mount) = &self.mount else {
            return;
        };
        if let Err(failure) = mount
            .document
            .replace_container_content(&mount.container_id, self.render())
        {
            error!("Failed to render subscription form: {failure}");
        }
    }

    fn lock(&self) -> MutexGuard<'_, FormInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
