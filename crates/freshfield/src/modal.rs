use std::time::Duration;

use chrono::{DateTime, Utc};
use freshfield_api::Update;
use freshfield_core::FeedClient;
use log::{debug, error};

use crate::callbacks::{Callback, Predicate};
use crate::dom::{Document, ModalInstance, Node};
use crate::render::{ModalTheme, StyleTheme};

pub const DEFAULT_AGE_LIMIT_DAYS: f64 = 14.0;
pub const DEFAULT_SUBMIT_BUTTON_TEXT: &str = "Got it!";
pub const CLOSING_CLASS: &str = "_ffClosing";
/// Matches the fly-out animation in the base stylesheet.
pub const CLOSE_TRANSITION: Duration = Duration::from_millis(200);

const MILLIS_PER_DAY: f64 = 86_400_000.0;

#[derive(Clone)]
pub struct ModalOptions {
    /// Maximum age of the latest update, in days. Default 14.
    pub age_limit_days: f64,
    /// Per-user "already seen" gate, called with the update id. Absent means
    /// always show.
    pub before_show: Option<Predicate>,
    /// Called with the update id once the modal has been dismissed.
    pub on_confirm: Option<Callback>,
    /// Close button label. Default `Got it!`.
    pub submit_button_text: String,
    pub theme: ModalTheme,
    pub style: StyleTheme,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            age_limit_days: DEFAULT_AGE_LIMIT_DAYS,
            before_show: None,
            on_confirm: None,
            submit_button_text: DEFAULT_SUBMIT_BUTTON_TEXT.to_string(),
            theme: ModalTheme::default(),
            style: StyleTheme::default(),
        }
    }
}

/// Fractional days between `created` and `now`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn age_in_days(created: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - created).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Whether an update created at `created` is recent enough to present.
#[must_use]
pub fn is_fresh(created: DateTime<Utc>, now: DateTime<Utc>, age_limit_days: f64) -> bool {
    age_in_days(created, now) <= age_limit_days
}

/// Fetch the latest update and present it if the caller's gate and the age
/// limit allow. Every failure is logged and results in no modal.
pub async fn show_last_update_modal(
    feed: &FeedClient,
    document: &Document,
    options: ModalOptions,
) -> Option<ModalHandle> {
    let latest = match feed.fetch_latest().await {
        Ok(Some(update)) => update,
        Ok(None) => {
            debug!("No updates available for modal");
            return None;
        }
        Err(error) => {
            error!("Failed to check latest update: {error}");
            return None;
        }
    };

    if let Some(before_show) = &options.before_show
        && !before_show.evaluate(&latest.id).await
    {
        debug!("Modal for update {} suppressed by caller", latest.id);
        return None;
    }

    if !is_fresh(latest.created, Utc::now(), options.age_limit_days) {
        debug!(
            "Latest update {} is older than {} days",
            latest.id, options.age_limit_days
        );
        return None;
    }

    Some(present_modal(document, &latest, &options))
}

/// Attach a modal for `update`, replacing any modal already on the page.
pub fn present_modal(
    document: &Document,
    update: &Update,
    options: &ModalOptions,
) -> ModalHandle {
    document.ensure_styles(options.style);

    let content = options.theme.render(update, &options.submit_button_text);
    let instance = document.attach_modal(Node::new("div").with_child(content));

    ModalHandle {
        document: document.clone(),
        instance,
        update_id: update.id.clone(),
        on_confirm: options.on_confirm.clone(),
    }
}

/// A presented modal. Dismissal through [`ModalHandle::close`] is the only
/// way out.
pub struct ModalHandle {
    document: Document,
    instance: ModalInstance,
    update_id: String,
    on_confirm: Option<Callback>,
}

impl ModalHandle {
    #[must_use]
    pub fn update_id(&self) -> &str {
        &self.update_id
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.document.is_modal_attached(self.instance)
    }

    /// The close button was pressed: play the closing transition, remove the
    /// modal, release the scroll lock and notify the caller.
    ///
    /// A handle whose modal was replaced before the close started does
    /// nothing. Once the closing transition has started, the caller is
    /// notified even if another modal took the slot in the meantime; only
    /// removal and unlocking are skipped then.
    pub async fn close(self) {
        let marked = self
            .document
            .edit_modal(self.instance, |node| node.add_class(CLOSING_CLASS));
        if !marked {
            return;
        }

        tokio::time::sleep(CLOSE_TRANSITION).await;

        if !self.document.detach_modal(self.instance) {
            debug!("Modal for update {} was replaced while closing", self.update_id);
        }
        if let Some(on_confirm) = &self.on_confirm {
            on_confirm(&self.update_id);
        }
    }
}

impl std::fmt::Debug for ModalHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalHandle")
            .field("instance", &self.instance)
            .field("update_id", &self.update_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::{Duration as ChronoDuration, TimeZone};
    use freshfield_api::HttpResponse;

    use super::*;
    use crate::callbacks::callback;
    use crate::test_support::{ScriptedTransport, feed_client, update_json};

    fn days_ago(days: i64) -> DateTime<Utc> {
        Utc::now() - ChronoDuration::days(days)
    }

    fn latest_feed(update: serde_json::Value) -> ScriptedTransport {
        ScriptedTransport::json(200, serde_json::json!([update]))
    }

    fn update(id: &str, created: DateTime<Utc>) -> Update {
        serde_json::from_value(update_json(id, created)).expect("update should decode")
    }

    #[test]
    fn age_is_fractional_days() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();

        assert!((age_in_days(created, now) - 1.5).abs() < f64::EPSILON);
        assert!(is_fresh(created, now, 1.5));
        assert!(!is_fresh(created, now, 1.4));
    }

    #[tokio::test]
    async fn recent_update_is_presented() {
        let transport = latest_feed(update_json("u1", days_ago(10)));
        let feed = feed_client(&transport);
        let document = Document::new();

        let handle = show_last_update_modal(&feed, &document, ModalOptions::default())
            .await
            .expect("modal should present");

        assert_eq!(handle.update_id(), "u1");
        assert!(handle.is_attached());
        assert!(document.is_scroll_locked());
        assert!(document.styles().is_some());
        assert_eq!(transport.requests()[0].query("limit").as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn stale_update_is_not_presented() {
        let transport = latest_feed(update_json("u1", days_ago(20)));
        let feed = feed_client(&transport);
        let document = Document::new();

        let handle = show_last_update_modal(&feed, &document, ModalOptions::default()).await;

        assert!(handle.is_none());
        assert!(document.modal().is_none());
        assert!(!document.is_scroll_locked());
    }

    #[tokio::test]
    async fn before_show_false_suppresses_modal_and_receives_id() {
        let transport = latest_feed(update_json("u7", days_ago(1)));
        let feed = feed_client(&transport);
        let document = Document::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_by_gate = Arc::clone(&seen);

        let options = ModalOptions {
            before_show: Some(Predicate::sync(move |id| {
                seen_by_gate.lock().expect("lock").push(id.to_string());
                false
            })),
            ..ModalOptions::default()
        };

        assert!(
            show_last_update_modal(&feed, &document, options)
                .await
                .is_none()
        );
        assert_eq!(*seen.lock().expect("lock"), vec!["u7".to_string()]);
        assert!(document.modal().is_none());
    }

    #[tokio::test]
    async fn fetch_failure_results_in_no_modal() {
        let transport = ScriptedTransport::new(|_| Ok(HttpResponse::new(500, "boom")));
        let feed = feed_client(&transport);
        let document = Document::new();

        assert!(
            show_last_update_modal(&feed, &document, ModalOptions::default())
                .await
                .is_none()
        );
        assert!(!document.is_scroll_locked());
    }

    #[tokio::test]
    async fn empty_feed_results_in_no_modal() {
        let transport = ScriptedTransport::json(200, serde_json::json!([]));
        let feed = feed_client(&transport);

        assert!(
            show_last_update_modal(&feed, &Document::new(), ModalOptions::default())
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn uninitialized_feed_results_in_no_modal() {
        let transport = ScriptedTransport::json(200, serde_json::json!([]));
        let feed = crate::test_support::uninitialized_feed_client(&transport);

        assert!(
            show_last_update_modal(&feed, &Document::new(), ModalOptions::default())
                .await
                .is_none()
        );
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn presenting_twice_keeps_single_modal() {
        let document = Document::new();
        let first = update("first", days_ago(1));
        let second = update("second", days_ago(1));

        let first_handle = present_modal(&document, &first, &ModalOptions::default());
        let second_handle = present_modal(&document, &second, &ModalOptions::default());

        assert!(!first_handle.is_attached());
        assert!(second_handle.is_attached());
        let modal = document.modal().expect("one modal attached");
        assert_eq!(
            modal.find_by_class("_ffUpdateTitle").and_then(Node::text),
            Some("Update second")
        );
        assert!(document.is_scroll_locked());
    }

    #[tokio::test(start_paused = true)]
    async fn close_removes_modal_after_transition_and_confirms() {
        let document = Document::new();
        let latest = update("u3", days_ago(2));
        let confirmed = Arc::new(Mutex::new(Vec::new()));
        let confirmed_by_callback = Arc::clone(&confirmed);
        let options = ModalOptions {
            on_confirm: Some(callback(move |id| {
                confirmed_by_callback.lock().expect("lock").push(id.to_string());
            })),
            ..ModalOptions::default()
        };

        let handle = present_modal(&document, &latest, &options);
        let closing = tokio::spawn(handle.close());
        tokio::task::yield_now().await;

        let modal = document.modal().expect("modal still attached while closing");
        assert!(modal.has_class(CLOSING_CLASS));
        assert!(confirmed.lock().expect("lock").is_empty());

        closing.await.expect("close task completes");

        assert!(document.modal().is_none());
        assert!(!document.is_scroll_locked());
        assert_eq!(*confirmed.lock().expect("lock"), vec!["u3".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn closing_replaced_modal_is_a_no_op() {
        let document = Document::new();
        let latest = update("u4", days_ago(2));
        let confirmed = Arc::new(Mutex::new(0_u32));
        let counter = Arc::clone(&confirmed);
        let options = ModalOptions {
            on_confirm: Some(callback(move |_| *counter.lock().expect("lock") += 1)),
            ..ModalOptions::default()
        };

        let stale = present_modal(&document, &latest, &options);
        let current = present_modal(&document, &latest, &options);
        stale.close().await;

        assert!(current.is_attached());
        assert!(document.is_scroll_locked());
        assert_eq!(*confirmed.lock().expect("lock"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn replacing_modal_during_close_still_confirms() {
        let document = Document::new();
        let confirmed = Arc::new(Mutex::new(Vec::new()));
        let confirmed_by_callback = Arc::clone(&confirmed);
        let options = ModalOptions {
            on_confirm: Some(callback(move |id| {
                confirmed_by_callback.lock().expect("lock").push(id.to_string());
            })),
            ..ModalOptions::default()
        };

        let first = present_modal(&document, &update("a", days_ago(1)), &options);
        let closing = tokio::spawn(first.close());
        tokio::task::yield_now().await;

        let second = present_modal(&document, &update("b", days_ago(1)), &options);
        closing.await.expect("close task completes");

        assert_eq!(*confirmed.lock().expect("lock"), vec!["a".to_string()]);
        assert!(second.is_attached());
        assert!(document.is_scroll_locked());
        assert!(
            !document
                .modal()
                .is_some_and(|modal| modal.has_class(CLOSING_CLASS))
        );
    }
}
