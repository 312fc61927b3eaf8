use std::fmt;
use std::future::Future;
use std::sync::Arc;

use freshfield_api::FreshfieldError;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;

/// Notification receiving an update id or an email address.
pub type Callback = Arc<dyn Fn(&str) + Send + Sync>;

/// Notification receiving a failed subscription and the submitted email.
pub type ErrorCallback = Arc<dyn Fn(&FreshfieldError, &str) + Send + Sync>;

type PredicateFn = dyn Fn(String) -> BoxFuture<'static, bool> + Send + Sync;

/// Caller-supplied yes/no gate, synchronous or asynchronous.
#[derive(Clone)]
pub struct Predicate(Arc<PredicateFn>);

impl Predicate {
    pub fn new<F, Fut>(predicate: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        Self(Arc::new(move |argument| predicate(argument).boxed()))
    }

    pub fn sync<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self::new(move |argument: String| std::future::ready(predicate(&argument)))
    }

    pub async fn evaluate(&self, argument: &str) -> bool {
        (self.0)(argument.to_string()).await
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

pub fn callback<F>(f: F) -> Callback
where
    F: Fn(&str) + Send + Sync + 'static,
{
    Arc::new(f)
}

pub fn error_callback<F>(f: F) -> ErrorCallback
where
    F: Fn(&FreshfieldError, &str) + Send + Sync + 'static,
{
    Arc::new(f)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::Predicate;

    #[tokio::test]
    async fn sync_predicate_receives_argument() {
        let predicate = Predicate::sync(|id| id == "u1");

        assert!(predicate.evaluate("u1").await);
        assert!(!predicate.evaluate("u2").await);
    }

    #[tokio::test(start_paused = true)]
    async fn async_predicate_is_awaited() {
        let predicate = Predicate::new(|email: String| async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            email.ends_with("@example.com")
        });

        assert!(predicate.evaluate("a@example.com").await);
        assert!(!predicate.evaluate("a@other.org").await);
    }
}
