use std::sync::Arc;

use chrono::{DateTime, Utc};
use freshfield_api::HttpTransport;
use freshfield_core::{ClientConfig, FeedClient, IconResolver};
pub use freshfield_core::test_support::ScriptedTransport;
use serde_json::{Value, json};

pub fn uninitialized_feed_client(transport: &ScriptedTransport) -> FeedClient {
    let transport: Arc<dyn HttpTransport> = Arc::new(transport.clone());
    let icons = Arc::new(IconResolver::new(
        ClientConfig::default(),
        Arc::clone(&transport),
    ));
    FeedClient::new(ClientConfig::default(), transport, icons)
}

pub fn feed_client(transport: &ScriptedTransport) -> FeedClient {
    let mut feed = uninitialized_feed_client(transport);
    feed.initialize("site-key").expect("valid key");
    feed
}

/// Feed item titled `Update {id}` with one icon-less feature.
pub fn update_json(id: &str, created: DateTime<Utc>) -> Value {
    json!({
        "id": id,
        "created": created.to_rfc3339(),
        "title": format!("Update {id}"),
        "description": "<p>Release notes</p>",
        "version": "1.2.0",
        "features": [
            { "type": "new", "name": "Search", "description": "Find things faster" }
        ]
    })
}
