//! Network-facing logic of the Freshfield SDK.
//!
//! - Deployment configuration and credentials.
//! - A `reqwest`-backed [`HttpTransport`](freshfield_api::HttpTransport).
//! - Icon resolution against an Iconify-compatible registry.
//! - The update feed client and the subscription API binding.

mod config;
mod feed;
mod http;
mod icons;
mod subscription;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::{AuthHeader, ClientConfig, Credentials, DEFAULT_BASE_URL, DEFAULT_ICON_HOST};
pub use feed::{DEFAULT_LIMIT, DEFAULT_OFFSET, FeedClient, FetchOptions};
pub use http::ReqwestTransport;
pub use icons::{
    FALLBACK_ICON_SIZE, IconError, IconLookup, IconResolution, IconResolver, parse_reference,
};
pub use subscription::{SubscriptionApi, SubscriptionSink};
