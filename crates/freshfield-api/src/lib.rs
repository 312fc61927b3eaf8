mod error;
mod transport;
mod types;

pub use error::{ErrorKind, FreshfieldError, NetworkStage};
pub use transport::{HttpRequest, HttpResponse, HttpTransport};
pub use types::{
    Feature, FeatureKind, IconFormat, SubscriptionAdded, SubscriptionResponse, SubscriptionStatus,
    Update,
};
