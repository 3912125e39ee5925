//! Pub/Sub publish, pull and acknowledge
//!
//! - [`PubsubMessage`] — payload, attributes and delivery metadata
//! - [`PublisherClient`] — topic-bound publishing with the
//!   immediate/scheduled split
//! - [`SubscriberClient`] — subscription-bound pull and acknowledge

mod errors;
mod message;
mod publisher;
mod subscriber;

pub use errors::PubsubError;
pub use message::PubsubMessage;
pub use publisher::{PublisherClient, ACCESS_SCOPE, DEFAULT_BASE_URL};
pub use subscriber::{AckTarget, SubscriberClient};
