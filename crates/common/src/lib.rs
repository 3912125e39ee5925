//! # foxcloud Common
//!
//! Foundation tier for the foxcloud workspace.
//!
//! This crate contains:
//! - The wall-clock abstraction (`time`) used wherever token expiry or wire
//!   timestamps are computed
//! - The credential subsystem (`auth`): signed-token issuance with an
//!   expiry-aware cache, and the service-account identity built on top of it
//!
//! ## Architecture
//! - No I/O beyond reading the service-account credential file
//! - All network-facing clients live in `foxcloud-infra`

pub mod auth;
pub mod time;

pub use auth::{AuthError, ClaimSet, ServiceAccount, TokenIssuer};
pub use time::{Clock, FixedClock, SystemClock};
