//! HTTP transport wrapper and shared response decoding
//!
//! [`HttpClient`] is a thin layer over reqwest: one attempt per call, timeout
//! and user agent configured at build time. [`decode_response`] is the single
//! place REST bodies are classified — recognized error shapes become
//! [`ApiError::Remote`] so the protocol clients never branch inline.

mod client;
mod errors;
mod response;

pub use client::{HttpClient, HttpClientBuilder};
pub use errors::ApiError;
pub use response::decode_response;
