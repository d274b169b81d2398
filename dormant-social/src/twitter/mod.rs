//! Twitter/X v2 integration: the HTTP client wrapper and the response models.
//!
//! Pagination tokens are surfaced verbatim through [`crate::Page::next_token`];
//! callers decide when to stop.
pub mod client;
pub mod types;

pub use client::TwitterApi;
