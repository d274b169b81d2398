//! Social network clients used by dormant.
//!
//! [`SocialApi`] is the narrow surface the pipeline needs: resolve a handle,
//! page through who an account follows, and read an account's latest posts.
//! [`twitter::TwitterApi`] implements it against the Twitter/X v2 API.
pub mod api;
pub mod twitter;

pub use api::{Page, SocialApi};
