use async_trait::async_trait;
use dormant_common::{Handle, Post, Result, UserIdentity};

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Opaque continuation token; `None` on the last page.
    pub next_token: Option<String>,
}

/// Read-only account queries the pipeline depends on.
///
/// Implementations map rejected credentials (401) to
/// `DormantError::Unauthorized`, a forbidden app (403) to
/// `DormantError::Forbidden` and unknown handles to
/// `DormantError::UserNotFound`; everything else is `DormantError::Api`.
#[async_trait]
pub trait SocialApi: Send + Sync {
    /// Resolve a handle to the account behind it.
    async fn lookup_user(&self, handle: &Handle) -> Result<UserIdentity>;

    /// Fetch one page of the accounts `user_id` follows.
    async fn following_page(
        &self,
        user_id: &str,
        pagination_token: Option<&str>,
    ) -> Result<Page<UserIdentity>>;

    /// Most recent posts by `user_id`, newest first.
    async fn recent_posts(&self, user_id: &str) -> Result<Vec<Post>>;
}
