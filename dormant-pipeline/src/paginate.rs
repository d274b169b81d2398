use dormant_common::{Result, UserIdentity};
use dormant_social::SocialApi;

/// Everything the following endpoint returned, in API order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowList {
    pub followers: Vec<UserIdentity>,
    pub pages: usize,
    /// Set when paging stopped early; the list holds the pages before it.
    pub interrupted: Option<String>,
}

impl FollowList {
    pub fn is_complete(&self) -> bool {
        self.interrupted.is_none()
    }
}

/// Walk the following list of `user_id` until the continuation token runs out.
///
/// Page failures keep what was already gathered, except fatal errors
/// (for example a revoked token) which abort. `max_pages` caps the walk.
pub async fn collect_following<A>(
    api: &A,
    user_id: &str,
    max_pages: usize,
) -> Result<FollowList>
where
    A: SocialApi + ?Sized,
{
    let mut followers = Vec::new();
    let mut token: Option<String> = None;
    let mut pages = 0usize;

    let interrupted = loop {
        if pages >= max_pages {
            tracing::warn!(user_id, pages, "page cap reached, follow list truncated");
            break Some(format!("stopped after {pages} pages"));
        }

        match api.following_page(user_id, token.as_deref()).await {
            Ok(page) => {
                pages += 1;
                tracing::debug!(
                    user_id,
                    page = pages,
                    count = page.items.len(),
                    "following page"
                );
                followers.extend(page.items);
                match page.next_token.filter(|t| !t.is_empty()) {
                    Some(next) => token = Some(next),
                    None => break None,
                }
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::warn!(
                    user_id,
                    pages,
                    error = %e,
                    "following page failed, keeping partial list"
                );
                break Some(e.to_string());
            }
        }
    };

    tracing::info!(
        user_id,
        pages,
        followers = followers.len(),
        "follow list collected"
    );
    Ok(FollowList {
        followers,
        pages,
        interrupted,
    })
}
