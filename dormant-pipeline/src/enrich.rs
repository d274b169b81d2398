use crate::model::EnrichedFollower;
use dormant_common::{Post, Result, UserIdentity};
use dormant_social::SocialApi;
use futures::stream::{self, StreamExt};

/// Reported once per follower, in follow-list order.
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    /// 1-based position in the follow list.
    pub index: usize,
    pub total: usize,
    pub follower: &'a EnrichedFollower,
}

/// Attach each follower's latest post.
///
/// Up to `concurrency` lookups run at once; results come back in input
/// order. A failed lookup yields an entry without a post; only fatal errors
/// (auth) abort the whole run.
pub async fn enrich<A, F>(
    api: &A,
    followers: Vec<UserIdentity>,
    concurrency: usize,
    mut on_progress: F,
) -> Result<Vec<EnrichedFollower>>
where
    A: SocialApi + ?Sized,
    F: FnMut(Progress<'_>),
{
    let total = followers.len();
    let lookups = stream::iter(followers)
        .map(|user| async move {
            let outcome = latest_post(api, &user).await;
            (user, outcome)
        })
        .buffered(concurrency.max(1));
    let mut lookups = std::pin::pin!(lookups);

    let mut enriched = Vec::with_capacity(total);
    while let Some((user, outcome)) = lookups.next().await {
        let entry = match outcome {
            Ok(post) => EnrichedFollower::new(user, post),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::warn!(
                    user_id = %user.id,
                    username = %user.username,
                    error = %e,
                    "post lookup failed, continuing"
                );
                EnrichedFollower::unavailable(user, e.to_string())
            }
        };
        enriched.push(entry);
        if let Some(last) = enriched.last() {
            on_progress(Progress {
                index: enriched.len(),
                total,
                follower: last,
            });
        }
    }

    let failed = enriched.iter().filter(|f| f.failure().is_some()).count();
    tracing::info!(total, failed, "enrichment finished");
    Ok(enriched)
}

async fn latest_post<A>(api: &A, user: &UserIdentity) -> Result<Option<Post>>
where
    A: SocialApi + ?Sized,
{
    if user.protected {
        tracing::debug!(user_id = %user.id, "protected account, posts not requested");
        return Ok(None);
    }
    let posts = api.recent_posts(&user.id).await?;
    Ok(posts.into_iter().next())
}
