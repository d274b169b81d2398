//! Follow-list dormancy pipeline.
//!
//! `resolve` the target handle, `collect_following` through every page,
//! `enrich` each followed account with its latest post, then `rank` the
//! result so the least active accounts come first. [`run`] chains the steps
//! and reports each stage to an [`Observer`].
//!
//! Error policy: resolution and auth failures abort; a failed page truncates
//! the follow list; a failed post lookup only affects that follower.
pub mod enrich;
pub mod model;
pub mod paginate;
pub mod rank;
pub mod report;
pub mod resolve;

#[cfg(test)]
mod testing;

pub use enrich::{Progress, enrich};
pub use model::{EnrichedFollower, FollowerStatus};
pub use paginate::{FollowList, collect_following};
pub use rank::{dormancy_order, rank};
pub use report::ReportStyle;
pub use resolve::resolve;

use dormant_common::{Handle, Result, UserIdentity};
use dormant_social::SocialApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub concurrency: usize,
    pub max_pages: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            max_pages: 1000,
        }
    }
}

/// Stage callbacks for [`run`]. All methods default to no-ops.
pub trait Observer {
    fn resolved(&mut self, _target: &UserIdentity) {}
    fn collected(&mut self, _list: &FollowList) {}
    fn progress(&mut self, _progress: Progress<'_>) {}
}

impl Observer for () {}

/// Result of a full run; `followers` is already ranked.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub target: UserIdentity,
    pub followers: Vec<EnrichedFollower>,
    /// Why the follow list is partial, if it is.
    pub interrupted: Option<String>,
}

pub async fn run<A, O>(
    api: &A,
    handle: &Handle,
    options: PipelineOptions,
    observer: &mut O,
) -> Result<Outcome>
where
    A: SocialApi + ?Sized,
    O: Observer + ?Sized,
{
    let target = resolve(api, handle).await?;
    observer.resolved(&target);

    let list = collect_following(api, &target.id, options.max_pages).await?;
    observer.collected(&list);
    let FollowList {
        followers,
        interrupted,
        ..
    } = list;

    let mut followers =
        enrich(api, followers, options.concurrency, |p| observer.progress(p)).await?;
    rank(&mut followers);

    Ok(Outcome {
        target,
        followers,
        interrupted,
    })
}
