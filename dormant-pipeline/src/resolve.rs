use dormant_common::{Handle, Result, UserIdentity};
use dormant_social::SocialApi;

/// Look up the target account. Unknown handles surface as `UserNotFound`.
pub async fn resolve<A>(api: &A, handle: &Handle) -> Result<UserIdentity>
where
    A: SocialApi + ?Sized,
{
    let user = api.lookup_user(handle).await?;
    tracing::info!(
        handle = %handle,
        id = %user.id,
        following = ?user.following_count,
        "target resolved"
    );
    Ok(user)
}
