use dormant_common::{Post, UserIdentity};

/// One followed account with the outcome of its post lookup.
///
/// Built exactly once per follower; there are no mutating methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedFollower {
    user: UserIdentity,
    latest_post: Option<Post>,
    protected: bool,
    failure: Option<String>,
}

/// What the report says about a follower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowerStatus<'a> {
    Active(&'a Post),
    Protected,
    NoPosts,
    Unavailable(&'a str),
}

impl EnrichedFollower {
    /// Protected accounts never carry a post, whatever was fetched.
    pub fn new(user: UserIdentity, latest_post: Option<Post>) -> Self {
        let protected = user.protected;
        Self {
            latest_post: if protected { None } else { latest_post },
            user,
            protected,
            failure: None,
        }
    }

    /// The post lookup failed; the follower is kept without a post.
    pub fn unavailable(user: UserIdentity, reason: impl Into<String>) -> Self {
        Self {
            protected: user.protected,
            user,
            latest_post: None,
            failure: Some(reason.into()),
        }
    }

    pub fn user(&self) -> &UserIdentity {
        &self.user
    }

    pub fn latest_post(&self) -> Option<&Post> {
        self.latest_post.as_ref()
    }

    pub fn is_protected(&self) -> bool {
        self.protected
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn status(&self) -> FollowerStatus<'_> {
        match (&self.latest_post, &self.failure) {
            (Some(post), _) => FollowerStatus::Active(post),
            (None, _) if self.protected => FollowerStatus::Protected,
            (None, Some(reason)) => FollowerStatus::Unavailable(reason),
            (None, None) => FollowerStatus::NoPosts,
        }
    }
}
