use dormant_common::{Post, UserIdentity};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// `GET /2/users/by/username/:username`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLookupResponse {
    #[serde(default)]
    pub data: Option<User>,
    #[serde(default)]
    pub errors: Option<Vec<ApiProblem>>,
}

/// `GET /2/users/:id/following`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowingResponse {
    #[serde(default)]
    pub data: Option<Vec<User>>,
    #[serde(default)]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub errors: Option<Vec<ApiProblem>>,
}

/// `GET /2/users/:id/tweets`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweetsResponse {
    #[serde(default)]
    pub data: Option<Vec<Tweet>>,
    #[serde(default)]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub errors: Option<Vec<ApiProblem>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Meta {
    #[serde(default)]
    pub result_count: Option<u64>,
    #[serde(default)]
    pub next_token: Option<String>,
}

/// Partial error entry; Twitter returns these with HTTP 200.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiProblem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl ApiProblem {
    pub fn is_not_found(&self) -> bool {
        self.title.as_deref() == Some("Not Found Error")
            || self
                .kind
                .as_deref()
                .is_some_and(|k| k.ends_with("/resource-not-found"))
    }

    pub fn message(&self) -> String {
        self.detail
            .clone()
            .or_else(|| self.title.clone())
            .unwrap_or_else(|| "unknown API error".to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub protected: Option<bool>,
    #[serde(default)]
    pub public_metrics: Option<UserMetrics>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserMetrics {
    pub followers_count: Option<u64>,
    pub following_count: Option<u64>,
    pub tweet_count: Option<u64>,
    pub listed_count: Option<u64>,
}

impl From<User> for UserIdentity {
    fn from(u: User) -> Self {
        UserIdentity {
            name: u.name.unwrap_or_else(|| u.username.clone()),
            id: u.id,
            username: u.username,
            protected: u.protected.unwrap_or(false),
            following_count: u.public_metrics.and_then(|m| m.following_count),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Tweet {
    /// Tweets without a parseable `created_at` cannot be ranked and yield `None`.
    pub fn into_post(self) -> Option<Post> {
        let created_at = match self.created_at.as_deref() {
            Some(raw) => match OffsetDateTime::parse(raw, &Rfc3339) {
                Ok(ts) => ts,
                Err(e) => {
                    tracing::warn!(tweet_id = %self.id, raw, error = %e, "unparseable created_at");
                    return None;
                }
            },
            None => {
                tracing::warn!(tweet_id = %self.id, "tweet without created_at");
                return None;
            }
        };
        Some(Post {
            id: self.id,
            author_id: self.author_id,
            created_at,
        })
    }
}
