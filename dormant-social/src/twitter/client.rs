//! Twitter/X v2 client: user lookup, following list and user timelines.
//!
//! All requests use app-only bearer auth. Rate limiting (429) and 5xx are
//! retried by the shared HTTP client; everything else is mapped into
//! [`DormantError`] here.
use crate::api::{Page, SocialApi};
use crate::twitter::types::{ApiProblem, FollowingResponse, TweetsResponse, UserLookupResponse};
use async_trait::async_trait;
use dormant_common::{DormantError, Handle, Post, Result, UserIdentity};
use dormant_http::{Auth, HttpClient, HttpError, RequestOpts};
use std::borrow::Cow;
use std::time::Duration;

/// The timeline endpoint rejects `max_results` below 5.
pub const RECENT_POSTS_PAGE: u32 = 5;

const USER_FIELDS: &str = "public_metrics,protected";
const TWEET_FIELDS: &str = "created_at,author_id";

#[derive(Clone)]
pub struct TwitterApi {
    http: HttpClient,
    bearer: String,
    following_page_size: Option<u32>,
}

impl TwitterApi {
    pub fn with_base_url(base_url: &str, bearer_token: String) -> Result<Self> {
        let http = HttpClient::new(base_url).map_err(http_to_dormant)?;
        Ok(Self {
            http,
            bearer: bearer_token,
            following_page_size: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    pub fn with_retries(mut self, retries: usize) -> Self {
        self.http = self.http.with_retries(retries);
        self
    }

    /// `max_results` for the following endpoint (1..=1000).
    pub fn with_following_page_size(mut self, size: Option<u32>) -> Self {
        self.following_page_size = size;
        self
    }

    fn opts<'a>(&'a self, query: Vec<(&'a str, Cow<'a, str>)>) -> RequestOpts<'a> {
        RequestOpts {
            auth: Some(Auth::Bearer(&self.bearer)),
            query: Some(query),
            ..Default::default()
        }
    }
}

#[async_trait]
impl SocialApi for TwitterApi {
    async fn lookup_user(&self, handle: &Handle) -> Result<UserIdentity> {
        let path = format!("2/users/by/username/{handle}");
        let resp: UserLookupResponse = match self
            .http
            .get_json(&path, self.opts(vec![("user.fields", USER_FIELDS.into())]))
            .await
        {
            Ok(resp) => resp,
            Err(e) if e.status().map(|s| s.as_u16()) == Some(404) => {
                return Err(DormantError::UserNotFound(handle.to_string()));
            }
            Err(e) => return Err(http_to_dormant(e)),
        };

        match resp.data {
            Some(user) => {
                tracing::debug!(handle = %handle, id = %user.id, "resolved user");
                Ok(user.into())
            }
            None => {
                let problems = resp.errors.unwrap_or_default();
                if problems.is_empty() || problems.iter().any(ApiProblem::is_not_found) {
                    Err(DormantError::UserNotFound(handle.to_string()))
                } else {
                    Err(problems_to_error(&problems))
                }
            }
        }
    }

    async fn following_page(
        &self,
        user_id: &str,
        pagination_token: Option<&str>,
    ) -> Result<Page<UserIdentity>> {
        let path = format!("2/users/{user_id}/following");
        let mut query: Vec<(&str, Cow<'_, str>)> = vec![("user.fields", USER_FIELDS.into())];
        if let Some(size) = self.following_page_size {
            query.push(("max_results", size.to_string().into()));
        }
        if let Some(token) = pagination_token {
            query.push(("pagination_token", token.into()));
        }

        let resp: FollowingResponse = self
            .http
            .get_json(&path, self.opts(query))
            .await
            .map_err(http_to_dormant)?;

        let FollowingResponse { data, meta, errors } = resp;
        let problems = errors.unwrap_or_default();
        if data.is_none() && !problems.is_empty() {
            return Err(problems_to_error(&problems));
        }
        let items: Vec<UserIdentity> = data
            .unwrap_or_default()
            .into_iter()
            .map(UserIdentity::from)
            .collect();
        let next_token = meta
            .and_then(|m| m.next_token)
            .filter(|t| !t.is_empty());

        tracing::debug!(
            user_id,
            count = items.len(),
            has_next = next_token.is_some(),
            "following page"
        );
        Ok(Page { items, next_token })
    }

    async fn recent_posts(&self, user_id: &str) -> Result<Vec<Post>> {
        let path = format!("2/users/{user_id}/tweets");
        let query: Vec<(&str, Cow<'_, str>)> = vec![
            ("tweet.fields", TWEET_FIELDS.into()),
            ("max_results", RECENT_POSTS_PAGE.to_string().into()),
        ];

        let resp: TweetsResponse = self
            .http
            .get_json(&path, self.opts(query))
            .await
            .map_err(http_to_dormant)?;

        let TweetsResponse { data, errors, .. } = resp;
        let problems = errors.unwrap_or_default();
        if data.is_none() && !problems.is_empty() {
            return Err(problems_to_error(&problems));
        }
        Ok(data
            .unwrap_or_default()
            .into_iter()
            .filter_map(|t| t.into_post())
            .collect())
    }
}

fn problems_to_error(problems: &[ApiProblem]) -> DormantError {
    let message = problems
        .iter()
        .map(ApiProblem::message)
        .collect::<Vec<_>>()
        .join("; ");
    DormantError::Api {
        status: None,
        message,
    }
}

fn http_to_dormant(e: HttpError) -> DormantError {
    match &e {
        HttpError::Api {
            status, message, ..
        } if status.as_u16() == 401 => DormantError::Unauthorized(message.clone()),
        HttpError::Api {
            status, message, ..
        } if status.as_u16() == 403 => DormantError::Forbidden(message.clone()),
        HttpError::Api {
            status, message, ..
        } => DormantError::Api {
            status: Some(status.as_u16()),
            message: message.clone(),
        },
        HttpError::Url(_) | HttpError::Build(_) => DormantError::Config(e.to_string()),
        HttpError::Network(_) | HttpError::Decode(..) => DormantError::Api {
            status: None,
            message: e.to_string(),
        },
    }
}
