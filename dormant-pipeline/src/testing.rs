//! In-memory [`SocialApi`] for unit tests.
use async_trait::async_trait;
use dormant_common::{DormantError, Handle, Post, Result, UserIdentity};
use dormant_social::{Page, SocialApi};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use time::OffsetDateTime;

#[derive(Clone)]
pub enum Failure {
    Api(&'static str),
    Unauthorized,
}

impl Failure {
    fn to_error(&self) -> DormantError {
        match self {
            Failure::Api(msg) => DormantError::Api {
                status: Some(503),
                message: msg.to_string(),
            },
            Failure::Unauthorized => DormantError::Unauthorized("token revoked".into()),
        }
    }
}

#[derive(Default)]
pub struct FakeApi {
    users: HashMap<String, UserIdentity>,
    pages: HashMap<Option<String>, std::result::Result<Page<UserIdentity>, Failure>>,
    posts: HashMap<String, std::result::Result<Vec<Post>, Failure>>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

pub fn user(id: &str, username: &str, protected: bool) -> UserIdentity {
    UserIdentity {
        id: id.into(),
        name: username.to_uppercase(),
        username: username.into(),
        protected,
        following_count: None,
    }
}

pub fn post(id: &str, author: &str, unix: i64) -> Post {
    Post {
        id: id.into(),
        author_id: Some(author.into()),
        created_at: OffsetDateTime::from_unix_timestamp(unix).unwrap(),
    }
}

impl FakeApi {
    pub fn with_user(mut self, u: UserIdentity) -> Self {
        self.users.insert(u.username.clone(), u);
        self
    }

    pub fn with_page(
        mut self,
        token: Option<&str>,
        items: Vec<UserIdentity>,
        next: Option<&str>,
    ) -> Self {
        self.pages.insert(
            token.map(str::to_string),
            Ok(Page {
                items,
                next_token: next.map(str::to_string),
            }),
        );
        self
    }

    pub fn with_page_failure(mut self, token: Option<&str>, failure: Failure) -> Self {
        self.pages.insert(token.map(str::to_string), Err(failure));
        self
    }

    pub fn with_posts(mut self, user_id: &str, posts: Vec<Post>) -> Self {
        self.posts.insert(user_id.into(), Ok(posts));
        self
    }

    pub fn with_posts_failure(mut self, user_id: &str, failure: Failure) -> Self {
        self.posts.insert(user_id.into(), Err(failure));
        self
    }

    pub fn with_delay(mut self, user_id: &str, delay: Duration) -> Self {
        self.delays.insert(user_id.into(), delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SocialApi for FakeApi {
    async fn lookup_user(&self, handle: &Handle) -> Result<UserIdentity> {
        self.record(format!("lookup:{handle}"));
        self.users
            .get(handle.as_str())
            .cloned()
            .ok_or_else(|| DormantError::UserNotFound(handle.to_string()))
    }

    async fn following_page(
        &self,
        user_id: &str,
        pagination_token: Option<&str>,
    ) -> Result<Page<UserIdentity>> {
        self.record(format!(
            "following:{user_id}:{}",
            pagination_token.unwrap_or("-")
        ));
        match self.pages.get(&pagination_token.map(str::to_string)) {
            Some(Ok(page)) => Ok(page.clone()),
            Some(Err(f)) => Err(f.to_error()),
            None => Ok(Page {
                items: Vec::new(),
                next_token: None,
            }),
        }
    }

    async fn recent_posts(&self, user_id: &str) -> Result<Vec<Post>> {
        self.record(format!("posts:{user_id}"));
        if let Some(delay) = self.delays.get(user_id) {
            tokio::time::sleep(*delay).await;
        }
        match self.posts.get(user_id) {
            Some(Ok(posts)) => Ok(posts.clone()),
            Some(Err(f)) => Err(f.to_error()),
            None => Ok(Vec::new()),
        }
    }
}
