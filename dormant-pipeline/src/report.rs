//! Console text: header lines, the in-place progress line and the ranked report.
use crate::enrich::Progress;
use crate::model::{EnrichedFollower, FollowerStatus};
use dormant_common::{DormantError, Result, UserIdentity};
use time::OffsetDateTime;
use time::format_description::{self, OwnedFormatItem};

/// Rendering settings, built once from configuration.
#[derive(Debug, Clone)]
pub struct ReportStyle {
    timestamp: OwnedFormatItem,
    profile_base_url: String,
    /// Dash run as wide as a rendered timestamp.
    placeholder: String,
}

impl ReportStyle {
    /// `timestamp_format` uses `time` format-description syntax, e.g.
    /// `[day]/[month]/[year] [hour]:[minute]:[second]`.
    pub fn new(timestamp_format: &str, profile_base_url: &str) -> Result<Self> {
        let timestamp = format_description::parse_owned::<2>(timestamp_format).map_err(|e| {
            DormantError::Config(format!("invalid timestamp_format {timestamp_format:?}: {e}"))
        })?;
        let sample = OffsetDateTime::UNIX_EPOCH.format(&timestamp).map_err(|e| {
            DormantError::Config(format!("timestamp_format {timestamp_format:?} cannot render: {e}"))
        })?;
        Ok(Self {
            timestamp,
            profile_base_url: profile_base_url.trim_end_matches('/').to_string(),
            placeholder: "-".repeat(sample.chars().count()),
        })
    }

    pub fn timestamp(&self, ts: OffsetDateTime) -> String {
        // Validated in `new`; an OffsetDateTime has every component.
        ts.format(&self.timestamp).unwrap_or_else(|_| ts.to_string())
    }

    pub fn profile_url(&self, username: &str) -> String {
        format!("{}/{username}", self.profile_base_url)
    }

    pub fn found_line(&self, target: &UserIdentity) -> String {
        format!(
            "Found user @{} ({}) with id {}",
            target.username, target.name, target.id
        )
    }

    pub fn following_line(&self, target: &UserIdentity) -> String {
        match target.following_count {
            Some(n) => format!("Following {n} accounts"),
            None => "Following an unknown number of accounts".to_string(),
        }
    }

    /// Meant to be printed after a carriage return so it overwrites itself.
    pub fn progress_line(&self, progress: &Progress<'_>) -> String {
        let user = progress.follower.user();
        format!(
            "({}/{}) Fetching @{} ({}) with id {} {}",
            progress.index,
            progress.total,
            user.username,
            user.name,
            user.id,
            self.profile_url(&user.username)
        )
    }

    pub fn line(&self, follower: &EnrichedFollower) -> String {
        let profile = self.profile_url(&follower.user().username);
        match follower.status() {
            FollowerStatus::Active(post) => format!(
                "\t({}) {profile} last tweet: {profile}/status/{}",
                self.timestamp(post.created_at),
                post.id
            ),
            FollowerStatus::Protected => {
                format!("\t({}) {profile} is protected account", self.placeholder)
            }
            FollowerStatus::NoPosts => format!("\t({}) {profile} has no tweets", self.placeholder),
            FollowerStatus::Unavailable(reason) => format!(
                "\t({}) {profile} could not be fetched: {reason}",
                self.placeholder
            ),
        }
    }

    /// The full ranked report, one line per follower.
    pub fn render(&self, ranked: &[EnrichedFollower]) -> String {
        let mut out = String::from("Last tweet data:\n");
        for follower in ranked {
            out.push_str(&self.line(follower));
            out.push('\n');
        }
        out
    }
}
