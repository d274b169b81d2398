//! Settings loader: optional YAML file, `DORMANT__` environment overrides and
//! `${VAR}` expansion, plus bearer-token discovery in [`credentials`].
//!
//! Every key has a default, so an empty source set is a valid configuration.
//! Precedence, lowest first: built-in defaults, YAML sources in the order they
//! were added, environment variables.
//!
//! ```yaml
//! # dormant.yaml
//! bearer_token: "${TWITTER_BEARER_TOKEN}"
//! concurrency: 4
//! timestamp_format: "[day]/[month]/[year] [hour]:[minute]:[second]"
//! ```
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub mod credentials;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "DORMANT";

/// Default file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "dormant.yaml";
/// `dd/MM/yyyy HH:mm:ss` in `time` format-description syntax.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "[day]/[month]/[year] [hour]:[minute]:[second]";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DormantConfig {
    /// Raw bearer token; takes precedence over `credentials.txt` discovery.
    #[serde(default)]
    pub bearer_token: Option<String>,
    /// Explicit credentials file; disables discovery when set.
    #[serde(default)]
    pub credentials_file: Option<PathBuf>,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Prefix for profile and status links in the report.
    #[serde(default = "default_profile_base_url")]
    pub profile_base_url: String,
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    /// Posts requests kept in flight during enrichment. 1 is sequential.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// `max_results` for the following endpoint; API default when unset.
    #[serde(default)]
    pub following_page_size: Option<u32>,
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

impl Default for DormantConfig {
    fn default() -> Self {
        Self {
            bearer_token: None,
            credentials_file: None,
            api_base_url: default_api_base_url(),
            profile_base_url: default_profile_base_url(),
            timestamp_format: default_timestamp_format(),
            concurrency: default_concurrency(),
            following_page_size: None,
            max_pages: default_max_pages(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl DormantConfig {
    /// Range checks that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::Message("concurrency must be at least 1".into()));
        }
        if let Some(size) = self.following_page_size {
            if !(1..=1000).contains(&size) {
                return Err(ConfigError::Message(format!(
                    "following_page_size must be within 1..=1000, got {size}"
                )));
            }
        }
        if self.max_pages == 0 {
            return Err(ConfigError::Message("max_pages must be at least 1".into()));
        }
        if self.timestamp_format.trim().is_empty() {
            return Err(ConfigError::Message("timestamp_format is empty".into()));
        }
        Ok(())
    }
}

fn default_api_base_url() -> String {
    "https://api.twitter.com".into()
}
fn default_profile_base_url() -> String {
    "https://twitter.com".into()
}
fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.into()
}
fn default_concurrency() -> usize {
    1
}
fn default_max_pages() -> usize {
    1000
}
fn default_request_timeout_secs() -> u64 {
    15
}
fn default_max_retries() -> usize {
    2
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder over the `config` crate wiring.
pub struct DormantConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for DormantConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DormantConfigLoader {
    /// Start with no file sources. Environment overrides are always applied
    /// last, whatever order sources are added in.
    ///
    /// ```
    /// use dormant_config::DormantConfigLoader;
    ///
    /// let cfg = DormantConfigLoader::new()
    ///     .with_yaml_str("concurrency: 3")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(cfg.concurrency, 3);
    /// assert_eq!(cfg.api_base_url, "https://api.twitter.com");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a required YAML/TOML/JSON file; format inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is silently skipped when absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Merge all sources, expand `${VAR}` placeholders, deserialize and validate.
    ///
    /// ```
    /// use dormant_config::DormantConfigLoader;
    ///
    /// unsafe { std::env::set_var("DOC_BEARER", "from-env"); }
    ///
    /// let cfg = DormantConfigLoader::new()
    ///     .with_yaml_str("bearer_token: \"${DOC_BEARER}\"")
    ///     .load()
    ///     .unwrap();
    /// assert_eq!(cfg.bearer_token.as_deref(), Some("from-env"));
    ///
    /// unsafe { std::env::remove_var("DOC_BEARER"); }
    /// ```
    pub fn load(self) -> Result<DormantConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        if v.is_null() {
            v = Value::Object(Default::default());
        }
        expand_env_in_value(&mut v);

        let typed: DormantConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        typed.validate()?;
        tracing::debug!(
            api_base_url = %typed.api_base_url,
            concurrency = typed.concurrency,
            has_bearer_token = typed.bearer_token.is_some(),
            "config.loaded"
        );
        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_in_nested_values() {
        temp_env::with_vars([("CITY", Some("Porto")), ("TOKEN", Some("t0k"))], || {
            let mut v = json!({ "a": ["${CITY}", 3], "b": { "c": "Bearer $TOKEN" } });
            expand_env_in_value(&mut v);
            assert_eq!(v, json!({ "a": ["Porto", 3], "b": { "c": "Bearer t0k" } }));
        });
    }

    #[test]
    fn expands_recursively_and_stops_on_cycles() {
        temp_env::with_vars(
            [
                ("INNER", Some("core")),
                ("OUTER", Some("shell-${INNER}")),
                ("PING", Some("${PONG}")),
                ("PONG", Some("${PING}")),
            ],
            || {
                let mut v = json!("${OUTER}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("shell-core"));

                let mut cyc = json!("x=${PING}");
                expand_env_in_value(&mut cyc);
                assert!(cyc.as_str().unwrap().contains("${"));
            },
        );
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${DORMANT_DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${DORMANT_DOES_NOT_EXIST}"));
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let zero = DormantConfig {
            concurrency: 0,
            ..DormantConfig::default()
        };
        assert!(zero.validate().is_err());

        let huge_page = DormantConfig {
            following_page_size: Some(5000),
            ..DormantConfig::default()
        };
        assert!(huge_page.validate().is_err());

        assert!(DormantConfig::default().validate().is_ok());
    }
}
