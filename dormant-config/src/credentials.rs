//! Bearer token discovery.
//!
//! Resolution order:
//! 1. an explicit credentials file (CLI flag or `credentials_file` setting), exclusively;
//! 2. the `bearer_token` setting;
//! 3. `credentials.txt` next to the executable, in the working directory, then
//!    in `<config dir>/dormant/`.
use crate::DormantConfig;
use dormant_common::{DormantError, Result};
use std::io;
use std::path::{Path, PathBuf};

pub const CREDENTIALS_FILE: &str = "credentials.txt";

/// Resolve the bearer token for this run.
pub fn load_bearer_token(cfg: &DormantConfig, explicit: Option<&Path>) -> Result<String> {
    if let Some(path) = explicit.or(cfg.credentials_file.as_deref()) {
        return find_token_in(&[path.to_path_buf()]);
    }
    if let Some(token) = cfg.bearer_token.as_deref().map(clean_token) {
        if !token.is_empty() {
            tracing::info!("using bearer token from configuration");
            return Ok(token);
        }
    }
    find_token_in(&default_locations())
}

/// Candidate `credentials.txt` locations, most specific first.
pub fn default_locations() -> Vec<PathBuf> {
    let mut out = Vec::new();
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        out.push(dir.join(CREDENTIALS_FILE));
    }
    if let Ok(cwd) = std::env::current_dir() {
        out.push(cwd.join(CREDENTIALS_FILE));
    }
    if let Some(dir) = dirs::config_dir() {
        out.push(dir.join("dormant").join(CREDENTIALS_FILE));
    }
    out.dedup();
    out
}

/// First readable, non-empty file among `candidates`.
pub fn find_token_in(candidates: &[PathBuf]) -> Result<String> {
    for path in candidates {
        match std::fs::read_to_string(path) {
            Ok(raw) => {
                let token = clean_token(&raw);
                if token.is_empty() {
                    return Err(DormantError::Config(format!(
                        "{} is empty; paste your bearer token into it",
                        path.display()
                    )));
                }
                tracing::info!(path = %path.display(), "loaded credentials");
                return Ok(token);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no credentials here");
            }
            Err(e) => {
                return Err(DormantError::Config(format!(
                    "failed to read {}: {e}",
                    path.display()
                )));
            }
        }
    }
    Err(DormantError::MissingCredentials {
        searched: candidates.to_vec(),
    })
}

fn clean_token(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_string()
}
