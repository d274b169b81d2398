use anyhow::Context;
use clap::Parser;
use dormant_common::Handle;
use dormant_config::{DEFAULT_CONFIG_FILE, DormantConfig, DormantConfigLoader};
use std::path::PathBuf;

/// List the accounts a Twitter user follows, least recently active first.
#[derive(Debug, Parser)]
#[command(name = "dormant", version)]
pub struct Cli {
    /// Target user name, without the leading `@`
    #[arg(value_parser = parse_handle)]
    pub handle: Handle,

    /// YAML settings file (defaults to ./dormant.yaml when present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// File holding the bearer token
    #[arg(long, value_name = "PATH")]
    pub credentials: Option<PathBuf>,

    /// Timeline requests kept in flight
    #[arg(short = 'j', long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Mirror logs to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_handle(raw: &str) -> Result<Handle, String> {
    raw.parse().map_err(|e: dormant_common::DormantError| e.to_string())
}

impl Cli {
    /// File settings, then `DORMANT__*` overrides, then flags.
    pub fn load_config(&self) -> anyhow::Result<DormantConfig> {
        let loader = match &self.config {
            Some(path) => DormantConfigLoader::new().with_file(path),
            None => DormantConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
        };
        let mut cfg = loader.load().context("failed to load configuration")?;
        if let Some(n) = self.concurrency {
            cfg.concurrency = n;
        }
        cfg.validate().context("invalid configuration")?;
        Ok(cfg)
    }
}
