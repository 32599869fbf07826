/// Config file for the rankmerge CLI.
///
/// Lives at ~/.config/rankmerge/config.toml unless `--config` points
/// elsewhere. Every field is optional and flags take precedence.
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};

use crate::bail;

#[derive(Deserialize, Default, Debug)]
pub struct RankmergeConfig {
    pub pending: Option<String>,
    pub ranked: Option<String>,
    pub criterion: Option<String>,
    pub unrecognized: Option<String>,
    #[serde(default)]
    pub rotate: RotateSection,
}

/// `[rotate]` table: settings for `rankmerge rotate-token`.
#[derive(Deserialize, Default, Debug)]
pub struct RotateSection {
    pub worker_name: Option<String>,
    pub worker_template: Option<String>,
    pub public_host: Option<String>,
    pub bucket_name: Option<String>,
    pub valid_secs: Option<u64>,
    pub retries: Option<usize>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# rankmerge configuration
# All values here can be overridden by CLI flags.

# File of new items to merge, one per line (cleared after a successful merge)
# pending = \"input.txt\"

# File holding the ranked list, one item per line
# ranked = \"output.txt\"

# Question shown above every comparison
# criterion = \"Choose the MORE DIFFICULT file\"

# What to do with an answer that is not one of < , l left / > . r right:
# \"right\" (default), \"left\", or \"reprompt\"
# unrecognized = \"right\"

[rotate]
# Credentials come from the environment only:
# B2_APP_KEY_ID, B2_APP_KEY, BUCKET_SOURCE_ID, CF_ACCOUNT_ID, CF_WORKER_API

# Worker script to overwrite
# worker_name = \"reroute-backblaze\"

# Values substituted into the built-in worker template
# public_host = \"cdn.example.com\"
# bucket_name = \"my-bucket\"

# Path to a custom worker template. Must contain $download_token.
# worker_template = \"/path/to/worker.js\"

# Token lifetime in seconds (at most one week)
# valid_secs = 604800

# Max retries per HTTP call
# retries = 3
";

/// `$HOME/.config/rankmerge/config.toml`. Exits if HOME is unset.
pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME")
        .unwrap_or_else(|_| bail("HOME is not set; pass --config PATH instead"));
    PathBuf::from(home).join(".config").join("rankmerge").join("config.toml")
}

pub fn parse_config(content: &str) -> Result<RankmergeConfig, toml::de::Error> {
    toml::from_str(content)
}

/// A missing file yields the all-`None` config; unreadable or malformed
/// files are fatal.
pub fn load_config(path: &Path) -> RankmergeConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content)
            .unwrap_or_else(|e| bail(format!("Invalid config {}: {e}", path.display()))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => RankmergeConfig::default(),
        Err(e) => bail(format!("Cannot read config {}: {e}", path.display())),
    }
}

/// Write the commented template to `path`, creating parent directories.
/// An existing file is never overwritten.
pub fn create_default_config(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    io::Write::write_all(&mut file, DEFAULT_CONFIG_TEMPLATE.as_bytes())
}
