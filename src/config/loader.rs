//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{KindlingError, KindlingResult};

use super::types::Config;

/// Project configuration file name
pub const CONFIG_FILENAME: &str = "kindling.toml";

/// Release image override read once at the entry point
pub const RELEASE_IMAGE_OVERRIDE_VAR: &str = "KINDLING_RELEASE_IMAGE_OVERRIDE";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> KindlingResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| KindlingError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load from project config, user config, or defaults
///
/// A config file that exists but cannot be parsed is an error.
pub fn load_or_default(project_root: Option<&Path>) -> KindlingResult<(Config, Vec<ConfigWarning>)> {
    let candidates = project_root
        .map(|root| root.join(CONFIG_FILENAME))
        .into_iter()
        .chain(dirs::config_dir().map(|dir| dir.join("kindling").join("config.toml")));

    for path in candidates {
        if path.is_file() {
            return load_with_warnings(&path);
        }
    }
    Ok((Config::default(), Vec::new()))
}

/// Apply environment variable overrides (KINDLING_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    with_env_overrides_from(config, |name| std::env::var(name).ok())
}

/// Apply overrides from an arbitrary variable source
pub fn with_env_overrides_from(
    mut config: Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Config {
    // KINDLING_RELEASE_IMAGE_OVERRIDE
    if let Some(image) = lookup(RELEASE_IMAGE_OVERRIDE_VAR) {
        if !image.trim().is_empty() {
            config.release.image = Some(image.trim().to_string());
        }
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "cluster",
        "name",
        "base_domain",
        "cluster_id",
        "email",
        "ssh_key",
        "pull_secret",
        "service_cidr",
        "network_type",
        "pools",
        "replicas",
        "platform",
        "release",
        "image",
        "output",
        "directory",
        "include_subtree",
        "parallel",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
