//! Configuration for ontology builds and storage.
//!
//! Load order: `.ontograph/config.toml` → environment variables → defaults.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OntoConfig {
    pub build: BuildConfig,
    pub prefix: PrefixConfig,
    pub storage: StorageConfig,
}

/// Build pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Cores left free for the host when sizing the instance worker pool.
    pub reserved_cores: usize,
    /// Fixed worker count for the instance stage. 0 derives it from the
    /// available parallelism minus `reserved_cores`.
    pub workers: usize,
}

/// Namespace prefix resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefixConfig {
    /// Answer given to the URI selection prompt when it is one of the
    /// candidates. Only consulted when the document has no default namespace.
    pub preferred: Option<String>,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Pretty-print ontology.json.
    pub pretty: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            reserved_cores: 6,
            workers: 0,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl BuildConfig {
    /// Explicit worker count, if one is configured.
    pub fn fixed_workers(&self) -> Option<usize> {
        (self.workers > 0).then_some(self.workers)
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

impl OntoConfig {
    /// Load config from `.ontograph/config.toml` in the project root, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(".ontograph").join("config.toml");

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        env_override("ONTO_RESERVED_CORES", &mut config.build.reserved_cores);
        env_override("ONTO_WORKERS", &mut config.build.workers);
        if let Ok(preferred) = std::env::var("ONTO_PREFERRED_PREFIX") {
            config.prefix.preferred = Some(preferred);
        }

        if config
            .prefix
            .preferred
            .as_deref()
            .is_some_and(|p| p.trim().is_empty())
        {
            anyhow::bail!("prefix.preferred must not be empty when set");
        }

        Ok(config)
    }
}
