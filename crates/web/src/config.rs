//! Web server configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Server configuration, loaded from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuitePagerConfig {
    /// HTTP listen address
    pub listen: SocketAddr,

    /// Base URL of the results reporter
    pub reporter_url: String,

    /// JSON catalog with `library`, `beforeAll` and `afterAll`
    pub catalog_path: PathBuf,

    /// Directory served for asset paths referenced by suites
    pub assets_dir: Option<PathBuf>,

    /// `env` applied when a request carries none; empty disables the default
    pub default_env: String,

    /// Template renderers by name
    pub renderers: BTreeMap<String, RendererConfig>,
}

impl Default for SuitePagerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 8090)),
            reporter_url: "http://127.0.0.1:8091/report".to_string(),
            catalog_path: PathBuf::from("tests/catalog.json"),
            assets_dir: None,
            default_env: "prod".to_string(),
            renderers: BTreeMap::new(),
        }
    }
}

/// A renderer declared in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Markup with `{{param}}` placeholders
    pub template: String,
}

impl SuitePagerConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Load from `SUITEPAGER_CONFIG` (default `suitepager.toml`) and apply
    /// environment overrides.
    pub fn from_env() -> anyhow::Result<Self> {
        let path = std::env::var("SUITEPAGER_CONFIG")
            .unwrap_or_else(|_| "suitepager.toml".to_string());
        let mut config = Self::load(Path::new(&path))?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `SUITEPAGER_*` overrides from a variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(addr) = get("SUITEPAGER_ADDR") {
            self.listen = addr.parse()?;
        }
        if let Some(url) = get("SUITEPAGER_REPORTER_URL") {
            self.reporter_url = url;
        }
        if let Some(path) = get("SUITEPAGER_CATALOG") {
            self.catalog_path = PathBuf::from(path);
        }
        if let Some(dir) = get("SUITEPAGER_ASSETS_DIR") {
            self.assets_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }

    pub fn default_env(&self) -> Option<String> {
        let env = self.default_env.trim();
        if env.is_empty() {
            None
        } else {
            Some(env.to_string())
        }
    }
}
