use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Global configuration loaded from `~/.config/xmdl/config.toml`.
///
/// CLI flags override these values; these values override built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XmdlConfig {
    /// Number of tracks downloaded concurrently within one group.
    pub group_size: usize,
    /// Per-track download deadline in seconds. 0 disables the deadline.
    pub task_timeout_secs: u64,
    /// Default directory for downloaded albums (current dir when unset).
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Catalog base URL override (e.g. a mirror). Default is the live site.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for XmdlConfig {
    fn default() -> Self {
        Self {
            group_size: 5,
            task_timeout_secs: 10,
            output_dir: None,
            base_url: None,
        }
    }
}

impl XmdlConfig {
    /// Per-track deadline as a `Duration`; `None` when disabled via 0.
    pub fn task_timeout(&self) -> Option<Duration> {
        (self.task_timeout_secs != 0).then(|| Duration::from_secs(self.task_timeout_secs))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("xmdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<XmdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = XmdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: XmdlConfig = toml::from_str(&data)?;
    Ok(cfg)
}
