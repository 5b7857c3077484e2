use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ami::DEFAULT_REGION;

/// Environment variable that takes precedence over `client_secret` in the file.
pub const CLIENT_SECRET_ENV: &str = "TUBULAR_CLIENT_SECRET";

/// Base AMI lookup defaults (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmiConfig {
    /// Region used when the command line does not name one.
    pub default_region: String,
}

impl Default for AmiConfig {
    fn default() -> Self {
        Self {
            default_region: DEFAULT_REGION.to_string(),
        }
    }
}

/// Global configuration loaded from `~/.config/tubular/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct TubularConfig {
    /// LMS root; also hosts the OAuth token endpoint.
    pub lms_base_url: String,
    /// Ecommerce API root, if the ecommerce service takes part in retirement.
    #[serde(default)]
    pub ecommerce_base_url: Option<String>,
    /// Credentials API root, if the credentials service takes part in retirement.
    #[serde(default)]
    pub credentials_base_url: Option<String>,
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret. Prefer `TUBULAR_CLIENT_SECRET` over storing it here.
    #[serde(default)]
    pub client_secret: String,
    /// Optional AMI lookup section; built-in defaults are used when missing.
    #[serde(default)]
    pub ami: Option<AmiConfig>,
}

impl std::fmt::Debug for TubularConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TubularConfig")
            .field("lms_base_url", &self.lms_base_url)
            .field("ecommerce_base_url", &self.ecommerce_base_url)
            .field("credentials_base_url", &self.credentials_base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("ami", &self.ami)
            .finish()
    }
}

impl Default for TubularConfig {
    fn default() -> Self {
        Self {
            lms_base_url: "http://localhost:18000".to_string(),
            ecommerce_base_url: None,
            credentials_base_url: None,
            client_id: String::new(),
            client_secret: String::new(),
            ami: None,
        }
    }
}

impl TubularConfig {
    /// Client secret from the environment if set, else from the file.
    pub fn resolved_client_secret(&self) -> String {
        self.client_secret_with(std::env::var(CLIENT_SECRET_ENV).ok())
    }

    fn client_secret_with(&self, from_env: Option<String>) -> String {
        from_env
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.client_secret.clone())
    }

    pub fn default_region(&self) -> &str {
        self.ami
            .as_ref()
            .map(|a| a.default_region.as_str())
            .unwrap_or(DEFAULT_REGION)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tubular")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Path of the config file if one already exists. Never creates anything.
pub fn find_existing() -> Result<Option<PathBuf>> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tubular")?;
    Ok(xdg_dirs.find_config_file("config.toml"))
}

/// Load `explicit` if given, else the default file if it exists. Returns
/// `None` when there is nothing to read; never writes a default file.
pub fn load_existing(explicit: Option<&Path>) -> Result<Option<TubularConfig>> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match find_existing()? {
            Some(path) => path,
            None => return Ok(None),
        },
    };
    load_from(&path).map(Some)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TubularConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = TubularConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<TubularConfig> {
    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: TubularConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
