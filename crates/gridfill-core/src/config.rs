//! Sheet configuration (TOML).
//!
//! Every field has a default, so a config file only needs the keys it changes:
//!
//! ```toml
//! rows = 50
//! cols = 12
//! history_limit = 200
//!
//! [layout]
//! min_width = 60
//!
//! [autofill]
//! backend = "route"
//! endpoint = "http://localhost:3000/fill"
//! ```

use directories::ProjectDirs;
use gridfill_engine::engine::Dimensions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

const MAX_CONFIG_BYTES: u64 = 65_536;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    /// Maximum undo depth; 0 keeps every snapshot.
    pub history_limit: usize,
    pub layout: LayoutConfig,
    pub autofill: AutofillConfig,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 10,
            history_limit: 100,
            layout: LayoutConfig::default(),
            autofill: AutofillConfig::default(),
        }
    }
}

impl GridConfig {
    pub fn with_dimensions(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..Self::default()
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.rows, self.cols)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path)?;
        if meta.len() > MAX_CONFIG_BYTES {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Refusing to read {}: config too large ({} bytes, max {})",
                    path.display(),
                    meta.len(),
                    MAX_CONFIG_BYTES
                ),
            )
            .into());
        }
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}

/// Column width / row height limits, in pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub min_width: u32,
    pub min_height: u32,
    pub default_width: u32,
    pub default_height: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_width: 50,
            min_height: 36,
            default_width: 100,
            default_height: 36,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutofillBackend {
    /// POST `{ "content": [[...]] }` to a fill endpoint.
    Route,
    /// Call the Gemini generateContent API directly.
    Gemini,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutofillConfig {
    pub backend: AutofillBackend,
    /// Base URL; each backend has its own default when unset.
    pub endpoint: Option<String>,
    pub model: String,
    /// Environment variable holding the API key. Keys are never read from the file.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for AutofillConfig {
    fn default() -> Self {
        Self {
            backend: AutofillBackend::Gemini,
            endpoint: None,
            model: "gemini-1.5-flash".to_string(),
            api_key_env: "GEMINI_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

/// `<config dir>/gridfill/config.toml`, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("com", "gridfill", "gridfill")?;
    Some(proj.config_dir().join("config.toml"))
}

/// Load configuration from `explicit` or the user config path.
///
/// Never fails: problems are returned as warnings and defaults are used.
/// A missing user config is not a warning; a missing explicit one is.
pub fn load_config(explicit: Option<&Path>) -> (GridConfig, Vec<String>) {
    let mut warnings = Vec::new();
    let path = explicit.map(Path::to_path_buf).or_else(user_config_path);

    let Some(path) = path else {
        return (GridConfig::default(), warnings);
    };

    if !path.exists() {
        if explicit.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (GridConfig::default(), warnings);
    }

    match GridConfig::from_file(&path) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), "loaded config");
            (config, warnings)
        }
        Err(err) => {
            warnings.push(format!("Failed to load {}: {}", path.display(), err));
            (GridConfig::default(), warnings)
        }
    }
}
