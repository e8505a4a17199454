use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Folders under the home directory that get indexed, in walk order.
pub const ROOT_FOLDER_NAMES: [&str; 3] = ["Desktop", "Documents", "Downloads"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Global hotkey in `global-hotkey` string syntax.
    pub hotkey: String,
    pub result_limit: usize,
    pub batch_size: usize,
    /// Wait before a freshly spawned session checks the index, giving the
    /// surface time to finish its own startup.
    pub index_grace_ms: u64,
    pub window_adjust_delay_ms: u64,
    pub warm_index_on_start: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hotkey: "control+KeyF".to_string(),
            result_limit: 60,
            batch_size: 50,
            index_grace_ms: 400,
            window_adjust_delay_ms: 1000,
            warm_index_on_start: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Settings {
    /// `<config dir>/Hop/settings.json`, or `None` when the platform has no
    /// config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("Hop").join("settings.json"))
    }

    /// Loads settings from `path`. A missing file yields the defaults; fields
    /// absent from the file keep their default values.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn index_grace(&self) -> Duration {
        Duration::from_millis(self.index_grace_ms)
    }

    pub fn window_adjust_delay(&self) -> Duration {
        Duration::from_millis(self.window_adjust_delay_ms)
    }
}

/// Resolves the index roots from the current home directory. An unresolvable
/// home directory gives an empty list, which builds an empty index.
pub fn default_roots() -> Vec<PathBuf> {
    dirs::home_dir()
        .map(|home| roots_under(&home))
        .unwrap_or_default()
}

pub fn roots_under(home: &Path) -> Vec<PathBuf> {
    ROOT_FOLDER_NAMES
        .iter()
        .map(|name| home.join(name))
        .collect()
}
