use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::generate::DEFAULT_OUTPUT_SUFFIX;

/// Project configuration loaded from `.insomgen.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InsomgenConfig {
    /// Default source for `insomgen generate` when `--input` is omitted.
    pub input: Option<String>,
    /// Inserted between the source stem and `.yml` in derived output names.
    pub output_suffix: String,
    pub watch: WatchConfig,
}

impl Default for InsomgenConfig {
    fn default() -> Self {
        Self {
            input: None,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            watch: WatchConfig::default(),
        }
    }
}

/// Watch mode defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Directory scanned when no single file is given.
    pub dir: String,
    pub interval_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            dir: ".".to_string(),
            interval_secs: 2,
        }
    }
}

impl WatchConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".insomgen.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<InsomgenConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config = serde_yaml_ng::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# insomgen configuration
# input: openapi.yaml         # default source for `insomgen generate`
output_suffix: -insomnia      # api.yaml -> api-insomnia.yml

watch:
  dir: .                      # scanned when no --file is given
  interval_secs: 2
"#
}
