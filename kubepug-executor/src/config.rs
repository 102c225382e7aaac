use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level configuration loaded from `.kubepug-executor.yaml` or an explicit path.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub scanner: ScannerConfig,

  #[serde(default)]
  pub files: FilesConfig,
}

/// How the kubepug executable is invoked.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScannerConfig {
  /// Executable name or path (default `kubepug`).
  #[serde(default = "default_binary")]
  pub binary: String,

  /// Working directory of the scanner process; inherited when unset.
  #[serde(default)]
  pub working_dir: Option<PathBuf>,

  /// Kill the scanner after this many seconds; no limit when unset.
  #[serde(default)]
  pub timeout_seconds: Option<u64>,
}

fn default_binary() -> String {
  "kubepug".to_string()
}

impl Default for ScannerConfig {
  fn default() -> Self {
    Self {
      binary: default_binary(),
      working_dir: None,
      timeout_seconds: None,
    }
  }
}

/// Where auxiliary files are copied from.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FilesConfig {
  /// Base directory for relative copy-file sources.
  #[serde(default)]
  pub uploads_dir: Option<PathBuf>,
}

const DEFAULT_CONFIG_FILE: &str = ".kubepug-executor.yaml";

/// Load configuration from an explicit path, the default `.kubepug-executor.yaml` in the
/// current working directory, or fall back to `Config::default()`.
pub fn load(path: Option<&str>) -> Result<Config> {
  load_from(path, std::env::current_dir().ok().as_deref())
}

fn load_from(path: Option<&str>, base_dir: Option<&Path>) -> Result<Config> {
  if let Some(p) = path {
    return read(Path::new(p));
  }

  if let Some(dir) = base_dir {
    let default_path = dir.join(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
      return read(&default_path);
    }
  }

  Ok(Config::default())
}

fn read(path: &Path) -> Result<Config> {
  let contents =
    std::fs::read_to_string(path).with_context(|| format!("Failed to read config file: {}", path.display()))?;
  let config: Config =
    serde_yaml::from_str(&contents).with_context(|| format!("Failed to parse config file: {}", path.display()))?;

  Ok(config)
}
