use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Everything the platform hands over to run a single scan
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
  pub content: Content,
  /// Extra arguments passed through to kubepug
  #[serde(default)]
  pub args: Vec<String>,
  #[serde(default)]
  pub variables: Vec<Variable>,
  /// Auxiliary files placed on disk before kubepug runs
  #[serde(default)]
  pub copy_files: Vec<CopyFile>,
}

/// Where the manifests to scan come from
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Content {
  /// Manifests passed inline
  String { data: String },
  /// A single manifest file downloaded over HTTP(S)
  FileUri { uri: String },
  /// A single manifest file inside a git repository
  GitFile { repository: Repository },
  /// A directory of manifests inside a git repository
  GitDir { repository: Repository },
}

impl Default for Content {
  fn default() -> Self {
    Content::String { data: String::new() }
  }
}

impl Content {
  pub fn is_file(&self) -> bool {
    matches!(self, Content::FileUri { .. } | Content::GitFile { .. })
  }

  pub fn is_dir(&self) -> bool {
    matches!(self, Content::GitDir { .. })
  }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
  pub uri: String,
  #[serde(default)]
  pub branch: Option<String>,
  #[serde(default)]
  pub commit: Option<String>,
  /// Path of the file or directory relative to the repository root
  #[serde(default)]
  pub path: String,
  #[serde(default)]
  pub username: Option<String>,
  #[serde(default)]
  pub token: Option<String>,
}

impl Repository {
  /// Clone URI with the credentials embedded, when both username and token are set
  ///
  /// Credentials are percent-encoded into the userinfo; URIs that cannot carry
  /// credentials (local paths, `file://`) are returned unchanged
  pub fn authenticated_uri(&self) -> String {
    let (Some(username), Some(token)) = (&self.username, &self.token) else {
      return self.uri.to_owned();
    };
    let Ok(mut url) = reqwest::Url::parse(&self.uri) else {
      return self.uri.to_owned();
    };
    if url.set_username(username).is_err() || url.set_password(Some(token)).is_err() {
      return self.uri.to_owned();
    }

    url.into()
  }

  /// Values that must never show up in logs or captured output
  pub fn secrets(&self) -> Vec<String> {
    self.token.iter().cloned().collect()
  }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
  #[default]
  Basic,
  Secret,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
  pub name: String,
  #[serde(default)]
  pub value: String,
  #[serde(default, rename = "type")]
  pub kind: VariableType,
}

impl Variable {
  pub fn is_secret(&self) -> bool {
    self.kind == VariableType::Secret
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyFile {
  pub source: PathBuf,
  pub destination: PathBuf,
}

/// Load an execution request from a JSON or YAML file
///
/// YAML is a superset of JSON so a single parser covers both
pub fn load(path: &Path) -> Result<Execution> {
  let contents = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read execution file: {}", path.display()))?;
  let execution: Execution = serde_yaml::from_str(&contents)
    .with_context(|| format!("Failed to parse execution file: {}", path.display()))?;

  Ok(execution)
}
