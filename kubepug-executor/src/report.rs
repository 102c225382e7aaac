use std::fmt;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// Upper bound on how much of the scanner output is echoed back in a parse error
pub const MAX_EXCERPT: usize = 512;

/// Output of a single kubepug execution
///
/// Both lists are optional on the wire; `null`, a missing key and `[]` all mean
/// "no findings in this category"
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanReport {
  #[serde(rename = "DeprecatedAPIs", default, deserialize_with = "nullable")]
  pub deprecated_apis: Vec<DeprecatedApi>,
  #[serde(rename = "DeletedAPIs", default, deserialize_with = "nullable")]
  pub deleted_apis: Vec<DeletedApi>,
}

impl ScanReport {
  /// Returns true if the scanner reported neither deprecated nor deleted APIs
  pub fn is_clean(&self) -> bool {
    self.deprecated_apis.is_empty() && self.deleted_apis.is_empty()
  }
}

/// Whether the affected object is cluster scoped or lives in a namespace
///
/// Values outside of `GLOBAL` and `OBJECT` (including a missing scope) are carried
/// through verbatim
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Scope {
  Global,
  Object,
  Other(String),
}

impl Default for Scope {
  fn default() -> Self {
    Scope::Other(String::new())
  }
}

impl From<String> for Scope {
  fn from(value: String) -> Self {
    match value.as_str() {
      "GLOBAL" => Scope::Global,
      "OBJECT" => Scope::Object,
      _ => Scope::Other(value),
    }
  }
}

impl From<Scope> for String {
  fn from(scope: Scope) -> Self {
    scope.to_string()
  }
}

impl fmt::Display for Scope {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Scope::Global => write!(f, "GLOBAL"),
      Scope::Object => write!(f, "OBJECT"),
      Scope::Other(value) => write!(f, "{value}"),
    }
  }
}

/// A concrete object in the scanned manifests that uses a flagged API
///
/// `namespace` is empty for `GLOBAL` objects; this is the scanner's contract and is
/// carried through as-is
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AffectedObject {
  #[serde(default, deserialize_with = "nullable")]
  pub scope: Scope,
  #[serde(default, deserialize_with = "nullable")]
  pub object_name: String,
  #[serde(default, deserialize_with = "nullable")]
  pub namespace: String,
}

impl fmt::Display for AffectedObject {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    if !matches!(&self.scope, Scope::Other(value) if value.is_empty()) {
      write!(f, "{} ", self.scope)?;
    }
    if self.namespace.is_empty() {
      write!(f, "{}", self.object_name)
    } else {
      write!(f, "{}/{}", self.namespace, self.object_name)
    }
  }
}

/// An API that is deprecated but still served by the API server
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeprecatedApi {
  #[serde(default, deserialize_with = "nullable")]
  pub description: String,
  #[serde(default, deserialize_with = "nullable")]
  pub group: String,
  #[serde(default, deserialize_with = "nullable")]
  pub kind: String,
  #[serde(default, deserialize_with = "nullable")]
  pub version: String,
  #[serde(default, deserialize_with = "nullable")]
  pub name: String,
  #[serde(default, deserialize_with = "nullable")]
  pub deprecated: bool,
  #[serde(default, deserialize_with = "nullable")]
  pub items: Vec<AffectedObject>,
}

/// An API that has been removed from the API server
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeletedApi {
  #[serde(default, deserialize_with = "nullable")]
  pub description: String,
  #[serde(default, deserialize_with = "nullable")]
  pub group: String,
  #[serde(default, deserialize_with = "nullable")]
  pub kind: String,
  #[serde(default, deserialize_with = "nullable")]
  pub version: String,
  #[serde(default, deserialize_with = "nullable")]
  pub name: String,
  #[serde(default, deserialize_with = "nullable")]
  pub deleted: bool,
  #[serde(default, deserialize_with = "nullable")]
  pub items: Vec<AffectedObject>,
}

/// Common view over deprecated and deleted API findings
pub trait Finding: fmt::Display {
  /// Prefix used when the finding is reported as an assertion failure
  const LABEL: &'static str;

  fn name(&self) -> &str;
}

impl Finding for DeprecatedApi {
  const LABEL: &'static str = "Deprecated API";

  fn name(&self) -> &str {
    &self.name
  }
}

impl Finding for DeletedApi {
  const LABEL: &'static str = "Deleted API";

  fn name(&self) -> &str {
    &self.name
  }
}

impl fmt::Display for DeprecatedApi {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write_finding(f, &self.kind, &self.group, &self.version, &self.name, &self.description, &self.items)
  }
}

impl fmt::Display for DeletedApi {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write_finding(f, &self.kind, &self.group, &self.version, &self.name, &self.description, &self.items)
  }
}

fn write_finding(
  f: &mut fmt::Formatter,
  kind: &str,
  group: &str,
  version: &str,
  name: &str,
  description: &str,
  items: &[AffectedObject],
) -> fmt::Result {
  // Core group APIs have no group, only a version (e.g. `v1`)
  let group_version = if group.is_empty() {
    version.to_owned()
  } else {
    format!("{group}/{version}")
  };

  write!(f, " {kind} {group_version} (name: {name})")?;
  if !description.is_empty() {
    write!(f, "\n Description: {description}")?;
  }
  if !items.is_empty() {
    write!(f, "\n Items:")?;
    for item in items {
      write!(f, "\n  - {item}")?;
    }
  }

  Ok(())
}

/// Treats an explicit `null` the same as an absent key
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de> + Default,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse the JSON output of a kubepug execution into a `ScanReport`
pub fn parse(raw: &str) -> Result<ScanReport> {
  serde_json::from_str(raw.trim()).with_context(|| format!("could not unmarshal result {}", excerpt(raw)))
}

/// Shortens `raw` to at most `MAX_EXCERPT` characters for use in error messages
pub(crate) fn excerpt(raw: &str) -> String {
  match raw.char_indices().nth(MAX_EXCERPT) {
    Some((idx, _)) => format!("{}...", &raw[..idx]),
    None => raw.to_owned(),
  }
}
