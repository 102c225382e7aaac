use crate::execution::Variable;

/// Replacement written in place of secret values
pub const MASK: &str = "*****";

/// Environment overlay handed to the scanner process
///
/// Variables are never exported into the executor's own process environment; the
/// process executor applies them to the child only
#[derive(Clone, Debug, Default)]
pub struct EnvManager {
  variables: Vec<Variable>,
  extra_secrets: Vec<String>,
}

impl EnvManager {
  pub fn with_vars(variables: &[Variable]) -> Self {
    Self {
      variables: variables.to_vec(),
      extra_secrets: Vec::new(),
    }
  }

  /// Register values that are not variables but must still be masked (e.g. git tokens)
  pub fn with_secrets(mut self, secrets: impl IntoIterator<Item = String>) -> Self {
    self.extra_secrets.extend(secrets);
    self
  }

  /// Name/value pairs for the child process, in declaration order
  pub fn envs(&self) -> Vec<(String, String)> {
    self
      .variables
      .iter()
      .map(|v| (v.name.to_owned(), v.value.to_owned()))
      .collect()
  }

  fn secret_values(&self) -> impl Iterator<Item = &str> {
    self
      .variables
      .iter()
      .filter(|v| v.is_secret())
      .map(|v| v.value.as_str())
      .chain(self.extra_secrets.iter().map(String::as_str))
      .filter(|s| !s.is_empty())
  }

  /// Mask every secret value found in `text`
  pub fn obfuscate(&self, text: &str) -> String {
    // Longest first so a secret that contains another one is masked whole
    let mut secrets: Vec<&str> = self.secret_values().collect();
    secrets.sort_by_key(|s| std::cmp::Reverse(s.len()));

    secrets
      .into_iter()
      .fold(text.to_owned(), |acc, secret| acc.replace(secret, MASK))
  }
}
