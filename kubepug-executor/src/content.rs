use std::{
  fs,
  path::{Component, Path, PathBuf},
  process::Stdio,
};

use anyhow::{Context, Result, bail};
use tokio::process::Command;
use tracing::{debug, info};

use crate::{
  env::EnvManager,
  execution::{Content, Repository},
};

/// File name used for manifests passed inline
const STRING_CONTENT_FILE: &str = "test-content";
/// File name used for manifests downloaded from a URI that has no usable file name
const URI_CONTENT_FILE: &str = "test-file";
/// Directory repositories are cloned into
const REPOSITORY_DIR: &str = "repo";

/// Materialize the content of an execution below `dir` and return the path kubepug
/// should be pointed at
pub async fn fetch(client: &reqwest::Client, content: &Content, dir: &Path) -> Result<PathBuf> {
  match content {
    Content::String { data } => fetch_string(data, dir),
    Content::FileUri { uri } => fetch_uri(client, uri, dir).await,
    Content::GitFile { repository } => {
      let path = fetch_repository(repository, dir).await?;
      if !path.is_file() {
        bail!("Path {} is not a file in repository {}", repository.path, repository.uri);
      }
      Ok(path)
    }
    Content::GitDir { repository } => {
      let path = fetch_repository(repository, dir).await?;
      if !path.is_dir() {
        bail!("Path {} is not a directory in repository {}", repository.path, repository.uri);
      }
      Ok(path)
    }
  }
}

fn fetch_string(data: &str, dir: &Path) -> Result<PathBuf> {
  let path = dir.join(STRING_CONTENT_FILE);
  fs::write(&path, data).with_context(|| format!("Failed to write content to {}", path.display()))?;

  Ok(path)
}

async fn fetch_uri(client: &reqwest::Client, uri: &str, dir: &Path) -> Result<PathBuf> {
  info!("downloading {uri}");
  let body = client
    .get(uri)
    .send()
    .await
    .with_context(|| format!("Failed to download {uri}"))?
    .error_for_status()
    .with_context(|| format!("Failed to download {uri}"))?
    .text()
    .await
    .with_context(|| format!("Failed to read response body from {uri}"))?;

  let path = dir.join(uri_file_name(uri));
  fs::write(&path, body).with_context(|| format!("Failed to write content to {}", path.display()))?;

  Ok(path)
}

/// Last path segment of a URI, without query or fragment
fn uri_file_name(uri: &str) -> String {
  let without_query = uri.split(['?', '#']).next().unwrap_or_default();
  let without_scheme = without_query.split_once("://").map_or(without_query, |(_, rest)| rest);

  match without_scheme.split_once('/') {
    Some((_host, path)) => match path.rsplit('/').next() {
      Some(name) if !name.is_empty() && name != ".." && name != "." => name.to_owned(),
      _ => URI_CONTENT_FILE.to_owned(),
    },
    None => URI_CONTENT_FILE.to_owned(),
  }
}

/// Clone the repository and return the location of `repository.path` inside of it
async fn fetch_repository(repository: &Repository, dir: &Path) -> Result<PathBuf> {
  let relative = Path::new(&repository.path);
  if relative
    .components()
    .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
  {
    bail!("Repository path must be relative to the repository root: {}", repository.path);
  }

  let checkout = dir.join(REPOSITORY_DIR);
  let checkout_arg = checkout.display().to_string();
  let uri = repository.authenticated_uri();

  info!("cloning {}", repository.uri);
  let mut args = vec!["clone"];
  if repository.commit.is_none() {
    args.extend(["--depth", "1"]);
  }
  if let Some(branch) = &repository.branch {
    args.extend(["--branch", branch.as_str()]);
  }
  args.extend([uri.as_str(), checkout_arg.as_str()]);
  git(&args, None, repository).await?;

  if let Some(commit) = &repository.commit {
    debug!("checking out {commit}");
    git(&["checkout", commit.as_str()], Some(&checkout), repository).await?;
  }

  Ok(checkout.join(relative))
}

/// Run git, reporting failures against the plain repository URI with the token masked in
/// anything git wrote to stderr
async fn git(args: &[&str], cwd: Option<&Path>, repository: &Repository) -> Result<()> {
  let mut cmd = Command::new("git");
  cmd
    .args(args)
    .stdin(Stdio::null())
    .stdout(Stdio::null())
    .stderr(Stdio::piped());
  if let Some(cwd) = cwd {
    cmd.current_dir(cwd);
  }

  let output = cmd
    .output()
    .await
    .with_context(|| format!("Failed to run git {} for {}", args[0], repository.uri))?;
  if !output.status.success() {
    let secrets = EnvManager::default().with_secrets(repository.secrets());
    bail!(
      "{}",
      secrets.obfuscate(&format!(
        "Process (git {}) for {} exited with error: {:?}\n{}",
        args[0],
        repository.uri,
        output.status,
        String::from_utf8_lossy(&output.stderr).trim()
      ))
    );
  }

  Ok(())
}
