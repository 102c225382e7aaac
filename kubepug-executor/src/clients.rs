use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::{config::ScannerConfig, content, env::EnvManager, execution::Content, process};

/// Trait abstracting how the manifests of an execution are made available locally
pub trait ContentFetcher {
  fn fetch(&self, content: &Content) -> impl std::future::Future<Output = Result<PathBuf>> + Send;
}

/// Trait abstracting how the scanner executable is run
pub trait ProcessExecutor {
  fn run(
    &self,
    binary: &str,
    args: &[String],
    env: &EnvManager,
  ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Fetcher that materializes content below a temporary directory
///
/// The directory lives as long as the fetcher does
pub struct RealContentFetcher {
  client: reqwest::Client,
  workdir: TempDir,
}

impl RealContentFetcher {
  pub fn new() -> Result<Self> {
    let workdir = tempfile::Builder::new()
      .prefix("kubepug-executor")
      .tempdir()
      .context("Failed to create content directory")?;

    Ok(Self {
      client: reqwest::Client::new(),
      workdir,
    })
  }
}

impl ContentFetcher for RealContentFetcher {
  async fn fetch(&self, content: &Content) -> Result<PathBuf> {
    content::fetch(&self.client, content, self.workdir.path()).await
  }
}

/// Executor that spawns the scanner as a child process
pub struct RealProcessExecutor {
  working_dir: Option<PathBuf>,
  timeout: Option<Duration>,
}

impl RealProcessExecutor {
  pub fn new(config: &ScannerConfig) -> Self {
    Self {
      working_dir: config.working_dir.to_owned(),
      timeout: config.timeout_seconds.map(Duration::from_secs),
    }
  }
}

impl ProcessExecutor for RealProcessExecutor {
  async fn run(&self, binary: &str, args: &[String], env: &EnvManager) -> Result<String> {
    process::run(binary, args, env, self.working_dir.as_deref(), self.timeout).await
  }
}
