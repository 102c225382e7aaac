use std::{
  path::PathBuf,
  sync::{Arc, Mutex},
};

use anyhow::{Result, bail};

use kubepug_executor::clients::{ContentFetcher, ProcessExecutor};
use kubepug_executor::env::EnvManager;
use kubepug_executor::execution::Content;

/// Mock fetcher that hands back a fixed path for any content
#[derive(Clone)]
pub struct MockFetcher {
  pub path: PathBuf,
}

impl Default for MockFetcher {
  fn default() -> Self {
    Self {
      path: PathBuf::from("/tmp/kubepug-executor/test-content"),
    }
  }
}

impl ContentFetcher for MockFetcher {
  async fn fetch(&self, _content: &Content) -> Result<PathBuf> {
    Ok(self.path.clone())
  }
}

/// Mock fetcher that always fails
pub struct MockFetcherError;

impl ContentFetcher for MockFetcherError {
  async fn fetch(&self, _content: &Content) -> Result<PathBuf> {
    bail!("mock fetch error")
  }
}

/// A single recorded scanner invocation
#[derive(Clone, Debug)]
pub struct Call {
  pub binary: String,
  pub args: Vec<String>,
  pub envs: Vec<(String, String)>,
}

/// Mock executor returning canned scanner output and recording every call
#[derive(Clone, Default)]
pub struct MockExecutor {
  pub output: String,
  pub error: Option<String>,
  pub calls: Arc<Mutex<Vec<Call>>>,
}

impl MockExecutor {
  pub fn returning(output: &str) -> Self {
    Self {
      output: output.to_string(),
      ..Default::default()
    }
  }

  pub fn failing(message: &str) -> Self {
    Self {
      error: Some(message.to_string()),
      ..Default::default()
    }
  }

  pub fn calls(&self) -> Vec<Call> {
    self.calls.lock().unwrap().clone()
  }
}

impl ProcessExecutor for MockExecutor {
  async fn run(&self, binary: &str, args: &[String], env: &EnvManager) -> Result<String> {
    self.calls.lock().unwrap().push(Call {
      binary: binary.to_string(),
      args: args.to_vec(),
      envs: env.envs(),
    });

    match &self.error {
      Some(message) => bail!("{message}"),
      None => Ok(self.output.clone()),
    }
  }
}
