use std::{path::Path, process::Stdio, time::Duration};

use anyhow::{Context, Result, bail};
use tokio::process::Command;
use tracing::debug;

use crate::env::EnvManager;

/// Run `binary` to completion and return its standard output
///
/// The environment overlay is applied to the child only. A non-zero exit status is an
/// error carrying the child's standard error. When `timeout` elapses the child is killed.
pub async fn run(
  binary: &str,
  args: &[String],
  env: &EnvManager,
  working_dir: Option<&Path>,
  timeout: Option<Duration>,
) -> Result<String> {
  let mut cmd = Command::new(binary);
  cmd
    .args(args)
    .envs(env.envs())
    .stdin(Stdio::null())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .kill_on_drop(true);
  if let Some(dir) = working_dir {
    cmd.current_dir(dir);
  }

  debug!("spawning {binary}");
  let child = cmd.spawn().with_context(|| format!("Failed to run {binary}"))?;
  let output = match timeout {
    Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
      .await
      .with_context(|| format!("Process ({binary}) timed out after {limit:?}"))??,
    None => child.wait_with_output().await?,
  };

  if !output.status.success() {
    bail!(
      "Process ({binary}) exited with error: {:?}\n{}",
      output.status,
      String::from_utf8_lossy(&output.stderr).trim()
    );
  }

  String::from_utf8(output.stdout).with_context(|| format!("Output of {binary} contains invalid utf8"))
}
