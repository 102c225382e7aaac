use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info};

use crate::{
  args,
  clients::{ContentFetcher, ProcessExecutor},
  config::Config,
  env::EnvManager,
  execution::{Content, Execution},
  files, report,
  verdict::{self, ExecutionReport},
};

/// Runs kubepug for an execution and translates its output into an execution report
pub struct Runner<F, P> {
  fetcher: F,
  executor: P,
  binary: String,
  uploads_dir: Option<PathBuf>,
}

impl<F: ContentFetcher, P: ProcessExecutor> Runner<F, P> {
  pub fn new(fetcher: F, executor: P, config: &Config) -> Self {
    Self {
      fetcher,
      executor,
      binary: config.scanner.binary.to_owned(),
      uploads_dir: config.files.uploads_dir.to_owned(),
    }
  }

  /// Each step short-circuits on failure; a report is only produced once the scanner
  /// output has been parsed
  pub async fn run(&self, execution: &Execution) -> Result<ExecutionReport> {
    let path = self
      .fetcher
      .fetch(&execution.content)
      .await
      .context("could not get content")?;
    info!("created content path {}", path.display());

    if execution.content.is_file() {
      debug!("using single file");
    }
    if execution.content.is_dir() {
      debug!("using dir");
    }

    let args = args::build_args(&execution.args, &path).context("could not build up parameters")?;

    files::place_files(&execution.copy_files, self.uploads_dir.as_deref()).context("could not place config files")?;

    let env = EnvManager::with_vars(&execution.variables).with_secrets(content_secrets(&execution.content));
    info!("running {} with arguments {}", self.binary, env.obfuscate(&args.join(" ")));

    let output = self
      .executor
      .run(&self.binary, &args, &env)
      .await
      .map_err(|err| anyhow!("could not execute kubepug: {}", env.obfuscate(&format!("{err:#}"))))?;
    let output = env.obfuscate(&output);

    let scan = report::parse(&output).context("could not unmarshal kubepug execution result")?;
    debug!(
      deprecated = scan.deprecated_apis.len(),
      deleted = scan.deleted_apis.len(),
      "parsed kubepug result"
    );

    Ok(verdict::build_report(&scan, &output))
  }
}

/// Credentials carried by the content descriptor itself
fn content_secrets(content: &Content) -> Vec<String> {
  match content {
    Content::GitFile { repository } | Content::GitDir { repository } => repository.secrets(),
    Content::String { .. } | Content::FileUri { .. } => Vec::new(),
  }
}
