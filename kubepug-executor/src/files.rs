use std::{fs, path::Path};

use anyhow::{Context, Result};
use tracing::debug;

use crate::execution::CopyFile;

/// Copy the auxiliary files of an execution to their destinations
///
/// Relative sources are resolved against `uploads_dir` when one is configured.
/// Missing parent directories of the destination are created.
pub fn place_files(files: &[CopyFile], uploads_dir: Option<&Path>) -> Result<()> {
  for file in files {
    let source = match uploads_dir {
      Some(dir) if file.source.is_relative() => dir.join(&file.source),
      _ => file.source.to_owned(),
    };

    if let Some(parent) = file.destination.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    debug!("placing {} at {}", source.display(), file.destination.display());
    fs::copy(&source, &file.destination).with_context(|| {
      format!(
        "Failed to copy {} to {}",
        source.display(),
        file.destination.display()
      )
    })?;
  }

  Ok(())
}
