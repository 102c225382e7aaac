use std::path::Path;

use anyhow::{Result, bail};

/// Flags the executor sets itself and therefore refuses from the caller
pub const RESERVED_FLAGS: [&str; 2] = ["--format", "--input-file"];

/// Validate the caller supplied arguments and append the ones required to get
/// machine readable output for the materialized manifests
///
/// The caller's arguments keep their relative order and are followed by
/// `--format=json --input-file <input_path>`
pub fn build_args(args: &[String], input_path: &Path) -> Result<Vec<String>> {
  for arg in args {
    if let Some(flag) = RESERVED_FLAGS.iter().find(|flag| arg.contains(*flag)) {
      bail!("the kubepug executor does not accept the \"{flag}\" parameter: {arg}");
    }
  }

  let mut built = args.to_vec();
  built.push("--format=json".to_string());
  built.push("--input-file".to_string());
  built.push(input_path.display().to_string());

  Ok(built)
}
