use std::{fs::File, io::prelude::*};

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tabled::{Table, Tabled, settings::Style};

use crate::verdict::ExecutionReport;

#[derive(Clone, Copy, Debug, Default, ValueEnum, Serialize, Deserialize)]
pub enum Format {
  /// JSON format consumed by the orchestrating platform
  #[default]
  Json,
  /// Text format used for writing to stdout
  Text,
}

#[derive(Tabled)]
#[tabled(rename_all = "UpperCase")]
struct StepRow {
  #[tabled(rename = " ")]
  symbol: &'static str,
  step: String,
  status: String,
  failures: usize,
}

#[derive(Tabled)]
#[tabled(rename_all = "UpperCase")]
struct FailureRow {
  step: String,
  name: String,
  #[tabled(rename = "ERROR")]
  error_message: String,
}

impl ExecutionReport {
  /// Summary table of the steps followed by a table of the assertion failures, if any
  pub fn to_stdout_table(&self) -> Result<String> {
    let steps: Vec<StepRow> = self
      .steps
      .iter()
      .map(|step| StepRow {
        symbol: step.status.symbol(),
        step: step.name.to_owned(),
        status: step.status.to_string(),
        failures: step.assertion_failures.len(),
      })
      .collect();

    let mut output = String::new();
    let mut table = Table::new(steps);
    table.with(Style::sharp());
    output.push_str(&format!("{table}\n"));

    let failures: Vec<FailureRow> = self
      .steps
      .iter()
      .flat_map(|step| {
        step.assertion_failures.iter().map(|failure| FailureRow {
          step: step.name.to_owned(),
          name: failure.name.to_owned(),
          error_message: failure.error_message.to_owned(),
        })
      })
      .collect();

    if !failures.is_empty() {
      let mut table = Table::new(failures);
      table.with(Style::sharp());
      output.push_str(&format!("{table}\n"));
    }

    output.push_str(&format!("Status: {}\n", self.status));

    Ok(output)
  }
}

pub fn render(report: &ExecutionReport, format: &Format) -> Result<String> {
  let output = match format {
    Format::Json => serde_json::to_string_pretty(report)?,
    Format::Text => report.to_stdout_table()?,
  };

  Ok(output)
}

pub fn output(report: &ExecutionReport, format: &Format, filename: &Option<String>) -> Result<()> {
  let output = render(report, format)?;

  match filename {
    Some(filename) => {
      let mut file = File::create(filename)?;
      file.write_all(output.as_bytes())?;
    }
    None => {
      println!("{output}");
    }
  }

  Ok(())
}
