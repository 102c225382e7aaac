use std::fmt;

use serde::{Deserialize, Serialize};

use crate::report::{Finding, ScanReport};

pub const DEPRECATED_APIS_STEP: &str = "Deprecated APIs";
pub const DELETED_APIS_STEP: &str = "Deleted APIs";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
  Passed,
  Failed,
}

impl ExecutionStatus {
  pub fn symbol(&self) -> &'static str {
    match self {
      ExecutionStatus::Passed => "✅",
      ExecutionStatus::Failed => "❌",
    }
  }
}

impl fmt::Display for ExecutionStatus {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      ExecutionStatus::Passed => write!(f, "passed"),
      ExecutionStatus::Failed => write!(f, "failed"),
    }
  }
}

/// One failed assertion, reported per finding
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionFailure {
  pub name: String,
  pub error_message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStep {
  pub name: String,
  pub status: ExecutionStatus,
  pub assertion_failures: Vec<AssertionFailure>,
}

/// The report handed back to the orchestrating platform
///
/// Always carries exactly two steps, deprecated APIs first, deleted APIs second
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
  pub status: ExecutionStatus,
  pub raw_output: String,
  pub steps: Vec<ExecutionStep>,
}

/// Builds a step from the findings of a single category
///
/// A category without findings passes; otherwise every finding (not every affected
/// object) becomes one assertion failure
fn build_step<T: Finding>(name: &str, findings: &[T]) -> ExecutionStep {
  if findings.is_empty() {
    return ExecutionStep {
      name: name.to_owned(),
      status: ExecutionStatus::Passed,
      assertion_failures: Vec::new(),
    };
  }

  let assertion_failures = findings
    .iter()
    .map(|finding| AssertionFailure {
      name: finding.name().to_owned(),
      error_message: format!("{}:\n{finding}", T::LABEL),
    })
    .collect();

  ExecutionStep {
    name: name.to_owned(),
    status: ExecutionStatus::Failed,
    assertion_failures,
  }
}

/// Translates a parsed scan into the execution report
pub fn build_report(scan: &ScanReport, raw_output: &str) -> ExecutionReport {
  let deprecated = build_step(DEPRECATED_APIS_STEP, &scan.deprecated_apis);
  let deleted = build_step(DELETED_APIS_STEP, &scan.deleted_apis);

  let status = if scan.is_clean() {
    ExecutionStatus::Passed
  } else {
    ExecutionStatus::Failed
  };

  ExecutionReport {
    status,
    raw_output: raw_output.to_owned(),
    steps: vec![deprecated, deleted],
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::report::{AffectedObject, DeletedApi, DeprecatedApi, Scope};

  fn object(scope: Scope, namespace: &str, name: &str) -> AffectedObject {
    AffectedObject {
      scope,
      object_name: name.to_string(),
      namespace: namespace.to_string(),
    }
  }

  fn component_status() -> DeprecatedApi {
    DeprecatedApi {
      kind: "ComponentStatus".to_string(),
      version: "v1".to_string(),
      deprecated: true,
      items: ["scheduler", "etcd-0", "etcd-1", "controller-manager"]
        .iter()
        .map(|n| object(Scope::Global, "", n))
        .collect(),
      ..Default::default()
    }
  }

  fn ingress() -> DeletedApi {
    DeletedApi {
      group: "extensions".to_string(),
      kind: "Ingress".to_string(),
      version: "v1beta1".to_string(),
      name: "ingresses".to_string(),
      deleted: true,
      items: vec![object(Scope::Object, "testkube", "oauth2-proxy")],
      ..Default::default()
    }
  }

  fn psp() -> DeletedApi {
    DeletedApi {
      group: "policy".to_string(),
      kind: "PodSecurityPolicy".to_string(),
      version: "v1beta1".to_string(),
      name: "podsecuritypolicies".to_string(),
      deleted: true,
      ..Default::default()
    }
  }

  #[test]
  fn empty_scan_passes() {
    let report = build_report(&ScanReport::default(), "{}");
    assert_eq!(report.status, ExecutionStatus::Passed);
    assert_eq!(report.raw_output, "{}");
    assert_eq!(report.steps.len(), 2);
    for step in &report.steps {
      assert_eq!(step.status, ExecutionStatus::Passed);
      assert!(step.assertion_failures.is_empty());
    }
  }

  #[test]
  fn steps_are_in_fixed_order() {
    let report = build_report(&ScanReport::default(), "");
    let names: Vec<&str> = report.steps.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec![DEPRECATED_APIS_STEP, DELETED_APIS_STEP]);
  }

  #[test]
  fn one_failure_per_deprecated_finding() {
    let scan = ScanReport {
      deprecated_apis: vec![component_status()],
      deleted_apis: vec![],
    };
    let report = build_report(&scan, "");

    assert_eq!(report.status, ExecutionStatus::Failed);
    assert_eq!(report.steps[0].status, ExecutionStatus::Failed);
    assert_eq!(report.steps[0].assertion_failures.len(), 1);
    assert_eq!(report.steps[1].status, ExecutionStatus::Passed);
    assert!(report.steps[1].assertion_failures.is_empty());
  }

  #[test]
  fn deleted_only_fails_deleted_step() {
    let scan = ScanReport {
      deprecated_apis: vec![],
      deleted_apis: vec![ingress(), psp()],
    };
    let report = build_report(&scan, "");

    assert_eq!(report.status, ExecutionStatus::Failed);
    assert_eq!(report.steps[0].status, ExecutionStatus::Passed);
    assert!(report.steps[0].assertion_failures.is_empty());
    assert_eq!(report.steps[1].status, ExecutionStatus::Failed);

    let names: Vec<&str> = report.steps[1].assertion_failures.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["ingresses", "podsecuritypolicies"]);
  }

  #[test]
  fn each_step_reads_its_own_category() {
    let scan = ScanReport {
      deprecated_apis: vec![component_status()],
      deleted_apis: vec![ingress(), psp()],
    };
    let report = build_report(&scan, "");

    assert_eq!(report.status, ExecutionStatus::Failed);
    assert_eq!(report.steps[0].assertion_failures.len(), 1);
    assert!(report.steps[0].assertion_failures[0].error_message.contains("ComponentStatus"));
    assert_eq!(report.steps[1].assertion_failures.len(), 2);
    assert!(
      report.steps[1]
        .assertion_failures
        .iter()
        .all(|a| a.error_message.starts_with("Deleted API:\n"))
    );
  }

  #[test]
  fn error_message_embeds_finding_and_items() {
    let scan = ScanReport {
      deprecated_apis: vec![],
      deleted_apis: vec![ingress()],
    };
    let report = build_report(&scan, "");
    assert_eq!(
      report.steps[1].assertion_failures[0].error_message,
      "Deleted API:\n Ingress extensions/v1beta1 (name: ingresses)\n Items:\n  - OBJECT testkube/oauth2-proxy"
    );
  }

  #[test]
  fn status_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&ExecutionStatus::Failed).unwrap(), "\"failed\"");
    assert_eq!(ExecutionStatus::Passed.to_string(), "passed");
  }
}
