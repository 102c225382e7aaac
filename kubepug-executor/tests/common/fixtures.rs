use kubepug_executor::execution::{Content, Execution, Repository, Variable, VariableType};

/// kubepug output for manifests without deprecated or deleted APIs
pub const CLEAN: &str = r#"{"DeprecatedAPIs":null,"DeletedAPIs":null}"#;

/// kubepug output for a ComponentStatus list with four affected objects
pub const COMPONENT_STATUS: &str = r#"{
  "DeprecatedAPIs": [
    {
      "Description": "ComponentStatus (and ComponentStatusList) holds the cluster validation info. Deprecated: This API is deprecated in v1.19+",
      "Group": "",
      "Kind": "ComponentStatus",
      "Version": "v1",
      "Name": "",
      "Deprecated": true,
      "Items": [
        { "Scope": "GLOBAL", "ObjectName": "scheduler", "Namespace": "" },
        { "Scope": "GLOBAL", "ObjectName": "etcd-0", "Namespace": "" },
        { "Scope": "GLOBAL", "ObjectName": "etcd-1", "Namespace": "" },
        { "Scope": "GLOBAL", "ObjectName": "controller-manager", "Namespace": "" }
      ]
    }
  ],
  "DeletedAPIs": null
}"#;

/// kubepug output with findings in both categories
pub const MIXED: &str = r#"{
  "DeprecatedAPIs": [
    {
      "Description": "ComponentStatus (and ComponentStatusList) holds the cluster validation info. Deprecated: This API is deprecated in v1.19+",
      "Kind": "ComponentStatus",
      "Version": "v1",
      "Deprecated": true,
      "Items": [{ "Scope": "GLOBAL", "ObjectName": "etcd-1", "Namespace": "" }]
    }
  ],
  "DeletedAPIs": [
    {
      "Group": "extensions",
      "Kind": "Ingress",
      "Version": "v1beta1",
      "Name": "ingresses",
      "Deleted": true,
      "Items": [
        { "Scope": "OBJECT", "ObjectName": "oauth2-proxy", "Namespace": "testkube" },
        { "Scope": "OBJECT", "ObjectName": "testdash", "Namespace": "testkube" }
      ]
    },
    {
      "Group": "policy",
      "Kind": "PodSecurityPolicy",
      "Version": "v1beta1",
      "Name": "podsecuritypolicies",
      "Deleted": true,
      "Items": [{ "Scope": "GLOBAL", "ObjectName": "gce.gke-metrics-agent", "Namespace": "" }]
    }
  ]
}"#;

/// Execution scanning inline manifests with the given extra arguments
pub fn string_execution(args: &[&str]) -> Execution {
  Execution {
    content: Content::String {
      data: "apiVersion: v1\nkind: ConfigMap\n".to_string(),
    },
    args: args.iter().map(|a| a.to_string()).collect(),
    ..Default::default()
  }
}

/// Execution scanning a private git directory
pub fn git_dir_execution(token: &str) -> Execution {
  Execution {
    content: Content::GitDir {
      repository: Repository {
        uri: "https://github.com/kubeshop/testkube-dashboard".to_string(),
        branch: Some("main".to_string()),
        path: "manifests".to_string(),
        username: Some("bot".to_string()),
        token: Some(token.to_string()),
        ..Default::default()
      },
    },
    ..Default::default()
  }
}

pub fn variable(name: &str, value: &str, kind: VariableType) -> Variable {
  Variable {
    name: name.to_string(),
    value: value.to_string(),
    kind,
  }
}
