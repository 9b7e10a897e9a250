use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The Bazel rule kinds Nova understands.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    JavaLibrary,
    JavaImport,
    JavaBinary,
    JavaTest,
    JavaWebTestSuite,
    JavaProtoLibrary,
    JavaLiteProtoLibrary,
    ProtoLibrary,
    #[serde(rename = "springboot")]
    SpringBoot,
}

impl TargetKind {
    pub const ALL: [TargetKind; 9] = [
        TargetKind::JavaLibrary,
        TargetKind::JavaImport,
        TargetKind::JavaBinary,
        TargetKind::JavaTest,
        TargetKind::JavaWebTestSuite,
        TargetKind::JavaProtoLibrary,
        TargetKind::JavaLiteProtoLibrary,
        TargetKind::ProtoLibrary,
        TargetKind::SpringBoot,
    ];

    /// The rule name as it appears in BUILD files and `bazel query` output.
    pub fn rule_name(self) -> &'static str {
        match self {
            TargetKind::JavaLibrary => "java_library",
            TargetKind::JavaImport => "java_import",
            TargetKind::JavaBinary => "java_binary",
            TargetKind::JavaTest => "java_test",
            TargetKind::JavaWebTestSuite => "java_web_test_suite",
            TargetKind::JavaProtoLibrary => "java_proto_library",
            TargetKind::JavaLiteProtoLibrary => "java_lite_proto_library",
            TargetKind::ProtoLibrary => "proto_library",
            TargetKind::SpringBoot => "springboot",
        }
    }

    pub fn is_test(self) -> bool {
        matches!(self, TargetKind::JavaTest | TargetKind::JavaWebTestSuite)
    }

    /// Whether targets of this kind produce something that can be launched.
    pub fn is_runnable(self) -> bool {
        matches!(self, TargetKind::JavaBinary | TargetKind::SpringBoot)
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rule_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown target kind `{0}`")]
pub struct ParseTargetKindError(pub String);

impl FromStr for TargetKind {
    type Err = ParseTargetKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        TargetKind::ALL
            .into_iter()
            .find(|kind| kind.rule_name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseTargetKindError(value.to_string()))
    }
}

/// Build metadata for a single Bazel target, as produced by the extraction step.
///
/// Source paths are workspace-relative and `/`-separated. Only `label`, `kind` and `sources`
/// are read by [`crate::TargetIndex`]; the remaining fields are carried for callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDescriptor {
    pub label: String,
    pub kind: TargetKind,
    #[serde(default)]
    pub sources: Vec<String>,
    /// Package directory of the target, relative to the workspace root.
    #[serde(default)]
    pub workspace_relative_path: Option<String>,
    /// Labels of the target's direct dependencies.
    #[serde(default)]
    pub deps: Vec<String>,
    #[serde(default)]
    pub main_class: Option<String>,
}

impl TargetDescriptor {
    pub fn new(
        label: impl Into<String>,
        kind: TargetKind,
        sources: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            label: label.into(),
            kind,
            sources: sources.into_iter().map(Into::into).collect(),
            workspace_relative_path: None,
            deps: Vec::new(),
            main_class: None,
        }
    }
}
