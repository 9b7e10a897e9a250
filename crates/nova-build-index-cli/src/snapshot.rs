use anyhow::{Context, Result};
use nova_build_index::{
    CodeIndex, CodeIndexOptions, LocationDescriptor, TargetDescriptor, TargetIndex,
    TargetIndexError,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Build metadata handed over by the extraction and discovery steps, as JSON.
///
/// This is only the interchange shape read by the CLI; indexes are always rebuilt from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSnapshot {
    /// How discovery ran. Falls back to the tool configuration when absent.
    #[serde(default)]
    pub options: Option<CodeIndexOptions>,
    #[serde(default)]
    pub targets: Vec<TargetDescriptor>,
    #[serde(default)]
    pub artifacts: Vec<NamedLocation>,
    #[serde(default)]
    pub files: Vec<NamedLocation>,
    #[serde(default)]
    pub types: Vec<NamedLocation>,
}

/// A location discovered for the artifact, file or type called `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamedLocation {
    pub name: String,
    pub location: LocationDescriptor,
}

impl BuildSnapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        let snapshot = Self::from_json_str(&data)
            .with_context(|| format!("failed to parse snapshot {}", path.display()))?;

        tracing::info!(
            target: "nova.build_index.cli",
            path = %path.display(),
            targets = snapshot.targets.len(),
            artifacts = snapshot.artifacts.len(),
            files = snapshot.files.len(),
            types = snapshot.types.len(),
            "loaded build snapshot"
        );
        Ok(snapshot)
    }

    pub fn from_json_str(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Index the snapshot's target descriptors.
    pub fn target_index(&self) -> Result<TargetIndex, TargetIndexError> {
        TargetIndex::new(self.targets.iter().cloned())
    }

    /// Index the snapshot's discovered locations.
    ///
    /// `fallback` applies only when the snapshot does not record its own options.
    pub fn code_index(&self, fallback: CodeIndexOptions) -> CodeIndex {
        let mut builder = CodeIndex::builder(self.options.unwrap_or(fallback));
        for named in &self.artifacts {
            builder.add_artifact_location(named.name.clone(), named.location.clone());
        }
        for named in &self.files {
            builder.add_file_location(named.name.clone(), named.location.clone());
        }
        for named in &self.types {
            builder.add_type_location(named.name.clone(), named.location.clone());
        }
        builder.build()
    }
}
