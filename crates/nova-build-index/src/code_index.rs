use crate::location::{LocationDescriptor, LocationEntry};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Index-wide settings fixed when the index is built.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodeIndexOptions {
    /// Whether the discovery step computed artifact ages.
    ///
    /// When disabled, reports omit the age column and the age histogram is not rendered.
    #[serde(default)]
    pub compute_artifact_ages: bool,
}

/// Discovered code artifacts, keyed three ways.
///
/// Each dictionary keeps its names in insertion order:
/// - artifacts: archive names (e.g. `guava-31.1-jre.jar`)
/// - files: file names found inside or next to artifacts
/// - types: fully qualified type names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeIndex {
    options: CodeIndexOptions,
    artifacts: IndexMap<String, LocationEntry>,
    files: IndexMap<String, LocationEntry>,
    types: IndexMap<String, LocationEntry>,
}

impl CodeIndex {
    pub fn builder(options: CodeIndexOptions) -> CodeIndexBuilder {
        CodeIndexBuilder::new(options)
    }

    pub fn options(&self) -> CodeIndexOptions {
        self.options
    }

    pub fn artifacts(&self) -> &IndexMap<String, LocationEntry> {
        &self.artifacts
    }

    pub fn files(&self) -> &IndexMap<String, LocationEntry> {
        &self.files
    }

    pub fn types(&self) -> &IndexMap<String, LocationEntry> {
        &self.types
    }

    pub fn artifact(&self, name: &str) -> Option<&LocationEntry> {
        self.artifacts.get(name)
    }

    pub fn file(&self, name: &str) -> Option<&LocationEntry> {
        self.files.get(name)
    }

    pub fn type_entry(&self, name: &str) -> Option<&LocationEntry> {
        self.types.get(name)
    }
}

/// Accumulates locations while discovery runs; [`CodeIndexBuilder::build`] freezes the result.
#[derive(Debug, Default)]
pub struct CodeIndexBuilder {
    index: CodeIndex,
    ignored_duplicates: usize,
}

impl CodeIndexBuilder {
    pub fn new(options: CodeIndexOptions) -> Self {
        Self {
            index: CodeIndex {
                options,
                ..CodeIndex::default()
            },
            ignored_duplicates: 0,
        }
    }

    pub fn add_artifact_location(
        &mut self,
        name: impl Into<String>,
        location: LocationDescriptor,
    ) -> &mut Self {
        let added = add_location(&mut self.index.artifacts, name.into(), location);
        self.record(added)
    }

    pub fn add_file_location(
        &mut self,
        name: impl Into<String>,
        location: LocationDescriptor,
    ) -> &mut Self {
        let added = add_location(&mut self.index.files, name.into(), location);
        self.record(added)
    }

    pub fn add_type_location(
        &mut self,
        name: impl Into<String>,
        location: LocationDescriptor,
    ) -> &mut Self {
        let added = add_location(&mut self.index.types, name.into(), location);
        self.record(added)
    }

    pub fn build(self) -> CodeIndex {
        tracing::debug!(
            target: "nova.build_index",
            artifacts = self.index.artifacts.len(),
            files = self.index.files.len(),
            types = self.index.types.len(),
            ignored_duplicates = self.ignored_duplicates,
            "built code index"
        );
        self.index
    }

    fn record(&mut self, added: bool) -> &mut Self {
        if !added {
            self.ignored_duplicates += 1;
        }
        self
    }
}

fn add_location(
    dictionary: &mut IndexMap<String, LocationEntry>,
    name: String,
    location: LocationDescriptor,
) -> bool {
    let entry = dictionary.entry(name).or_default();
    if entry.contains(&location.location_identifier) {
        tracing::debug!(
            target: "nova.build_index",
            location = %location.location_identifier,
            "location already indexed"
        );
        return false;
    }
    entry.add_location(location)
}
