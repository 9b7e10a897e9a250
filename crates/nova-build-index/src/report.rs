//! Human-readable and CSV views over a [`CodeIndex`].
//!
//! Reports are returned as lines; writing them somewhere is up to the caller.

use crate::{
    code_index::CodeIndex,
    location::{LocationDescriptor, LocationEntry},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Label prefix that marks an artifact as deprecated.
pub const DEFAULT_DEPRECATED_LABEL_PREFIX: &str = "@deprecated";

const YEAR_BUCKETS: usize = 40;

const SECTION_RULE: &str = "----------------------------------------";

const ARTIFACTS_CSV_HEADER: &str = "Artifact Name, Bazel Label, Version";
const ARTIFACTS_CSV_HEADER_WITH_AGE: &str = "Artifact Name, Bazel Label, Version, Age (in days)";
const HISTOGRAM_CSV_HEADER: &str = "Age (in Years), Number of Dependencies";
const HISTOGRAM_DISABLED_MESSAGE: &str = "Dependency age histogram could not be computed because \
     age computation for dependencies is disabled.";

/// Filtering applied by [`CodeIndexReporter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportOptions {
    /// Leave out entries whose primary location carries a deprecated label.
    #[serde(default)]
    pub suppress_deprecated: bool,

    /// Label prefix treated as deprecated when `suppress_deprecated` is set.
    #[serde(default = "ReportOptions::default_deprecated_label_prefix")]
    pub deprecated_label_prefix: String,
}

impl ReportOptions {
    fn default_deprecated_label_prefix() -> String {
        DEFAULT_DEPRECATED_LABEL_PREFIX.to_owned()
    }

    /// Whether `entry` shows up in a report.
    pub fn accepts(&self, entry: &LocationEntry) -> bool {
        if !self.suppress_deprecated {
            return true;
        }
        match entry.primary_location() {
            Some(location) => !location.label.starts_with(&self.deprecated_label_prefix),
            None => true,
        }
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            suppress_deprecated: false,
            deprecated_label_prefix: Self::default_deprecated_label_prefix(),
        }
    }
}

/// Artifact ages bucketed by whole years.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeHistogram {
    counts_per_year: [u32; YEAR_BUCKETS],
    undetermined: u32,
}

impl AgeHistogram {
    /// Number of year buckets. Anything older is treated as a bogus age.
    pub const MAX_YEAR_AGE: usize = YEAR_BUCKETS;

    pub fn new() -> Self {
        Self {
            counts_per_year: [0; Self::MAX_YEAR_AGE],
            undetermined: 0,
        }
    }

    /// Count one artifact. Unknown ages and ages of `MAX_YEAR_AGE` years or more are counted as
    /// undetermined.
    pub fn record_age(&mut self, age_in_days: Option<u32>) {
        // Leap years are ignored.
        let bucket = age_in_days
            .map(|days| (days / 365) as usize)
            .filter(|&years| years < Self::MAX_YEAR_AGE);
        match bucket {
            Some(years) => self.counts_per_year[years] += 1,
            None => self.undetermined += 1,
        }
    }

    pub fn counts_per_year(&self) -> &[u32] {
        &self.counts_per_year
    }

    /// Count for the bucket `years`, zero outside the histogram.
    pub fn count_for_year(&self, years: usize) -> u32 {
        self.counts_per_year.get(years).copied().unwrap_or(0)
    }

    pub fn undetermined(&self) -> u32 {
        self.undetermined
    }

    pub fn total(&self) -> u32 {
        self.counts_per_year.iter().sum::<u32>() + self.undetermined
    }
}

impl Default for AgeHistogram {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders reports over a built [`CodeIndex`].
#[derive(Debug, Clone, Copy)]
pub struct CodeIndexReporter<'a> {
    index: &'a CodeIndex,
}

impl<'a> CodeIndexReporter<'a> {
    pub fn new(index: &'a CodeIndex) -> Self {
        Self { index }
    }

    /// Plain text dump of all three dictionaries in insertion order.
    ///
    /// Each accepted entry is listed with the identifiers of all of its locations beneath it.
    /// Section headers report the unfiltered dictionary sizes.
    pub fn render_text(&self, options: &ReportOptions) -> Vec<String> {
        let sections = [
            ("ARTIFACT INDEX", self.index.artifacts()),
            ("FILE INDEX", self.index.files()),
            ("TYPE INDEX", self.index.types()),
        ];

        let mut lines = Vec::new();
        for (title, dictionary) in sections {
            lines.push(String::new());
            lines.push(format!("{title} ({} entries)", dictionary.len()));
            lines.push(SECTION_RULE.to_owned());
            render_text_section(&mut lines, options, dictionary);
        }
        lines.push(String::new());
        lines
    }

    /// One CSV row per (artifact, location), sorted by artifact name, header first.
    ///
    /// The age column is present only if the index computed artifact ages.
    pub fn render_artifacts_csv(&self, options: &ReportOptions) -> Vec<String> {
        let with_age = self.index.options().compute_artifact_ages;

        let mut entries: Vec<(&String, &LocationEntry)> = self.index.artifacts().iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        let mut rows = Vec::with_capacity(entries.len() + 1);
        rows.push(
            if with_age {
                ARTIFACTS_CSV_HEADER_WITH_AGE
            } else {
                ARTIFACTS_CSV_HEADER
            }
            .to_owned(),
        );

        for (name, entry) in entries {
            if !options.accepts(entry) {
                continue;
            }
            for location in entry.locations() {
                rows.push(artifact_csv_row(name, location, with_age));
            }
        }

        tracing::debug!(
            target: "nova.build_index.report",
            rows = rows.len() - 1,
            with_age,
            "rendered artifact csv report"
        );
        rows
    }

    /// Age histogram over every location of every artifact. Report filtering does not apply.
    pub fn build_age_histogram(&self) -> AgeHistogram {
        let mut histogram = AgeHistogram::new();
        for entry in self.index.artifacts().values() {
            for location in entry.locations() {
                histogram.record_age(location.age_in_days);
            }
        }
        histogram
    }

    /// The age histogram as CSV: one row per year bucket, then `-1` with the undetermined count.
    ///
    /// If the index did not compute ages, the only line is an explanation.
    pub fn render_age_histogram_csv(&self) -> Vec<String> {
        if !self.index.options().compute_artifact_ages {
            return vec![HISTOGRAM_DISABLED_MESSAGE.to_owned()];
        }

        let histogram = self.build_age_histogram();
        let mut rows = Vec::with_capacity(AgeHistogram::MAX_YEAR_AGE + 2);
        rows.push(HISTOGRAM_CSV_HEADER.to_owned());
        for (years, count) in histogram.counts_per_year().iter().enumerate() {
            rows.push(format!("{years}, {count}"));
        }
        rows.push(format!("-1, {}", histogram.undetermined()));
        rows
    }
}

fn render_text_section(
    lines: &mut Vec<String>,
    options: &ReportOptions,
    dictionary: &IndexMap<String, LocationEntry>,
) {
    for (name, entry) in dictionary {
        if !options.accepts(entry) {
            continue;
        }
        lines.push(format!("  {name}"));
        for location in entry.locations() {
            lines.push(format!("    {}", location.location_identifier));
        }
    }
}

fn artifact_csv_row(name: &str, location: &LocationDescriptor, with_age: bool) -> String {
    if with_age {
        let age = location.age_in_days.map_or(-1, i64::from);
        format!("{name}, {}, {}, {age}", location.label, location.version)
    } else {
        format!("{name}, {}, {}", location.label, location.version)
    }
}
