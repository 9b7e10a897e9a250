//! In-memory indexes over Bazel build metadata for Nova.
//!
//! This crate organizes metadata that an external build-graph introspection step already
//! extracted; it never runs Bazel, parses BUILD files or walks the file system:
//! - splitting source file paths into a source root and a package-relative path
//! - looking up target descriptors by label, by rule kind, and by source root prefix
//! - consolidating discovered artifact locations into compact per-name entries
//! - rendering text / CSV / age-histogram reports over the artifact index
//!
//! Every index is built once from a snapshot and is read-only afterwards. Re-indexing means
//! building a new index and dropping the old one.

mod code_index;
mod location;
mod report;
mod source_path;
mod target;
mod target_index;

pub use crate::{
    code_index::{CodeIndex, CodeIndexBuilder, CodeIndexOptions},
    location::{LocationDescriptor, LocationEntry},
    report::{AgeHistogram, CodeIndexReporter, ReportOptions, DEFAULT_DEPRECATED_LABEL_PREFIX},
    source_path::{
        is_ancestor_or_self, normalize_dir_path, path_segments, split_namespaced_path,
        SourcePath,
    },
    target::{ParseTargetKindError, TargetDescriptor, TargetKind},
    target_index::{TargetIndex, TargetIndexError},
};
