use crate::{
    source_path::{is_ancestor_or_self, normalize_dir_path, path_segments},
    target::{TargetDescriptor, TargetKind},
};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetIndexError {
    #[error("duplicate target label `{label}`")]
    DuplicateLabel { label: String },
    /// The sources of a target do not live under one common root, so the target cannot answer a
    /// root path query. This points at inconsistent data from the extraction step.
    #[error(
        "sources of target `{label}` do not share a common root under `{prefix}` \
         (`{outside}` lies outside of it)"
    )]
    NoCommonSourceRoot {
        label: String,
        prefix: String,
        outside: String,
    },
}

/// Lookup tables over a fixed set of target descriptors.
///
/// Built once; every lookup afterwards is a read, so a `TargetIndex` can be shared freely
/// between threads.
#[derive(Debug, Clone, Default)]
pub struct TargetIndex {
    targets: Vec<TargetDescriptor>,
    /// Deepest directory containing every source of the target at the same position, `None`
    /// if the target has no sources or its sources share no leading directory.
    common_roots: Vec<Option<String>>,
    by_label: HashMap<String, usize>,
    by_kind: HashMap<TargetKind, Vec<usize>>,
    /// Every declared source and each of its ancestor directories, keyed in `/`-separated form.
    by_root_source_path: HashMap<String, Vec<usize>>,
}

impl TargetIndex {
    /// Index `targets`. Fails if two descriptors share a label.
    ///
    /// Source roots are not validated here; a target whose sources lack a common root only
    /// fails the root path queries that reach it.
    pub fn new(
        targets: impl IntoIterator<Item = TargetDescriptor>,
    ) -> Result<Self, TargetIndexError> {
        let targets: Vec<TargetDescriptor> = targets.into_iter().collect();

        let mut by_label = HashMap::with_capacity(targets.len());
        let mut by_kind: HashMap<TargetKind, Vec<usize>> = HashMap::new();
        let mut by_root_source_path: HashMap<String, Vec<usize>> = HashMap::new();
        let mut common_roots = Vec::with_capacity(targets.len());

        for (idx, target) in targets.iter().enumerate() {
            if by_label.insert(target.label.clone(), idx).is_some() {
                return Err(TargetIndexError::DuplicateLabel {
                    label: target.label.clone(),
                });
            }
            by_kind.entry(target.kind).or_default().push(idx);
            common_roots.push(common_source_root(&target.sources));

            for key in root_path_keys(&target.sources) {
                by_root_source_path.entry(key).or_default().push(idx);
            }
        }

        tracing::debug!(
            target: "nova.build_index",
            targets = targets.len(),
            kinds = by_kind.len(),
            root_prefixes = by_root_source_path.len(),
            "built target index"
        );

        Ok(Self {
            targets,
            common_roots,
            by_label,
            by_kind,
            by_root_source_path,
        })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// All indexed targets, in the order they were supplied.
    pub fn targets(&self) -> impl Iterator<Item = &TargetDescriptor> {
        self.targets.iter()
    }

    pub fn lookup_by_label(&self, label: &str) -> Option<&TargetDescriptor> {
        self.by_label.get(label).map(|&idx| &self.targets[idx])
    }

    /// Every target whose kind is in `kinds`.
    ///
    /// Results are grouped by kind; repeated kinds in `kinds` are ignored.
    pub fn lookup_by_kind(&self, kinds: &[TargetKind]) -> Vec<&TargetDescriptor> {
        let kinds: BTreeSet<TargetKind> = kinds.iter().copied().collect();
        kinds
            .into_iter()
            .filter_map(|kind| self.by_kind.get(&kind))
            .flatten()
            .map(|&idx| &self.targets[idx])
            .collect()
    }

    /// Every target whose sources all live under `prefix`.
    ///
    /// `prefix` matches whole path segments only (`a/b` never matches sources under `a/bc`) and
    /// may name any ancestor of a target's common source root, or a declared source file itself.
    /// A trailing separator is ignored.
    ///
    /// Returns [`TargetIndexError::NoCommonSourceRoot`] if a target with some, but not all, of its
    /// sources under `prefix` is encountered.
    pub fn lookup_by_root_source_path(
        &self,
        prefix: &str,
    ) -> Result<Vec<&TargetDescriptor>, TargetIndexError> {
        let key = normalize_dir_path(prefix);
        let Some(candidates) = self.by_root_source_path.get(&key) else {
            return Ok(Vec::new());
        };

        let mut out = Vec::with_capacity(candidates.len());
        for &idx in candidates {
            let target = &self.targets[idx];
            if let Some(outside) = target
                .sources
                .iter()
                .find(|source| !is_ancestor_or_self(&key, source))
            {
                let outside = outside.clone();
                tracing::warn!(
                    target: "nova.build_index",
                    label = %target.label,
                    prefix = %key,
                    outside = %outside,
                    "target sources do not share a common root"
                );
                return Err(TargetIndexError::NoCommonSourceRoot {
                    label: target.label.clone(),
                    prefix: key,
                    outside,
                });
            }
            out.push(target);
        }
        Ok(out)
    }

    /// The common source root computed for `label`, in `/`-separated form.
    ///
    /// `Some("")` means the sources live directly in the workspace root.
    pub fn common_source_root(&self, label: &str) -> Option<&str> {
        let idx = *self.by_label.get(label)?;
        self.common_roots[idx].as_deref()
    }
}

fn dir_segments(source: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = path_segments(source).collect();
    segments.pop();
    segments
}

fn common_source_root(sources: &[String]) -> Option<String> {
    let (first, rest) = sources.split_first()?;
    let mut common = dir_segments(first);

    for source in rest {
        let dirs = dir_segments(source);
        let shared = common
            .iter()
            .zip(&dirs)
            .take_while(|(a, b)| a == b)
            .count();
        // Two sources directly in the workspace root still share it.
        if shared == 0 && !(common.is_empty() && dirs.is_empty()) {
            return None;
        }
        common.truncate(shared);
    }

    Some(common.join("/"))
}

/// Every ancestor directory of every source, plus the source paths themselves.
fn root_path_keys(sources: &[String]) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    for source in sources {
        let mut key = String::new();
        for segment in path_segments(source) {
            if !key.is_empty() {
                key.push('/');
            }
            key.push_str(segment);
            keys.insert(key.clone());
        }
    }
    keys
}
