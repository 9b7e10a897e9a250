use nova_build_index::{TargetDescriptor, TargetIndex, TargetIndexError, TargetKind};
use proptest::prelude::*;

fn target(label: &str, kind: TargetKind, sources: &[&str]) -> TargetDescriptor {
    TargetDescriptor::new(label, kind, sources.iter().copied())
}

fn library(label: &str, sources: &[&str]) -> TargetDescriptor {
    target(label, TargetKind::JavaLibrary, sources)
}

fn labels(targets: &[&TargetDescriptor]) -> Vec<String> {
    let mut labels: Vec<String> = targets.iter().map(|t| t.label.clone()).collect();
    labels.sort();
    labels
}

fn four_kinds() -> TargetIndex {
    TargetIndex::new([
        target("foo1", TargetKind::JavaLibrary, &["a/b/c/d/Foo.java"]),
        target("foo2", TargetKind::JavaTest, &["a/b/c/d/Foo.java"]),
        target("foo3", TargetKind::JavaBinary, &["a/b/c/d/Foo.java"]),
        target("foo4", TargetKind::JavaWebTestSuite, &["a/b/c/d/Foo.java"]),
    ])
    .expect("unique labels")
}

#[test]
fn lookup_by_label_returns_exact_descriptor() {
    let index = four_kinds();

    for (label, kind) in [
        ("foo1", TargetKind::JavaLibrary),
        ("foo2", TargetKind::JavaTest),
        ("foo3", TargetKind::JavaBinary),
        ("foo4", TargetKind::JavaWebTestSuite),
    ] {
        let found = index.lookup_by_label(label).expect("indexed label");
        assert_eq!(found.label, label);
        assert_eq!(found.kind, kind);
    }
    assert!(index.lookup_by_label("blah").is_none());
    assert_eq!(index.len(), 4);
}

#[test]
fn lookup_by_single_kind() {
    let index = four_kinds();

    let tests = index.lookup_by_kind(&[TargetKind::JavaTest]);
    assert_eq!(labels(&tests), ["foo2"]);

    let suites = index.lookup_by_kind(&[TargetKind::JavaWebTestSuite]);
    assert_eq!(labels(&suites), ["foo4"]);

    assert!(index.lookup_by_kind(&[TargetKind::ProtoLibrary]).is_empty());
    assert!(index.lookup_by_kind(&[]).is_empty());
}

#[test]
fn lookup_by_multiple_kinds_is_disjoint_union() {
    let index = four_kinds();

    let found = index.lookup_by_kind(&[TargetKind::JavaTest, TargetKind::JavaBinary]);
    assert_eq!(labels(&found), ["foo2", "foo3"]);

    // Repeating a kind does not repeat its targets.
    let found = index.lookup_by_kind(&[TargetKind::JavaTest, TargetKind::JavaTest]);
    assert_eq!(labels(&found), ["foo2"]);
}

#[test]
fn lookup_by_root_source_path_matches_every_ancestor() {
    let index = TargetIndex::new([library("foo", &["a/b/c/d/Foo.java"])]).unwrap();

    for prefix in ["a/b/c/d/Foo.java", "a/b/c/d", "a/b/c/", "a/b/c", "a/b", "a/", "a"] {
        let found = index.lookup_by_root_source_path(prefix).unwrap();
        assert_eq!(labels(&found), ["foo"], "prefix {prefix}");
    }
    assert!(index.lookup_by_root_source_path("f").unwrap().is_empty());
    assert!(index
        .lookup_by_root_source_path("a/b/c/d/Fo")
        .unwrap()
        .is_empty());
    assert_eq!(index.common_source_root("foo"), Some("a/b/c/d"));
}

#[test]
fn lookup_by_root_source_path_does_not_match_substrings() {
    let index =
        TargetIndex::new([library("myclass", &["projects/services/scone/MyClass.java"])]).unwrap();

    let found = index
        .lookup_by_root_source_path("projects/services/scone")
        .unwrap();
    assert_eq!(labels(&found), ["myclass"]);
    assert!(index
        .lookup_by_root_source_path("projects/services/scon")
        .unwrap()
        .is_empty());
}

#[test]
fn lookup_by_root_source_path_unions_sibling_roots() {
    let index = TargetIndex::new([
        library("foo", &["a/b/c/aaa/Foo.java"]),
        library("blah", &["a/b/c/zzz/Blah.java"]),
    ])
    .unwrap();

    let found = index.lookup_by_root_source_path("a/b/c").unwrap();
    assert_eq!(labels(&found), ["blah", "foo"]);

    let found = index.lookup_by_root_source_path("a/b/c/aaa").unwrap();
    assert_eq!(labels(&found), ["foo"]);

    let found = index.lookup_by_root_source_path("a/b/c/zzz").unwrap();
    assert_eq!(labels(&found), ["blah"]);
}

#[test]
fn sources_with_common_root_answer_ancestor_queries() {
    let index = TargetIndex::new([library(
        "foo",
        &["a/b/c/aaa/ccc/Foo.java", "a/b/c/aaa/ddd/Blah.java"],
    )])
    .unwrap();

    assert_eq!(index.lookup_by_root_source_path("a/b/c").unwrap().len(), 1);
    assert_eq!(
        index.lookup_by_root_source_path("a/b/c/aaa").unwrap().len(),
        1
    );
    assert_eq!(index.common_source_root("foo"), Some("a/b/c/aaa"));
}

#[test]
fn query_below_common_root_is_structural_failure() {
    let index = TargetIndex::new([library(
        "foo",
        &["a/b/c/aaa/Foo.java", "a/b/c/zzz/Blah.java"],
    )])
    .unwrap();

    // The common root itself is fine.
    assert_eq!(index.lookup_by_root_source_path("a/b/c").unwrap().len(), 1);

    let err = index.lookup_by_root_source_path("a/b/c/aaa").unwrap_err();
    assert_eq!(
        err,
        TargetIndexError::NoCommonSourceRoot {
            label: "foo".to_string(),
            prefix: "a/b/c/aaa".to_string(),
            outside: "a/b/c/zzz/Blah.java".to_string(),
        }
    );
}

#[test]
fn source_file_query_requires_every_source_to_be_that_file() {
    let index = TargetIndex::new([
        library("single", &["a/b/Foo.java"]),
        library("pair", &["x/y/Foo.java", "x/z/Bar.java"]),
    ])
    .unwrap();

    let found = index.lookup_by_root_source_path("a/b/Foo.java").unwrap();
    assert_eq!(labels(&found), ["single"]);
    assert!(index
        .lookup_by_root_source_path("a/b/Foo.jav")
        .unwrap()
        .is_empty());

    let err = index.lookup_by_root_source_path("x/y/Foo.java").unwrap_err();
    assert_eq!(
        err,
        TargetIndexError::NoCommonSourceRoot {
            label: "pair".to_string(),
            prefix: "x/y/Foo.java".to_string(),
            outside: "x/z/Bar.java".to_string(),
        }
    );
}

#[test]
fn sources_in_workspace_root_have_empty_common_root() {
    let index = TargetIndex::new([
        library("top", &["Foo.java", "Bar.java"]),
        library("mixed", &["Baz.java", "a/Qux.java"]),
    ])
    .unwrap();

    assert_eq!(index.common_source_root("top"), Some(""));
    assert_eq!(index.common_source_root("mixed"), None);
    assert!(index.lookup_by_root_source_path("Foo.java").is_err());
    assert!(index.lookup_by_root_source_path("a").is_err());
}

#[test]
fn sources_without_any_shared_root_fail_on_query() {
    let index = TargetIndex::new([
        library("foo", &["a/b/c/aaa/Foo.java", "x/y/z/aaa/Blah.java"]),
        library("ok", &["q/Ok.java"]),
    ])
    .expect("validation is lazy");

    assert!(matches!(
        index.lookup_by_root_source_path("a/b/c"),
        Err(TargetIndexError::NoCommonSourceRoot { ref label, .. }) if label == "foo"
    ));
    assert!(index.lookup_by_root_source_path("x").is_err());
    assert_eq!(index.common_source_root("foo"), None);

    // Queries that never reach the malformed target are unaffected.
    assert_eq!(labels(&index.lookup_by_root_source_path("q").unwrap()), ["ok"]);
    assert!(index.lookup_by_label("foo").is_some());
}

#[test]
fn targets_without_sources_are_not_root_indexed() {
    let index = TargetIndex::new([
        target("//third_party:guava", TargetKind::JavaImport, &[]),
        library("//app:lib", &["app/src/Lib.java"]),
    ])
    .unwrap();

    assert_eq!(labels(&index.lookup_by_root_source_path("app").unwrap()), ["//app:lib"]);
    assert!(index.lookup_by_root_source_path("").unwrap().is_empty());
    assert_eq!(index.common_source_root("//third_party:guava"), None);
    assert_eq!(index.lookup_by_kind(&[TargetKind::JavaImport]).len(), 1);
}

#[test]
fn index_can_be_shared_across_threads() {
    let index = four_kinds();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                assert_eq!(index.lookup_by_root_source_path("a/b").unwrap().len(), 4);
            });
        }
    });
}

fn arb_label() -> impl Strategy<Value = String> {
    "//[a-z]{1,6}:[a-z]{1,6}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_indexed_label_resolves_to_itself(
        labels in prop::collection::btree_set(arb_label(), 1..24),
        probe in arb_label(),
    ) {
        let targets: Vec<TargetDescriptor> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let kind = TargetKind::ALL[i % TargetKind::ALL.len()];
                TargetDescriptor::new(label.clone(), kind, [format!("pkg{i}/src/File{i}.java")])
            })
            .collect();
        let index = TargetIndex::new(targets.clone()).unwrap();

        for target in &targets {
            prop_assert_eq!(index.lookup_by_label(&target.label), Some(target));
        }
        if !labels.contains(&probe) {
            prop_assert!(index.lookup_by_label(&probe).is_none());
        }

        for kind in TargetKind::ALL {
            let expected = targets.iter().filter(|t| t.kind == kind).count();
            let found = index.lookup_by_kind(&[kind]);
            prop_assert_eq!(found.len(), expected);
            prop_assert!(found.iter().all(|t| t.kind == kind));
        }
    }
}
