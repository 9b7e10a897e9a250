use nova_build_index::split_namespaced_path;
use proptest::prelude::*;
use std::path::MAIN_SEPARATOR_STR;

const PROPTEST_CASES: u32 = 256;

fn arb_segments(min: usize, max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,4}", min..=max)
}

fn join(segments: &[String]) -> String {
    segments.join(MAIN_SEPARATOR_STR)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

    #[test]
    fn split_recovers_root_and_package(
        root in arb_segments(1, 5),
        package in arb_segments(0, 4),
        file in "[A-Z][a-z]{0,6}\\.java",
    ) {
        let mut segments = root.clone();
        segments.extend(package.iter().cloned());
        segments.push(file.clone());
        let path = join(&segments);

        let split = split_namespaced_path(&path, &join(&package)).expect("consistent path splits");
        prop_assert_eq!(&split.directory, &join(&root));

        let mut expected_file = package.clone();
        expected_file.push(file);
        prop_assert_eq!(&split.file, &join(&expected_file));

        // Recombining yields the original path.
        prop_assert_eq!(format!("{}{}{}", split.directory, MAIN_SEPARATOR_STR, split.file), path);
    }

    #[test]
    fn split_rejects_files_outside_their_package(
        root in arb_segments(1, 4),
        package in arb_segments(1, 3),
        extra in "[0-9]{1,3}",
    ) {
        // The extra directory cannot be part of the lowercase package, so the file sits in a
        // sub-package and must not split.
        let mut segments = root;
        segments.extend(package.iter().cloned());
        segments.push(extra);
        segments.push("Foo.java".to_string());

        prop_assert!(split_namespaced_path(&join(&segments), &join(&package)).is_none());
    }
}
