//! Property-based tests for project naming and path matching.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{is_under, join_slash, project_name, workspace_from_tfvars};
    use crate::phases::filter::ProjectFilter;
    use proptest::prelude::*;

    /// Relative directory paths such as `a/b-c/d`.
    fn dir_path() -> impl Strategy<Value = String> {
        prop::collection::vec("[a-z0-9][a-z0-9_-]{0,8}", 1..5).prop_map(|parts| parts.join("/"))
    }

    // ============================================================================
    // project_name property tests
    // ============================================================================

    proptest! {
        /// Property: project names never contain a slash
        #[test]
        fn project_name_has_no_slash(dir in dir_path(), workspace in "[a-z0-9]{1,8}") {
            prop_assert!(!project_name(&dir, &workspace).contains('/'));
        }

        /// Property: the default workspace adds no suffix
        #[test]
        fn project_name_default_workspace_is_dir(dir in dir_path()) {
            prop_assert_eq!(project_name(&dir, "default"), dir.replace('/', "-"));
        }

        /// Property: any other workspace is appended after a dash
        #[test]
        fn project_name_appends_workspace(dir in dir_path(), workspace in "[a-z0-9]{1,8}") {
            prop_assume!(workspace != "default");
            let name = project_name(&dir, &workspace);
            let expected_suffix = format!("-{}", workspace);
            prop_assert!(name.ends_with(&expected_suffix));
            prop_assert_eq!(name.len(), dir.len() + workspace.len() + 1);
        }

        /// Property: naming is deterministic
        #[test]
        fn project_name_is_deterministic(dir in dir_path(), workspace in "[a-z]{1,8}") {
            prop_assert_eq!(project_name(&dir, &workspace), project_name(&dir, &workspace));
        }
    }

    // ============================================================================
    // is_under / join_slash property tests
    // ============================================================================

    proptest! {
        /// Property: a child joined onto a directory is under it
        #[test]
        fn joined_child_is_under_dir(dir in dir_path(), child in dir_path()) {
            prop_assert!(is_under(&join_slash(&dir, &child), &dir));
        }

        /// Property: a sibling sharing a name prefix is not under the directory
        #[test]
        fn prefix_sibling_is_not_under(dir in dir_path(), suffix in "[a-z0-9-]{1,4}", file in "[a-z]{1,8}\\.tf") {
            let sibling = format!("{}{}/{}", dir, suffix, file);
            prop_assert!(!is_under(&sibling, &dir));
        }

        /// Property: a directory is not under itself
        #[test]
        fn dir_is_not_under_itself(dir in dir_path()) {
            prop_assert!(!is_under(&dir, &dir));
        }

        /// Property: everything non-empty is under the base directory
        #[test]
        fn everything_is_under_base(file in dir_path()) {
            prop_assert!(is_under(&file, "."));
            prop_assert_eq!(join_slash(".", &file), file);
        }
    }

    // ============================================================================
    // workspace_from_tfvars property tests
    // ============================================================================

    proptest! {
        /// Property: the workspace is the file stem
        #[test]
        fn tfvars_stem_is_workspace(stem in "[a-zA-Z0-9_-]{1,12}") {
            let file = format!("{}.tfvars", stem);
            prop_assert_eq!(workspace_from_tfvars(&file), Some(stem.as_str()));
        }

        /// Property: files without the extension are never workspaces
        #[test]
        fn non_tfvars_is_not_workspace(name in "[a-z]{1,8}\\.(tf|json|yaml)") {
            prop_assert_eq!(workspace_from_tfvars(&name), None);
        }
    }

    // ============================================================================
    // ProjectFilter property tests
    // ============================================================================

    proptest! {
        /// Property: an empty filter keeps every name
        #[test]
        fn empty_filter_keeps_everything(name in "[a-z0-9-]{0,20}") {
            let filter = ProjectFilter::new("", "").unwrap();
            prop_assert!(filter.matches(&name));
        }

        /// Property: excluding a literal name always drops it
        #[test]
        fn exclude_literal_drops_name(name in "[a-z0-9-]{1,20}") {
            let filter = ProjectFilter::new("", &format!("^{}$", regex::escape(&name))).unwrap();
            prop_assert!(!filter.matches(&name));
        }

        /// Property: exclusion wins over inclusion
        #[test]
        fn exclude_wins_over_include(name in "[a-z0-9-]{1,20}") {
            let filter = ProjectFilter::new(".*", ".*").unwrap();
            prop_assert!(!filter.matches(&name));
        }
    }
}
