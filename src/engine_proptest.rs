//! Property-based tests for the generation engine.
//!
//! These tests use proptest to generate random owner tables, remote URLs and
//! key paths and check that the engine's invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::entity::{parse_key_path, Entity, PathSegment};
    use crate::git::parse_repo_slug;
    use crate::owners::{synthesize_groups, OwnerRecord, OwnerTable};
    use crate::phases::emit::{emit, parse_documents};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn owner_records() -> impl Strategy<Value = Vec<OwnerRecord>> {
        prop::collection::vec(
            ("team-[a-e]", "group-[a-e]").prop_map(|(id, group)| OwnerRecord::new(id, group)),
            0..12,
        )
    }

    // ============================================================================
    // Ownership normalization
    // ============================================================================

    proptest! {
        /// Property: normalize returns the group of the first matching record
        #[test]
        fn normalize_returns_first_match(records in owner_records(), id in "team-[a-f]") {
            let table = OwnerTable::new(records.clone());
            let expected = records
                .iter()
                .find(|r| r.internal_owner_id == id)
                .map(|r| r.external_group_id.as_str());
            prop_assert_eq!(table.normalize(&id), expected);
        }

        /// Property: every reported duplicate occurs more than once
        #[test]
        fn duplicates_occur_more_than_once(records in owner_records()) {
            let table = OwnerTable::new(records.clone());
            for id in table.duplicate_owner_ids() {
                let count = records.iter().filter(|r| r.internal_owner_id == id).count();
                prop_assert!(count > 1, "'{}' reported as duplicate with {} occurrence(s)", id, count);
            }
        }
    }

    // ============================================================================
    // Group synthesis
    // ============================================================================

    proptest! {
        /// Property: synthesis is idempotent
        #[test]
        fn group_synthesis_is_idempotent(records in owner_records()) {
            let table = OwnerTable::new(records);
            prop_assert_eq!(
                synthesize_groups(&table).unwrap(),
                synthesize_groups(&table).unwrap()
            );
        }

        /// Property: exactly one group per distinct external id
        #[test]
        fn one_group_per_distinct_external_id(records in owner_records()) {
            let distinct: HashSet<_> = records.iter().map(|r| r.external_group_id.clone()).collect();
            let groups = synthesize_groups(&OwnerTable::new(records)).unwrap();
            prop_assert_eq!(groups.len(), distinct.len());

            let names: HashSet<_> = groups.iter().filter_map(Entity::name).map(str::to_string).collect();
            prop_assert_eq!(names, distinct);
        }

        /// Property: emitted groups parse back to the same entities
        #[test]
        fn emitted_groups_round_trip(records in owner_records()) {
            let groups = synthesize_groups(&OwnerTable::new(records)).unwrap();
            let parsed = parse_documents(&emit(&groups).unwrap()).unwrap();
            prop_assert_eq!(parsed, groups);
        }
    }

    // ============================================================================
    // Repository slug parsing
    // ============================================================================

    proptest! {
        /// Property: HTTPS and SCP-style remotes yield the same org/repo slug
        #[test]
        fn slug_from_https_and_scp_agree(
            host in "[a-z]{3,10}\\.(com|org|io)",
            org in "[a-zA-Z0-9_-]{1,15}",
            repo in "[a-zA-Z0-9_-]{1,15}",
            suffix in prop::bool::ANY,
        ) {
            let git = if suffix { ".git" } else { "" };
            let https = format!("https://{}/{}/{}{}", host, org, repo, git);
            let scp = format!("git@{}:{}/{}{}", host, org, repo, git);
            let expected = Some(format!("{}/{}", org, repo));

            prop_assert_eq!(parse_repo_slug(&https).unwrap(), expected.clone());
            prop_assert_eq!(parse_repo_slug(&scp).unwrap(), expected);
        }
    }

    // ============================================================================
    // Key paths
    // ============================================================================

    proptest! {
        /// Property: plain dotted paths split into one key per component
        #[test]
        fn dotted_path_splits_on_dots(parts in prop::collection::vec("[a-zA-Z][a-zA-Z0-9_-]{0,8}", 1..5)) {
            let path = parts.join(".");
            let expected: Vec<_> = parts.iter().cloned().map(PathSegment::Key).collect();
            prop_assert_eq!(parse_key_path(&path), expected);
        }

        /// Property: a value set at a path can be read back at that path
        #[test]
        fn set_then_get(parts in prop::collection::vec("[a-z]{1,6}", 1..4), value in "[a-zA-Z0-9 ]{0,20}") {
            let path = parts.join(".");
            let mut entity = Entity::new();
            entity.set(&path, value.as_str()).unwrap();
            prop_assert_eq!(entity.get_str(&path), Some(value.as_str()));
        }
    }
}
