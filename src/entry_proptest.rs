//! Property-based tests for URI normalization and conflict detection.

#[cfg(test)]
mod proptest_tests {
    use crate::entry::{normalize_uri, VcsEntry};
    use crate::test_support::MockClient;
    use proptest::prelude::*;

    proptest! {
        /// Property: any number of trailing slashes normalizes away
        #[test]
        fn trailing_slashes_are_stripped(base in "[a-z]{1,8}://[a-z]{1,8}(/[a-z0-9]{1,8}){0,3}", slashes in 0usize..5) {
            let uri = format!("{}{}", base, "/".repeat(slashes));
            prop_assert_eq!(normalize_uri(&uri), base.as_str());
        }

        /// Property: normalization is idempotent
        #[test]
        fn normalize_uri_is_idempotent(uri in ".*") {
            let once = normalize_uri(&uri);
            prop_assert_eq!(normalize_uri(once), once);
        }

        /// Property: the stored uri never ends with a slash
        #[test]
        fn stored_uri_has_no_trailing_slash(base in "[a-z]{1,8}://[a-z]{1,8}/[a-z]{1,8}", slashes in 0usize..5) {
            let uri = format!("{}{}", base, "/".repeat(slashes));
            let entry = VcsEntry::new("/ws/foo", "foo", &uri, "", Box::new(MockClient::missing("/ws/foo"))).unwrap();
            prop_assert!(!entry.uri().ends_with('/'));
            prop_assert_eq!(entry.uri(), base.as_str());
        }

        /// Property: a driver url matches the manifest uri regardless of
        /// trailing slashes on either side
        #[test]
        fn trailing_slashes_never_cause_a_conflict(
            base in "[a-z]{1,8}://[a-z]{1,8}/[a-z]{1,8}",
            manifest_slashes in 0usize..4,
            driver_slashes in 0usize..4,
        ) {
            let uri = format!("{}{}", base, "/".repeat(manifest_slashes));
            let url = format!("{}{}", base, "/".repeat(driver_slashes));
            let client = MockClient::matching("/ws/foo", &url);
            let entry = VcsEntry::new("/ws/foo", "foo", &uri, "", Box::new(client)).unwrap();
            prop_assert_eq!(entry.detect_conflict().unwrap(), None);
        }

        /// Property: a different driver url is always a conflict
        #[test]
        fn different_url_is_a_conflict(
            base in "[a-z]{1,8}://[a-z]{1,8}/[a-z]{1,8}",
            suffix in "[a-z0-9]{1,4}",
        ) {
            let client = MockClient::matching("/ws/foo", &format!("{}{}", base, suffix));
            let entry = VcsEntry::new("/ws/foo", "foo", &base, "", Box::new(client)).unwrap();
            prop_assert!(entry.detect_conflict().unwrap().is_some());
        }
    }
}
