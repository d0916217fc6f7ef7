//! Property tests for archive entry name validation.

use proptest::prelude::*;

use plugpack::domain::value_objects::EntryPath;

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_$-][A-Za-z0-9._$-]{0,15}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Validation never panics on arbitrary input.
    #[test]
    fn property_parse_never_panics(s in "(?s).{0,256}") {
        let _ = EntryPath::parse(&s);
    }

    /// PROPERTY: An accepted name never escapes the archive root.
    #[test]
    fn property_accepted_names_are_contained(s in "[a-zA-Z0-9./\\\\:-]{0,64}") {
        if let Ok(path) = EntryPath::parse(&s) {
            let name = path.as_str();
            prop_assert!(!name.is_empty());
            prop_assert!(!name.starts_with('/'));
            prop_assert!(!name.contains('\\'));
            prop_assert!(name.split('/').all(|seg| !seg.is_empty() && seg != "." && seg != ".."));
        }
    }

    /// PROPERTY: Any `..` component is rejected wherever it appears.
    #[test]
    fn property_traversal_is_rejected(
        before in proptest::collection::vec(segment(), 0..4),
        after in proptest::collection::vec(segment(), 0..4),
    ) {
        let mut parts = before;
        parts.push("..".to_string());
        parts.extend(after);
        prop_assert!(EntryPath::parse(&parts.join("/")).is_err());
    }

    /// PROPERTY: Normalizing twice changes nothing.
    #[test]
    fn property_parse_is_idempotent(parts in proptest::collection::vec(segment(), 1..6)) {
        let raw = parts.join("//");
        if let Ok(first) = EntryPath::parse(&raw) {
            let second = EntryPath::parse(first.as_str()).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    /// PROPERTY: Every parent directory is a strict prefix of the entry.
    #[test]
    fn property_parent_dirs_are_prefixes(parts in proptest::collection::vec(segment(), 1..6)) {
        if let Ok(path) = EntryPath::parse(&parts.join("/")) {
            let parents = path.parent_dirs();
            prop_assert_eq!(parents.len(), path.as_str().matches('/').count());
            for dir in parents {
                prop_assert!(dir.ends_with('/'));
                prop_assert!(path.as_str().starts_with(&dir));
            }
        }
    }
}
