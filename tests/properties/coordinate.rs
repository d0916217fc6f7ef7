//! Property tests for dependency notation.

use proptest::prelude::*;

use plugpack::domain::value_objects::Coordinate;

fn group() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9]{0,8}(\\.[a-z][a-z0-9]{0,8}){0,3}").unwrap()
}

fn name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-zA-Z][a-zA-Z0-9_-]{0,16}").unwrap()
}

fn version() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[0-9]{1,3}(\\.[0-9]{1,3}){0,3}(-[A-Za-z0-9]{1,8})?").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Parsing never panics on arbitrary notation.
    #[test]
    fn property_parse_never_panics(s in "(?s).{0,128}") {
        let _ = s.parse::<Coordinate>();
    }

    /// PROPERTY: The repository path mirrors the Maven layout.
    #[test]
    fn property_repository_path_layout(g in group(), a in name(), v in version()) {
        let coord: Coordinate = format!("{}:{}:{}", g, a, v).parse().unwrap();
        let path = coord.repository_path();

        let expected_prefix = format!("{}/{}/{}/", g.replace('.', "/"), a, v);
        prop_assert!(path.starts_with(&expected_prefix), "{}", path);
        prop_assert!(path.ends_with(&format!("{}-{}.jar", a, v)), "{}", path);
        prop_assert!(!path.starts_with('/'));

        let pom = coord.pom().repository_path();
        prop_assert!(pom.ends_with(&format!("{}-{}.pom", a, v)), "{}", pom);
        let pom_coord = coord.pom();
        prop_assert_eq!(pom_coord.module(), coord.module());
    }

    /// PROPERTY: Display yields notation that parses to the same coordinate.
    #[test]
    fn property_display_is_parseable(
        g in group(),
        a in name(),
        v in version(),
        classifier in proptest::option::of(name()),
    ) {
        let notation = match &classifier {
            Some(c) => format!("{}:{}:{}:{}", g, a, v, c),
            None => format!("{}:{}:{}", g, a, v),
        };
        let coord: Coordinate = notation.parse().unwrap();
        prop_assert_eq!(coord.to_string(), notation);
        prop_assert_eq!(coord.classifier(), classifier.as_deref());
    }

    /// PROPERTY: Any notation that parses lays out below the repository root.
    #[test]
    fn property_parsed_paths_stay_inside_repository(s in "[a-z.:/\\\\@-]{0,24}") {
        if let Ok(coord) = s.parse::<Coordinate>() {
            let path = coord.repository_path();
            prop_assert!(!path.starts_with('/'), "{}", path);
            prop_assert!(!path.contains('\\'), "{}", path);
            prop_assert!(
                path.split('/').all(|part| !part.is_empty() && part != "." && part != ".."),
                "{}",
                path
            );
        }
    }

    /// PROPERTY: Fewer than three segments is always rejected.
    #[test]
    fn property_missing_version_is_rejected(g in group(), a in name()) {
        let missing_version = format!("{}:{}", g, a);
        prop_assert!(missing_version.parse::<Coordinate>().is_err());
    }
}
