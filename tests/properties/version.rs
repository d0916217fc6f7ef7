//! Property tests for version ordering.

use std::cmp::Ordering;

use proptest::prelude::*;

use plugpack::domain::value_objects::Version;

fn numeric() -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::vec(0u32..50, 1..5)
}

fn dotted(parts: &[u32]) -> String {
    parts
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Parsing never panics.
    #[test]
    fn property_parse_never_panics(s in "(?s).{0,64}") {
        let _ = Version::parse(&s);
    }

    /// PROPERTY: Purely numeric versions order like their number lists
    /// once trailing zeros are ignored.
    #[test]
    fn property_numeric_order(a in numeric(), b in numeric()) {
        let trim = |v: &[u32]| {
            let mut v = v.to_vec();
            while v.len() > 1 && v.last() == Some(&0) {
                v.pop();
            }
            v
        };
        let expected = trim(&a).cmp(&trim(&b));
        let actual = Version::parse(&dotted(&a)).cmp(&Version::parse(&dotted(&b)));
        prop_assert_eq!(actual, expected, "{} vs {}", dotted(&a), dotted(&b));
    }

    /// PROPERTY: Ordering is antisymmetric for arbitrary version strings.
    #[test]
    fn property_antisymmetric(a in "[0-9a-z.-]{1,16}", b in "[0-9a-z.-]{1,16}") {
        let (va, vb) = (Version::parse(&a), Version::parse(&b));
        prop_assert_eq!(va.cmp(&vb), vb.cmp(&va).reverse());
    }

    /// PROPERTY: A release sorts after its own pre-releases.
    #[test]
    fn property_release_after_prerelease(
        a in numeric(),
        qualifier in prop_oneof![Just("alpha"), Just("beta"), Just("rc"), Just("snapshot")],
        n in 1u32..5,
    ) {
        let release = dotted(&a);
        let pre = format!("{}-{}{}", release, qualifier, n);
        prop_assert_eq!(
            Version::parse(&pre).cmp(&Version::parse(&release)),
            Ordering::Less,
            "{} vs {}", pre, release
        );
    }
}
