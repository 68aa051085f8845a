//! Order and round-trip properties of `SemanticVersion`

use proptest::prelude::*;
use std::cmp::Ordering;
use updraft_core::SemanticVersion;

fn identifier() -> impl Strategy<Value = String> {
    prop_oneof![
        "[1-9][0-9]{0,3}",
        Just("0".to_string()),
        "[a-zA-Z-][0-9a-zA-Z-]{0,5}",
    ]
}

fn version_text() -> impl Strategy<Value = String> {
    (
        0u64..50,
        0u64..50,
        0u64..50,
        proptest::option::of(proptest::collection::vec(identifier(), 1..3)),
        proptest::option::of("[0-9a-zA-Z-]{1,6}"),
    )
        .prop_map(|(major, minor, patch, pre, build)| {
            let mut text = format!("{major}.{minor}.{patch}");
            if let Some(pre) = pre {
                text.push('-');
                text.push_str(&pre.join("."));
            }
            if let Some(build) = build {
                text.push('+');
                text.push_str(&build);
            }
            text
        })
}

fn version() -> impl Strategy<Value = SemanticVersion> {
    version_text().prop_map(|text| SemanticVersion::parse(&text).unwrap())
}

proptest! {
    #[test]
    fn display_round_trips(text in version_text()) {
        let parsed = SemanticVersion::parse(&text).unwrap();
        let reparsed = SemanticVersion::parse(&parsed.to_string()).unwrap();
        prop_assert_eq!(parsed, reparsed);
    }

    #[test]
    fn compare_is_antisymmetric(a in version(), b in version()) {
        prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        prop_assert_eq!(a.cmp(&b) == Ordering::Equal, a == b);
    }

    #[test]
    fn compare_is_transitive(a in version(), b in version(), c in version()) {
        if a <= b && b <= c {
            prop_assert!(a <= c);
        }
        if a < b && b < c {
            prop_assert!(a < c);
        }
    }

    #[test]
    fn release_outranks_its_pre_releases(
        major in 0u64..20,
        minor in 0u64..20,
        patch in 0u64..20,
        tag in "[a-z]{1,6}",
    ) {
        let release = SemanticVersion::new(major, minor, patch);
        let pre = SemanticVersion::parse(&format!("{major}.{minor}.{patch}-{tag}")).unwrap();
        prop_assert!(pre < release);
    }

    #[test]
    fn two_component_versions_never_parse(major in 0u64..1000, minor in 0u64..1000) {
        let text = format!("{}.{}", major, minor);
        prop_assert!(SemanticVersion::parse(&text).is_err());
    }
}

#[test]
fn documented_invalid_inputs_fail() {
    for input in ["11", "0.3", "0.3-123"] {
        assert!(SemanticVersion::parse(input).is_err(), "{input} should not parse");
    }
}
