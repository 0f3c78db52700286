//! Property-based roundtrip tests for the identifier text form.
//!
//! Uses proptest to generate arbitrary identifiers and verify that
//! serializing to text and parsing back produces an equal identifier.
//! Qualifier inheritance means consecutive segments sharing a qualifier
//! are written only once, so the text form is also checked for minimality.
#![cfg(feature = "proptest")]

use jgraph::{Identifier, IdentifierBuilder};
use proptest::prelude::*;

// ============================================================================
// PROPTEST STRATEGIES
// ============================================================================

/// Prefixes may contain `:` and `.` but never `#`.
fn arb_prefix() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        "[a-z]{0,6}".prop_map(Some),
        "[a-z]{1,5}:[a-z.]{0,8}".prop_map(Some),
    ]
}

/// Small qualifier alphabet so that runs of equal qualifiers are common.
fn arb_qualifier() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("package".to_string()),
        Just("type".to_string()),
        Just("method".to_string()),
        Just("signature".to_string()),
        "[a-z]{1,8}",
    ]
}

/// Fragments may be empty (anonymous segments).
fn arb_fragment() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_$()<>-]{0,10}"
}

fn arb_identifier() -> impl Strategy<Value = Identifier> {
    (
        arb_prefix(),
        prop::collection::vec((arb_qualifier(), arb_fragment()), 0..8),
    )
        .prop_map(|(prefix, segments)| {
            let mut builder = IdentifierBuilder::new(prefix.as_deref()).unwrap();
            for (qualifier, fragment) in &segments {
                builder.push(qualifier, fragment).unwrap();
            }
            builder.build()
        })
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn test_text_roundtrip(id in arb_identifier()) {
        let text = id.to_string();
        let back = Identifier::parse(&text).unwrap();
        prop_assert_eq!(&back, &id);
        prop_assert_eq!(back.to_string(), text);
    }

    #[test]
    fn test_qualifier_written_once_per_run(id in arb_identifier()) {
        let text = id.to_string();
        let body = match id.prefix() {
            Some(prefix) => &text[prefix.len() + 1..],
            None => text.as_str(),
        };
        let runs = id
            .segments()
            .windows(2)
            .filter(|pair| pair[0].qualifier() != pair[1].qualifier())
            .count()
            + usize::from(!id.is_empty());
        prop_assert_eq!(body.matches(':').count(), runs);
    }

    #[test]
    fn test_parent_child_inverse(
        id in arb_identifier(),
        qualifier in arb_qualifier(),
        fragment in arb_fragment(),
    ) {
        let child = id.child(&qualifier, &fragment).unwrap();
        prop_assert!(child.is_within(&id));
        prop_assert_eq!(child.parent(), Some(id.clone()));
        prop_assert_eq!(child.tail().map(|s| s.fragment()), Some(fragment.as_str()));
    }
}
