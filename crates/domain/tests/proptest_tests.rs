//! Property-based tests for domain value objects and entities
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::Application;
use domain::value_objects::Number;
use proptest::prelude::*;

proptest! {
    #[test]
    fn number_round_trips_through_u64(n in 1u64..=u64::MAX) {
        let number = Number::new(n);
        prop_assert_eq!(number.get(), n);
        prop_assert_eq!(u64::from(number), n);
    }

    #[test]
    fn numbers_order_like_their_raw_values(a in 1u64..1_000_000, b in 1u64..1_000_000) {
        let na = Number::new(a);
        let nb = Number::new(b);
        prop_assert_eq!(na.cmp(&nb), a.cmp(&b));
    }

    #[test]
    fn application_create_rejects_all_whitespace_names(
        ws in "[ \t\n]{0,20}"
    ) {
        prop_assert!(Application::create(ws).is_err());
    }

    #[test]
    fn application_create_accepts_any_non_blank_name(
        name in "[a-zA-Z0-9 ]{1,100}"
    ) {
        prop_assume!(!name.trim().is_empty());
        let app = Application::create(name.clone()).unwrap();
        prop_assert_eq!(app.name, name);
    }
}
