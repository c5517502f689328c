//! Property coverage for the validation pass.

use fieldcheck_registry::{Candidate, FieldValue, ValidationRule, ValidatorRegistry};
use proptest::prelude::*;

fn single_rule(rule: ValidationRule) -> ValidatorRegistry {
    let mut registry = ValidatorRegistry::new();
    registry.register("Item", "value", rule);
    registry
}

fn item(value: FieldValue) -> Candidate {
    Candidate::new("Item").with_field("value", value)
}

fn any_field_value() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        Just(FieldValue::Undefined),
        Just(FieldValue::Null),
        any::<bool>().prop_map(FieldValue::Bool),
        any::<f64>().prop_map(FieldValue::Number),
        ".{0,12}".prop_map(FieldValue::Text),
        (0_usize..4).prop_map(FieldValue::List),
        (0_usize..4).prop_map(FieldValue::Object),
    ]
}

#[test]
fn required_rejects_the_empty_values() {
    let registry = single_rule(ValidationRule::Required);

    for empty in [
        FieldValue::Text(String::new()),
        FieldValue::Number(0.0),
        FieldValue::Null,
        FieldValue::Undefined,
    ] {
        assert!(!registry.validate(&item(empty.clone())), "{empty:?}");
    }
    assert!(!registry.validate(&Candidate::new("Item")));
}

proptest! {
    #[test]
    fn unregistered_classes_always_validate(
        class in "[A-Z][a-z]{0,8}",
        value in any_field_value(),
    ) {
        let registry = ValidatorRegistry::new();
        let candidate = Candidate::new(class).with_field("value", value);
        prop_assert!(registry.validate(&candidate));
    }

    #[test]
    fn required_accepts_non_empty_text(text in ".{1,24}") {
        let registry = single_rule(ValidationRule::Required);
        prop_assert!(registry.validate(&item(FieldValue::Text(text))));
    }

    #[test]
    fn required_accepts_non_zero_numbers(number in any::<f64>()) {
        prop_assume!(number != 0.0 && !number.is_nan());
        let registry = single_rule(ValidationRule::Required);
        prop_assert!(registry.validate(&item(FieldValue::Number(number))));
    }

    #[test]
    fn positive_matches_strict_greater_than_zero(number in any::<f64>()) {
        let registry = single_rule(ValidationRule::Positive);
        let expected = number > 0.0;
        prop_assert_eq!(registry.validate(&item(FieldValue::Number(number))), expected);
    }

    #[test]
    fn duplicate_registration_never_changes_outcome(
        rule in prop_oneof![Just(ValidationRule::Required), Just(ValidationRule::Positive)],
        value in any_field_value(),
    ) {
        let once = single_rule(rule);
        let mut twice = single_rule(rule);
        twice.register("Item", "value", rule);

        let candidate = item(value);
        prop_assert_eq!(once.validate(&candidate), twice.validate(&candidate));
        prop_assert_eq!(twice.rules_for("Item", "value").len(), 2);
    }

    #[test]
    fn violations_are_empty_exactly_when_valid(
        title in any_field_value(),
        price in any_field_value(),
    ) {
        let mut registry = ValidatorRegistry::new();
        registry.register("Course", "title", ValidationRule::Required);
        registry.register("Course", "price", ValidationRule::Positive);

        let candidate = Candidate::new("Course")
            .with_field("title", title)
            .with_field("price", price);
        prop_assert_eq!(
            registry.validate(&candidate),
            registry.violations(&candidate).is_empty()
        );
    }
}
