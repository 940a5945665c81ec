//! Payload validation for create and update operations.
//!
//! Both checks are pure: they inspect a raw JSON payload against the current
//! list and either reject it or produce a typed result. Storage backends
//! never re-validate; any backend behind the same facade enforces identical
//! semantics because the decision is made here.
//!
//! Presence rule: a field value of `null`, `false`, `0`, `0.0`, or `""` is
//! treated as absent. Zero quantities and zero prices are therefore rejected
//! at creation and update; a zero-quantity entry should be deleted instead.
//! Likewise `purchased` can only be set to `true` through an update; the
//! check-off operation is the way to clear it.

use serde_json::Value;

use crate::core::item::{FieldUpdate, GroceryItem, GroceryList, ItemField};
use crate::error::{PantryError, Result};

/// Check a proposed item name: one or more ASCII letters, nothing else.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic())
}

/// A value the presence rule treats as absent.
fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Interpret a JSON value as a non-negative integer quantity.
///
/// Accepts integer-valued floats (`2.0`) but rejects fractions, negatives,
/// and non-numbers.
fn as_quantity(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    match value.as_f64() {
        Some(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 => Some(f as u64),
        _ => None,
    }
}

/// Interpret a JSON value as a non-negative finite price.
fn as_price(value: &Value) -> Option<f64> {
    match value.as_f64() {
        Some(f) if f.is_finite() && f >= 0.0 => Some(f),
        _ => None,
    }
}

/// Validate a creation payload against the current list.
///
/// The payload must be a JSON object whose keys are a subset of
/// `{name, quantity, price, purchased}`, with `purchased` the only optional
/// key. On success returns the normalized item, with `purchased` defaulting
/// to `false`.
pub fn validate_create(payload: &Value, list: &GroceryList) -> Result<GroceryItem> {
    let obj = payload
        .as_object()
        .ok_or_else(|| PantryError::invalid_object("payload is not an object"))?;

    for key in obj.keys() {
        if ItemField::parse(key).is_none() {
            return Err(PantryError::invalid_object(format!(
                "unknown field '{}'",
                key
            )));
        }
    }
    if obj.len() < 3 || obj.len() > 4 {
        return Err(PantryError::invalid_object(
            "expected name, quantity, price and optionally purchased",
        ));
    }

    if let Some(purchased) = obj.get("purchased") {
        if !purchased.is_boolean() {
            return Err(PantryError::invalid_object("purchased must be a boolean"));
        }
    }

    for field in ["name", "quantity", "price"] {
        if is_absent(obj.get(field)) {
            return Err(PantryError::invalid_object(format!("{} is missing", field)));
        }
    }

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .filter(|s| is_valid_name(s))
        .ok_or_else(|| PantryError::invalid_object("name must be letters only"))?;

    if list.contains(name) {
        return Err(PantryError::invalid_object(format!(
            "an item named {} already exists",
            name
        )));
    }

    let quantity = obj
        .get("quantity")
        .and_then(as_quantity)
        .ok_or_else(|| PantryError::invalid_object("quantity must be a non-negative integer"))?;

    let price = obj
        .get("price")
        .and_then(as_price)
        .ok_or_else(|| PantryError::invalid_object("price must be a non-negative number"))?;

    let purchased = obj
        .get("purchased")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    Ok(GroceryItem {
        name: name.to_string(),
        quantity,
        price,
        purchased,
    })
}

/// Validate an update payload for the named item.
///
/// The payload must be an object with exactly the two keys `property` and
/// `value`, both present under the presence rule. Fails with `NotFound` when
/// the target name is absent from the list, and `InvalidUpdateObject` for
/// every payload problem.
pub fn validate_update(target: &str, payload: &Value, list: &GroceryList) -> Result<FieldUpdate> {
    if !list.contains(target) {
        return Err(PantryError::not_found(target));
    }

    let obj = payload
        .as_object()
        .ok_or_else(|| PantryError::invalid_update("payload is not an object"))?;

    if obj.len() != 2 || !obj.contains_key("property") || !obj.contains_key("value") {
        return Err(PantryError::invalid_update(
            "expected exactly property and value",
        ));
    }
    if is_absent(obj.get("property")) || is_absent(obj.get("value")) {
        return Err(PantryError::invalid_update("property and value required"));
    }

    let field = obj
        .get("property")
        .and_then(Value::as_str)
        .and_then(ItemField::parse)
        .ok_or_else(|| PantryError::invalid_update("unknown property"))?;

    let value = &obj["value"];
    match field {
        ItemField::Name => {
            let name = value
                .as_str()
                .filter(|s| is_valid_name(s))
                .ok_or_else(|| PantryError::invalid_update("name must be letters only"))?;
            if name != target && list.contains(name) {
                return Err(PantryError::invalid_update(format!(
                    "an item named {} already exists",
                    name
                )));
            }
            Ok(FieldUpdate::Name(name.to_string()))
        }
        ItemField::Quantity => as_quantity(value)
            .map(FieldUpdate::Quantity)
            .ok_or_else(|| PantryError::invalid_update("quantity must be a non-negative integer")),
        ItemField::Price => as_price(value)
            .map(FieldUpdate::Price)
            .ok_or_else(|| PantryError::invalid_update("price must be a non-negative number")),
        ItemField::Purchased => value
            .as_bool()
            .map(FieldUpdate::Purchased)
            .ok_or_else(|| PantryError::invalid_update("purchased must be a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn list_with_apple() -> GroceryList {
        let mut list = GroceryList::new();
        list.add(GroceryItem::new("apple", 2, 1.88));
        list
    }

    fn assert_invalid_object(result: Result<GroceryItem>) {
        assert!(matches!(
            result.unwrap_err(),
            PantryError::InvalidObject { .. }
        ));
    }

    fn assert_invalid_update(result: Result<FieldUpdate>) {
        assert!(matches!(
            result.unwrap_err(),
            PantryError::InvalidUpdateObject { .. }
        ));
    }

    // validate_create

    #[test]
    fn test_create_valid_item() {
        let item = validate_create(
            &json!({"name": "apple", "quantity": 2, "price": 1.88}),
            &GroceryList::new(),
        )
        .unwrap();

        assert_eq!(item.name, "apple");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price, 1.88);
        assert!(!item.purchased);
    }

    #[test]
    fn test_create_with_explicit_purchased() {
        let item = validate_create(
            &json!({"name": "apple", "quantity": 2, "price": 1.88, "purchased": true}),
            &GroceryList::new(),
        )
        .unwrap();
        assert!(item.purchased);
    }

    #[test]
    fn test_create_rejects_non_object() {
        for payload in [json!(null), json!("apple"), json!(42), json!([1, 2])] {
            assert_invalid_object(validate_create(&payload, &GroceryList::new()));
        }
    }

    #[test]
    fn test_create_rejects_missing_fields() {
        let payloads = [
            json!({"name": "apple", "dummy1": true, "dummy2": true}),
            json!({"price": 2.99, "dummy1": true, "dummy2": true}),
            json!({"quantity": 23, "dummy1": true, "dummy2": true}),
            json!({"name": "apple", "quantity": 2}),
        ];
        for payload in payloads {
            assert_invalid_object(validate_create(&payload, &GroceryList::new()));
        }
    }

    #[test]
    fn test_create_rejects_extra_fields() {
        let payloads = [
            json!({"name": "apple", "quantity": 2, "price": 1.88, "purchased": false, "doesNotExist": true}),
            json!({"name": "apple", "quantity": 2, "price": 1.88, "doesNotExist": true}),
        ];
        for payload in payloads {
            assert_invalid_object(validate_create(&payload, &GroceryList::new()));
        }
    }

    #[test]
    fn test_create_rejects_non_boolean_purchased() {
        assert_invalid_object(validate_create(
            &json!({"name": "apple", "quantity": 2, "price": 1.88, "purchased": "yes"}),
            &GroceryList::new(),
        ));
    }

    #[test]
    fn test_create_rejects_duplicate_name() {
        assert_invalid_object(validate_create(
            &json!({"name": "apple", "quantity": 2, "price": 1.88}),
            &list_with_apple(),
        ));
    }

    #[test]
    fn test_create_rejects_bad_names() {
        for name in [json!(2), json!("2apple"), json!("app-le"), json!("app le")] {
            assert_invalid_object(validate_create(
                &json!({"name": name, "quantity": 2, "price": 1.88}),
                &GroceryList::new(),
            ));
        }
    }

    #[test]
    fn test_create_rejects_bad_quantities() {
        for quantity in [json!("two"), json!("1-"), json!("#"), json!(-1), json!(2.5)] {
            assert_invalid_object(validate_create(
                &json!({"name": "apple", "quantity": quantity, "price": 1.88}),
                &GroceryList::new(),
            ));
        }
    }

    #[test]
    fn test_create_rejects_bad_prices() {
        for price in [json!("one"), json!("$1"), json!(-1)] {
            assert_invalid_object(validate_create(
                &json!({"name": "apple", "quantity": 1, "price": price}),
                &GroceryList::new(),
            ));
        }
    }

    #[test]
    fn test_create_presence_rule_rejects_zero_values() {
        // 0 and 0.0 count as absent, so zero quantities and prices are
        // rejected rather than stored.
        assert_invalid_object(validate_create(
            &json!({"name": "apple", "quantity": 0, "price": 1.88}),
            &GroceryList::new(),
        ));
        assert_invalid_object(validate_create(
            &json!({"name": "apple", "quantity": 1, "price": 0.0}),
            &GroceryList::new(),
        ));
        assert_invalid_object(validate_create(
            &json!({"name": "", "quantity": 1, "price": 1.88}),
            &GroceryList::new(),
        ));
    }

    #[test]
    fn test_create_accepts_integer_valued_float_quantity() {
        let item = validate_create(
            &json!({"name": "apple", "quantity": 2.0, "price": 1.88}),
            &GroceryList::new(),
        )
        .unwrap();
        assert_eq!(item.quantity, 2);
    }

    // validate_update

    #[test]
    fn test_update_valid_payloads() {
        let list = list_with_apple();

        let update =
            validate_update("apple", &json!({"property": "name", "value": "orange"}), &list)
                .unwrap();
        assert_eq!(update, FieldUpdate::Name("orange".to_string()));

        let update =
            validate_update("apple", &json!({"property": "quantity", "value": 100}), &list)
                .unwrap();
        assert_eq!(update, FieldUpdate::Quantity(100));

        let update =
            validate_update("apple", &json!({"property": "price", "value": 100.0}), &list)
                .unwrap();
        assert_eq!(update, FieldUpdate::Price(100.0));

        let update =
            validate_update("apple", &json!({"property": "purchased", "value": true}), &list)
                .unwrap();
        assert_eq!(update, FieldUpdate::Purchased(true));
    }

    #[test]
    fn test_update_absent_target_is_not_found() {
        let err = validate_update(
            "apple",
            &json!({"property": "name", "value": "orange"}),
            &GroceryList::new(),
        )
        .unwrap_err();
        assert!(matches!(err, PantryError::NotFound { .. }));
    }

    #[test]
    fn test_update_rejects_malformed_payloads() {
        let list = list_with_apple();
        let payloads = [
            json!({"property": "name", "value": "steeeeeeve", "invalidParameter": true}),
            json!({"invalidEntry": "42069God", "value": 42}),
            json!({"property": "price", "invalidEntry": "black"}),
            json!({"property": "42069God", "value": "black"}),
            json!({"property": "name", "value": 2}),
            json!({"property": "quantity", "value": "steve"}),
            json!({"property": "price", "value": "steve"}),
            json!({"name": "orange"}),
            json!(null),
        ];
        for payload in payloads {
            assert_invalid_update(validate_update("apple", &payload, &list));
        }
    }

    #[test]
    fn test_update_presence_rule_rejects_falsy_values() {
        let list = list_with_apple();
        for value in [json!(false), json!(0), json!("")] {
            assert_invalid_update(validate_update(
                "apple",
                &json!({"property": "purchased", "value": value}),
                &list,
            ));
        }
    }

    #[test]
    fn test_update_rename_to_taken_name_fails() {
        let mut list = list_with_apple();
        list.add(GroceryItem::new("orange", 1, 0.69));

        assert_invalid_update(validate_update(
            "apple",
            &json!({"property": "name", "value": "orange"}),
            &list,
        ));
    }

    #[test]
    fn test_update_rename_to_self_is_allowed() {
        let list = list_with_apple();
        let update =
            validate_update("apple", &json!({"property": "name", "value": "apple"}), &list)
                .unwrap();
        assert_eq!(update, FieldUpdate::Name("apple".to_string()));
    }

    #[test]
    fn test_update_rejects_negative_values() {
        let list = list_with_apple();
        assert_invalid_update(validate_update(
            "apple",
            &json!({"property": "quantity", "value": -1}),
            &list,
        ));
        assert_invalid_update(validate_update(
            "apple",
            &json!({"property": "price", "value": -0.5}),
            &list,
        ));
    }

    proptest! {
        #[test]
        fn prop_letters_only_names_validate(name in "[A-Za-z]{1,24}") {
            prop_assert!(is_valid_name(&name));
        }

        #[test]
        fn prop_names_with_non_letters_are_rejected(
            prefix in "[A-Za-z]{0,8}",
            bad in "[0-9 _\\-]{1,4}",
            suffix in "[A-Za-z]{0,8}",
        ) {
            let name = format!("{}{}{}", prefix, bad, suffix);
            prop_assert!(!is_valid_name(&name));
        }
    }
}
