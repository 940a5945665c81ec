//! Grocery item and list types.
//!
//! A [`GroceryItem`] is fully defined by its four fields; the name doubles as
//! the item's identity, so renaming is an ordinary field update that the
//! validation layer re-checks for uniqueness. Field assignment goes through
//! the closed [`FieldUpdate`] enum, so there is no way to address a field
//! outside the four known ones.

use serde::{Deserialize, Serialize};

use crate::error::{PantryError, Result};

/// A single grocery entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroceryItem {
    /// Item name, unique within a list. ASCII letters only.
    pub name: String,
    /// Units to buy.
    pub quantity: u64,
    /// Price per unit.
    pub price: f64,
    /// Whether the item has been checked off.
    #[serde(default)]
    pub purchased: bool,
}

impl GroceryItem {
    /// Create a new unpurchased item.
    pub fn new(name: impl Into<String>, quantity: u64, price: f64) -> Self {
        Self {
            name: name.into(),
            quantity,
            price,
            purchased: false,
        }
    }

    /// Render the item as a console block, one line per field.
    pub fn render(&self) -> String {
        format!(
            "|------------------------------------\n\
             | name: {}\n\
             | quantity: {}\n\
             | price: {}\n\
             | purchased: {}\n\
             |------------------------------------\n",
            self.name, self.quantity, self.price, self.purchased
        )
    }

    /// Apply a single validated field update.
    pub fn apply(&mut self, update: &FieldUpdate) {
        match update {
            FieldUpdate::Name(name) => self.name = name.clone(),
            FieldUpdate::Quantity(quantity) => self.quantity = *quantity,
            FieldUpdate::Price(price) => self.price = *price,
            FieldUpdate::Purchased(purchased) => self.purchased = *purchased,
        }
    }
}

/// The closed set of item fields addressable by an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemField {
    Name,
    Quantity,
    Price,
    Purchased,
}

/// All item fields, in serialization order.
pub const ITEM_FIELDS: &[ItemField] = &[
    ItemField::Name,
    ItemField::Quantity,
    ItemField::Price,
    ItemField::Purchased,
];

impl ItemField {
    /// Parse a field name. Returns `None` for anything outside the four fields.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "quantity" => Some(Self::Quantity),
            "price" => Some(Self::Price),
            "purchased" => Some(Self::Purchased),
            _ => None,
        }
    }

    /// The field's wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Quantity => "quantity",
            Self::Price => "price",
            Self::Purchased => "purchased",
        }
    }
}

/// A validated single-field assignment.
///
/// Produced only by the validation layer; stores apply it without
/// re-checking.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Name(String),
    Quantity(u64),
    Price(f64),
    Purchased(bool),
}

impl FieldUpdate {
    /// The field this update assigns.
    pub fn field(&self) -> ItemField {
        match self {
            Self::Name(_) => ItemField::Name,
            Self::Quantity(_) => ItemField::Quantity,
            Self::Price(_) => ItemField::Price,
            Self::Purchased(_) => ItemField::Purchased,
        }
    }

    /// The new value as a JSON value, for wire encoding.
    pub fn value_json(&self) -> serde_json::Value {
        match self {
            Self::Name(name) => serde_json::Value::from(name.as_str()),
            Self::Quantity(quantity) => serde_json::Value::from(*quantity),
            Self::Price(price) => serde_json::Value::from(*price),
            Self::Purchased(purchased) => serde_json::Value::from(*purchased),
        }
    }
}

/// An ordered, name-unique collection of grocery items.
///
/// Insertion order is preserved for listing; lookup is a linear scan by
/// exact name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GroceryList {
    items: Vec<GroceryItem>,
}

impl GroceryList {
    /// Create a new empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// The items in insertion order.
    pub fn items(&self) -> &[GroceryItem] {
        &self.items
    }

    /// Number of items in the list.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find an item by exact name.
    pub fn get(&self, name: &str) -> Option<&GroceryItem> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Check whether an item with this exact name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Append an item. Uniqueness is the caller's responsibility.
    pub fn add(&mut self, item: GroceryItem) {
        self.items.push(item);
    }

    /// Remove the item with this name if present.
    ///
    /// Returns `true` if an item was removed. Removing an absent name is a
    /// no-op.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.name != name);
        self.items.len() != before
    }

    /// Apply a validated field update to the named item.
    ///
    /// Fails with `NotFound` when the name is absent.
    pub fn apply_update(&mut self, name: &str, update: &FieldUpdate) -> Result<()> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.name == name)
            .ok_or_else(|| PantryError::not_found(name))?;
        item.apply(update);
        Ok(())
    }

    /// Serialize the list as a JSON array. An empty list yields `"[]"`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.items)?)
    }

    /// Render the list for the console, striking through purchased items.
    pub fn render(&self) -> String {
        if self.items.is_empty() {
            return "Empty list\n".to_string();
        }

        let mut out = String::from("|------------------------------------\n");
        for (index, item) in self.items.iter().enumerate() {
            let line = format!(
                "item {}: {} - ${} [qty:{}]",
                index + 1,
                item.name,
                item.price,
                item.quantity
            );
            if item.purchased {
                out.push_str(&format!("| \x1b[9m{}\x1b[0m\n", line));
            } else {
                out.push_str(&format!("| {}\n", line));
            }
        }
        out.push_str("|------------------------------------\n");
        out
    }
}

impl From<Vec<GroceryItem>> for GroceryList {
    fn from(items: Vec<GroceryItem>) -> Self {
        Self { items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apple() -> GroceryItem {
        GroceryItem::new("apple", 2, 1.88)
    }

    #[test]
    fn test_new_item_is_unpurchased() {
        let item = apple();
        assert_eq!(item.name, "apple");
        assert_eq!(item.quantity, 2);
        assert!(!item.purchased);
    }

    #[test]
    fn test_item_serialization_shape() {
        let json = serde_json::to_string(&apple()).unwrap();
        assert_eq!(
            json,
            r#"{"name":"apple","quantity":2,"price":1.88,"purchased":false}"#
        );
    }

    #[test]
    fn test_item_deserialize_defaults_purchased() {
        let item: GroceryItem =
            serde_json::from_str(r#"{"name":"apple","quantity":2,"price":1.88}"#).unwrap();
        assert!(!item.purchased);
    }

    #[test]
    fn test_apply_each_field() {
        let mut item = apple();

        item.apply(&FieldUpdate::Quantity(5));
        assert_eq!(item.quantity, 5);

        item.apply(&FieldUpdate::Price(0.5));
        assert_eq!(item.price, 0.5);

        item.apply(&FieldUpdate::Purchased(true));
        assert!(item.purchased);

        item.apply(&FieldUpdate::Name("orange".to_string()));
        assert_eq!(item.name, "orange");
    }

    #[test]
    fn test_item_render_lists_fields() {
        let rendered = apple().render();
        assert!(rendered.contains("| name: apple"));
        assert!(rendered.contains("| quantity: 2"));
        assert!(rendered.contains("| price: 1.88"));
        assert!(rendered.contains("| purchased: false"));
    }

    #[test]
    fn test_field_parse_round_trip() {
        for field in ITEM_FIELDS {
            assert_eq!(ItemField::parse(field.as_str()), Some(*field));
        }
    }

    #[test]
    fn test_field_parse_rejects_unknown() {
        assert_eq!(ItemField::parse("doesNotExist"), None);
        assert_eq!(ItemField::parse("Name"), None);
        assert_eq!(ItemField::parse(""), None);
    }

    #[test]
    fn test_list_get_is_case_sensitive() {
        let mut list = GroceryList::new();
        list.add(apple());
        assert!(list.get("apple").is_some());
        assert!(list.get("Apple").is_none());
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let mut list = GroceryList::new();
        list.add(GroceryItem::new("apple", 2, 1.88));
        list.add(GroceryItem::new("mango", 5, 4.20));
        list.add(GroceryItem::new("orange", 1, 0.69));

        let names: Vec<&str> = list.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["apple", "mango", "orange"]);
    }

    #[test]
    fn test_list_remove_absent_is_noop() {
        let mut list = GroceryList::new();
        list.add(apple());
        assert!(!list.remove("mango"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_list_apply_update_absent_fails() {
        let mut list = GroceryList::new();
        let err = list
            .apply_update("apple", &FieldUpdate::Quantity(3))
            .unwrap_err();
        assert!(matches!(err, PantryError::NotFound { .. }));
    }

    #[test]
    fn test_empty_list_serializes_to_brackets() {
        assert_eq!(GroceryList::new().to_json().unwrap(), "[]");
    }

    #[test]
    fn test_list_to_json_ordered() {
        let mut list = GroceryList::new();
        list.add(apple());
        assert_eq!(
            list.to_json().unwrap(),
            r#"[{"name":"apple","quantity":2,"price":1.88,"purchased":false}]"#
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(GroceryList::new().render(), "Empty list\n");
    }

    #[test]
    fn test_render_strikes_purchased() {
        let mut list = GroceryList::new();
        let mut item = apple();
        item.purchased = true;
        list.add(item);
        list.add(GroceryItem::new("mango", 5, 4.20));

        let rendered = list.render();
        assert!(rendered.contains("\x1b[9m"));
        assert!(rendered.contains("item 1: apple"));
        assert!(rendered.contains("item 2: mango - $4.2 [qty:5]"));
    }
}
