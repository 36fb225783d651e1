//! Core data types for the shopping-list pipeline.
//!
//! Lines flow through the system as:
//!
//! ```text
//! RawLine ──parse──▶ ParsedItem ──categorize──▶ ParsedItem ──merge──▶ ShoppingItem
//! ```
//!
//! [`ParsedItem`]s are ephemeral and live for a single request.
//! [`ShoppingItem`]s are returned to the caller and owned by a
//! [`ListStore`](crate::store::ListStore) from then on.

use serde::{Deserialize, Serialize};

use crate::units::Unit;

/// Category given to items the category table does not know.
pub const UNCATEGORIZED: &str = "uncategorized";

/// One input line and its position in the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub text: String,
    pub position: usize,
}

impl RawLine {
    pub fn new(text: impl Into<String>, position: usize) -> Self {
        Self {
            text: text.into(),
            position,
        }
    }
}

/// The structured result of parsing one line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedItem {
    /// Lower-cased product name with quantity and unit stripped.
    pub name: String,
    /// Non-negative quantity; `1.0` when the line had none.
    pub quantity: f64,
    pub unit: Unit,
    pub category: String,
    /// The line as the user wrote it.
    pub raw_text: String,
    /// Input position, used for stable ordering.
    pub position: usize,
    /// Only set when a stored item is merged again.
    pub completed: bool,
    /// Id of the stored [`ShoppingItem`] this was derived from, if any.
    pub source_id: Option<String>,
}

impl ParsedItem {
    pub fn is_categorized(&self) -> bool {
        self.category != UNCATEGORIZED
    }

    /// Turn a stored item back into merge input.
    ///
    /// The item's notes (the raw texts it was merged from) become the raw
    /// text; items without notes get a rendered `"<qty> <unit> <name>"`.
    pub fn from_stored(item: &ShoppingItem, position: usize) -> Self {
        let raw_text = match &item.notes {
            Some(notes) if !notes.trim().is_empty() => notes.clone(),
            _ => item.describe(),
        };
        Self {
            name: item.name.clone(),
            quantity: item.quantity.max(0.0),
            unit: item.unit,
            category: item.category.clone(),
            raw_text,
            position,
            completed: item.completed,
            source_id: Some(item.id.clone()),
        }
    }
}

/// A normalized shopping-list entry as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: Unit,
    pub category: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ShoppingItem {
    /// Human-readable `"<qty> <unit> <name>"`, e.g. `"1.5 kg potatoes"`.
    pub fn describe(&self) -> String {
        let qty = format_quantity(self.quantity);
        if self.unit == Unit::None {
            format!("{} {}", qty, self.name)
        } else {
            format!("{} {} {}", qty, self.unit, self.name)
        }
    }
}

/// A named, stored shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
    pub id: String,
    pub name: String,
    pub items: Vec<ShoppingItem>,
    /// Unix seconds.
    pub created_at: i64,
    /// Unix seconds.
    pub updated_at: i64,
}

/// A product record returned by the vector-search oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCandidate {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub unit: String,
    pub supermarket_name: String,
    /// Lower is more similar; `None` ranks last.
    #[serde(default)]
    pub distance: Option<f64>,
}

/// Format a quantity without trailing zeros (`3`, `0.5`, `1.25`).
pub fn format_quantity(q: f64) -> String {
    if q.fract() == 0.0 {
        format!("{}", q as i64)
    } else {
        let s = format!("{:.4}", q);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(notes: Option<&str>) -> ShoppingItem {
        ShoppingItem {
            id: "i-1".to_string(),
            name: "flour".to_string(),
            quantity: 3.0,
            unit: Unit::Cup,
            category: "pantry".to_string(),
            completed: true,
            notes: notes.map(str::to_string),
        }
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(3.0), "3");
        assert_eq!(format_quantity(0.5), "0.5");
        assert_eq!(format_quantity(1.0 / 3.0), "0.3333");
    }

    #[test]
    fn test_describe() {
        assert_eq!(item(None).describe(), "3 cup flour");
        let mut eggs = item(None);
        eggs.name = "eggs".to_string();
        eggs.unit = Unit::None;
        eggs.quantity = 6.0;
        assert_eq!(eggs.describe(), "6 eggs");
    }

    #[test]
    fn test_from_stored_keeps_identity() {
        let parsed = ParsedItem::from_stored(&item(Some("2 cups flour; 1 cup flour")), 4);
        assert_eq!(parsed.source_id.as_deref(), Some("i-1"));
        assert_eq!(parsed.raw_text, "2 cups flour; 1 cup flour");
        assert_eq!(parsed.position, 4);
        assert!(parsed.completed);

        let parsed = ParsedItem::from_stored(&item(None), 0);
        assert_eq!(parsed.raw_text, "3 cup flour");
    }

    #[test]
    fn test_shopping_item_json_shape() {
        let v = serde_json::to_value(item(None)).unwrap();
        assert_eq!(v["unit"], "cup");
        assert_eq!(v["completed"], true);
        assert!(v["notes"].is_null());
        assert!(v.get("id").is_some());
    }

    #[test]
    fn test_candidate_camel_case() {
        let c: ProductCandidate = serde_json::from_str(
            r#"{"name":"Bloem","price":1.29,"unit":"1 kg","supermarketName":"Jumbo"}"#,
        )
        .unwrap();
        assert_eq!(c.supermarket_name, "Jumbo");
        assert_eq!(c.distance, None);
    }
}
