//! Sellable catalog items: services and retail products.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::lenient;

/// Category used for items the catalog leaves uncategorised.
pub const FALLBACK_CATEGORY: &str = "Other";

/// A service or product as priced at checkout.
///
/// Services and products share one shape so the pricing engine treats them
/// the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub price: Decimal,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl LineItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            category: None,
            image_url: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Category for grouping, never empty.
    pub fn category_or_default(&self) -> &str {
        match self.category.as_deref() {
            Some(c) if !c.trim().is_empty() => c,
            _ => FALLBACK_CATEGORY,
        }
    }
}

/// Group items by category, categories in alphabetical order.
pub fn group_by_category(items: &[LineItem]) -> Vec<(&str, Vec<&LineItem>)> {
    let mut groups: BTreeMap<&str, Vec<&LineItem>> = BTreeMap::new();
    for item in items {
        groups.entry(item.category_or_default()).or_default().push(item);
    }
    groups.into_iter().collect()
}

/// Paging parameters for catalog list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub page: u32,
    #[serde(rename = "limit")]
    pub page_size: u32,
    pub sort: String,
}

impl PageRequest {
    pub fn first(page_size: u32, sort: impl Into<String>) -> Self {
        Self {
            page: 1,
            page_size,
            sort: sort.into(),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(100, "name_asc")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_numeric_and_string_prices() {
        let items: Vec<LineItem> = serde_json::from_str(
            r#"[
                {"id": 1, "name": "Cut", "price": 35.5},
                {"id": "p-2", "name": "Wax", "price": "12.00", "category": "styling"},
                {"id": "p-3", "name": "Sample", "price": null}
            ]"#,
        )
        .unwrap();

        assert_eq!(items[0].id, "1");
        assert_eq!(items[0].price, Decimal::new(355, 1));
        assert_eq!(items[1].price, Decimal::new(1200, 2));
        assert_eq!(items[2].price, Decimal::ZERO);
    }

    #[test]
    fn test_missing_price_is_zero() {
        let item: LineItem = serde_json::from_str(r#"{"id": "s1", "name": "Consult"}"#).unwrap();
        assert_eq!(item.price, Decimal::ZERO);
    }

    #[test]
    fn test_category_fallback() {
        let item = LineItem::new("p1", "Comb", Decimal::ONE);
        assert_eq!(item.category_or_default(), "Other");

        let item = item.with_category("  ");
        assert_eq!(item.category_or_default(), "Other");

        let item = LineItem::new("p2", "Gel", Decimal::ONE).with_category("styling");
        assert_eq!(item.category_or_default(), "styling");
    }

    #[test]
    fn test_group_by_category() {
        let items = vec![
            LineItem::new("1", "Shampoo", Decimal::ONE).with_category("hair"),
            LineItem::new("2", "Comb", Decimal::ONE),
            LineItem::new("3", "Conditioner", Decimal::ONE).with_category("hair"),
            LineItem::new("4", "Polish", Decimal::ONE).with_category("nails"),
        ];

        let groups = group_by_category(&items);
        let names: Vec<_> = groups.iter().map(|(c, _)| *c).collect();
        assert_eq!(names, vec!["Other", "hair", "nails"]);
        assert_eq!(groups[1].1.len(), 2);
        assert_eq!(groups[1].1[0].name, "Shampoo");
    }

    #[test]
    fn test_page_request_query_names() {
        let json = serde_json::to_value(PageRequest::default()).unwrap();
        assert_eq!(json["page"], 1);
        assert_eq!(json["limit"], 100);
        assert_eq!(json["sort"], "name_asc");
    }
}
