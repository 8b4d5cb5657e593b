//! Order item lines.
//!
//! The orders table keeps its items as one newline-delimited text field; each
//! line carries a name, an optional quantity, optional notes, and optional
//! bracketed tags:
//!
//! ```text
//! Widget (Qty: 3) - fragile [Stock: ordered] [Delivered: 1] [Status: pending]
//! ```
//!
//! Parsing never fails: a line that does not match the grammar becomes an
//! item with that line as its name and a quantity of 1.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::str::FromStr;
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Per-item stock sub-state, encoded as a `[Stock: ...]` tag.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    Awaiting,
    Ordered,
    InStock,
}

/// Per-item completion state, encoded as a `[Status: ...]` tag.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ItemStatus {
    Pending,
    Completed,
}

/// One structured line of an order description.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<StockStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
}

impl OrderItem {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
            notes: None,
            stock: None,
            delivered: None,
            status: None,
        }
    }
}

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[\s*(stock|delivered|status)\s*:\s*([^\]]*?)\s*\]").expect("tag pattern")
});

static LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?P<name>.+?)(?:\s*\(\s*qty:\s*(?P<qty>\d+)\s*\))?(?:\s+-\s+(?P<notes>.*\S))?\s*$")
        .expect("line pattern")
});

/// Parses a newline-delimited description field into items. Blank lines are
/// skipped; malformed lines degrade to name-only items.
pub fn parse_items(text: &str) -> Vec<OrderItem> {
    text.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<OrderItem> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let mut item = OrderItem::new(line, 1);

    // Pull the bracketed tags out first, then match the remainder.
    let mut remainder = String::with_capacity(line.len());
    let mut last = 0;
    for caps in TAG_RE.captures_iter(line) {
        let whole = caps.get(0).expect("match");
        remainder.push_str(&line[last..whole.start()]);
        last = whole.end();

        let value = caps[2].trim();
        match caps[1].to_ascii_lowercase().as_str() {
            "stock" => item.stock = StockStatus::from_str(&value.to_ascii_lowercase()).ok(),
            "delivered" => item.delivered = value.parse().ok(),
            "status" => item.status = ItemStatus::from_str(&value.to_ascii_lowercase()).ok(),
            _ => {}
        }
    }
    remainder.push_str(&line[last..]);

    let remainder = remainder.trim();
    if remainder.is_empty() {
        // Tags with no item text: keep the raw line as the name.
        return Some(item);
    }

    match LINE_RE.captures(remainder) {
        Some(caps) => {
            item.name = caps["name"].trim().to_string();
            item.quantity = caps
                .name("qty")
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(1);
            item.notes = caps.name("notes").map(|m| m.as_str().trim().to_string());
        }
        None => {
            item.name = remainder.to_string();
            item.quantity = 1;
        }
    }
    Some(item)
}

/// Renders items back into the canonical description form. `parse_items` of
/// the result yields the same items.
pub fn render_items(items: &[OrderItem]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(out, "{} (Qty: {})", item.name, item.quantity);
        if let Some(notes) = &item.notes {
            let _ = write!(out, " - {}", notes);
        }
        if let Some(stock) = item.stock {
            let _ = write!(out, " [Stock: {}]", stock);
        }
        if let Some(delivered) = item.delivered {
            let _ = write!(out, " [Delivered: {}]", delivered);
        }
        if let Some(status) = item.status {
            let _ = write!(out, " [Status: {}]", status);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test]
    fn parses_name_quantity_and_notes() {
        let items = parse_items("Widget (Qty: 3) - fragile");
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.name, "Widget");
        assert_eq!(item.quantity, 3);
        assert_eq!(item.notes.as_deref(), Some("fragile"));
        assert_eq!(item.stock, None);
    }

    #[test]
    fn missing_quantity_defaults_to_one() {
        let items = parse_items("Bearing housing");
        assert_eq!(items, vec![OrderItem::new("Bearing housing", 1)]);
    }

    #[test]
    fn parses_all_tags() {
        let items = parse_items(
            "Hex bolts M8 (Qty: 200) - zinc plated [Stock: ordered] [Delivered: 50] [Status: pending]",
        );
        let item = &items[0];
        assert_eq!(item.name, "Hex bolts M8");
        assert_eq!(item.quantity, 200);
        assert_eq!(item.notes.as_deref(), Some("zinc plated"));
        assert_eq!(item.stock, Some(StockStatus::Ordered));
        assert_eq!(item.delivered, Some(50));
        assert_eq!(item.status, Some(ItemStatus::Pending));
    }

    #[test_case("awaiting", StockStatus::Awaiting)]
    #[test_case("ordered", StockStatus::Ordered)]
    #[test_case("in-stock", StockStatus::InStock)]
    #[test_case("In-Stock", StockStatus::InStock; "in_stock_mixed_case")]
    fn parses_stock_values(value: &str, expected: StockStatus) {
        let items = parse_items(&format!("Gasket [Stock: {}]", value));
        assert_eq!(items[0].stock, Some(expected));
    }

    #[test]
    fn unknown_tag_values_are_ignored() {
        let items = parse_items("Gasket (Qty: 2) [Stock: maybe] [Delivered: lots]");
        let item = &items[0];
        assert_eq!(item.name, "Gasket");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.stock, None);
        assert_eq!(item.delivered, None);
    }

    #[test]
    fn hyphenated_names_are_not_split_into_notes() {
        let items = parse_items("Self-tapping screws (Qty: 40)");
        assert_eq!(items[0].name, "Self-tapping screws");
        assert_eq!(items[0].notes, None);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let items = parse_items("Widget (Qty: 1)\n\n   \nGasket (Qty: 2)");
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].name, "Gasket");
    }

    #[test]
    fn malformed_line_falls_back_to_name_only() {
        let items = parse_items("(((");
        assert_eq!(items, vec![OrderItem::new("(((", 1)]);
    }

    #[test]
    fn multiline_descriptions_parse_in_order() {
        let text = "Widget (Qty: 3) - fragile\nGasket\nSeal kit (Qty: 2) [Status: completed]";
        let items = parse_items(text);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[1].quantity, 1);
        assert_eq!(items[2].status, Some(ItemStatus::Completed));
    }

    #[test]
    fn render_produces_canonical_lines() {
        let mut item = OrderItem::new("Widget", 3);
        item.notes = Some("fragile".into());
        item.stock = Some(StockStatus::InStock);
        item.delivered = Some(2);
        item.status = Some(ItemStatus::Completed);
        assert_eq!(
            render_items(&[item]),
            "Widget (Qty: 3) - fragile [Stock: in-stock] [Delivered: 2] [Status: completed]"
        );
    }

    #[test]
    fn round_trip_is_idempotent_for_well_formed_input() {
        let text = "Widget (Qty: 3) - fragile [Stock: ordered]\nGasket (Qty: 1)";
        let once = render_items(&parse_items(text));
        let twice = render_items(&parse_items(&once));
        assert_eq!(once, twice);
        assert_eq!(once, text);
    }

    fn item_name() -> impl Strategy<Value = String> {
        // Names the grammar treats as opaque: no newlines, brackets,
        // parentheses, or spaced hyphen separators.
        "[A-Za-z][A-Za-z0-9 ]{0,30}[A-Za-z0-9]".prop_map(|s| s.trim().to_string())
    }

    fn arb_item() -> impl Strategy<Value = OrderItem> {
        (
            item_name(),
            1u32..1000,
            proptest::option::of(item_name()),
            proptest::option::of(prop_oneof![
                Just(StockStatus::Awaiting),
                Just(StockStatus::Ordered),
                Just(StockStatus::InStock),
            ]),
            proptest::option::of(0u32..1000),
            proptest::option::of(prop_oneof![
                Just(ItemStatus::Pending),
                Just(ItemStatus::Completed),
            ]),
        )
            .prop_map(|(name, quantity, notes, stock, delivered, status)| OrderItem {
                name,
                quantity,
                notes,
                stock,
                delivered,
                status,
            })
    }

    proptest! {
        #[test]
        fn parse_inverts_render(items in proptest::collection::vec(arb_item(), 0..8)) {
            let rendered = render_items(&items);
            prop_assert_eq!(parse_items(&rendered), items);
        }
    }
}
