use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One line of a sale, purchase order or billing document. Stored on the
/// parent row as a JSON-serialized array, in keeping with the document shape
/// the dashboard edits as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct LineItem {
    pub description: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl LineItem {
    pub fn total_cents(&self) -> i64 {
        self.quantity * self.unit_price_cents
    }
}

/// Sum of line totals for a serialized array, used when recomputing the
/// denormalized `total_cents` column.
pub fn lines_total(lines: &[LineItem]) -> i64 {
    lines.iter().map(LineItem::total_cents).sum()
}

pub fn serialize_lines(lines: &[LineItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string(lines)
}

/// Tolerant parse; malformed JSON renders as an empty document rather than
/// an error, mirroring how the dashboard treats unreadable rows.
pub fn parse_lines(raw: &str) -> Vec<LineItem> {
    serde_json::from_str(raw).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_sum_per_line() {
        let lines = vec![
            LineItem {
                description: "Canvas print".into(),
                quantity: 2,
                unit_price_cents: 1500,
            },
            LineItem {
                description: "Frame".into(),
                quantity: 1,
                unit_price_cents: 4000,
            },
        ];
        assert_eq!(lines_total(&lines), 7000);
    }

    #[test]
    fn malformed_lines_parse_empty() {
        assert!(parse_lines("not json").is_empty());
    }
}
