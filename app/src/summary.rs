//! FILENAME: app/src/summary.rs
// PURPOSE: Text of the Summary sheet.
// CONTEXT: Fixed pointers to the other sheets followed by highlights
// computed from the views. Deterministic: no timestamps, no run data
// beyond the views themselves.

use charts::format_amount;

use crate::pipeline::ReportViews;

pub const SUMMARY_TITLE: &str = "Key Insights";

const POINTERS: [&str; 5] = [
    "- Top selling products are listed in Top Products sheet.",
    "- Monthly sales trend shows seasonality and growth.",
    "- Profit varies significantly by region and category.",
    "- See Pivot tables for detailed breakdowns.",
    "- Visualizations embedded in relevant sheets.",
];

pub fn summary_lines(views: &ReportViews, top_n: usize) -> Vec<String> {
    let mut lines = vec![SUMMARY_TITLE.to_string()];
    lines.extend(POINTERS.iter().map(|p| p.to_string()));
    lines.push(String::new());
    lines.push("Highlights".to_string());

    if let Some(top) = views.top_products.rows().first() {
        lines.push(format!(
            "- Top product: {} ({} in sales)",
            top.label(),
            format_amount(top.value)
        ));
    }
    if let Some(best) = views.monthly_sales.max_row() {
        lines.push(format!(
            "- Best month: {} ({} in sales)",
            best.label(),
            format_amount(best.value)
        ));
    }
    if let Some(region) = views.region_profit.max_row() {
        lines.push(format!(
            "- Most profitable region: {} ({} in profit)",
            region.label(),
            format_amount(region.value)
        ));
    }
    lines.push(format!("- Total sales: {}", format_amount(views.pivot_sales.grand_total())));
    lines.push(format!("- Total profit: {}", format_amount(views.pivot_profit.grand_total())));
    lines.push(format!(
        "- Products ranked: top {} of sales ({} shown)",
        top_n,
        views.top_products.len()
    ));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::aggregate;
    use engine::{parse_date, DataTable, SalesRecord};

    fn views() -> ReportViews {
        let records = vec![
            SalesRecord::new("Chair", parse_date("2023-01-05").unwrap(), "East", "Furniture", 1200.0, 20.0),
            SalesRecord::new("Desk", parse_date("2023-02-01").unwrap(), "West", "Furniture", 200.0, 50.0),
        ];
        aggregate(&DataTable::from_sales_records(&records), 10).unwrap()
    }

    #[test]
    fn test_summary_starts_with_fixed_pointers() {
        let lines = summary_lines(&views(), 10);
        assert_eq!(lines[0], "Key Insights");
        assert_eq!(lines[1], POINTERS[0]);
        assert_eq!(lines[5], POINTERS[4]);
        assert_eq!(lines[6], "");
    }

    #[test]
    fn test_summary_highlights() {
        let lines = summary_lines(&views(), 10);
        assert!(lines.contains(&"- Top product: Chair (1,200.00 in sales)".to_string()));
        assert!(lines.contains(&"- Best month: 2023-01 (1,200.00 in sales)".to_string()));
        assert!(lines.contains(&"- Most profitable region: West (50.00 in profit)".to_string()));
        assert!(lines.contains(&"- Total sales: 1,400.00".to_string()));
        assert!(lines.contains(&"- Products ranked: top 10 of sales (2 shown)".to_string()));
    }

    #[test]
    fn test_summary_is_deterministic() {
        assert_eq!(summary_lines(&views(), 10), summary_lines(&views(), 10));
    }
}
