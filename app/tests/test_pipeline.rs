//! FILENAME: tests/test_pipeline.rs
//! End-to-end tests: CSV in, XLSX report out.

mod common;

use std::fs;

use common::{SalesFixture, TestHarness};
use engine::CellValue;
use persistence::read_workbook_values;
use sales_report::{run, ReportError, SHEET_ORDER};

fn text(s: &str) -> CellValue {
    CellValue::text(s)
}

// ============================================================================
// SUCCESSFUL RUNS
// ============================================================================

#[test]
fn test_report_has_all_sheets_in_order() {
    let harness = TestHarness::with_sample_data();
    let outcome = run(&harness.config()).unwrap();

    assert_eq!(outcome.output, harness.output);
    assert_eq!(outcome.sheet_names, SHEET_ORDER.to_vec());
    assert!(outcome.chart_files.is_empty());

    let sheets = read_workbook_values(&harness.output).unwrap();
    let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, SHEET_ORDER.to_vec());
}

#[test]
fn test_top_products_sheet() {
    let harness = TestHarness::with_sample_data();
    run(&harness.config()).unwrap();
    let sheets = read_workbook_values(&harness.output).unwrap();
    let top = &sheets[0];

    assert_eq!(top.header(), [text("Product Name"), text("Total_Sales")]);
    // Phone 1250, Chair 390, Desk 430 -> Phone, Desk, Chair, ...
    assert_eq!(top.rows[1], vec![text("Phone"), CellValue::Number(1250.0)]);
    assert_eq!(top.rows[2], vec![text("Desk"), CellValue::Number(430.0)]);
    assert_eq!(top.rows[3], vec![text("Chair"), CellValue::Number(390.0)]);
    let distinct_products = 8;
    assert_eq!(top.rows.len(), 1 + distinct_products);
}

#[test]
fn test_monthly_sales_sheet() {
    let harness = TestHarness::with_sample_data();
    run(&harness.config()).unwrap();
    let sheets = read_workbook_values(&harness.output).unwrap();
    let monthly = &sheets[1];

    assert_eq!(monthly.header(), [text("Month"), text("Monthly_Sales")]);
    let months: Vec<CellValue> = monthly.rows[1..].iter().map(|r| r[0].clone()).collect();
    assert_eq!(
        months,
        ["2023-01", "2023-02", "2023-03", "2023-04", "2023-05", "2023-06"].map(text).to_vec()
    );
    assert_eq!(monthly.rows[1][1], CellValue::Number(300.0));
    assert_eq!(monthly.rows[2][1], CellValue::Number(165.5));

    let total: f64 = monthly.rows[1..].iter().filter_map(|r| r[1].as_number()).sum();
    let expected: f64 = SalesFixture::data().iter().map(|r| r.4).sum();
    assert!((total - expected).abs() < 1e-9);
}

#[test]
fn test_region_category_and_pivots() {
    let harness = TestHarness::with_sample_data();
    run(&harness.config()).unwrap();
    let sheets = read_workbook_values(&harness.output).unwrap();

    let region_category = &sheets[2];
    assert_eq!(
        region_category.header(),
        [text("Region"), text("Category"), text("Total_Profit")]
    );
    assert_eq!(
        region_category.rows[1],
        vec![text("Central"), text("Furniture"), CellValue::Number(18.0)]
    );

    let pivot_sales = &sheets[3];
    assert_eq!(
        pivot_sales.header(),
        [text("Region"), text("Furniture"), text("Office Supplies"), text("Technology")]
    );
    // East has no Office Supplies sales.
    assert_eq!(
        pivot_sales.rows[2],
        vec![text("East"), CellValue::Number(300.0), CellValue::Empty, CellValue::Number(610.0)]
    );

    let pivot_total: f64 = pivot_sales.rows[1..]
        .iter()
        .flat_map(|r| r[1..].iter().filter_map(CellValue::as_number))
        .sum();
    let pair_total: f64 = sheets[2].rows[1..].iter().filter_map(|r| r[2].as_number()).sum();
    let profit_pivot_total: f64 = sheets[4].rows[1..]
        .iter()
        .flat_map(|r| r[1..].iter().filter_map(CellValue::as_number))
        .sum();
    assert!((profit_pivot_total - pair_total).abs() < 1e-9);
    assert!(pivot_total > 0.0);
}

#[test]
fn test_summary_sheet() {
    let harness = TestHarness::with_sample_data();
    run(&harness.config()).unwrap();
    let sheets = read_workbook_values(&harness.output).unwrap();
    let summary = &sheets[5];

    assert_eq!(summary.rows[0], vec![text("Key Insights")]);
    assert_eq!(
        summary.rows[1],
        vec![text("- Top selling products are listed in Top Products sheet.")]
    );
    assert!(summary
        .rows
        .iter()
        .any(|r| r[0] == text("- Top product: Phone (1,250.00 in sales)")));
}

#[test]
fn test_rerun_is_identical() {
    let harness = TestHarness::with_sample_data();
    run(&harness.config()).unwrap();
    let first = read_workbook_values(&harness.output).unwrap();

    let second_path = harness.path("again.xlsx");
    let mut config = harness.config();
    config.output = second_path.clone();
    run(&config).unwrap();
    let second = read_workbook_values(&second_path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_chart_dir_writes_pngs() {
    let harness = TestHarness::with_sample_data();
    let mut config = harness.config();
    config.chart_dir = Some(harness.path("charts"));
    let outcome = run(&config).unwrap();

    let names: Vec<String> = outcome
        .chart_files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["top_products.png", "monthly_sales.png", "profit_region.png"]);
    for path in &outcome.chart_files {
        let bytes = fs::read(path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}

#[test]
fn test_top_n_limits_rows() {
    let harness = TestHarness::with_sample_data();
    let mut config = harness.config();
    config.top_n = 3;
    run(&config).unwrap();
    let sheets = read_workbook_values(&harness.output).unwrap();
    assert_eq!(sheets[0].rows.len(), 4);
}

// ============================================================================
// FAILURES
// ============================================================================

#[test]
fn test_missing_input_is_data_load_error() {
    let harness = TestHarness::with_sample_data();
    let mut config = harness.config();
    config.input = harness.path("nope.csv");
    assert!(matches!(run(&config), Err(ReportError::DataLoad(_))));
    assert!(!harness.output.exists());
}

#[test]
fn test_missing_column_is_data_load_error() {
    let harness = TestHarness::with_csv("Order Date,Product Name,Sales\n2023-01-01,Chair,10\n");
    let err = run(&harness.config()).unwrap_err();
    assert!(matches!(err, ReportError::DataLoad(_)));
    assert!(err.to_string().contains("Region"));
    assert!(!harness.output.exists());
}

#[test]
fn test_bad_date_is_data_format_error() {
    let mut csv = SalesFixture::csv();
    csv.push_str("99,CA-9999,31/31/2023,Customer 0,Chair,East,Furniture,10,1,2\n");
    let harness = TestHarness::with_csv(&csv);
    match run(&harness.config()) {
        Err(ReportError::DataFormat(e)) => {
            assert_eq!(e.line, 14);
            assert_eq!(e.value, "31/31/2023");
        }
        other => panic!("unexpected outcome: {:?}", other.map(|o| o.output)),
    }
    assert!(!harness.output.exists());
}

#[test]
fn test_empty_input_is_aggregation_error() {
    let harness = TestHarness::with_csv(&format!("{}\n", SalesFixture::header()));
    assert!(matches!(run(&harness.config()), Err(ReportError::Aggregation { .. })));
    assert!(!harness.output.exists());
}

#[test]
fn test_non_numeric_measure_is_aggregation_error() {
    let csv = format!(
        "{}\n1,CA-1,2023-01-05,Customer,Chair,East,Furniture,lots,1,2\n",
        SalesFixture::header()
    );
    let harness = TestHarness::with_csv(&csv);
    let err = run(&harness.config()).unwrap_err();
    assert!(matches!(err, ReportError::Aggregation { .. }));
    assert!(err.to_string().contains("Sales"));
}

#[test]
fn test_zero_top_n_is_config_error() {
    let harness = TestHarness::with_sample_data();
    let mut config = harness.config();
    config.top_n = 0;
    assert!(matches!(run(&config), Err(ReportError::Config(_))));
}

#[test]
fn test_failed_run_keeps_previous_report() {
    let harness = TestHarness::with_sample_data();
    run(&harness.config()).unwrap();
    let before = fs::read(&harness.output).unwrap();

    let mut config = harness.config();
    config.input = harness.path("missing.csv");
    assert!(run(&config).is_err());
    assert_eq!(fs::read(&harness.output).unwrap(), before);
}

#[test]
fn test_failed_export_writes_no_chart_files() {
    let harness = TestHarness::with_sample_data();
    let blocker = harness.path("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let mut config = harness.config();
    config.output = blocker.join("dashboard.xlsx");
    config.chart_dir = Some(harness.path("charts"));

    let err = run(&config).unwrap_err();
    assert!(matches!(err, ReportError::Export(_)), "got {err:?}");
    assert_eq!(err.category(), "EXPORT");

    let charts = harness.path("charts");
    let leftovers = match fs::read_dir(&charts) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    };
    assert_eq!(leftovers, 0, "chart files left in {}", charts.display());
}

#[test]
fn test_chart_dir_holds_only_final_files() {
    let harness = TestHarness::with_sample_data();
    let mut config = harness.config();
    config.chart_dir = Some(harness.path("charts"));
    run(&config).unwrap();

    let mut names: Vec<String> = fs::read_dir(harness.path("charts"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, ["monthly_sales.png", "profit_region.png", "top_products.png"]);
}
