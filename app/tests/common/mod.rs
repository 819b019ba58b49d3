//! FILENAME: tests/common/mod.rs
//! Fixtures for sales-report integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use sales_report::ReportConfig;
use tempfile::TempDir;

/// Sample sales data used across tests.
pub struct SalesFixture;

impl SalesFixture {
    /// Superstore-style header with extra columns around the six used ones.
    pub fn header() -> &'static str {
        "Row ID,Order ID,Order Date,Customer Name,Product Name,Region,Category,Sales,Quantity,Profit"
    }

    /// (order date, product, region, category, sales, profit)
    pub fn data() -> Vec<(&'static str, &'static str, &'static str, &'static str, f64, f64)> {
        vec![
            ("2023-01-05", "Chair", "East", "Furniture", 100.0, 20.0),
            ("2023-01-20", "Desk", "East", "Furniture", 200.0, 50.0),
            ("2023-02-11", "Chair", "West", "Furniture", 150.0, 30.0),
            ("2023-02-14", "Stapler", "West", "Office Supplies", 15.5, 4.25),
            ("2023-03-02", "Phone", "Central", "Technology", 640.0, 96.0),
            ("2023-03-30", "Binder", "South", "Office Supplies", 22.75, 7.5),
            ("2023-04-18", "Lamp", "Central", "Furniture", 48.0, 6.0),
            ("2023-04-19", "Phone", "East", "Technology", 610.0, 88.0),
            ("2023-05-07", "Paper", "South", "Office Supplies", 12.0, 5.5),
            ("2023-05-21", "Desk", "West", "Furniture", 230.0, 41.0),
            ("2023-06-03", "Bookcase", "Central", "Furniture", 320.0, 12.0),
            ("2023-06-28", "Chair", "South", "Furniture", 140.0, 18.0),
        ]
    }

    pub fn csv() -> String {
        let mut text = String::from(Self::header());
        text.push('\n');
        for (i, (date, product, region, category, sales, profit)) in Self::data().iter().enumerate() {
            text.push_str(&format!(
                "{},CA-{:04},{},Customer {},{},{},{},{},{},{}\n",
                i + 1,
                1000 + i,
                date,
                i % 3,
                product,
                region,
                category,
                sales,
                i % 4 + 1,
                profit
            ));
        }
        text
    }
}

/// A scratch directory with an input CSV and an output path inside it.
pub struct TestHarness {
    pub dir: TempDir,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl TestHarness {
    /// A harness whose input is the standard fixture.
    pub fn with_sample_data() -> Self {
        Self::with_csv(&SalesFixture::csv())
    }

    /// A harness whose input is `text`.
    pub fn with_csv(text: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let input = dir.path().join("sales.csv");
        fs::write(&input, text).expect("write input csv");
        let output = dir.path().join("output").join("dashboard.xlsx");
        TestHarness { dir, input, output }
    }

    pub fn config(&self) -> ReportConfig {
        ReportConfig::new(&self.input, &self.output)
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn exists(path: &Path) -> bool {
        path.exists()
    }
}
