//! FILENAME: app/src/pipeline.rs
// PURPOSE: The four-stage run: load, aggregate, render, export.
// CONTEXT: Stages run in order and hand their outputs forward by value.
// The first error aborts the run. Output is staged first: the workbook is
// written to a temp file and read back, the chart PNGs are written to temp
// files, and only then is anything moved into place. A failed run leaves
// no report and no chart files behind.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use charts::{render_bar_chart, render_line_chart, render_pie_chart, ChartArtifact, RenderError};
use engine::{DataTable, CATEGORY, ORDER_DATE, PRODUCT_NAME, PROFIT, REGION, SALES};
use persistence::{
    load_sales_csv, stage_report, EmbedPosition, ReportDocument, SheetContent, SheetEntry,
};
use pivot_engine::{
    pivot, sum_by_key, sum_by_period, sum_by_two_keys, top_n_by_sum, AggregateView,
    AggregationType, Granularity, PivotView,
};

use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::summary::summary_lines;
use crate::{log_debug, log_enter, log_exit, log_info};

// ============================================================================
// REPORT LAYOUT
// ============================================================================

pub const TOP_PRODUCTS_SHEET: &str = "Top Products";
pub const MONTHLY_SALES_SHEET: &str = "Monthly Sales";
pub const REGION_CATEGORY_SHEET: &str = "Profit by Region-Category";
pub const PIVOT_SALES_SHEET: &str = "Pivot Sales";
pub const PIVOT_PROFIT_SHEET: &str = "Pivot Profit";
pub const SUMMARY_SHEET: &str = "Summary";

/// Sheet names in workbook order.
pub const SHEET_ORDER: [&str; 6] = [
    TOP_PRODUCTS_SHEET,
    MONTHLY_SALES_SHEET,
    REGION_CATEGORY_SHEET,
    PIVOT_SALES_SHEET,
    PIVOT_PROFIT_SHEET,
    SUMMARY_SHEET,
];

pub const MONTHLY_SALES_TITLE: &str = "Monthly Sales Trend";
pub const REGION_PROFIT_TITLE: &str = "Profit Distribution by Region";

pub const TOP_PRODUCTS_PNG: &str = "top_products.png";
pub const MONTHLY_SALES_PNG: &str = "monthly_sales.png";
pub const REGION_PROFIT_PNG: &str = "profit_region.png";

pub fn top_products_title(n: usize) -> String {
    format!("Top {} Products by Sales", n)
}

// ============================================================================
// STAGE OUTPUTS
// ============================================================================

/// Every derived view the report shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportViews {
    pub top_products: AggregateView,
    pub monthly_sales: AggregateView,
    pub region_category_profit: AggregateView,
    pub region_profit: AggregateView,
    pub pivot_sales: PivotView,
    pub pivot_profit: PivotView,
}

#[derive(Debug, Clone)]
pub struct ReportCharts {
    pub top_products: ChartArtifact,
    pub monthly_sales: ChartArtifact,
    pub region_profit: ChartArtifact,
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub output: PathBuf,
    pub sheet_names: Vec<String>,
    pub chart_files: Vec<PathBuf>,
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Runs the whole report for `config`.
pub fn run(config: &ReportConfig) -> Result<RunOutcome, ReportError> {
    config.validate()?;
    log_enter!("SYS", "run", "input={} output={}", config.input.display(), config.output.display());

    let table = load_sales_csv(&config.input)?;
    log_info!("LOAD", "{} rows, columns: {}", table.row_count(), table.columns().join(", "));

    let views = aggregate(&table, config.top_n)?;
    let charts = render(&views, config.top_n)?;

    let document = build_document(&views, &charts, config.top_n)?;
    let staged = stage_report(&document, &config.output)?;
    let sheet_names = staged.sheet_names().to_vec();

    let chart_files = match &config.chart_dir {
        Some(dir) => commit_chart_files(stage_chart_files(&charts, dir)?)?,
        None => Vec::new(),
    };
    if let Err(e) = staged.commit() {
        remove_files(&chart_files);
        return Err(e.into());
    }

    log_exit!("SYS", "run", "sheets={}", sheet_names.len());
    Ok(RunOutcome {
        output: config.output.clone(),
        sheet_names,
        chart_files,
    })
}

/// Derives every view from the loaded table.
pub fn aggregate(table: &DataTable, top_n: usize) -> Result<ReportViews, ReportError> {
    let stage = |view: &'static str| move |source| ReportError::Aggregation { view, source };

    let top_products = top_n_by_sum(table, PRODUCT_NAME, SALES, top_n)
        .map_err(stage("top products"))?
        .with_measure_label("Total_Sales");
    let monthly_sales = sum_by_period(table, ORDER_DATE, SALES, Granularity::Month)
        .map_err(stage("monthly sales"))?
        .with_key_labels(&["Month"])
        .with_measure_label("Monthly_Sales");
    let region_category_profit = sum_by_two_keys(table, REGION, CATEGORY, PROFIT)
        .map_err(stage("profit by region and category"))?
        .with_measure_label("Total_Profit");
    let region_profit = sum_by_key(table, REGION, PROFIT)
        .map_err(stage("profit by region"))?
        .with_measure_label("Total_Profit");
    let pivot_sales = pivot(table, REGION, CATEGORY, SALES, AggregationType::Sum)
        .map_err(stage("sales pivot"))?;
    let pivot_profit = pivot(table, REGION, CATEGORY, PROFIT, AggregationType::Sum)
        .map_err(stage("profit pivot"))?;

    log_info!(
        "AGG",
        "{} top products, {} months, {} region/category pairs, {}x{} pivot",
        top_products.len(),
        monthly_sales.len(),
        region_category_profit.len(),
        pivot_sales.row_labels.len(),
        pivot_sales.column_labels.len()
    );

    Ok(ReportViews {
        top_products,
        monthly_sales,
        region_category_profit,
        region_profit,
        pivot_sales,
        pivot_profit,
    })
}

/// Draws the three charts.
pub fn render(views: &ReportViews, top_n: usize) -> Result<ReportCharts, ReportError> {
    let stage = |chart: &'static str| move |source| ReportError::Render { chart, source };

    let top_products = render_bar_chart(&views.top_products, &top_products_title(top_n))
        .map_err(stage("top products"))?;
    let monthly_sales = render_line_chart(&views.monthly_sales, MONTHLY_SALES_TITLE)
        .map_err(stage("monthly sales"))?;
    let region_profit = render_pie_chart(&views.region_profit, REGION_PROFIT_TITLE)
        .map_err(stage("profit by region"))?;

    log_info!("CHART", "rendered 3 charts");
    Ok(ReportCharts {
        top_products,
        monthly_sales,
        region_profit,
    })
}

/// A chart PNG written to a temp file in its final directory.
pub struct StagedChart {
    file: NamedTempFile,
    target: PathBuf,
    chart: &'static str,
}

/// Writes the chart PNGs to temp files in `dir`, creating it if needed.
/// Nothing appears under the final names until [`commit_chart_files`].
pub fn stage_chart_files(charts: &ReportCharts, dir: &Path) -> Result<Vec<StagedChart>, ReportError> {
    let io_error = |chart: &'static str, path: &Path| {
        let path = path.to_path_buf();
        move |source| ReportError::Render {
            chart,
            source: RenderError::Io { path, source },
        }
    };

    fs::create_dir_all(dir).map_err(io_error("chart directory", dir))?;

    let files = [
        (&charts.top_products, TOP_PRODUCTS_PNG, "top products"),
        (&charts.monthly_sales, MONTHLY_SALES_PNG, "monthly sales"),
        (&charts.region_profit, REGION_PROFIT_PNG, "profit by region"),
    ];
    let mut staged = Vec::with_capacity(files.len());
    for (artifact, file_name, chart) in files {
        let target = dir.join(file_name);
        let mut file = NamedTempFile::new_in(dir).map_err(io_error(chart, &target))?;
        artifact
            .write_to(&mut file)
            .map_err(io_error(chart, &target))?;
        staged.push(StagedChart { file, target, chart });
    }
    Ok(staged)
}

/// Moves staged charts to their final names. On failure the ones already
/// moved are removed again.
pub fn commit_chart_files(staged: Vec<StagedChart>) -> Result<Vec<PathBuf>, ReportError> {
    let mut written = Vec::with_capacity(staged.len());
    for StagedChart { file, target, chart } in staged {
        if let Err(e) = file.persist(&target) {
            remove_files(&written);
            return Err(ReportError::Render {
                chart,
                source: RenderError::Io {
                    path: target,
                    source: e.error,
                },
            });
        }
        log_debug!("CHART", "wrote {}", target.display());
        written.push(target);
    }
    Ok(written)
}

fn remove_files(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            log_debug!("CHART", "could not remove {}: {}", path.display(), e);
        }
    }
}

/// Lays the views and charts out as the report workbook.
pub fn build_document(
    views: &ReportViews,
    charts: &ReportCharts,
    top_n: usize,
) -> Result<ReportDocument, ReportError> {
    let entries = vec![
        SheetEntry::new(
            TOP_PRODUCTS_SHEET,
            SheetContent::table_with_chart(
                views.top_products.to_table(),
                charts.top_products.clone(),
                EmbedPosition::at("G2"),
            ),
        ),
        SheetEntry::new(
            MONTHLY_SALES_SHEET,
            SheetContent::table_with_chart(
                views.monthly_sales.to_table(),
                charts.monthly_sales.clone(),
                EmbedPosition::at("D2"),
            ),
        ),
        SheetEntry::new(
            REGION_CATEGORY_SHEET,
            SheetContent::table_with_chart(
                views.region_category_profit.to_table(),
                charts.region_profit.clone(),
                EmbedPosition::at("E2"),
            ),
        ),
        SheetEntry::new(PIVOT_SALES_SHEET, SheetContent::table(views.pivot_sales.to_table())),
        SheetEntry::new(PIVOT_PROFIT_SHEET, SheetContent::table(views.pivot_profit.to_table())),
        SheetEntry::new(SUMMARY_SHEET, SheetContent::text(summary_lines(views, top_n))),
    ];
    Ok(ReportDocument::assemble(entries)?)
}
