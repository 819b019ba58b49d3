//! FILENAME: core/charts/src/lib.rs
//! Chart rendering for the sales report.
//!
//! Each renderer takes an already-aggregated `AggregateView` and draws it as
//! is; no chart sorts, filters or regroups data. Output is a PNG held in a
//! `ChartArtifact`. Rendering is deterministic: the same view and title
//! always produce the same bytes.
//!
//! Text is drawn with a built-in 5x7 ASCII font. Accented Latin letters
//! are drawn without their accents and characters with no ASCII spelling
//! appear as '?'. The artifact's `series()` keeps the labels unchanged.

mod axis;
mod canvas;
mod font;
mod palette;

pub mod artifact;
pub mod bar;
pub mod error;
pub mod line;
pub mod pie;

pub use artifact::{ChartArtifact, ChartKind};
pub use axis::format_amount;
pub use bar::render_bar_chart;
pub use error::RenderError;
pub use line::render_line_chart;
pub use pie::render_pie_chart;

use canvas::{Align, Canvas, BLACK};
use pivot_engine::AggregateView;

const TITLE_SCALE: u32 = 3;

/// The view's (label, value) pairs, rejecting empty views and non-finite values.
pub(crate) fn checked_series(
    view: &AggregateView,
    chart: ChartKind,
) -> Result<Vec<(String, f64)>, RenderError> {
    if view.is_empty() {
        return Err(RenderError::EmptyView { chart });
    }
    let series = view.series();
    if let Some((label, _)) = series.iter().find(|(_, v)| !v.is_finite()) {
        return Err(RenderError::NonFinite {
            chart,
            label: label.clone(),
        });
    }
    Ok(series)
}

pub(crate) fn draw_title(canvas: &mut Canvas, title: &str) {
    let center = (canvas.width() / 2) as i32;
    let max = canvas.width() - 40;
    let text = font::fit_text(title, TITLE_SCALE, max);
    canvas.text(center, 16, &text, TITLE_SCALE, Align::Center, BLACK);
}
