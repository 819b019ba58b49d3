//! FILENAME: core/charts/src/line.rs
//! Line chart: one marked point per period, connected in view order.

use pivot_engine::AggregateView;

use crate::artifact::{ChartArtifact, ChartKind};
use crate::axis::{format_tick, nice_ticks};
use crate::canvas::{Align, Canvas, AXIS, GRID, TEXT};
use crate::error::RenderError;
use crate::font;
use crate::palette;
use crate::{checked_series, draw_title};

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 600;
const LABEL_SCALE: u32 = 2;
const MARKER_RADIUS: f64 = 4.5;

/// Renders `view` as a line. X labels are drawn vertically; when periods
/// are too dense only every k-th label is drawn.
pub fn render_line_chart(view: &AggregateView, title: &str) -> Result<ChartArtifact, RenderError> {
    let series = checked_series(view, ChartKind::Line)?;
    let mut canvas = Canvas::new(WIDTH, HEIGHT);
    draw_title(&mut canvas, title);

    let longest = series
        .iter()
        .map(|(label, _)| font::text_width(label, LABEL_SCALE))
        .max()
        .unwrap_or(0)
        .min(160);
    let x0 = 90;
    let x1 = (canvas.width() - 30) as i32;
    let y0 = 60;
    let y1 = (canvas.height() - longest - 30) as i32;

    let min = series.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let max = series.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
    let ticks = nice_ticks(min, max, 5);
    let (lo, hi) = (ticks[0], ticks[ticks.len() - 1]);
    let to_y = |v: f64| y1 as f64 - (v - lo) / (hi - lo) * (y1 - y0) as f64;

    for tick in &ticks {
        let y = to_y(*tick).round() as i32;
        canvas.hline(x0, x1, y, GRID);
        let text_y = y - (font::GLYPH_HEIGHT * LABEL_SCALE / 2) as i32;
        canvas.text(x0 - 8, text_y, &format_tick(*tick), LABEL_SCALE, Align::Right, TEXT);
    }

    let step = (x1 - x0) as f64 / series.len() as f64;
    let points: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .map(|(i, (_, v))| (x0 as f64 + step * (i as f64 + 0.5), to_y(*v)))
        .collect();

    for pair in points.windows(2) {
        canvas.line(pair[0], pair[1], 2.5, palette::LINE);
    }
    for &(x, y) in &points {
        canvas.fill_circle(x, y, MARKER_RADIUS, palette::LINE);
    }

    let label_px = (font::GLYPH_HEIGHT * LABEL_SCALE + 4) as f64;
    let every = (label_px / step).ceil().max(1.0) as usize;
    for (i, ((label, _), (x, _))) in series.iter().zip(&points).enumerate() {
        if i % every != 0 {
            continue;
        }
        let text = font::fit_text(label, LABEL_SCALE, 160);
        let bottom = y1 + 8 + font::text_width(&text, LABEL_SCALE) as i32;
        let left = x.round() as i32 - (font::GLYPH_HEIGHT * LABEL_SCALE / 2) as i32;
        canvas.text_vertical(left, bottom, &text, LABEL_SCALE, TEXT);
    }

    canvas.hline(x0, x1, y1, AXIS);
    canvas.vline(x0, y0, y1, AXIS);

    let png = canvas.into_png()?;
    log::debug!("rendered line chart '{}' with {} points", title, series.len());
    Ok(ChartArtifact::new(ChartKind::Line, title, (WIDTH, HEIGHT), png, series))
}
