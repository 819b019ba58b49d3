//! FILENAME: core/charts/src/bar.rs
//! Horizontal bar chart: one bar per row, top to bottom in view order.

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
const MAX_LABEL_WIDTH: u32 = 380;

/// Renders `view` as horizontal bars. The first row is the top bar.
/// Labels are folded to ASCII for drawing (see the crate docs).
pub fn render_bar_chart(view: &AggregateView, title: &str) -> Result<ChartArtifact, RenderError> {
    let series = checked_series(view, ChartKind::Bar)?;
    let mut canvas = Canvas::new(WIDTH, HEIGHT);
    draw_title(&mut canvas, title);

    let labels: Vec<String> = series
        .iter()
        .map(|(label, _)| font::fit_text(label, LABEL_SCALE, MAX_LABEL_WIDTH))
        .collect();
    let label_width = labels
        .iter()
        .map(|l| font::text_width(l, LABEL_SCALE))
        .max()
        .unwrap_or(0);

    let x0 = (label_width + 30) as i32;
    let x1 = (canvas.width() - 40) as i32;
    let y0 = 60;
    let y1 = (canvas.height() - 70) as i32;

    let min = series.iter().map(|(_, v)| *v).fold(0.0, f64::min);
    let max = series.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    let ticks = nice_ticks(min, max, 5);
    let (lo, hi) = (ticks[0], ticks[ticks.len() - 1]);
    let to_x = |v: f64| x0 as f64 + (v - lo) / (hi - lo) * (x1 - x0) as f64;

    for tick in &ticks {
        let x = to_x(*tick).round() as i32;
        canvas.vline(x, y0, y1, GRID);
        canvas.text(x, y1 + 8, &format_tick(*tick), LABEL_SCALE, Align::Center, TEXT);
    }

    let colors = palette::viridis(series.len());
    let band = (y1 - y0) as f64 / series.len() as f64;
    let bar = (band * 0.8).max(1.0);
    let zero = to_x(0.0);
    for (i, (label, (_, value))) in labels.iter().zip(&series).enumerate() {
        let top = y0 as f64 + band * i as f64 + (band - bar) / 2.0;
        let end = to_x(*value);
        canvas.fill_rect(
            zero.round() as i32,
            top.round() as i32,
            (end - zero).round() as i32,
            bar.round() as i32,
            colors[i],
        );
        let text_y = (top + bar / 2.0) as i32 - (font::GLYPH_HEIGHT * LABEL_SCALE / 2) as i32;
        canvas.text(x0 - 10, text_y, label, LABEL_SCALE, Align::Right, TEXT);
    }

    canvas.vline(zero.round() as i32, y0, y1, AXIS);
    canvas.hline(x0, x1, y1, AXIS);
    canvas.text(
        (x0 + x1) / 2,
        y1 + 34,
        view.measure_column(),
        LABEL_SCALE,
        Align::Center,
        TEXT,
    );

    let png = canvas.into_png()?;
    log::debug!("rendered bar chart '{}' with {} bars", title, series.len());
    Ok(ChartArtifact::new(ChartKind::Bar, title, (WIDTH, HEIGHT), png, series))
}
