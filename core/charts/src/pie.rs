//! FILENAME: core/charts/src/pie.rs
//! Pie chart: one slice per row, starting at 140 degrees and running
//! counter-clockwise, each labelled with its key and share of the total.

use pivot_engine::AggregateView;

use crate::artifact::{ChartArtifact, ChartKind};
use crate::canvas::{Align, Canvas, TEXT, WHITE};
use crate::error::RenderError;
use crate::font;
use crate::palette;
use crate::{checked_series, draw_title};

const SIZE: u32 = 800;
const START_ANGLE: f64 = 140.0;
const LABEL_SCALE: u32 = 2;

/// Renders `view` as a pie. Negative values and a zero total are rejected.
pub fn render_pie_chart(view: &AggregateView, title: &str) -> Result<ChartArtifact, RenderError> {
    let series = checked_series(view, ChartKind::Pie)?;
    if let Some((label, value)) = series.iter().find(|(_, v)| *v < 0.0) {
        return Err(RenderError::NegativeSlice {
            label: label.clone(),
            value: *value,
        });
    }
    let total: f64 = series.iter().map(|(_, v)| v).sum();
    if total <= 0.0 {
        return Err(RenderError::ZeroTotal);
    }

    let mut canvas = Canvas::new(SIZE, SIZE);
    draw_title(&mut canvas, title);

    let (cx, cy, radius) = (SIZE as f64 / 2.0, SIZE as f64 / 2.0 + 20.0, 270.0);

    // Cumulative end angle (degrees past START_ANGLE) of each slice.
    let mut ends = Vec::with_capacity(series.len());
    let mut running = 0.0;
    for (_, value) in &series {
        running += value / total * 360.0;
        ends.push(running);
    }

    let r2 = radius * radius;
    let (x0, x1) = ((cx - radius) as i32, (cx + radius).ceil() as i32);
    let (y0, y1) = ((cy - radius) as i32, (cy + radius).ceil() as i32);
    for py in y0..=y1 {
        for px in x0..=x1 {
            let dx = px as f64 + 0.5 - cx;
            let dy = cy - (py as f64 + 0.5);
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let angle = dy.atan2(dx).to_degrees();
            let rel = (angle - START_ANGLE).rem_euclid(360.0);
            let slice = ends.iter().position(|end| rel < *end).unwrap_or(ends.len() - 1);
            canvas.put(px, py, palette::categorical(slice));
        }
    }

    let mut start = 0.0;
    for (i, (label, value)) in series.iter().enumerate() {
        let end = ends[i];
        if end - start > 0.0 {
            let mid = (START_ANGLE + (start + end) / 2.0).to_radians();
            let (cos, sin) = (mid.cos(), mid.sin());
            let half_height = (font::GLYPH_HEIGHT * LABEL_SCALE / 2) as i32;

            let pct = format!("{:.1}%", value / total * 100.0);
            let (px, py) = (cx + 0.6 * radius * cos, cy - 0.6 * radius * sin);
            canvas.text(px as i32, py as i32 - half_height, &pct, LABEL_SCALE, Align::Center, WHITE);

            let (lx, ly) = (cx + 1.08 * radius * cos, cy - 1.08 * radius * sin);
            let align = if cos >= 0.0 { Align::Left } else { Align::Right };
            let text = font::fit_text(label, LABEL_SCALE, 220);
            canvas.text(lx as i32, ly as i32 - half_height, &text, LABEL_SCALE, align, TEXT);
        }
        start = end;
    }

    let png = canvas.into_png()?;
    log::debug!("rendered pie chart '{}' with {} slices", title, series.len());
    Ok(ChartArtifact::new(ChartKind::Pie, title, (SIZE, SIZE), png, series))
}
