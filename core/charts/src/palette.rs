//! FILENAME: core/charts/src/palette.rs
//! Color palettes: viridis for ranked bars, a ten-color cycle for slices.

use crate::canvas::Color;
use image::Rgb;

/// Ten evenly spaced samples of the viridis colormap.
const VIRIDIS: [[u8; 3]; 10] = [
    [0x44, 0x01, 0x54],
    [0x48, 0x28, 0x78],
    [0x3E, 0x4A, 0x89],
    [0x31, 0x68, 0x8E],
    [0x26, 0x82, 0x8E],
    [0x1F, 0x9E, 0x89],
    [0x35, 0xB7, 0x79],
    [0x6D, 0xCD, 0x59],
    [0xB4, 0xDE, 0x2C],
    [0xFD, 0xE7, 0x25],
];

const CATEGORICAL: [[u8; 3]; 10] = [
    [0x1F, 0x77, 0xB4],
    [0xFF, 0x7F, 0x0E],
    [0x2C, 0xA0, 0x2C],
    [0xD6, 0x27, 0x28],
    [0x94, 0x67, 0xBD],
    [0x8C, 0x56, 0x4B],
    [0xE3, 0x77, 0xC2],
    [0x7F, 0x7F, 0x7F],
    [0xBC, 0xBD, 0x22],
    [0x17, 0xBE, 0xCF],
];

/// Line color for trend charts.
pub const LINE: Color = Rgb([0x1F, 0x77, 0xB4]);

/// `n` colors spread across viridis, interpolating between samples.
pub fn viridis(n: usize) -> Vec<Color> {
    if n == 1 {
        return vec![Rgb(VIRIDIS[0])];
    }
    (0..n)
        .map(|i| {
            let t = i as f64 / (n - 1) as f64 * (VIRIDIS.len() - 1) as f64;
            let lo = t.floor() as usize;
            let hi = (lo + 1).min(VIRIDIS.len() - 1);
            let frac = t - lo as f64;
            let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
            Rgb([
                mix(VIRIDIS[lo][0], VIRIDIS[hi][0]),
                mix(VIRIDIS[lo][1], VIRIDIS[hi][1]),
                mix(VIRIDIS[lo][2], VIRIDIS[hi][2]),
            ])
        })
        .collect()
}

/// The i-th categorical color, cycling after ten.
pub fn categorical(i: usize) -> Color {
    Rgb(CATEGORICAL[i % CATEGORICAL.len()])
}
