//! WCAG 2.x relative luminance and contrast ratio for brand swatches.

use super::models::parse_hex;

/// AA threshold for normal-size body text.
pub const WCAG_AA_NORMAL: f64 = 4.5;

fn linearize(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub fn relative_luminance(hex: &str) -> Option<f64> {
    let [r, g, b] = parse_hex(hex)?;
    Some(0.2126 * linearize(r) + 0.7152 * linearize(g) + 0.0722 * linearize(b))
}

/// Ratio between two `#RRGGBB` colors, from 1.0 to 21.0. Order of the
/// arguments does not matter. `None` if either color does not parse.
pub fn contrast_ratio(a: &str, b: &str) -> Option<f64> {
    let la = relative_luminance(a)?;
    let lb = relative_luminance(b)?;
    let (light, dark) = if la >= lb { (la, lb) } else { (lb, la) };
    Some((light + 0.05) / (dark + 0.05))
}
