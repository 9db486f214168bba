use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Diverging map for the correlation heatmap
// ---------------------------------------------------------------------------

/// Map a correlation coefficient in [-1, 1] to a blue→white→red tint.
/// Out-of-range and NaN inputs get a neutral gray.
pub fn diverging(r: f64) -> Color32 {
    if !r.is_finite() {
        return Color32::GRAY;
    }
    let r = r.clamp(-1.0, 1.0) as f32;

    let white = Srgb::new(0.97, 0.97, 0.97).into_linear();
    let blue = Srgb::new(0.23, 0.42, 0.78).into_linear();
    let red = Srgb::new(0.82, 0.26, 0.22).into_linear();

    let mixed = if r < 0.0 {
        white.mix(blue, -r)
    } else {
        white.mix(red, r)
    };
    to_color32(Srgb::from_linear(mixed))
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}
