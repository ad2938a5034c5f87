// Deterministic candidate colors.

/// The color of the synthetic "Undeclared" candidate. It is never produced
/// by [assign_palette].
pub const UNDECLARED_COLOR: &str = "#CCFFFF";

// The qualitative "Set1" scheme, with its saturation scaled by 0.8.
const SET1_DESATURATED: [&str; 9] = [
    "#d02e30", "#447dab", "#57a554", "#92579b", "#e67f19", "#ebeb47", "#995935", "#eb8dbe",
    "#999999",
];

// Colors past the end of the table walk around the hue circle by the golden angle.
const GOLDEN_RATIO_CONJUGATE: f64 = 0.618_033_988_749_895;
const GENERATED_SATURATION: f64 = 0.56;

/// Returns `num_colors` distinct colors as lowercase `#rrggbb` strings.
///
/// The same count always gives the same colors, in the same order. The first
/// nine colors are the Set1 scheme, slightly desaturated.
pub fn assign_palette(num_colors: usize) -> Vec<String> {
    (0..num_colors)
        .map(|idx| match SET1_DESATURATED.get(idx) {
            Some(hex) => hex.to_string(),
            None => {
                let h = (idx as f64 * GOLDEN_RATIO_CONJUGATE).fract();
                // Alternate the lightness so that close hues stay apart.
                let l = if idx % 2 == 0 { 0.45 } else { 0.62 };
                let (r, g, b) = hls_to_rgb(h, l, GENERATED_SATURATION);
                to_hex(r, g, b)
            }
        })
        .collect()
}

fn to_hex(r: f64, g: f64, b: f64) -> String {
    let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
}

fn hls_to_rgb(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    (
        hue_value(m1, m2, h + 1.0 / 3.0),
        hue_value(m1, m2, h),
        hue_value(m1, m2, h - 1.0 / 3.0),
    )
}

fn hue_value(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}
