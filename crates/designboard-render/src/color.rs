//! CSS color strings to render colors.

use peniko::Color;

/// Parse a stored color string.
///
/// Accepts `transparent` and hex colors (`#rgb`, `#rrggbb`, `#rrggbbaa`).
/// Anything else falls back to black.
pub fn parse_color(color: &str) -> Color {
    let color = color.trim();
    if color.eq_ignore_ascii_case("transparent") {
        return Color::TRANSPARENT;
    }

    if let Some(hex) = color.strip_prefix('#') {
        let channel = |range: std::ops::Range<usize>| hex.get(range).and_then(|h| u8::from_str_radix(h, 16).ok());
        match hex.len() {
            3 => {
                let short = |i: usize| channel(i..i + 1).map(|v| v * 17);
                if let (Some(r), Some(g), Some(b)) = (short(0), short(1), short(2)) {
                    return Color::from_rgba8(r, g, b, 255);
                }
            }
            6 => {
                if let (Some(r), Some(g), Some(b)) = (channel(0..2), channel(2..4), channel(4..6)) {
                    return Color::from_rgba8(r, g, b, 255);
                }
            }
            8 => {
                if let (Some(r), Some(g), Some(b), Some(a)) =
                    (channel(0..2), channel(2..4), channel(4..6), channel(6..8))
                {
                    return Color::from_rgba8(r, g, b, a);
                }
            }
            _ => {}
        }
    }

    log::debug!("Unrecognized color {:?}, using black", color);
    Color::BLACK
}

/// Whether the color paints nothing.
pub fn is_invisible(color: Color) -> bool {
    color.to_rgba8().a == 0
}
