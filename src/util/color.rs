//! Primary color normalization for host-supplied config values.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

/// Parse `#RGB` or `#RRGGBB` values into RGB channels.
pub fn parse_hex_rgb(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16);
    let parsed = match hex.len() {
        3 => (channel(&hex[0..1].repeat(2)), channel(&hex[1..2].repeat(2)), channel(&hex[2..3].repeat(2))),
        6 => (channel(&hex[0..2]), channel(&hex[2..4]), channel(&hex[4..6])),
        _ => return None,
    };
    match parsed {
        (Ok(r), Ok(g), Ok(b)) => Some((r, g, b)),
        _ => None,
    }
}

/// Canonicalize hex colors to lowercase `#rrggbb`.
///
/// Anything that is not a hex color (named colors, `rgb(...)`) is passed
/// through trimmed, since the browser is the authority on CSS color syntax.
pub fn normalize_css_color(value: &str) -> String {
    match parse_hex_rgb(value) {
        Some((r, g, b)) => format!("#{r:02x}{g:02x}{b:02x}"),
        None => value.trim().to_owned(),
    }
}
