//! Conversions between the color spellings accepted in styles.
//!
//! Colors are carried around as canonical hex strings: six uppercase hex
//! digits without a leading `#`. Spellings that cannot be classified are
//! passed through unchanged (lower-cased), so callers must tolerate non-hex
//! strings.

use ahash::AHashMap;
use once_cell::sync::Lazy;
use palette::Srgb;

use crate::css;

static PALETTE: Lazy<AHashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("maroon", "800000"),
        ("red", "FF0000"),
        ("orange", "FFA500"),
        ("yellow", "FFFF00"),
        ("olive", "808000"),
        ("purple", "800080"),
        ("fuchsia", "FF00FF"),
        ("white", "FFFFFF"),
        ("lime", "00FF00"),
        ("green", "008000"),
        ("navy", "000080"),
        ("blue", "0000FF"),
        ("aqua", "00FFFF"),
        ("teal", "008080"),
        ("black", "000000"),
        ("silver", "C0C0C0"),
        ("gray", "808080"),
    ]
    .iter()
    .copied()
    .collect()
});

/// Formats RGB components as a canonical hex string.
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("{:02X}{:02X}{:02X}", r, g, b)
}

/// Parses a 3 or 6 digit hex color, with or without a leading `#`.
///
/// Returns `None` if nothing is left after stripping non-alphanumeric
/// characters, or if fewer than three components can be read.
pub fn hex_to_rgb(hex: &str) -> Option<Srgb<u8>> {
    let mut digits: String = hex.chars().filter(char::is_ascii_alphanumeric).collect();
    if digits.is_empty() {
        return None;
    }
    if digits.len() == 3 {
        digits = digits
            .chars()
            .flat_map(|c| {
                // Only hex digits are doubled.
                let repeat = if c.is_ascii_hexdigit() { 2 } else { 1 };
                std::iter::repeat(c).take(repeat)
            })
            .collect();
    }

    let mut components = digits.as_bytes().chunks(2).map(component);
    let r = components.next()?;
    let g = components.next()?;
    let b = components.next()?;
    Some(Srgb::new(r, g, b))
}

/// Reads one hex component, ignoring characters that aren't hex digits.
fn component(chunk: &[u8]) -> u8 {
    chunk
        .iter()
        .filter_map(|&b| (b as char).to_digit(16))
        .fold(0, |acc, digit| acc * 16 + digit as u8)
}

/// Converts a color name, `rgb(r, g, b)` function or any other spelling to hex.
///
/// Named colors and `rgb()` functions become canonical hex. Anything else is
/// returned lower-cased but otherwise unchanged.
pub fn color_to_hex(color: &str) -> String {
    let color = color.to_lowercase();
    if let Some(hex) = PALETTE.get(color.as_str()) {
        return (*hex).to_owned();
    }

    let hex = css::find_function(&color, "rgb").and_then(|(args, _)| rgb_function_to_hex(args));
    hex.unwrap_or(color)
}

/// Converts the arguments of an `rgb(...)` function to hex.
///
/// Requires exactly three comma-separated channels. Channels are rounded and
/// clamped to `[0, 255]`; unparseable channels read as 0.
pub fn rgb_function_to_hex(args: &str) -> Option<String> {
    let channels: Vec<u8> = args.split(',').map(channel).collect();
    match *channels.as_slice() {
        [r, g, b] => Some(rgb_to_hex(r, g, b)),
        _ => None,
    }
}

fn channel(s: &str) -> u8 {
    s.trim()
        .parse::<f32>()
        .map(|value| value.round().max(0.0).min(255.0) as u8)
        .unwrap_or(0)
}

/// A random canonical hex color. Not suitable for anything but tests and demos.
pub fn random_hex() -> String {
    let value = fastrand::u32(..0x0100_0000);
    format!("{:06X}", value)
}
