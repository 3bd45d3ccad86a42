//! Color values: RGB triples, CSS/hex conversions and blending.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{IconError, IconResult};

/// Seed-independent background of every icon.
pub const GRAY_BACKGROUND: Rgb = Rgb([236, 239, 240]);

/// An opaque color, channels ordered red, green, blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Pointwise floor-average of two colors.
    pub fn average(a: Rgb, b: Rgb) -> Rgb {
        let mix = |i: usize| ((u16::from(a.0[i]) + u16::from(b.0[i])) / 2) as u8;
        Rgb([mix(0), mix(1), mix(2)])
    }

    pub fn to_hex(self) -> String {
        rgb_to_hex(self.0[0], self.0[1], self.0[2])
    }

    /// `rgb(r, g, b)` form.
    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.0[0], self.0[1], self.0[2])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = IconError;

    /// Accepts `rgb(r, g, b)`, `#RRGGBB` and `#RGB`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("rgb(") {
            parse_css_rgb(s)
        } else {
            parse_hex(s)
        }
    }
}

/// `#RRGGBB`, uppercase and zero-padded.
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

/// Parse a list of `rgb(r, g, b)` strings.
pub fn extract_rgbs<S: AsRef<str>>(colors: &[S]) -> IconResult<Vec<Rgb>> {
    colors.iter().map(|c| parse_css_rgb(c.as_ref())).collect()
}

fn parse_css_rgb(s: &str) -> IconResult<Rgb> {
    let inner = s
        .trim()
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| IconError::color(format!("not an rgb() color: {s:?}")))?;

    let channels = inner
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<u8>()
                .map_err(|_| IconError::color(format!("bad channel {part:?} in {s:?}")))
        })
        .collect::<IconResult<Vec<u8>>>()?;

    match channels.as_slice() {
        [r, g, b] => Ok(Rgb([*r, *g, *b])),
        _ => Err(IconError::color(format!("expected 3 channels in {s:?}"))),
    }
}

/// Expand a `#RGB` / `#RRGGBB` string (the `#` is optional) to six digits.
pub(crate) fn normalize_hex(s: &str) -> IconResult<String> {
    let digits = s.trim().trim_start_matches('#');
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(IconError::color(format!("not a hex color: {s:?}")));
    }
    match digits.len() {
        6 => Ok(digits.to_string()),
        3 => Ok(digits.chars().flat_map(|c| [c, c]).collect()),
        _ => Err(IconError::color(format!("not a hex color: {s:?}"))),
    }
}

fn parse_hex(s: &str) -> IconResult<Rgb> {
    let digits = normalize_hex(s)?;
    let bytes = hex::decode(&digits).map_err(|e| IconError::color(e.to_string()))?;
    Ok(Rgb([bytes[0], bytes[1], bytes[2]]))
}
