//! Seeded color generator.
//!
//! Hue is drawn first, then saturation, then brightness, each from a small
//! linear-congruential stream keyed by the request seed. Saturation and
//! brightness bounds come from a per-hue dictionary so generated colors stay
//! in the readable part of each hue. Identical requests always yield the
//! identical color.

use serde::{Deserialize, Serialize};

use crate::color::{normalize_hex, Rgb};
use crate::error::{IconError, IconResult};

const LCG_MUL: u64 = 9301;
const LCG_INC: u64 = 49297;
const LCG_MOD: u64 = 233_280;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Luminosity {
    Bright,
    Light,
    Dark,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HueName {
    Monochrome,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
}

/// Hue constraint of a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Hue {
    Any,
    Named(HueName),
    /// Exact hue in degrees; values outside `(0, 360)` mean any hue.
    Degrees(f64),
    /// Hue of a `#RRGGBB` / `#RGB` color.
    Hex(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorRequest {
    pub seed: String,
    pub luminosity: Luminosity,
    pub hue: Hue,
}

impl ColorRequest {
    pub fn new(seed: impl Into<String>, luminosity: Luminosity) -> Self {
        Self {
            seed: seed.into(),
            luminosity,
            hue: Hue::Any,
        }
    }

    pub fn with_hue(mut self, hue: Hue) -> Self {
        self.hue = hue;
        self
    }
}

struct HueInfo {
    name: HueName,
    hue_range: Option<(f64, f64)>,
    /// (saturation, minimum brightness) control points.
    lower_bounds: &'static [(f64, f64)],
}

impl HueInfo {
    fn saturation_range(&self) -> (f64, f64) {
        let first = self.lower_bounds[0];
        let last = self.lower_bounds[self.lower_bounds.len() - 1];
        (first.0, last.0)
    }
}

static DICTIONARY: [HueInfo; 8] = [
    HueInfo {
        name: HueName::Monochrome,
        hue_range: None,
        lower_bounds: &[(0.0, 0.0), (100.0, 0.0)],
    },
    HueInfo {
        name: HueName::Red,
        hue_range: Some((-26.0, 18.0)),
        lower_bounds: &[
            (20.0, 100.0), (30.0, 92.0), (40.0, 89.0), (50.0, 85.0), (60.0, 78.0),
            (70.0, 70.0), (80.0, 60.0), (90.0, 55.0), (100.0, 50.0),
        ],
    },
    HueInfo {
        name: HueName::Orange,
        hue_range: Some((18.0, 46.0)),
        lower_bounds: &[
            (20.0, 100.0), (30.0, 93.0), (40.0, 88.0), (50.0, 86.0), (60.0, 85.0),
            (70.0, 70.0), (100.0, 70.0),
        ],
    },
    HueInfo {
        name: HueName::Yellow,
        hue_range: Some((46.0, 62.0)),
        lower_bounds: &[
            (25.0, 100.0), (40.0, 94.0), (50.0, 89.0), (60.0, 86.0), (70.0, 84.0),
            (80.0, 82.0), (90.0, 80.0), (100.0, 75.0),
        ],
    },
    HueInfo {
        name: HueName::Green,
        hue_range: Some((62.0, 178.0)),
        lower_bounds: &[
            (30.0, 100.0), (40.0, 90.0), (50.0, 85.0), (60.0, 81.0), (70.0, 74.0),
            (80.0, 64.0), (90.0, 50.0), (100.0, 40.0),
        ],
    },
    HueInfo {
        name: HueName::Blue,
        hue_range: Some((178.0, 257.0)),
        lower_bounds: &[
            (20.0, 100.0), (30.0, 86.0), (40.0, 80.0), (50.0, 74.0), (60.0, 60.0),
            (70.0, 52.0), (80.0, 44.0), (90.0, 39.0), (100.0, 35.0),
        ],
    },
    HueInfo {
        name: HueName::Purple,
        hue_range: Some((257.0, 282.0)),
        lower_bounds: &[
            (20.0, 100.0), (30.0, 87.0), (40.0, 79.0), (50.0, 70.0), (60.0, 65.0),
            (70.0, 59.0), (80.0, 52.0), (90.0, 45.0), (100.0, 42.0),
        ],
    },
    HueInfo {
        name: HueName::Pink,
        hue_range: Some((282.0, 334.0)),
        lower_bounds: &[
            (20.0, 100.0), (30.0, 90.0), (40.0, 86.0), (60.0, 84.0), (80.0, 80.0),
            (90.0, 75.0), (100.0, 73.0),
        ],
    },
];

struct Lcg {
    state: u64,
}

impl Lcg {
    /// String seeds collapse to the sum of their UTF-16 code units.
    fn from_seed(seed: &str) -> Self {
        let state = seed
            .encode_utf16()
            .fold(0u64, |acc, unit| acc.saturating_add(u64::from(unit)));
        Self { state }
    }

    /// Floor of a value in `[min, max)`; a zero `max` is widened to 1.
    fn within(&mut self, min: f64, max: f64) -> f64 {
        let max = if max == 0.0 { 1.0 } else { max };
        self.state = ((self.state % LCG_MOD) * LCG_MUL + LCG_INC) % LCG_MOD;
        let rnd = self.state as f64 / LCG_MOD as f64;
        (min + rnd * (max - min)).floor()
    }
}

/// Generate the color described by `request`.
pub fn random_color(request: &ColorRequest) -> IconResult<Rgb> {
    let mut lcg = Lcg::from_seed(&request.seed);

    let hue = pick_hue(&mut lcg, &request.hue)?;
    let saturation = pick_saturation(&mut lcg, hue, request)?;
    let brightness = pick_brightness(&mut lcg, hue, saturation, request.luminosity)?;

    Ok(hsv_to_rgb(hue, saturation, brightness))
}

fn hue_range(hue: &Hue) -> IconResult<(f64, f64)> {
    let range = match hue {
        Hue::Any => None,
        Hue::Named(name) => DICTIONARY
            .iter()
            .find(|info| info.name == *name)
            .and_then(|info| info.hue_range),
        Hue::Degrees(deg) if *deg > 0.0 && *deg < 360.0 => Some((deg.trunc(), deg.trunc())),
        Hue::Degrees(_) => None,
        Hue::Hex(hex) => {
            let h = hex_to_hue(hex)?;
            Some((h, h))
        }
    };
    Ok(range.unwrap_or((0.0, 360.0)))
}

fn pick_hue(lcg: &mut Lcg, hue: &Hue) -> IconResult<f64> {
    let (min, max) = hue_range(hue)?;
    let h = lcg.within(min, max);
    Ok(if h < 0.0 { h + 360.0 } else { h })
}

fn pick_saturation(lcg: &mut Lcg, hue: f64, request: &ColorRequest) -> IconResult<f64> {
    if request.hue == Hue::Named(HueName::Monochrome) {
        return Ok(0.0);
    }
    if request.luminosity == Luminosity::Random {
        return Ok(lcg.within(0.0, 100.0));
    }

    let (mut s_min, mut s_max) = color_info(hue)?.saturation_range();
    match request.luminosity {
        Luminosity::Bright => s_min = 55.0,
        Luminosity::Dark => s_min = s_max - 10.0,
        Luminosity::Light => s_max = 55.0,
        Luminosity::Random => {}
    }
    Ok(lcg.within(s_min, s_max))
}

fn pick_brightness(
    lcg: &mut Lcg,
    hue: f64,
    saturation: f64,
    luminosity: Luminosity,
) -> IconResult<f64> {
    let mut b_min = minimum_brightness(hue, saturation)?;
    let mut b_max = 100.0;
    match luminosity {
        Luminosity::Dark => b_max = b_min + 20.0,
        Luminosity::Light => b_min = (b_max + b_min) / 2.0,
        Luminosity::Random => {
            b_min = 0.0;
            b_max = 100.0;
        }
        Luminosity::Bright => {}
    }
    Ok(lcg.within(b_min, b_max))
}

fn minimum_brightness(hue: f64, saturation: f64) -> IconResult<f64> {
    let bounds = color_info(hue)?.lower_bounds;
    for pair in bounds.windows(2) {
        let (s1, v1) = pair[0];
        let (s2, v2) = pair[1];
        if saturation >= s1 && saturation <= s2 {
            let m = (v2 - v1) / (s2 - s1);
            let b = v1 - m * s1;
            return Ok(m * saturation + b);
        }
    }
    Ok(0.0)
}

fn color_info(hue: f64) -> IconResult<&'static HueInfo> {
    let h = if (334.0..=360.0).contains(&hue) { hue - 360.0 } else { hue };
    DICTIONARY
        .iter()
        .find(|info| matches!(info.hue_range, Some((lo, hi)) if h >= lo && h <= hi))
        .ok_or_else(|| IconError::color(format!("no hue bucket for {hue}")))
}

fn hex_to_hue(hex: &str) -> IconResult<f64> {
    let digits = normalize_hex(hex)?;
    let channel = |i: usize| -> IconResult<f64> {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map(|v| f64::from(v) / 255.0)
            .map_err(|e| IconError::color(e.to_string()))
    };
    let (red, green, blue) = (channel(0)?, channel(2)?, channel(4)?);

    let c_max = red.max(green).max(blue);
    let delta = c_max - red.min(green).min(blue);
    if delta == 0.0 {
        return Ok(0.0);
    }

    let hue = if c_max == red {
        60.0 * (((green - blue) / delta) % 6.0)
    } else if c_max == green {
        60.0 * (((blue - red) / delta) + 2.0)
    } else {
        60.0 * (((red - green) / delta) + 4.0)
    };
    Ok(hue)
}

fn hsv_to_rgb(hue: f64, saturation: f64, brightness: f64) -> Rgb {
    // Keep the sector index inside 0..=5.
    let h = if hue == 0.0 {
        1.0
    } else if hue == 360.0 {
        359.0
    } else {
        hue
    };
    let h = h / 360.0;
    let s = saturation / 100.0;
    let v = brightness / 100.0;

    let h_i = (h * 6.0).floor();
    let f = h * 6.0 - h_i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match h_i as u8 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    let channel = |x: f64| (x * 255.0).floor().clamp(0.0, 255.0) as u8;
    Rgb([channel(r), channel(g), channel(b)])
}
