//! Palette Builder
//!
//! Consumes the first four draws of a generation, in this order:
//! block divisor, accent A seed, accent B seed, middle-color seed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Rgb;
use crate::error::IconResult;
use crate::random_color::{random_color, ColorRequest, Hue, Luminosity};
use crate::rng::{seed_string, SeedRng};
use crate::style::StyleConfig;

/// How the color of the centre (odd row, odd column) blocks is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MiddleColor {
    /// Floor-average of the two accents.
    Average,
    /// Dark color drawn with the hue of the accents' average.
    #[default]
    SeededDark,
}

/// Range the block divisor (blocks across the canvas) is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "mode")]
pub enum BlockDivisor {
    /// Integer divisor, both bounds inclusive.
    Whole { min: u32, max: u32 },
    /// Real divisor in `[min, max)` rounded to hundredths.
    Fractional { min: f64, max: f64 },
}

impl Default for BlockDivisor {
    fn default() -> Self {
        Self::Whole { min: 3, max: 4 }
    }
}

impl BlockDivisor {
    pub fn divisor(&self, r: f64) -> f64 {
        match *self {
            BlockDivisor::Whole { min, max } => {
                let width = f64::from(max.saturating_sub(min)) + 1.0;
                (r * width).floor() + f64::from(min)
            }
            BlockDivisor::Fractional { min, max } => {
                ((r * (max - min) + min) * 100.0).round() / 100.0
            }
        }
    }
}

/// Side of one block; never less than a pixel nor more than the canvas.
pub fn block_size(working: u32, divisor: f64) -> u32 {
    let divisor = if divisor.is_finite() { divisor.max(1.0) } else { 1.0 };
    ((f64::from(working) / divisor).floor() as u32).max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub background: Rgb,
    pub accent_a: Rgb,
    pub accent_b: Rgb,
    pub middle: Rgb,
}

impl Palette {
    pub fn new(
        background: Rgb,
        accent_a: Rgb,
        accent_b: Rgb,
        mode: MiddleColor,
        middle_seed: &str,
    ) -> IconResult<Self> {
        let middle = middle_color(accent_a, accent_b, mode, middle_seed)?;
        Ok(Self { background, accent_a, accent_b, middle })
    }

    /// `[background, accentA, accentB]`
    pub fn colors(&self) -> [Rgb; 3] {
        [self.background, self.accent_a, self.accent_b]
    }

    /// Plaid rule keyed by row/column parity.
    pub fn block_color(&self, row: u32, col: u32) -> Rgb {
        match (row % 2, col % 2) {
            (0, 0) => self.background,
            (0, _) => self.accent_a,
            (_, 0) => self.accent_b,
            _ => self.middle,
        }
    }
}

pub fn middle_color(a: Rgb, b: Rgb, mode: MiddleColor, seed: &str) -> IconResult<Rgb> {
    let average = Rgb::average(a, b);
    match mode {
        MiddleColor::Average => Ok(average),
        MiddleColor::SeededDark => {
            let request = ColorRequest::new(seed, Luminosity::Dark).with_hue(Hue::Hex(average.to_hex()));
            random_color(&request)
        }
    }
}

/// Palette plus the block grid it will be painted on.
#[derive(Debug, Clone, Copy)]
pub struct PaletteDraw {
    pub palette: Palette,
    pub divisor: f64,
    pub block_size: u32,
}

pub fn build_palette(rng: &mut SeedRng, working: u32, style: &StyleConfig) -> IconResult<PaletteDraw> {
    let divisor = style.block_divisor.divisor(rng.next_f64());
    let block_size = block_size(working, divisor);

    let accent_a = random_color(&ColorRequest::new(seed_string(rng.next_f64()), Luminosity::Bright))?;
    let accent_b = random_color(&ColorRequest::new(seed_string(rng.next_f64()), Luminosity::Bright))?;

    // Drawn in every mode so later draws keep their position.
    let middle_seed = seed_string(rng.next_f64());

    let palette = Palette::new(
        style.background_color()?,
        accent_a,
        accent_b,
        style.middle_color,
        &middle_seed,
    )?;

    debug!(
        divisor,
        block_size,
        accent_a = %palette.accent_a,
        accent_b = %palette.accent_b,
        middle = %palette.middle,
        "palette built"
    );

    Ok(PaletteDraw { palette, divisor, block_size })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_palette() -> Palette {
        Palette::new(
            Rgb::new(0, 0, 0),
            Rgb::new(100, 100, 100),
            Rgb::new(200, 200, 200),
            MiddleColor::Average,
            "unused",
        )
        .unwrap()
    }

    #[test]
    fn test_block_color_by_parity() {
        let p = gray_palette();
        let [c0, c1, c2] = p.colors();
        let center = Rgb::new(150, 150, 150);

        assert_eq!(p.block_color(0, 0), c0);
        assert_eq!(p.block_color(0, 1), c1);
        assert_eq!(p.block_color(0, 2), c0);
        assert_eq!(p.block_color(1, 0), c2);
        assert_eq!(p.block_color(1, 1), center);
        assert_eq!(p.block_color(1, 2), c2);
        assert_eq!(p.block_color(2, 0), c0);
        assert_eq!(p.block_color(2, 1), c1);
        assert_eq!(p.block_color(2, 2), c0);
    }

    #[test]
    fn test_block_color_period_two() {
        let p = gray_palette();
        for row in 0..6 {
            for col in 0..6 {
                assert_eq!(p.block_color(row, col), p.block_color(row + 2, col));
                assert_eq!(p.block_color(row, col), p.block_color(row, col + 2));
            }
        }
    }

    #[test]
    fn test_seeded_dark_middle_is_deterministic() {
        let a = Rgb::new(200, 40, 60);
        let b = Rgb::new(100, 140, 200);
        let m1 = middle_color(a, b, MiddleColor::SeededDark, "0.25").unwrap();
        let m2 = middle_color(a, b, MiddleColor::SeededDark, "0.25").unwrap();
        assert_eq!(m1, m2);
        assert_ne!(m1, Rgb::average(a, b));
    }

    #[test]
    fn test_whole_divisor_range() {
        let d = BlockDivisor::Whole { min: 3, max: 4 };
        assert_eq!(d.divisor(0.0), 3.0);
        assert_eq!(d.divisor(0.49), 3.0);
        assert_eq!(d.divisor(0.5), 4.0);
        assert_eq!(d.divisor(0.999), 4.0);
    }

    #[test]
    fn test_fractional_divisor_rounds_to_hundredths() {
        let d = BlockDivisor::Fractional { min: 2.5, max: 4.0 };
        assert_eq!(d.divisor(0.0), 2.5);
        assert_eq!(d.divisor(0.5), 3.25);
        assert!(d.divisor(0.9999) <= 4.0);
    }

    #[test]
    fn test_block_size_never_zero() {
        assert_eq!(block_size(1415, 3.0), 471);
        assert_eq!(block_size(1415, 4.0), 353);
        assert_eq!(block_size(2, 3.0), 1);
    }

    #[test]
    fn test_block_size_capped_at_canvas() {
        assert_eq!(block_size(64, 0.0), 64);
        assert_eq!(block_size(64, 0.25), 64);
        assert_eq!(block_size(64, f64::NAN), 64);
    }

    #[test]
    fn test_inverted_whole_range_does_not_panic() {
        let d = BlockDivisor::Whole { min: 5, max: 3 };
        assert_eq!(d.divisor(0.0), 5.0);
        assert_eq!(d.divisor(0.99), 5.0);

        let style = StyleConfig { block_divisor: d, ..StyleConfig::default() };
        let draw = build_palette(&mut SeedRng::new("inverted"), 100, &style).unwrap();
        assert_eq!(draw.block_size, 20);
    }

    #[test]
    fn test_build_palette_draw_order() {
        let style = StyleConfig::default();
        let mut rng = SeedRng::new("plaid");
        let draw = build_palette(&mut rng, 1415, &style).unwrap();
        assert_eq!(rng.draws(), 4);
        assert_eq!(draw.palette.background, crate::color::GRAY_BACKGROUND);
        assert!(draw.divisor == 3.0 || draw.divisor == 4.0);

        let mut again = SeedRng::new("plaid");
        let redraw = build_palette(&mut again, 1415, &style).unwrap();
        assert_eq!(draw.palette, redraw.palette);
        assert_eq!(draw.block_size, redraw.block_size);
    }

    #[test]
    fn test_middle_mode_does_not_shift_stream() {
        let dark = StyleConfig::default();
        let average = StyleConfig { middle_color: MiddleColor::Average, ..StyleConfig::default() };

        let mut r1 = SeedRng::new("stream");
        let mut r2 = SeedRng::new("stream");
        let p1 = build_palette(&mut r1, 500, &dark).unwrap();
        let p2 = build_palette(&mut r2, 500, &average).unwrap();

        assert_eq!(p1.palette.accent_a, p2.palette.accent_a);
        assert_eq!(p1.palette.accent_b, p2.palette.accent_b);
        assert_eq!(r1.next_f64().to_bits(), r2.next_f64().to_bits());
    }
}
