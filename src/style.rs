//! Style configuration - the knobs of one generation.
//!
//! Every field has a default, so `{}` is a complete style file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::color::{Rgb, GRAY_BACKGROUND};
use crate::compositor::{RotationStep, CROP_FACTOR};
use crate::error::{IconError, IconResult};
use crate::palette::{BlockDivisor, MiddleColor};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleConfig {
    #[serde(default = "default_true")]
    pub antialias: bool,
    #[serde(default)]
    pub middle_color: MiddleColor,
    #[serde(default)]
    pub rotation: RotationStep,
    #[serde(default)]
    pub block_divisor: BlockDivisor,
    #[serde(default = "default_crop_factor")]
    pub crop_factor: f64,
    /// `#RRGGBB` or `rgb(r, g, b)`; also fills the corners exposed by rotation.
    #[serde(default = "default_background")]
    pub background: String,
}

fn default_true() -> bool { true }
fn default_crop_factor() -> f64 { CROP_FACTOR }
fn default_background() -> String { GRAY_BACKGROUND.to_hex() }

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            antialias: true,
            middle_color: MiddleColor::default(),
            rotation: RotationStep::default(),
            block_divisor: BlockDivisor::default(),
            crop_factor: CROP_FACTOR,
            background: default_background(),
        }
    }
}

impl StyleConfig {
    pub fn load(path: &Path) -> IconResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| IconError::config(format!("{}: {}", path.display(), e)))?;
        let style: StyleConfig = serde_json::from_str(&content)
            .map_err(|e| IconError::config(format!("{}: {}", path.display(), e)))?;
        style.validate()?;
        Ok(style)
    }

    pub fn background_color(&self) -> IconResult<Rgb> {
        self.background
            .parse::<Rgb>()
            .map_err(|e| IconError::config(format!("background: {e}")))
    }

    pub fn validate(&self) -> IconResult<()> {
        match self.rotation {
            RotationStep::Snapped { step } if step == 0 || step > 360 => {
                return Err(IconError::config(format!("rotation step {step} not in 1..=360")));
            }
            _ => {}
        }

        match self.block_divisor {
            BlockDivisor::Whole { min, max } if min == 0 || min > max => {
                return Err(IconError::config(format!("block divisor range {min}..={max} is empty")));
            }
            BlockDivisor::Fractional { min, max } if !(min >= 1.0 && min <= max && max.is_finite()) => {
                return Err(IconError::config(format!(
                    "block divisor range {min}..{max} must start at 1 or more"
                )));
            }
            _ => {}
        }

        if !(self.crop_factor > 0.0 && self.crop_factor < 0.5) {
            return Err(IconError::config(format!(
                "crop factor {} not in (0, 0.5)",
                self.crop_factor
            )));
        }

        self.background_color()?;
        Ok(())
    }
}
