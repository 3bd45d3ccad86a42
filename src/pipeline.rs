//! Generation Pipeline - Single Entry Point
//!
//! seed/size -> palette -> painted grid -> rotate/crop -> PNG.
//! One `SeedRng` is threaded through every stage in a fixed order; a call
//! owns all of its state, so concurrent calls need no coordination.

use serde::{Deserialize, Serialize};
use std::f64::consts::SQRT_2;
use tracing::{debug, info};

use crate::compositor::{compose, Composite};
use crate::error::{IconError, IconResult};
use crate::hashing::{compute_manifest_hash, compute_request_hash, sha256_hex};
use crate::painter::paint;
use crate::palette::{build_palette, Palette};
use crate::rng::{random_seed, SeedRng};
use crate::style::StyleConfig;
use crate::ENGINE_VERSION;

pub const DEFAULT_IMAGE_SIZE: i64 = 1000;

/// Largest accepted output side; keeps the working canvas addressable.
pub const MAX_IMAGE_SIZE: i64 = 32_768;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    #[serde(default = "default_size")]
    pub size: i64,
    /// Empty or missing means a fresh random seed.
    #[serde(default)]
    pub seed: Option<String>,
    #[serde(default)]
    pub style: StyleConfig,
}

fn default_size() -> i64 { DEFAULT_IMAGE_SIZE }

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_IMAGE_SIZE,
            seed: None,
            style: StyleConfig::default(),
        }
    }
}

impl GenerateOptions {
    pub fn new(size: i64, seed: impl Into<String>) -> Self {
        Self {
            size,
            seed: Some(seed.into()),
            style: StyleConfig::default(),
        }
    }

    pub fn with_style(mut self, style: StyleConfig) -> Self {
        self.style = style;
        self
    }
}

/// Output of one generation plus the choices that produced it.
#[derive(Debug, Clone)]
pub struct GeneratedIcon {
    pub seed: String,
    pub size: u32,
    pub working_dimension: u32,
    pub block_size: u32,
    pub rotation_degrees: f64,
    pub palette: Palette,
    pub style: StyleConfig,
    pub png: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconManifest {
    pub engine_version: String,
    pub seed: String,
    pub size: u32,
    pub working_dimension: u32,
    pub block_size: u32,
    pub rotation_degrees: f64,
    /// background, accent A, accent B, middle
    pub palette: Vec<String>,
    pub request_hash: String,
    pub png_sha256: String,
    pub manifest_hash: String,
}

impl GeneratedIcon {
    pub fn manifest(&self) -> IconResult<IconManifest> {
        let p = &self.palette;
        let mut manifest = IconManifest {
            engine_version: ENGINE_VERSION.to_string(),
            seed: self.seed.clone(),
            size: self.size,
            working_dimension: self.working_dimension,
            block_size: self.block_size,
            rotation_degrees: self.rotation_degrees,
            palette: [p.background, p.accent_a, p.accent_b, p.middle]
                .iter()
                .map(|c| c.to_hex())
                .collect(),
            request_hash: compute_request_hash(&self.seed, self.size, &self.style, ENGINE_VERSION)?,
            png_sha256: sha256_hex(&self.png),
            manifest_hash: String::new(), // Computed after
        };
        manifest.manifest_hash = compute_manifest_hash(&manifest)?;
        Ok(manifest)
    }

    pub fn png_base64(&self) -> String {
        base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &self.png)
    }
}

/// Side of the oversized canvas that survives any rotation of the crop.
pub fn working_dimension(size: u32) -> u32 {
    (f64::from(size) * SQRT_2).ceil() as u32
}

fn validate_size(size: i64) -> IconResult<u32> {
    if size <= 0 || size > MAX_IMAGE_SIZE {
        return Err(IconError::InvalidSize(size));
    }
    u32::try_from(size).map_err(|_| IconError::InvalidSize(size))
}

/// Generate an icon and return the encoded PNG.
pub fn generate(options: &GenerateOptions) -> IconResult<Vec<u8>> {
    generate_icon(options).map(|icon| icon.png)
}

/// Generate an icon, keeping the resolved seed and intermediate choices.
#[tracing::instrument(skip(options), fields(size = options.size))]
pub fn generate_icon(options: &GenerateOptions) -> IconResult<GeneratedIcon> {
    let size = validate_size(options.size)?;
    options.style.validate()?;

    let seed = match options.seed.as_deref() {
        Some(seed) if !seed.is_empty() => seed.to_string(),
        _ => random_seed()?,
    };

    let working = working_dimension(size);
    debug!(working, "working dimension");

    let mut rng = SeedRng::new(&seed);
    let draw = build_palette(&mut rng, working, &options.style)?;

    let pixels = paint(working, draw.block_size, &draw.palette, options.style.antialias);

    let rotation_degrees = options.style.rotation.degrees(rng.next_f64());
    let composite = Composite {
        working,
        size,
        degrees: rotation_degrees,
        crop_factor: options.style.crop_factor,
        fill: options.style.background_color()?,
    };
    let png = compose(pixels.into_raw(), &composite)?;

    info!(
        seed = %seed,
        block_size = draw.block_size,
        rotation_degrees,
        draws = rng.draws(),
        bytes = png.len(),
        "icon generated"
    );

    Ok(GeneratedIcon {
        seed,
        size,
        working_dimension: working,
        block_size: draw.block_size,
        rotation_degrees,
        palette: draw.palette,
        style: options.style.clone(),
        png,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_working_dimension_covers_rotation() {
        assert_eq!(working_dimension(1000), 1415);
        assert_eq!(working_dimension(1), 2);
        for size in [1, 2, 7, 99, 500, 4000] {
            assert!(working_dimension(size) >= size);
            assert!(f64::from(working_dimension(size)) >= f64::from(size) * SQRT_2);
        }
    }

    #[test]
    fn test_validate_size() {
        assert_eq!(validate_size(1).unwrap(), 1);
        assert!(matches!(validate_size(0), Err(IconError::InvalidSize(0))));
        assert!(matches!(validate_size(-5), Err(IconError::InvalidSize(-5))));
        assert!(validate_size(MAX_IMAGE_SIZE + 1).is_err());
    }

    #[test]
    fn test_options_defaults_from_json() {
        let options: GenerateOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.size, DEFAULT_IMAGE_SIZE);
        assert!(options.seed.is_none());
        assert_eq!(options.style, StyleConfig::default());
    }

    #[test]
    fn test_manifest_fields() {
        let icon = generate_icon(&GenerateOptions::new(32, "manifest")).unwrap();
        let manifest = icon.manifest().unwrap();
        assert_eq!(manifest.seed, "manifest");
        assert_eq!(manifest.size, 32);
        assert_eq!(manifest.working_dimension, 46);
        assert_eq!(manifest.palette.len(), 4);
        assert_eq!(manifest.palette[0], "#ECEFF0");
        assert_eq!(manifest.png_sha256, sha256_hex(&icon.png));
        assert_eq!(manifest.manifest_hash.len(), 64);
    }

    #[test]
    fn test_empty_seed_is_replaced() {
        let icon = generate_icon(&GenerateOptions::new(8, "")).unwrap();
        assert_eq!(icon.seed.len(), 32);
    }
}
