//! Plaidicon Core - deterministic plaid icon generator
//!
//! # Pipeline
//! 1. Seed -> deterministic RNG
//! 2. RNG -> palette (background, two accents, middle) and block size
//! 3. Palette -> painted block grid with anti-aliased edges
//! 4. Grid -> rotated, cropped, PNG-encoded icon
//!
//! The same seed, size and style always produce byte-identical PNGs.

pub mod color;
pub mod compositor;
pub mod error;
pub mod hashing;
pub mod painter;
pub mod palette;
pub mod pipeline;
pub mod random_color;
pub mod rng;
pub mod style;

pub use color::{extract_rgbs, rgb_to_hex, Rgb, GRAY_BACKGROUND};
pub use compositor::{RotationStep, CROP_FACTOR};
pub use error::{IconError, IconResult};
pub use hashing::{canonical_json, compute_manifest_hash, sha256_hex};
pub use palette::{BlockDivisor, MiddleColor, Palette};
pub use pipeline::{generate, generate_icon, GenerateOptions, GeneratedIcon, IconManifest, DEFAULT_IMAGE_SIZE};
pub use random_color::{random_color, ColorRequest, Hue, HueName, Luminosity};
pub use style::StyleConfig;

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
