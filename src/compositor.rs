//! Image Compositor
//!
//! Raw canvas -> raster -> rotation onto an expanded canvas -> square crop
//! -> PNG bytes. Rotation is drawn with tiny-skia's bilinear pixmap
//! pattern; only the crop window of the rotated canvas is rasterized.

use std::io::Cursor;

use image::{ImageFormat, RgbImage};
use kurbo::Affine;
use resvg::tiny_skia::{Color, FilterQuality, IntSize, Pixmap, PixmapPaint, Transform};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Rgb;
use crate::error::{IconError, IconResult};

/// Crop offset as a fraction of the working dimension. Close to, but not
/// exactly, the centred value `(1 - 1/sqrt(2)) / 2`.
pub const CROP_FACTOR: f64 = 0.146892655;

/// Angular granularity of the random rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "mode")]
pub enum RotationStep {
    /// Multiples of `step` degrees in `[0, 360]`.
    Snapped { step: u32 },
    /// Any angle in `[0, 360)`.
    Continuous,
}

impl Default for RotationStep {
    fn default() -> Self {
        Self::Snapped { step: 5 }
    }
}

impl RotationStep {
    pub fn degrees(&self, r: f64) -> f64 {
        match *self {
            RotationStep::Snapped { step } => {
                let step = f64::from(step.max(1));
                let buckets = (360.0 / step).floor() + 1.0;
                360.0 - step * (r * buckets).floor()
            }
            RotationStep::Continuous => r * 360.0,
        }
    }
}

/// Source image rotated clockwise (image coordinates) about its centre onto
/// a canvas large enough to hold every source pixel.
pub struct RotatedCanvas {
    source: Pixmap,
    transform: Affine,
    width: u32,
    height: u32,
    fill: Rgb,
}

impl RotatedCanvas {
    pub fn new(source: &RgbImage, degrees: f64, fill: Rgb) -> IconResult<Self> {
        let radians = degrees.rem_euclid(360.0).to_radians();
        let (sin, cos) = radians.sin_cos();
        let (w, h) = (f64::from(source.width()), f64::from(source.height()));

        let width = canvas_extent(w * cos.abs() + h * sin.abs());
        let height = canvas_extent(w * sin.abs() + h * cos.abs());

        let transform = Affine::translate((f64::from(width) / 2.0, f64::from(height) / 2.0))
            * Affine::rotate(radians)
            * Affine::translate((-w / 2.0, -h / 2.0));

        Ok(Self {
            source: to_pixmap(source)?,
            transform,
            width,
            height,
            fill,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Rasterize the `w x h` window whose top-left corner is `(x, y)`.
    /// Pixels the rotated source does not cover keep `fill`.
    pub fn render_window(&self, x: u32, y: u32, w: u32, h: u32) -> IconResult<RgbImage> {
        let mut target = Pixmap::new(w, h)
            .ok_or_else(|| IconError::Encoding(format!("cannot allocate a {w}x{h} window")))?;
        let [r, g, b] = self.fill.0;
        target.fill(Color::from_rgba8(r, g, b, 255));

        let window = Affine::translate((-f64::from(x), -f64::from(y))) * self.transform;
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        target.draw_pixmap(0, 0, self.source.as_ref(), &paint, to_transform(window), None);

        // Opaque everywhere, so premultiplied RGBA is plain RGBA.
        let rgb = target
            .data()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        RgbImage::from_raw(w, h, rgb)
            .ok_or_else(|| IconError::Encoding(format!("window {w}x{h} lost pixels")))
    }

    pub fn render(&self) -> IconResult<RgbImage> {
        self.render_window(0, 0, self.width, self.height)
    }
}

fn to_pixmap(image: &RgbImage) -> IconResult<Pixmap> {
    let (w, h) = image.dimensions();
    let size = IntSize::from_wh(w, h)
        .ok_or_else(|| IconError::Encoding(format!("cannot rotate a {w}x{h} image")))?;
    let rgba = image.pixels().flat_map(|p| [p[0], p[1], p[2], 255]).collect();
    Pixmap::from_vec(rgba, size)
        .ok_or_else(|| IconError::Encoding(format!("cannot build a {w}x{h} pixmap")))
}

fn to_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

// Trig noise at right angles must not grow the canvas by a pixel.
fn canvas_extent(extent: f64) -> u32 {
    (extent - 1e-9).ceil().max(1.0) as u32
}

/// Parameters of one composition.
#[derive(Debug, Clone, Copy)]
pub struct Composite {
    pub working: u32,
    pub size: u32,
    pub degrees: f64,
    pub crop_factor: f64,
    pub fill: Rgb,
}

/// Top-left corner of the crop on the rotated canvas. The offset is taken
/// in the un-rotated frame and shifted by the canvas growth.
pub fn crop_origin(working: u32, rotated: (u32, u32), crop_factor: f64) -> (u32, u32) {
    let offset = (f64::from(working) * crop_factor).floor() as u32;
    let pad_x = rotated.0.saturating_sub(working) / 2;
    let pad_y = rotated.1.saturating_sub(working) / 2;
    (offset + pad_x, offset + pad_y)
}

pub fn compose(raw: Vec<u8>, spec: &Composite) -> IconResult<Vec<u8>> {
    let canvas = {
        let source = RgbImage::from_raw(spec.working, spec.working, raw).ok_or_else(|| {
            IconError::Encoding(format!(
                "pixel buffer does not hold a {0}x{0} RGB image",
                spec.working
            ))
        })?;
        RotatedCanvas::new(&source, spec.degrees, spec.fill)?
    };
    let (width, height) = canvas.dimensions();
    let (x, y) = crop_origin(spec.working, (width, height), spec.crop_factor);

    let fits = x.checked_add(spec.size).is_some_and(|r| r <= width)
        && y.checked_add(spec.size).is_some_and(|b| b <= height);
    if !fits {
        return Err(IconError::CropOutOfBounds {
            x,
            y,
            size: spec.size,
            width,
            height,
        });
    }

    debug!(degrees = spec.degrees, width, height, x, y, "rotating and cropping");
    let cropped = canvas.render_window(x, y, spec.size, spec.size)?;

    encode_png(&cropped)
}

pub fn encode_png(image: &RgbImage) -> IconResult<Vec<u8>> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}
