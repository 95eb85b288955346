//! Text watermarking for approved photos
//!
//! Decodes the photo, draws a semi-transparent dark box with the configured
//! text centered near the bottom edge, and re-encodes it as JPEG. Everything
//! happens on in-memory buffers; the only file ever read is the configured
//! font, and DejaVu Sans is compiled in as the default.

use ab_glyph::{FontArc, PxScale};
use image::codecs::jpeg::JpegEncoder;
use image::{imageops, DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

use crate::core::config::watermark::{
    BOTTOM_MARGIN_RATIO, BOX_COLOR, BOX_PADDING, FONT_HEIGHT_DIVISOR, JPEG_QUALITY, MIN_FONT_SIZE, TEXT_COLOR,
};
use crate::core::error::{AppResult, WatermarkError};

/// Default font (DejaVu Sans, see assets/DejaVuSans-LICENSE.txt)
static BUNDLED_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// What to stamp onto approved photos
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatermarkSpec {
    /// Text drawn at the bottom of the image
    pub text: String,
    /// Preferred TrueType/OpenType font. The bundled font is used when unset
    /// or unusable.
    pub font_path: Option<PathBuf>,
}

/// The image step of the approve path.
///
/// Implementations must never panic on bad input; every failure is a
/// `WatermarkError` and the caller posts the original instead.
pub trait ImageTransform: Send + Sync {
    fn apply(&self, image: &[u8]) -> Result<Vec<u8>, WatermarkError>;
}

/// Where the text and its backing box land on the image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Left edge of the text
    pub x: i32,
    /// Top edge of the text
    pub y: i32,
    pub text_width: u32,
    pub text_height: u32,
}

impl Placement {
    /// The dark box: the text footprint padded on every side, both corner
    /// pixels included
    pub fn box_rect(&self) -> Rect {
        let padding = BOX_PADDING as u32;
        Rect::at(self.x - BOX_PADDING, self.y - BOX_PADDING).of_size(
            self.text_width + 2 * padding + 1,
            self.text_height + 2 * padding + 1,
        )
    }

    /// Bottom edge of the text
    pub fn text_bottom(&self) -> i32 {
        self.y + self.text_height as i32
    }
}

/// Font size for an image of the given height: `max(15, height / 30)`
pub fn font_size(image_height: u32) -> f32 {
    (image_height as f32 / FONT_HEIGHT_DIVISOR).max(MIN_FONT_SIZE)
}

/// Horizontally centered, bottom edge of the text 5% of the height above
/// the image's bottom edge.
///
/// Text wider than the image gets a negative `x`; it is clipped evenly on
/// both sides when drawn.
pub fn placement(image_width: u32, image_height: u32, text_width: u32, text_height: u32) -> Placement {
    let x = (image_width as i64 - text_width as i64).div_euclid(2);
    let margin = image_height as f32 * BOTTOM_MARGIN_RATIO;
    let y = (image_height as f32 - text_height as f32 - margin).round();

    Placement {
        x: x as i32,
        y: y as i32,
        text_width,
        text_height,
    }
}

/// Stamps `spec.text` onto images. Loads the font on first use and keeps it.
pub struct Watermarker {
    spec: WatermarkSpec,
    font: OnceCell<FontArc>,
}

impl Watermarker {
    pub fn new(spec: WatermarkSpec) -> Self {
        Self {
            spec,
            font: OnceCell::new(),
        }
    }

    pub fn spec(&self) -> &WatermarkSpec {
        &self.spec
    }

    /// Loads the font now rather than on the first approval, so an unusable
    /// WATERMARK_FONT_PATH shows up in the startup log.
    pub fn preload_font(&self) -> Result<(), WatermarkError> {
        self.font().map(|_| ())
    }

    fn font(&self) -> Result<&FontArc, WatermarkError> {
        self.font.get_or_try_init(|| load_font(self.spec.font_path.as_deref()))
    }

    /// Where the text and its box go on an image of the given size
    pub fn layout(&self, width: u32, height: u32) -> Result<Placement, WatermarkError> {
        let font = self.font()?;
        let (text_width, text_height) = text_size(PxScale::from(font_size(height)), font, &self.spec.text);
        Ok(placement(width, height, text_width, text_height))
    }

    /// Decode, stamp and re-encode as JPEG
    pub fn watermark(&self, image_bytes: &[u8]) -> Result<Vec<u8>, WatermarkError> {
        let decoded = image::load_from_memory(image_bytes).map_err(WatermarkError::Decode)?;
        let mut base = decoded.to_rgba8();
        let (width, height) = base.dimensions();
        if width == 0 || height == 0 {
            return Err(WatermarkError::EmptyImage);
        }

        let font = self.font()?;
        let scale = PxScale::from(font_size(height));
        let placement = self.layout(width, height)?;

        log::debug!(
            "Watermark {}x{} at ({}, {}) on {}x{} image",
            placement.text_width,
            placement.text_height,
            placement.x,
            placement.y,
            width,
            height
        );

        let mut layer = RgbaImage::new(width, height);
        draw_filled_rect_mut(&mut layer, placement.box_rect(), Rgba(BOX_COLOR));
        draw_text_mut(
            &mut layer,
            Rgba(TEXT_COLOR),
            placement.x,
            placement.y,
            scale,
            font,
            &self.spec.text,
        );
        imageops::overlay(&mut base, &layer, 0, 0);

        let flattened = DynamicImage::ImageRgba8(base).to_rgb8();
        let mut encoded = Vec::new();
        JpegEncoder::new_with_quality(&mut encoded, JPEG_QUALITY)
            .encode_image(&flattened)
            .map_err(WatermarkError::Encode)?;

        Ok(encoded)
    }
}

impl ImageTransform for Watermarker {
    fn apply(&self, image: &[u8]) -> Result<Vec<u8>, WatermarkError> {
        self.watermark(image)
    }
}

/// Loads the preferred font, falling back to the bundled one.
///
/// Only fails if the bundled font itself is broken.
fn load_font(preferred: Option<&Path>) -> Result<FontArc, WatermarkError> {
    if let Some(path) = preferred {
        match std::fs::read(path) {
            Ok(bytes) => match FontArc::try_from_vec(bytes) {
                Ok(font) => {
                    log::info!("Watermark font loaded from {}", path.display());
                    return Ok(font);
                }
                Err(e) => log::warn!("Font {} is not usable ({}), using bundled font", path.display(), e),
            },
            Err(e) => log::warn!("Font {} unavailable ({}), using bundled font", path.display(), e),
        }
    }

    FontArc::try_from_slice(BUNDLED_FONT).map_err(|e| WatermarkError::Font(format!("bundled font: {}", e)))
}

/// Watermarks a local image file. Used by the `watermark` CLI command to
/// preview the result without going through Telegram.
pub fn watermark_file(input: &Path, output: &Path, spec: &WatermarkSpec) -> AppResult<()> {
    let original = std::fs::read(input)?;
    let stamped = Watermarker::new(spec.clone()).watermark(&original)?;
    std::fs::write(output, stamped)?;
    log::info!("Watermarked {} -> {}", input.display(), output.display());
    Ok(())
}
