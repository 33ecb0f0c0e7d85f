//! Blank guide canvases used to anchor the framing of reference-guided
//! generations.

use crate::{Error, Result};
use base64::Engine as _;
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Pixels per ratio unit along each side.
pub const CANVAS_SCALE: u32 = 100;

/// Largest canvas side in pixels. Ratios that would exceed it are rejected.
pub const MAX_CANVAS_SIDE: u32 = 4096;

/// Parse a `"W:H"` ratio of positive integers.
pub fn parse_ratio(ratio: &str) -> Result<(u32, u32)> {
    let invalid = || {
        Error::InvalidInput(format!(
            "Aspect ratio '{}' must look like W:H with positive whole numbers",
            ratio
        ))
    };

    let (w, h) = ratio.split_once(':').ok_or_else(invalid)?;
    let parse_side = |side: &str| -> Result<u32> {
        if side.is_empty() || !side.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        match side.parse::<u32>() {
            Ok(0) | Err(_) => Err(invalid()),
            Ok(n) => Ok(n),
        }
    };

    Ok((parse_side(w)?, parse_side(h)?))
}

/// Render a fully transparent PNG of `100*W x 100*H` pixels and return it as
/// bare base64 (no data-URL prefix). Neither side may exceed
/// [`MAX_CANVAS_SIDE`].
pub fn seed_canvas(ratio: &str) -> Result<String> {
    let (w, h) = parse_ratio(ratio)?;
    let scale = |units: u32| {
        units
            .checked_mul(CANVAS_SCALE)
            .filter(|px| *px <= MAX_CANVAS_SIDE)
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "Aspect ratio '{}' is too large; each side may be at most {} units",
                    ratio,
                    MAX_CANVAS_SIDE / CANVAS_SCALE
                ))
            })
    };
    let width = scale(w)?;
    let height = scale(h)?;

    let canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    let mut bytes = Vec::new();
    canvas.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

    tracing::debug!(
        "Rendered {}x{} seed canvas for ratio {} ({} bytes)",
        width,
        height,
        ratio,
        bytes.len()
    );

    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}
