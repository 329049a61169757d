use std::path::Path;

use anyhow::Context as _;

use crate::{
    assets::decode::unpremultiply_rgba8_in_place,
    foundation::{
        core::Canvas,
        error::{WrappedError, WrappedResult},
        math::Fnv1a64,
    },
};

/// A rendered panel as RGBA8 bytes.
///
/// Panels are rendered premultiplied; the `premultiplied` flag travels with the bytes so that
/// writers know whether to convert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// Tightly packed, row-major.
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Fully transparent frame.
    pub fn transparent(canvas: Canvas) -> WrappedResult<Self> {
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0; canvas.byte_len()?],
            premultiplied: true,
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Stable FNV-1a hash over dimensions and pixel bytes.
    pub fn digest(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u32(self.width);
        h.write_u32(self.height);
        h.write_bytes(&self.data);
        h.finish()
    }

    /// Write as a straight-alpha PNG.
    pub fn save_png(&self, path: &Path) -> WrappedResult<()> {
        let mut rgba = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut rgba);
        }
        image::save_buffer_with_format(
            path,
            &rgba,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))
        .map_err(|e| WrappedError::asset(format!("{e:#}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
