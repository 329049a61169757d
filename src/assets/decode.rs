use std::sync::Arc;

use crate::{
    assets::store::PreparedImage,
    foundation::error::{WrappedError, WrappedResult},
};

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> WrappedResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| WrappedError::asset(format!("decode image: {e}")))?;
    Ok(prepare_rgba(dyn_img.to_rgba8()))
}

/// Decode and resample to exactly `width`×`height`.
pub fn decode_image_resized(bytes: &[u8], width: u32, height: u32) -> WrappedResult<PreparedImage> {
    if width == 0 || height == 0 {
        return Err(WrappedError::validation("resize target must be non-empty"));
    }
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| WrappedError::asset(format!("decode image: {e}")))?;
    let resized = image::imageops::resize(
        &dyn_img.to_rgba8(),
        width,
        height,
        image::imageops::FilterType::Lanczos3,
    );
    Ok(prepare_rgba(resized))
}

fn prepare_rgba(rgba: image::RgbaImage) -> PreparedImage {
    let (width, height) = rgba.dimensions();
    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    }
}

pub fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// Inverse of [`premultiply_rgba8_in_place`], used before encoding to formats that store
/// straight alpha.
pub fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
