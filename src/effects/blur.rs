use crate::foundation::error::{WrappedError, WrappedResult};

/// Post-processing filter applied to a whole layer before it is composited.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlurSpec {
    Box { radius: u32 },
    Gaussian { radius: u32, sigma: f32 },
}

pub fn blur_layer(src: &[u8], width: u32, height: u32, spec: BlurSpec) -> WrappedResult<Vec<u8>> {
    match spec {
        BlurSpec::Box { radius } => box_blur_rgba8_premul(src, width, height, radius),
        BlurSpec::Gaussian { radius, sigma } => {
            blur_rgba8_premul(src, width, height, radius, sigma)
        }
    }
}

pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> WrappedResult<Vec<u8>> {
    check_len(src, width, height)?;
    if radius == 0 {
        return Ok(src.to_vec());
    }
    let kernel = gaussian_kernel_q16(radius, sigma)?;
    Ok(separable(src, width, height, &kernel))
}

/// Uniform-weight blur over a `(2r+1)` window in each direction.
pub fn box_blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
) -> WrappedResult<Vec<u8>> {
    check_len(src, width, height)?;
    if radius == 0 {
        return Ok(src.to_vec());
    }
    let kernel = box_kernel_q16(radius);
    Ok(separable(src, width, height, &kernel))
}

fn check_len(src: &[u8], width: u32, height: u32) -> WrappedResult<()> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| WrappedError::validation("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(WrappedError::validation(
            "blur expects src matching width*height*4",
        ));
    }
    Ok(())
}

fn separable(src: &[u8], width: u32, height: u32, kernel: &[u32]) -> Vec<u8> {
    let mut tmp = vec![0u8; src.len()];
    let mut out = vec![0u8; src.len()];
    horizontal_pass(src, &mut tmp, width, height, kernel);
    vertical_pass(&tmp, &mut out, width, height, kernel);
    out
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> WrappedResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(WrappedError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(WrappedError::validation("gaussian kernel sum is zero"));
    }

    let weights = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    Ok(normalize_q16(weights))
}

fn box_kernel_q16(radius: u32) -> Vec<u32> {
    let taps = 2 * radius as usize + 1;
    let w = 65536 / taps as u32;
    normalize_q16(vec![w; taps])
}

/// Push rounding error into the centre tap so the weights sum to exactly 1.0 in Q16.
fn normalize_q16(mut weights: Vec<u32>) -> Vec<u32> {
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    weights
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
