use crate::foundation::error::{TextBehindError, TextBehindResult};

/// Kernel radius and sigma matching a canvas-style `shadowBlur` of `blur_px`.
///
/// The canvas model blurs with a Gaussian of standard deviation `blur / 2`; the kernel is cut
/// off at three sigma.
pub(crate) fn shadow_kernel(blur_px: f64) -> Option<(u32, f32)> {
    if !blur_px.is_finite() || blur_px <= 0.0 {
        return None;
    }
    let sigma = blur_px / 2.0;
    let radius = (sigma * 3.0).ceil().max(1.0) as u32;
    Some((radius, sigma as f32))
}

/// Gaussian blur of a single-channel coverage mask. Samples outside the mask are zero.
pub(crate) fn blur_mask(
    mask: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> TextBehindResult<Vec<u8>> {
    let (w, h) = (width as usize, height as usize);
    if w.checked_mul(h) != Some(mask.len()) {
        return Err(TextBehindError::raster(
            "blur_mask expects one byte per pixel",
        ));
    }
    if radius == 0 || mask.is_empty() {
        return Ok(mask.to_vec());
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(TextBehindError::validation("blur sigma must be > 0"));
    }

    let kernel = gaussian_weights(radius, sigma);
    let r = radius as usize;
    // 1D convolution of sample `i` out of `len`, reading through `at`.
    let convolve = |i: usize, len: usize, at: &dyn Fn(usize) -> f32| -> f32 {
        let lo = i.saturating_sub(r);
        let hi = (i + r).min(len - 1);
        (lo..=hi).map(|j| kernel[j + r - i] * at(j)).sum()
    };

    let mut rows = vec![0f32; mask.len()];
    for y in 0..h {
        let row = &mask[y * w..(y + 1) * w];
        for x in 0..w {
            rows[y * w + x] = convolve(x, w, &|j| f32::from(row[j]));
        }
    }

    let mut out = vec![0u8; mask.len()];
    for x in 0..w {
        for y in 0..h {
            let v = convolve(y, h, &|j| rows[j * w + x]);
            out[y * w + x] = v.round().clamp(0.0, 255.0) as u8;
        }
    }
    Ok(out)
}

/// Normalized taps for `-radius..=radius`.
fn gaussian_weights(radius: u32, sigma: f32) -> Vec<f32> {
    let r = radius as i32;
    let denom = 2.0 * sigma * sigma;
    let raw: Vec<f32> = (-r..=r)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();
    let sum: f32 = raw.iter().sum();
    raw.into_iter().map(|w| w / sum).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
