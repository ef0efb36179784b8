//! Filter engine: pure per-pixel transforms applied in place.

use crate::store::ImageRecord;

/// ITU-R BT.601 luma weights.
const RED_WEIGHT: f64 = 0.299;
const GREEN_WEIGHT: f64 = 0.587;
const BLUE_WEIGHT: f64 = 0.114;

/// Blend a channel toward its gray value. `blend` is in [0, 1].
fn blend_channel(original: u8, gray: f64, blend: f64) -> u8 {
    ((1.0 - blend) * original as f64 + blend * gray).round() as u8
}

/// Apply a grayscale blend to an interleaved 8-bit buffer in place.
///
/// `intensity` is a percentage and is clamped to [0, 100]. Channel count
/// governs participation: channel 0 always blends, channels 1 and 2 only
/// when present, and a fourth (alpha) channel is never touched. Missing
/// green/blue fall back to the red value, so single-channel buffers blend
/// toward themselves.
///
/// Gray pixels are fixed points: at 100% intensity an achromatic pixel is
/// unchanged, and a second application changes nothing further.
pub fn grayscale_in_place(pixels: &mut [u8], channels: u8, intensity: f64) {
    let intensity = intensity.clamp(0.0, 100.0);
    let blend = intensity / 100.0;
    let channels = channels as usize;

    for px in pixels.chunks_exact_mut(channels) {
        let red = px[0];
        let green = if channels > 1 { px[1] } else { red };
        let blue = if channels > 2 { px[2] } else { red };

        let gray = (RED_WEIGHT * red as f64
            + GREEN_WEIGHT * green as f64
            + BLUE_WEIGHT * blue as f64)
            .round();

        px[0] = blend_channel(red, gray, blend);
        if channels > 1 {
            px[1] = blend_channel(green, gray, blend);
        }
        if channels > 2 {
            px[2] = blend_channel(blue, gray, blend);
        }
    }
}

/// Apply grayscale to a record and mark it modified.
///
/// The flag is sticky: it is set by any application, even at 0% intensity.
pub fn grayscale(record: &mut ImageRecord, intensity: f64) {
    grayscale_in_place(&mut record.pixels, record.channels, intensity);
    record.modified = true;
}
