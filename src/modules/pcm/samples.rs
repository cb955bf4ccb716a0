//! Width-aware views over raw PCM bytes.
//!
//! 8-bit samples are unsigned and centered at 128; 16, 24 and 32-bit samples
//! are signed little-endian. A trailing partial frame is always dropped.

/// Read every complete sample as a signed integer at its native width.
pub fn signed_samples(raw: &[u8], sample_width: u16, channels: u16) -> Vec<i32> {
    let width = sample_width as usize;
    if width == 0 {
        return Vec::new();
    }
    whole_frames(raw, width, channels)
        .chunks_exact(width)
        .map(|s| match s {
            [b] => i32::from(*b) - 128,
            [lo, hi] => i32::from(i16::from_le_bytes([*lo, *hi])),
            [b0, b1, b2] => i32::from_le_bytes([0, *b0, *b1, *b2]) >> 8,
            [b0, b1, b2, b3] => i32::from_le_bytes([*b0, *b1, *b2, *b3]),
            _ => 0,
        })
        .collect()
}

/// Reduce every sample to 16 bits, keeping the most significant bits.
pub fn to_i16_samples(raw: &[u8], sample_width: u16, channels: u16) -> Vec<i16> {
    let shift: i32 = match sample_width {
        1 => -8,
        w => (i32::from(w) - 2) * 8,
    };

    signed_samples(raw, sample_width, channels)
        .into_iter()
        .map(|s| if shift < 0 { (s << -shift) as i16 } else { (s >> shift) as i16 })
        .collect()
}

/// Convert raw PCM into interleaved `f32` samples in [-1.0, 1.0] for an output device.
///
/// Only 8-bit unsigned and 16-bit signed layouts are interpreted natively;
/// any other width is read as 16-bit signed.
pub fn to_f32_samples(raw: &[u8], sample_width: u16, channels: u16) -> Vec<f32> {
    match sample_width {
        1 => whole_frames(raw, 1, channels)
            .iter()
            .map(|&b| (f32::from(b) - 128.0) / 128.0)
            .collect(),
        _ => whole_frames(raw, 2, channels)
            .chunks_exact(2)
            .map(|s| f32::from(i16::from_le_bytes([s[0], s[1]])) / 32768.0)
            .collect(),
    }
}

fn whole_frames(raw: &[u8], width: usize, channels: u16) -> &[u8] {
    let frame = width * channels.max(1) as usize;
    if frame == 0 {
        return &[];
    }
    &raw[..raw.len() / frame * frame]
}
