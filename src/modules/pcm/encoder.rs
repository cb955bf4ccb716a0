use crate::core::models::{FormatMetadata, PcmBuffer, PcmFormat};

/// Map one legacy value to a 16-bit sample: 0 -> -32768, 128 -> 0, 255 -> 32767.
///
/// The scaling is lossy and not invertible; files generated with it rely on
/// the exact formula, clamp included.
pub fn legacy_sample(x: u8) -> i16 {
    let scaled = ((f64::from(x) - 128.0) / 127.0 * 32767.0).round();
    scaled.clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
}

/// One number per sample, rescaled to signed 16-bit mono at the default rate.
pub fn encode_legacy(values: &[u8]) -> PcmBuffer {
    let data = values
        .iter()
        .flat_map(|&x| legacy_sample(x).to_le_bytes())
        .collect();

    PcmBuffer::new(PcmFormat::default(), data)
}

/// Numbers taken verbatim as an already-formatted PCM byte stream.
pub fn encode_raw(bytes: &[u8], meta: &FormatMetadata) -> PcmBuffer {
    let buffer = PcmBuffer::new(meta.pcm_format(), bytes.to_vec());
    if buffer.has_partial_frame() {
        log::warn!(
            "{} bytes is not a whole number of {}-byte frames; the tail will be ignored",
            bytes.len(),
            buffer.format.frame_size()
        );
    }
    buffer
}

/// Pick the encoder matching the metadata: raw bytes for `mode=bytes`, legacy otherwise.
pub fn encode(values: &[u8], meta: Option<&FormatMetadata>) -> PcmBuffer {
    match meta {
        Some(meta) if meta.is_raw_bytes() => encode_raw(values, meta),
        _ => encode_legacy(values),
    }
}
