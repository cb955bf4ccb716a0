use crate::core::models::PcmFormat;
use crate::error::{Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Timing of the random fragment loop, all in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomLoopSettings {
    /// Shortest fragment picked from the source
    pub min_chunk_ms: u32,
    /// Longest fragment picked from the source
    pub max_chunk_ms: u32,
    /// Audio accumulated before each write to the device
    pub buffer_ms: u32,
}

impl Default for RandomLoopSettings {
    fn default() -> Self {
        Self {
            min_chunk_ms: 100,
            max_chunk_ms: 2_000,
            buffer_ms: 5_000,
        }
    }
}

impl RandomLoopSettings {
    pub fn validate(&self) -> Result<()> {
        if self.min_chunk_ms == 0 || self.buffer_ms == 0 {
            return Err(Error::Validation(
                "fragment and buffer lengths must be positive".to_string(),
            ));
        }
        if self.min_chunk_ms > self.max_chunk_ms {
            return Err(Error::Validation(format!(
                "minimum fragment length {} ms exceeds maximum {} ms",
                self.min_chunk_ms, self.max_chunk_ms
            )));
        }
        Ok(())
    }
}

/// Bytes covering `chunk_ms` of audio, rounded down to whole frames (at least one).
pub fn chunk_len(format: &PcmFormat, chunk_ms: u32) -> usize {
    let frame = format.frame_size();
    let bytes = (format.byte_rate() as u64 * u64::from(chunk_ms) / 1000) as usize;
    (bytes / frame * frame).max(frame)
}

/// Random frame-aligned start of a `len`-byte window inside `source_len` bytes.
///
/// # Returns
/// * `Some(start)` - with `start + len <= source_len`
/// * `None` - the window does not fit and the source must be tiled instead
pub fn window_start<R: Rng + ?Sized>(
    source_len: usize,
    len: usize,
    frame: usize,
    rng: &mut R,
) -> Option<usize> {
    if len > source_len {
        return None;
    }
    let last = (source_len - len) / frame.max(1);
    Some(rng.random_range(0..=last) * frame.max(1))
}

/// Repeat `source` until exactly `len` bytes are produced.
pub fn tile(source: &[u8], len: usize) -> Vec<u8> {
    if source.is_empty() {
        return Vec::new();
    }
    source.iter().copied().cycle().take(len).collect()
}

/// One contiguous fragment of `len` bytes: a random window, or the tiled source when too short.
pub fn pick_fragment<R: Rng + ?Sized>(source: &[u8], len: usize, frame: usize, rng: &mut R) -> Vec<u8> {
    match window_start(source.len(), len, frame, rng) {
        Some(start) => source[start..start + len].to_vec(),
        None => tile(source, len),
    }
}

/// Concatenate random fragments until the buffer holds `settings.buffer_ms` of audio.
///
/// `should_stop` is polled before every fragment; a stop request returns what
/// was gathered so far.
pub fn fill_buffer<R, S>(
    source: &[u8],
    format: &PcmFormat,
    settings: &RandomLoopSettings,
    rng: &mut R,
    mut should_stop: S,
) -> Vec<u8>
where
    R: Rng + ?Sized,
    S: FnMut() -> bool,
{
    let byte_rate = format.byte_rate().max(1) as u64;
    let frame = format.frame_size();
    let mut buffer = Vec::new();

    if source.is_empty() {
        return buffer;
    }

    while (buffer.len() as u64 * 1000 / byte_rate) < u64::from(settings.buffer_ms) && !should_stop() {
        let chunk_ms = rng.random_range(settings.min_chunk_ms..=settings.max_chunk_ms);
        let fragment = pick_fragment(source, chunk_len(format, chunk_ms), frame, rng);
        buffer.extend_from_slice(&fragment);
    }

    buffer
}
