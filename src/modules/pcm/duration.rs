use crate::core::models::PcmBuffer;
use crate::error::{Error, Result};

/// A buffer after duration fitting, with the duration it now represents.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedAudio {
    pub buffer: PcmBuffer,
    pub duration_secs: f64,
}

/// Truncate or silence-pad `buffer` to `target_secs`.
///
/// # Arguments
/// * `buffer` - PCM data to fit
/// * `target_secs` - Requested length; `None` keeps the natural length
///
/// # Returns
/// * `FittedAudio` whose buffer holds exactly the frames of the target length
///   (rounded to whole milliseconds, then to whole frames)
/// * `Error::Validation` if the target is not a positive number or too long to hold
pub fn fit_duration(mut buffer: PcmBuffer, target_secs: Option<f64>) -> Result<FittedAudio> {
    let Some(target_secs) = target_secs else {
        let duration_secs = buffer.duration_secs();
        return Ok(FittedAudio { buffer, duration_secs });
    };

    validate_duration(target_secs)?;

    let target_ms = (target_secs * 1000.0).round() as u64;
    let target_len = fitted_len(target_ms, buffer.format.sample_rate, buffer.format.frame_size())
        .ok_or_else(|| too_long(target_secs))?;
    let current = buffer.data.len();

    if current > target_len {
        log::debug!("Truncating {} bytes to {} ({} ms)", current, target_len, target_ms);
        buffer.data.truncate(target_len);
    } else if current < target_len {
        // Drop a dangling partial frame first so the padding stays frame-aligned
        let aligned = buffer.frame_count() * buffer.format.frame_size();
        buffer.data.truncate(aligned);
        log::debug!("Padding {} bytes with {} bytes of silence", aligned, target_len - aligned);
        buffer
            .data
            .try_reserve_exact(target_len - aligned)
            .map_err(|_| too_long(target_secs))?;
        buffer.data.resize(target_len, buffer.format.silence_byte());
    }

    Ok(FittedAudio { buffer, duration_secs: target_secs })
}

/// Check a requested duration: finite and strictly positive.
pub fn validate_duration(secs: f64) -> Result<()> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(Error::Validation(format!(
            "duration must be a positive number of seconds, got {}",
            secs
        )));
    }
    Ok(())
}

/// Largest PCM payload a fitted buffer may hold; WAV sizes are 32-bit.
const MAX_FITTED_BYTES: u64 = u32::MAX as u64;

/// Bytes of `target_ms` at `sample_rate`, in whole frames; `None` past [`MAX_FITTED_BYTES`]
fn fitted_len(target_ms: u64, sample_rate: u32, frame_size: usize) -> Option<usize> {
    let frames = target_ms
        .checked_mul(u64::from(sample_rate))?
        .checked_add(500)?
        / 1000;
    let bytes = frames.checked_mul(frame_size as u64)?;
    if bytes > MAX_FITTED_BYTES {
        return None;
    }
    usize::try_from(bytes).ok()
}

fn too_long(secs: f64) -> Error {
    Error::Validation(format!(
        "duration too large: {} s does not fit in an audio buffer",
        secs
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::PcmFormat;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn buffer(format: PcmFormat, frames: usize) -> PcmBuffer {
        PcmBuffer::new(format, vec![7; frames * format.frame_size()])
    }

    // ── no target ─────────────────────────────────────────────────────────────

    #[test]
    fn without_target_keeps_natural_length() {
        let fitted = fit_duration(buffer(PcmFormat::default(), 22_050), None).unwrap();
        assert_eq!(fitted.duration_secs, 0.5);
        assert_eq!(fitted.buffer.data.len(), 44_100);
    }

    // ── validation ────────────────────────────────────────────────────────────

    #[test]
    fn non_positive_targets_are_rejected() {
        for target in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let result = fit_duration(buffer(PcmFormat::default(), 10), Some(target));
            assert!(matches!(result, Err(Error::Validation(_))), "{target} accepted");
        }
    }

    #[test]
    fn huge_targets_are_rejected_without_allocating() {
        let result = fit_duration(buffer(PcmFormat::default(), 10), Some(1e12));
        assert!(matches!(result, Err(Error::Validation(_))));

        // 5e6 s of 1 kHz mono 8-bit is just past the 32-bit size limit
        let result = fit_duration(buffer(PcmFormat::new(1_000, 1, 1), 10), Some(5e6));
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn fitted_len_reports_overflow() {
        assert_eq!(fitted_len(1_000, 44_100, 2), Some(88_200));
        assert_eq!(fitted_len(u64::MAX / 2, 44_100, 2), None);
        assert_eq!(fitted_len(1_000, 1_000, 4), Some(4_000));
    }

    // ── truncation / padding ──────────────────────────────────────────────────

    #[test]
    fn longer_buffer_is_truncated() {
        let format = PcmFormat::new(1_000, 2, 2);
        let fitted = fit_duration(buffer(format, 3_000), Some(1.5)).unwrap();

        assert_eq!(fitted.buffer.frame_count(), 1_500);
        assert_eq!(fitted.duration_secs, 1.5);
        assert!(fitted.buffer.data.iter().all(|&b| b == 7));
    }

    #[test]
    fn shorter_buffer_is_padded_with_silence() {
        let format = PcmFormat::new(1_000, 1, 2);
        let fitted = fit_duration(buffer(format, 250), Some(1.0)).unwrap();

        assert_eq!(fitted.buffer.frame_count(), 1_000);
        assert!(fitted.buffer.data[..500].iter().all(|&b| b == 7));
        assert!(fitted.buffer.data[500..].iter().all(|&b| b == 0));
    }

    #[test]
    fn eight_bit_padding_uses_midpoint() {
        let format = PcmFormat::new(100, 1, 1);
        let fitted = fit_duration(buffer(format, 10), Some(0.2)).unwrap();
        assert_eq!(fitted.buffer.data.len(), 20);
        assert_eq!(fitted.buffer.data[19], 0x80);
    }

    #[test]
    fn padding_realigns_partial_frame() {
        let format = PcmFormat::new(1_000, 1, 2);
        let raw = PcmBuffer::new(format, vec![1, 2, 3]);
        let fitted = fit_duration(raw, Some(0.002)).unwrap();
        assert_eq!(fitted.buffer.data, vec![1, 2, 0, 0]);
    }

    #[test]
    fn target_rounds_to_whole_milliseconds() {
        let fitted = fit_duration(buffer(PcmFormat::default(), 10), Some(0.0104)).unwrap();
        // 10 ms at 44.1 kHz
        assert_eq!(fitted.buffer.frame_count(), 441);
    }

    proptest! {
        #[test]
        fn output_duration_matches_target(
            frames in 0usize..20_000,
            target_ms in 1u32..3_000,
            rate in prop::sample::select(vec![8_000u32, 22_050, 44_100, 48_000]),
            channels in 1u16..=2,
            width in 1u16..=2,
        ) {
            let format = PcmFormat::new(rate, channels, width);
            let target = f64::from(target_ms) / 1000.0;
            let fitted = fit_duration(buffer(format, frames), Some(target)).unwrap();

            let actual = fitted.buffer.duration_secs();
            prop_assert!((actual - target).abs() <= 0.001, "{} vs {}", actual, target);
            prop_assert!(!fitted.buffer.has_partial_frame());
            prop_assert_eq!(fitted.duration_secs, target);
        }
    }
}
