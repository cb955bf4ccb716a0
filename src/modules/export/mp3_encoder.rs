use crate::core::models::PcmBuffer;
use crate::core::traits::ContainerEncoder;
use crate::error::{Error, Result};
use crate::modules::pcm::samples::to_i16_samples;
use mp3lame_encoder::{Bitrate, Builder, FlushNoGap, InterleavedPcm, MonoPcm, Quality};
use std::fmt::Debug;

/// MP3 export through LAME
pub struct Mp3Encoder;

impl Mp3Encoder {
    pub fn new() -> Self {
        Self
    }
}

/// Frames handed to LAME per call
const CHUNK_FRAMES: usize = 8_192;

/// Bytes LAME may emit when flushing its internal buffers
const FLUSH_RESERVE: usize = 7_200;

/// Lowest output rate LAME encodes at
const MIN_LAME_RATE: u32 = 8_000;

fn upsampling_factor(sample_rate: u32) -> usize {
    MIN_LAME_RATE.div_ceil(sample_rate.max(1)).max(1) as usize
}

/// Constant bitrate within the limits of the MPEG version LAME picks for the rate
fn bitrate_for(sample_rate: u32) -> Bitrate {
    match sample_rate {
        32_000.. => Bitrate::Kbps192,
        16_000..=31_999 => Bitrate::Kbps128,
        _ => Bitrate::Kbps64,
    }
}

impl Default for Mp3Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerEncoder for Mp3Encoder {
    fn encode(&self, buffer: &PcmBuffer) -> Result<Vec<u8>> {
        let format = buffer.format;
        let channels = match format.channels {
            1 | 2 => format.channels as u8,
            n => {
                return Err(Error::Codec(format!(
                    "MP3 supports mono or stereo, got {} channels",
                    n
                )));
            }
        };

        let mut builder = Builder::new()
            .ok_or_else(|| Error::Codec("could not allocate LAME encoder".to_string()))?;
        builder.set_num_channels(channels).map_err(lame_error("set channels"))?;
        builder.set_sample_rate(format.sample_rate).map_err(lame_error("set sample rate"))?;
        builder.set_brate(bitrate_for(format.sample_rate)).map_err(lame_error("set bitrate"))?;
        builder.set_quality(Quality::Best).map_err(lame_error("set quality"))?;
        let mut encoder = builder.build().map_err(lame_error("initialize encoder"))?;

        let samples = to_i16_samples(&buffer.data, format.sample_width, format.channels);
        let chunk_samples = CHUNK_FRAMES * usize::from(channels);
        let upsampling = upsampling_factor(format.sample_rate);
        let mut out = Vec::new();

        for chunk in samples.chunks(chunk_samples) {
            // LAME resamples rates under its minimum up, so output can outgrow the input
            out.reserve(mp3lame_encoder::max_required_buffer_size(chunk.len() * upsampling));
            let encoded = if channels == 1 {
                encoder.encode_to_vec(MonoPcm(chunk), &mut out)
            } else {
                encoder.encode_to_vec(InterleavedPcm(chunk), &mut out)
            };
            encoded.map_err(lame_error("encode"))?;
        }

        out.reserve(FLUSH_RESERVE);
        encoder
            .flush_to_vec::<FlushNoGap>(&mut out)
            .map_err(lame_error("flush"))?;

        log::debug!("Encoded {} samples into {} MP3 bytes", samples.len(), out.len());
        Ok(out)
    }

    fn extension(&self) -> &'static str {
        "mp3"
    }
}

fn lame_error<E: Debug>(action: &'static str) -> impl Fn(E) -> Error {
    move |e| Error::Codec(format!("LAME failed to {}: {:?}", action, e))
}
