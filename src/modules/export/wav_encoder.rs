use crate::core::models::PcmBuffer;
use crate::core::traits::ContainerEncoder;
use crate::error::{Error, Result};
use crate::modules::pcm::samples::signed_samples;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

/// Lossless integer-PCM WAV export through hound
pub struct WavEncoder;

impl ContainerEncoder for WavEncoder {
    fn encode(&self, buffer: &PcmBuffer) -> Result<Vec<u8>> {
        let format = buffer.format;
        let spec = WavSpec {
            channels: format.channels,
            sample_rate: format.sample_rate,
            bits_per_sample: format.sample_width * 8,
            sample_format: SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).map_err(wav_error)?;
            for sample in signed_samples(&buffer.data, format.sample_width, format.channels) {
                let written = match format.sample_width {
                    1 => writer.write_sample(sample as i8),
                    2 => writer.write_sample(sample as i16),
                    _ => writer.write_sample(sample),
                };
                written.map_err(wav_error)?;
            }
            writer.finalize().map_err(wav_error)?;
        }

        Ok(cursor.into_inner())
    }

    fn extension(&self) -> &'static str {
        "wav"
    }
}

fn wav_error(e: hound::Error) -> Error {
    Error::Codec(format!("WAV encoding failed: {}", e))
}
