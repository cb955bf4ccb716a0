use crate::core::models::{FormatMetadata, PcmBuffer, PcmFormat, SUPPORTED_SAMPLE_WIDTHS};
use crate::error::{Error, Result};
use crate::modules::parsing::number_parser::{META_MARKER, format_numbers};
use crate::utils::{DUMP_SUFFIX, write_atomically};
use hound::{SampleFormat, WavReader};
use rodio::{Decoder, Source};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Width of samples decoded through rodio, which yields `f32`
const DECODED_SAMPLE_WIDTH: u16 = 2;

/// Decode an audio file into interleaved PCM.
///
/// Integer WAV files keep their native width (8 to 32 bits); everything else
/// rodio understands is decoded to 16-bit.
pub fn decode_file(path: &Path) -> Result<PcmBuffer> {
    let file = File::open(path).map_err(|e| Error::io("open", path, e))?;
    if let Ok(reader) = WavReader::new(BufReader::new(file)) {
        if let Some(buffer) = decode_integer_wav(reader, path)? {
            return Ok(buffer);
        }
    }

    let file = File::open(path).map_err(|e| Error::io("open", path, e))?;
    let decoder = Decoder::new(BufReader::new(file))
        .map_err(|e| Error::Codec(format!("Failed to decode audio file {}: {}", path.display(), e)))?;

    let channels = u16::from(decoder.channels()).max(1);
    let sample_rate = u32::from(decoder.sample_rate());
    let format = PcmFormat::new(sample_rate, channels, DECODED_SAMPLE_WIDTH);

    let data: Vec<u8> = decoder
        .flat_map(|sample| f32_to_i16(sample).to_le_bytes())
        .collect();

    log::info!(
        "Decoded {} ({}, {} bytes)",
        path.display(),
        format,
        data.len()
    );
    Ok(PcmBuffer::new(format, data))
}

/// Native-width samples of an integer WAV; `None` for float WAVs, left to rodio.
fn decode_integer_wav<R: Read>(mut reader: WavReader<R>, path: &Path) -> Result<Option<PcmBuffer>> {
    let spec = reader.spec();
    let width = spec.bits_per_sample.div_ceil(8);
    if spec.sample_format != SampleFormat::Int || !SUPPORTED_SAMPLE_WIDTHS.contains(&width) {
        return Ok(None);
    }

    let format = PcmFormat::new(spec.sample_rate, spec.channels.max(1), width);
    let mut data = Vec::with_capacity(reader.len() as usize * width as usize);
    for sample in reader.samples::<i32>() {
        let sample = sample.map_err(|e| {
            Error::Codec(format!("Failed to decode audio file {}: {}", path.display(), e))
        })?;
        match width {
            // 8-bit WAV is unsigned on disk
            1 => data.push((sample + 128) as u8),
            w => data.extend_from_slice(&sample.to_le_bytes()[..w as usize]),
        }
    }

    log::info!("Decoded {} natively ({}, {} bytes)", path.display(), format, data.len());
    Ok(Some(PcmBuffer::new(format, data)))
}

/// Text form of a buffer: a `#META mode=bytes ...` header line, then every byte.
pub fn render_dump(buffer: &PcmBuffer) -> String {
    let header = FormatMetadata::raw_bytes(buffer.format);
    format!("{} {}\n{}", META_MARKER, header, format_numbers(&buffer.data))
}

/// Number of audio samples per channel held by `buffer`.
pub fn sample_count(buffer: &PcmBuffer) -> usize {
    buffer.data.len() / (buffer.format.sample_width as usize * buffer.format.channels.max(1) as usize)
}

/// Where the dump of `input` is written inside `dir`.
pub fn dump_path(input: &Path, dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");
    dir.join(format!("{}{}", stem, DUMP_SUFFIX))
}

/// Write the numeric dump of `buffer` to `path`.
pub fn write_dump(buffer: &PcmBuffer, path: &Path) -> Result<()> {
    write_atomically(path, render_dump(buffer).as_bytes())
}

fn f32_to_i16(sample: f32) -> i16 {
    (sample * 32768.0).round().clamp(-32768.0, 32767.0) as i16
}
