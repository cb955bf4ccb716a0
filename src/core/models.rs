use std::fmt;
use serde::{Deserialize, Serialize};
use crate::error::InputError;

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
pub const DEFAULT_CHANNELS: u16 = 1;
/// Bytes per sample (16-bit)
pub const DEFAULT_SAMPLE_WIDTH: u16 = 2;

/// Highest sample rate a header may declare (the top DXD/PCM rate).
pub const MAX_SAMPLE_RATE: u32 = 768_000;

/// Most channels a header may declare.
pub const MAX_CHANNELS: u16 = 32;

/// Widths a PCM buffer may declare, in bytes per sample.
pub const SUPPORTED_SAMPLE_WIDTHS: std::ops::RangeInclusive<u16> = 1..=4;

/// How a numeric sequence maps onto audio samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleMode {
    /// One number is one sample, rescaled to 16-bit.
    Legacy,
    /// Numbers are the literal bytes of an already-formatted PCM stream.
    Bytes,
}

impl SampleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleMode::Legacy => "legacy",
            SampleMode::Bytes => "bytes",
        }
    }
}

/// Container written by the exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ContainerFormat {
    #[default]
    Mp3,
    Wav,
}

impl ContainerFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ContainerFormat::Mp3 => "mp3",
            ContainerFormat::Wav => "wav",
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension().to_uppercase())
    }
}

/// Concrete PCM layout of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub sample_width: u16,
}

impl PcmFormat {
    pub fn new(sample_rate: u32, channels: u16, sample_width: u16) -> Self {
        Self { sample_rate, channels, sample_width }
    }

    /// Bytes per frame (one sample for every channel).
    pub fn frame_size(&self) -> usize {
        self.sample_width as usize * self.channels.max(1) as usize
    }

    pub fn byte_rate(&self) -> usize {
        self.sample_rate as usize * self.frame_size()
    }

    /// Byte value of one silent sample at this width.
    pub fn silence_byte(&self) -> u8 {
        // 8-bit PCM is unsigned, everything wider is signed
        if self.sample_width == 1 { 0x80 } else { 0x00 }
    }
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE, DEFAULT_CHANNELS, DEFAULT_SAMPLE_WIDTH)
    }
}

impl fmt::Display for PcmFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Hz, {} ch, {}-bit",
            self.sample_rate,
            self.channels,
            self.sample_width * 8
        )
    }
}

/// Format parameters declared by a `#META` header line.
///
/// Every field is optional; [`FormatMetadata::pcm_format`] fills the gaps with
/// the legacy defaults (44100 Hz, mono, 16-bit).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatMetadata {
    pub mode: Option<SampleMode>,
    pub sample_rate: Option<u32>,
    pub channels: Option<u16>,
    pub sample_width: Option<u16>,
}

impl FormatMetadata {
    /// Metadata describing a raw byte dump of `format`.
    pub fn raw_bytes(format: PcmFormat) -> Self {
        Self {
            mode: Some(SampleMode::Bytes),
            sample_rate: Some(format.sample_rate),
            channels: Some(format.channels),
            sample_width: Some(format.sample_width),
        }
    }

    pub fn is_raw_bytes(&self) -> bool {
        self.mode == Some(SampleMode::Bytes)
    }

    pub fn pcm_format(&self) -> PcmFormat {
        PcmFormat {
            sample_rate: self.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE),
            channels: self.channels.unwrap_or(DEFAULT_CHANNELS),
            sample_width: self.sample_width.unwrap_or(DEFAULT_SAMPLE_WIDTH),
        }
    }

    /// Validates and stores one `key=value` pair from a header line.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), InputError> {
        let invalid = || InputError::InvalidMetaValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "mode" => {
                self.mode = Some(match value.to_ascii_lowercase().as_str() {
                    "bytes" => SampleMode::Bytes,
                    "legacy" => SampleMode::Legacy,
                    _ => return Err(invalid()),
                });
            }
            "sample_rate" => {
                let rate = parse_positive::<u32>(value)
                    .filter(|r| *r <= MAX_SAMPLE_RATE)
                    .ok_or_else(invalid)?;
                self.sample_rate = Some(rate);
            }
            "channels" => {
                let channels = parse_positive::<u16>(value)
                    .filter(|c| *c <= MAX_CHANNELS)
                    .ok_or_else(invalid)?;
                self.channels = Some(channels);
            }
            "sample_width" => {
                let width = parse_positive::<u16>(value)
                    .filter(|w| SUPPORTED_SAMPLE_WIDTHS.contains(w))
                    .ok_or_else(invalid)?;
                self.sample_width = Some(width);
            }
            _ => return Err(InputError::UnknownMetaKey { key: key.to_string() }),
        }

        Ok(())
    }
}

/// Only plain digit strings count as numbers in a header, and zero is never valid.
fn parse_positive<T>(value: &str) -> Option<T>
where
    T: std::str::FromStr + PartialEq + From<u8>,
{
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse::<T>().ok().filter(|v| *v != T::from(0))
}

impl fmt::Display for FormatMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(mode) = self.mode {
            parts.push(format!("mode={}", mode.as_str()));
        }
        if let Some(rate) = self.sample_rate {
            parts.push(format!("sample_rate={}", rate));
        }
        if let Some(channels) = self.channels {
            parts.push(format!("channels={}", channels));
        }
        if let Some(width) = self.sample_width {
            parts.push(format!("sample_width={}", width));
        }
        write!(f, "{}", parts.join(" "))
    }
}

/// Raw PCM bytes together with the layout needed to read them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmBuffer {
    pub format: PcmFormat,
    pub data: Vec<u8>,
}

impl PcmBuffer {
    pub fn new(format: PcmFormat, data: Vec<u8>) -> Self {
        Self { format, data }
    }

    /// Number of complete frames; a trailing partial frame is not counted.
    pub fn frame_count(&self) -> usize {
        self.data.len() / self.format.frame_size()
    }

    pub fn has_partial_frame(&self) -> bool {
        self.data.len() % self.format.frame_size() != 0
    }

    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / self.format.sample_rate as f64
    }
}
