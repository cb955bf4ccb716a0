use crate::core::models::{ContainerFormat, FormatMetadata, PcmFormat};
use crate::error::{Error, Result};
use crate::modules::export::export;
use crate::modules::extract::audio_extractor::{decode_file, dump_path, sample_count, write_dump};
use crate::modules::parsing::number_parser::{parse_number_array, parse_plain_list};
use crate::modules::pcm::duration::fit_duration;
use crate::modules::pcm::encoder::encode;
use std::fs;
use std::path::{Path, PathBuf};

/// Which text convention the input follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputSyntax {
    /// Free-form numbers with an optional `#META` header
    #[default]
    Annotated,
    /// Bracketed or comma separated list, no header
    Plain,
}

#[derive(Debug, Clone)]
pub struct EncodeOptions {
    pub syntax: InputSyntax,
    pub duration_secs: Option<f64>,
    pub format: ContainerFormat,
    pub output_dir: PathBuf,
    pub output_name: String,
}

/// Result of a numbers -> audio conversion
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeReport {
    pub path: PathBuf,
    pub duration_secs: f64,
    pub container: ContainerFormat,
    pub pcm: PcmFormat,
    pub metadata: Option<FormatMetadata>,
}

/// Result of an audio -> numbers conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractReport {
    pub path: PathBuf,
    pub samples: usize,
    pub pcm: PcmFormat,
    pub approx_duration_secs: f64,
}

/// Parse numeric text according to `syntax`.
pub fn parse_input(text: &str, syntax: InputSyntax) -> Result<(Vec<u8>, Option<FormatMetadata>)> {
    match syntax {
        InputSyntax::Annotated => Ok(parse_number_array(text)?),
        InputSyntax::Plain => Ok((parse_plain_list(text)?, None)),
    }
}

/// Read and parse a numeric text file.
pub fn load_numbers(path: &Path, syntax: InputSyntax) -> Result<(Vec<u8>, Option<FormatMetadata>)> {
    let text = fs::read_to_string(path).map_err(|e| Error::io("read", path, e))?;
    parse_input(&text, syntax)
}

/// Numbers -> PCM -> optional duration fit -> container file.
pub fn numbers_to_audio(text: &str, options: &EncodeOptions) -> Result<EncodeReport> {
    let (numbers, metadata) = parse_input(text, options.syntax)?;

    let pcm = encode(&numbers, metadata.as_ref());
    let fitted = fit_duration(pcm, options.duration_secs)?;
    let path = export(&fitted.buffer, options.format, &options.output_dir, &options.output_name)?;

    Ok(EncodeReport {
        path,
        duration_secs: fitted.duration_secs,
        container: options.format,
        pcm: fitted.buffer.format,
        metadata,
    })
}

/// Audio file -> raw PCM -> numeric dump next to the other artifacts.
pub fn audio_to_numbers(input: &Path, output_dir: &Path) -> Result<ExtractReport> {
    let buffer = decode_file(input)?;

    fs::create_dir_all(output_dir).map_err(|e| Error::io("create output directory", output_dir, e))?;
    let path = dump_path(input, output_dir);
    write_dump(&buffer, &path)?;

    let samples = sample_count(&buffer);
    Ok(ExtractReport {
        path,
        samples,
        pcm: buffer.format,
        approx_duration_secs: samples as f64 / buffer.format.sample_rate as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;
    use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
    use pretty_assertions::assert_eq;

    fn options(dir: &Path, format: ContainerFormat) -> EncodeOptions {
        EncodeOptions {
            syntax: InputSyntax::Annotated,
            duration_secs: None,
            format,
            output_dir: dir.to_path_buf(),
            output_name: "evp_audio".to_string(),
        }
    }

    // ── numbers -> audio ──────────────────────────────────────────────────────

    #[test]
    fn legacy_text_becomes_wav() {
        let dir = tempfile::tempdir().unwrap();
        let report = numbers_to_audio("128 128 128 255 0 64 192", &options(dir.path(), ContainerFormat::Wav)).unwrap();

        assert_eq!(report.path, dir.path().join("evp_audio.wav"));
        assert_eq!(report.pcm, PcmFormat::default());
        assert_eq!(report.metadata, None);

        let samples: Vec<i16> = WavReader::open(&report.path)
            .unwrap()
            .samples::<i16>()
            .map(|s| s.unwrap())
            .collect();
        assert_eq!(samples.len(), 7);
        assert_eq!(samples[3], 32767);
        assert_eq!(samples[4], -32768);
    }

    #[test]
    fn duration_is_fitted_before_export() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(dir.path(), ContainerFormat::Wav);
        opts.duration_secs = Some(0.25);

        let report = numbers_to_audio("1 2 3", &opts).unwrap();

        assert_eq!(report.duration_secs, 0.25);
        let reader = WavReader::open(&report.path).unwrap();
        assert_eq!(reader.duration(), 11_025);
    }

    #[test]
    fn mp3_export_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(dir.path(), ContainerFormat::Mp3);
        opts.duration_secs = Some(0.5);

        let report = numbers_to_audio("0 255 0 255", &opts).unwrap();
        assert_eq!(report.path, dir.path().join("evp_audio.mp3"));
        assert!(fs::metadata(&report.path).unwrap().len() > 0);
    }

    #[test]
    fn errors_surface_by_kind() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path(), ContainerFormat::Wav);

        assert!(matches!(
            numbers_to_audio("", &opts),
            Err(Error::Input(InputError::Empty))
        ));
        assert!(matches!(
            numbers_to_audio("1 300", &opts),
            Err(Error::Input(InputError::OutOfRange { .. }))
        ));

        let mut negative = opts.clone();
        negative.duration_secs = Some(-5.0);
        assert!(matches!(numbers_to_audio("1 2", &negative), Err(Error::Validation(_))));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn plain_syntax_rejects_header() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(dir.path(), ContainerFormat::Wav);
        opts.syntax = InputSyntax::Plain;

        assert!(numbers_to_audio("[1, 2, 3]", &opts).is_ok());
        assert!(matches!(
            numbers_to_audio("#META mode=bytes\n1 2", &opts),
            Err(Error::Input(InputError::InvalidToken { .. }))
        ));
    }

    // ── audio -> numbers -> audio ─────────────────────────────────────────────

    #[test]
    fn round_trip_through_dump_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("voice.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let original: Vec<i16> = (0..3_200).map(|i| (i * 20 - 32_000) as i16).collect();
        let mut writer = WavWriter::create(&source, spec).unwrap();
        for &s in &original {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let out = dir.path().join("out");
        let extracted = audio_to_numbers(&source, &out).unwrap();
        assert_eq!(extracted.path, out.join("voice_numbers.txt"));
        assert_eq!(extracted.samples, 1_600);
        assert_eq!(extracted.approx_duration_secs, 0.1);

        let text = fs::read_to_string(&extracted.path).unwrap();
        let report = numbers_to_audio(&text, &options(&out, ContainerFormat::Wav)).unwrap();
        assert_eq!(report.pcm, PcmFormat::new(16_000, 2, 2));

        let rebuilt: Vec<i16> = WavReader::open(&report.path)
            .unwrap()
            .samples::<i16>()
            .map(|s| s.unwrap())
            .collect();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn load_numbers_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_numbers(&dir.path().join("missing.txt"), InputSyntax::Annotated),
            Err(Error::Io { .. })
        ));
    }
}
