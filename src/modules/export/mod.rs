pub mod mp3_encoder;
pub mod wav_encoder;

use crate::core::models::{ContainerFormat, PcmBuffer};
use crate::core::traits::ContainerEncoder;
use crate::error::{Error, Result};
use crate::utils::write_atomically;
use mp3_encoder::Mp3Encoder;
use std::fs;
use std::path::{Path, PathBuf};
use wav_encoder::WavEncoder;

/// Encoder instance for a container format
pub fn encoder_for(format: ContainerFormat) -> Box<dyn ContainerEncoder> {
    match format {
        ContainerFormat::Mp3 => Box::new(Mp3Encoder::new()),
        ContainerFormat::Wav => Box::new(WavEncoder),
    }
}

/// Encode `buffer` and write it to `<dir>/<stem>.<ext>`.
///
/// The whole file is encoded in memory first, so a codec failure never leaves
/// anything on disk.
pub fn export(buffer: &PcmBuffer, format: ContainerFormat, dir: &Path, stem: &str) -> Result<PathBuf> {
    let encoder = encoder_for(format);
    let bytes = encoder.encode(buffer)?;

    fs::create_dir_all(dir).map_err(|e| Error::io("create output directory", dir, e))?;
    let path = dir.join(format!("{}.{}", stem, encoder.extension()));
    write_atomically(&path, &bytes)?;

    log::info!("Exported {} bytes of {} to {}", bytes.len(), format, path.display());
    Ok(path)
}

/// Directory artifacts go to: the configured one, else the user's desktop.
pub fn resolve_output_dir(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = configured {
        return Ok(dir.to_path_buf());
    }

    dirs::desktop_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Desktop")))
        .ok_or_else(|| Error::Io {
            context: "Could not find the desktop directory".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::PcmFormat;
    use pretty_assertions::assert_eq;

    fn short_buffer() -> PcmBuffer {
        PcmBuffer::new(PcmFormat::new(8_000, 1, 2), vec![0; 1_600])
    }

    #[test]
    fn export_writes_file_with_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = export(&short_buffer(), ContainerFormat::Wav, dir.path(), "clip").unwrap();

        assert_eq!(path, dir.path().join("clip.wav"));
        assert!(path.is_file());
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers.len(), 1, "no temporary file may remain");
    }

    #[test]
    fn export_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let buffer = PcmBuffer::new(PcmFormat::default(), vec![0; 8_820]);
        let path = export(&buffer, ContainerFormat::Mp3, &nested, "clip").unwrap();
        assert_eq!(path, nested.join("clip.mp3"));
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn codec_failure_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let buffer = PcmBuffer::new(PcmFormat::new(8_000, 3, 2), vec![0; 60]);

        let result = export(&buffer, ContainerFormat::Mp3, dir.path(), "clip");
        assert!(matches!(result, Err(Error::Codec(_))));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn configured_output_dir_wins() {
        let dir = Path::new("/tmp/numwave-out");
        assert_eq!(resolve_output_dir(Some(dir)).unwrap(), dir.to_path_buf());
    }
}
