use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

pub const APP_NAME: &str = "numwave";

/// Default stem for exported audio files
pub const DEFAULT_OUTPUT_NAME: &str = "evp_audio";

/// Suffix appended to the input stem for numeric dumps
pub const DUMP_SUFFIX: &str = "_numbers.txt";

/// Write `bytes` to `path` through a sibling `.part` file and a rename.
///
/// Readers either see the previous file or the complete new one, never a
/// half-written artifact under the final name.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut part_name = path.file_name().unwrap_or_default().to_os_string();
    part_name.push(".part");
    let part = path.with_file_name(part_name);

    if let Err(e) = fs::write(&part, bytes) {
        let _ = fs::remove_file(&part);
        return Err(Error::io("write", &part, e));
    }
    fs::rename(&part, path).map_err(|e| {
        let _ = fs::remove_file(&part);
        Error::io("finalize", path, e)
    })
}

/// Format seconds for terminal output, e.g. `1.250 s`
pub fn format_seconds(secs: f64) -> String {
    format!("{:.3} s", secs)
}
