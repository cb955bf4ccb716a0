use crate::core::models::ContainerFormat;
use crate::modules::playback::fragment_picker::RandomLoopSettings;
use crate::utils::DEFAULT_OUTPUT_NAME;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Persistent user settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where artifacts are written; the desktop when unset
    pub output_dir: Option<PathBuf>,

    /// Container used by `encode` unless overridden
    pub format: ContainerFormat,

    /// File stem of exported audio
    pub output_name: String,

    pub random: RandomLoopSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            format: ContainerFormat::default(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            random: RandomLoopSettings::default(),
        }
    }
}
