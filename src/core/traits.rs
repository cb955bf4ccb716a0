use crate::application::config::AppConfig;
use crate::core::models::PcmBuffer;
use crate::error::Result;

/// Abstraction for the audio device the random playback loop writes into
///
/// Implementations are created on the playback worker thread and live there
/// until the loop stops, so they don't need to be `Send`.
pub trait AudioOutput {
    /// Queue interleaved samples normalized to [-1.0, 1.0]
    fn write(&mut self, samples: Vec<f32>) -> Result<()>;

    /// Number of written buffers that have not finished playing yet
    fn queued(&self) -> usize {
        0
    }
}

/// Abstraction for compressed/container audio encoders
pub trait ContainerEncoder {
    /// Encode the whole buffer into the bytes of a complete file
    fn encode(&self, buffer: &PcmBuffer) -> Result<Vec<u8>>;

    /// File extension of the produced container, without the dot
    fn extension(&self) -> &'static str;
}

/// Abstraction for persistent settings
pub trait ConfigStore: Send {
    /// Load settings, falling back to defaults when nothing is stored yet
    fn load(&self) -> anyhow::Result<AppConfig>;

    /// Save settings
    fn save(&self, config: &AppConfig) -> anyhow::Result<()>;
}
