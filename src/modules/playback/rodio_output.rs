use crate::core::models::PcmFormat;
use crate::core::traits::AudioOutput;
use crate::error::{Error, Result};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamBuilder, Sink};

/// Default output device, opened once and fed with sample buffers
pub struct RodioOutput {
    // Dropping the stream silences the sink, so it lives as long as we do
    _stream: OutputStream,
    sink: Sink,
    channels: u16,
    sample_rate: u32,
}

impl RodioOutput {
    pub fn open(format: &PcmFormat) -> Result<Self> {
        if format.channels == 0 || format.sample_rate == 0 {
            return Err(Error::Device(format!("unplayable format: {}", format)));
        }

        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| Error::Device(format!("Failed to open audio stream: {}", e)))?;
        stream.log_on_drop(false);

        let sink = Sink::connect_new(stream.mixer());

        Ok(Self {
            _stream: stream,
            sink,
            channels: format.channels,
            sample_rate: format.sample_rate,
        })
    }
}

impl AudioOutput for RodioOutput {
    fn write(&mut self, samples: Vec<f32>) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }
        self.sink
            .append(SamplesBuffer::new(self.channels, self.sample_rate, samples));
        Ok(())
    }

    fn queued(&self) -> usize {
        self.sink.len()
    }
}

// Queued fragments must not outlive the loop
impl Drop for RodioOutput {
    fn drop(&mut self) {
        self.sink.stop();
    }
}
