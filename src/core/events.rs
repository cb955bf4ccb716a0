use crate::core::models::PcmFormat;

/// Status reports sent by the random playback worker
#[derive(Debug, Clone, PartialEq)]
pub enum LoopEvent {
    /// Output device opened, fragments are being played
    Started { format: PcmFormat },

    /// Output device could not be opened; the worker is about to exit
    DeviceError { message: String },

    /// A write to the open device failed; the worker will retry
    WriteFailed { message: String },

    /// Worker exited and released the device
    Stopped,
}

/// Type alias for event sender
pub type LoopEventSender = crossbeam_channel::Sender<LoopEvent>;

/// Type alias for event receiver
pub type LoopEventReceiver = crossbeam_channel::Receiver<LoopEvent>;
