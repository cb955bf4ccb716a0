use crate::core::events::{LoopEvent, LoopEventReceiver, LoopEventSender};
use crate::core::models::{FormatMetadata, PcmFormat};
use crate::core::traits::AudioOutput;
use crate::error::{Error, InputError, Result};
use crate::modules::pcm::samples::to_f32_samples;
use crate::modules::playback::fragment_picker::{RandomLoopSettings, fill_buffer};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, bounded, unbounded};
use std::marker::PhantomData;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Pause after a failed device write before trying again
const WRITE_RETRY_WAIT: Duration = Duration::from_millis(50);

/// How often the worker re-checks the device queue while it is full
const QUEUE_POLL: Duration = Duration::from_millis(20);

/// Buffers allowed to wait on the device; keeps playback gapless without
/// delaying a stop by more than a poll interval
const MAX_QUEUED_BUFFERS: usize = 2;

/// Owned control over one running fragment loop
///
/// Dropping the handle stops the worker as well.
pub struct RandomLoopHandle {
    // Never sent on: dropping it disconnects the channel, which is the stop signal.
    stop_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl RandomLoopHandle {
    /// Whether the worker has exited on its own (e.g. the device failed to open)
    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().is_none_or(|w| w.is_finished())
    }

    /// Signal the worker and wait until it has released the device
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop_tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Random fragment worker panicked");
            }
        }
    }
}

impl Drop for RandomLoopHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Start playing random fragments of `source` on a background thread.
///
/// The output is opened by `open_output` on the worker thread, once for the
/// whole run. Returns immediately; progress is reported through `events`.
pub fn spawn_random_loop<O, F>(
    source: Vec<u8>,
    format: PcmFormat,
    settings: RandomLoopSettings,
    open_output: F,
    events: LoopEventSender,
) -> Result<RandomLoopHandle>
where
    O: AudioOutput + 'static,
    F: FnOnce(&PcmFormat) -> Result<O> + Send + 'static,
{
    if source.is_empty() {
        return Err(InputError::Empty.into());
    }
    settings.validate()?;

    let (stop_tx, stop_rx) = bounded::<()>(1);
    let worker = thread::Builder::new()
        .name("random-fragments".to_string())
        .spawn(move || run_worker(source, format, settings, open_output, stop_rx, events))
        .map_err(|e| Error::Io {
            context: "Failed to spawn playback thread".to_string(),
            source: e,
        })?;

    Ok(RandomLoopHandle {
        stop_tx: Some(stop_tx),
        worker: Some(worker),
    })
}

fn run_worker<O, F>(
    source: Vec<u8>,
    format: PcmFormat,
    settings: RandomLoopSettings,
    open_output: F,
    stop_rx: Receiver<()>,
    events: LoopEventSender,
) where
    O: AudioOutput,
    F: FnOnce(&PcmFormat) -> Result<O>,
{
    let mut output = match open_output(&format) {
        Ok(output) => output,
        Err(e) => {
            log::error!("Could not open audio output: {}", e);
            let _ = events.send(LoopEvent::DeviceError { message: e.to_string() });
            let _ = events.send(LoopEvent::Stopped);
            return;
        }
    };

    log::info!("Random fragment loop started ({}, {} source bytes)", format, source.len());
    let _ = events.send(LoopEvent::Started { format });
    let mut rng = rand::rng();

    while !stop_requested(&stop_rx) {
        if !wait_for_room(&output, &stop_rx) {
            break;
        }

        let bytes = fill_buffer(&source, &format, &settings, &mut rng, || stop_requested(&stop_rx));
        if stop_requested(&stop_rx) {
            break;
        }
        if bytes.is_empty() {
            continue;
        }

        let samples = to_f32_samples(&bytes, format.sample_width, format.channels);
        if let Err(e) = output.write(samples) {
            log::warn!("Audio write failed, retrying: {}", e);
            let _ = events.send(LoopEvent::WriteFailed { message: e.to_string() });
            if wait_for_stop(&stop_rx, WRITE_RETRY_WAIT) {
                break;
            }
        }
    }

    drop(output);
    log::info!("Random fragment loop stopped");
    let _ = events.send(LoopEvent::Stopped);
}

fn stop_requested(stop_rx: &Receiver<()>) -> bool {
    !matches!(stop_rx.try_recv(), Err(TryRecvError::Empty))
}

/// Blocks up to `timeout`; true when a stop was requested meanwhile
fn wait_for_stop(stop_rx: &Receiver<()>, timeout: Duration) -> bool {
    !matches!(stop_rx.recv_timeout(timeout), Err(RecvTimeoutError::Timeout))
}

/// Wait until the device queue has room; false if stopped while waiting
fn wait_for_room<O: AudioOutput>(output: &O, stop_rx: &Receiver<()>) -> bool {
    while output.queued() >= MAX_QUEUED_BUFFERS {
        if wait_for_stop(stop_rx, QUEUE_POLL) {
            return false;
        }
    }
    true
}

/// Whether a fragment loop is currently playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
}

/// Start/stop state machine around at most one fragment loop
///
/// Owns the running handle; every activation goes through
/// [`RandomPlayer::toggle`] or [`RandomPlayer::start`].
pub struct RandomPlayer<O, F> {
    open_output: Arc<F>,
    settings: RandomLoopSettings,
    running: Option<RandomLoopHandle>,
    event_tx: LoopEventSender,
    event_rx: LoopEventReceiver,
    _output: PhantomData<fn() -> O>,
}

impl<O, F> RandomPlayer<O, F>
where
    O: AudioOutput + 'static,
    F: Fn(&PcmFormat) -> Result<O> + Send + Sync + 'static,
{
    pub fn new(open_output: F, settings: RandomLoopSettings) -> Self {
        let (event_tx, event_rx) = unbounded();
        Self {
            open_output: Arc::new(open_output),
            settings,
            running: None,
            event_tx,
            event_rx,
            _output: PhantomData,
        }
    }

    /// Current state; a worker that exited by itself is reaped back to Idle
    pub fn state(&mut self) -> LoopState {
        if self.running.as_ref().is_some_and(|h| h.is_finished()) {
            if let Some(handle) = self.running.take() {
                handle.stop();
            }
        }

        if self.running.is_some() { LoopState::Running } else { LoopState::Idle }
    }

    pub fn is_running(&mut self) -> bool {
        self.state() == LoopState::Running
    }

    /// Idle -> Running. Refuses to start a second loop while one is running.
    ///
    /// The bytes are always read as raw PCM in the metadata's format, or the
    /// default 44100 Hz mono 16-bit layout without metadata.
    pub fn start(&mut self, numbers: &[u8], meta: Option<&FormatMetadata>) -> Result<()> {
        if self.is_running() {
            return Err(Error::Validation(
                "random playback is already running; stop it first".to_string(),
            ));
        }

        let format = meta.map(FormatMetadata::pcm_format).unwrap_or_default();
        let opener = Arc::clone(&self.open_output);
        let handle = spawn_random_loop(
            numbers.to_vec(),
            format,
            self.settings,
            move |format: &PcmFormat| (*opener)(format),
            self.event_tx.clone(),
        )?;

        self.running = Some(handle);
        Ok(())
    }

    /// Running -> Idle. Returns false when nothing was running.
    pub fn stop(&mut self) -> bool {
        match self.running.take() {
            Some(handle) => {
                handle.stop();
                true
            }
            None => false,
        }
    }

    /// Stop when running, start otherwise; returns the new state.
    pub fn toggle(&mut self, numbers: &[u8], meta: Option<&FormatMetadata>) -> Result<LoopState> {
        if self.stop() {
            return Ok(LoopState::Idle);
        }
        self.start(numbers, meta)?;
        Ok(LoopState::Running)
    }

    /// Events reported by workers since the last call
    pub fn drain_events(&self) -> Vec<LoopEvent> {
        self.event_rx.try_iter().collect()
    }
}
