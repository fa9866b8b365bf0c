//! Renderer Actor: the single thread that snapshots, renders and writes.
//!
//! All dirty signals funnel into this actor's channel, so "snapshot every
//! slot, render the template, write the line" never runs concurrently.
//! Signals that pile up while a render is in progress are folded into the
//! next render.

use super::messages::{CompositorMessage, RenderStats};
use super::sink::LineSink;
use crate::error::BarError;
use crate::template::{Snapshot, Template};
use crate::widget::Slot;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use indexmap::IndexMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, trace};

/// Read-only tag → slot registry shared with the render actor.
pub type SlotMap = IndexMap<Arc<str>, Arc<Slot>>;

/// Renderer actor handle.
#[derive(Debug)]
pub struct RendererActor {
    /// Handle to the render thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
    /// Render counters.
    stats: Arc<RenderStats>,
}

/// Internal renderer state, owned by the render thread.
struct Renderer<S> {
    template: Template,
    slots: Arc<SlotMap>,
    sink: S,
    stats: Arc<RenderStats>,
}

/// Take one consistent snapshot of every slot, clearing dirty flags.
///
/// Also returns the tags whose value changed since the previous snapshot.
pub(crate) fn snapshot(slots: &SlotMap) -> (Snapshot, Vec<&str>) {
    let mut changed = Vec::new();
    let values = slots
        .iter()
        .map(|(tag, slot)| {
            if slot.take_dirty() {
                changed.push(&**tag);
            }
            (tag.to_string(), slot.read())
        })
        .collect();
    (values, changed)
}

impl<S: LineSink> Renderer<S> {
    /// Perform one render cycle covering `signals` queued signals.
    fn render(&mut self, signals: u64) -> Result<(), BarError> {
        let (values, changed) = snapshot(&self.slots);
        let line = self.template.render(&values);
        self.sink.write_line(&line).map_err(BarError::SinkClosed)?;
        self.stats.record_render(signals);
        trace!(bytes = line.len(), signals, ?changed, "rendered line");
        Ok(())
    }
}

impl RendererActor {
    /// How long the loop waits for a signal before checking shutdown.
    const POLL: Duration = Duration::from_millis(16);

    /// Spawn the render thread.
    ///
    /// A sink failure ends the thread and is reported on `failures`.
    pub fn spawn<S>(
        receiver: Receiver<CompositorMessage>,
        template: Template,
        slots: Arc<SlotMap>,
        sink: S,
        failures: Sender<BarError>,
    ) -> Result<Self, BarError>
    where
        S: LineSink + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let stats = Arc::new(RenderStats::default());

        let renderer = Renderer {
            template,
            slots,
            sink,
            stats: stats.clone(),
        };

        let handle = thread::Builder::new()
            .name("lemonwheel-render".to_string())
            .spawn(move || {
                if let Err(e) = Self::run_loop(&receiver, &shutdown_clone, renderer) {
                    error!(error = %e, "render thread stopped");
                    let _ = failures.send(e);
                }
            })
            .map_err(|e| BarError::thread("lemonwheel-render", e))?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
            stats,
        })
    }

    /// Render counters.
    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// Signal the render thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the render thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main render loop.
    fn run_loop<S: LineSink>(
        receiver: &Receiver<CompositorMessage>,
        shutdown: &Arc<AtomicBool>,
        mut renderer: Renderer<S>,
    ) -> Result<(), BarError> {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            let first = match receiver.recv_timeout(Self::POLL) {
                Ok(message) => message,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            };

            // Fold everything already queued into this render.
            let mut signals = 0u64;
            let mut stop = false;
            for message in std::iter::once(first).chain(receiver.try_iter()) {
                match message {
                    CompositorMessage::Dirty(tag) => {
                        debug!(tag = &*tag, "widget dirty");
                        signals += 1;
                    }
                    CompositorMessage::Redraw => signals += 1,
                    CompositorMessage::Shutdown => stop = true,
                }
            }

            if signals > 0 {
                renderer.render(signals)?;
            }
            if stop {
                break;
            }
        }

        Ok(())
    }
}

impl Drop for RendererActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
