//! Message types for actor communication.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Messages consumed by the render actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositorMessage {
    /// A widget committed a new value.
    Dirty(Arc<str>),
    /// Render again without a value change.
    Redraw,
    /// Stop the render actor.
    Shutdown,
}

/// Counters kept by the render actor.
#[derive(Debug, Default)]
pub struct RenderStats {
    renders: AtomicU64,
    signals: AtomicU64,
    coalesced: AtomicU64,
}

impl RenderStats {
    /// Lines written to the sink.
    pub fn renders(&self) -> u64 {
        self.renders.load(Ordering::SeqCst)
    }

    /// Dirty/redraw signals received.
    pub fn signals(&self) -> u64 {
        self.signals.load(Ordering::SeqCst)
    }

    /// Signals folded into a render triggered by an earlier signal.
    pub fn coalesced(&self) -> u64 {
        self.coalesced.load(Ordering::Relaxed)
    }

    pub(crate) fn record_render(&self, signals: u64) {
        // Signals first, so `renders() <= signals()` holds for any reader.
        self.signals.fetch_add(signals, Ordering::SeqCst);
        self.coalesced
            .fetch_add(signals.saturating_sub(1), Ordering::Relaxed);
        self.renders.fetch_add(1, Ordering::SeqCst);
    }
}
