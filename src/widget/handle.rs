//! Slots and handles: how a widget publishes without owning the compositor.

use super::WidgetValue;
use crate::actor::CompositorMessage;
use crate::markup::Painter;
use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// Storage for one widget's latest value.
///
/// Written by the widget thread, read by the render actor. Each read
/// returns one complete value.
#[derive(Debug, Default)]
pub struct Slot {
    value: RwLock<WidgetValue>,
    dirty: AtomicBool,
}

impl Slot {
    /// An empty, clean slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest committed value.
    pub fn read(&self) -> WidgetValue {
        match self.value.read() {
            Ok(value) => value.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the value and mark the slot dirty.
    pub fn store(&self, value: WidgetValue) {
        match self.value.write() {
            Ok(mut slot) => *slot = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
        self.dirty.store(true, Ordering::Release);
    }

    /// Whether the value changed since the last [`Slot::take_dirty`].
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Clear the dirty flag, returning its previous state.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }
}

/// Non-owning link from widgets back to the compositor's render actor.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: Sender<CompositorMessage>,
}

impl Notifier {
    pub(crate) const fn new(sender: Sender<CompositorMessage>) -> Self {
        Self { sender }
    }

    /// Signal that `tag` changed. Returns `false` once the compositor is gone.
    pub fn mark_dirty(&self, tag: &Arc<str>) -> bool {
        self.sender
            .send(CompositorMessage::Dirty(Arc::clone(tag)))
            .is_ok()
    }

}

/// Everything a running widget needs: its slot, a way to notify the
/// compositor, the shared painter, and the shutdown flag.
#[derive(Debug, Clone)]
pub struct WidgetHandle {
    tag: Arc<str>,
    slot: Arc<Slot>,
    notifier: Notifier,
    painter: Painter,
    running: Arc<AtomicBool>,
}

impl WidgetHandle {
    pub(crate) const fn new(
        tag: Arc<str>,
        slot: Arc<Slot>,
        notifier: Notifier,
        painter: Painter,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            tag,
            slot,
            notifier,
            painter,
            running,
        }
    }

    /// Tag this widget is registered under.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Painter for colour markup.
    pub const fn painter(&self) -> &Painter {
        &self.painter
    }

    /// Latest committed value.
    pub fn read(&self) -> WidgetValue {
        self.slot.read()
    }

    /// Commit a new value and notify the compositor.
    pub fn update(&self, value: impl Into<WidgetValue>) {
        self.slot.store(value.into());
        self.notifier.mark_dirty(&self.tag);
    }

    /// Whether the bar is still running. Loops exit once this is false.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

/// A detached handle for driving widget loops in tests: the receiver sees
/// every dirty signal and clearing the flag ends the loop.
#[cfg(test)]
pub(crate) fn test_handle(
    tag: &str,
) -> (
    WidgetHandle,
    crossbeam_channel::Receiver<CompositorMessage>,
    Arc<AtomicBool>,
) {
    let (tx, rx) = crossbeam_channel::unbounded();
    let running = Arc::new(AtomicBool::new(true));
    let handle = WidgetHandle::new(
        Arc::from(tag),
        Arc::new(Slot::new()),
        Notifier::new(tx),
        Painter::default(),
        Arc::clone(&running),
    );
    (handle, rx, running)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> (WidgetHandle, crossbeam_channel::Receiver<CompositorMessage>) {
        let (handle, rx, _running) = test_handle("clock");
        (handle, rx)
    }

    #[test]
    fn test_slot_store_marks_dirty() {
        let slot = Slot::new();
        assert!(!slot.is_dirty());
        slot.store(WidgetValue::text("x"));
        assert!(slot.is_dirty());
        assert!(slot.take_dirty());
        assert!(!slot.is_dirty());
        assert_eq!(slot.read(), WidgetValue::text("x"));
    }

    #[test]
    fn test_update_notifies() {
        let (handle, rx) = handle();
        handle.update("12:00");

        assert_eq!(handle.read(), WidgetValue::text("12:00"));
        match rx.try_recv().unwrap() {
            CompositorMessage::Dirty(tag) => assert_eq!(&*tag, "clock"),
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn test_update_after_compositor_gone() {
        let (handle, rx) = handle();
        drop(rx);
        handle.update("still stored");
        assert_eq!(handle.read(), WidgetValue::text("still stored"));
    }
}
