//! The compositor: owns widgets by tag and turns their values into lines.

use super::messages::{CompositorMessage, RenderStats};
use super::renderer::{RendererActor, SlotMap};
use super::sink::LineSink;
use super::supervisor::{spawn_widget, WidgetThread};
use crate::error::BarError;
use crate::markup::Painter;
use crate::template::{Snapshot, Template};
use crate::widget::{Notifier, Slot, Widget, WidgetHandle, WidgetValue};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// A bar under construction: a template plus widgets registered by tag.
///
/// Nothing runs until [`Compositor::run`].
#[derive(Debug)]
pub struct Compositor {
    template: Template,
    painter: Painter,
    slots: SlotMap,
    widgets: Vec<(Arc<str>, Widget)>,
}

impl Compositor {
    /// An empty compositor rendering `template`, painting with `painter`.
    pub fn new(template: Template, painter: Painter) -> Self {
        Self {
            template,
            painter,
            slots: SlotMap::new(),
            widgets: Vec::new(),
        }
    }

    /// Register `widget` under `tag`.
    ///
    /// # Errors
    ///
    /// [`BarError::DuplicateTag`] if `tag` is already taken.
    pub fn register(&mut self, tag: &str, widget: impl Into<Widget>) -> Result<(), BarError> {
        if self.slots.contains_key(tag) {
            return Err(BarError::DuplicateTag(tag.to_string()));
        }
        let tag: Arc<str> = Arc::from(tag);
        let widget = widget.into();
        debug!(tag = &*tag, kind = widget.kind(), "widget registered");

        self.slots.insert(Arc::clone(&tag), Arc::new(Slot::new()));
        self.widgets.push((tag, widget));
        Ok(())
    }

    /// Builder form of [`Compositor::register`].
    ///
    /// # Errors
    ///
    /// [`BarError::DuplicateTag`] if `tag` is already taken.
    pub fn with_widget(mut self, tag: &str, widget: impl Into<Widget>) -> Result<Self, BarError> {
        self.register(tag, widget)?;
        Ok(self)
    }

    /// Registered tags, in registration order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(|tag| &**tag)
    }

    /// Number of registered widgets.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no widget is registered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Start the render actor, then every widget, writing lines to `sink`.
    ///
    /// # Errors
    ///
    /// Fails if a thread cannot be spawned. Threads already started are
    /// shut down.
    pub fn run<S>(self, sink: S) -> Result<RunningBar, BarError>
    where
        S: LineSink + 'static,
    {
        let Self {
            template,
            painter,
            slots,
            widgets,
        } = self;

        let slots = Arc::new(slots);
        let (sender, receiver) = unbounded();
        let (failure_tx, failure_rx) = unbounded();
        let running = Arc::new(AtomicBool::new(true));

        let renderer = RendererActor::spawn(
            receiver,
            template,
            Arc::clone(&slots),
            sink,
            failure_tx,
        )?;

        let mut bar = RunningBar {
            renderer: Some(renderer),
            threads: Vec::with_capacity(widgets.len()),
            slots,
            sender,
            failures: failure_rx,
            running,
        };

        for (tag, widget) in widgets {
            let Some(slot) = bar.slots.get(&tag).cloned() else {
                continue;
            };
            let handle = WidgetHandle::new(
                tag,
                slot,
                Notifier::new(bar.sender.clone()),
                painter.clone(),
                Arc::clone(&bar.running),
            );
            let thread = spawn_widget(widget, handle)?;
            bar.threads.push(thread);
        }

        info!(widgets = bar.threads.len(), "bar running");
        Ok(bar)
    }
}

/// A started bar.
///
/// Dropping it stops the render actor and asks every widget loop to end.
#[derive(Debug)]
pub struct RunningBar {
    renderer: Option<RendererActor>,
    threads: Vec<WidgetThread>,
    slots: Arc<SlotMap>,
    sender: Sender<CompositorMessage>,
    failures: Receiver<BarError>,
    running: Arc<AtomicBool>,
}

impl RunningBar {
    /// Signal that `tag` changed and a render is due.
    ///
    /// Returns `false` for an unknown tag or a stopped render actor.
    pub fn mark_dirty(&self, tag: &str) -> bool {
        let Some((tag, _)) = self.slots.get_key_value(tag) else {
            return false;
        };
        self.sender
            .send(CompositorMessage::Dirty(Arc::clone(tag)))
            .is_ok()
    }

    /// Request a render with no value change.
    pub fn redraw(&self) -> bool {
        self.sender.send(CompositorMessage::Redraw).is_ok()
    }

    /// Latest value of `tag`.
    pub fn read(&self, tag: &str) -> Option<WidgetValue> {
        self.slots.get(tag).map(|slot| slot.read())
    }

    /// Current values of every widget. Does not clear dirty flags.
    pub fn values(&self) -> Snapshot {
        self.slots
            .iter()
            .map(|(tag, slot)| (tag.to_string(), slot.read()))
            .collect()
    }

    /// Fatal errors: a closed sink ends the render actor and lands here.
    pub const fn failures(&self) -> &Receiver<BarError> {
        &self.failures
    }

    /// Render counters.
    pub fn stats(&self) -> Option<&RenderStats> {
        self.renderer.as_ref().map(RendererActor::stats)
    }

    /// Tags whose widget loop has ended.
    pub fn stopped_widgets(&self) -> Vec<&str> {
        self.threads
            .iter()
            .filter(|thread| thread.is_finished())
            .map(WidgetThread::tag)
            .collect()
    }

    /// Stop rendering and ask widgets to stop.
    ///
    /// Widget threads blocked on a stream or a long sleep are not waited for;
    /// they exit at their next check.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        let _ = self.sender.send(CompositorMessage::Shutdown);
        if let Some(renderer) = self.renderer.take() {
            renderer.join();
        }
    }
}

impl Drop for RunningBar {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::renderer::snapshot;
    use crate::widget::FeedWidget;
    use std::time::Duration;

    #[test]
    fn test_duplicate_tag_rejected() {
        let mut compositor = Compositor::new(Template::format(""), Painter::default());
        let (_a, feed_a) = FeedWidget::channel();
        let (_b, feed_b) = FeedWidget::channel();

        compositor.register("x", feed_a).unwrap();
        let err = compositor.register("x", feed_b).unwrap_err();
        assert!(matches!(err, BarError::DuplicateTag(tag) if tag == "x"));
        assert_eq!(compositor.len(), 1);
    }

    #[test]
    fn test_tags_in_registration_order() {
        let (_a, a) = FeedWidget::channel();
        let (_b, b) = FeedWidget::channel();
        let compositor = Compositor::new(Template::format(""), Painter::default())
            .with_widget("vol", a)
            .unwrap()
            .with_widget("clock", b)
            .unwrap();

        assert_eq!(compositor.tags().collect::<Vec<_>>(), ["vol", "clock"]);
    }

    #[test]
    fn test_snapshot_render_fills_absent_values() {
        let compositor = Compositor::new(Template::format("[$(a)][$(b)]"), Painter::default());
        let mut slots = compositor.slots;
        let slot = Arc::new(Slot::new());
        slot.store(WidgetValue::text("1"));
        slots.insert(Arc::from("a"), slot);

        slots.insert(Arc::from("b"), Arc::new(Slot::new()));

        let (values, changed) = snapshot(&slots);
        assert_eq!(changed, ["a"]);
        let line = compositor.template.render(&values);
        assert_eq!(line, "[1][]");
    }

    #[test]
    fn test_mark_dirty_unknown_tag() {
        let (line_tx, line_rx) = unbounded::<String>();
        let (_tx, feed) = FeedWidget::channel();
        let bar = Compositor::new(Template::format("$(a)"), Painter::default())
            .with_widget("a", feed)
            .unwrap()
            .run(line_tx)
            .unwrap();

        assert!(!bar.mark_dirty("nope"));
        assert!(bar.mark_dirty("a"));
        assert_eq!(line_rx.recv_timeout(Duration::from_secs(1)).unwrap(), "");
        bar.shutdown();
    }
}
