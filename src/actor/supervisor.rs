//! Widget threads: one OS thread per widget, isolated from each other.
//!
//! A widget whose loop returns, fails, or panics stops alone. Its slot keeps
//! the last committed value and the rest of the bar carries on.

use crate::error::BarError;
use crate::widget::{Widget, WidgetError, WidgetHandle};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{error, info, warn};

/// How a widget thread ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetExit {
    /// The loop returned normally (shutdown or exhausted source).
    Finished,
    /// The loop returned an error.
    Failed(String),
    /// The loop panicked.
    Panicked(String),
}

/// A running widget thread.
#[derive(Debug)]
pub struct WidgetThread {
    tag: Arc<str>,
    handle: JoinHandle<WidgetExit>,
}

impl WidgetThread {
    /// Tag of the widget on this thread.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Whether the widget's loop has ended.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Run `body`, turning errors and panics into a [`WidgetExit`] and logging it.
pub fn supervise<F>(tag: &str, kind: &str, body: F) -> WidgetExit
where
    F: FnOnce() -> Result<(), WidgetError>,
{
    let exit = match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(())) => WidgetExit::Finished,
        Ok(Err(e)) => WidgetExit::Failed(e.to_string()),
        Err(payload) => WidgetExit::Panicked(panic_message(payload.as_ref())),
    };

    match &exit {
        WidgetExit::Finished => info!(tag, kind, "widget stopped"),
        WidgetExit::Failed(reason) => warn!(tag, kind, %reason, "widget failed, keeping last value"),
        WidgetExit::Panicked(reason) => {
            error!(tag, kind, %reason, "widget panicked, keeping last value");
        }
    }
    exit
}

/// Start `widget` on its own named thread.
pub fn spawn_widget(widget: Widget, handle: WidgetHandle) -> Result<WidgetThread, BarError> {
    let tag: Arc<str> = Arc::from(handle.tag());
    let name = format!("widget-{tag}");

    let join = thread::Builder::new()
        .name(name.clone())
        .spawn(move || {
            let kind = widget.kind();
            info!(tag = handle.tag(), kind, "widget started");
            supervise(handle.tag(), kind, || widget.run(&handle))
        })
        .map_err(|e| BarError::thread(name, e))?;

    Ok(WidgetThread { tag, handle: join })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
