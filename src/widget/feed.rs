//! Feed widget: values pushed from application code.

use super::{WidgetError, WidgetHandle, WidgetValue};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

/// Publishes whatever arrives on its channel, unchanged.
///
/// The loop ends when every sender is dropped.
#[derive(Debug)]
pub struct FeedWidget {
    values: Receiver<WidgetValue>,
}

impl FeedWidget {
    /// How often the loop checks for shutdown while idle.
    const POLL: Duration = Duration::from_millis(50);

    /// Create a feed and the sender that drives it.
    pub fn channel() -> (Sender<WidgetValue>, Self) {
        let (tx, rx) = unbounded();
        (tx, Self { values: rx })
    }

    /// Wrap an existing receiver.
    pub const fn from_receiver(values: Receiver<WidgetValue>) -> Self {
        Self { values }
    }

    pub(crate) fn run(&self, handle: &WidgetHandle) -> Result<(), WidgetError> {
        while handle.is_running() {
            match self.values.recv_timeout(Self::POLL) {
                Ok(value) => handle.update(value),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        Ok(())
    }
}
