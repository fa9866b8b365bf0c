//! Widgets: autonomous producers of bar text.
//!
//! Each widget runs on its own thread, owns one value, and publishes every
//! change through a [`WidgetHandle`]. The handle stores the value in the
//! widget's slot and signals the compositor; the widget never holds a
//! reference to the compositor itself.
//!
//! # Kinds
//!
//! | Kind | Driver | Value |
//! |------|--------|-------|
//! | [`ClockWidget`] | timer | formatted time |
//! | [`VolumeWidget`] | timer, `amixer` | `50%` / `50M` |
//! | [`TitleWidget`] | `xtitle` stream | active window title |
//! | [`NetworkWidget`] | sysfs, 1 s sample | `rx↓↑tx` KiB/s |
//! | [`BatteryWidget`] | timer, sysfs | `87-` / `87+` |
//! | [`BspwmWidget`] | `bspc` stream | one section per monitor |
//! | [`FeedWidget`] | channel | whatever the application sends |

mod battery;
mod bspwm;
mod clock;
mod feed;
mod handle;
mod network;
mod stream;
mod title;
mod volume;

pub use battery::{charge_suffix, BatteryWidget};
pub use bspwm::{parse_report, BspwmWidget, DesktopState, MonitorReport, ReportItem};
pub use clock::ClockWidget;
pub use feed::FeedWidget;
pub use handle::{Notifier, Slot, WidgetHandle};
pub use network::{throughput, Counters, NetworkWidget};
pub use title::{truncate_to_width, TitleWidget};
pub use volume::VolumeWidget;

use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// The value a widget publishes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WidgetValue {
    /// Nothing to show (never produced, or source currently unavailable).
    #[default]
    Empty,
    /// A single piece of text.
    Text(String),
    /// One piece of text per item, addressed with `$(tag[N])`.
    Sequence(Vec<String>),
}

impl WidgetValue {
    /// A text value.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// A sequence value.
    pub const fn sequence(items: Vec<String>) -> Self {
        Self::Sequence(items)
    }

    /// Scalar rendering: text as-is, sequences concatenated.
    pub fn to_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(text) => text.clone(),
            Self::Sequence(items) => items.concat(),
        }
    }

    /// Item `index`. A text value behaves as a one-item sequence.
    pub fn item(&self, index: usize) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Text(text) => (index == 0).then_some(text.as_str()),
            Self::Sequence(items) => items.get(index).map(String::as_str),
        }
    }

    /// Whether there is nothing to show.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.is_empty(),
            Self::Sequence(items) => items.is_empty(),
        }
    }
}

impl From<String> for WidgetValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for WidgetValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<String>> for WidgetValue {
    fn from(items: Vec<String>) -> Self {
        Self::Sequence(items)
    }
}

/// Errors raised inside a widget's loop.
///
/// These never leave the widget's thread. Poll errors skip one cycle;
/// anything that ends the loop only stops that widget.
#[derive(Error, Debug)]
pub enum WidgetError {
    /// A sysfs or other file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// An external command could not be run.
    #[error("failed to run `{command}`: {source}")]
    Command {
        /// Command line.
        command: String,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Output did not have the expected shape.
    #[error("could not parse {what} from {input:?}")]
    Parse {
        /// What was being parsed.
        what: &'static str,
        /// Offending input.
        input: String,
    },

    /// The clock format string is invalid.
    #[error("invalid time format `{0}`")]
    Format(String),

    /// A streaming source closed its output.
    #[error("`{0}` closed its output stream")]
    StreamClosed(String),
}

impl WidgetError {
    pub(crate) fn parse(what: &'static str, input: impl Into<String>) -> Self {
        Self::Parse {
            what,
            input: input.into(),
        }
    }
}

/// Every widget kind the bar knows about.
#[derive(Debug)]
pub enum Widget {
    /// Formatted local time.
    Clock(ClockWidget),
    /// ALSA mixer volume.
    Volume(VolumeWidget),
    /// Active window title.
    Title(TitleWidget),
    /// Network throughput.
    Network(NetworkWidget),
    /// Battery charge.
    Battery(BatteryWidget),
    /// bspwm monitors and desktops.
    Bspwm(BspwmWidget),
    /// Values pushed by the application.
    Feed(FeedWidget),
}

impl Widget {
    /// Short name of the widget kind, for logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Clock(_) => "clock",
            Self::Volume(_) => "volume",
            Self::Title(_) => "title",
            Self::Network(_) => "network",
            Self::Battery(_) => "battery",
            Self::Bspwm(_) => "bspwm",
            Self::Feed(_) => "feed",
        }
    }

    /// Run the widget's update loop on the current thread.
    ///
    /// Returns when the loop ends: the handle was shut down, a stream
    /// closed, or a fatal widget error occurred.
    pub fn run(self, handle: &WidgetHandle) -> Result<(), WidgetError> {
        match self {
            Self::Clock(w) => w.run(handle),
            Self::Volume(w) => w.run(handle),
            Self::Title(w) => w.run(handle),
            Self::Network(w) => w.run(handle),
            Self::Battery(w) => w.run(handle),
            Self::Bspwm(w) => w.run(handle),
            Self::Feed(w) => w.run(handle),
        }
    }
}

macro_rules! impl_from_widget {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Widget {
                fn from(widget: $ty) -> Self {
                    Self::$variant(widget)
                }
            }
        )*
    };
}

impl_from_widget!(
    Clock(ClockWidget),
    Volume(VolumeWidget),
    Title(TitleWidget),
    Network(NetworkWidget),
    Battery(BatteryWidget),
    Bspwm(BspwmWidget),
    Feed(FeedWidget),
);

/// Fixed-interval polling loop shared by the timer-driven widgets.
///
/// A failed poll is logged and skipped; the previous value stays visible.
pub(crate) fn poll_loop<F>(handle: &WidgetHandle, interval: Duration, mut poll: F)
where
    F: FnMut() -> Result<WidgetValue, WidgetError>,
{
    while handle.is_running() {
        match poll() {
            Ok(value) => handle.update(value),
            Err(e) => warn!(tag = handle.tag(), error = %e, "poll failed, skipping cycle"),
        }
        thread::sleep(interval);
    }
}
