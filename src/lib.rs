//! # Lemonwheel
//!
//! A threaded widget compositor that feeds lemonbar.
//!
//! Every status datum (clock, volume, window title, network, battery, bspwm
//! desktops) is an autonomous widget on its own thread. Widgets publish into
//! per-tag slots and signal a single render actor, which snapshots every
//! slot, fills in a template, and writes one complete line to lemonbar.
//!
//! ## Core Concepts
//!
//! - **Widgets**: independent producers, one thread each, isolated from
//!   each other's failures
//! - **Dirty signals**: a widget change triggers a full re-render from a
//!   consistent snapshot
//! - **Templates**: `$(tag)` and `$(tag[N])` placeholders, or a per-monitor
//!   function fanned out with `%{S+}`
//! - **Pipeline**: lines go to lemonbar, lemonbar's click output goes to `sh`
//!
//! ## Example
//!
//! ```rust,no_run
//! use lemonwheel::{ClockWidget, Compositor, Painter, Template, WriterSink};
//!
//! # fn main() -> Result<(), lemonwheel::BarError> {
//! let bar = Compositor::new(Template::format("%{r}$(clock)"), Painter::default())
//!     .with_widget("clock", ClockWidget::default())?
//!     .run(WriterSink::new(std::io::stdout()))?;
//!
//! if let Ok(error) = bar.failures().recv() {
//!     return Err(error);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod config;
pub mod error;
pub mod layout;
pub mod markup;
pub mod process;
pub mod template;
pub mod widget;

// Re-exports for convenience
pub use actor::{Compositor, LineSink, OutputPipeline, PipelineConfig, RunningBar, WriterSink};
pub use config::{BarConfig, ConfigError, Palette};
pub use error::BarError;
pub use markup::Painter;
pub use process::CommandSpec;
pub use template::{Snapshot, Template};
pub use widget::{
    BatteryWidget, BspwmWidget, ClockWidget, FeedWidget, NetworkWidget, TitleWidget,
    VolumeWidget, Widget, WidgetError, WidgetValue,
};

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// Logs go to stderr; stdout may be carrying bar lines. `RUST_LOG` sets the
/// filter (default `info`) and `LOG_FORMAT=json` switches to JSON output.
///
/// # Errors
///
/// [`BarError::Tracing`] if a global subscriber is already installed.
pub fn init_tracing() -> Result<(), BarError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let format = std::env::var("LOG_FORMAT").unwrap_or_default();

    let result = match format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        _ => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    result.map_err(|e| BarError::Tracing(e.to_string()))
}
