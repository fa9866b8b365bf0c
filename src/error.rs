//! Error types shared across the bar.
//!
//! Only [`BarError`] is fatal. Widget failures stay inside the widget's own
//! thread and never reach this type.

use crate::config::ConfigError;
use std::io;
use thiserror::Error;

/// Top-level bar errors.
///
/// Every variant here terminates the process: a bar without its renderer
/// or configuration has nothing left to do.
#[derive(Error, Debug)]
pub enum BarError {
    /// The configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Two widgets were registered under the same tag.
    #[error("widget tag `{0}` is already registered")]
    DuplicateTag(String),

    /// The output sink refused a rendered line (renderer gone).
    #[error("output sink closed: {0}")]
    SinkClosed(#[source] io::Error),

    /// A pipeline relay between processes failed.
    #[error("{relay} relay failed: {source}")]
    Relay {
        /// Which relay failed (e.g. `renderer` or `shell`).
        relay: &'static str,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// An external process could not be started.
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        /// Program name.
        program: String,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// An OS thread could not be started.
    #[error("failed to spawn thread `{name}`: {source}")]
    Thread {
        /// Thread name.
        name: String,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The log subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Tracing(String),
}

impl BarError {
    pub(crate) fn thread(name: impl Into<String>, source: io::Error) -> Self {
        Self::Thread {
            name: name.into(),
            source,
        }
    }
}
