//! Network throughput from sysfs byte counters.

use super::{WidgetError, WidgetHandle, WidgetValue};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Cumulative byte counters of one interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    /// Bytes received.
    pub rx: u64,
    /// Bytes transmitted.
    pub tx: u64,
}

/// Format the traffic between two samples one second apart as KiB/s.
///
/// Counter resets (a smaller second sample) count as zero traffic.
pub fn throughput(before: Counters, after: Counters) -> String {
    let rx = after.rx.saturating_sub(before.rx) / 1024;
    let tx = after.tx.saturating_sub(before.tx) / 1024;
    format!("{rx}↓↑{tx}")
}

/// Throughput of the first connected interface, in priority order.
#[derive(Debug, Clone)]
pub struct NetworkWidget {
    interfaces: Vec<String>,
    sysfs: PathBuf,
    sample: Duration,
    idle: Duration,
    click: Option<String>,
}

impl NetworkWidget {
    /// Sampling window.
    pub const SAMPLE: Duration = Duration::from_secs(1);
    /// Wait between checks while no interface is up.
    pub const IDLE: Duration = Duration::from_secs(30);
    /// Default click action: open a connection manager.
    pub const DEFAULT_CLICK: &'static str = "urxvt -e \"nmtui\"";

    /// Watch `interfaces`, highest priority first.
    pub fn new<I, S>(interfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            interfaces: interfaces.into_iter().map(Into::into).collect(),
            sysfs: PathBuf::from("/sys"),
            sample: Self::SAMPLE,
            idle: Self::IDLE,
            click: Some(Self::DEFAULT_CLICK.to_string()),
        }
    }

    /// Read from a different sysfs root.
    #[must_use]
    pub fn with_sysfs(mut self, root: impl AsRef<Path>) -> Self {
        self.sysfs = root.as_ref().to_path_buf();
        self
    }

    /// Change the sample window and idle wait.
    #[must_use]
    pub const fn with_timing(mut self, sample: Duration, idle: Duration) -> Self {
        self.sample = sample;
        self.idle = idle;
        self
    }

    /// Change (or remove) the click action.
    #[must_use]
    pub fn with_click(mut self, click: Option<String>) -> Self {
        self.click = click;
        self
    }

    fn interface_dir(&self, iface: &str) -> PathBuf {
        self.sysfs.join("class/net").join(iface)
    }

    /// Whether `iface` reports carrier. Unreadable means down.
    pub fn is_up(&self, iface: &str) -> bool {
        fs::read_to_string(self.interface_dir(iface).join("carrier"))
            .is_ok_and(|carrier| carrier.trim() == "1")
    }

    /// First interface with carrier, if any.
    pub fn active_interface(&self) -> Option<&str> {
        self.interfaces
            .iter()
            .map(String::as_str)
            .find(|iface| self.is_up(iface))
    }

    /// Current byte counters of `iface`.
    pub fn counters(&self, iface: &str) -> Result<Counters, WidgetError> {
        let stats = self.interface_dir(iface).join("statistics");
        Ok(Counters {
            rx: read_counter(&stats.join("rx_bytes"))?,
            tx: read_counter(&stats.join("tx_bytes"))?,
        })
    }

    /// Sample `iface` across the sampling window. Blocks this widget only.
    pub fn sample(&self, iface: &str) -> Result<String, WidgetError> {
        let before = self.counters(iface)?;
        thread::sleep(self.sample);
        let after = self.counters(iface)?;
        Ok(throughput(before, after))
    }

    pub(crate) fn run(&self, handle: &WidgetHandle) -> Result<(), WidgetError> {
        while handle.is_running() {
            let Some(iface) = self.active_interface() else {
                debug!(tag = handle.tag(), "no interface up");
                handle.update(WidgetValue::Empty);
                thread::sleep(self.idle);
                continue;
            };

            match self.sample(iface) {
                Ok(traffic) => handle.update(WidgetValue::Text(
                    handle.painter().system(&traffic, self.click.as_deref()),
                )),
                Err(e) => {
                    warn!(tag = handle.tag(), iface, error = %e, "poll failed, skipping cycle");
                    thread::sleep(self.sample);
                }
            }
        }
        Ok(())
    }
}

fn read_counter(path: &Path) -> Result<u64, WidgetError> {
    let text = fs::read_to_string(path).map_err(|source| WidgetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    text.trim()
        .parse()
        .map_err(|_| WidgetError::parse("byte counter", text))
}
