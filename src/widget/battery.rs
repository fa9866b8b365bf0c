//! Battery charge from `/sys/class/power_supply`.

use super::{poll_loop, WidgetError, WidgetHandle, WidgetValue};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Charge direction suffix: `-` discharging, `+` charging, otherwise none.
pub fn charge_suffix(status: &str) -> &'static str {
    if status.contains("Discharging") {
        "-"
    } else if status.contains("Charging") {
        "+"
    } else {
        ""
    }
}

/// Battery percentage with a charge direction suffix.
#[derive(Debug, Clone)]
pub struct BatteryWidget {
    battery: String,
    sysfs: PathBuf,
    interval: Duration,
}

impl BatteryWidget {
    /// Default battery name.
    pub const DEFAULT_BATTERY: &'static str = "BAT0";
    /// Default polling interval.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

    /// Watch battery `battery` (e.g. `BAT0`).
    pub fn new(battery: impl Into<String>) -> Self {
        Self {
            battery: battery.into(),
            sysfs: PathBuf::from("/sys"),
            interval: Self::DEFAULT_INTERVAL,
        }
    }

    /// Read from a different sysfs root.
    #[must_use]
    pub fn with_sysfs(mut self, root: impl AsRef<Path>) -> Self {
        self.sysfs = root.as_ref().to_path_buf();
        self
    }

    /// Change the polling interval.
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    fn dir(&self) -> PathBuf {
        self.sysfs.join("class/power_supply").join(&self.battery)
    }

    /// Charge percentage, from `capacity` when the controller provides it,
    /// otherwise derived from `energy_now / energy_full`.
    pub fn percentage(&self) -> Result<String, WidgetError> {
        let dir = self.dir();
        let capacity = dir.join("capacity");
        if capacity.exists() {
            return read_trimmed(&capacity);
        }

        let now: f64 = parse_number(&read_trimmed(&dir.join("energy_now"))?, "energy_now")?;
        let full: f64 = parse_number(&read_trimmed(&dir.join("energy_full"))?, "energy_full")?;
        if full <= 0.0 {
            return Err(WidgetError::parse("energy_full", full.to_string()));
        }
        Ok(format!("{:.0}", (now / full * 100.0).round()))
    }

    /// Percentage plus suffix, e.g. `87-`.
    pub fn level(&self) -> Result<String, WidgetError> {
        let percentage = self.percentage()?;
        let status = read_trimmed(&self.dir().join("status"))?;
        Ok(format!("{percentage}{}", charge_suffix(&status)))
    }

    pub(crate) fn run(&self, handle: &WidgetHandle) -> Result<(), WidgetError> {
        poll_loop(handle, self.interval, || {
            let level = self.level()?;
            Ok(WidgetValue::Text(handle.painter().system(&level, None)))
        });
        Ok(())
    }
}

impl Default for BatteryWidget {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BATTERY)
    }
}

fn read_trimmed(path: &Path) -> Result<String, WidgetError> {
    fs::read_to_string(path)
        .map(|text| text.trim().to_string())
        .map_err(|source| WidgetError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn parse_number(text: &str, what: &'static str) -> Result<f64, WidgetError> {
    text.parse().map_err(|_| WidgetError::parse(what, text))
}
