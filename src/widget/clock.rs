//! Clock widget.

use super::{poll_loop, WidgetError, WidgetHandle, WidgetValue};
use chrono::{Local, NaiveDateTime};
use std::fmt::Write;
use std::time::Duration;

/// Formatted local time, refreshed on a fixed interval.
#[derive(Debug, Clone)]
pub struct ClockWidget {
    format: String,
    interval: Duration,
    click: Option<String>,
}

impl ClockWidget {
    /// Default `strftime` format.
    pub const DEFAULT_FORMAT: &'static str = "%d %b %H:%M";
    /// Default refresh interval.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
    /// Default click action: pop up a calendar.
    pub const DEFAULT_CLICK: &'static str = "notify-send \"`cal`\"";

    /// Clock with a `strftime`-style format.
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            interval: Self::DEFAULT_INTERVAL,
            click: Some(Self::DEFAULT_CLICK.to_string()),
        }
    }

    /// Change the refresh interval.
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Change (or remove) the click action.
    #[must_use]
    pub fn with_click(mut self, click: Option<String>) -> Self {
        self.click = click;
        self
    }

    /// Format `time` with this clock's format string.
    pub fn format_time(&self, time: &NaiveDateTime) -> Result<String, WidgetError> {
        let mut text = String::new();
        write!(text, "{}", time.format(&self.format))
            .map_err(|_| WidgetError::Format(self.format.clone()))?;
        Ok(text)
    }

    pub(crate) fn run(&self, handle: &WidgetHandle) -> Result<(), WidgetError> {
        // Reject a bad format once instead of warning every cycle.
        self.format_time(&Local::now().naive_local())?;

        poll_loop(handle, self.interval, || {
            let now = self.format_time(&Local::now().naive_local())?;
            Ok(WidgetValue::Text(
                handle.painter().system(&now, self.click.as_deref()),
            ))
        });
        Ok(())
    }
}

impl Default for ClockWidget {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FORMAT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixed() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(9, 7, 0)
            .unwrap()
    }

    #[test]
    fn test_default_format() {
        let clock = ClockWidget::default();
        assert_eq!(clock.format_time(&fixed()).unwrap(), "05 Mar 09:07");
    }

    #[test]
    fn test_custom_format() {
        let clock = ClockWidget::new("%M");
        assert_eq!(clock.format_time(&fixed()).unwrap(), "07");
    }

    #[test]
    fn test_invalid_format() {
        let clock = ClockWidget::new("%!");
        assert!(matches!(
            clock.format_time(&fixed()),
            Err(WidgetError::Format(_))
        ));
    }
}
