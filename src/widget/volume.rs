//! Volume widget: polls an ALSA mixer control through `amixer`.

use super::{poll_loop, WidgetError, WidgetHandle, WidgetValue};
use crate::process::CommandSpec;
use regex::Regex;
use std::time::Duration;

/// Mixer volume with a mute indicator.
#[derive(Debug, Clone)]
pub struct VolumeWidget {
    query: CommandSpec,
    interval: Duration,
    level: Regex,
}

impl VolumeWidget {
    /// Default mixer control.
    pub const DEFAULT_CONTROL: &'static str = "Master";
    /// Default polling interval.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

    /// Volume of mixer `control`.
    pub fn new(control: impl Into<String>) -> Self {
        Self::with_query(CommandSpec::new("amixer").arg("get").arg(control))
    }

    /// Volume read from a custom query command.
    pub fn with_query(query: CommandSpec) -> Self {
        Self {
            query,
            interval: Self::DEFAULT_INTERVAL,
            level: Regex::new(r"[0-9]+%").expect("volume level pattern"),
        }
    }

    /// Change the polling interval.
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Parse `amixer get` output into `NN%` (unmuted) or `NNM` (muted).
    ///
    /// The first `NN%` in the output is the level; `[on]` anywhere means the
    /// control is unmuted.
    pub fn parse(&self, output: &str) -> Result<String, WidgetError> {
        let level = self
            .level
            .find(output)
            .map(|m| m.as_str().trim_end_matches('%'))
            .ok_or_else(|| WidgetError::parse("volume level", output))?;

        let suffix = if output.contains("[on]") { '%' } else { 'M' };
        Ok(format!("{level}{suffix}"))
    }

    fn poll(&self) -> Result<String, WidgetError> {
        let output = self.query.output_text().map_err(|source| WidgetError::Command {
            command: self.query.to_string(),
            source,
        })?;
        self.parse(&output)
    }

    pub(crate) fn run(&self, handle: &WidgetHandle) -> Result<(), WidgetError> {
        poll_loop(handle, self.interval, || {
            let level = self.poll()?;
            Ok(WidgetValue::Text(handle.painter().system(&level, None)))
        });
        Ok(())
    }
}

impl Default for VolumeWidget {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CONTROL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AMIXER_ON: &str = "Simple mixer control 'Master',0\n  \
        Capabilities: pvolume pvolume-joined pswitch pswitch-joined\n  \
        Playback channels: Mono\n  \
        Limits: Playback 0 - 87\n  \
        Mono: Playback 44 [51%] [-32.25dB] [on]\n";

    fn parse(input: &str) -> Result<String, WidgetError> {
        VolumeWidget::default().parse(input)
    }

    #[test]
    fn test_parse_unmuted() {
        assert_eq!(parse("Mono: Playback 50 [50%] [on]").unwrap(), "50%");
    }

    #[test]
    fn test_parse_muted() {
        assert_eq!(parse("Mono: Playback 50 [50%] [off]").unwrap(), "50M");
        assert_eq!(parse("Mono: Playback 50 [50%]").unwrap(), "50M");
    }

    #[test]
    fn test_parse_full_amixer_output() {
        assert_eq!(parse(AMIXER_ON).unwrap(), "51%");
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            parse("amixer: Unable to find simple control 'Nope',0"),
            Err(WidgetError::Parse { .. })
        ));
    }

    #[test]
    fn test_poll_with_stub_query() {
        let widget = VolumeWidget::with_query(
            CommandSpec::new("echo").arg("Mono: Playback 12 [12%] [on]"),
        );
        assert_eq!(widget.poll().unwrap(), "12%");
    }
}
