//! Template rendering: turns a [`Snapshot`] into one bar line.
//!
//! Two template forms exist:
//!
//! - **Format strings** with `$(tag)` scalar and `$(tag[N])` indexed
//!   placeholders. Scalars are resolved first; indexed placeholders are
//!   resolved in a second pass over the result.
//! - **Per-monitor functions**, called once per monitor with read-only access
//!   to the snapshot. Their outputs are joined with [`MONITOR_SEPARATOR`].
//!
//! Substitution is total: no placeholder survives rendering.

mod snapshot;

pub use snapshot::Snapshot;

use crate::markup::MONITOR_SEPARATOR;
use regex::{Captures, Regex};
use std::fmt;
use std::sync::Arc;

/// Render function for a single monitor.
pub type MonitorFn = Arc<dyn Fn(&Snapshot, usize) -> String + Send + Sync>;

/// A compiled format string.
#[derive(Debug, Clone)]
pub struct FormatTemplate {
    source: String,
    scalar: Regex,
    indexed: Regex,
}

impl FormatTemplate {
    /// Compile a format string.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            scalar: Regex::new(r"\$\(([^()\[\]]+)\)").expect("scalar placeholder pattern"),
            indexed: Regex::new(r"\$\(([^()\[\]]+)\[([0-9]+)\]\)")
                .expect("indexed placeholder pattern"),
        }
    }

    /// The original format string.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Substitute every placeholder from `snapshot`.
    pub fn render(&self, snapshot: &Snapshot) -> String {
        let scalars = self
            .scalar
            .replace_all(&self.source, |caps: &Captures<'_>| snapshot.text(&caps[1]));

        self.indexed
            .replace_all(&scalars, |caps: &Captures<'_>| {
                caps[2]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| snapshot.item(&caps[1], index))
                    .unwrap_or_default()
                    .to_string()
            })
            .into_owned()
    }
}

/// How the compositor turns a snapshot into a line.
#[derive(Clone)]
pub enum Template {
    /// A flat format string.
    Format(FormatTemplate),
    /// A per-monitor function fanned out over a fixed monitor count.
    PerMonitor {
        /// Monitor count, fixed when the template is built.
        monitors: usize,
        /// Renders one monitor's section.
        render: MonitorFn,
    },
}

impl Template {
    /// Build a format-string template.
    pub fn format(source: impl Into<String>) -> Self {
        Self::Format(FormatTemplate::new(source))
    }

    /// Build a per-monitor template. A count of zero is treated as one.
    pub fn per_monitor<F>(monitors: usize, render: F) -> Self
    where
        F: Fn(&Snapshot, usize) -> String + Send + Sync + 'static,
    {
        Self::PerMonitor {
            monitors: monitors.max(1),
            render: Arc::new(render),
        }
    }

    /// Render one line from `snapshot`.
    pub fn render(&self, snapshot: &Snapshot) -> String {
        match self {
            Self::Format(format) => format.render(snapshot),
            Self::PerMonitor { monitors, render } => fan_out(*monitors, |m| render(snapshot, m)),
        }
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(format) => f.debug_tuple("Format").field(&format.source()).finish(),
            Self::PerMonitor { monitors, .. } => f
                .debug_struct("PerMonitor")
                .field("monitors", monitors)
                .finish_non_exhaustive(),
        }
    }
}

/// Concatenate `monitors` sections with a separator before all but the first.
pub fn fan_out(monitors: usize, mut section: impl FnMut(usize) -> String) -> String {
    let mut line = String::new();
    for monitor in 0..monitors {
        if monitor != 0 {
            line.push_str(MONITOR_SEPARATOR);
        }
        line.push_str(&section(monitor));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::WidgetValue;

    fn snapshot() -> Snapshot {
        [
            ("clock", WidgetValue::text("12:00")),
            ("vol", WidgetValue::text("50%")),
            ("empty", WidgetValue::Empty),
            (
                "net",
                WidgetValue::sequence(vec!["5↓↑2".to_string(), "3↓↑1".to_string()]),
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_scalar_substitution() {
        let template = Template::format("[$(clock)] vol $(vol)");
        assert_eq!(template.render(&snapshot()), "[12:00] vol 50%");
    }

    #[test]
    fn test_scalar_absent_and_empty() {
        let template = Template::format("a$(missing)b$(empty)c");
        assert_eq!(template.render(&snapshot()), "abc");
    }

    #[test]
    fn test_indexed_substitution() {
        let template = Template::format("$(net[0])/$(net[1])");
        assert_eq!(template.render(&snapshot()), "5↓↑2/3↓↑1");
    }

    #[test]
    fn test_indexed_out_of_range_removed() {
        let mut snap = snapshot();
        snap.insert("net", WidgetValue::sequence(vec!["5↓↑2".to_string()]));

        let template = Template::format("$(net[0])/$(net[1])");
        assert_eq!(template.render(&snap), "5↓↑2/");
    }

    #[test]
    fn test_indexed_absent_tag_removed() {
        let template = Template::format("<$(nothing[3])>");
        assert_eq!(template.render(&snapshot()), "<>");
    }

    #[test]
    fn test_indexed_huge_index_removed() {
        let template = Template::format("<$(net[99999999999999999999999])>");
        assert_eq!(template.render(&snapshot()), "<>");
    }

    #[test]
    fn test_scalar_on_text_indexed_as_single_item() {
        let template = Template::format("$(clock[0])|$(clock[1])");
        assert_eq!(template.render(&snapshot()), "12:00|");
    }

    #[test]
    fn test_mixed_forms_same_tag() {
        let template = Template::format("$(net) = $(net[0]) + $(net[1])");
        assert_eq!(template.render(&snapshot()), "5↓↑23↓↑1 = 5↓↑2 + 3↓↑1");
    }

    #[test]
    fn test_render_idempotent() {
        let template = Template::format("$(clock) $(net[1]) $(vol) $(net)");
        let snap = snapshot();
        assert_eq!(template.render(&snap), template.render(&snap));
    }

    #[test]
    fn test_no_placeholder_survives() {
        let template = Template::format("$(a)$(b[0])$(clock)$(net[7])");
        assert!(!template.render(&snapshot()).contains("$("));
    }

    #[test]
    fn test_per_monitor_fan_out() {
        let template = Template::per_monitor(2, |snap, m| {
            format!("{}:{}", m, snap.item("net", m).unwrap_or_default())
        });
        assert_eq!(template.render(&snapshot()), "0:5↓↑2%{S+}1:3↓↑1");
    }

    #[test]
    fn test_per_monitor_zero_treated_as_one() {
        let template = Template::per_monitor(0, |_, m| format!("m{m}"));
        assert_eq!(template.render(&Snapshot::new()), "m0");
    }

    #[test]
    fn test_fan_out_single_has_no_separator() {
        assert_eq!(fan_out(1, |_| "x".to_string()), "x");
        assert_eq!(fan_out(3, |m| m.to_string()), "0%{S+}1%{S+}2");
    }
}
