//! Layout module: the built-in bar layout, fixed once at startup.
//!
//! The monitor count is read when the layout is built and never again;
//! hot-plugged monitors need a restart.
//!
//! Each monitor shows the same sections:
//!
//! ```text
//! %{l}<desktops of monitor m>%{c}<title>%{r}<net> | <batt> | <vol> | <clock>
//! ```

mod monitors;

pub use monitors::{count_connected, detect_monitors};

use crate::template::{fan_out, Snapshot, Template};

/// Tag of the bspwm desktop widget.
pub const BSPWM: &str = "bspc";
/// Tag of the window title widget.
pub const TITLE: &str = "title";
/// Tag of the network widget.
pub const NETWORK: &str = "net";
/// Tag of the battery widget.
pub const BATTERY: &str = "batt";
/// Tag of the volume widget.
pub const VOLUME: &str = "vol";
/// Tag of the clock widget.
pub const CLOCK: &str = "sys";

/// One monitor's section of the built-in layout.
pub fn monitor_section(values: &Snapshot, monitor: usize) -> String {
    format!(
        "%{{l}}{}%{{c}}{}%{{r}}{} | {} | {} | {}",
        values.item(BSPWM, monitor).unwrap_or_default(),
        values.text(TITLE),
        values.text(NETWORK),
        values.text(BATTERY),
        values.text(VOLUME),
        values.text(CLOCK),
    )
}

/// The built-in layout as a per-monitor template.
pub fn bar_layout(monitors: usize) -> Template {
    Template::per_monitor(monitors, monitor_section)
}

/// The built-in layout spelled as a format string, for `monitors` monitors.
pub fn bar_format(monitors: usize) -> String {
    fan_out(monitors.max(1), |m| {
        format!(
            "%{{l}}$({BSPWM}[{m}])%{{c}}$({TITLE})%{{r}}$({NETWORK}) | $({BATTERY}) | $({VOLUME}) | $({CLOCK})"
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::WidgetValue;

    fn values() -> Snapshot {
        let mut values = Snapshot::new();
        values.insert(
            BSPWM,
            WidgetValue::sequence(vec!["D0".to_string(), "D1".to_string()]),
        );
        values.insert(TITLE, WidgetValue::text("vim"));
        values.insert(NETWORK, WidgetValue::text("2↓↑1"));
        values.insert(BATTERY, WidgetValue::text("87-"));
        values.insert(VOLUME, WidgetValue::text("50%"));
        values.insert(CLOCK, WidgetValue::text("05 Mar 09:07"));
        values
    }

    #[test]
    fn test_single_monitor() {
        assert_eq!(
            bar_layout(1).render(&values()),
            "%{l}D0%{c}vim%{r}2↓↑1 | 87- | 50% | 05 Mar 09:07"
        );
    }

    #[test]
    fn test_two_monitors_fan_out() {
        let line = bar_layout(2).render(&values());
        let sections: Vec<&str> = line.split("%{S+}").collect();

        assert_eq!(sections.len(), 2);
        assert!(sections[0].starts_with("%{l}D0%{c}"));
        assert!(sections[1].starts_with("%{l}D1%{c}"));
    }

    #[test]
    fn test_missing_monitor_desktops_blank() {
        let line = bar_layout(3).render(&values());
        assert!(line.ends_with("%{S+}%{l}%{c}vim%{r}2↓↑1 | 87- | 50% | 05 Mar 09:07"));
    }

    #[test]
    fn test_format_string_matches_function() {
        for monitors in 1..=3 {
            let format = Template::format(bar_format(monitors));
            assert_eq!(
                format.render(&values()),
                bar_layout(monitors).render(&values())
            );
        }
    }

    #[test]
    fn test_empty_values() {
        assert_eq!(
            bar_layout(1).render(&Snapshot::new()),
            "%{l}%{c}%{r} |  |  | "
        );
    }
}
