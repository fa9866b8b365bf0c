//! bspwm monitor/desktop state from `bspc subscribe report`.
//!
//! A report is one line covering every monitor:
//!
//! ```text
//! WmHDMI-0:oI:fII:LT:MeDP-1:OIII:uIV:LT:TT:G
//! ```
//!
//! Fields are separated by `:`. A field starting with `m`/`M` opens a new
//! monitor (unfocused/focused). `f F o O u U` are desktops (free, occupied,
//! urgent; uppercase when focused), `L T G` are layout and state markers.
//!
//! Desktops are numbered from 1 across *all* monitors, which is what
//! `bspc desktop -f ^N` expects.

use super::stream::for_each_line;
use super::{WidgetError, WidgetHandle, WidgetValue};
use crate::markup::Painter;
use crate::process::CommandSpec;
use bitflags::bitflags;

bitflags! {
    /// State of one desktop.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DesktopState: u8 {
        /// Desktop is focused.
        const FOCUSED  = 0b0000_0001;
        /// Desktop holds windows.
        const OCCUPIED = 0b0000_0010;
        /// A window on the desktop demands attention.
        const URGENT   = 0b0000_0100;
    }
}

impl DesktopState {
    /// Decode a desktop marker character.
    pub const fn from_marker(marker: char) -> Option<Self> {
        Some(match marker {
            'f' => Self::empty(),
            'F' => Self::FOCUSED,
            'o' => Self::OCCUPIED,
            'O' => Self::FOCUSED.union(Self::OCCUPIED),
            'u' => Self::URGENT,
            'U' => Self::FOCUSED.union(Self::URGENT),
            _ => return None,
        })
    }

    /// Palette keys for `(foreground, background)`.
    pub fn colour_keys(self) -> (&'static str, &'static str) {
        let focused = self.contains(Self::FOCUSED);
        if self.contains(Self::URGENT) {
            if focused {
                ("FOCUSED_URGENT_FG", "FOCUSED_URGENT_BG")
            } else {
                ("URGENT_FG", "URGENT_BG")
            }
        } else if self.contains(Self::OCCUPIED) {
            if focused {
                ("FOCUSED_OCCUPIED_FG", "FOCUSED_OCCUPIED_BG")
            } else {
                ("OCCUPIED_FG", "OCCUPIED_BG")
            }
        } else if focused {
            ("FOCUSED_FREE_FG", "FOCUSED_FREE_BG")
        } else {
            ("FREE_FG", "FREE_BG")
        }
    }
}

/// One non-monitor field of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportItem {
    /// A desktop and its global 1-based index.
    Desktop {
        /// Desktop name.
        name: String,
        /// Focus/occupancy/urgency.
        state: DesktopState,
        /// Position across all monitors, starting at 1.
        index: usize,
    },
    /// Layout (`L`), tiling state (`T`) or flags (`G`).
    State {
        /// Marker character.
        marker: char,
        /// Value text.
        value: String,
    },
}

/// One monitor's section of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorReport {
    /// Monitor name.
    pub name: String,
    /// Whether this monitor has focus.
    pub focused: bool,
    /// Desktops and state markers, left to right.
    pub items: Vec<ReportItem>,
}

/// Parse a report line into monitors.
///
/// Fields before the first monitor, empty fields and unknown markers are
/// dropped. The desktop index advances once per desktop field only.
pub fn parse_report(line: &str) -> Vec<MonitorReport> {
    let line = line.trim_end();
    let line = line.strip_prefix('W').unwrap_or(line);

    let mut monitors: Vec<MonitorReport> = Vec::new();
    let mut next_index = 1;

    for field in line.split(':') {
        let mut chars = field.chars();
        let Some(marker) = chars.next() else {
            continue;
        };
        let rest = chars.as_str();

        if marker == 'm' || marker == 'M' {
            monitors.push(MonitorReport {
                name: rest.to_string(),
                focused: marker == 'M',
                items: Vec::new(),
            });
            continue;
        }

        let Some(monitor) = monitors.last_mut() else {
            continue;
        };

        if let Some(state) = DesktopState::from_marker(marker) {
            monitor.items.push(ReportItem::Desktop {
                name: rest.to_string(),
                state,
                index: next_index,
            });
            next_index += 1;
        } else if matches!(marker, 'L' | 'T' | 'G') {
            monitor.items.push(ReportItem::State {
                marker,
                value: rest.to_string(),
            });
        }
    }

    monitors
}

impl MonitorReport {
    /// Render this monitor as clickable markup.
    pub fn render(&self, painter: &Painter) -> String {
        let (fg, bg) = if self.focused {
            ("FOCUSED_MONITOR_FG", "FOCUSED_MONITOR_BG")
        } else {
            ("MONITOR_FG", "MONITOR_BG")
        };
        let focus_monitor = format!("bspc monitor -f {}", self.name);
        let mut out = painter.paint(&self.name, fg, bg, Some(&focus_monitor));

        for item in &self.items {
            match item {
                ReportItem::Desktop { name, state, index } => {
                    let (fg, bg) = state.colour_keys();
                    let focus_desktop = format!("bspc desktop -f ^{index}");
                    out.push_str(&painter.paint(name, fg, bg, Some(&focus_desktop)));
                }
                ReportItem::State { value, .. } => {
                    out.push_str(&painter.paint(value, "STATE_FG", "STATE_BG", None));
                }
            }
        }
        out
    }
}

/// Per-monitor desktop markup, one sequence item per monitor.
#[derive(Debug, Clone)]
pub struct BspwmWidget {
    source: CommandSpec,
}

impl BspwmWidget {
    /// Reports from `bspc subscribe report`.
    pub fn new() -> Self {
        Self::with_source(CommandSpec::new("bspc").args(["subscribe", "report"]))
    }

    /// Reports from any command printing one report per line.
    pub const fn with_source(source: CommandSpec) -> Self {
        Self { source }
    }

    /// Render a raw report line into one markup string per monitor.
    pub fn process(line: &str, painter: &Painter) -> Vec<String> {
        parse_report(line)
            .iter()
            .map(|monitor| monitor.render(painter))
            .collect()
    }

    pub(crate) fn run(&self, handle: &WidgetHandle) -> Result<(), WidgetError> {
        for_each_line(
            &self.source,
            || handle.is_running(),
            |line| {
                let monitors = Self::process(line, handle.painter());
                handle.update(WidgetValue::Sequence(monitors));
            },
        )
    }
}

impl Default for BspwmWidget {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Palette;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn desktop_indices(monitor: &MonitorReport) -> Vec<usize> {
        monitor
            .items
            .iter()
            .filter_map(|item| match item {
                ReportItem::Desktop { index, .. } => Some(*index),
                ReportItem::State { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_index_continues_across_monitors() {
        let monitors = parse_report("WmHDMI-0:oI:MeDP-1:OII");

        assert_eq!(monitors.len(), 2);
        assert!(!monitors[0].focused);
        assert!(monitors[1].focused);
        assert_eq!(desktop_indices(&monitors[0]), [1]);
        assert_eq!(desktop_indices(&monitors[1]), [2]);
    }

    #[test]
    fn test_state_markers_do_not_advance_index() {
        let monitors = parse_report("WMeDP-1:fI:LT:oII:TT:G:mHDMI-0:uIII:LM\n");

        assert_eq!(desktop_indices(&monitors[0]), [1, 2]);
        assert_eq!(desktop_indices(&monitors[1]), [3]);
        assert_eq!(
            monitors[0].items[1],
            ReportItem::State {
                marker: 'L',
                value: "T".to_string()
            }
        );
    }

    #[test]
    fn test_desktop_states() {
        let monitors = parse_report("WMx:fa:Fb:oc:Od:ue:Uf");
        let states: Vec<DesktopState> = monitors[0]
            .items
            .iter()
            .filter_map(|item| match item {
                ReportItem::Desktop { state, .. } => Some(*state),
                ReportItem::State { .. } => None,
            })
            .collect();

        assert_eq!(
            states,
            [
                DesktopState::empty(),
                DesktopState::FOCUSED,
                DesktopState::OCCUPIED,
                DesktopState::FOCUSED | DesktopState::OCCUPIED,
                DesktopState::URGENT,
                DesktopState::FOCUSED | DesktopState::URGENT,
            ]
        );
    }

    #[test]
    fn test_colour_keys() {
        assert_eq!(DesktopState::empty().colour_keys(), ("FREE_FG", "FREE_BG"));
        assert_eq!(
            (DesktopState::FOCUSED | DesktopState::URGENT).colour_keys(),
            ("FOCUSED_URGENT_FG", "FOCUSED_URGENT_BG")
        );
        assert_eq!(
            DesktopState::OCCUPIED.colour_keys(),
            ("OCCUPIED_FG", "OCCUPIED_BG")
        );
    }

    #[test]
    fn test_unknown_and_leading_fields_dropped() {
        let monitors = parse_report("Wxjunk:oOrphan:mA:?odd::oI");
        assert_eq!(monitors.len(), 1);
        assert_eq!(monitors[0].name, "A");
        assert_eq!(desktop_indices(&monitors[0]), [1]);
    }

    #[test]
    fn test_empty_report() {
        assert!(parse_report("W").is_empty());
        assert!(parse_report("").is_empty());
    }

    #[test]
    fn test_render_markup() {
        let painter = Painter::new(Arc::new(Palette::from_pairs([
            ("MONITOR_FG", "#m"),
            ("MONITOR_BG", "#M"),
            ("FOCUSED_MONITOR_FG", "#fm"),
            ("FOCUSED_MONITOR_BG", "#FM"),
            ("OCCUPIED_FG", "#o"),
            ("OCCUPIED_BG", "#O"),
            ("FOCUSED_OCCUPIED_FG", "#fo"),
            ("FOCUSED_OCCUPIED_BG", "#FO"),
            ("STATE_FG", "#s"),
            ("STATE_BG", "#S"),
        ])));

        let sections = BspwmWidget::process("WmHDMI-0:oI:LT:MeDP-1:OII", &painter);

        assert_eq!(sections.len(), 2);
        assert_eq!(
            sections[0],
            "%{F#m}%{B#M}%{A:bspc monitor -f HDMI-0:} HDMI-0 %{A}%{B-}%{F-}\
             %{F#o}%{B#O}%{A:bspc desktop -f ^1:} I %{A}%{B-}%{F-}\
             %{F#s}%{B#S} T %{B-}%{F-}"
        );
        assert_eq!(
            sections[1],
            "%{F#fm}%{B#FM}%{A:bspc monitor -f eDP-1:} eDP-1 %{A}%{B-}%{F-}\
             %{F#fo}%{B#FO}%{A:bspc desktop -f ^2:} II %{A}%{B-}%{F-}"
        );
    }

    #[test]
    fn test_reports_render_through_compositor() {
        let source = CommandSpec::new("printf").arg("WmA:oI:MB:OII\\n");
        let (line_tx, lines) = crossbeam_channel::unbounded::<String>();
        let bar = crate::Compositor::new(crate::Template::format("$(b[0])|$(b[1])"), Painter::default())
            .with_widget("b", BspwmWidget::with_source(source))
            .unwrap()
            .run(line_tx)
            .unwrap();

        let sections = BspwmWidget::process("WmA:oI:MB:OII", &Painter::default());
        let line = lines.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(line, format!("{}|{}", sections[0], sections[1]));
        let (first, second) = line.split_once('|').unwrap();
        assert!(first.contains("%{A:bspc desktop -f ^1:} I %{A}"));
        assert!(second.contains("%{A:bspc desktop -f ^2:} II %{A}"));

        // printf exits after one report; the desktops stay on the bar.
        let deadline = Instant::now() + Duration::from_secs(5);
        while bar.stopped_widgets() != ["b"] {
            assert!(Instant::now() < deadline, "widget never stopped");
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(bar.read("b"), Some(WidgetValue::Sequence(sections)));
        bar.shutdown();
    }
}
