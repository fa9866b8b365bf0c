//! Lemonbar markup generation.
//!
//! Widgets wrap their text in colour tags and, optionally, a clickable
//! action region. The action command is whatever the click shell should run.
//!
//! ```text
//! %{F#fff}%{B#000}%{A:bspc desktop -f ^2:} II %{A}%{B-}%{F-}
//! ```

use crate::config::Palette;
use std::borrow::Cow;
use std::sync::Arc;

/// Token placed between per-monitor sections of a line.
pub const MONITOR_SEPARATOR: &str = "%{S+}";

/// Palette key for the default widget foreground.
pub const SYS_FG: &str = "SYS_FG";
/// Palette key for the default widget background.
pub const SYS_BG: &str = "SYS_BG";

/// Escape text so `%` is shown literally instead of starting a tag.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    if text.contains('%') {
        Cow::Owned(text.replace('%', "%%"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Escape an action command so `:` does not close the action tag early.
pub fn escape_command(command: &str) -> Cow<'_, str> {
    if command.contains(':') {
        Cow::Owned(command.replace(':', "\\:"))
    } else {
        Cow::Borrowed(command)
    }
}

/// Wrap `data` in foreground/background tags and an optional click action.
pub fn markup(data: &str, fg: &str, bg: &str, click: Option<&str>) -> String {
    let data = escape_text(data);
    match click {
        Some(command) => format!(
            "%{{F{fg}}}%{{B{bg}}}%{{A:{}:}} {data} %{{A}}%{{B-}}%{{F-}}",
            escape_command(command)
        ),
        None => format!("%{{F{fg}}}%{{B{bg}}} {data} %{{B-}}%{{F-}}"),
    }
}

/// Produces markup using symbolic colour names from a shared [`Palette`].
///
/// Every widget gets a clone; the palette itself is never copied.
#[derive(Debug, Clone, Default)]
pub struct Painter {
    palette: Arc<Palette>,
}

impl Painter {
    /// Create a painter over a palette.
    pub const fn new(palette: Arc<Palette>) -> Self {
        Self { palette }
    }

    /// Resolve a colour name.
    pub fn colour(&self, name: &str) -> &str {
        self.palette.colour(name)
    }

    /// Markup with named foreground and background colours.
    pub fn paint(&self, data: &str, fg: &str, bg: &str, click: Option<&str>) -> String {
        markup(data, self.colour(fg), self.colour(bg), click)
    }

    /// Markup with the default `SYS_FG`/`SYS_BG` pair.
    pub fn system(&self, data: &str, click: Option<&str>) -> String {
        self.paint(data, SYS_FG, SYS_BG, click)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_plain() {
        assert_eq!(
            markup("12:00", "#fff", "#000", None),
            "%{F#fff}%{B#000} 12:00 %{B-}%{F-}"
        );
    }

    #[test]
    fn test_markup_clickable() {
        assert_eq!(
            markup("II", "#fff", "#000", Some("bspc desktop -f ^2")),
            "%{F#fff}%{B#000}%{A:bspc desktop -f ^2:} II %{A}%{B-}%{F-}"
        );
    }

    #[test]
    fn test_markup_escapes() {
        assert_eq!(
            markup("50%", "a", "b", Some("notify-send a:b")),
            "%{Fa}%{Bb}%{A:notify-send a\\:b:} 50%% %{A}%{B-}%{F-}"
        );
    }

    #[test]
    fn test_escape_borrows_when_clean() {
        assert!(matches!(escape_text("plain"), Cow::Borrowed(_)));
        assert!(matches!(escape_command("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_painter_missing_colour_resets() {
        let painter = Painter::new(Arc::new(Palette::from_pairs([(SYS_FG, "#abc")])));
        assert_eq!(painter.system("x", None), "%{F#abc}%{B-} x %{B-}%{F-}");
    }
}
