//! Active window title, streamed from `xtitle`.

use super::stream::for_each_line;
use super::{WidgetError, WidgetHandle, WidgetValue};
use crate::process::CommandSpec;
use std::borrow::Cow;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ELLIPSIS: &str = "…";

/// Truncate `text` to at most `max_width` display columns.
///
/// Cuts on grapheme boundaries and marks the cut with an ellipsis, which
/// counts toward the width.
pub fn truncate_to_width(text: &str, max_width: usize) -> Cow<'_, str> {
    if text.width() <= max_width {
        return Cow::Borrowed(text);
    }
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    let budget = max_width - ELLIPSIS.width();
    let mut used = 0;
    let mut out = String::with_capacity(text.len());
    for grapheme in text.graphemes(true) {
        let width = grapheme.width();
        if used + width > budget {
            break;
        }
        used += width;
        out.push_str(grapheme);
    }
    out.push_str(ELLIPSIS);
    Cow::Owned(out)
}

/// Title of the focused window. Event-driven: one update per line.
#[derive(Debug, Clone)]
pub struct TitleWidget {
    source: CommandSpec,
    max_width: Option<usize>,
}

impl TitleWidget {
    /// Titles from `xtitle -s -t 150`.
    pub fn new() -> Self {
        Self::with_source(CommandSpec::new("xtitle").args(["-s", "-t", "150"]))
    }

    /// Titles from any command printing one title per line.
    pub const fn with_source(source: CommandSpec) -> Self {
        Self {
            source,
            max_width: None,
        }
    }

    /// Truncate titles wider than `columns`.
    #[must_use]
    pub const fn with_max_width(mut self, columns: usize) -> Self {
        self.max_width = Some(columns);
        self
    }

    fn clip<'a>(&self, title: &'a str) -> Cow<'a, str> {
        match self.max_width {
            Some(max) => truncate_to_width(title, max),
            None => Cow::Borrowed(title),
        }
    }

    pub(crate) fn run(&self, handle: &WidgetHandle) -> Result<(), WidgetError> {
        for_each_line(
            &self.source,
            || handle.is_running(),
            |line| {
                let title = self.clip(line.trim_end_matches(['\r', '\n']));
                handle.update(WidgetValue::Text(handle.painter().system(&title, None)));
            },
        )
    }
}

impl Default for TitleWidget {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::handle::test_handle;

    #[test]
    fn test_truncate_fits() {
        assert!(matches!(truncate_to_width("vim", 10), Cow::Borrowed("vim")));
    }

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_to_width("hello world", 6), "hello…");
    }

    #[test]
    fn test_truncate_wide_chars() {
        // Each CJK character is two columns wide.
        assert_eq!(truncate_to_width("東風ゴシック", 6), "東風…");
    }

    #[test]
    fn test_truncate_zero() {
        assert_eq!(truncate_to_width("anything", 0), "");
    }

    #[test]
    fn test_run_keeps_trailing_spaces() {
        let widget =
            TitleWidget::with_source(CommandSpec::new("printf").arg("first\\r\\nvim  \\n"));
        let (handle, rx, _running) = test_handle("title");

        let result = widget.run(&handle);

        assert!(matches!(result, Err(WidgetError::StreamClosed(_))));
        assert_eq!(rx.try_iter().count(), 2);
        assert_eq!(
            handle.read(),
            WidgetValue::text("%{F-}%{B-} vim   %{B-}%{F-}")
        );
    }

    #[test]
    fn test_clip_respects_setting() {
        let widget = TitleWidget::new().with_max_width(4);
        assert_eq!(widget.clip("firefox"), "fir…");
        assert_eq!(TitleWidget::new().clip("firefox"), "firefox");
    }
}
