//! Line streams from long-running external commands.

use super::WidgetError;
use crate::process::CommandSpec;
use std::io::{BufRead, BufReader};
use std::process::Stdio;
use tracing::debug;

/// Spawn `command` and call `on_line` for every line it prints.
///
/// Returns [`WidgetError::StreamClosed`] when the command closes its
/// output, or `Ok` if `keep_going` asked to stop first.
pub(crate) fn for_each_line<F>(
    command: &CommandSpec,
    mut keep_going: impl FnMut() -> bool,
    mut on_line: F,
) -> Result<(), WidgetError>
where
    F: FnMut(&str),
{
    let mut child = command
        .command()
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| WidgetError::Command {
            command: command.to_string(),
            source,
        })?;

    let Some(stdout) = child.stdout.take() else {
        return Err(WidgetError::StreamClosed(command.to_string()));
    };
    debug!(command = %command, pid = child.id(), "stream started");

    for line in BufReader::new(stdout).lines() {
        if !keep_going() {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(());
        }
        match line {
            Ok(line) => on_line(&line),
            Err(e) => {
                // Invalid UTF-8 in one line should not end the stream.
                debug!(command = %command, error = %e, "skipping unreadable line");
            }
        }
    }

    let _ = child.wait();
    Err(WidgetError::StreamClosed(command.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_for_each_line_collects() {
        let command = CommandSpec::new("printf").arg("one\\ntwo\\n");
        let mut lines = Vec::new();

        let result = for_each_line(&command, || true, |line| lines.push(line.to_string()));

        assert!(matches!(result, Err(WidgetError::StreamClosed(_))));
        assert_eq!(lines, ["one", "two"]);
    }

    #[test]
    fn test_for_each_line_missing_program() {
        let command = CommandSpec::new("definitely-not-a-real-program-xyz");
        let result = for_each_line(&command, || true, |_| {});
        assert!(matches!(result, Err(WidgetError::Command { .. })));
    }

    #[test]
    fn test_for_each_line_stops_when_asked() {
        let command = CommandSpec::new("printf").arg("a\\nb\\nc\\n");
        let seen = Cell::new(0);
        let result = for_each_line(&command, || seen.get() < 1, |_| seen.set(seen.get() + 1));
        assert!(result.is_ok());
        assert_eq!(seen.get(), 1);
    }
}
