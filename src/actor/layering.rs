//! Window layering fixup.
//!
//! With several monitors lemonbar windows sometimes end up stacked wrongly,
//! which breaks clickable areas and fullscreen windows. Shortly after start
//! every panel window is pushed below and then above each root window.

use crate::error::BarError;
use crate::process::CommandSpec;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

/// Delay before restacking.
pub const LAYER_DELAY: Duration = Duration::from_secs(1);

/// Window ids, one per non-blank line.
pub fn window_ids(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// `xdo below` for every (panel, root) pair, then `xdo above` for every pair.
pub fn stacking_commands(panels: &[String], roots: &[String]) -> Vec<CommandSpec> {
    ["below", "above"]
        .into_iter()
        .flat_map(|direction| {
            panels.iter().flat_map(move |panel| {
                roots.iter().map(move |root| {
                    CommandSpec::new("xdo").args([direction, "-t", root.as_str(), panel.as_str()])
                })
            })
        })
        .collect()
}

/// Query window ids with `xdo id <args>`. Failures yield no ids.
fn query(args: &[&str]) -> Vec<String> {
    let spec = CommandSpec::new("xdo").arg("id").args(args.iter().copied());
    match spec.output_text() {
        Ok(text) => window_ids(&text),
        Err(e) => {
            debug!(command = %spec, error = %e, "window query failed");
            Vec::new()
        }
    }
}

/// Restack every window named `wm_name` around the root windows.
///
/// Returns how many commands succeeded. Failures are logged and ignored.
pub fn restack(wm_name: &str) -> usize {
    let panels = query(&["-a", wm_name]);
    let roots = query(&["-n", "root"]);

    stacking_commands(&panels, &roots)
        .iter()
        .filter(|command| match command.output_text() {
            Ok(_) => true,
            Err(e) => {
                debug!(command = %command, error = %e, "restack failed");
                false
            }
        })
        .count()
}

/// Run [`restack`] once on a background thread after `delay`.
pub fn spawn(wm_name: impl Into<String>, delay: Duration) -> Result<JoinHandle<usize>, BarError> {
    let wm_name = wm_name.into();
    thread::Builder::new()
        .name("layering".to_string())
        .spawn(move || {
            thread::sleep(delay);
            let applied = restack(&wm_name);
            debug!(wm_name, applied, "layering applied");
            applied
        })
        .map_err(|e| BarError::thread("layering", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_window_ids() {
        assert_eq!(window_ids("0x1\n\n 0x2 \n"), ["0x1", "0x2"]);
        assert!(window_ids("").is_empty());
    }

    #[test]
    fn test_below_before_above() {
        let commands: Vec<String> = stacking_commands(&ids(&["p1", "p2"]), &ids(&["r"]))
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(
            commands,
            [
                "xdo below -t r p1",
                "xdo below -t r p2",
                "xdo above -t r p1",
                "xdo above -t r p2",
            ]
        );
    }

    #[test]
    fn test_no_windows_no_commands() {
        assert!(stacking_commands(&[], &ids(&["r"])).is_empty());
        assert!(stacking_commands(&ids(&["p"]), &[]).is_empty());
    }
}
