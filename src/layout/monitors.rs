//! Monitor detection through `xrandr -q`.

use crate::process::CommandSpec;
use tracing::warn;

/// Count ` connected` outputs in `xrandr -q` text. Never less than one.
pub fn count_connected(xrandr: &str) -> usize {
    xrandr.matches(" connected").count().max(1)
}

/// Ask `xrandr` how many monitors are connected.
///
/// Falls back to one monitor if `xrandr` cannot be run.
pub fn detect_monitors() -> usize {
    let xrandr = CommandSpec::new("xrandr").arg("-q");
    match xrandr.output_text() {
        Ok(text) => count_connected(&text),
        Err(e) => {
            warn!(command = %xrandr, error = %e, "monitor detection failed, assuming one");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XRANDR: &str = "\
Screen 0: minimum 8 x 8, current 3840 x 1080, maximum 16384 x 16384
eDP-1 connected primary 1920x1080+0+0 (normal left inverted right x axis y axis) 309mm x 174mm
   1920x1080     60.02*+
HDMI-1 disconnected (normal left inverted right x axis y axis)
DP-1 connected 1920x1080+1920+0 (normal left inverted right x axis y axis) 527mm x 296mm
";

    #[test]
    fn test_count_ignores_disconnected() {
        assert_eq!(count_connected(XRANDR), 2);
    }

    #[test]
    fn test_count_at_least_one() {
        assert_eq!(count_connected(""), 1);
        assert_eq!(count_connected("HDMI-1 disconnected"), 1);
    }
}
