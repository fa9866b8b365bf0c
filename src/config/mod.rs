//! Bar configuration: renderer settings and the colour palette.
//!
//! The colour file is mandatory. Everything else has a default that matches
//! a stock bspwm setup.

mod palette;

pub use palette::{Palette, RESET_COLOUR};

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default `WM_NAME` given to the bar window.
pub const DEFAULT_WM_NAME: &str = "bspwm-panel";
/// Default bar height in pixels.
pub const DEFAULT_BAR_HEIGHT: u32 = 16;
/// Default font handed to the renderer.
pub const DEFAULT_BAR_FONT: &str = "Kochi Gothic,東風ゴシック:style=Regular:size=9";

/// Configuration errors. All of these are fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No colour file was given.
    #[error("a colour file must be specified")]
    MissingColourFile,

    /// The colour file could not be read.
    #[error("failed to read colour file {}: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The colour file is not a flat JSON object of strings.
    #[error("invalid colour file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Renderer settings plus the loaded palette.
#[derive(Debug, Clone)]
pub struct BarConfig {
    /// `WM_NAME` of the bar window, also used to find it for layering.
    pub wm_name: String,
    /// Bar height in pixels.
    pub bar_height: u32,
    /// Font specification passed to the renderer.
    pub bar_font: String,
    /// Colours referenced by widgets.
    pub palette: Palette,
}

impl BarConfig {
    /// Start building a configuration.
    pub fn builder() -> BarConfigBuilder {
        BarConfigBuilder::default()
    }

    /// Configuration with default settings and the given palette.
    pub fn with_palette(palette: Palette) -> Self {
        Self {
            wm_name: DEFAULT_WM_NAME.to_string(),
            bar_height: DEFAULT_BAR_HEIGHT,
            bar_font: DEFAULT_BAR_FONT.to_string(),
            palette,
        }
    }
}

/// Builder for [`BarConfig`]. Unset options keep their defaults.
#[derive(Debug, Clone, Default)]
pub struct BarConfigBuilder {
    wm_name: Option<String>,
    bar_height: Option<u32>,
    bar_font: Option<String>,
    colour_file: Option<PathBuf>,
}

impl BarConfigBuilder {
    /// Set the bar window name.
    #[must_use]
    pub fn wm_name(mut self, name: impl Into<String>) -> Self {
        self.wm_name = Some(name.into());
        self
    }

    /// Set the bar height.
    #[must_use]
    pub const fn bar_height(mut self, height: u32) -> Self {
        self.bar_height = Some(height);
        self
    }

    /// Set the bar font.
    #[must_use]
    pub fn bar_font(mut self, font: impl Into<String>) -> Self {
        self.bar_font = Some(font.into());
        self
    }

    /// Set the colour file path (required).
    #[must_use]
    pub fn colour_file(mut self, path: impl AsRef<Path>) -> Self {
        self.colour_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Load the palette and produce the final configuration.
    pub fn build(self) -> Result<BarConfig, ConfigError> {
        let path = self.colour_file.ok_or(ConfigError::MissingColourFile)?;
        let palette = Palette::load(&path)?;

        let mut config = BarConfig::with_palette(palette);
        if let Some(name) = self.wm_name {
            config.wm_name = name;
        }
        if let Some(height) = self.bar_height {
            config.bar_height = height;
        }
        if let Some(font) = self.bar_font {
            config.bar_font = font;
        }
        Ok(config)
    }
}
