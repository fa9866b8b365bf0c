//! Palette: symbolic colour names loaded from the colour file.

use super::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Colour used when a palette key is missing. `-` resets the renderer
/// to its default colour.
pub const RESET_COLOUR: &str = "-";

/// Flat mapping of case-sensitive colour names to colour strings.
///
/// ```json
/// { "SYS_FG": "#FFc5c8c6", "SYS_BG": "#FF1d1f21", "URGENT_FG": "#FFcc6666" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    colours: HashMap<String, String>,
}

impl Palette {
    /// Build a palette from `(name, colour)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            colours: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parse a palette from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a palette from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Look up a colour by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.colours.get(name).map(String::as_str)
    }

    /// Look up a colour, falling back to [`RESET_COLOUR`].
    pub fn colour(&self, name: &str) -> &str {
        self.get(name).unwrap_or(RESET_COLOUR)
    }

    /// Number of colours defined.
    pub fn len(&self) -> usize {
        self.colours.len()
    }

    /// Whether no colours are defined.
    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }
}
