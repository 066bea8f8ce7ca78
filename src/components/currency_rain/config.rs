//! Page-level configuration for the overlay.

use serde::Deserialize;

use super::population::DEFAULT_PARTICLE_COUNT;
use super::theme::GlyphTheme;

/// Overlay settings, typically embedded in the page as JSON.
///
/// Every field is optional; missing fields take their defaults.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RainConfig {
	/// Master switch. Reduced-motion preferences still win.
	pub enabled: bool,
	/// Base population before device-tier scaling.
	pub particle_count: usize,
	/// Theme name: `"gold"` or `"silver"`.
	pub theme: String,
	/// Glyph override, e.g. `"$"` or `"€"`.
	pub glyph: Option<String>,
	/// Fixed RNG seed for reproducible layouts.
	pub seed: Option<u64>,
}

impl Default for RainConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			particle_count: DEFAULT_PARTICLE_COUNT,
			theme: "gold".to_string(),
			glyph: None,
			seed: None,
		}
	}
}

impl RainConfig {
	/// Parse a JSON object; unknown fields are ignored.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}

	/// Resolve the configured theme, applying any glyph override.
	pub fn glyph_theme(&self) -> GlyphTheme {
		let theme = GlyphTheme::by_name(&self.theme);
		match &self.glyph {
			Some(glyph) if !glyph.is_empty() => theme.with_glyph(glyph.clone()),
			_ => theme,
		}
	}
}
