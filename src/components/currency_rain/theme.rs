//! Visual theming for the glyph overlay.
//!
//! A theme fixes the glyph, its metallic gradient, and the two glow layers.
//! Per-entity opacity is applied on top at paint time.

use super::types::DepthBand;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha, 0.0 to 1.0.
	pub a: f64,
}

impl Color {
	/// Opaque color from channel values.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Same color with alpha clamped into 0.0 to 1.0.
	pub fn with_alpha(self, a: f64) -> Self {
		Self {
			a: a.clamp(0.0, 1.0),
			..self
		}
	}

	/// CSS `rgba()` notation. Alpha is always emitted so fades stay visible.
	pub fn to_css(self) -> String {
		format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// One stop of the glyph's diagonal gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
	/// Position along the gradient, 0.0 to 1.0.
	pub offset: f32,
	/// Stop color.
	pub color: Color,
}

impl GradientStop {
	/// Stop at `offset` with `color`.
	pub const fn new(offset: f32, color: Color) -> Self {
		Self { offset, color }
	}
}

/// Complete visual theme for the falling glyphs.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphTheme {
	/// Name the theme is looked up by.
	pub name: &'static str,
	/// Text drawn for each entity.
	pub glyph: String,
	/// CSS font family list for the glyph.
	pub font_family: &'static str,
	/// Diagonal fill gradient, at full opacity.
	pub gradient: [GradientStop; 5],
	/// Base glow tint; alpha follows the entity.
	pub glow_color: Color,
	/// Highlight glow tint; alpha is half the entity's.
	pub highlight_color: Color,
	/// Glow blur per band, far to near.
	pub glow_blur: [f64; 3],
	/// Highlight blur relative to the base glow.
	pub highlight_spread: f64,
	/// Highlight alpha relative to the entity's opacity.
	pub highlight_weight: f64,
}

impl GlyphTheme {
	/// Bright gold rupee (default).
	pub fn gold() -> Self {
		Self {
			name: "gold",
			glyph: "\u{20b9}".to_string(),
			font_family: "'Inter', sans-serif",
			gradient: [
				GradientStop::new(0.0, Color::rgb(255, 223, 0)),   // Yellow gold
				GradientStop::new(0.3, Color::rgb(255, 200, 50)),  // Golden
				GradientStop::new(0.5, Color::rgb(255, 255, 150)), // Shine
				GradientStop::new(0.7, Color::rgb(255, 180, 0)),   // Deep gold
				GradientStop::new(1.0, Color::rgb(218, 165, 32)),  // Goldenrod
			],
			glow_color: Color::rgb(255, 215, 0),
			highlight_color: Color::rgb(255, 255, 200),
			glow_blur: [15.0, 25.0, 35.0],
			highlight_spread: 1.5,
			highlight_weight: 0.5,
		}
	}

	/// Cooler brushed-silver variant.
	pub fn silver() -> Self {
		Self {
			name: "silver",
			glyph: "\u{20b9}".to_string(),
			font_family: "'Inter', sans-serif",
			gradient: [
				GradientStop::new(0.0, Color::rgb(235, 238, 242)), // Platinum
				GradientStop::new(0.3, Color::rgb(200, 205, 212)), // Silver
				GradientStop::new(0.5, Color::rgb(255, 255, 255)), // Shine
				GradientStop::new(0.7, Color::rgb(170, 176, 186)), // Pewter
				GradientStop::new(1.0, Color::rgb(140, 146, 158)), // Gunmetal
			],
			glow_color: Color::rgb(210, 220, 235),
			highlight_color: Color::rgb(245, 250, 255),
			glow_blur: [12.0, 20.0, 28.0],
			highlight_spread: 1.5,
			highlight_weight: 0.5,
		}
	}

	/// Look a theme up by name, falling back to gold.
	pub fn by_name(name: &str) -> Self {
		match name {
			"silver" => Self::silver(),
			_ => Self::gold(),
		}
	}

	/// Replace the glyph, keeping the rest of the theme.
	pub fn with_glyph(self, glyph: impl Into<String>) -> Self {
		Self {
			glyph: glyph.into(),
			..self
		}
	}

	/// Base glow blur radius for `band`.
	pub fn glow_blur(&self, band: DepthBand) -> f64 {
		self.glow_blur[band.index()]
	}
}

impl Default for GlyphTheme {
	fn default() -> Self {
		Self::gold()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn css_always_carries_alpha() {
		assert_eq!(Color::rgb(255, 215, 0).to_css(), "rgba(255, 215, 0, 1)");
		assert_eq!(
			Color::rgb(255, 255, 200).with_alpha(0.25).to_css(),
			"rgba(255, 255, 200, 0.25)"
		);
	}

	#[test]
	fn alpha_is_clamped() {
		assert_eq!(Color::rgb(1, 2, 3).with_alpha(1.7).a, 1.0);
		assert_eq!(Color::rgb(1, 2, 3).with_alpha(-0.2).a, 0.0);
	}

	#[test]
	fn nearer_bands_glow_stronger() {
		let theme = GlyphTheme::gold();
		assert!(theme.glow_blur(DepthBand::Far) < theme.glow_blur(DepthBand::Mid));
		assert!(theme.glow_blur(DepthBand::Mid) < theme.glow_blur(DepthBand::Near));
		assert_eq!(theme.glow_blur(DepthBand::Near), 35.0);
	}

	#[test]
	fn unknown_theme_falls_back_to_gold() {
		assert_eq!(GlyphTheme::by_name("neon").name, "gold");
		assert_eq!(GlyphTheme::by_name("silver").name, "silver");
	}
}
