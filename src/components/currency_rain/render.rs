//! Surface rendering for the glyph overlay.
//!
//! The renderer is split in two. [`Renderer`] decides what to draw: it clears
//! the frame, orders entities back-to-front by depth band and resolves each
//! one into a [`GlyphPaint`]. A [`Surface`] implementation performs the actual
//! raster calls (the browser canvas, or a recorder in tests).

use std::fmt::Write;

use super::theme::{Color, GlyphTheme, GradientStop};
use super::types::{Entity, Viewport};

/// Shadow-style glow layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
	/// Shadow blur radius in logical px.
	pub blur: f64,
	/// Shadow tint, alpha included.
	pub color: Color,
}

/// Everything needed to paint one glyph in its local frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphPaint<'a> {
	/// Text to draw.
	pub glyph: &'a str,
	/// CSS font family list; combine with `size` through [`write_font`].
	pub font_family: &'a str,
	/// Glyph center, logical px.
	pub x: f64,
	/// Glyph center, logical px.
	pub y: f64,
	/// Rotation about the center in radians.
	pub rotation: f64,
	/// Font size in logical px.
	pub size: f64,
	/// Gradient with each stop's alpha bound to the entity's opacity.
	pub gradient: [GradientStop; 5],
	/// Base glow pass.
	pub glow: Glow,
	/// Wider, paler second glow pass.
	pub highlight: Glow,
}

/// Write the CSS font shorthand for a glyph into `buf`, reusing its allocation.
pub fn write_font(buf: &mut String, size: f64, family: &str) {
	buf.clear();
	let _ = write!(buf, "bold {size}px {family}");
}

/// A raster target the overlay can draw on, in logical coordinates.
pub trait Surface {
	/// Set the backing store to `backing` device pixels and the displayed
	/// size to `logical` pixels.
	fn set_size(&mut self, backing: (u32, u32), logical: (f64, f64));

	/// Replace the current drawing transform with `transform`.
	fn set_transform(&mut self, transform: [f64; 6]);

	/// Clear the logical region `[0, width] x [0, height]`.
	fn clear(&mut self, width: f64, height: f64);

	/// Paint one glyph: base glow pass, then the highlight glow pass.
	fn draw_glyph(&mut self, paint: &GlyphPaint<'_>);

	/// Size the backing store for `viewport` and reset the drawing transform
	/// so one unit equals one logical pixel.
	fn resize(&mut self, viewport: Viewport) {
		self.set_size(viewport.backing_size(), viewport.logical_size());
		self.set_transform(viewport.device_transform());
	}
}

/// Resolves a population into depth-ordered glyph paints.
pub struct Renderer {
	theme: GlyphTheme,
	order: Vec<usize>,
}

impl Renderer {
	/// Renderer painting with `theme`.
	pub fn new(theme: GlyphTheme) -> Self {
		Self {
			theme,
			order: Vec::new(),
		}
	}

	/// Draw one full frame.
	pub fn render<S: Surface>(&mut self, surface: &mut S, entities: &[Entity], viewport: Viewport) {
		surface.clear(viewport.width, viewport.height);

		// Stable sort keeps population order within a band.
		self.order.clear();
		self.order.extend(0..entities.len());
		self.order.sort_by_key(|&i| entities[i].band);

		for &i in &self.order {
			let entity = &entities[i];
			if entity.opacity <= 0.0 {
				continue;
			}
			surface.draw_glyph(&self.paint(entity));
		}
	}

	/// Resolve an entity into concrete paint parameters.
	pub fn paint(&self, entity: &Entity) -> GlyphPaint<'_> {
		let theme = &self.theme;
		let opacity = entity.opacity.clamp(0.0, 1.0);
		let gradient = theme
			.gradient
			.map(|stop| GradientStop::new(stop.offset, stop.color.with_alpha(opacity)));
		let blur = theme.glow_blur(entity.band);

		GlyphPaint {
			glyph: &theme.glyph,
			font_family: theme.font_family,
			x: entity.x,
			y: entity.y,
			rotation: entity.rotation,
			size: entity.size,
			gradient,
			glow: Glow {
				blur,
				color: theme.glow_color.with_alpha(opacity),
			},
			highlight: Glow {
				blur: blur * theme.highlight_spread,
				color: theme
					.highlight_color
					.with_alpha(opacity * theme.highlight_weight),
			},
		}
	}
}
