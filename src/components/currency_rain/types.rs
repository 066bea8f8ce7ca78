//! Core data types shared by the population, scheduler and renderer.

/// Logical viewport dimensions plus the display's pixel-density scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Width in logical (CSS) pixels.
	pub width: f64,
	/// Height in logical (CSS) pixels.
	pub height: f64,
	/// Device pixel ratio. Values at or below zero are treated as 1.0.
	pub scale: f64,
}

impl Viewport {
	/// Viewport of `width` x `height` logical pixels at display scale `scale`.
	pub const fn new(width: f64, height: f64, scale: f64) -> Self {
		Self {
			width,
			height,
			scale,
		}
	}

	/// True when either logical dimension is empty.
	pub fn is_empty(&self) -> bool {
		!(self.width > 0.0 && self.height > 0.0)
	}

	/// Effective display scale, falling back to 1.0 for bogus ratios.
	pub fn pixel_ratio(&self) -> f64 {
		if self.scale.is_finite() && self.scale > 0.0 {
			self.scale
		} else {
			1.0
		}
	}

	/// Backing-store size of the raster surface in device pixels.
	pub fn backing_size(&self) -> (u32, u32) {
		if self.is_empty() {
			return (0, 0);
		}
		let ratio = self.pixel_ratio();
		(
			(self.width * ratio).floor() as u32,
			(self.height * ratio).floor() as u32,
		)
	}

	/// Displayed size of the surface in logical pixels.
	pub fn logical_size(&self) -> (f64, f64) {
		(self.width.max(0.0), self.height.max(0.0))
	}

	/// Canvas transform `[a, b, c, d, e, f]` mapping logical to device pixels.
	///
	/// Depends only on the viewport, so installing it is idempotent.
	pub fn device_transform(&self) -> [f64; 6] {
		let ratio = self.pixel_ratio();
		[ratio, 0.0, 0.0, ratio, 0.0, 0.0]
	}
}

/// Visual depth tier of an entity. Ordering is back-to-front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DepthBand {
	/// Smallest, slowest and faintest.
	Far,
	/// In between.
	Mid,
	/// Full size, speed and opacity.
	Near,
}

impl DepthBand {
	/// Scale applied to size, speed and opacity.
	pub const fn multiplier(self) -> f64 {
		match self {
			DepthBand::Far => 0.5,
			DepthBand::Mid => 0.75,
			DepthBand::Near => 1.0,
		}
	}

	/// Index into per-band lookup tables (far = 0).
	pub const fn index(self) -> usize {
		match self {
			DepthBand::Far => 0,
			DepthBand::Mid => 1,
			DepthBand::Near => 2,
		}
	}
}

/// A single falling glyph.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
	/// Horizontal position in logical px.
	pub x: f64,
	/// Vertical position in logical px; grows downward.
	pub y: f64,
	/// Glyph size in logical px.
	pub size: f64,
	/// Vertical speed in logical px per tick.
	pub speed: f64,
	/// Horizontal sway per tick, scaled by `sin(drift_phase)`.
	pub drift_amplitude: f64,
	/// Current sway phase in radians.
	pub drift_phase: f64,
	/// Sway phase advance per tick.
	pub drift_speed: f64,
	/// Current opacity, 0.0 to 1.0.
	pub opacity: f64,
	/// Current rotation in radians.
	pub rotation: f64,
	/// Rotation advance per tick in radians.
	pub rotation_speed: f64,
	/// Depth tier fixed at creation.
	pub band: DepthBand,
}

/// Fraction of the viewport height at which entities start fading out.
pub const FADE_START: f64 = 0.7;

/// Distance above and below the viewport within which entities stay alive.
pub const SPAWN_MARGIN: f64 = 50.0;

impl Entity {
	/// Advance motion, rotation and fade by one tick.
	pub fn advance(&mut self, viewport_height: f64) {
		self.y += self.speed;
		self.drift_phase += self.drift_speed;
		self.x += self.drift_phase.sin() * self.drift_amplitude;
		self.rotation += self.rotation_speed;

		let fade_start = viewport_height * FADE_START;
		if self.y > fade_start {
			let progress = (self.y - fade_start) / (viewport_height * (1.0 - FADE_START));
			let factor = (1.0 - progress * 0.02).clamp(0.0, 1.0);
			self.opacity = (self.opacity * factor).clamp(0.0, 1.0);
		}
	}

	/// Whether the entity has faded out or fallen past the bottom margin.
	pub fn is_retired(&self, viewport_height: f64) -> bool {
		self.opacity <= 0.0 || self.y > viewport_height + SPAWN_MARGIN
	}
}
