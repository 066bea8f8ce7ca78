//! Per-instance overlay state.
//!
//! [`Overlay`] is the single owned context of an active animation: the
//! population, the frame pacer, the renderer and the surface it draws on.
//! It is created on activation and dropped on teardown; nothing outlives it.

use log::debug;
use rand::rngs::SmallRng;

use super::population::{Population, requested_count};
use super::render::{Renderer, Surface};
use super::scheduler::FrameScheduler;
use super::theme::GlyphTheme;
use super::types::Viewport;

/// Sub-state of an active overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	/// Population (re)generated but not yet drawn.
	Seeding,
	/// At least one frame of the current population has been drawn.
	Running,
}

/// Last known pointer position in logical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
	/// Client x in logical px.
	pub x: f64,
	/// Client y in logical px.
	pub y: f64,
}

/// Owned animation context for one active overlay.
pub struct Overlay<S: Surface> {
	surface: S,
	population: Population,
	scheduler: FrameScheduler,
	renderer: Renderer,
	viewport: Viewport,
	pointer: Pointer,
	phase: Phase,
	base_count: usize,
}

impl<S: Surface> Overlay<S> {
	/// A fresh, empty overlay drawing on `surface`. Call [`Overlay::reseed`]
	/// before the first frame.
	pub fn new(surface: S, base_count: usize, theme: GlyphTheme, rng: SmallRng) -> Self {
		Self {
			surface,
			population: Population::new(rng),
			scheduler: FrameScheduler::default(),
			renderer: Renderer::new(theme),
			viewport: Viewport::new(0.0, 0.0, 1.0),
			pointer: Pointer::default(),
			phase: Phase::Seeding,
			base_count,
		}
	}

	/// Resize the surface and regenerate the population for `viewport`.
	///
	/// Runs on activation and on every viewport resize.
	pub fn reseed(&mut self, viewport: Viewport, core_count: Option<u32>) {
		self.phase = Phase::Seeding;
		self.viewport = viewport;
		self.surface.resize(viewport);

		let count = requested_count(self.base_count, viewport.width, core_count);
		self.population.reseed(count, viewport);
		debug!(
			"currency-rain: seeded {} glyphs for {}x{} @{}x",
			self.population.len(),
			viewport.width,
			viewport.height,
			viewport.pixel_ratio()
		);
	}

	/// Handle one host frame callback. Returns whether a step ran.
	pub fn on_frame(&mut self, now: f64) -> bool {
		if !self.scheduler.poll(now) {
			return false;
		}
		self.step();
		true
	}

	/// Advance the simulation one tick and draw it.
	pub fn step(&mut self) {
		self.population.advance(self.viewport);
		self.renderer
			.render(&mut self.surface, self.population.entities(), self.viewport);
		self.phase = Phase::Running;
	}

	/// Record the latest pointer position.
	pub fn track_pointer(&mut self, x: f64, y: f64) {
		self.pointer = Pointer { x, y };
	}

	/// Current sub-state.
	pub fn phase(&self) -> Phase {
		self.phase
	}

	/// Last recorded pointer position.
	pub fn pointer(&self) -> Pointer {
		self.pointer
	}

	/// Viewport the population was last seeded for.
	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	/// The live entities.
	pub fn population(&self) -> &Population {
		&self.population
	}

	/// The surface being drawn on.
	pub fn surface(&self) -> &S {
		&self.surface
	}
}
