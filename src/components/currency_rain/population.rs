//! Entity lifecycle: device-tier sizing, randomized creation and in-place
//! replacement under a fixed population budget.

use std::f64::consts::TAU;

use rand::Rng;
use rand::rngs::SmallRng;

use super::types::{DepthBand, Entity, SPAWN_MARGIN, Viewport};

/// Default base population before device-tier scaling.
pub const DEFAULT_PARTICLE_COUNT: usize = 60;

/// Viewports narrower than this (logical px) count as mobile.
pub const MOBILE_BREAKPOINT: f64 = 768.0;

/// Devices reporting this many cores or fewer count as low-end.
pub const LOW_END_CORES: u32 = 4;

/// Upper bound on the live population, whatever the configured base count.
pub const MAX_PARTICLES: usize = 1_000;

const SIZE_RANGE: (f64, f64) = (12.0, 28.0);
const SPEED_RANGE: (f64, f64) = (0.5, 2.0);
const OPACITY_RANGE: (f64, f64) = (0.3, 0.8);
const DRIFT_SPEED_RANGE: (f64, f64) = (0.02, 0.04);
const DRIFT_AMPLITUDE: f64 = 0.5;
const MAX_ROTATION_SPEED: f64 = 0.01;

/// Effective population size for a device.
///
/// Small screens and low-core devices get half the base count; everything else
/// gets one and a half times the base. A missing or zero core count is not
/// treated as low-end. The result never exceeds [`MAX_PARTICLES`].
pub fn requested_count(base: usize, viewport_width: f64, core_count: Option<u32>) -> usize {
	let is_mobile = viewport_width < MOBILE_BREAKPOINT;
	let is_low_end = matches!(core_count, Some(n) if n > 0 && n <= LOW_END_CORES);

	let count = if is_mobile || is_low_end {
		base / 2
	} else {
		base.saturating_mul(3) / 2
	};
	count.min(MAX_PARTICLES)
}

/// Where a freshly created entity is placed vertically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Spawn {
	/// Anywhere on screen; used when (re)seeding.
	Seeded,
	/// Just above the top edge; used for replacements.
	AboveViewport,
}

/// Fixed-size collection of live entities plus the randomness that feeds it.
pub struct Population {
	entities: Vec<Entity>,
	rng: SmallRng,
}

impl Population {
	/// An empty population drawing from `rng`.
	pub fn new(rng: SmallRng) -> Self {
		Self {
			entities: Vec::new(),
			rng,
		}
	}

	/// Live entities in creation order.
	pub fn entities(&self) -> &[Entity] {
		&self.entities
	}

	/// Number of live entities.
	pub fn len(&self) -> usize {
		self.entities.len()
	}

	/// True when nothing is live.
	pub fn is_empty(&self) -> bool {
		self.entities.is_empty()
	}

	/// Discard every entity and seed `count` new ones across the viewport.
	///
	/// An empty viewport yields an empty population. `count` is capped at
	/// [`MAX_PARTICLES`].
	pub fn reseed(&mut self, count: usize, viewport: Viewport) {
		self.entities.clear();
		if viewport.is_empty() {
			return;
		}
		let count = count.min(MAX_PARTICLES);
		self.entities.reserve_exact(count);
		for _ in 0..count {
			let entity = self.create(viewport, Spawn::Seeded);
			self.entities.push(entity);
		}
	}

	/// Draw a depth band with two chained uniform draws.
	fn draw_band(&mut self) -> DepthBand {
		if self.rng.gen_range(0.0..1.0) < 0.33 {
			DepthBand::Far
		} else if self.rng.gen_range(0.0..1.0) < 0.5 {
			DepthBand::Mid
		} else {
			DepthBand::Near
		}
	}

	fn jitter(&mut self, (lo, hi): (f64, f64)) -> f64 {
		self.rng.gen_range(lo..hi)
	}

	/// Build a new randomized entity.
	pub fn create(&mut self, viewport: Viewport, spawn: Spawn) -> Entity {
		let band = self.draw_band();
		let m = band.multiplier();
		let width = viewport.width.max(0.0);
		let height = viewport.height.max(0.0);

		let x = self.rng.gen_range(0.0..=width);
		let y = match spawn {
			Spawn::Seeded => self.rng.gen_range(0.0..=height),
			Spawn::AboveViewport => -SPAWN_MARGIN,
		};

		Entity {
			x,
			y,
			size: self.jitter(SIZE_RANGE) * m,
			speed: self.jitter(SPEED_RANGE) * m,
			drift_amplitude: DRIFT_AMPLITUDE,
			drift_phase: self.rng.gen_range(0.0..TAU),
			drift_speed: self.jitter(DRIFT_SPEED_RANGE),
			opacity: self.jitter(OPACITY_RANGE) * m,
			rotation: self.rng.gen_range(0.0..TAU),
			rotation_speed: self.rng.gen_range(-MAX_ROTATION_SPEED..MAX_ROTATION_SPEED),
			band,
		}
	}

	/// Overwrite the entity at `index` with a fresh one spawned above the viewport.
	pub fn retire_and_replace(&mut self, index: usize, viewport: Viewport) {
		if index >= self.entities.len() {
			return;
		}
		let fresh = self.create(viewport, Spawn::AboveViewport);
		self.entities[index] = fresh;
	}

	/// Advance every entity one tick and replace the ones that retired.
	///
	/// Returns how many entities were replaced.
	pub fn advance(&mut self, viewport: Viewport) -> usize {
		let mut replaced = 0;
		for index in 0..self.entities.len() {
			self.entities[index].advance(viewport.height);
			if self.entities[index].is_retired(viewport.height) {
				self.retire_and_replace(index, viewport);
				replaced += 1;
			}
		}
		replaced
	}

	#[cfg(test)]
	pub(crate) fn entities_mut(&mut self) -> &mut [Entity] {
		&mut self.entities
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;

	use super::*;

	const DESKTOP: Viewport = Viewport::new(1920.0, 1080.0, 1.0);

	fn population(seed: u64) -> Population {
		Population::new(SmallRng::seed_from_u64(seed))
	}

	#[test]
	fn device_tier_scaling() {
		assert_eq!(requested_count(60, 375.0, Some(8)), 30);
		assert_eq!(requested_count(60, 1920.0, Some(8)), 90);
		assert_eq!(requested_count(60, 1920.0, Some(4)), 30);
		assert_eq!(requested_count(61, 375.0, Some(8)), 30);
		assert_eq!(requested_count(61, 1920.0, Some(16)), 91);
	}

	#[test]
	fn unknown_core_count_is_not_low_end() {
		assert_eq!(requested_count(60, 1920.0, None), 90);
		assert_eq!(requested_count(60, 1920.0, Some(0)), 90);
		assert_eq!(requested_count(60, 767.9, None), 30);
	}

	#[test]
	fn oversized_base_is_capped() {
		assert_eq!(requested_count(usize::MAX, 1920.0, Some(8)), MAX_PARTICLES);
		assert_eq!(requested_count(usize::MAX, 375.0, Some(8)), MAX_PARTICLES);
		assert_eq!(requested_count(usize::MAX / 3 + 1, 1920.0, None), MAX_PARTICLES);
		assert_eq!(requested_count(MAX_PARTICLES, 375.0, None), MAX_PARTICLES / 2);
	}

	#[test]
	fn reseed_caps_population() {
		let mut pop = population(13);
		pop.reseed(usize::MAX, DESKTOP);
		assert_eq!(pop.len(), MAX_PARTICLES);
	}

	#[test]
	fn creation_values_follow_band_multiplier() {
		let mut pop = population(7);
		for _ in 0..2_000 {
			let e = pop.create(DESKTOP, Spawn::Seeded);
			let m = e.band.multiplier();
			assert!(e.size >= 12.0 * m && e.size <= 28.0 * m);
			assert!(e.speed >= 0.5 * m && e.speed <= 2.0 * m);
			assert!(e.opacity >= 0.3 * m && e.opacity <= 0.8 * m);
			assert!(e.opacity > 0.0 && e.opacity <= 1.0);
			assert!(e.rotation_speed.abs() <= MAX_ROTATION_SPEED);
			assert!((0.0..=DESKTOP.width).contains(&e.x));
			assert!((0.0..=DESKTOP.height).contains(&e.y));
		}
	}

	#[test]
	fn band_draw_matches_chained_rule() {
		let mut pop = population(42);
		let mut counts = [0usize; 3];
		let draws = 30_000;
		for _ in 0..draws {
			counts[pop.draw_band().index()] += 1;
		}
		let share = |n: usize| n as f64 / draws as f64;
		assert!((share(counts[0]) - 0.33).abs() < 0.02);
		assert!((share(counts[1]) - 0.335).abs() < 0.02);
		assert!((share(counts[2]) - 0.335).abs() < 0.02);
	}

	#[test]
	fn reseed_sets_fixed_size() {
		let mut pop = population(1);
		pop.reseed(90, DESKTOP);
		assert_eq!(pop.len(), 90);
		for _ in 0..5_000 {
			pop.advance(DESKTOP);
			assert_eq!(pop.len(), 90);
		}
	}

	#[test]
	fn live_entities_stay_within_margins() {
		let mut pop = population(3);
		pop.reseed(120, DESKTOP);
		for _ in 0..3_000 {
			pop.advance(DESKTOP);
			for e in pop.entities() {
				assert!(e.opacity > 0.0);
				assert!(e.y >= -SPAWN_MARGIN && e.y <= DESKTOP.height + SPAWN_MARGIN);
			}
		}
	}

	#[test]
	fn empty_viewport_yields_empty_population() {
		let mut pop = population(5);
		pop.reseed(60, Viewport::new(0.0, 0.0, 1.0));
		assert!(pop.is_empty());
		assert_eq!(pop.advance(Viewport::new(0.0, 0.0, 1.0)), 0);
	}

	#[test]
	fn fallen_entity_is_replaced_above_viewport() {
		let mut pop = population(9);
		pop.reseed(400, DESKTOP);
		for e in pop.entities_mut() {
			e.band = DepthBand::Near;
			e.y = DESKTOP.height + SPAWN_MARGIN + 1.0;
		}
		let replaced = pop.advance(DESKTOP);
		assert_eq!(replaced, 400);
		assert_eq!(pop.len(), 400);
		assert!(pop.entities().iter().all(|e| e.y == -SPAWN_MARGIN));
		// Replacement bands are drawn fresh, not copied from the retiree.
		assert!(pop.entities().iter().any(|e| e.band != DepthBand::Near));
	}

	#[test]
	fn retire_out_of_range_is_ignored() {
		let mut pop = population(11);
		pop.reseed(3, DESKTOP);
		let before = pop.entities().to_vec();
		pop.retire_and_replace(3, DESKTOP);
		assert_eq!(pop.entities(), before.as_slice());
	}
}
