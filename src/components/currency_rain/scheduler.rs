//! Frame pacing independent of the host's callback frequency.
//!
//! The host (e.g. `requestAnimationFrame`) may call back at 60, 120 or 144 Hz.
//! [`FrameScheduler::poll`] decides per callback whether a simulation step is
//! due, carrying the remainder of the elapsed time forward so the cadence does
//! not drift.

/// Target simulation rate.
pub const TARGET_FPS: f64 = 60.0;

/// Cooperative, non-blocking frame pacer.
#[derive(Clone, Debug)]
pub struct FrameScheduler {
	interval: f64,
	last_tick: f64,
}

impl Default for FrameScheduler {
	fn default() -> Self {
		Self::new(TARGET_FPS)
	}
}

impl FrameScheduler {
	/// Pacer stepping `fps` times per second.
	pub fn new(fps: f64) -> Self {
		Self {
			interval: 1000.0 / fps,
			last_tick: 0.0,
		}
	}

	/// Milliseconds between simulation steps.
	pub fn interval(&self) -> f64 {
		self.interval
	}

	/// Timestamp the cursor was last advanced to.
	pub fn last_tick(&self) -> f64 {
		self.last_tick
	}

	/// Report whether a step should run for a callback at `now` (ms).
	pub fn poll(&mut self, now: f64) -> bool {
		let elapsed = now - self.last_tick;
		if elapsed < 0.0 {
			// Host clock went backwards; rebase rather than stall.
			self.last_tick = now;
			return false;
		}
		if elapsed < self.interval {
			return false;
		}
		self.last_tick = now - (elapsed % self.interval);
		true
	}
}
