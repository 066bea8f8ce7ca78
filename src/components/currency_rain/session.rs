//! Activation and teardown of the overlay.
//!
//! A [`Session`] is the `Active` state: while it exists the overlay owns a
//! surface, a resize observer, a pointer observer and a running frame loop.
//! Dropping it releases all of them. When activation is refused (disabled,
//! reduced motion, a detached or missing surface) no session exists and
//! nothing was acquired.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::render::Surface;
use super::state::Overlay;
use super::theme::GlyphTheme;
use super::types::Viewport;

/// Host capabilities the overlay depends on.
///
/// Subscriptions and frame loops are handles: dropping one deregisters the
/// observer or cancels the pending frame.
pub trait Environment: Clone + 'static {
	/// Raster target the overlay draws on.
	type Surface: Surface + 'static;
	/// Observer registration, released on drop.
	type Subscription;
	/// Running frame loop, cancelled on drop.
	type FrameLoop;

	/// Current logical viewport and display scale.
	fn viewport(&self) -> Viewport;

	/// Logical core count, if the host reports one.
	fn hardware_concurrency(&self) -> Option<u32>;

	/// Whether the user asked for reduced motion.
	fn prefers_reduced_motion(&self) -> bool;

	/// Whether the drawing surface is currently part of the displayed page.
	fn surface_attached(&self) -> bool;

	/// Acquire the drawing surface, if the host has one.
	fn acquire_surface(&self) -> Option<Self::Surface>;

	/// Call `handler` whenever the viewport changes size.
	fn observe_resize(&self, handler: Box<dyn FnMut()>) -> Option<Self::Subscription>;

	/// `handler` receives client coordinates in logical pixels.
	fn observe_pointer(&self, handler: Box<dyn FnMut(f64, f64)>) -> Option<Self::Subscription>;

	/// Invoke `callback` with a millisecond timestamp once per host frame,
	/// rescheduling itself until the returned handle is dropped.
	fn request_frames(&self, callback: Box<dyn FnMut(f64)>) -> Option<Self::FrameLoop>;
}

/// Inputs from the surrounding application.
#[derive(Clone, Debug)]
pub struct RainSettings {
	/// Whether the overlay should run at all.
	pub enabled: bool,
	/// Base population before device-tier scaling.
	pub particle_count: usize,
	/// Glyph and colors.
	pub theme: GlyphTheme,
	/// Fixed RNG seed; entropy when unset.
	pub seed: Option<u64>,
}

/// A running overlay and every resource registered on its behalf.
pub struct Session<E: Environment> {
	overlay: Rc<RefCell<Overlay<E::Surface>>>,
	// Field order is drop order: stop frames before releasing observers.
	_frames: E::FrameLoop,
	_subscriptions: Vec<E::Subscription>,
}

impl<E: Environment> Session<E> {
	/// Try to enter the `Active` state.
	pub fn start(env: &E, settings: &RainSettings) -> Option<Self> {
		if !settings.enabled {
			debug!("currency-rain: disabled, not starting");
			return None;
		}
		if env.prefers_reduced_motion() {
			info!("currency-rain: reduced motion requested, not starting");
			return None;
		}
		if !env.surface_attached() {
			debug!("currency-rain: surface detached, not starting");
			return None;
		}
		let Some(surface) = env.acquire_surface() else {
			warn!("currency-rain: no drawing surface available");
			return None;
		};

		let rng = match settings.seed {
			Some(seed) => SmallRng::seed_from_u64(seed),
			None => SmallRng::from_entropy(),
		};
		let overlay = Rc::new(RefCell::new(Overlay::new(
			surface,
			settings.particle_count,
			settings.theme.clone(),
			rng,
		)));
		overlay
			.borrow_mut()
			.reseed(env.viewport(), env.hardware_concurrency());

		let mut subscriptions = Vec::with_capacity(2);

		let (overlay_resize, env_resize) = (overlay.clone(), env.clone());
		subscriptions.extend(env.observe_resize(Box::new(move || {
			overlay_resize
				.borrow_mut()
				.reseed(env_resize.viewport(), env_resize.hardware_concurrency());
		})));

		let overlay_pointer = overlay.clone();
		subscriptions.extend(env.observe_pointer(Box::new(move |x, y| {
			overlay_pointer.borrow_mut().track_pointer(x, y);
		})));

		let overlay_frame = overlay.clone();
		let Some(frames) = env.request_frames(Box::new(move |now| {
			overlay_frame.borrow_mut().on_frame(now);
		})) else {
			warn!("currency-rain: could not schedule animation frames");
			return None;
		};

		info!(
			"currency-rain: started with {} glyphs",
			overlay.borrow().population().len()
		);
		Some(Self {
			overlay,
			_frames: frames,
			_subscriptions: subscriptions,
		})
	}

	/// Shared handle to the running overlay.
	pub fn overlay(&self) -> &Rc<RefCell<Overlay<E::Surface>>> {
		&self.overlay
	}
}

impl<E: Environment> Drop for Session<E> {
	fn drop(&mut self) {
		debug!("currency-rain: session torn down");
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use super::super::frames::FrameLoop;
	use super::super::frames::tests::ManualFrames;
	use super::super::render::tests::RecordingSurface;
	use super::super::state::Phase;
	use super::*;

	/// Shared bookkeeping for [`FakeEnvironment`].
	#[derive(Default)]
	struct Host {
		viewport: Cell<Option<Viewport>>,
		cores: Cell<Option<u32>>,
		reduced_motion: Cell<bool>,
		detached: Cell<bool>,
		no_surface: Cell<bool>,
		surfaces: Cell<usize>,
		live_subscriptions: Cell<usize>,
		resize: RefCell<Option<Box<dyn FnMut()>>>,
		pointer: RefCell<Option<Box<dyn FnMut(f64, f64)>>>,
		frames: ManualFrames,
	}

	#[derive(Clone, Default)]
	struct FakeEnvironment(Rc<Host>);

	struct FakeSubscription(Rc<Host>);

	impl Drop for FakeSubscription {
		fn drop(&mut self) {
			self.0.live_subscriptions.set(self.0.live_subscriptions.get() - 1);
		}
	}

	impl FakeEnvironment {
		fn desktop() -> Self {
			let env = Self::default();
			env.0.viewport.set(Some(Viewport::new(1920.0, 1080.0, 1.0)));
			env.0.cores.set(Some(8));
			env
		}

		fn fire_resize(&self, viewport: Viewport) {
			self.0.viewport.set(Some(viewport));
			if let Some(handler) = self.0.resize.borrow_mut().as_mut() {
				handler();
			}
		}

		fn fire_pointer(&self, x: f64, y: f64) {
			if let Some(handler) = self.0.pointer.borrow_mut().as_mut() {
				handler(x, y);
			}
		}

		fn pump(&self, now: f64) -> bool {
			self.0.frames.fire(now)
		}

		fn frames_armed(&self) -> bool {
			self.0.frames.is_armed()
		}
	}

	impl Environment for FakeEnvironment {
		type Surface = RecordingSurface;
		type Subscription = FakeSubscription;
		type FrameLoop = FrameLoop<ManualFrames>;

		fn viewport(&self) -> Viewport {
			self.0
				.viewport
				.get()
				.unwrap_or(Viewport::new(0.0, 0.0, 1.0))
		}

		fn hardware_concurrency(&self) -> Option<u32> {
			self.0.cores.get()
		}

		fn prefers_reduced_motion(&self) -> bool {
			self.0.reduced_motion.get()
		}

		fn surface_attached(&self) -> bool {
			!self.0.detached.get()
		}

		fn acquire_surface(&self) -> Option<RecordingSurface> {
			if self.0.no_surface.get() {
				return None;
			}
			self.0.surfaces.set(self.0.surfaces.get() + 1);
			Some(RecordingSurface::default())
		}

		fn observe_resize(&self, handler: Box<dyn FnMut()>) -> Option<FakeSubscription> {
			*self.0.resize.borrow_mut() = Some(handler);
			self.0.live_subscriptions.set(self.0.live_subscriptions.get() + 1);
			Some(FakeSubscription(self.0.clone()))
		}

		fn observe_pointer(
			&self,
			handler: Box<dyn FnMut(f64, f64)>,
		) -> Option<FakeSubscription> {
			*self.0.pointer.borrow_mut() = Some(handler);
			self.0.live_subscriptions.set(self.0.live_subscriptions.get() + 1);
			Some(FakeSubscription(self.0.clone()))
		}

		fn request_frames(&self, callback: Box<dyn FnMut(f64)>) -> Option<Self::FrameLoop> {
			FrameLoop::start(self.0.frames.clone(), callback)
		}
	}

	fn settings(enabled: bool) -> RainSettings {
		RainSettings {
			enabled,
			particle_count: 60,
			theme: GlyphTheme::gold(),
			seed: Some(5),
		}
	}

	#[test]
	fn disabled_acquires_nothing() {
		let env = FakeEnvironment::desktop();
		assert!(Session::start(&env, &settings(false)).is_none());
		assert_eq!(env.0.surfaces.get(), 0);
		assert_eq!(env.0.live_subscriptions.get(), 0);
		assert!(!env.frames_armed());
	}

	#[test]
	fn reduced_motion_acquires_nothing() {
		let env = FakeEnvironment::desktop();
		env.0.reduced_motion.set(true);
		assert!(Session::start(&env, &settings(true)).is_none());
		assert_eq!(env.0.surfaces.get(), 0);
		assert_eq!(env.0.live_subscriptions.get(), 0);
	}

	#[test]
	fn detached_surface_is_not_started() {
		let env = FakeEnvironment::desktop();
		env.0.detached.set(true);
		assert!(Session::start(&env, &settings(true)).is_none());
		assert_eq!(env.0.surfaces.get(), 0);
		assert_eq!(env.0.live_subscriptions.get(), 0);
		assert!(!env.frames_armed());

		env.0.detached.set(false);
		assert!(Session::start(&env, &settings(true)).is_some());
	}

	#[test]
	fn missing_surface_short_circuits() {
		let env = FakeEnvironment::desktop();
		env.0.no_surface.set(true);
		assert!(Session::start(&env, &settings(true)).is_none());
		assert_eq!(env.0.live_subscriptions.get(), 0);
		assert!(!env.frames_armed());
	}

	#[test]
	fn failed_frame_request_releases_observers() {
		let env = FakeEnvironment::desktop();
		env.0.frames.0.refuse.set(true);
		assert!(Session::start(&env, &settings(true)).is_none());
		assert_eq!(env.0.live_subscriptions.get(), 0);
	}

	#[test]
	fn active_session_registers_and_releases_everything() {
		let env = FakeEnvironment::desktop();
		let session = Session::start(&env, &settings(true)).expect("session");
		assert_eq!(env.0.surfaces.get(), 1);
		assert_eq!(env.0.live_subscriptions.get(), 2);
		assert!(env.frames_armed());
		assert_eq!(session.overlay().borrow().population().len(), 90);

		drop(session);
		assert_eq!(env.0.live_subscriptions.get(), 0);
		assert_eq!(env.0.frames.0.cancels.get(), 1);
		assert!(!env.frames_armed());
		assert!(!env.pump(1_000.0));
	}

	#[test]
	fn resize_reseeds_population() {
		let env = FakeEnvironment::desktop();
		let session = Session::start(&env, &settings(true)).expect("session");
		assert!(env.pump(20.0));
		assert_eq!(session.overlay().borrow().phase(), Phase::Running);

		let small = Viewport::new(375.0, 812.0, 3.0);
		env.fire_resize(small);
		let overlay = session.overlay().borrow();
		assert_eq!(overlay.phase(), Phase::Seeding);
		assert_eq!(overlay.population().len(), 30);
		assert_eq!(overlay.viewport(), small);
		assert_eq!(overlay.surface().sizes.last(), Some(&((1125, 2436), (375.0, 812.0))));
		assert_eq!(overlay.surface().transform(), [3.0, 0.0, 0.0, 3.0, 0.0, 0.0]);
	}

	#[test]
	fn repeated_resizes_do_not_compound_scale() {
		let env = FakeEnvironment::desktop();
		let session = Session::start(&env, &settings(true)).expect("session");
		let hidpi = Viewport::new(1440.0, 900.0, 2.0);
		for _ in 0..5 {
			env.fire_resize(hidpi);
		}
		let overlay = session.overlay().borrow();
		let transforms = &overlay.surface().transforms;
		assert_eq!(transforms.len(), 6);
		assert!(transforms[1..].iter().all(|t| *t == [2.0, 0.0, 0.0, 2.0, 0.0, 0.0]));
	}

	#[test]
	fn frames_are_paced() {
		let env = FakeEnvironment::desktop();
		let session = Session::start(&env, &settings(true)).expect("session");
		for i in 1..=100 {
			assert!(env.pump(i as f64 * 8.0), "frame {i} was not re-requested");
		}
		let frames = session.overlay().borrow().surface().frames;
		assert!((46..=50).contains(&frames), "frames = {frames}");
		// Skipped callbacks still re-arm the loop.
		assert_eq!(env.0.frames.0.requests.get(), 101);
		assert!(env.frames_armed());
	}

	#[test]
	fn pointer_moves_reach_overlay() {
		let env = FakeEnvironment::desktop();
		let session = Session::start(&env, &settings(true)).expect("session");
		env.fire_pointer(40.0, 50.0);
		let pointer = session.overlay().borrow().pointer();
		assert_eq!((pointer.x, pointer.y), (40.0, 50.0));
	}
}
