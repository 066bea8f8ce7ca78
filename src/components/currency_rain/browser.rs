//! Browser bindings: the canvas surface, window observers and the
//! `requestAnimationFrame` loop.

use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, MouseEvent, Window,
};

use super::frames::{FrameHost, FrameLoop};
use super::render::{GlyphPaint, Surface, write_font};
use super::session::Environment;
use super::types::Viewport;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Whether the user asked the platform to minimise motion.
pub fn prefers_reduced_motion() -> bool {
	web_sys::window().is_some_and(|w| reduced_motion(&w))
}

fn reduced_motion(window: &Window) -> bool {
	window
		.match_media(REDUCED_MOTION_QUERY)
		.ok()
		.flatten()
		.is_some_and(|mql| mql.matches())
}

/// The live browser window plus the canvas the overlay draws on.
#[derive(Clone)]
pub struct BrowserEnvironment {
	window: Window,
	canvas: HtmlCanvasElement,
}

impl BrowserEnvironment {
	/// Bind to the current window, if there is one.
	pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
		Some(Self {
			window: web_sys::window()?,
			canvas,
		})
	}

	fn listen(
		&self,
		kind: &'static str,
		callback: Closure<dyn FnMut(Event)>,
	) -> Option<EventListener> {
		let target: &EventTarget = self.window.as_ref();
		target
			.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
			.ok()?;
		Some(EventListener {
			target: target.clone(),
			kind,
			callback,
		})
	}
}

impl Environment for BrowserEnvironment {
	type Surface = CanvasSurface;
	type Subscription = EventListener;
	type FrameLoop = FrameLoop<AnimationFrames>;

	fn viewport(&self) -> Viewport {
		let dimension =
			|v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
		Viewport::new(
			dimension(self.window.inner_width()),
			dimension(self.window.inner_height()),
			self.window.device_pixel_ratio(),
		)
	}

	fn hardware_concurrency(&self) -> Option<u32> {
		let cores = self.window.navigator().hardware_concurrency();
		(cores.is_finite() && cores >= 1.0).then_some(cores as u32)
	}

	fn prefers_reduced_motion(&self) -> bool {
		reduced_motion(&self.window)
	}

	fn surface_attached(&self) -> bool {
		self.canvas.is_connected()
	}

	fn acquire_surface(&self) -> Option<CanvasSurface> {
		let ctx: CanvasRenderingContext2d =
			self.canvas.get_context("2d").ok()??.dyn_into().ok()?;
		Some(CanvasSurface {
			canvas: self.canvas.clone(),
			ctx,
			font: String::new(),
		})
	}

	fn observe_resize(&self, mut handler: Box<dyn FnMut()>) -> Option<EventListener> {
		self.listen("resize", Closure::new(move |_: Event| handler()))
	}

	fn observe_pointer(&self, mut handler: Box<dyn FnMut(f64, f64)>) -> Option<EventListener> {
		self.listen(
			"mousemove",
			Closure::new(move |ev: Event| {
				if let Some(mouse) = ev.dyn_ref::<MouseEvent>() {
					handler(mouse.client_x() as f64, mouse.client_y() as f64);
				}
			}),
		)
	}

	fn request_frames(&self, callback: Box<dyn FnMut(f64)>) -> Option<Self::FrameLoop> {
		FrameLoop::start(AnimationFrames(self.window.clone()), callback)
	}
}

/// A window event listener, removed when dropped.
pub struct EventListener {
	target: EventTarget,
	kind: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

impl Drop for EventListener {
	fn drop(&mut self) {
		let _ = self
			.target
			.remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
	}
}

/// `requestAnimationFrame` on the window.
pub struct AnimationFrames(Window);

impl FrameHost for AnimationFrames {
	type Callback = Closure<dyn FnMut(f64)>;

	fn wrap(&self, tick: Box<dyn FnMut(f64)>) -> Self::Callback {
		Closure::wrap(tick)
	}

	fn request(&self, callback: &Self::Callback) -> Option<i32> {
		self.0
			.request_animation_frame(callback.as_ref().unchecked_ref::<js_sys::Function>())
			.ok()
	}

	fn cancel(&self, id: i32) {
		let _ = self.0.cancel_animation_frame(id);
	}
}

/// 2D canvas context drawing in logical pixels.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	/// Font shorthand buffer reused across glyphs.
	font: String,
}

impl Surface for CanvasSurface {
	fn set_size(&mut self, (width, height): (u32, u32), (css_width, css_height): (f64, f64)) {
		self.canvas.set_width(width);
		self.canvas.set_height(height);

		let style = self.canvas.style();
		let _ = style.set_property("width", &format!("{css_width}px"));
		let _ = style.set_property("height", &format!("{css_height}px"));
	}

	fn set_transform(&mut self, [a, b, c, d, e, f]: [f64; 6]) {
		let _ = self.ctx.set_transform(a, b, c, d, e, f);
	}

	fn clear(&mut self, width: f64, height: f64) {
		self.ctx.clear_rect(0.0, 0.0, width, height);
	}

	fn draw_glyph(&mut self, paint: &GlyphPaint<'_>) {
		let ctx = &self.ctx;
		let half = paint.size / 2.0;

		ctx.save();
		let _ = ctx.translate(paint.x, paint.y);
		let _ = ctx.rotate(paint.rotation);

		write_font(&mut self.font, paint.size, paint.font_family);
		ctx.set_font(&self.font);
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");

		let gradient = ctx.create_linear_gradient(-half, -half, half, half);
		for stop in &paint.gradient {
			let _ = gradient.add_color_stop(stop.offset, &stop.color.to_css());
		}
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);

		ctx.set_shadow_blur(paint.glow.blur);
		ctx.set_shadow_color(&paint.glow.color.to_css());
		let _ = ctx.fill_text(paint.glyph, 0.0, 0.0);

		// Second pass: wider, paler highlight halo.
		ctx.set_shadow_blur(paint.highlight.blur);
		ctx.set_shadow_color(&paint.highlight.color.to_css());
		let _ = ctx.fill_text(paint.glyph, 0.0, 0.0);

		ctx.restore();
	}
}
