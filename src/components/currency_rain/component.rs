//! Leptos component wrapping the glyph overlay canvas.
//!
//! The component renders a fixed, full-viewport canvas that ignores pointer
//! input. While enabled it holds a [`Session`] which owns the animation loop
//! and the window observers; disabling the overlay or unmounting the
//! component drops the session and with it every registration.

use leptos::prelude::*;
use log::warn;
use web_sys::HtmlCanvasElement;

use super::browser::{self, BrowserEnvironment};
use super::population::DEFAULT_PARTICLE_COUNT;
use super::session::{RainSettings, Session};
use super::theme::GlyphTheme;

const CANVAS_STYLE: &str =
	"position: fixed; inset: 0; pointer-events: none; z-index: 0; display: block;";

/// Non-interactive falling-glyph background.
///
/// `enabled` gates all work; when it is false, or the platform reports a
/// reduced-motion preference, nothing is rendered. `particle_count` is the
/// base population before device-tier scaling.
#[component]
pub fn CurrencyRainCanvas(
	/// Master switch for the overlay.
	#[prop(into)]
	enabled: Signal<bool>,
	/// Base population before device-tier scaling.
	#[prop(default = DEFAULT_PARTICLE_COUNT)]
	particle_count: usize,
	/// Glyph and colors.
	#[prop(default = GlyphTheme::default())]
	theme: GlyphTheme,
	/// Fixed RNG seed for reproducible layouts.
	#[prop(default = None)]
	seed: Option<u64>,
	/// Extra CSS classes for the canvas.
	#[prop(optional, into)]
	class: String,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let session = StoredValue::new_local(None::<Session<BrowserEnvironment>>);
	let reduced_motion = browser::prefers_reduced_motion();

	Effect::new(move |_| {
		let active = enabled.get();
		let canvas = canvas_ref.get();

		// Tear down any previous session before deciding what comes next.
		session.set_value(None);
		if !active || reduced_motion {
			return;
		}
		// The ref may still hold the element `Show` just unmounted; the
		// session refuses to start on a detached canvas.
		let Some(canvas) = canvas else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(env) = BrowserEnvironment::new(canvas) else {
			warn!("currency-rain: no window available");
			return;
		};

		let settings = RainSettings {
			enabled: active,
			particle_count,
			theme: theme.clone(),
			seed,
		};
		session.set_value(Session::start(&env, &settings));
	});

	on_cleanup(move || {
		let _ = session.try_set_value(None);
	});

	let class = format!("currency-rain-canvas {class}");

	view! {
		<Show when=move || enabled.get() && !reduced_motion>
			<canvas
				node_ref=canvas_ref
				class=class.clone()
				aria-hidden="true"
				style=CANVAS_STYLE
			/>
		</Show>
	}
}
