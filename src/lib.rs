//! rupee-rain: decorative falling-currency background for the budget tracker.
//!
//! This crate provides a WASM canvas component that rains glowing currency
//! glyphs behind the app's pages, scaled to the device and paced to 60 Hz.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

// Only linked for its `js` entropy backend, which `rand` needs on wasm32.
use getrandom as _;

pub mod components;

pub use components::currency_rain::{CurrencyRainCanvas, GlyphTheme, RainConfig};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("rupee-rain: logging initialized");
}

/// Load overlay settings from a script element with id="rain-config".
/// Expected format: JSON matching [`RainConfig`]; every field is optional.
fn load_rain_config() -> Option<RainConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("rain-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match RainConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"rupee-rain: loaded config (enabled: {}, count: {}, theme: {})",
				config.enabled, config.particle_count, config.theme
			);
			Some(config)
		}
		Err(e) => {
			warn!("rupee-rain: failed to parse config: {}", e);
			None
		}
	}
}

/// Main application shell.
/// Loads overlay settings from the DOM and mounts the background animation.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_rain_config().unwrap_or_default();
	let enabled = config.enabled;
	let theme = config.glyph_theme();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Budget Tracker" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="app-backdrop">
			<CurrencyRainCanvas
				enabled=Signal::derive(move || enabled)
				particle_count=config.particle_count
				theme=theme
				seed=config.seed
			/>
			<div class="app-overlay">
				<h1>"Budget Tracker"</h1>
				<p class="subtitle">"Track spending, set budgets, and learn as you go."</p>
			</div>
		</div>
	}
}
