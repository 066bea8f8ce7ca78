//! Falling currency-glyph background overlay.
//!
//! Renders decorative, glowing currency symbols drifting down a full-viewport
//! canvas:
//! - A fixed-size population, replaced in place as glyphs fall out of view
//! - Depth bands (far / mid / near) scaling size, speed, opacity and glow
//! - 60 Hz pacing regardless of the display's refresh rate
//! - Device-tier scaling of the population on small or low-core devices
//! - Full teardown of the frame loop and window observers when disabled
//!
//! # Example
//!
//! ```ignore
//! use rupee_rain::CurrencyRainCanvas;
//!
//! view! { <CurrencyRainCanvas enabled=Signal::derive(|| true) particle_count=60 /> }
//! ```

mod browser;
mod component;
mod config;
mod frames;
pub mod population;
mod render;
pub mod scheduler;
mod session;
mod state;
pub mod theme;
mod types;

pub use component::CurrencyRainCanvas;
pub use config::RainConfig;
pub use render::{Glow, GlyphPaint, Surface};
pub use session::{Environment, RainSettings, Session};
pub use state::{Overlay, Phase, Pointer};
pub use theme::GlyphTheme;
pub use types::{DepthBand, Entity, Viewport};
