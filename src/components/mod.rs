//! UI components.

pub mod currency_rain;
