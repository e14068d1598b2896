//! E-paper watch firmware core
//!
//! Everything here is written against `embedded-hal` 1.0 and `embedded-graphics`
//! traits, so it runs on the ESP32-S3 as well as on a development host where the
//! tests and the `preview` tool use it.

pub mod app;
pub mod config;
pub mod display;
pub mod pins;
pub mod rtc;
pub mod schedule;
pub mod serial;
pub mod ssd1681;
pub mod watchface;

pub use app::Watch;
pub use display::{EpdPanel, Frame, Refresh};
pub use pins::Pins;
