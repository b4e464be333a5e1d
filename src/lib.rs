//! Library interface for nav-hud.
//!
//! Everything that does not touch a peripheral lives here so it can be
//! tested on the host: the navigation decoder, the heading filter, the
//! round-panel renderer and the HUD state machine. The embedded binary
//! (`src/main.rs`, `embedded` feature) wires these to the SoftDevice,
//! the SPI panel and the I²C motion sensor.
//!
//! Usage: `cargo test` (host) or `cargo build --release --features embedded`.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;

pub mod app;
pub mod ble;
pub mod config;
pub mod error;
pub mod power_logic;
pub mod render;
pub mod sensors;
pub mod settings;
#[cfg(feature = "embedded")]
pub mod storage;
pub mod ui;

pub use error::Error;

// ═══════════════════════════════════════════════════════════════════════════
// Cross-module checks
// ═══════════════════════════════════════════════════════════════════════════
