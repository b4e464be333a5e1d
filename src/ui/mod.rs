//! User interface subsystem - the HUD on the round AMOLED.
//!
//! The HUD owns a state machine fed by navigation events and the link
//! state, and redraws the whole screen on every transition. Rotation
//! from the IMU only changes the panel transform, never the content.
//!
//! ## Components
//!
//! - **Hud**: state machine, theme and rotation handling
//! - **Screens**: draw recipes for each state

pub mod hud;
pub mod screens;

pub use hud::Hud;

use embedded_graphics::pixelcolor::RgbColor;

use crate::render::Rgb565;

/// Longest error text kept for the error screen (bytes).
pub const ERROR_MESSAGE_CAPACITY: usize = 48;

/// Screens the HUD can be in.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UiState {
    /// Boot splash, before the phone has connected.
    Startup,
    /// Advertising or connected, waiting for the first route update.
    Connecting,
    /// A valid navigation event is on screen.
    ShowingNavigation,
    /// The phone reported that no route is active.
    NoData,
    /// Bring-up failure. Left only by an explicit return to startup or a
    /// navigation update.
    Error(heapless::String<ERROR_MESSAGE_CAPACITY>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Theme {
    Day,
    Night,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Day => Theme::Night,
            Theme::Night => Theme::Day,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Day => Palette {
                background: Rgb565::WHITE,
                text: Rgb565::BLACK,
                accent: Rgb565::BLUE,
                warning: Rgb565::RED,
            },
            Theme::Night => Palette {
                background: Rgb565::BLACK,
                text: Rgb565::WHITE,
                accent: Rgb565::GREEN,
                warning: ORANGE,
            },
        }
    }
}

/// 0xFD20
pub const ORANGE: Rgb565 = Rgb565::new(31, 41, 0);

/// Colours used by the draw recipes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb565,
    pub text: Rgb565,
    pub accent: Rgb565,
    pub warning: Rgb565,
}
