//! Bluetooth Low Energy subsystem.
//!
//! The HUD runs as a GATT **Peripheral**: the phone connects and writes
//! navigation frames to a single characteristic.
//!
//! 1. **Protocol** - decodes a written frame into a [`NavigationEvent`].
//! 2. **Inbox** - single-slot hand-off from the BLE context to the
//!    polling loop, plus the connection flag.
//! 3. **Advertising** - builds and inspects the advertising payload.
//! 4. **GATT server** - the SoftDevice service (embedded builds only).

pub mod adv;
#[cfg(feature = "embedded")]
pub mod gatt;
pub mod inbox;
pub mod protocol;

pub use inbox::NavInbox;
pub use protocol::decode;

/// Manoeuvre announced by the navigation app.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Instruction {
    Continue,
    TurnLeft,
    TurnRight,
    GoStraight,
    UTurn,
}

impl Instruction {
    /// Map the wire turn-direction code.
    pub fn from_code(code: u8) -> Self {
        match code {
            0x01 => Instruction::TurnLeft,
            0x02 => Instruction::TurnRight,
            0x03 => Instruction::GoStraight,
            0x04 => Instruction::UTurn,
            _ => Instruction::Continue,
        }
    }

    /// Text shown under the glyph.
    pub fn label(&self) -> &'static str {
        match self {
            Instruction::Continue => "Continue",
            Instruction::TurnLeft => "Turn Left",
            Instruction::TurnRight => "Turn Right",
            Instruction::GoStraight => "Go Straight",
            Instruction::UTurn => "U-Turn",
        }
    }
}

/// One decoded navigation update. Only the most recent one matters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NavigationEvent {
    pub instruction: Instruction,
    pub distance_m: u32,
    pub speed_limit_kph: u16,
    pub valid: bool,
}

impl NavigationEvent {
    /// A valid event.
    pub const fn new(instruction: Instruction, distance_m: u32, speed_limit_kph: u16) -> Self {
        Self {
            instruction,
            distance_m,
            speed_limit_kph,
            valid: true,
        }
    }

    /// The "navigation stopped / no route" event.
    pub const fn invalid() -> Self {
        Self {
            instruction: Instruction::Continue,
            distance_m: 0,
            speed_limit_kph: 0,
            valid: false,
        }
    }
}
