//! HUD preferences, read once at startup.
//!
//! The record is written by the companion tooling; the firmware only
//! ever reads it and falls back to [`HudSettings::default`] when the
//! record is missing or unusable.
//!
//! Record layout (15 bytes, multi-byte fields little-endian):
//! ```text
//! Byte 0:      Layout version (1)
//! Byte 1:      Brightness 0-255
//! Byte 2:      Rotation 0-3 (quarter turns)
//! Byte 3:      Auto-rotation (0/1)
//! Byte 4:      Night mode (0/1)
//! Byte 5-7:    Show speed limit / distance / instruction (0/1 each)
//! Byte 8:      Distance unit (0 = metres, 1 = feet)
//! Byte 9-10:   Reconnect delay (ms)
//! Byte 11:     Auto-connect (0/1)
//! Byte 12-13:  Sleep timeout (s)
//! Byte 14:     Wake on data (0/1)
//! ```

use crate::error::SettingsError;
use crate::render::Orientation;
use crate::ui::Theme;

/// Size of a stored settings record.
pub const SETTINGS_RECORD_LEN: usize = 15;

/// Only layout version this firmware understands.
pub const SETTINGS_VERSION: u8 = 1;

/// Lower bound applied to the reconnect delay (ms).
pub const MIN_RECONNECT_DELAY_MS: u16 = 1000;

/// Lower bound applied to the sleep timeout (s).
pub const MIN_SLEEP_TIMEOUT_SECS: u16 = 30;

/// Unit used when showing distances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DistanceUnit {
    Meters,
    Feet,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HudSettings {
    pub brightness: u8,
    /// Fixed orientation in quarter turns, used when auto-rotation is off.
    pub rotation: u8,
    pub auto_rotation: bool,
    pub night_mode: bool,
    pub show_speed_limit: bool,
    pub show_distance: bool,
    pub show_instruction: bool,
    pub distance_unit: DistanceUnit,
    pub reconnect_delay_ms: u16,
    pub auto_connect: bool,
    pub sleep_timeout_secs: u16,
    pub wake_on_data: bool,
}

impl Default for HudSettings {
    fn default() -> Self {
        Self {
            brightness: 200,
            rotation: 0,
            auto_rotation: true,
            night_mode: false,
            show_speed_limit: true,
            show_distance: true,
            show_instruction: true,
            distance_unit: DistanceUnit::Meters,
            reconnect_delay_ms: 5000,
            auto_connect: true,
            sleep_timeout_secs: 300,
            wake_on_data: true,
        }
    }
}

impl HudSettings {
    /// Decode a stored record, clamping out-of-range values.
    pub fn from_record(data: &[u8]) -> Result<Self, SettingsError> {
        if data.len() < SETTINGS_RECORD_LEN {
            return Err(SettingsError::Truncated { len: data.len() });
        }
        if data[0] != SETTINGS_VERSION {
            return Err(SettingsError::UnsupportedVersion(data[0]));
        }

        let flag = |b: u8| b != 0;
        let reconnect = u16::from_le_bytes([data[9], data[10]]);
        let sleep = u16::from_le_bytes([data[12], data[13]]);

        Ok(Self {
            brightness: data[1],
            rotation: data[2] % 4,
            auto_rotation: flag(data[3]),
            night_mode: flag(data[4]),
            show_speed_limit: flag(data[5]),
            show_distance: flag(data[6]),
            show_instruction: flag(data[7]),
            distance_unit: if data[8] % 2 == 0 {
                DistanceUnit::Meters
            } else {
                DistanceUnit::Feet
            },
            reconnect_delay_ms: reconnect.max(MIN_RECONNECT_DELAY_MS),
            auto_connect: flag(data[11]),
            sleep_timeout_secs: sleep.max(MIN_SLEEP_TIMEOUT_SECS),
            wake_on_data: flag(data[14]),
        })
    }

    /// Encode into the stored layout. Returns bytes written, 0 if `buf`
    /// is too small.
    ///
    /// The firmware never writes the record. This is for the provisioning
    /// tooling and for tests that need a valid record to decode.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < SETTINGS_RECORD_LEN {
            return 0;
        }
        let reconnect = self.reconnect_delay_ms.to_le_bytes();
        let sleep = self.sleep_timeout_secs.to_le_bytes();

        buf[0] = SETTINGS_VERSION;
        buf[1] = self.brightness;
        buf[2] = self.rotation % 4;
        buf[3] = self.auto_rotation as u8;
        buf[4] = self.night_mode as u8;
        buf[5] = self.show_speed_limit as u8;
        buf[6] = self.show_distance as u8;
        buf[7] = self.show_instruction as u8;
        buf[8] = match self.distance_unit {
            DistanceUnit::Meters => 0,
            DistanceUnit::Feet => 1,
        };
        buf[9..11].copy_from_slice(&reconnect);
        buf[11] = self.auto_connect as u8;
        buf[12..14].copy_from_slice(&sleep);
        buf[14] = self.wake_on_data as u8;
        SETTINGS_RECORD_LEN
    }

    pub fn theme(&self) -> Theme {
        if self.night_mode {
            Theme::Night
        } else {
            Theme::Day
        }
    }

    /// Orientation used until (or instead of) IMU-driven rotation.
    pub fn orientation(&self) -> Orientation {
        Orientation::from_quarter_turns(self.rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> [u8; SETTINGS_RECORD_LEN] {
        let mut buf = [0u8; SETTINGS_RECORD_LEN];
        HudSettings::default().serialize(&mut buf);
        buf
    }

    #[test]
    fn defaults_match_factory_values() {
        let s = HudSettings::default();
        assert_eq!(s.brightness, 200);
        assert_eq!(s.rotation, 0);
        assert!(s.auto_rotation);
        assert!(!s.night_mode);
        assert_eq!(s.distance_unit, DistanceUnit::Meters);
        assert_eq!(s.reconnect_delay_ms, 5000);
        assert_eq!(s.sleep_timeout_secs, 300);
        assert!(s.wake_on_data);
        assert_eq!(s.theme(), Theme::Day);
    }

    #[test]
    fn default_record_decodes_to_defaults() {
        let decoded = HudSettings::from_record(&record()).unwrap();
        assert_eq!(decoded, HudSettings::default());
    }

    #[test]
    fn night_mode_selects_night_theme() {
        let mut buf = record();
        buf[4] = 1;
        let s = HudSettings::from_record(&buf).unwrap();
        assert_eq!(s.theme(), Theme::Night);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let mut buf = record();
        buf[2] = 5; // rotation wraps to 1
        buf[8] = 3; // odd unit -> feet
        buf[9..11].copy_from_slice(&10u16.to_le_bytes());
        buf[12..14].copy_from_slice(&5u16.to_le_bytes());

        let s = HudSettings::from_record(&buf).unwrap();
        assert_eq!(s.rotation, 1);
        assert_eq!(s.orientation(), Orientation::Deg90);
        assert_eq!(s.distance_unit, DistanceUnit::Feet);
        assert_eq!(s.reconnect_delay_ms, MIN_RECONNECT_DELAY_MS);
        assert_eq!(s.sleep_timeout_secs, MIN_SLEEP_TIMEOUT_SECS);
    }

    #[test]
    fn truncated_record_is_rejected() {
        assert_eq!(
            HudSettings::from_record(&[1, 200, 0]),
            Err(SettingsError::Truncated { len: 3 })
        );
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut buf = record();
        buf[0] = 9;
        assert_eq!(
            HudSettings::from_record(&buf),
            Err(SettingsError::UnsupportedVersion(9))
        );
    }

    #[test]
    fn serialize_buffer_too_small() {
        let mut buf = [0u8; 4];
        assert_eq!(HudSettings::default().serialize(&mut buf), 0);
    }
}
