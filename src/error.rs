//! Error types for nav-hud.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for on-target
//! logging.

/// A BLE navigation payload could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Fewer than the 7 bytes a navigation frame needs.
    TooShort { len: usize },
}

/// Motion sensor failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ImuError<E> {
    /// I²C transaction failed.
    Bus(E),
    /// WHO_AM_I returned something other than the expected device id.
    UnknownDevice(u8),
    /// `read_data` called before a successful `init`.
    NotInitialized,
}

/// Stored settings record could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Record shorter than the fixed layout.
    Truncated { len: usize },
    /// Record written by an unknown layout version.
    UnsupportedVersion(u8),
}

/// Top-level error type used by the firmware bring-up path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Navigation payload rejected.
    Decode(DecodeError),
    /// Motion sensor missing or not answering.
    Imu,
    /// Settings record unusable.
    Settings(SettingsError),
    /// Flash read failed.
    Storage,
    /// Display bus transfer failed.
    Display,
    /// BLE stack returned an error.
    Ble,
}

impl Error {
    /// Short text suitable for the on-screen error page.
    pub fn message(&self) -> &'static str {
        match self {
            Error::Decode(_) => "Bad nav data",
            Error::Imu => "IMU not found",
            Error::Settings(_) => "Settings error",
            Error::Storage => "Storage error",
            Error::Display => "Display error",
            Error::Ble => "BLE error",
        }
    }
}

// Convenience conversions

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Error::Decode(e)
    }
}

impl From<SettingsError> for Error {
    fn from(e: SettingsError) -> Self {
        Error::Settings(e)
    }
}

impl<E> From<ImuError<E>> for Error {
    fn from(_: ImuError<E>) -> Self {
        Error::Imu
    }
}
