//! Motion sensing: raw samples in, a wrist heading out.
//!
//! ## Components
//!
//! - **Filter**: gyro integration with accelerometer drift correction
//! - **QMI8658**: register driver over `embedded-hal` I²C
//! - **Tracker**: sensor + filter behind a pull-and-clear surface

pub mod filter;
pub mod qmi8658;
pub mod tracker;

pub use filter::OrientationFilter;
pub use qmi8658::Qmi8658;
pub use tracker::OrientationTracker;

/// One motion reading in physical units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OrientationSample {
    /// Acceleration in g, `[x, y, z]`.
    pub accel: [f32; 3],
    /// Rotation rate about Z in degrees per second.
    pub gyro_z: f32,
    pub timestamp_ms: u64,
}

/// Current heading in degrees, always in `[0, 360)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeadingEstimate {
    pub angle_deg: f32,
}

/// Anything that can produce motion samples.
pub trait MotionSensor {
    type Error;

    /// Full reading, stamped with `now_ms`.
    fn read_sample(&mut self, now_ms: u64) -> Result<OrientationSample, Self::Error>;

    /// Z rotation rate only (deg/s), used for calibration.
    fn read_gyro_z(&mut self) -> Result<f32, Self::Error>;
}

/// Polled heading provider, as seen by the main loop.
pub trait HeadingSource {
    /// Take one reading. False if the sensor could not be read.
    fn read_data(&mut self, now_ms: u64) -> bool;

    fn has_new_data(&self) -> bool;

    /// Heading in degrees, clearing the new-data flag.
    fn take_rotation(&mut self) -> f32;
}
