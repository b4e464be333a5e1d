//! Heading filter.
//!
//! Integrates the Z gyro rate and, while the wrist is roughly level,
//! pulls the result towards the accelerometer tilt with a 0.98 / 0.02
//! complementary blend.

use embedded_hal::delay::DelayNs;

use super::{HeadingEstimate, MotionSensor, OrientationSample};
use crate::config::{IMU_CALIBRATION_INTERVAL_MS, IMU_CALIBRATION_SAMPLES};

/// Blend weight kept from the integrated gyro angle.
const GYRO_WEIGHT: f32 = 0.98;

/// Tilt correction is only applied below this magnitude (degrees).
const TILT_LIMIT_DEG: f32 = 30.0;

#[derive(Debug, Default)]
pub struct OrientationFilter {
    angle: f32,
    offset: f32,
    last_timestamp_ms: Option<u64>,
}

impl OrientationFilter {
    pub const fn new() -> Self {
        Self {
            angle: 0.0,
            offset: 0.0,
            last_timestamp_ms: None,
        }
    }

    pub fn estimate(&self) -> HeadingEstimate {
        HeadingEstimate {
            angle_deg: self.angle,
        }
    }

    /// Gyro Z bias subtracted before integration (deg/s).
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: f32) {
        self.offset = offset;
    }

    /// Zero the heading. The gyro offset is kept.
    pub fn reset_rotation(&mut self) {
        self.angle = 0.0;
    }

    /// Advance the estimate by `dt` seconds.
    pub fn update(&mut self, sample: &OrientationSample, dt: f32) -> HeadingEstimate {
        if dt <= 0.0 || !dt.is_finite() {
            return self.estimate();
        }

        let integrated = self.angle + (sample.gyro_z - self.offset) * dt;
        if !integrated.is_finite() {
            return self.estimate();
        }
        let mut angle = normalize(integrated);

        let [ax, ay, _] = sample.accel;
        let tilt = libm::atan2f(ay, ax).to_degrees();
        if libm::fabsf(tilt) < TILT_LIMIT_DEG {
            angle = normalize(GYRO_WEIGHT * angle + (1.0 - GYRO_WEIGHT) * tilt);
        }

        self.angle = angle;
        self.estimate()
    }

    /// Feed a timestamped sample; the first one only sets the time base.
    pub fn ingest(&mut self, sample: &OrientationSample) -> HeadingEstimate {
        let previous = self.last_timestamp_ms.replace(sample.timestamp_ms);
        match previous {
            Some(prev) if sample.timestamp_ms > prev => {
                let dt = (sample.timestamp_ms - prev) as f32 / 1000.0;
                self.update(sample, dt)
            }
            _ => self.estimate(),
        }
    }

    /// Average the resting Z rate into the offset. The device must be
    /// still. A sensor error aborts and keeps the previous offset.
    pub fn calibrate<S, D>(&mut self, sensor: &mut S, delay: &mut D) -> Result<f32, S::Error>
    where
        S: MotionSensor,
        D: DelayNs,
    {
        info!("Calibrating IMU, keep device still");
        let mut sum = 0.0f32;
        for _ in 0..IMU_CALIBRATION_SAMPLES {
            sum += sensor.read_gyro_z()?;
            delay.delay_ms(IMU_CALIBRATION_INTERVAL_MS);
        }
        self.offset = sum / IMU_CALIBRATION_SAMPLES as f32;
        info!("IMU calibration complete, gyro Z offset {}", self.offset);
        Ok(self.offset)
    }
}

/// Wrap into `[0, 360)`. `fmodf` first so the loops below only ever
/// see values below one turn, whatever the magnitude.
fn normalize(angle: f32) -> f32 {
    let mut angle = libm::fmodf(angle, 360.0);
    while angle < 0.0 {
        angle += 360.0;
    }
    while angle >= 360.0 {
        angle -= 360.0;
    }
    angle
}
