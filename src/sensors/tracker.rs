//! Sensor + filter pair exposed to the polling loop.

use embedded_hal::delay::DelayNs;

use super::{HeadingSource, MotionSensor, OrientationFilter};

pub struct OrientationTracker<S> {
    sensor: S,
    filter: OrientationFilter,
    has_new_data: bool,
    read_errors: u32,
}

impl<S: MotionSensor> OrientationTracker<S> {
    /// Wrap an initialized sensor.
    pub fn new(sensor: S) -> Self {
        Self {
            sensor,
            filter: OrientationFilter::new(),
            has_new_data: false,
            read_errors: 0,
        }
    }

    /// Measure the gyro bias. Keep the device still.
    pub fn calibrate<D: DelayNs>(&mut self, delay: &mut D) -> Result<f32, S::Error> {
        self.filter.calibrate(&mut self.sensor, delay)
    }

    /// Read one sample and advance the heading. Returns false when the
    /// sensor could not be read.
    pub fn read_data(&mut self, now_ms: u64) -> bool {
        match self.sensor.read_sample(now_ms) {
            Ok(sample) => {
                self.filter.ingest(&sample);
                self.has_new_data = true;
                true
            }
            Err(_) => {
                self.read_errors = self.read_errors.saturating_add(1);
                if self.read_errors == 1 {
                    warn!("IMU read failed");
                }
                false
            }
        }
    }

    pub fn has_new_data(&self) -> bool {
        self.has_new_data
    }

    /// Current heading, clearing the new-data flag.
    pub fn take_rotation(&mut self) -> f32 {
        self.has_new_data = false;
        self.filter.estimate().angle_deg
    }

    /// Current heading without touching the flag.
    pub fn rotation(&self) -> f32 {
        self.filter.estimate().angle_deg
    }

    pub fn reset_rotation(&mut self) {
        self.filter.reset_rotation();
    }

    pub fn read_errors(&self) -> u32 {
        self.read_errors
    }

    pub fn filter(&self) -> &OrientationFilter {
        &self.filter
    }
}

impl<S: MotionSensor> HeadingSource for OrientationTracker<S> {
    fn read_data(&mut self, now_ms: u64) -> bool {
        OrientationTracker::read_data(self, now_ms)
    }

    fn has_new_data(&self) -> bool {
        OrientationTracker::has_new_data(self)
    }

    fn take_rotation(&mut self) -> f32 {
        OrientationTracker::take_rotation(self)
    }
}
