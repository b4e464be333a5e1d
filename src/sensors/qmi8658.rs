//! QMI8658 6-axis IMU over I²C.
//!
//! Only the registers the heading filter needs are touched. Axis
//! registers are consecutive little-endian `i16`s starting at `AX_L`,
//! so a whole sample is one 12-byte burst read.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::{MotionSensor, OrientationSample};
use crate::config::{IMU_ACCEL_SCALE, IMU_DEVICE_ID, IMU_GYRO_SCALE, IMU_I2C_ADDR};
use crate::error::ImuError;

const REG_WHO_AM_I: u8 = 0x00;
const REG_CTRL1: u8 = 0x02;
const REG_CTRL2: u8 = 0x03;
const REG_CTRL3: u8 = 0x04;
const REG_CTRL7: u8 = 0x08;
const REG_AX_L: u8 = 0x35;
const REG_GZ_L: u8 = 0x3F;

/// Serial interface setup, address auto-increment.
const CTRL1_VALUE: u8 = 0x60;
/// Accelerometer ±2 g.
const CTRL2_VALUE: u8 = 0x05;
/// Gyroscope ±500 dps.
const CTRL3_VALUE: u8 = 0x55;
/// Accelerometer + gyroscope enabled.
const CTRL7_VALUE: u8 = 0x03;

pub struct Qmi8658<I2C> {
    i2c: I2C,
    address: u8,
    initialized: bool,
}

impl<I2C: I2c> Qmi8658<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: IMU_I2C_ADDR,
            initialized: false,
        }
    }

    /// Check the device id and enable both sensors.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), ImuError<I2C::Error>> {
        let id = self.read_register(REG_WHO_AM_I)?;
        if id != IMU_DEVICE_ID {
            warn!("IMU WHO_AM_I mismatch: {=u8:#x}", id);
            return Err(ImuError::UnknownDevice(id));
        }

        self.write_register(REG_CTRL1, CTRL1_VALUE)?;
        delay.delay_ms(10);
        self.write_register(REG_CTRL2, CTRL2_VALUE)?;
        self.write_register(REG_CTRL3, CTRL3_VALUE)?;
        self.write_register(REG_CTRL7, CTRL7_VALUE)?;
        delay.delay_ms(50);

        self.initialized = true;
        info!("IMU initialized");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, ImuError<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(ImuError::Bus)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), ImuError<I2C::Error>> {
        self.i2c
            .write(self.address, &[reg, value])
            .map_err(ImuError::Bus)
    }

    fn ensure_initialized(&self) -> Result<(), ImuError<I2C::Error>> {
        if self.initialized {
            Ok(())
        } else {
            Err(ImuError::NotInitialized)
        }
    }
}

fn axis(bytes: &[u8], index: usize) -> i16 {
    i16::from_le_bytes([bytes[index * 2], bytes[index * 2 + 1]])
}

impl<I2C: I2c> MotionSensor for Qmi8658<I2C> {
    type Error = ImuError<I2C::Error>;

    fn read_sample(&mut self, now_ms: u64) -> Result<OrientationSample, Self::Error> {
        self.ensure_initialized()?;

        // AX, AY, AZ, GX, GY, GZ
        let mut raw = [0u8; 12];
        self.i2c
            .write_read(self.address, &[REG_AX_L], &mut raw)
            .map_err(ImuError::Bus)?;

        Ok(OrientationSample {
            accel: [
                f32::from(axis(&raw, 0)) * IMU_ACCEL_SCALE,
                f32::from(axis(&raw, 1)) * IMU_ACCEL_SCALE,
                f32::from(axis(&raw, 2)) * IMU_ACCEL_SCALE,
            ],
            gyro_z: f32::from(axis(&raw, 5)) * IMU_GYRO_SCALE,
            timestamp_ms: now_ms,
        })
    }

    fn read_gyro_z(&mut self) -> Result<f32, Self::Error> {
        self.ensure_initialized()?;

        let mut raw = [0u8; 2];
        self.i2c
            .write_read(self.address, &[REG_GZ_L], &mut raw)
            .map_err(ImuError::Bus)?;
        Ok(f32::from(i16::from_le_bytes(raw)) * IMU_GYRO_SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};
    use std::vec::Vec;

    /// Register file with an auto-incrementing pointer.
    struct FakeI2c {
        regs: [u8; 256],
        pointer: u8,
        writes: Vec<(u8, u8)>,
        fail: bool,
    }

    impl FakeI2c {
        fn with_id(id: u8) -> Self {
            let mut regs = [0u8; 256];
            regs[usize::from(REG_WHO_AM_I)] = id;
            Self {
                regs,
                pointer: 0,
                writes: Vec::new(),
                fail: false,
            }
        }

        fn set_axis(&mut self, reg: u8, value: i16) {
            let [lo, hi] = value.to_le_bytes();
            self.regs[usize::from(reg)] = lo;
            self.regs[usize::from(reg) + 1] = hi;
        }
    }

    impl ErrorType for FakeI2c {
        type Error = ErrorKind;
    }

    impl I2c for FakeI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), ErrorKind> {
            assert_eq!(address, IMU_I2C_ADDR);
            if self.fail {
                return Err(ErrorKind::Other);
            }
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        self.pointer = bytes[0];
                        for &value in &bytes[1..] {
                            self.writes.push((self.pointer, value));
                            self.regs[usize::from(self.pointer)] = value;
                            self.pointer = self.pointer.wrapping_add(1);
                        }
                    }
                    Operation::Read(buf) => {
                        for b in buf.iter_mut() {
                            *b = self.regs[usize::from(self.pointer)];
                            self.pointer = self.pointer.wrapping_add(1);
                        }
                    }
                }
            }
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    #[test]
    fn init_writes_control_registers() {
        let mut imu = Qmi8658::new(FakeI2c::with_id(0x05));
        imu.init(&mut NoDelay).unwrap();
        assert!(imu.is_initialized());
        assert_eq!(
            imu.release().writes,
            vec![(0x02, 0x60), (0x03, 0x05), (0x04, 0x55), (0x08, 0x03)]
        );
    }

    #[test]
    fn wrong_device_id_is_rejected() {
        let mut imu = Qmi8658::new(FakeI2c::with_id(0x42));
        assert_eq!(imu.init(&mut NoDelay), Err(ImuError::UnknownDevice(0x42)));
        assert!(!imu.is_initialized());
        assert!(imu.release().writes.is_empty());
    }

    #[test]
    fn bus_error_is_propagated() {
        let mut bus = FakeI2c::with_id(0x05);
        bus.fail = true;
        let mut imu = Qmi8658::new(bus);
        assert_eq!(imu.init(&mut NoDelay), Err(ImuError::Bus(ErrorKind::Other)));
    }

    #[test]
    fn reads_before_init_fail() {
        let mut imu = Qmi8658::new(FakeI2c::with_id(0x05));
        assert_eq!(imu.read_sample(0), Err(ImuError::NotInitialized));
        assert_eq!(imu.read_gyro_z(), Err(ImuError::NotInitialized));
    }

    #[test]
    fn sample_is_scaled() {
        let mut bus = FakeI2c::with_id(0x05);
        bus.set_axis(0x35, 16384); // AX = 1 g
        bus.set_axis(0x37, -8192); // AY = -0.5 g
        bus.set_axis(0x39, 0);
        bus.set_axis(0x3B, 1000); // GX, ignored
        bus.set_axis(0x3F, 262); // GZ = 2 dps

        let mut imu = Qmi8658::new(bus);
        imu.init(&mut NoDelay).unwrap();

        let sample = imu.read_sample(1234).unwrap();
        assert_eq!(sample.accel, [1.0, -0.5, 0.0]);
        assert!((sample.gyro_z - 2.0).abs() < 1e-4);
        assert_eq!(sample.timestamp_ms, 1234);

        assert!((imu.read_gyro_z().unwrap() - 2.0).abs() < 1e-4);
    }
}
