//! Application-wide constants and compile-time configuration.
//!
//! Panel geometry, timing parameters, and protocol constants live here
//! so they can be tuned in one place. Runtime preferences live in
//! [`crate::settings`].

// Display

/// Round AMOLED panel resolution (pixels).
pub const DISPLAY_WIDTH: u16 = 466;
pub const DISPLAY_HEIGHT: u16 = 466;

/// Radius of the visible circle, centred on the panel.
pub const DISPLAY_RADIUS: u16 = 233;

/// SPI clock for the display bus (Hz).
pub const DISPLAY_SPI_FREQ_HZ: u32 = 32_000_000;

// Main loop

/// Polling loop period (ms). 50 ms = 20 updates per second.
pub const POLL_PERIOD_MS: u64 = 50;

// BLE

/// Name advertised to the phone.
pub const BLE_DEVICE_NAME: &str = "NAV-HUD";

/// Navigation service UUID (the sender's service).
pub const NAV_SERVICE_UUID: &str = "DD3F0AD1-6239-4E1F-81F1-91F6C9F01D86";

/// Navigation characteristic UUID (read / write / notify).
pub const NAV_CHARACTERISTIC_UUID: &str = "5D0360B2-2D3B-4BDC-B688-E1EC92394B8C";

/// Navigation service UUID in over-the-air (little-endian) byte order.
pub const NAV_SERVICE_UUID_LE: [u8; 16] = [
    0x86, 0x1D, 0xF0, 0xC9, 0xF6, 0x91, 0xF1, 0x81, 0x1F, 0x4E, 0x39, 0x62, 0xD1, 0x0A, 0x3F,
    0xDD,
];

/// Advertising interval (in 0.625 ms units). 160 = 100 ms.
pub const BLE_ADV_INTERVAL: u32 = 160;

/// Largest navigation write we accept from the phone.
pub const NAV_FRAME_MAX_LEN: usize = 20;

// Motion sensor (QMI8658)

/// QMI8658 7-bit I²C address.
pub const IMU_I2C_ADDR: u8 = 0x6B;

/// Expected WHO_AM_I value.
pub const IMU_DEVICE_ID: u8 = 0x05;

/// Accelerometer scale at ±2 g (g per LSB).
pub const IMU_ACCEL_SCALE: f32 = 1.0 / 16384.0;

/// Gyroscope scale (dps per LSB).
pub const IMU_GYRO_SCALE: f32 = 1.0 / 131.0;

/// Number of stationary samples averaged during gyro calibration.
pub const IMU_CALIBRATION_SAMPLES: u32 = 100;

/// Spacing between calibration samples (ms).
pub const IMU_CALIBRATION_INTERVAL_MS: u32 = 10;

// Settings storage

/// Flash page index where settings storage starts (4 KB per page on nRF52840).
pub const STORAGE_FLASH_PAGE_START: u32 = 240;

/// Number of flash pages reserved for settings storage.
pub const STORAGE_FLASH_PAGE_COUNT: u32 = 4;
