//! nav-hud - Round-display navigation HUD
//!
//! Turn-by-turn events written over BLE by the phone are drawn on a
//! 466×466 round AMOLED; a QMI8658 IMU turns the picture with the wrist.
//!
//! Hardware: nRF52840 (SoftDevice S140), SH8601/CO5300 AMOLED on SPIM3,
//! QMI8658 on TWIM0.
//!
//! # Architecture
//!
//! - SoftDevice task: runs the BLE stack
//! - BLE task: advertises, serves the GATT characteristic, fills the inbox
//! - Main task: 20 Hz polling loop, the only place that draws

#![no_std]
#![no_main]

use defmt::{info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Level, Output, OutputDrive};
use embassy_nrf::interrupt::Priority;
use embassy_nrf::{bind_interrupts, peripherals, spim, twim};
use embassy_time::{Delay, Duration, Instant, Ticker};
use embedded_hal_bus::spi::ExclusiveDevice;
use nrf_softdevice::{raw, Softdevice};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use nav_hud::app;
use nav_hud::ble::{gatt, NavInbox};
use nav_hud::config::{BLE_DEVICE_NAME, POLL_PERIOD_MS};
use nav_hud::error::Error;
use nav_hud::power_logic::SleepTracker;
use nav_hud::render::amoled::AmoledBus;
use nav_hud::render::{Canvas, Geometry};
use nav_hud::sensors::{HeadingSource, OrientationTracker, Qmi8658};
use nav_hud::settings::HudSettings;
use nav_hud::storage;
use nav_hud::ui::Hud;

bind_interrupts!(struct Irqs {
    SPIM3 => spim::InterruptHandler<peripherals::SPI3>;
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

/// Single-slot hand-off between the BLE task and the polling loop.
static INBOX: NavInbox = NavInbox::new();

static SERVER: StaticCell<gatt::Server> = StaticCell::new();

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn ble_task(sd: &'static Softdevice, server: &'static gatt::Server, settings: HudSettings) {
    gatt::run(sd, server, &INBOX, &settings).await;
}

fn softdevice_config() -> nrf_softdevice::Config {
    nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 64 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: BLE_DEVICE_NAME.as_ptr() as _,
            current_len: BLE_DEVICE_NAME.len() as u16,
            max_len: BLE_DEVICE_NAME.len() as u16,
            write_perm: unsafe { core::mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("nav-hud starting");

    // The SoftDevice owns the highest interrupt priorities.
    let mut config = embassy_nrf::config::Config::default();
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(config);

    let sd = Softdevice::enable(&softdevice_config());
    let server = SERVER.init(unwrap!(gatt::Server::new(sd)));
    unwrap!(spawner.spawn(softdevice_task(sd)));

    // Settings (read once)
    let mut flash = nrf_softdevice::Flash::take(sd);
    let (settings, settings_error) = match storage::load_settings(&mut flash).await {
        Ok(settings) => (settings, None),
        Err(e) => (HudSettings::default(), Some(e)),
    };

    // Display: SCK P0.14, MOSI P0.13, CS P0.15
    let mut spi_config = spim::Config::default();
    spi_config.frequency = spim::Frequency::M32;
    let spi = spim::Spim::new_txonly(p.SPI3, Irqs, p.P0_14, p.P0_13, spi_config);
    let cs = Output::new(p.P0_15, Level::High, OutputDrive::Standard);
    let mut panel = AmoledBus::new(unwrap!(ExclusiveDevice::new_no_delay(spi, cs)));

    let mut delay = Delay;
    let display_error = match panel.init(&mut delay) {
        Ok(()) => {
            if panel.set_brightness(settings.brightness).is_err() {
                warn!("Could not set brightness");
            }
            None
        }
        Err(_) => {
            warn!("AMOLED init failed");
            Some(Error::Display)
        }
    };

    let mut hud = Hud::new(Canvas::new(panel, Geometry::default()), &settings);
    hud.show_startup();
    if let Some(e) = display_error.or(settings_error) {
        hud.show_error(e.message());
    }

    // Motion sensor: SDA P0.26, SCL P0.27
    let twi = twim::Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let mut imu = Qmi8658::new(twi);
    let mut tracker = match imu.init(&mut delay) {
        Ok(()) => {
            let mut tracker = OrientationTracker::new(imu);
            if let Err(e) = tracker.calibrate(&mut delay) {
                warn!("IMU calibration failed: {:?}", e);
            }
            Some(tracker)
        }
        Err(e) => {
            warn!("IMU unavailable, auto-rotation off: {:?}", e);
            None
        }
    };

    unwrap!(spawner.spawn(ble_task(sd, server, settings)));

    let mut power = SleepTracker::new(&settings, Instant::now().as_millis());
    let mut ticker = Ticker::every(Duration::from_millis(POLL_PERIOD_MS));
    info!("nav-hud running");

    loop {
        let now_ms = Instant::now().as_millis();
        let heading = tracker.as_mut().map(|t| t as &mut dyn HeadingSource);
        app::poll(&mut hud, &INBOX, heading, &mut power, now_ms);
        ticker.next().await;
    }
}
