//! Navigation GATT server on the SoftDevice.
//!
//! One service, one characteristic. The phone writes frames to it; the
//! write handler hands the bytes to the [`NavInbox`] and returns. It
//! never touches the display.

use embassy_time::Timer;
use heapless::Vec;
use nrf_softdevice::ble::{gatt_server, peripheral};
use nrf_softdevice::Softdevice;

use super::{adv, NavInbox};
use crate::config::{BLE_ADV_INTERVAL, NAV_FRAME_MAX_LEN};
use crate::settings::HudSettings;

#[nrf_softdevice::gatt_service(uuid = "DD3F0AD1-6239-4E1F-81F1-91F6C9F01D86")]
pub struct NavService {
    #[characteristic(uuid = "5D0360B2-2D3B-4BDC-B688-E1EC92394B8C", read, write, notify)]
    pub frame: Vec<u8, NAV_FRAME_MAX_LEN>,
}

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub nav: NavService,
}

/// Advertise, serve one connection, repeat.
///
/// After a disconnect the task waits `reconnect_delay_ms` and advertises
/// again. With `auto_connect` off it stops after the first connection.
pub async fn run(sd: &'static Softdevice, server: &Server, inbox: &NavInbox, settings: &HudSettings) {
    let adv_data = adv::advertising_data();
    let scan_data = adv::scan_response_data();
    let config = peripheral::Config {
        interval: BLE_ADV_INTERVAL,
        ..Default::default()
    };
    let reconnect_delay = u64::from(settings.reconnect_delay_ms);

    loop {
        info!("BLE advertising started");
        let advertisement = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &adv_data,
            scan_data: &scan_data,
        };
        let conn = match peripheral::advertise_connectable(sd, advertisement, &config).await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Advertising failed: {:?}", e);
                Timer::after_millis(reconnect_delay).await;
                continue;
            }
        };

        inbox.on_connect();
        let reason = gatt_server::run(&conn, server, |event| match event {
            ServerEvent::Nav(NavServiceEvent::FrameWrite(data)) => {
                // Rejections are logged by the inbox.
                let _ = inbox.on_write(&data);
            }
            ServerEvent::Nav(NavServiceEvent::FrameCccdWrite { notifications }) => {
                debug!("Nav notifications: {}", notifications);
            }
        })
        .await;
        inbox.on_disconnect();
        info!("BLE link closed: {:?}", reason);

        if !settings.auto_connect {
            info!("Auto-connect disabled, advertising stopped");
            return;
        }
        Timer::after_millis(reconnect_delay).await;
    }
}
