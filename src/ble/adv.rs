//! Advertising payload builder.
//!
//! The HUD advertises the navigation service UUID in the advertising
//! packet and its name in the scan response, so the phone app can filter
//! on the service while still showing a readable name.

use heapless::Vec;

use crate::config::{BLE_DEVICE_NAME, NAV_SERVICE_UUID_LE};

/// Legacy advertising payload limit.
pub const ADV_PAYLOAD_MAX: usize = 31;

pub type AdvPayload = Vec<u8, ADV_PAYLOAD_MAX>;

const AD_FLAGS: u8 = 0x01;
const AD_COMPLETE_128: u8 = 0x07;
const AD_SHORT_NAME: u8 = 0x08;
const AD_COMPLETE_NAME: u8 = 0x09;

/// LE General Discoverable, BR/EDR not supported.
const FLAGS_GENERAL_DISC: u8 = 0x06;

/// Advertising packet: flags + complete list of 128-bit service UUIDs.
pub fn advertising_data() -> AdvPayload {
    let mut data = AdvPayload::new();
    push_field(&mut data, AD_FLAGS, &[FLAGS_GENERAL_DISC]);
    push_field(&mut data, AD_COMPLETE_128, &NAV_SERVICE_UUID_LE);
    data
}

/// Scan response: complete local name, shortened if it does not fit.
pub fn scan_response_data() -> AdvPayload {
    let mut data = AdvPayload::new();
    let name = BLE_DEVICE_NAME.as_bytes();
    let room = ADV_PAYLOAD_MAX - 2;
    if name.len() <= room {
        push_field(&mut data, AD_COMPLETE_NAME, name);
    } else {
        push_field(&mut data, AD_SHORT_NAME, &name[..room]);
    }
    data
}

fn push_field(data: &mut AdvPayload, ad_type: u8, payload: &[u8]) {
    if data.len() + payload.len() + 2 > ADV_PAYLOAD_MAX {
        return;
    }
    let _ = data.push(payload.len() as u8 + 1);
    let _ = data.push(ad_type);
    let _ = data.extend_from_slice(payload);
}
