//! Settings record in internal flash.
//!
//! The record lives in a `sequential-storage` map on the nRF52840's
//! internal flash, written by the companion tooling. The firmware only
//! reads it, once, at startup.
//!
//! Storage layout:
//!   - One map entry under `KEY_HUD_SETTINGS` holding the record described
//!     in [`crate::settings`].

use crate::config::{STORAGE_FLASH_PAGE_COUNT, STORAGE_FLASH_PAGE_START};
use crate::error::Error;
use crate::settings::{HudSettings, SETTINGS_RECORD_LEN};

/// Flash page size for nRF52840 (4 KB).
const FLASH_PAGE_SIZE: u32 = 4096;

/// Start address of our storage region.
const STORAGE_START: u32 = STORAGE_FLASH_PAGE_START * FLASH_PAGE_SIZE;

/// End address (exclusive) of our storage region.
const STORAGE_END: u32 = (STORAGE_FLASH_PAGE_START + STORAGE_FLASH_PAGE_COUNT) * FLASH_PAGE_SIZE;

/// Key for the settings record in the map storage.
const KEY_HUD_SETTINGS: u8 = 0x02;

/// Scratch buffer for the map lookup (item header + record).
const READ_BUFFER_SIZE: usize = 64;

/// Read the stored settings.
///
/// A missing record yields the defaults. A record that exists but cannot
/// be used is an error, so the caller can tell the user.
pub async fn load_settings(
    flash: &mut impl embedded_storage_async::nor_flash::NorFlash,
) -> Result<HudSettings, Error> {
    let flash_range = STORAGE_START..STORAGE_END;
    let mut buf = [0u8; READ_BUFFER_SIZE];

    match sequential_storage::map::fetch_item::<u8, &[u8], _>(
        flash,
        flash_range,
        &mut sequential_storage::cache::NoCache::new(),
        &mut buf,
        &KEY_HUD_SETTINGS,
    )
    .await
    {
        Ok(Some(data)) => {
            let settings = HudSettings::from_record(data)?;
            info!(
                "Loaded settings ({} bytes): brightness {}, night {}",
                data.len().min(SETTINGS_RECORD_LEN),
                settings.brightness,
                settings.night_mode
            );
            Ok(settings)
        }
        Ok(None) => {
            info!("No settings in flash, using defaults");
            Ok(HudSettings::default())
        }
        Err(e) => {
            error!("Flash read error: {:?}", defmt::Debug2Format(&e));
            Err(Error::Storage)
        }
    }
}
