//! Settings persistence.
//!
//! Uses the nRF52840's internal flash via the `sequential-storage` map
//! (which handles wear levelling and GC across the reserved pages).
//!
//! [`FlashStore::save`] is called from the synchronous UI dispatch, so
//! it does two things without blocking: replace the published
//! [`LIVE_SETTINGS`] block under a critical section (whole-block, so a
//! concurrent reader never sees a torn mix of old and new), and hand the
//! settings to the flash writer task through a signal.

use core::cell::Cell;

use defmt::{error, info, warn};
use embassy_nrf::nvmc::Nvmc;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use embedded_storage::nor_flash::{
    NorFlash as BlockingNorFlash, ReadNorFlash as BlockingReadNorFlash,
};
use embedded_storage_async::nor_flash as async_flash;

use crate::config::{SETTINGS_FLASH_PAGE_COUNT, SETTINGS_FLASH_PAGE_START};
use crate::error::Error;
use crate::hal::SettingsStore;
use crate::settings::{DisplayConfig, Readout, Settings};

/// Flash page size for nRF52840 (4 KB).
const FLASH_PAGE_SIZE: u32 = 4096;

/// Start / end addresses of the reserved storage region.
const STORAGE_START: u32 = SETTINGS_FLASH_PAGE_START * FLASH_PAGE_SIZE;
const STORAGE_END: u32 = (SETTINGS_FLASH_PAGE_START + SETTINGS_FLASH_PAGE_COUNT) * FLASH_PAGE_SIZE;

/// Key for the settings block in the map storage.
const KEY_SETTINGS: u8 = 0x01;

/// Serialized block layout: version byte, nine i32 calibration fields,
/// two level bytes, three readout selectors.
const BLOB_VERSION: u8 = 1;
const BLOB_LEN: usize = 1 + 9 * 4 + 2 + 3;

/// Working buffer for sequential-storage operations.
const BUF_LEN: usize = 128;

/// The live settings block other subsystems (the control loop) sample.
pub static LIVE_SETTINGS: Mutex<CriticalSectionRawMutex, Cell<Settings>> =
    Mutex::new(Cell::new(Settings::factory()));

/// Snapshot of the live settings.
pub fn live_settings() -> Settings {
    LIVE_SETTINGS.lock(|cell| cell.get())
}

static SAVE_SIGNAL: Signal<CriticalSectionRawMutex, Settings> = Signal::new();

/// `SettingsStore` backed by [`LIVE_SETTINGS`] and the flash writer
/// task.
pub struct FlashStore;

impl SettingsStore for FlashStore {
    fn save(&mut self, settings: &Settings) {
        LIVE_SETTINGS.lock(|cell| cell.set(*settings));
        SAVE_SIGNAL.signal(*settings);
    }
}

/// Internal flash behind the async NOR interface sequential-storage
/// expects (NVMC operations are blocking but short).
pub struct PanelFlash {
    nvmc: Nvmc<'static>,
}

impl PanelFlash {
    pub fn new(nvmc: Nvmc<'static>) -> Self {
        Self { nvmc }
    }
}

impl async_flash::ErrorType for PanelFlash {
    type Error = embassy_nrf::nvmc::Error;
}

impl async_flash::ReadNorFlash for PanelFlash {
    const READ_SIZE: usize = <Nvmc<'static> as BlockingReadNorFlash>::READ_SIZE;

    async fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        self.nvmc.read(offset, bytes)
    }

    fn capacity(&self) -> usize {
        self.nvmc.capacity()
    }
}

impl async_flash::NorFlash for PanelFlash {
    const WRITE_SIZE: usize = <Nvmc<'static> as BlockingNorFlash>::WRITE_SIZE;
    const ERASE_SIZE: usize = <Nvmc<'static> as BlockingNorFlash>::ERASE_SIZE;

    async fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        self.nvmc.write(offset, bytes)
    }

    async fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        self.nvmc.erase(from, to)
    }
}

fn encode(settings: &Settings) -> [u8; BLOB_LEN] {
    let mut out = [0u8; BLOB_LEN];
    out[0] = BLOB_VERSION;

    let mut offset = 1;
    for value in [
        settings.dac_low_gain,
        settings.dac_high_gain,
        settings.dac_low_offset,
        settings.dac_high_offset,
        settings.opamp_offset_trim,
        settings.adc_current_offset,
        settings.adc_current_gain,
        settings.adc_voltage_offset,
        settings.adc_voltage_gain,
    ] {
        out[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        offset += 4;
    }

    out[offset] = settings.backlight_brightness;
    out[offset + 1] = settings.lcd_contrast;
    offset += 2;

    for readout in settings.display.readouts {
        out[offset] = readout as u8;
        offset += 1;
    }

    out
}

fn decode(data: &[u8]) -> Result<Settings, Error> {
    if data.len() != BLOB_LEN || data[0] != BLOB_VERSION {
        return Err(Error::InvalidSettings);
    }

    let mut offset = 1;
    let mut fields = [0i32; 9];
    for field in &mut fields {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&data[offset..offset + 4]);
        *field = i32::from_le_bytes(bytes);
        offset += 4;
    }

    let backlight_brightness = data[offset];
    let lcd_contrast = data[offset + 1];
    offset += 2;

    let readouts = [
        Readout::from_u8(data[offset]),
        Readout::from_u8(data[offset + 1]),
        Readout::from_u8(data[offset + 2]),
    ];

    Ok(Settings {
        dac_low_gain: fields[0],
        dac_high_gain: fields[1],
        dac_low_offset: fields[2],
        dac_high_offset: fields[3],
        opamp_offset_trim: fields[4],
        adc_current_offset: fields[5],
        adc_current_gain: fields[6],
        adc_voltage_offset: fields[7],
        adc_voltage_gain: fields[8],
        backlight_brightness,
        lcd_contrast,
        display: DisplayConfig { readouts },
    })
}

/// Load the stored settings (falling back to factory values) and publish
/// them as the live block.
pub async fn load_or_default(flash: &mut PanelFlash) -> Settings {
    let mut buf = [0u8; BUF_LEN];

    let settings = match sequential_storage::map::fetch_item::<u8, &[u8], _>(
        flash,
        STORAGE_START..STORAGE_END,
        &mut sequential_storage::cache::NoCache::new(),
        &mut buf,
        &KEY_SETTINGS,
    )
    .await
    {
        Ok(Some(data)) => match decode(data) {
            Ok(settings) => {
                info!("settings loaded from flash");
                settings
            }
            Err(_) => {
                warn!("stored settings invalid - using factory defaults");
                Settings::factory()
            }
        },
        Ok(None) => {
            info!("no stored settings - using factory defaults");
            Settings::factory()
        }
        Err(e) => {
            error!("flash read error: {:?}", defmt::Debug2Format(&e));
            Settings::factory()
        }
    };

    LIVE_SETTINGS.lock(|cell| cell.set(settings));
    settings
}

/// Owns the flash and performs the actual writes queued by
/// [`FlashStore::save`].
#[embassy_executor::task]
pub async fn flash_writer_task(mut flash: PanelFlash) -> ! {
    loop {
        let settings = SAVE_SIGNAL.wait().await;
        let blob = encode(&settings);
        let item: &[u8] = &blob;

        let mut buf = [0u8; BUF_LEN];
        match sequential_storage::map::store_item::<u8, &[u8], _>(
            &mut flash,
            STORAGE_START..STORAGE_END,
            &mut sequential_storage::cache::NoCache::new(),
            &mut buf,
            &KEY_SETTINGS,
            &item,
        )
        .await
        {
            Ok(()) => info!("settings saved"),
            Err(e) => error!("flash write error: {:?}", defmt::Debug2Format(&e)),
        }
    }
}
