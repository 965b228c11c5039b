//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters, encoder step sizes, and calibration defaults
//! live here so they can be tuned in one place.

// Event pipeline

/// Monotonic tick rate (ticks per second). One tick = 1 ms.
pub const TICK_HZ: u32 = 1000;

/// UI sampling window: with no real input, a synthetic ADC-reading event
/// is produced at least this often (~10 Hz redraw cadence).
pub const SAMPLE_INTERVAL_TICKS: u32 = TICK_HZ / 10;

/// Minimum spacing between accepted button presses (~100 ms).
/// Anything faster is treated as contact bounce.
pub const BUTTON_DEBOUNCE_TICKS: u32 = TICK_HZ / 10;

/// Event queue depth. Deliberately small: producers are rate-limited at
/// the source, so two slots are enough and overflow just drops the event.
pub const EVENT_QUEUE_DEPTH: usize = 2;

/// Button id reported by the encoder's push switch (the confirm button).
pub const SELECT_BUTTON: u8 = 1;

// Current control

/// How much does one encoder detent adjust the current? (microamps)
pub const CURRENT_LOWRANGE_STEP: i32 = 5_000; // 5 mA
pub const CURRENT_FULLRANGE_STEP: i32 = 20_000; // 20 mA

/// What's the maximum current? (microamps)
pub const CURRENT_LOWRANGE_MAX: i32 = 250_000; // 250 mA
pub const CURRENT_FULLRANGE_MAX: i32 = 6_000_000; // 6 A

// Calibration

/// Test current commanded during the opamp trim sweep (microamps).
pub const CAL_TEST_CURRENT: i32 = 100_000; // 100 mA

/// One encoder detent nudges a gain by gain/GAIN_NUDGE_DIVISOR (~0.2%).
pub const GAIN_NUDGE_DIVISOR: i32 = 500;

/// Number of opamp offset trim register settings (0..OPAMP_TRIM_STEPS).
pub const OPAMP_TRIM_STEPS: u8 = 32;

/// Default calibration constants, used until the first calibration run.
pub const DEFAULT_DAC_HIGH_GAIN: i32 = 21_157; // microamps per DAC count
pub const DEFAULT_DAC_LOW_GAIN: i32 = 186; // microamps per DAC count
pub const DEFAULT_DAC_OFFSET: i32 = 0; // counts
pub const DEFAULT_OPAMP_OFFSET_TRIM: i32 = 0x24;
pub const DEFAULT_ADC_CURRENT_OFFSET: i32 = -35; // counts
pub const DEFAULT_ADC_CURRENT_GAIN: i32 = 599; // microamps per count
pub const DEFAULT_ADC_VOLTAGE_OFFSET: i32 = 0; // counts
pub const DEFAULT_ADC_VOLTAGE_GAIN: i32 = 2008; // microvolts per count

// Display

/// Display width in pixels and text cell width (fixed 12-px glyphs).
pub const DISPLAY_COLS: u8 = 160;
pub const TEXT_CELL_PX: u8 = 12;

/// Menu page height in text rows (one row is lost to a title).
pub const MENU_PAGE_ROWS: usize = 4;

/// Contrast and backlight levels range over 0..=63.
pub const CONTRAST_MAX: u8 = 0x3F;
pub const DEFAULT_LCD_CONTRAST: u8 = 32;
pub const DEFAULT_BACKLIGHT: u8 = 48;

/// How long the startup splash stays up (ticks), with the `splash` feature.
pub const SPLASH_TICKS: u32 = 3 * TICK_HZ;

// Settings storage

/// Flash page index where the settings store starts (4 KB per page on
/// nRF52840).
pub const SETTINGS_FLASH_PAGE_START: u32 = 252;

/// Number of flash pages reserved for the settings store.
pub const SETTINGS_FLASH_PAGE_COUNT: u32 = 4;
