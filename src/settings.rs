//! Calibration constants and panel preferences.
//!
//! One flat `Copy` block, persisted atomically as a whole. The UI task
//! owns the live copy; calibration mutates a private scratch copy and
//! commits it in a single [`crate::hal::SettingsStore::save`].

use crate::config;

/// What a readout slot displays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Readout {
    None = 0,
    CurrentSetpoint = 1,
    CurrentUsage = 2,
    Voltage = 3,
    Power = 4,
    Resistance = 5,
}

impl Readout {
    /// Decode a persisted/menu value; unknown values read back as `None`.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Readout::CurrentSetpoint,
            2 => Readout::CurrentUsage,
            3 => Readout::Voltage,
            4 => Readout::Power,
            5 => Readout::Resistance,
            _ => Readout::None,
        }
    }
}

/// Which readout occupies each display slot: main (large digits), then
/// bottom-left and bottom-right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    pub readouts: [Readout; 3],
}

/// The persisted settings block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// Microamps per DAC count, low / full range.
    pub dac_low_gain: i32,
    pub dac_high_gain: i32,
    /// DAC zero offset in counts, low / full range.
    pub dac_low_offset: i32,
    pub dac_high_offset: i32,
    /// Sense amplifier offset trim register value.
    pub opamp_offset_trim: i32,

    /// ADC current reading offset in counts.
    pub adc_current_offset: i32,
    /// Microamps per ADC count.
    pub adc_current_gain: i32,

    /// ADC voltage reading offset in counts.
    pub adc_voltage_offset: i32,
    /// Microvolts per ADC count.
    pub adc_voltage_gain: i32,

    /// Panel levels, 0..=63.
    pub backlight_brightness: u8,
    pub lcd_contrast: u8,

    pub display: DisplayConfig,
}

impl Settings {
    /// Factory values, used until the first calibration run is saved.
    pub const fn factory() -> Self {
        Self {
            dac_low_gain: config::DEFAULT_DAC_LOW_GAIN,
            dac_high_gain: config::DEFAULT_DAC_HIGH_GAIN,
            dac_low_offset: config::DEFAULT_DAC_OFFSET,
            dac_high_offset: config::DEFAULT_DAC_OFFSET,
            opamp_offset_trim: config::DEFAULT_OPAMP_OFFSET_TRIM,
            adc_current_offset: config::DEFAULT_ADC_CURRENT_OFFSET,
            adc_current_gain: config::DEFAULT_ADC_CURRENT_GAIN,
            adc_voltage_offset: config::DEFAULT_ADC_VOLTAGE_OFFSET,
            adc_voltage_gain: config::DEFAULT_ADC_VOLTAGE_GAIN,
            backlight_brightness: config::DEFAULT_BACKLIGHT,
            lcd_contrast: config::DEFAULT_LCD_CONTRAST,
            display: DisplayConfig {
                readouts: [
                    Readout::CurrentSetpoint,
                    Readout::CurrentUsage,
                    Readout::Voltage,
                ],
            },
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::factory()
    }
}
