//! Collaborator contracts consumed by the UI core.
//!
//! The state machine is generic over these traits so the whole UI runs on
//! the host under test doubles. The `embedded` feature provides the real
//! implementations in `panel/`.

use crate::settings::Settings;

/// Output stage operating mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputMode {
    Off,
    On,
    /// Closed-loop constant-current regulation; the safe mode forced on
    /// over-temperature acknowledgment.
    Feedback,
}

/// Active current range, selecting the encoder step size and the range
/// maximum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CurrentRange {
    /// 0..=250 mA, 5 mA per detent.
    Low,
    /// 0..=6 A, 20 mA per detent.
    Full,
}

/// Control and measurement surface of the power stage.
///
/// Calibrated getters return micro-units (microamps/microvolts); raw
/// getters return uncorrected ADC counts and exist for calibration only.
pub trait PowerStage {
    /// Command the load current. Implementations clamp to
    /// `[0, range maximum]`.
    fn set_current(&mut self, microamps: i32);
    fn current_setpoint(&self) -> i32;
    fn current_usage(&self) -> i32;
    fn voltage(&self) -> i32;

    /// Uncorrected ADC voltage reading, in counts.
    fn raw_voltage(&self) -> i16;
    /// Uncorrected ADC current reading, in counts.
    fn raw_current_usage(&self) -> i16;

    fn current_range(&self) -> CurrentRange;

    fn output_mode(&self) -> OutputMode;
    fn set_output_mode(&mut self, mode: OutputMode);

    /// Write the sense amplifier's offset trim register (0..32). Used
    /// only by the calibration trim sweep.
    fn set_opamp_trim(&mut self, value: u8);

    /// Measured-minus-commanded current differential in raw counts, read
    /// after a trim write has settled. The trim sweep stops when this
    /// goes non-positive.
    fn current_sense_error(&self) -> i32;
}

/// The front-panel display. Rows are 8-pixel line units, columns are
/// pixels; text glyphs are 12 px wide and two rows tall.
pub trait FrontPanel {
    /// Clear the whole display.
    fn clear_all(&mut self);

    /// Fill the region `[row0, row1) x [col0, col1)` with a column byte
    /// pattern (0x00 blank, 0xFF solid).
    fn clear(&mut self, row0: u8, col0: u8, row1: u8, col1: u8, fill: u8);

    fn draw_text(&mut self, row: u8, col: u8, text: &str, inverted: bool);

    /// Draw the main readout in large (4-row) digits.
    fn draw_big_numbers(&mut self, row: u8, col: u8, text: &str);

    /// Set panel contrast, 0..=63.
    fn set_contrast(&mut self, level: u8);
}

/// Persists the settings block.
pub trait SettingsStore {
    /// Atomically replace the stored settings with `settings`, whole
    /// block at once: a concurrent reader sees either the old block or
    /// the new one, never a mix. Failures are the implementation's to
    /// log; the UI does not retry.
    fn save(&mut self, settings: &Settings);
}
