//! Integration test: a full front-panel session driven event by event
//! through the public API, against scripted hardware doubles.

use eload_panel::config::SELECT_BUTTON;
use eload_panel::event::{Event, EventKind, Ticks};
use eload_panel::hal::{CurrentRange, FrontPanel, OutputMode, PowerStage, SettingsStore};
use eload_panel::settings::Readout;
use eload_panel::ui::ScreenId;
use eload_panel::{Settings, Ui};

struct ScriptedPower {
    setpoint: i32,
    mode: OutputMode,
    raw_volts: i16,
    raw_current: i16,
    trim_threshold: i32,
    last_trim: i32,
}

impl ScriptedPower {
    fn new() -> Self {
        Self {
            setpoint: 0,
            mode: OutputMode::On,
            raw_volts: 2500,
            raw_current: 40,
            trim_threshold: 7,
            last_trim: 0,
        }
    }
}

impl PowerStage for ScriptedPower {
    fn set_current(&mut self, microamps: i32) {
        self.setpoint = microamps;
    }
    fn current_setpoint(&self) -> i32 {
        self.setpoint
    }
    fn current_usage(&self) -> i32 {
        self.setpoint
    }
    fn voltage(&self) -> i32 {
        5_000_000
    }
    fn raw_voltage(&self) -> i16 {
        self.raw_volts
    }
    fn raw_current_usage(&self) -> i16 {
        self.raw_current
    }
    fn current_range(&self) -> CurrentRange {
        CurrentRange::Full
    }
    fn output_mode(&self) -> OutputMode {
        self.mode
    }
    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }
    fn set_opamp_trim(&mut self, value: u8) {
        self.last_trim = i32::from(value);
    }
    fn current_sense_error(&self) -> i32 {
        self.trim_threshold - self.last_trim
    }
}

struct NullDisplay;

impl FrontPanel for NullDisplay {
    fn clear_all(&mut self) {}
    fn clear(&mut self, _row0: u8, _col0: u8, _row1: u8, _col1: u8, _fill: u8) {}
    fn draw_text(&mut self, _row: u8, _col: u8, _text: &str, _inverted: bool) {}
    fn draw_big_numbers(&mut self, _row: u8, _col: u8, _text: &str) {}
    fn set_contrast(&mut self, _level: u8) {}
}

/// Persistence double; commits are visible through `Ui::settings()`.
struct MemoryStore;

impl SettingsStore for MemoryStore {
    fn save(&mut self, _settings: &Settings) {}
}

struct Session {
    ui: Ui<ScriptedPower, NullDisplay, MemoryStore>,
    now: Ticks,
}

impl Session {
    fn new() -> Self {
        Self {
            ui: Ui::new(
                ScriptedPower::new(),
                NullDisplay,
                MemoryStore,
                Settings::factory(),
                0,
            ),
            now: 0,
        }
    }

    fn feed(&mut self, kind: EventKind) {
        self.now += 100;
        self.ui.handle_event(Event {
            kind,
            when: self.now,
        });
    }

    fn press(&mut self) {
        self.feed(EventKind::ButtonPress(SELECT_BUTTON));
    }

    fn spin(&mut self, detents: i8) {
        self.feed(EventKind::UpDown(detents));
    }

    fn sample(&mut self) {
        self.feed(EventKind::AdcReading);
    }
}

#[test]
fn front_panel_session_end_to_end() {
    let mut session = Session::new();
    assert_eq!(session.ui.screen_id(), ScreenId::Load);

    // Dial up some current on the home screen: three detents at the
    // full-range step.
    session.spin(3);
    assert_eq!(session.ui.screen_id(), ScreenId::Load);
    assert_eq!(session.ui.power().current_setpoint(), 60_000);

    // Menu -> Contrast, bump it, confirm: home again with the new
    // level in the live settings.
    session.press();
    assert_eq!(session.ui.screen_id(), ScreenId::MainMenu);
    session.spin(2);
    session.press();
    assert_eq!(session.ui.screen_id(), ScreenId::Contrast);
    session.spin(4);
    session.press();
    assert_eq!(session.ui.screen_id(), ScreenId::Load);
    assert_eq!(session.ui.settings().lcd_contrast, 36);

    // Menu -> Readouts: put Power on the right-hand slot.
    session.press();
    session.spin(1);
    session.press();
    assert_eq!(session.ui.screen_id(), ScreenId::AssignReadouts);
    session.spin(2); // "Right display"
    session.press();
    session.spin(3); // "Power"
    session.press();
    assert_eq!(session.ui.screen_id(), ScreenId::Load);
    assert_eq!(session.ui.settings().display.readouts[2], Readout::Power);

    // An over-temperature event interrupts whatever is on screen; the
    // acknowledgment parks the output safely and returns home.
    session.press();
    session.feed(EventKind::OverTemp);
    assert_eq!(session.ui.screen_id(), ScreenId::OverTemp);
    session.press();
    assert_eq!(session.ui.screen_id(), ScreenId::Load);
    assert_eq!(session.ui.power().output_mode(), OutputMode::Feedback);
    assert_eq!(session.ui.power().current_setpoint(), 0);
}

#[test]
fn calibration_round_trip_updates_live_settings() {
    let mut session = Session::new();

    // Menu -> Calibrate.
    session.press();
    session.spin(3);
    session.press();
    assert_eq!(session.ui.screen_id(), ScreenId::Calibrate);

    // Step 1: snapshot offsets.
    session.press();
    // Step 2: two detents up on the voltage gain, then accept.
    session.spin(1);
    session.spin(1);
    session.press();
    // Step 3: the sweep runs off sampling ticks (threshold 7 -> eight
    // settled readings).
    for _ in 0..10 {
        session.sample();
    }
    // Step 4: reserved step, confirm to commit.
    session.press();

    assert_eq!(session.ui.screen_id(), ScreenId::Load);

    let committed = session.ui.settings();
    assert_eq!(committed.adc_voltage_offset, 2500);
    assert_eq!(committed.adc_current_offset, 40);
    assert_eq!(committed.opamp_offset_trim, 6);

    let factory = Settings::factory();
    assert!(committed.adc_voltage_gain > factory.adc_voltage_gain);
}
