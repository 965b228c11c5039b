//! Power-stage control and measurement.
//!
//! The analog front end is commanded through a filtered PWM pair (the
//! current-set DAC and the sense-amp offset trim) and read back through
//! three SAADC channels. A sampler task publishes raw counts; the
//! calibrated getters apply the live calibration constants, so the
//! `PowerStage` surface stays synchronous for the UI.

use core::sync::atomic::{AtomicI32, Ordering};

use embassy_nrf::peripherals::PWM0;
use embassy_nrf::pwm::SimplePwm;
use embassy_nrf::saadc::Saadc;
use embassy_time::{Duration, Timer};

use crate::config::{CURRENT_FULLRANGE_MAX, CURRENT_LOWRANGE_MAX, OPAMP_TRIM_STEPS};
use crate::hal::{CurrentRange, OutputMode, PowerStage};
use crate::panel::flash::live_settings;

/// Latest raw ADC counts, published by the sampler task.
pub struct Readings {
    voltage: AtomicI32,
    current: AtomicI32,
    current_set: AtomicI32,
}

impl Readings {
    const fn new() -> Self {
        Self {
            voltage: AtomicI32::new(0),
            current: AtomicI32::new(0),
            current_set: AtomicI32::new(0),
        }
    }

    fn store(&self, counts: [i16; 3]) {
        self.voltage.store(i32::from(counts[0]), Ordering::Relaxed);
        self.current.store(i32::from(counts[1]), Ordering::Relaxed);
        self.current_set
            .store(i32::from(counts[2]), Ordering::Relaxed);
    }
}

pub static READINGS: Readings = Readings::new();

/// Sample voltage sense, current sense, and commanded current every
/// 50 ms.
#[embassy_executor::task]
pub async fn sampler_task(mut saadc: Saadc<'static, 3>) -> ! {
    loop {
        let mut counts = [0i16; 3];
        saadc.sample(&mut counts).await;
        READINGS.store(counts);
        Timer::after(Duration::from_millis(50)).await;
    }
}

/// PWM channel assignments on the control block.
const DAC_CHANNEL: usize = 0;
const TRIM_CHANNEL: usize = 1;

/// The `PowerStage` implementation.
pub struct LoadControl {
    pwm: SimplePwm<'static, PWM0>,
    setpoint: i32,
    range: CurrentRange,
    mode: OutputMode,
}

impl LoadControl {
    pub fn new(pwm: SimplePwm<'static, PWM0>, range: CurrentRange) -> Self {
        let mut control = Self {
            pwm,
            setpoint: 0,
            range,
            mode: OutputMode::Feedback,
        };
        let trim = live_settings()
            .opamp_offset_trim
            .clamp(0, i32::from(OPAMP_TRIM_STEPS) - 1);
        control.set_opamp_trim(trim as u8);
        control.set_current(0);
        control
    }

    fn apply_dac(&mut self) {
        let duty = if self.mode == OutputMode::Off {
            0
        } else {
            let settings = live_settings();
            let (gain, offset) = match self.range {
                CurrentRange::Low => (settings.dac_low_gain, settings.dac_low_offset),
                CurrentRange::Full => (settings.dac_high_gain, settings.dac_high_offset),
            };
            let counts = self.setpoint / gain.max(1) + offset;
            counts.clamp(0, i32::from(self.pwm.max_duty())) as u16
        };
        self.pwm.set_duty(DAC_CHANNEL, duty);
    }
}

impl PowerStage for LoadControl {
    fn set_current(&mut self, microamps: i32) {
        let max = match self.range {
            CurrentRange::Low => CURRENT_LOWRANGE_MAX,
            CurrentRange::Full => CURRENT_FULLRANGE_MAX,
        };
        self.setpoint = microamps.clamp(0, max);
        self.apply_dac();
    }

    fn current_setpoint(&self) -> i32 {
        self.setpoint
    }

    fn current_usage(&self) -> i32 {
        let settings = live_settings();
        (i32::from(self.raw_current_usage()) - settings.adc_current_offset)
            * settings.adc_current_gain
    }

    fn voltage(&self) -> i32 {
        let settings = live_settings();
        (i32::from(self.raw_voltage()) - settings.adc_voltage_offset) * settings.adc_voltage_gain
    }

    fn raw_voltage(&self) -> i16 {
        READINGS.voltage.load(Ordering::Relaxed) as i16
    }

    fn raw_current_usage(&self) -> i16 {
        READINGS.current.load(Ordering::Relaxed) as i16
    }

    fn current_range(&self) -> CurrentRange {
        self.range
    }

    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        // Off parks the DAC at zero; On and Feedback differ only inside
        // the analog loop.
        self.mode = mode;
        self.apply_dac();
    }

    fn set_opamp_trim(&mut self, value: u8) {
        let max_duty = i32::from(self.pwm.max_duty());
        let duty = i32::from(value) * max_duty / i32::from(OPAMP_TRIM_STEPS);
        self.pwm.set_duty(TRIM_CHANNEL, duty as u16);
    }

    fn current_sense_error(&self) -> i32 {
        READINGS.current.load(Ordering::Relaxed) - READINGS.current_set.load(Ordering::Relaxed)
    }
}
