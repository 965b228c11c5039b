//! Interactive calibration sequence.
//!
//! Works on a private scratch copy of the settings; the live block is
//! replaced by one atomic store at the very end, so an abandoned run
//! leaves the device exactly as it was.
//!
//! Steps, in order:
//! 1. Offset snapshot - terminals open, confirm records the raw ADC
//!    voltage/current readings as the new offsets.
//! 2. Voltage gain - a known reference voltage applied, each detent
//!    nudges the gain ~0.2% while the screen shows the resulting
//!    calibrated reading; confirm accepts.
//! 3. Opamp trim sweep - a 100 mA test current flows while the trim
//!    register is walked up one setting per sampling tick until the
//!    sense-minus-commanded differential goes non-positive.
//! 4. Current gain - reserved step: prompt and confirm only, no
//!    measurement is taken yet.

use crate::config::{
    CAL_TEST_CURRENT, DISPLAY_COLS, GAIN_NUDGE_DIVISOR, OPAMP_TRIM_STEPS, SELECT_BUTTON,
};
use crate::event::{Event, EventKind};
use crate::format::format_number;
use crate::hal::{FrontPanel, PowerStage, SettingsStore};
use crate::settings::Settings;
use crate::ui::menu::GLYPH_ENTER;
use crate::ui::{ActiveScreen, Ctx, Target, Transition};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CalStep {
    Offsets,
    VoltageGain,
    TrimSweep { trim: u8 },
    CurrentGain,
}

/// The running sequence: scratch settings plus the current step.
pub(crate) struct CalSequence {
    scratch: Settings,
    step: CalStep,
}

impl CalSequence {
    pub(crate) fn enter<P, D, S>(ctx: &mut Ctx<P, D, S>) -> ActiveScreen
    where
        P: PowerStage,
        D: FrontPanel,
        S: SettingsStore,
    {
        ctx.power.set_current(0);
        let scratch = ctx.settings;

        let display = &mut ctx.display;
        display.clear_all();
        display.draw_text(0, 0, " CALIBRATION ", true);
        display.draw_text(2, 0, "  1: Offset  ", true);
        draw_next_prompt(display);

        ActiveScreen::Calibrate(CalSequence {
            scratch,
            step: CalStep::Offsets,
        })
    }

    pub(crate) fn on_event<P, D, S>(&mut self, ctx: &mut Ctx<P, D, S>, event: &Event) -> Transition
    where
        P: PowerStage,
        D: FrontPanel,
        S: SettingsStore,
    {
        if event.kind == EventKind::OverTemp {
            // Abandon the run: the scratch copy dies with it. Stop the
            // test current if the sweep had commanded it.
            if matches!(self.step, CalStep::TrimSweep { .. }) {
                ctx.power.set_current(0);
            }
            return Transition::To(Target::OVER_TEMP);
        }

        let confirmed = event.kind == EventKind::ButtonPress(SELECT_BUTTON);

        match self.step {
            CalStep::Offsets => {
                if confirmed {
                    self.scratch.adc_voltage_offset = i32::from(ctx.power.raw_voltage());
                    self.scratch.adc_current_offset = i32::from(ctx.power.raw_current_usage());
                    ctx.display.draw_text(2, 0, "  2: Voltage ", true);
                    self.step = CalStep::VoltageGain;
                }
                Transition::Stay
            }
            CalStep::VoltageGain => {
                if confirmed {
                    self.begin_trim_sweep(ctx);
                    return Transition::Stay;
                }

                if let EventKind::UpDown(detents) = event.kind {
                    self.scratch.adc_voltage_gain +=
                        self.scratch.adc_voltage_gain * i32::from(detents) / GAIN_NUDGE_DIVISOR;
                }

                // Live readback through the scratch calibration, so the
                // user can converge on the reference voltage by trial.
                let microvolts = (i32::from(ctx.power.raw_voltage())
                    - self.scratch.adc_voltage_offset)
                    * self.scratch.adc_voltage_gain;
                let mut buf = format_number(microvolts, 'V');
                let _ = buf.push(' ');
                ctx.display.draw_text(4, 43, &buf, false);
                Transition::Stay
            }
            CalStep::TrimSweep { trim } => {
                if event.kind == EventKind::AdcReading {
                    if ctx.power.current_sense_error() <= 0 {
                        self.scratch.opamp_offset_trim = i32::from(trim) - 1;
                        self.end_trim_sweep(ctx);
                    } else if trim + 1 >= OPAMP_TRIM_STEPS {
                        // Sweep exhausted: keep the previous trim value.
                        self.end_trim_sweep(ctx);
                    } else {
                        self.step = CalStep::TrimSweep { trim: trim + 1 };
                        ctx.power.set_opamp_trim(trim + 1);
                    }
                }
                Transition::Stay
            }
            CalStep::CurrentGain => {
                // Reserved step: current-gain measurement against a known
                // load is not implemented; confirm completes the run.
                if confirmed {
                    ctx.store.save(&self.scratch);
                    ctx.settings = self.scratch;
                    return Transition::Home;
                }
                Transition::Stay
            }
        }
    }

    fn begin_trim_sweep<P, D, S>(&mut self, ctx: &mut Ctx<P, D, S>)
    where
        P: PowerStage,
        D: FrontPanel,
        S: SettingsStore,
    {
        ctx.display.clear(2, 0, 8, DISPLAY_COLS, 0);
        ctx.display.draw_text(4, 12, "Please wait", false);
        ctx.power.set_current(CAL_TEST_CURRENT);
        ctx.power.set_opamp_trim(0);
        self.step = CalStep::TrimSweep { trim: 0 };
    }

    fn end_trim_sweep<P, D, S>(&mut self, ctx: &mut Ctx<P, D, S>)
    where
        P: PowerStage,
        D: FrontPanel,
        S: SettingsStore,
    {
        ctx.power.set_current(0);
        let display = &mut ctx.display;
        display.clear(4, 0, 8, DISPLAY_COLS, 0);
        display.draw_text(2, 0, "  3: Current ", true);
        draw_next_prompt(display);
        self.step = CalStep::CurrentGain;
    }
}

fn draw_next_prompt<D: FrontPanel>(display: &mut D) {
    let mut prompt = heapless::String::<12>::new();
    let _ = prompt.push_str(GLYPH_ENTER);
    let _ = prompt.push_str(": Next");
    display.draw_text(6, 38, &prompt, false);
}
