//! Readout computation and rendering, plus the two-stage flow that
//! assigns a readout to a display slot.

use heapless::String;

use crate::config::{DISPLAY_COLS, TEXT_CELL_PX};
use crate::event::Event;
use crate::format::format_number;
use crate::hal::{FrontPanel, PowerStage, SettingsStore};
use crate::settings::{DisplayConfig, Readout};
use crate::ui::menu::{
    self, MenuAction, MenuNav, MenuOutcome, CHOOSE_SLOT_MENU, CHOOSE_VALUE_MENU, GLYPH_OHM,
};
use crate::ui::{ActiveScreen, Ctx, Target, Transition};

/// Resistance is only displayed once the load draws at least 0.1 A;
/// below that the quotient degenerates and dashes are shown instead.
const RESISTANCE_MIN_DECIAMPS: i32 = 1;

/// Render one readout's current value. Micro-unit inputs throughout.
fn readout_text<P: PowerStage>(readout: Readout, power: &P) -> String<8> {
    match readout {
        Readout::None => {
            let mut blank = String::new();
            let _ = blank.push_str("      ");
            blank
        }
        Readout::CurrentSetpoint => format_number(power.current_setpoint(), 'A'),
        Readout::CurrentUsage => format_number(power.current_usage(), 'A'),
        Readout::Voltage => format_number(power.voltage(), 'V'),
        Readout::Power => {
            let microwatts = (power.current_usage() / 1000) * (power.voltage() / 1000);
            format_number(microwatts, 'W')
        }
        Readout::Resistance => {
            let deciamps = power.current_usage() / 100_000;
            if deciamps >= RESISTANCE_MIN_DECIAMPS {
                format_number(power.voltage() * 10 / deciamps, GLYPH_OHM)
            } else {
                let mut dashes = String::new();
                let _ = dashes.push_str("----");
                let _ = dashes.push(GLYPH_OHM);
                dashes
            }
        }
    }
}

/// Label drawn beside the main readout.
fn readout_label(readout: Readout) -> &'static str {
    match readout {
        Readout::CurrentSetpoint => "SET",
        Readout::CurrentUsage => "ACT",
        _ => "",
    }
}

/// Draw the three configured readouts: main value in large digits with
/// its label in the top-right corner, the two secondary values on the
/// bottom row.
pub(crate) fn draw_status<P, D>(display: &mut D, power: &P, config: &DisplayConfig)
where
    P: PowerStage,
    D: FrontPanel,
{
    let main = config.readouts[0];
    if main != Readout::None {
        let mut buf = readout_text(main, power);
        let _ = buf.push(' ');
        display.draw_big_numbers(0, 0, &buf);
        if !buf.contains('.') {
            // Clear any detritus left over from longer strings.
            display.clear(0, 108, 4, 120, 0);
        }
    } else {
        display.clear(0, 0, 6, 120, 0);
        display.clear(4, 120, 6, DISPLAY_COLS, 0);
    }

    let label = readout_label(main);
    let label_px = label.len() as u8 * TEXT_CELL_PX;
    display.draw_text(0, DISPLAY_COLS - label_px, label, true);
    if label_px < 36 {
        display.clear(0, 124, 2, DISPLAY_COLS - label_px, 0);
    }

    for slot in 0..2 {
        let mut buf = readout_text(config.readouts[slot + 1], power);
        if buf.len() == 5 {
            let _ = buf.push(' ');
        }
        display.draw_text(6, 88 * slot as u8, &buf, false);
    }
}

/// Two-stage readout assignment: pick a display slot, then pick the
/// readout to show there. Commits through one atomic settings write.
pub(crate) struct AssignFlow {
    stage: AssignStage,
}

enum AssignStage {
    ChooseSlot { nav: MenuNav },
    ChooseValue { slot: usize, nav: MenuNav },
}

impl AssignFlow {
    pub(crate) fn enter<P, D, S>(ctx: &mut Ctx<P, D, S>) -> ActiveScreen
    where
        P: PowerStage,
        D: FrontPanel,
        S: SettingsStore,
    {
        ctx.display.clear_all();
        menu::draw_menu(&mut ctx.display, &CHOOSE_SLOT_MENU, 0);
        ActiveScreen::AssignReadouts(AssignFlow {
            stage: AssignStage::ChooseSlot { nav: MenuNav::new() },
        })
    }

    pub(crate) fn on_event<P, D, S>(&mut self, ctx: &mut Ctx<P, D, S>, event: &Event) -> Transition
    where
        P: PowerStage,
        D: FrontPanel,
        S: SettingsStore,
    {
        match &mut self.stage {
            AssignStage::ChooseSlot { nav } => match nav.handle(&CHOOSE_SLOT_MENU, event) {
                MenuOutcome::Pending => {
                    let selected = nav.selected();
                    menu::draw_menu(&mut ctx.display, &CHOOSE_SLOT_MENU, selected);
                    Transition::Stay
                }
                MenuOutcome::Abort => Transition::To(Target::OVER_TEMP),
                MenuOutcome::Chosen(index) => {
                    let MenuAction::Value(slot) = CHOOSE_SLOT_MENU.items[index].action else {
                        return Transition::Stay;
                    };
                    ctx.display.clear_all();
                    menu::draw_menu(&mut ctx.display, &CHOOSE_VALUE_MENU, 0);
                    self.stage = AssignStage::ChooseValue {
                        slot: usize::from(slot),
                        nav: MenuNav::new(),
                    };
                    Transition::Stay
                }
            },
            AssignStage::ChooseValue { slot, nav } => match nav.handle(&CHOOSE_VALUE_MENU, event) {
                MenuOutcome::Pending => {
                    let selected = nav.selected();
                    menu::draw_menu(&mut ctx.display, &CHOOSE_VALUE_MENU, selected);
                    Transition::Stay
                }
                MenuOutcome::Abort => Transition::To(Target::OVER_TEMP),
                MenuOutcome::Chosen(index) => {
                    let MenuAction::Value(value) = CHOOSE_VALUE_MENU.items[index].action else {
                        return Transition::Stay;
                    };
                    ctx.settings.display.readouts[*slot] = Readout::from_u8(value);
                    ctx.store.save(&ctx.settings);
                    Transition::Home
                }
            },
        }
    }
}
