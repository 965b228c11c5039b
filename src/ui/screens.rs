//! The simple screens: load control (home), contrast adjustment, the
//! over-temperature safety screen, and the startup splash.

use crate::config::{
    CONTRAST_MAX, CURRENT_FULLRANGE_STEP, CURRENT_LOWRANGE_STEP, DISPLAY_COLS, SELECT_BUTTON,
    SPLASH_TICKS,
};
use crate::event::{Event, EventKind, Ticks};
use crate::hal::{CurrentRange, FrontPanel, OutputMode, PowerStage, SettingsStore};
use crate::ui::menu::GLYPH_ENTER;
use crate::ui::{readouts, ActiveScreen, Ctx, Target, Transition};

// Load screen (the home screen)

pub(crate) fn enter_load<P, D, S>(ctx: &mut Ctx<P, D, S>) -> ActiveScreen
where
    P: PowerStage,
    D: FrontPanel,
    S: SettingsStore,
{
    ctx.display.clear_all();
    readouts::draw_status(&mut ctx.display, &ctx.power, &ctx.settings.display);
    ActiveScreen::Load
}

/// Constant-current control: the encoder trims the setpoint, confirm
/// opens the menu, and every event refreshes the readouts.
pub(crate) fn load<P, D, S>(ctx: &mut Ctx<P, D, S>, event: &Event) -> Transition
where
    P: PowerStage,
    D: FrontPanel,
    S: SettingsStore,
{
    match event.kind {
        EventKind::ButtonPress(SELECT_BUTTON) => return Transition::To(Target::MAIN_MENU),
        EventKind::UpDown(detents) => adjust_current_setpoint(&mut ctx.power, detents),
        EventKind::OverTemp => return Transition::To(Target::OVER_TEMP),
        _ => {}
    }

    readouts::draw_status(&mut ctx.display, &ctx.power, &ctx.settings.display);
    Transition::Stay
}

/// One detent moves the setpoint by the active range's step size. The
/// power stage clamps to the range limits.
fn adjust_current_setpoint<P: PowerStage>(power: &mut P, detents: i8) {
    let step = match power.current_range() {
        CurrentRange::Low => CURRENT_LOWRANGE_STEP,
        CurrentRange::Full => CURRENT_FULLRANGE_STEP,
    };
    power.set_current(power.current_setpoint() + i32::from(detents) * step);
}

// Contrast screen

pub(crate) fn enter_contrast<P, D, S>(ctx: &mut Ctx<P, D, S>) -> ActiveScreen
where
    P: PowerStage,
    D: FrontPanel,
    S: SettingsStore,
{
    let display = &mut ctx.display;
    display.clear_all();
    display.clear(0, 0, 2, DISPLAY_COLS, 0xFF);
    display.draw_text(0, 32, "Contrast", true);
    let mut prompt = heapless::String::<12>::new();
    let _ = prompt.push_str(GLYPH_ENTER);
    let _ = prompt.push_str(": Done");
    display.draw_text(6, 38, &prompt, false);

    // Left and right end stops of the level bar.
    display.clear(4, 15, 5, 16, 0xFF);
    display.clear(4, 145, 5, 146, 0xFF);

    let level = ctx.settings.lcd_contrast.min(CONTRAST_MAX);
    draw_level_bar(display, level);
    ActiveScreen::Contrast { level }
}

/// Detents move the level (applied immediately so the change is visible);
/// confirm persists it and returns home.
pub(crate) fn contrast<P, D, S>(
    level: &mut u8,
    ctx: &mut Ctx<P, D, S>,
    event: &Event,
) -> Transition
where
    P: PowerStage,
    D: FrontPanel,
    S: SettingsStore,
{
    match event.kind {
        EventKind::UpDown(delta) => {
            let next = i32::from(*level) + i32::from(delta);
            *level = next.clamp(0, i32::from(CONTRAST_MAX)) as u8;
            ctx.display.set_contrast(*level);
        }
        EventKind::ButtonPress(SELECT_BUTTON) => {
            ctx.settings.lcd_contrast = *level;
            ctx.store.save(&ctx.settings);
            return Transition::Home;
        }
        EventKind::OverTemp => return Transition::To(Target::OVER_TEMP),
        _ => {}
    }

    draw_level_bar(&mut ctx.display, *level);
    Transition::Stay
}

fn draw_level_bar<D: FrontPanel>(display: &mut D, level: u8) {
    display.clear(4, 16, 5, 16 + level * 2, 0xFF);
    display.clear(4, 16 + level * 2, 5, 145, 0x81);
}

// Over-temperature safety screen

pub(crate) fn enter_overtemp<P, D, S>(ctx: &mut Ctx<P, D, S>) -> ActiveScreen
where
    P: PowerStage,
    D: FrontPanel,
    S: SettingsStore,
{
    let display = &mut ctx.display;
    display.clear(0, 0, 8, DISPLAY_COLS, 0xFF);
    display.draw_text(2, 6, "! OVERTEMP !", true);
    let mut prompt = heapless::String::<12>::new();
    let _ = prompt.push_str(GLYPH_ENTER);
    let _ = prompt.push_str(": Reset");
    display.draw_text(6, 32, &prompt, true);
    ActiveScreen::OverTemp
}

/// Two recovery paths, both ending at home: if the output is already in
/// feedback mode the condition was resolved by another control path and
/// the hardware is left alone; otherwise the confirm button forces the
/// commanded current to zero and the output into feedback mode.
pub(crate) fn overtemp<P, D, S>(ctx: &mut Ctx<P, D, S>, event: &Event) -> Transition
where
    P: PowerStage,
    D: FrontPanel,
    S: SettingsStore,
{
    if ctx.power.output_mode() == OutputMode::Feedback {
        return Transition::Home;
    }

    if let EventKind::ButtonPress(SELECT_BUTTON) = event.kind {
        ctx.power.set_current(0);
        ctx.power.set_output_mode(OutputMode::Feedback);
        return Transition::Home;
    }

    Transition::Stay
}

// Splash screen

pub(crate) fn enter_splash<P, D, S>(ctx: &mut Ctx<P, D, S>, now: Ticks) -> ActiveScreen
where
    P: PowerStage,
    D: FrontPanel,
    S: SettingsStore,
{
    let display = &mut ctx.display;
    display.clear_all();
    display.draw_text(2, 38, "DC LOAD", false);
    display.draw_text(4, 50, concat!("v", env!("CARGO_PKG_VERSION")), false);
    ActiveScreen::Splash {
        until: now.wrapping_add(SPLASH_TICKS),
    }
}

/// Hold until the deadline (the ~10 Hz sampling events keep us ticking),
/// then fall through to the load screen.
pub(crate) fn splash(until: Ticks, event: &Event) -> Transition {
    if event.kind == EventKind::OverTemp {
        return Transition::To(Target::OVER_TEMP);
    }

    let elapsed = (event.when.wrapping_sub(until) as i32) >= 0;
    if elapsed {
        Transition::To(Target::LOAD)
    } else {
        Transition::Stay
    }
}
