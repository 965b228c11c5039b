//! Screen state machine.
//!
//! Each screen handler is sans-IO: it receives one event, pokes the
//! collaborator traits, and returns a [`Transition`]. The [`Ui`] engine
//! applies the transition - `Home` is the sentinel "return to home", and
//! entering a home-flagged target makes it the new fallback destination
//! (breadcrumb semantics). The firmware's dispatch loop just pumps
//! `next_event()` into [`Ui::handle_event`] forever; there is no terminal
//! state.

pub mod calibrate;
pub mod menu;
pub mod readouts;
pub mod screens;


use crate::event::{Event, Ticks};
use crate::hal::{FrontPanel, PowerStage, SettingsStore};
use crate::settings::Settings;
use calibrate::CalSequence;
use menu::{MenuAction, MenuNav, MenuOutcome, MenuSpec};
use readouts::AssignFlow;

/// Every screen the panel can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenId {
    Splash,
    Load,
    MainMenu,
    AssignReadouts,
    Contrast,
    Calibrate,
    OverTemp,
}

/// A transition destination: a screen plus whether entering it makes it
/// the new home. The flag travels with the target value, not the screen
/// kind, so the same screen could be entered as home or not.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Target {
    pub screen: ScreenId,
    pub is_home: bool,
}

impl Target {
    pub const SPLASH: Target = Target {
        screen: ScreenId::Splash,
        is_home: false,
    };
    pub const LOAD: Target = Target {
        screen: ScreenId::Load,
        is_home: true,
    };
    pub const MAIN_MENU: Target = Target {
        screen: ScreenId::MainMenu,
        is_home: false,
    };
    pub const ASSIGN_READOUTS: Target = Target {
        screen: ScreenId::AssignReadouts,
        is_home: false,
    };
    pub const CONTRAST: Target = Target {
        screen: ScreenId::Contrast,
        is_home: false,
    };
    pub const CALIBRATE: Target = Target {
        screen: ScreenId::Calibrate,
        is_home: false,
    };
    pub const OVER_TEMP: Target = Target {
        screen: ScreenId::OverTemp,
        is_home: false,
    };
}

/// What a screen handler wants the engine to do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Keep the current screen and its context.
    Stay,
    /// Return to the remembered home screen.
    Home,
    /// Enter the given target (re-initializing its context).
    To(Target),
}

/// The collaborators and live settings every screen handler works
/// against.
pub(crate) struct Ctx<P, D, S> {
    pub power: P,
    pub display: D,
    pub store: S,
    pub settings: Settings,
}

/// The active screen with its typed per-screen context.
pub(crate) enum ActiveScreen {
    Splash { until: Ticks },
    Load,
    Menu { menu: &'static MenuSpec, nav: MenuNav },
    AssignReadouts(AssignFlow),
    Contrast { level: u8 },
    Calibrate(CalSequence),
    OverTemp,
}

/// The state machine engine: current screen plus the remembered home.
pub struct Ui<P, D, S> {
    ctx: Ctx<P, D, S>,
    screen: ActiveScreen,
    home: Target,
}

impl<P, D, S> Ui<P, D, S>
where
    P: PowerStage,
    D: FrontPanel,
    S: SettingsStore,
{
    /// Take ownership of the collaborators and show the boot screen
    /// (splash with the `splash` feature, otherwise the load screen).
    pub fn new(power: P, display: D, store: S, settings: Settings, now: Ticks) -> Self {
        let mut ctx = Ctx {
            power,
            display,
            store,
            settings,
        };
        let boot = if cfg!(feature = "splash") {
            Target::SPLASH
        } else {
            Target::LOAD
        };
        let screen = enter(&mut ctx, boot.screen, now);
        Self {
            ctx,
            screen,
            home: Target::LOAD,
        }
    }

    /// Dispatch one event to the active screen and apply its transition.
    pub fn handle_event(&mut self, event: Event) {
        let transition = match &mut self.screen {
            ActiveScreen::Splash { until } => screens::splash(*until, &event),
            ActiveScreen::Load => screens::load(&mut self.ctx, &event),
            ActiveScreen::Menu { menu, nav } => menu_screen(*menu, nav, &mut self.ctx, &event),
            ActiveScreen::AssignReadouts(flow) => flow.on_event(&mut self.ctx, &event),
            ActiveScreen::Contrast { level } => screens::contrast(level, &mut self.ctx, &event),
            ActiveScreen::Calibrate(sequence) => sequence.on_event(&mut self.ctx, &event),
            ActiveScreen::OverTemp => screens::overtemp(&mut self.ctx, &event),
        };
        self.apply(transition, event.when);
    }

    fn apply(&mut self, transition: Transition, now: Ticks) {
        let target = match transition {
            Transition::Stay => return,
            Transition::Home => self.home,
            Transition::To(target) => target,
        };
        if target.is_home {
            self.home = target;
        }
        self.screen = enter(&mut self.ctx, target.screen, now);
    }

    /// Which screen is currently active.
    pub fn screen_id(&self) -> ScreenId {
        match self.screen {
            ActiveScreen::Splash { .. } => ScreenId::Splash,
            ActiveScreen::Load => ScreenId::Load,
            ActiveScreen::Menu { .. } => ScreenId::MainMenu,
            ActiveScreen::AssignReadouts(_) => ScreenId::AssignReadouts,
            ActiveScreen::Contrast { .. } => ScreenId::Contrast,
            ActiveScreen::Calibrate(_) => ScreenId::Calibrate,
            ActiveScreen::OverTemp => ScreenId::OverTemp,
        }
    }

    /// Where "return to home" currently resolves to.
    pub fn home_target(&self) -> Target {
        self.home
    }

    /// The live (last committed) settings.
    pub fn settings(&self) -> &Settings {
        &self.ctx.settings
    }

    /// Read access to the power stage (status reporting, tests).
    pub fn power(&self) -> &P {
        &self.ctx.power
    }
}

/// Build a screen's context and perform its entry rendering.
fn enter<P, D, S>(ctx: &mut Ctx<P, D, S>, id: ScreenId, now: Ticks) -> ActiveScreen
where
    P: PowerStage,
    D: FrontPanel,
    S: SettingsStore,
{
    match id {
        ScreenId::Splash => screens::enter_splash(ctx, now),
        ScreenId::Load => screens::enter_load(ctx),
        ScreenId::MainMenu => {
            ctx.display.clear_all();
            menu::draw_menu(&mut ctx.display, &menu::MAIN_MENU, 0);
            ActiveScreen::Menu {
                menu: &menu::MAIN_MENU,
                nav: MenuNav::new(),
            }
        }
        ScreenId::AssignReadouts => AssignFlow::enter(ctx),
        ScreenId::Contrast => screens::enter_contrast(ctx),
        ScreenId::Calibrate => CalSequence::enter(ctx),
        ScreenId::OverTemp => screens::enter_overtemp(ctx),
    }
}

/// Drive a plain navigation menu: redraw while pending, follow the bound
/// target on confirmation.
fn menu_screen<P, D, S>(
    menu: &'static MenuSpec,
    nav: &mut MenuNav,
    ctx: &mut Ctx<P, D, S>,
    event: &Event,
) -> Transition
where
    P: PowerStage,
    D: FrontPanel,
    S: SettingsStore,
{
    match nav.handle(menu, event) {
        MenuOutcome::Pending => {
            menu::draw_menu(&mut ctx.display, menu, nav.selected());
            Transition::Stay
        }
        MenuOutcome::Abort => Transition::To(Target::OVER_TEMP),
        MenuOutcome::Chosen(index) => match menu.items[index].action {
            MenuAction::Go(target) => Transition::To(target),
            MenuAction::Value(_) => Transition::Stay,
        },
    }
}
