//! Static menu descriptions, cursor navigation, and the windowed
//! renderer.

use crate::config::{DISPLAY_COLS, MENU_PAGE_ROWS, SELECT_BUTTON, TEXT_CELL_PX};
use crate::event::{Event, EventKind};
use crate::hal::FrontPanel;
use crate::settings::Readout;
use crate::ui::Target;

/// Glyphs from the panel font.
pub(crate) const GLYPH_UP: &str = "\u{2191}";
pub(crate) const GLYPH_DOWN: &str = "\u{2193}";
pub(crate) const GLYPH_ENTER: &str = "\u{21B5}";
pub(crate) const GLYPH_OHM: char = '\u{03A9}';

/// What confirming a menu item does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    /// Transition to another screen.
    Go(Target),
    /// Yield a small value for the enclosing flow to interpret (display
    /// slot index, readout selector).
    Value(u8),
}

/// One selectable row.
pub struct MenuItem {
    pub caption: &'static str,
    pub action: MenuAction,
}

/// An immutable menu: optional title plus an explicitly-sized item list.
pub struct MenuSpec {
    pub title: Option<&'static str>,
    pub items: &'static [MenuItem],
}

pub static MAIN_MENU: MenuSpec = MenuSpec {
    title: None,
    items: &[
        MenuItem {
            caption: "C/C Load",
            action: MenuAction::Go(Target::LOAD),
        },
        MenuItem {
            caption: "Readouts",
            action: MenuAction::Go(Target::ASSIGN_READOUTS),
        },
        MenuItem {
            caption: "Contrast",
            action: MenuAction::Go(Target::CONTRAST),
        },
        MenuItem {
            caption: "Calibrate",
            action: MenuAction::Go(Target::CALIBRATE),
        },
    ],
};

pub static CHOOSE_SLOT_MENU: MenuSpec = MenuSpec {
    title: Some("Readouts"),
    items: &[
        MenuItem {
            caption: "Main display",
            action: MenuAction::Value(0),
        },
        MenuItem {
            caption: "Left display",
            action: MenuAction::Value(1),
        },
        MenuItem {
            caption: "Right display",
            action: MenuAction::Value(2),
        },
    ],
};

pub static CHOOSE_VALUE_MENU: MenuSpec = MenuSpec {
    title: Some("Choose value"),
    items: &[
        MenuItem {
            caption: "Set Current",
            action: MenuAction::Value(Readout::CurrentSetpoint as u8),
        },
        MenuItem {
            caption: "Act. Current",
            action: MenuAction::Value(Readout::CurrentUsage as u8),
        },
        MenuItem {
            caption: "Voltage",
            action: MenuAction::Value(Readout::Voltage as u8),
        },
        MenuItem {
            caption: "Power",
            action: MenuAction::Value(Readout::Power as u8),
        },
        MenuItem {
            caption: "Resistance",
            action: MenuAction::Value(Readout::Resistance as u8),
        },
        MenuItem {
            caption: "None",
            action: MenuAction::Value(Readout::None as u8),
        },
    ],
};

/// Result of feeding one event to a [`MenuNav`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Still navigating; redraw.
    Pending,
    /// Confirm pressed on the item at this index.
    Chosen(usize),
    /// Over-temperature observed; abort to the safety screen.
    Abort,
}

/// Cursor state for one menu traversal. No wraparound in either
/// direction.
pub struct MenuNav {
    selected: usize,
}

impl MenuNav {
    pub const fn new() -> Self {
        Self { selected: 0 }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn handle(&mut self, menu: &MenuSpec, event: &Event) -> MenuOutcome {
        match event.kind {
            EventKind::UpDown(delta) if delta < 0 => {
                self.selected = self.selected.saturating_sub(usize::from(delta.unsigned_abs()));
                MenuOutcome::Pending
            }
            EventKind::UpDown(delta) => {
                // Down one step at a time, stopping at the last item.
                for _ in 0..delta {
                    if self.selected + 1 < menu.items.len() {
                        self.selected += 1;
                    } else {
                        break;
                    }
                }
                MenuOutcome::Pending
            }
            EventKind::ButtonPress(SELECT_BUTTON) => MenuOutcome::Chosen(self.selected),
            EventKind::OverTemp => MenuOutcome::Abort,
            _ => MenuOutcome::Pending,
        }
    }
}

impl Default for MenuNav {
    fn default() -> Self {
        Self::new()
    }
}

/// Render `menu` with the cursor on `selected`.
///
/// Items are windowed into pages of 4 rows (3 under a title); the page
/// holding the cursor is `[selected - selected % H, ... + H)`. Arrow
/// glyphs in the right margin indicate items above/below the page.
pub fn draw_menu<D: FrontPanel>(display: &mut D, menu: &MenuSpec, selected: usize) {
    let mut start_row: u8 = 0;
    let mut height = MENU_PAGE_ROWS;

    if let Some(title) = menu.title {
        let padding = (DISPLAY_COLS - title.len() as u8 * TEXT_CELL_PX) / 2;
        display.clear(0, 0, 2, padding, 0xFF);
        display.draw_text(0, padding, title, true);
        display.clear(0, DISPLAY_COLS - padding, 2, DISPLAY_COLS, 0xFF);
        start_row += 1;
        height -= 1;
    }

    let up_glyph = if selected / height > 0 { GLYPH_UP } else { " " };
    display.draw_text(start_row * 2, 148, up_glyph, false);

    // The page of items the cursor is in.
    let page_start = selected - selected % height;
    let cursor_row = selected % height;

    for i in 0..height {
        let row = (i as u8 + start_row) * 2;
        match menu.items.get(page_start + i) {
            Some(item) => {
                let inverted = i == cursor_row;
                display.draw_text(row, 0, item.caption, inverted);
                display.clear(
                    row,
                    item.caption.len() as u8 * TEXT_CELL_PX,
                    row + 2,
                    142,
                    if inverted { 0xFF } else { 0 },
                );
            }
            None => display.clear(row, 0, row + 2, DISPLAY_COLS, 0),
        }
    }

    let down_glyph = if page_start + height < menu.items.len() {
        GLYPH_DOWN
    } else {
        " "
    };
    display.draw_text(6, 148, down_glyph, false);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn up_down(delta: i8) -> Event {
        Event {
            kind: EventKind::UpDown(delta),
            when: 0,
        }
    }

    fn select() -> Event {
        Event {
            kind: EventKind::ButtonPress(SELECT_BUTTON),
            when: 0,
        }
    }

    #[test]
    fn up_from_first_item_stays_at_zero() {
        let mut nav = MenuNav::new();
        assert_eq!(nav.handle(&MAIN_MENU, &up_down(-1)), MenuOutcome::Pending);
        assert_eq!(nav.selected(), 0);
        assert_eq!(nav.handle(&MAIN_MENU, &up_down(-3)), MenuOutcome::Pending);
        assert_eq!(nav.selected(), 0);
    }

    #[test]
    fn down_from_last_item_stays_at_end() {
        let mut nav = MenuNav::new();
        nav.handle(&MAIN_MENU, &up_down(3));
        assert_eq!(nav.selected(), 3);
        nav.handle(&MAIN_MENU, &up_down(1));
        assert_eq!(nav.selected(), 3);
    }

    #[test]
    fn large_delta_walks_until_the_end() {
        let mut nav = MenuNav::new();
        nav.handle(&MAIN_MENU, &up_down(100));
        assert_eq!(nav.selected(), MAIN_MENU.items.len() - 1);
    }

    #[test]
    fn negative_delta_moves_by_magnitude() {
        let mut nav = MenuNav::new();
        nav.handle(&CHOOSE_VALUE_MENU, &up_down(4));
        assert_eq!(nav.selected(), 4);
        nav.handle(&CHOOSE_VALUE_MENU, &up_down(-2));
        assert_eq!(nav.selected(), 2);
    }

    #[test]
    fn confirm_yields_current_selection() {
        let mut nav = MenuNav::new();
        nav.handle(&MAIN_MENU, &up_down(2));
        assert_eq!(nav.handle(&MAIN_MENU, &select()), MenuOutcome::Chosen(2));
    }

    #[test]
    fn overtemp_aborts_navigation() {
        let mut nav = MenuNav::new();
        let overtemp = Event {
            kind: EventKind::OverTemp,
            when: 0,
        };
        assert_eq!(nav.handle(&MAIN_MENU, &overtemp), MenuOutcome::Abort);
    }

    #[test]
    fn other_buttons_and_samples_are_ignored() {
        let mut nav = MenuNav::new();
        let sample = Event {
            kind: EventKind::AdcReading,
            when: 0,
        };
        let other = Event {
            kind: EventKind::ButtonPress(2),
            when: 0,
        };
        assert_eq!(nav.handle(&MAIN_MENU, &sample), MenuOutcome::Pending);
        assert_eq!(nav.handle(&MAIN_MENU, &other), MenuOutcome::Pending);
        assert_eq!(nav.selected(), 0);
    }

    /// Captures text draws so tests can inspect what a render produced.
    struct RecordingPanel {
        texts: Vec<(u8, u8, String, bool)>,
    }

    impl RecordingPanel {
        fn new() -> Self {
            Self { texts: Vec::new() }
        }

        fn captions(&self) -> Vec<&str> {
            self.texts
                .iter()
                .filter(|(_, col, _, _)| *col < 148)
                .map(|(_, _, text, _)| text.as_str())
                .collect()
        }
    }

    impl FrontPanel for RecordingPanel {
        fn clear_all(&mut self) {}
        fn clear(&mut self, _row0: u8, _col0: u8, _row1: u8, _col1: u8, _fill: u8) {}
        fn draw_text(&mut self, row: u8, col: u8, text: &str, inverted: bool) {
            self.texts.push((row, col, text.to_string(), inverted));
        }
        fn draw_big_numbers(&mut self, _row: u8, _col: u8, _text: &str) {}
        fn set_contrast(&mut self, _level: u8) {}
    }

    #[test]
    fn titled_menu_windows_items_into_three_rows() {
        // 6 items under a title: cursor on item 4 shows the second page.
        let mut panel = RecordingPanel::new();
        draw_menu(&mut panel, &CHOOSE_VALUE_MENU, 4);

        assert_eq!(
            panel.captions(),
            vec!["Choose value", "Power", "Resistance", "None"]
        );
        // Cursor row is inverted, its page-mates are not.
        let resistance = panel
            .texts
            .iter()
            .find(|(_, _, text, _)| text == "Resistance")
            .unwrap();
        assert!(resistance.3);
    }

    #[test]
    fn page_indicators_reflect_surrounding_items() {
        let mut panel = RecordingPanel::new();
        draw_menu(&mut panel, &CHOOSE_VALUE_MENU, 0);
        // First page: no items above, more below.
        let margin: Vec<&str> = panel
            .texts
            .iter()
            .filter(|(_, col, _, _)| *col == 148)
            .map(|(_, _, text, _)| text.as_str())
            .collect();
        assert_eq!(margin, vec![" ", GLYPH_DOWN]);

        let mut panel = RecordingPanel::new();
        draw_menu(&mut panel, &CHOOSE_VALUE_MENU, 5);
        // Last page: items above, none below.
        let margin: Vec<&str> = panel
            .texts
            .iter()
            .filter(|(_, col, _, _)| *col == 148)
            .map(|(_, _, text, _)| text.as_str())
            .collect();
        assert_eq!(margin, vec![GLYPH_UP, " "]);
    }
}
