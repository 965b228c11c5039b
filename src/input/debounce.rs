//! Push-button debouncing by timestamp rate-limiting.
//!
//! A mechanical press shows up as a burst of edges. Only the first edge
//! inside each accept window becomes an event; the rest are absorbed.

use crate::config::BUTTON_DEBOUNCE_TICKS;
use crate::event::{Event, EventKind, Ticks};

/// Rate-limits raw button edges into debounced press events.
pub struct ButtonDebouncer {
    last_accepted: Ticks,
}

impl ButtonDebouncer {
    pub const fn new() -> Self {
        Self { last_accepted: 0 }
    }

    /// Feed one raw press edge for `button` at tick `now`.
    ///
    /// Returns the press event if it falls outside the accept window of
    /// the previous accepted press, `None` if it is bounce.
    pub fn update(&mut self, button: u8, now: Ticks) -> Option<Event> {
        if now.wrapping_sub(self.last_accepted) > BUTTON_DEBOUNCE_TICKS {
            self.last_accepted = now;
            Some(Event {
                kind: EventKind::ButtonPress(button),
                when: now,
            })
        } else {
            None
        }
    }
}

impl Default for ButtonDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SELECT_BUTTON;

    #[test]
    fn bounce_within_window_is_absorbed() {
        let mut debouncer = ButtonDebouncer::new();

        let first = debouncer.update(SELECT_BUTTON, 500);
        assert_eq!(
            first.map(|e| e.kind),
            Some(EventKind::ButtonPress(SELECT_BUTTON))
        );

        // 60 ms later: still inside the 100 ms window.
        assert_eq!(debouncer.update(SELECT_BUTTON, 560), None);
        // Exactly at the window edge is still bounce.
        assert_eq!(debouncer.update(SELECT_BUTTON, 600), None);
    }

    #[test]
    fn presses_beyond_window_both_emit() {
        let mut debouncer = ButtonDebouncer::new();

        assert!(debouncer.update(SELECT_BUTTON, 500).is_some());
        let second = debouncer.update(SELECT_BUTTON, 601).unwrap();
        assert_eq!(second.when, 601);
    }

    #[test]
    fn window_restarts_from_last_accepted_press() {
        let mut debouncer = ButtonDebouncer::new();

        assert!(debouncer.update(SELECT_BUTTON, 500).is_some());
        assert!(debouncer.update(SELECT_BUTTON, 580).is_none());
        // 90 ms after the *absorbed* edge but 180 ms after the accepted
        // one: accepted.
        assert!(debouncer.update(SELECT_BUTTON, 680).is_some());
    }

    #[test]
    fn accepts_across_tick_wraparound() {
        let mut debouncer = ButtonDebouncer::new();

        assert!(debouncer.update(SELECT_BUTTON, u32::MAX - 50).is_some());
        assert!(debouncer.update(SELECT_BUTTON, u32::MAX - 10).is_none());
        // 151 ticks after the accepted press, past the wrap.
        assert!(debouncer.update(SELECT_BUTTON, 100).is_some());
    }
}
