//! Semantic input events and the interrupt-to-task handoff queue.
//!
//! Producers (the encoder/button decoder tasks and the thermal watch) run
//! at interrupt-like priority and must never block: they enqueue through
//! [`offer`], which drops the event if the queue is full. The single UI
//! task is the only consumer; it receives with a bounded timeout so the
//! screen keeps redrawing even with no input (see [`SamplePacer`]).

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::config::{EVENT_QUEUE_DEPTH, SAMPLE_INTERVAL_TICKS};

/// Monotonic millisecond tick count. Wraps; always compare with
/// `wrapping_sub`.
pub type Ticks = u32;

/// What happened, with its typed argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventKind {
    /// A debounced press of the given button id.
    ButtonPress(u8),
    /// Net encoder movement in detents (negative = counter-clockwise).
    UpDown(i8),
    /// Synthetic sampling tick: redraw readouts from fresh ADC data.
    AdcReading,
    /// The power stage reported over-temperature.
    OverTemp,
}

/// An input event plus the tick count at which it was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Event {
    pub kind: EventKind,
    pub when: Ticks,
}

/// The bounded handoff queue between producer contexts and the UI task.
pub type EventQueue = Channel<CriticalSectionRawMutex, Event, EVENT_QUEUE_DEPTH>;

/// The one queue instance shared by the firmware tasks.
pub static EVENT_QUEUE: EventQueue = Channel::new();

/// Non-blocking enqueue. Returns `false` if the queue was full and the
/// event was dropped.
///
/// Lossy by policy: producers are rate-limited at the source (debounce,
/// detent accumulation), so sustained overflow cannot happen; a transient
/// full queue just means the consumer already has a backlog to react to,
/// and the newest event is the one sacrificed. Producers never retry.
pub fn offer(queue: &EventQueue, event: Event) -> bool {
    queue.try_send(event).is_ok()
}

/// Paces the synthetic sampling events the dispatcher interleaves with
/// real input.
///
/// The firmware's `next_event()` asks [`SamplePacer::due`] first; if the
/// window already elapsed it takes a synthetic sample immediately,
/// otherwise it blocks on the queue for at most [`SamplePacer::timeout`]
/// and samples on timeout. Either way the UI sees an event at least every
/// `SAMPLE_INTERVAL_TICKS`.
pub struct SamplePacer {
    last_sample: Ticks,
}

impl SamplePacer {
    pub const fn new() -> Self {
        Self { last_sample: 0 }
    }

    /// Has the sampling window elapsed since the last synthetic event?
    pub fn due(&self, now: Ticks) -> bool {
        now.wrapping_sub(self.last_sample) > SAMPLE_INTERVAL_TICKS
    }

    /// Ticks left until the next synthetic event is due (0 if overdue).
    pub fn timeout(&self, now: Ticks) -> Ticks {
        SAMPLE_INTERVAL_TICKS.saturating_sub(now.wrapping_sub(self.last_sample))
    }

    /// Produce a synthetic sampling event and restart the window.
    pub fn sample(&mut self, now: Ticks) -> Event {
        self.last_sample = now;
        Event {
            kind: EventKind::AdcReading,
            when: now,
        }
    }
}

impl Default for SamplePacer {
    fn default() -> Self {
        Self::new()
    }
}
