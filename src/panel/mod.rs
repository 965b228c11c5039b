//! nRF52840 hardware layer: collaborator trait implementations, the
//! input tasks, and the event dispatcher.

pub mod display;
pub mod flash;
pub mod inputs;
pub mod power;

use embassy_time::{with_timeout, Duration, Instant};

use crate::event::{Event, SamplePacer, Ticks, EVENT_QUEUE};

/// Current tick count (milliseconds since boot).
pub fn now_ticks() -> Ticks {
    Instant::now().as_millis() as Ticks
}

/// Receive the next UI event.
///
/// Blocks on the queue at most until the pacer's window expires; a quiet
/// queue yields a synthetic sampling event instead, so the caller sees
/// an event at least every ~100 ms while real input is delivered
/// immediately.
pub async fn next_event(pacer: &mut SamplePacer) -> Event {
    let now = now_ticks();
    if pacer.due(now) {
        return pacer.sample(now);
    }

    let timeout = Duration::from_millis(u64::from(pacer.timeout(now)));
    match with_timeout(timeout, EVENT_QUEUE.receive()).await {
        Ok(event) => event,
        Err(_) => pacer.sample(now_ticks()),
    }
}
