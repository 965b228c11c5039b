//! Input producer tasks: encoder, push button, thermal comparator.
//!
//! Each task owns its decoder state and enqueues through the lossy
//! [`offer`]; none of them ever blocks on the UI task.

use defmt::{debug, info, warn};
use embassy_futures::select::select;
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_time::{Duration, Timer};

use crate::config::SELECT_BUTTON;
use crate::event::{offer, Event, EventKind, EVENT_QUEUE};
use crate::input::{ButtonDebouncer, QuadratureDecoder};
use crate::panel::now_ticks;

/// Decode the encoder's two phase lines into detent events.
#[embassy_executor::task]
pub async fn encoder_task(phase_a: AnyPin, phase_b: AnyPin) -> ! {
    let mut a = Input::new(phase_a, Pull::Up);
    let mut b = Input::new(phase_b, Pull::Up);
    let mut decoder = QuadratureDecoder::new();

    loop {
        select(a.wait_for_any_edge(), b.wait_for_any_edge()).await;

        let levels = (u8::from(b.is_high()) << 1) | u8::from(a.is_high());
        if let Some(detents) = decoder.update(levels) {
            let event = Event {
                kind: EventKind::UpDown(detents),
                when: now_ticks(),
            };
            if !offer(&EVENT_QUEUE, event) {
                debug!("encoder event dropped (queue full)");
            }
        }
    }
}

/// Debounce the encoder's push switch into confirm presses.
#[embassy_executor::task]
pub async fn button_task(pin: AnyPin) -> ! {
    let mut button = Input::new(pin, Pull::Up);
    let mut debouncer = ButtonDebouncer::new();

    loop {
        // Active-low: falling edge is the press.
        button.wait_for_falling_edge().await;

        if let Some(event) = debouncer.update(SELECT_BUTTON, now_ticks()) {
            info!("button press");
            if !offer(&EVENT_QUEUE, event) {
                debug!("button event dropped (queue full)");
            }
        }
    }
}

/// Report the thermal comparator's over-temperature output.
///
/// The alert is a level, so it is re-reported every 250 ms while
/// asserted; a drop on a full queue just means the next report lands a
/// moment later.
#[embassy_executor::task]
pub async fn thermal_watch_task(pin: AnyPin) -> ! {
    let mut alert = Input::new(pin, Pull::Down);

    loop {
        alert.wait_for_high().await;
        warn!("over-temperature asserted");

        while alert.is_high() {
            let event = Event {
                kind: EventKind::OverTemp,
                when: now_ticks(),
            };
            let _ = offer(&EVENT_QUEUE, event);
            Timer::after(Duration::from_millis(250)).await;
        }

        info!("over-temperature cleared");
    }
}
