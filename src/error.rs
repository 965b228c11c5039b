//! Unified error type for the embedded layer.
//!
//! The UI core itself is event-driven and infallible by design (the only
//! modeled hardware fault is over-temperature, which arrives as an
//! event); these variants cover the hardware collaborators. All variants
//! carry only fixed-size data - no `alloc`.

/// Top-level error type used across the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Storage
    /// Flash read/write/erase failed.
    Storage,

    /// Stored settings block failed to decode (wrong length or version).
    InvalidSettings,

    // UI / Display
    /// I²C transaction to the display failed.
    Display,
}
