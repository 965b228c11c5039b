//! Front-panel UI for a programmable DC electronic load.
//!
//! The library holds everything with semantics: input decoding, the
//! event queue and pacer, the screen state machine, menus, calibration,
//! and readout formatting - all `no_std` and generic over the hardware
//! collaborator traits in [`hal`], so the whole UI runs on the host
//! under `cargo test`.
//!
//! The `embedded` feature adds the nRF52840 implementations (`panel`)
//! and the Embassy binary in `main.rs`.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod hal;
pub mod input;
pub mod settings;
pub mod ui;

#[cfg(feature = "embedded")]
pub mod panel;

pub use error::Error;
pub use event::{Event, EventKind, SamplePacer, Ticks};
pub use settings::Settings;
pub use ui::Ui;
