//! Interrupt-context input decoding.
//!
//! Both decoders are pure accumulator structs: the firmware's input tasks
//! feed them raw pin levels and tick counts, and enqueue whatever events
//! they emit. Each accumulator is owned by exactly one producer, so there
//! is no cross-interrupt sharing to protect.

pub mod debounce;
pub mod quadrature;

pub use debounce::ButtonDebouncer;
pub use quadrature::QuadratureDecoder;
