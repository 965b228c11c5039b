//! Rotary encoder quadrature decoding.
//!
//! The encoder produces two overlapping square waves; one mechanical
//! detent is four consistent micro-transitions. Requiring each reading to
//! match the expected forward or reverse transition absorbs electrical
//! bounce: a bouncing contact re-reads the same level (no match, ignored)
//! and a skipped level matches neither direction.

/// Maps each 2-bit level (index) to the next level under clockwise
/// rotation.
const FORWARD: [u8; 4] = [0x1, 0x3, 0x0, 0x2];

/// "No reading yet" sentinel for `last_levels` (not a valid 2-bit level).
const NO_LEVELS: u8 = 0xFF;

/// Accumulates raw quadrature transitions into whole detents.
pub struct QuadratureDecoder {
    last_levels: u8,
    count: i8,
}

impl QuadratureDecoder {
    pub const fn new() -> Self {
        Self {
            last_levels: NO_LEVELS,
            count: 0,
        }
    }

    /// Feed one raw 2-bit level reading.
    ///
    /// Returns the number of whole detents completed (signed, clockwise
    /// positive), keeping sub-detent progress for the next call. Readings
    /// inconsistent with either rotation direction are ignored.
    pub fn update(&mut self, levels: u8) -> Option<i8> {
        let levels = levels & 0x3;

        if self.last_levels == NO_LEVELS {
            // First reading after power-up: just latch it.
            self.last_levels = levels;
            return None;
        }

        if FORWARD[self.last_levels as usize] == levels {
            self.count += 1;
            self.last_levels = levels;
        } else if FORWARD[levels as usize] == self.last_levels {
            self.count -= 1;
            self.last_levels = levels;
        }

        if self.count.abs() >= 4 {
            let detents = self.count / 4;
            self.count %= 4;
            Some(detents)
        } else {
            None
        }
    }
}

impl Default for QuadratureDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive a decoder through `steps` and collect the emitted detents.
    fn run(decoder: &mut QuadratureDecoder, steps: &[u8]) -> i32 {
        steps
            .iter()
            .filter_map(|&levels| decoder.update(levels))
            .map(i32::from)
            .sum()
    }

    #[test]
    fn clean_clockwise_detent_emits_plus_one() {
        let mut decoder = QuadratureDecoder::new();
        assert_eq!(decoder.update(0x3), None); // latch initial level

        assert_eq!(decoder.update(0x2), None);
        assert_eq!(decoder.update(0x0), None);
        assert_eq!(decoder.update(0x1), None);
        assert_eq!(decoder.update(0x3), Some(1));
    }

    #[test]
    fn clean_counter_clockwise_detent_emits_minus_one() {
        let mut decoder = QuadratureDecoder::new();
        assert_eq!(decoder.update(0x3), None);

        assert_eq!(decoder.update(0x1), None);
        assert_eq!(decoder.update(0x0), None);
        assert_eq!(decoder.update(0x2), None);
        assert_eq!(decoder.update(0x3), Some(-1));
    }

    #[test]
    fn inconsistent_reading_changes_nothing() {
        let mut decoder = QuadratureDecoder::new();
        decoder.update(0x3);
        decoder.update(0x2); // one forward step

        // 0x1 is neither forward-of-0x2 (0x0) nor has 0x2 forward of it
        // (FORWARD[1] = 0x3), so it must be ignored entirely.
        assert_eq!(decoder.update(0x1), None);

        // The forward sequence resumes from the retained level.
        assert_eq!(decoder.update(0x0), None);
        assert_eq!(decoder.update(0x1), None);
        assert_eq!(decoder.update(0x3), Some(1));
    }

    #[test]
    fn residual_progress_carries_into_next_detent() {
        let mut decoder = QuadratureDecoder::new();
        decoder.update(0x3);

        // One full detent plus two extra transitions.
        assert_eq!(run(&mut decoder, &[0x2, 0x0, 0x1, 0x3, 0x2, 0x0]), 1);
        // Two more complete the second detent.
        assert_eq!(run(&mut decoder, &[0x1, 0x3]), 1);
    }

    #[test]
    fn direction_reversal_cancels_progress() {
        let mut decoder = QuadratureDecoder::new();
        decoder.update(0x3);

        decoder.update(0x2); // +1
        decoder.update(0x0); // +2
        decoder.update(0x2); // back to +1
        decoder.update(0x0); // +2 again
        assert_eq!(run(&mut decoder, &[0x1, 0x3]), 1);
    }
}
