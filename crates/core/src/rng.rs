//! RNG module - uniform random piece selection
//!
//! Each draw picks one of the seven kinds with equal probability, independent
//! of history. There is no bag and no repeat protection.
//!
//! The generator is a small LCG so that a game state (which carries it) stays
//! a plain `Clone` value and a seed reproduces a whole game.

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Scales from the high bits; the low bits of a power-of-two LCG have
    /// short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Uniform, memoryless piece generator
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PiecePicker {
    rng: SimpleRng,
}

impl PiecePicker {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }

    /// Draw the next kind.
    pub fn draw(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.next_range(PieceKind::ALL.len() as u32) as usize]
    }

    /// Current generator state (reseeding with it continues the sequence).
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for PiecePicker {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed_is_remapped() {
        assert_eq!(SimpleRng::new(0), SimpleRng::new(1));
    }

    #[test]
    fn test_next_range_bounds() {
        let mut rng = SimpleRng::new(99);
        for _ in 0..1000 {
            assert!(rng.next_range(7) < 7);
        }
    }

    #[test]
    fn test_picker_covers_every_kind() {
        let mut picker = PiecePicker::new(7);
        let mut counts = [0u32; 7];
        for _ in 0..7000 {
            let kind = picker.draw();
            counts[(kind.color_id() - 1) as usize] += 1;
        }
        // Roughly uniform: every kind lands within ±30% of 1000.
        for (i, &c) in counts.iter().enumerate() {
            assert!((700..=1300).contains(&c), "kind #{} drawn {} times", i, c);
        }
    }

    #[test]
    fn test_picker_allows_repeats() {
        // Independent draws must eventually produce the same kind twice in a row.
        let mut picker = PiecePicker::new(3);
        let mut prev = picker.draw();
        let mut repeated = false;
        for _ in 0..500 {
            let next = picker.draw();
            if next == prev {
                repeated = true;
                break;
            }
            prev = next;
        }
        assert!(repeated);
    }

    #[test]
    fn test_reseeding_with_state_continues_sequence() {
        let mut a = PiecePicker::new(42);
        a.draw();
        let mut b = PiecePicker::new(a.seed());
        for _ in 0..20 {
            assert_eq!(a.draw(), b.draw());
        }
    }
}
