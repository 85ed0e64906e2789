//! Integer microstep position counters

use serde::{Deserialize, Serialize};

/// Range policy for an encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncoderRange {
    /// Position wraps modulo one revolution, staying in [0, revolution_steps)
    Wrapping { revolution_steps: i64 },
    /// Position saturates at physical stops, staying in [min_steps, max_steps]
    Clamped { min_steps: i64, max_steps: i64 },
}

/// Result of advancing an encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The full step count was applied
    Moved,
    /// A clamped encoder ran into one of its stops
    HitLimit,
}

/// Wrap a step position into [0, revolution_steps)
pub fn wrap(position: i64, revolution_steps: i64) -> i64 {
    let wrapped = position % revolution_steps;
    if wrapped < 0 {
        wrapped + revolution_steps
    } else {
        wrapped
    }
}

/// Microstep position counter for one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encoder {
    position: i64,
    range: EncoderRange,
}

impl Encoder {
    /// New encoder at position zero
    pub fn new(range: EncoderRange) -> Self {
        Self { position: 0, range }
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn range(&self) -> EncoderRange {
        self.range
    }

    /// Move by a signed number of steps, wrapping or clamping per the range
    /// policy
    pub fn advance(&mut self, steps: i64) -> StepOutcome {
        match self.range {
            EncoderRange::Wrapping { revolution_steps } => {
                let steps = steps % revolution_steps;
                self.position = wrap(self.position + steps, revolution_steps);
                StepOutcome::Moved
            }
            EncoderRange::Clamped {
                min_steps,
                max_steps,
            } => {
                let moved = self.position + steps;
                if moved > max_steps {
                    self.position = max_steps;
                    StepOutcome::HitLimit
                } else if moved < min_steps {
                    self.position = min_steps;
                    StepOutcome::HitLimit
                } else {
                    self.position = moved;
                    StepOutcome::Moved
                }
            }
        }
    }

    /// Set the position directly. The value must already lie inside the range.
    pub fn set(&mut self, position: i64) {
        debug_assert!(self.contains(position));
        self.position = position;
    }

    /// Whether a position lies inside the encoder's range
    pub fn contains(&self, position: i64) -> bool {
        match self.range {
            EncoderRange::Wrapping { revolution_steps } => {
                (0..revolution_steps).contains(&position)
            }
            EncoderRange::Clamped {
                min_steps,
                max_steps,
            } => (min_steps..=max_steps).contains(&position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    const REVOLUTION: i64 = 1_000_000;

    #[test]
    fn test_wrap() {
        assert_eq!(wrap(0, REVOLUTION), 0);
        assert_eq!(wrap(REVOLUTION, REVOLUTION), 0);
        assert_eq!(wrap(-1, REVOLUTION), REVOLUTION - 1);
        assert_eq!(wrap(REVOLUTION + 5, REVOLUTION), 5);
        assert_eq!(wrap(-REVOLUTION - 5, REVOLUTION), REVOLUTION - 5);
    }

    #[test]
    fn test_wrapping_advance() {
        let mut encoder = Encoder::new(EncoderRange::Wrapping {
            revolution_steps: REVOLUTION,
        });
        assert_eq!(encoder.advance(5_000), StepOutcome::Moved);
        assert_eq!(encoder.position(), 5_000);

        encoder.advance(-10_000);
        assert_eq!(encoder.position(), REVOLUTION - 5_000);

        encoder.advance(10_000);
        assert_eq!(encoder.position(), 5_000);
    }

    #[test]
    fn test_wrapping_advance_reduces_whole_revolutions() {
        let mut encoder = Encoder::new(EncoderRange::Wrapping {
            revolution_steps: REVOLUTION,
        });
        encoder.advance(3 * REVOLUTION + 7);
        assert_eq!(encoder.position(), 7);
        encoder.advance(-2 * REVOLUTION - 10);
        assert_eq!(encoder.position(), REVOLUTION - 3);
    }

    #[test]
    fn test_wrapping_advance_randomized_stays_in_range() {
        let mut rng = rand::thread_rng();
        let mut encoder = Encoder::new(EncoderRange::Wrapping {
            revolution_steps: REVOLUTION,
        });
        for _ in 0..10_000 {
            let steps = rng.gen_range(-3 * REVOLUTION..=3 * REVOLUTION);
            encoder.advance(steps);
            assert!(
                (0..REVOLUTION).contains(&encoder.position()),
                "position {} escaped the revolution after {} steps",
                encoder.position(),
                steps
            );
        }
    }

    #[test]
    fn test_clamped_advance() {
        let mut encoder = Encoder::new(EncoderRange::Clamped {
            min_steps: -250_000,
            max_steps: 250_000,
        });
        assert_eq!(encoder.advance(100_000), StepOutcome::Moved);
        assert_eq!(encoder.position(), 100_000);

        assert_eq!(encoder.advance(200_000), StepOutcome::HitLimit);
        assert_eq!(encoder.position(), 250_000);

        assert_eq!(encoder.advance(-600_000), StepOutcome::HitLimit);
        assert_eq!(encoder.position(), -250_000);
    }

    #[test]
    fn test_clamped_advance_randomized_stays_in_range() {
        let mut rng = rand::thread_rng();
        let mut encoder = Encoder::new(EncoderRange::Clamped {
            min_steps: -250_000,
            max_steps: 250_000,
        });
        for _ in 0..10_000 {
            encoder.advance(rng.gen_range(-400_000..=400_000));
            assert!((-250_000..=250_000).contains(&encoder.position()));
        }
    }

    #[test]
    fn test_set_and_contains() {
        let mut encoder = Encoder::new(EncoderRange::Wrapping {
            revolution_steps: REVOLUTION,
        });
        assert!(encoder.contains(0));
        assert!(encoder.contains(REVOLUTION - 1));
        assert!(!encoder.contains(REVOLUTION));
        assert!(!encoder.contains(-1));
        encoder.set(42);
        assert_eq!(encoder.position(), 42);
    }
}
