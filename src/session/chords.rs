//! Chord display for the keys currently held.
//!
//! [`RandomChords`] is a placeholder: it does not analyse the held notes,
//! it picks a chord at random once two or more keys are down. Real chord
//! recognition can replace it by implementing [`ChordSuggester`].

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Chords the placeholder picks from.
pub const CHORD_POOL: [&str; 7] = ["C", "Dm", "Em", "F", "G", "Am", "B°"];

/// Suggestions shown alongside any detected chord.
pub const SUGGESTED_CHORDS: [&str; 3] = ["F", "Am", "G"];

/// What the chord panel shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChordDisplay {
    pub current: Option<String>,
    pub suggested: Vec<String>,
}

impl ChordDisplay {
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.suggested.is_empty()
    }
}

/// Produces a chord display from the held key ids.
pub trait ChordSuggester {
    fn suggest(&mut self, active_keys: &[&str]) -> ChordDisplay;
}

/// Random placeholder strategy.
#[derive(Debug)]
pub struct RandomChords {
    rng: StdRng,
}

impl RandomChords {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic variant for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomChords {
    fn default() -> Self {
        Self::new()
    }
}

impl ChordSuggester for RandomChords {
    fn suggest(&mut self, active_keys: &[&str]) -> ChordDisplay {
        if active_keys.len() < 2 {
            return ChordDisplay::default();
        }
        ChordDisplay {
            current: CHORD_POOL.choose(&mut self.rng).map(|c| c.to_string()),
            suggested: SUGGESTED_CHORDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_two_keys() {
        let mut chords = RandomChords::seeded(7);
        assert!(chords.suggest(&[]).is_empty());
        assert!(chords.suggest(&["C4"]).is_empty());
    }

    #[test]
    fn test_two_keys_yield_a_chord() {
        let mut chords = RandomChords::seeded(7);
        let display = chords.suggest(&["C4", "E4"]);
        let current = display.current.unwrap();
        assert!(CHORD_POOL.contains(&current.as_str()));
        assert_eq!(display.suggested, vec!["F", "Am", "G"]);
    }

    #[test]
    fn test_seeded_is_repeatable() {
        let a: Vec<_> = (0..5)
            .map(|_| RandomChords::seeded(42).suggest(&["C4", "E4", "G4"]))
            .collect();
        assert!(a.windows(2).all(|w| w[0] == w[1]));
    }
}
