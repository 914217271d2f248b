//! Piano key generation for a range of octaves.

use super::{key_id, midi_note};

/// Octave of the lowest generated key.
pub const BASE_OCTAVE: i32 = 2;

/// Most octaves the generator produces.
pub const MAX_OCTAVE_RANGE: u32 = 7;

/// White key semitone offsets (C D E F G A B).
const WHITE_OFFSETS: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Black key following each white key, or None after E and B.
const BLACK_AFTER_WHITE: [Option<i32>; 7] = [Some(1), Some(3), None, Some(6), Some(8), Some(10), None];

/// Whether a key is white or black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    White,
    Black,
}

/// A single playable key on the on-screen piano.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PianoKey {
    /// Note name plus octave, e.g. "C#4".
    pub id: String,
    /// Note name without octave, e.g. "C#".
    pub note: &'static str,
    pub octave: i32,
    pub kind: KeyKind,
    /// `octave * 12 + semitone`.
    pub midi_note: i32,
}

impl PianoKey {
    fn new(semitone: i32, octave: i32, kind: KeyKind) -> Self {
        Self {
            id: key_id(semitone as usize, octave),
            note: super::NOTE_NAMES[semitone as usize],
            octave,
            kind,
            midi_note: midi_note(octave, semitone),
        }
    }

    pub fn is_black(&self) -> bool {
        self.kind == KeyKind::Black
    }
}

/// Generates every key for `octave_range` octaves starting at [`BASE_OCTAVE`].
///
/// Keys come out in pitch order: each white key is followed by its black
/// key when one exists. The same range always yields the same list. Ranges
/// above [`MAX_OCTAVE_RANGE`] are clamped.
pub fn generate_keys(octave_range: u32) -> Vec<PianoKey> {
    let octaves = octave_range.min(MAX_OCTAVE_RANGE) as i32;
    let mut keys = Vec::with_capacity(octaves as usize * 12);

    for octave in BASE_OCTAVE..BASE_OCTAVE + octaves {
        for (white, black) in WHITE_OFFSETS.iter().zip(BLACK_AFTER_WHITE.iter()) {
            keys.push(PianoKey::new(*white, octave, KeyKind::White));
            if let Some(black) = black {
                keys.push(PianoKey::new(*black, octave, KeyKind::Black));
            }
        }
    }

    keys
}

/// Splits keys into white and black, each kept in pitch order.
pub fn split_keys(keys: &[PianoKey]) -> (Vec<&PianoKey>, Vec<&PianoKey>) {
    keys.iter().partition(|k| !k.is_black())
}

/// Returns the black key that sits just above a white key, if any.
///
/// Used by the renderer to place black keys between their white neighbours.
pub fn black_key_after<'a>(keys: &'a [PianoKey], white: &PianoKey) -> Option<&'a PianoKey> {
    keys.iter()
        .find(|k| k.is_black() && k.midi_note == white.midi_note + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seven_octave_counts() {
        let keys = generate_keys(7);
        let (white, black) = split_keys(&keys);
        assert_eq!(white.len(), 49);
        assert_eq!(black.len(), 35);
        assert!(white.iter().all(|k| k.kind == KeyKind::White));
        assert!(white.windows(2).all(|w| w[0].midi_note < w[1].midi_note));
    }

    #[test]
    fn test_midi_notes_strictly_increase() {
        let keys = generate_keys(7);
        for pair in keys.windows(2) {
            assert!(
                pair[1].midi_note > pair[0].midi_note,
                "{} !> {}",
                pair[1].id,
                pair[0].id
            );
        }
        assert_eq!(keys.first().map(|k| k.id.as_str()), Some("C2"));
        assert_eq!(keys.last().map(|k| k.id.as_str()), Some("B8"));
    }

    #[test]
    fn test_black_keys_only_on_sharps() {
        for key in generate_keys(3).iter().filter(|k| k.is_black()) {
            assert!(["C#", "D#", "F#", "G#", "A#"].contains(&key.note));
        }
    }

    #[test]
    fn test_huge_ranges_are_clamped() {
        let keys = generate_keys(u32::MAX);
        assert_eq!(keys.len(), MAX_OCTAVE_RANGE as usize * 12);
        assert_eq!(keys, generate_keys(MAX_OCTAVE_RANGE));
    }

    #[test]
    fn test_generation_is_stable() {
        assert_eq!(generate_keys(2), generate_keys(2));
        assert!(generate_keys(0).is_empty());
    }

    #[test]
    fn test_key_fields() {
        let keys = generate_keys(1);
        let c_sharp = keys.iter().find(|k| k.id == "C#2").unwrap();
        assert_eq!(c_sharp.note, "C#");
        assert_eq!(c_sharp.octave, 2);
        assert_eq!(c_sharp.midi_note, 25);

        let e = keys.iter().find(|k| k.id == "E2").unwrap();
        assert!(black_key_after(&keys, e).is_none());
        let g = keys.iter().find(|k| k.id == "G2").unwrap();
        assert_eq!(black_key_after(&keys, g).map(|k| k.id.as_str()), Some("G#2"));
    }
}
