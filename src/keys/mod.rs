//! Piano note model and computer-keyboard mapping.
//!
//! This module provides the note-name helpers shared by the piano key
//! generator, the layout tables, and the key mapper.

mod layout;
mod mapper;
mod piano;

pub use layout::{
    detect_layout, layout_keys, KeyboardLayout, LayoutId, UnknownLayout, LAYOUT_KEY_COUNT,
};
pub use mapper::KeyboardMapping;
pub use piano::{black_key_after, generate_keys, split_keys, KeyKind, PianoKey, BASE_OCTAVE};

/// Chromatic note names within an octave, starting at C.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Number of semitones in an octave.
pub const SEMITONES_PER_OCTAVE: i32 = 12;

/// Builds a key id such as "C#4" from a semitone index and an octave.
///
/// # Arguments
///
/// * `semitone` - Index into [`NOTE_NAMES`] (taken modulo 12)
/// * `octave` - Octave number
pub fn key_id(semitone: usize, octave: i32) -> String {
    format!("{}{}", NOTE_NAMES[semitone % 12], octave)
}

/// Computes the note number used by the piano model (`octave * 12 + semitone`).
///
/// This numbering puts C0 at zero, so it sits twelve below General MIDI.
#[inline]
pub fn midi_note(octave: i32, semitone: i32) -> i32 {
    octave * SEMITONES_PER_OCTAVE + semitone
}

/// Converts a note number back to a key id.
///
/// # Examples
///
/// ```
/// use keystudio::keys::note_to_name;
///
/// assert_eq!(note_to_name(48), "C4");
/// assert_eq!(note_to_name(61), "C#5");
/// ```
pub fn note_to_name(note: i32) -> String {
    let octave = note.div_euclid(SEMITONES_PER_OCTAVE);
    let semitone = note.rem_euclid(SEMITONES_PER_OCTAVE) as usize;
    key_id(semitone, octave)
}

/// Parses a key id like "C4" or "F#5" into its note number.
///
/// # Returns
///
/// The note number, or None if the name is not a valid key id
pub fn name_to_note(name: &str) -> Option<i32> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let octave_start = name.chars().position(|c| c.is_ascii_digit() || c == '-')?;
    let (note_part, octave_part) = name.split_at(octave_start);

    let semitone = NOTE_NAMES.iter().position(|&n| n == note_part)?;
    let octave: i32 = octave_part.parse().ok()?;

    Some(midi_note(octave, semitone as i32))
}

/// Returns true for pitch classes that sit on black keys.
#[inline]
pub fn is_black_semitone(semitone: i32) -> bool {
    matches!(semitone.rem_euclid(SEMITONES_PER_OCTAVE), 1 | 3 | 6 | 8 | 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_to_name() {
        assert_eq!(note_to_name(0), "C0");
        assert_eq!(note_to_name(48), "C4");
        assert_eq!(note_to_name(57), "A4");
        assert_eq!(note_to_name(-1), "B-1");
    }

    #[test]
    fn test_name_to_note() {
        assert_eq!(name_to_note("C4"), Some(48));
        assert_eq!(name_to_note("F#5"), Some(66));
        assert_eq!(name_to_note("B-1"), Some(-1));
        assert_eq!(name_to_note("H2"), None);
        assert_eq!(name_to_note(""), None);
    }

    #[test]
    fn test_black_semitones() {
        let black: Vec<i32> = (0..12).filter(|&s| is_black_semitone(s)).collect();
        assert_eq!(black, vec![1, 3, 6, 8, 10]);
    }
}
