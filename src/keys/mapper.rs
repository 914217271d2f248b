//! Computer keyboard to piano key mapping.

use super::layout::{KeyboardLayout, LAYOUT_KEY_COUNT};
use super::{key_id, SEMITONES_PER_OCTAVE};
use std::collections::HashMap;

/// Maps lowercased physical keys to piano key ids ("C4", "F#5", ...).
///
/// The mapping has no identity of its own: it is rebuilt whenever the
/// layout or base octave changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardMapping {
    base_octave: i32,
    /// (physical key, key id) in layout order.
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl KeyboardMapping {
    /// Builds the mapping for a layout starting at `base_octave`.
    pub fn new(layout: &KeyboardLayout, base_octave: i32) -> Self {
        Self::from_keys(&layout.keys, base_octave)
    }

    /// Builds the mapping from an arbitrary key list.
    ///
    /// Key `i` receives semitone `i % 12` in octave `base_octave + i / 12`.
    /// Only the first 19 keys are mapped.
    pub fn from_keys<S: AsRef<str>>(keys: &[S], base_octave: i32) -> Self {
        let mut entries = Vec::with_capacity(keys.len().min(LAYOUT_KEY_COUNT));
        let mut index = HashMap::with_capacity(entries.capacity());

        for (i, key) in keys.iter().take(LAYOUT_KEY_COUNT).enumerate() {
            let semitone = i % SEMITONES_PER_OCTAVE as usize;
            let octave = base_octave + (i / SEMITONES_PER_OCTAVE as usize) as i32;
            let physical = key.as_ref().to_lowercase();
            index.insert(physical.clone(), entries.len());
            entries.push((physical, key_id(semitone, octave)));
        }

        Self {
            base_octave,
            entries,
            index,
        }
    }

    /// Returns the key id played by a physical key, if it is mapped.
    pub fn note_for(&self, physical: &str) -> Option<&str> {
        let physical = physical.to_lowercase();
        self.index
            .get(&physical)
            .map(|&i| self.entries[i].1.as_str())
    }

    /// Returns the note for a typed character.
    pub fn note_for_char(&self, c: char) -> Option<&str> {
        let mut buf = [0u8; 4];
        self.note_for(c.encode_utf8(&mut buf))
    }

    /// Returns the physical key that plays a key id (for labelling the piano).
    pub fn key_for_note(&self, key_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, note)| note == key_id)
            .map(|(physical, _)| physical.as_str())
    }

    /// Octave assigned to the first physical key.
    pub fn base_octave(&self) -> i32 {
        self.base_octave
    }

    /// Entries in layout order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, n)| (k.as_str(), n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::LayoutId;
    use std::collections::HashSet;

    #[test]
    fn test_qwerty_octave_4() {
        let mapping = KeyboardMapping::new(LayoutId::Qwerty.layout(), 4);
        assert_eq!(mapping.note_for("q"), Some("C4"));
        assert_eq!(mapping.note_for("w"), Some("C#4"));
        assert_eq!(mapping.note_for("j"), Some("B4"));
        assert_eq!(mapping.note_for("k"), Some("C5"));
        assert_eq!(mapping.note_for("]"), Some("F#5"));
        assert_eq!(mapping.note_for("z"), None);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mapping = KeyboardMapping::new(LayoutId::Qwerty.layout(), 3);
        assert_eq!(mapping.note_for("Q"), Some("C3"));
        assert_eq!(mapping.note_for_char('E'), Some("D#3"));
    }

    #[test]
    fn test_mapping_is_injective_for_all_layouts() {
        for id in LayoutId::ALL {
            for base in 1..=7 {
                let mapping = KeyboardMapping::new(id.layout(), base);
                assert_eq!(mapping.len(), LAYOUT_KEY_COUNT);
                let notes: HashSet<_> = mapping.iter().map(|(_, n)| n).collect();
                assert_eq!(notes.len(), LAYOUT_KEY_COUNT);
            }
        }
    }

    #[test]
    fn test_short_and_long_key_lists() {
        let short = KeyboardMapping::from_keys(&["a", "b", "c"], 2);
        assert_eq!(short.len(), 3);
        assert_eq!(short.note_for("c"), Some("D2"));

        let long: Vec<String> = (0..30).map(|i| format!("k{i}")).collect();
        let mapping = KeyboardMapping::from_keys(&long, 2);
        assert_eq!(mapping.len(), LAYOUT_KEY_COUNT);
        assert_eq!(mapping.note_for("k18"), Some("F#3"));
        assert_eq!(mapping.note_for("k19"), None);
    }

    #[test]
    fn test_non_ascii_keys() {
        let mapping = KeyboardMapping::new(LayoutId::Azerty.layout(), 4);
        assert_eq!(mapping.note_for_char('ù'), Some("F5"));
        assert_eq!(mapping.note_for_char('$'), Some("F#5"));
    }

    #[test]
    fn test_key_for_note() {
        let mapping = KeyboardMapping::new(LayoutId::Dvorak.layout(), 4);
        assert_eq!(mapping.key_for_note("C4"), Some("'"));
        assert_eq!(mapping.key_for_note("C2"), None);
        assert_eq!(mapping.base_octave(), 4);
    }
}
