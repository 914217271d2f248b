//! Physical keyboard layouts used for playing the piano.
//!
//! Each layout lists 19 physical keys in the order they are assigned to
//! chromatic notes: a full octave plus seven semitones of overflow.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of physical keys every layout provides.
pub const LAYOUT_KEY_COUNT: usize = 19;

/// Identifier of a supported keyboard layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutId {
    #[default]
    Qwerty,
    Azerty,
    Qwertz,
    Dvorak,
    Colemak,
}

impl LayoutId {
    /// All layouts in display order.
    pub const ALL: [LayoutId; 5] = [
        LayoutId::Qwerty,
        LayoutId::Azerty,
        LayoutId::Qwertz,
        LayoutId::Dvorak,
        LayoutId::Colemak,
    ];

    /// Lowercase identifier ("qwerty", "azerty", ...).
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutId::Qwerty => "qwerty",
            LayoutId::Azerty => "azerty",
            LayoutId::Qwertz => "qwertz",
            LayoutId::Dvorak => "dvorak",
            LayoutId::Colemak => "colemak",
        }
    }

    /// The layout after this one, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|&l| l == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Returns the static table for this layout.
    pub fn layout(self) -> &'static KeyboardLayout {
        match self {
            LayoutId::Qwerty => &QWERTY,
            LayoutId::Azerty => &AZERTY,
            LayoutId::Qwertz => &QWERTZ,
            LayoutId::Dvorak => &DVORAK,
            LayoutId::Colemak => &COLEMAK,
        }
    }
}

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown layout name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown keyboard layout '{0}' (expected qwerty, azerty, qwertz, dvorak or colemak)")]
pub struct UnknownLayout(pub String);

impl FromStr for LayoutId {
    type Err = UnknownLayout;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|l| l.as_str() == wanted)
            .ok_or_else(|| UnknownLayout(s.to_string()))
    }
}

/// A named arrangement of physical keys.
#[derive(Debug, PartialEq, Eq)]
pub struct KeyboardLayout {
    pub id: LayoutId,
    /// Display name ("QWERTY").
    pub name: &'static str,
    /// Physical keys in note order.
    pub keys: [&'static str; LAYOUT_KEY_COUNT],
}

impl KeyboardLayout {
    /// Keys joined with dashes, e.g. "q-w-s-e-...".
    pub fn display(&self) -> String {
        self.keys.join("-")
    }
}

static QWERTY: KeyboardLayout = KeyboardLayout {
    id: LayoutId::Qwerty,
    name: "QWERTY",
    keys: [
        "q", "w", "s", "e", "d", "f", "t", "g", "y", "h", "u", "j", "k", "o", "l", "p", "m", "[",
        "]",
    ],
};

static AZERTY: KeyboardLayout = KeyboardLayout {
    id: LayoutId::Azerty,
    name: "AZERTY",
    keys: [
        "q", "z", "s", "e", "d", "f", "t", "g", "y", "h", "u", "j", "k", "o", "l", "p", "m", "ù",
        "$",
    ],
};

static QWERTZ: KeyboardLayout = KeyboardLayout {
    id: LayoutId::Qwertz,
    name: "QWERTZ",
    keys: [
        "q", "w", "s", "e", "d", "f", "t", "g", "z", "h", "u", "j", "k", "o", "l", "p", "m", "ü",
        "ö",
    ],
};

static DVORAK: KeyboardLayout = KeyboardLayout {
    id: LayoutId::Dvorak,
    name: "DVORAK",
    keys: [
        "'", ",", "o", "e", "u", "i", "d", "h", "t", "n", "s", "r", "l", "a", "g", "v", "m", "w",
        "z",
    ],
};

static COLEMAK: KeyboardLayout = KeyboardLayout {
    id: LayoutId::Colemak,
    name: "COLEMAK",
    keys: [
        "q", "w", "f", "p", "g", "j", "l", "u", "y", "h", "a", "r", "s", "t", "d", "n", "e", "i",
        "o",
    ],
};

/// Picks a layout from a locale or language hint such as "fr-FR" or "de_DE.UTF-8".
///
/// French hints map to AZERTY, German/Austrian/Swiss hints to QWERTZ, and
/// everything else (including an empty hint) to QWERTY.
pub fn detect_layout(locale: &str) -> LayoutId {
    let hint = locale.trim().to_ascii_lowercase();
    if hint.starts_with("fr") {
        LayoutId::Azerty
    } else if hint.starts_with("de") || hint.starts_with("at") || hint.starts_with("ch") {
        LayoutId::Qwertz
    } else {
        LayoutId::Qwerty
    }
}

/// Looks up a layout by id string, falling back to QWERTY for unknown ids.
pub fn layout_keys(id: &str) -> &'static KeyboardLayout {
    id.parse::<LayoutId>().unwrap_or_default().layout()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_layout_has_19_distinct_keys() {
        for id in LayoutId::ALL {
            let layout = id.layout();
            assert_eq!(layout.id, id);
            let unique: HashSet<_> = layout.keys.iter().collect();
            assert_eq!(unique.len(), LAYOUT_KEY_COUNT, "{} has duplicates", layout.name);
        }
    }

    #[test]
    fn test_layout_lookup_falls_back_to_qwerty() {
        assert_eq!(layout_keys("azerty").id, LayoutId::Azerty);
        assert_eq!(layout_keys("COLEMAK").id, LayoutId::Colemak);
        assert_eq!(layout_keys("workman").id, LayoutId::Qwerty);
        assert_eq!(layout_keys("").id, LayoutId::Qwerty);
    }

    #[test]
    fn test_detect_layout_from_locale() {
        assert_eq!(detect_layout("fr-FR"), LayoutId::Azerty);
        assert_eq!(detect_layout("fr_CA.UTF-8"), LayoutId::Azerty);
        assert_eq!(detect_layout("de-DE"), LayoutId::Qwertz);
        assert_eq!(detect_layout("AT"), LayoutId::Qwertz);
        assert_eq!(detect_layout("ch"), LayoutId::Qwertz);
        assert_eq!(detect_layout("en-US"), LayoutId::Qwerty);
        assert_eq!(detect_layout(""), LayoutId::Qwerty);
    }

    #[test]
    fn test_layout_cycle_visits_all() {
        let mut seen = HashSet::new();
        let mut id = LayoutId::Qwerty;
        for _ in 0..LayoutId::ALL.len() {
            seen.insert(id);
            id = id.next();
        }
        assert_eq!(id, LayoutId::Qwerty);
        assert_eq!(seen.len(), LayoutId::ALL.len());
    }

    #[test]
    fn test_display_string() {
        assert_eq!(
            LayoutId::Qwerty.layout().display(),
            "q-w-s-e-d-f-t-g-y-h-u-j-k-o-l-p-m-[-]"
        );
    }

    #[test]
    fn test_parse_unknown_layout() {
        assert!("bepo".parse::<LayoutId>().is_err());
        assert_eq!(" Dvorak ".parse::<LayoutId>(), Ok(LayoutId::Dvorak));
    }
}
