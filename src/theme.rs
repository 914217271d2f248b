//! Colour themes and the persisted theme selection.

use crate::settings::{SettingsError, SettingsStore};

/// Settings key holding the selected theme id.
pub const THEME_KEY: &str = "piano-theme";

/// Theme used when nothing (or something unknown) is persisted.
pub const DEFAULT_THEME_ID: &str = "instagram-gradient";

/// Colours of a theme, as CSS colour strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    pub primary: &'static str,
    pub accent: &'static str,
    pub secondary: &'static str,
    /// May be a gradient; its first colour stop is used in the terminal.
    pub background: &'static str,
    pub card_bg: &'static str,
    pub key_active: &'static str,
    pub key_highlight: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub colors: ThemeColors,
}

static THEMES: [Theme; 8] = [
    Theme {
        id: "instagram-gradient",
        name: "Instagram Gradient",
        description: "Classic Instagram vibes",
        colors: ThemeColors {
            primary: "#833ab4",
            accent: "#fd1d1d",
            secondary: "#fcb045",
            background: "linear-gradient(45deg, #833ab4, #fd1d1d, #fcb045)",
            card_bg: "rgba(131, 58, 180, 0.15)",
            key_active: "#fd1d1d",
            key_highlight: "#fcb045",
        },
    },
    Theme {
        id: "ocean-breeze",
        name: "Ocean Breeze",
        description: "Calm blue waters",
        colors: ThemeColors {
            primary: "#667eea",
            accent: "#764ba2",
            secondary: "#00d2ff",
            background: "linear-gradient(45deg, #667eea, #764ba2)",
            card_bg: "rgba(102, 126, 234, 0.15)",
            key_active: "#00d2ff",
            key_highlight: "#764ba2",
        },
    },
    Theme {
        id: "sunset-vibes",
        name: "Sunset Vibes",
        description: "Warm evening colors",
        colors: ThemeColors {
            primary: "#ff9a9e",
            accent: "#fecfef",
            secondary: "#ffecd2",
            background: "linear-gradient(45deg, #ff9a9e, #fecfef, #ffecd2)",
            card_bg: "rgba(255, 154, 158, 0.15)",
            key_active: "#fecfef",
            key_highlight: "#ffecd2",
        },
    },
    Theme {
        id: "neon-nights",
        name: "Neon Nights",
        description: "Electric cyberpunk",
        colors: ThemeColors {
            primary: "#ff006e",
            accent: "#00f5ff",
            secondary: "#ffbe0b",
            background: "linear-gradient(45deg, #ff006e, #8338ec, #00f5ff)",
            card_bg: "rgba(255, 0, 110, 0.15)",
            key_active: "#00f5ff",
            key_highlight: "#ffbe0b",
        },
    },
    Theme {
        id: "forest-fresh",
        name: "Forest Fresh",
        description: "Natural green tones",
        colors: ThemeColors {
            primary: "#11998e",
            accent: "#38ef7d",
            secondary: "#7CB342",
            background: "linear-gradient(45deg, #11998e, #38ef7d)",
            card_bg: "rgba(17, 153, 142, 0.15)",
            key_active: "#38ef7d",
            key_highlight: "#7CB342",
        },
    },
    Theme {
        id: "cotton-candy",
        name: "Cotton Candy",
        description: "Sweet pastel dreams",
        colors: ThemeColors {
            primary: "#a8edea",
            accent: "#fed6e3",
            secondary: "#d299c2",
            background: "linear-gradient(45deg, #a8edea, #fed6e3)",
            card_bg: "rgba(168, 237, 234, 0.15)",
            key_active: "#fed6e3",
            key_highlight: "#d299c2",
        },
    },
    Theme {
        id: "aurora-borealis",
        name: "Aurora Borealis",
        description: "Northern lights magic",
        colors: ThemeColors {
            primary: "#667eea",
            accent: "#764ba2",
            secondary: "#f093fb",
            background: "linear-gradient(45deg, #667eea, #764ba2, #f093fb)",
            card_bg: "rgba(102, 126, 234, 0.15)",
            key_active: "#f093fb",
            key_highlight: "#764ba2",
        },
    },
    Theme {
        id: "fire-flame",
        name: "Fire Flame",
        description: "Hot and energetic",
        colors: ThemeColors {
            primary: "#ff4757",
            accent: "#ff6b8a",
            secondary: "#ffa940",
            background: "linear-gradient(45deg, #ff4757, #ff6b8a, #ffa940)",
            card_bg: "rgba(255, 71, 87, 0.15)",
            key_active: "#ff6b8a",
            key_highlight: "#ffa940",
        },
    },
];

/// All themes in display order.
pub fn themes() -> &'static [Theme] {
    &THEMES
}

/// Looks up a theme, falling back to the default for unknown ids.
pub fn get_theme(id: &str) -> &'static Theme {
    THEMES.iter().find(|t| t.id == id).unwrap_or(&THEMES[0])
}

/// Persists and restores the selected theme through a [`SettingsStore`].
pub struct ThemeStore {
    store: Box<dyn SettingsStore>,
}

impl ThemeStore {
    pub fn new(store: Box<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Returns the persisted theme, or the default when the slot is empty,
    /// unreadable, or names an unknown theme.
    pub fn load(&self) -> &'static Theme {
        match self.store.get(THEME_KEY) {
            Ok(Some(id)) => {
                let theme = get_theme(&id);
                if theme.id != id {
                    tracing::warn!("Unknown theme '{}' in settings, using {}", id, theme.id);
                }
                theme
            }
            Ok(None) => get_theme(DEFAULT_THEME_ID),
            Err(e) => {
                tracing::warn!("Failed to read theme setting: {}", e);
                get_theme(DEFAULT_THEME_ID)
            }
        }
    }

    /// Writes the theme id to the settings slot.
    pub fn save(&mut self, theme_id: &str) -> Result<(), SettingsError> {
        self.store.set(THEME_KEY, theme_id)
    }
}

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Parses the CSS colours used by the theme table.
///
/// Accepts `#rrggbb`, `rgba(r, g, b, a)` (blended over black) and
/// `linear-gradient(...)` (its first hex stop).
pub fn parse_color(css: &str) -> Option<Rgb> {
    let css = css.trim();

    if let Some(hex) = css.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        return Some(Rgb(channel(0)?, channel(2)?, channel(4)?));
    }

    if let Some(args) = css
        .strip_prefix("rgba(")
        .or_else(|| css.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.len() < 3 {
            return None;
        }
        let alpha: f32 = match parts.get(3) {
            Some(a) => a.parse().ok()?,
            None => 1.0,
        };
        let alpha = alpha.clamp(0.0, 1.0);
        let channel = |s: &str| -> Option<u8> {
            let v: f32 = s.parse().ok()?;
            Some((v.clamp(0.0, 255.0) * alpha).round() as u8)
        };
        return Some(Rgb(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?));
    }

    if css.starts_with("linear-gradient(") {
        let start = css.find('#')?;
        return parse_color(css.get(start..start + 7)?);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemorySettingsStore;

    #[test]
    fn test_theme_ids_are_unique() {
        let mut ids: Vec<_> = themes().iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), themes().len());
    }

    #[test]
    fn test_get_theme_falls_back() {
        assert_eq!(get_theme("ocean-breeze").name, "Ocean Breeze");
        assert_eq!(get_theme("no-such-theme").id, DEFAULT_THEME_ID);
    }

    #[test]
    fn test_store_defaults_without_save() {
        let store = ThemeStore::new(Box::new(MemorySettingsStore::new()));
        assert_eq!(store.load().id, "instagram-gradient");
    }

    #[test]
    fn test_store_round_trip() {
        let mut store = ThemeStore::new(Box::new(MemorySettingsStore::new()));
        store.save("ocean-breeze").unwrap();
        assert_eq!(store.load().id, "ocean-breeze");
    }

    #[test]
    fn test_store_unknown_id_falls_back() {
        let mut settings = MemorySettingsStore::new();
        settings.set(THEME_KEY, "vaporwave").unwrap();
        let store = ThemeStore::new(Box::new(settings));
        assert_eq!(store.load().id, DEFAULT_THEME_ID);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#833ab4"), Some(Rgb(0x83, 0x3a, 0xb4)));
        assert_eq!(parse_color("#7CB342"), Some(Rgb(0x7c, 0xb3, 0x42)));
        assert_eq!(parse_color("rgba(200, 100, 0, 0.5)"), Some(Rgb(100, 50, 0)));
        assert_eq!(
            parse_color("linear-gradient(45deg, #667eea, #764ba2)"),
            Some(Rgb(0x66, 0x7e, 0xea))
        );
        assert_eq!(parse_color("#fff"), None);
        assert_eq!(parse_color("tomato"), None);
    }

    #[test]
    fn test_every_theme_color_parses() {
        for theme in themes() {
            let c = theme.colors;
            for css in [
                c.primary,
                c.accent,
                c.secondary,
                c.background,
                c.card_bg,
                c.key_active,
                c.key_highlight,
            ] {
                assert!(parse_color(css).is_some(), "{}: {}", theme.id, css);
            }
        }
    }
}
