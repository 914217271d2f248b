//! Effect settings shown in the effects panel.
//!
//! Nothing here processes audio; the values are kept so the panel and the
//! status bar can show them.

use std::fmt;

/// Reverb room type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReverbKind {
    #[default]
    Hall,
    Room,
    Cathedral,
}

impl ReverbKind {
    pub fn next(self) -> Self {
        match self {
            ReverbKind::Hall => ReverbKind::Room,
            ReverbKind::Room => ReverbKind::Cathedral,
            ReverbKind::Cathedral => ReverbKind::Hall,
        }
    }

    pub fn previous(self) -> Self {
        self.next().next()
    }
}

impl fmt::Display for ReverbKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReverbKind::Hall => "Hall",
            ReverbKind::Room => "Room",
            ReverbKind::Cathedral => "Cathedral",
        })
    }
}

/// A single adjustable control in the effects panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectParam {
    ReverbKind,
    ReverbLevel,
    Bass,
    Mid,
    Treble,
    Delay,
    Distortion,
    Filter,
    Sustain,
}

impl EffectParam {
    /// Controls in panel order.
    pub const ALL: [EffectParam; 9] = [
        EffectParam::ReverbKind,
        EffectParam::ReverbLevel,
        EffectParam::Bass,
        EffectParam::Mid,
        EffectParam::Treble,
        EffectParam::Delay,
        EffectParam::Distortion,
        EffectParam::Filter,
        EffectParam::Sustain,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EffectParam::ReverbKind => "Reverb type",
            EffectParam::ReverbLevel => "Reverb",
            EffectParam::Bass => "EQ bass",
            EffectParam::Mid => "EQ mid",
            EffectParam::Treble => "EQ treble",
            EffectParam::Delay => "Delay",
            EffectParam::Distortion => "Distortion",
            EffectParam::Filter => "Filter",
            EffectParam::Sustain => "Sustain pedal",
        }
    }
}

/// Level effects run 0..=100, EQ bands -50..=50.
const LEVEL_RANGE: (i32, i32) = (0, 100);
const EQ_RANGE: (i32, i32) = (-50, 50);

fn clamp(value: i32, (min, max): (i32, i32)) -> i32 {
    value.clamp(min, max)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reverb {
    pub kind: ReverbKind,
    pub level: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Equalizer {
    pub bass: i32,
    pub mid: i32,
    pub treble: i32,
}

/// All effect settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effects {
    pub reverb: Reverb,
    pub eq: Equalizer,
    pub delay: i32,
    pub distortion: i32,
    pub filter: i32,
    pub sustain: bool,
}

impl Default for Effects {
    fn default() -> Self {
        Self {
            reverb: Reverb {
                kind: ReverbKind::Hall,
                level: 25,
            },
            eq: Equalizer::default(),
            delay: 0,
            distortion: 0,
            filter: 0,
            sustain: false,
        }
    }
}

impl Effects {
    /// Current numeric value of a control (sustain reads 0/1, reverb type its index).
    pub fn value(&self, param: EffectParam) -> i32 {
        match param {
            EffectParam::ReverbKind => self.reverb.kind as i32,
            EffectParam::ReverbLevel => self.reverb.level,
            EffectParam::Bass => self.eq.bass,
            EffectParam::Mid => self.eq.mid,
            EffectParam::Treble => self.eq.treble,
            EffectParam::Delay => self.delay,
            EffectParam::Distortion => self.distortion,
            EffectParam::Filter => self.filter,
            EffectParam::Sustain => i32::from(self.sustain),
        }
    }

    /// Sets a level or EQ control, clamping to its range.
    ///
    /// Reverb type and sustain are not numeric; use [`Effects::adjust`].
    pub fn set(&mut self, param: EffectParam, value: i32) {
        match param {
            EffectParam::ReverbLevel => self.reverb.level = clamp(value, LEVEL_RANGE),
            EffectParam::Bass => self.eq.bass = clamp(value, EQ_RANGE),
            EffectParam::Mid => self.eq.mid = clamp(value, EQ_RANGE),
            EffectParam::Treble => self.eq.treble = clamp(value, EQ_RANGE),
            EffectParam::Delay => self.delay = clamp(value, LEVEL_RANGE),
            EffectParam::Distortion => self.distortion = clamp(value, LEVEL_RANGE),
            EffectParam::Filter => self.filter = clamp(value, LEVEL_RANGE),
            EffectParam::ReverbKind | EffectParam::Sustain => {}
        }
    }

    /// Nudges a control by `steps` (negative moves down).
    ///
    /// Reverb type cycles and sustain toggles regardless of the step size.
    pub fn adjust(&mut self, param: EffectParam, steps: i32) {
        match param {
            EffectParam::ReverbKind => {
                self.reverb.kind = if steps >= 0 {
                    self.reverb.kind.next()
                } else {
                    self.reverb.kind.previous()
                };
            }
            EffectParam::Sustain => self.sustain = !self.sustain,
            _ => self.set(param, self.value(param) + steps),
        }
    }

    /// Text shown next to a control.
    pub fn display(&self, param: EffectParam) -> String {
        match param {
            EffectParam::ReverbKind => self.reverb.kind.to_string(),
            EffectParam::Sustain => (if self.sustain { "On" } else { "Off" }).to_string(),
            EffectParam::Bass | EffectParam::Mid | EffectParam::Treble => {
                format!("{:+}", self.value(param))
            }
            _ => format!("{}%", self.value(param)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let effects = Effects::default();
        assert_eq!(effects.reverb.kind, ReverbKind::Hall);
        assert_eq!(effects.reverb.level, 25);
        assert_eq!(effects.eq, Equalizer::default());
        assert!(!effects.sustain);
    }

    #[test]
    fn test_clamping() {
        let mut effects = Effects::default();
        effects.set(EffectParam::Delay, 250);
        assert_eq!(effects.delay, 100);
        effects.set(EffectParam::Bass, -80);
        assert_eq!(effects.eq.bass, -50);
        effects.adjust(EffectParam::Filter, -5);
        assert_eq!(effects.filter, 0);
    }

    #[test]
    fn test_adjust_cycles_and_toggles() {
        let mut effects = Effects::default();
        effects.adjust(EffectParam::ReverbKind, 1);
        assert_eq!(effects.reverb.kind, ReverbKind::Room);
        effects.adjust(EffectParam::ReverbKind, -1);
        effects.adjust(EffectParam::ReverbKind, -1);
        assert_eq!(effects.reverb.kind, ReverbKind::Cathedral);

        effects.adjust(EffectParam::Sustain, 1);
        assert!(effects.sustain);
        assert_eq!(effects.display(EffectParam::Sustain), "On");
    }

    #[test]
    fn test_display() {
        let mut effects = Effects::default();
        effects.set(EffectParam::Treble, 12);
        assert_eq!(effects.display(EffectParam::Treble), "+12");
        assert_eq!(effects.display(EffectParam::ReverbLevel), "25%");
        assert_eq!(effects.display(EffectParam::ReverbKind), "Hall");
    }
}
