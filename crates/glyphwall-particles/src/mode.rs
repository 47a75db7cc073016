//! The fifteen pointer-interaction modes and their static tuning

use std::fmt;
use std::str::FromStr;

use glyphwall_core::GlyphwallError;
use serde::{Deserialize, Serialize};

use crate::spring::SpringProfile;

/// Interaction mode, selected externally through the configuration interface
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    #[default]
    Burst,
    Ripple,
    Press,
    Explode,
    Swirl,
    Gravity,
    Tornado,
    TornadoHold,
    Dna,
    Ring,
    Waterfall,
    Magnet,
    Tide,
    Comet,
    Flow,
}

impl Mode {
    pub const COUNT: usize = 15;

    /// Every mode, in dispatch-table order
    pub const ALL: [Mode; Mode::COUNT] = [
        Mode::Burst,
        Mode::Ripple,
        Mode::Press,
        Mode::Explode,
        Mode::Swirl,
        Mode::Gravity,
        Mode::Tornado,
        Mode::TornadoHold,
        Mode::Dna,
        Mode::Ring,
        Mode::Waterfall,
        Mode::Magnet,
        Mode::Tide,
        Mode::Comet,
        Mode::Flow,
    ];

    /// Position in `ALL` and in the field dispatch table
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Burst => "burst",
            Mode::Ripple => "ripple",
            Mode::Press => "press",
            Mode::Explode => "explode",
            Mode::Swirl => "swirl",
            Mode::Gravity => "gravity",
            Mode::Tornado => "tornado",
            Mode::TornadoHold => "tornado-hold",
            Mode::Dna => "dna",
            Mode::Ring => "ring",
            Mode::Waterfall => "waterfall",
            Mode::Magnet => "magnet",
            Mode::Tide => "tide",
            Mode::Comet => "comet",
            Mode::Flow => "flow",
        }
    }

    /// One-line summary for listings
    pub fn description(self) -> &'static str {
        match self {
            Mode::Burst => "tap: spark burst and outward kick",
            Mode::Ripple => "tap: ripple wavefront; hold: ripples follow the pointer",
            Mode::Press => "hold: push glyphs away from the pointer",
            Mode::Explode => "tap: strong kick with loose springs that re-tighten",
            Mode::Swirl => "hold: rotate glyphs around the pointer",
            Mode::Gravity => "hold: pull glyphs toward the pointer",
            Mode::Tornado => "tap: spin kick around the pointer",
            Mode::TornadoHold => "hold: wide spiral with upward lift",
            Mode::Dna => "always: two-strand helix; tap: pulse; hold: twist near pointer",
            Mode::Ring => "release: ring spin that flips direction each tap; hold: boost",
            Mode::Waterfall => "hold: glyphs cascade below the pointer and bounce off a floor",
            Mode::Magnet => "hold: two-pole field following the pointer",
            Mode::Tide => "release: horizontal traveling wave",
            Mode::Comet => "release: glyphs arc out to the pointer and back",
            Mode::Flow => "release: drifting noise field",
        }
    }

    /// Spring tuning applied on entry
    pub fn spring_profile(self) -> SpringProfile {
        match self {
            Mode::Burst => SpringProfile::new(0.035, 0.8).reverting_after(700.0),
            Mode::Explode => SpringProfile::new(0.018, 0.93).reverting_after(900.0),
            Mode::Press => SpringProfile::new(0.06, 0.62),
            Mode::Swirl => SpringProfile::new(0.05, 0.7),
            Mode::Gravity => SpringProfile::new(0.04, 0.72),
            Mode::Tornado => SpringProfile::new(0.03, 0.86).reverting_after(1200.0),
            Mode::TornadoHold => SpringProfile::new(0.04, 0.76),
            Mode::Ring => SpringProfile::new(0.05, 0.68),
            Mode::Waterfall => SpringProfile::new(0.05, 0.66),
            Mode::Magnet => SpringProfile::new(0.055, 0.64),
            Mode::Comet => SpringProfile::new(0.07, 0.6),
            Mode::Ripple | Mode::Dna | Mode::Tide | Mode::Flow => SpringProfile::BASELINE,
        }
    }

    /// Whether a press held past the arm delay enters a held sub-state
    pub fn has_hold(self) -> bool {
        matches!(
            self,
            Mode::Ripple
                | Mode::Press
                | Mode::Swirl
                | Mode::Gravity
                | Mode::TornadoHold
                | Mode::Dna
                | Mode::Ring
                | Mode::Waterfall
                | Mode::Magnet
        )
    }

    /// Length of the one-shot effect a release starts, for modes that have one
    pub fn release_window_ms(self) -> Option<f64> {
        match self {
            Mode::Ring => Some(1400.0),
            Mode::Tide => Some(2600.0),
            Mode::Comet => Some(1800.0),
            Mode::Flow => Some(3200.0),
            _ => None,
        }
    }

    fn allowed_names() -> Vec<String> {
        Mode::ALL.iter().map(|m| m.name().to_string()).collect()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = GlyphwallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        Mode::ALL
            .iter()
            .copied()
            .find(|m| m.name() == key)
            .ok_or_else(|| GlyphwallError::InvalidEnumValue {
                value: s.to_string(),
                allowed: Mode::allowed_names(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_index_order() {
        for (i, m) in Mode::ALL.iter().enumerate() {
            assert_eq!(m.index(), i);
        }
    }

    #[test]
    fn names_round_trip() {
        for m in Mode::ALL {
            assert_eq!(m.name().parse::<Mode>().unwrap(), m);
        }
        assert_eq!("TORNADO_HOLD".parse::<Mode>().unwrap(), Mode::TornadoHold);
        assert!(matches!(
            "vortex".parse::<Mode>(),
            Err(GlyphwallError::InvalidEnumValue { .. })
        ));
    }

    #[test]
    fn serde_names_match() {
        let json = serde_json::to_string(&Mode::TornadoHold).unwrap();
        assert_eq!(json, "\"tornado-hold\"");
        let m: Mode = serde_json::from_str("\"waterfall\"").unwrap();
        assert_eq!(m, Mode::Waterfall);
    }

    #[test]
    fn release_windows_only_on_decay_modes() {
        let with_window: Vec<_> = Mode::ALL
            .iter()
            .filter(|m| m.release_window_ms().is_some())
            .copied()
            .collect();
        assert_eq!(with_window, vec![Mode::Ring, Mode::Tide, Mode::Comet, Mode::Flow]);
    }

    #[test]
    fn profiles_are_stable_springs() {
        for m in Mode::ALL {
            let p = m.spring_profile();
            assert!(p.stiffness > 0.0 && p.damping > 0.0 && p.damping < 1.0, "{m}");
        }
    }
}
