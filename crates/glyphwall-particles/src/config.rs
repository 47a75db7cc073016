//! Wall configuration (parsed from TOML or applied as a patch) and change tracking

use std::path::Path;

use glyphwall_core::{GlyphwallError, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::mode::Mode;

/// User-tunable settings, read-only to the simulation within a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WallConfig {
    pub mode: Mode,
    /// Rotate hue over time instead of holding `base_hue_degrees`
    pub rainbow: bool,
    pub base_hue_degrees: f32,
    /// Vertical position of the heart center as a fraction of surface height
    pub center_y_fraction: f32,
    pub density: f32,
    pub font_scale: f32,
    /// Breathing amplitude as a fraction of the anchor's distance from center
    pub breathe_fraction: f32,
    pub ripple_strength: f32,
    /// Peak displacement of held fields in pixels
    pub press_strength: f32,
    /// Gaussian falloff width of held fields in pixels
    pub press_radius_pixels: f32,
    /// Hue cursor advance in degrees per frame
    pub hue_rotation_speed: f32,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Burst,
            rainbow: true,
            base_hue_degrees: 340.0,
            center_y_fraction: 0.45,
            density: 0.6,
            font_scale: 1.0,
            breathe_fraction: 0.035,
            ripple_strength: 1.0,
            press_strength: 38.0,
            press_radius_pixels: 120.0,
            hue_rotation_speed: 0.4,
        }
    }
}

/// Partial configuration; `None` leaves a setting untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPatch {
    pub mode: Option<Mode>,
    pub rainbow: Option<bool>,
    #[serde(alias = "base_hue_degrees")]
    pub base_hue_degrees: Option<f32>,
    #[serde(alias = "center_y_fraction")]
    pub center_y_fraction: Option<f32>,
    pub density: Option<f32>,
    #[serde(alias = "font_scale")]
    pub font_scale: Option<f32>,
    #[serde(alias = "breathe_fraction")]
    pub breathe_fraction: Option<f32>,
    #[serde(alias = "ripple_strength")]
    pub ripple_strength: Option<f32>,
    #[serde(alias = "press_strength")]
    pub press_strength: Option<f32>,
    #[serde(alias = "press_radius_pixels")]
    pub press_radius_pixels: Option<f32>,
    #[serde(alias = "hue_rotation_speed")]
    pub hue_rotation_speed: Option<f32>,
}

/// What a `set_configuration` call actually changed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigChange {
    /// Names of settings whose value changed
    pub changed: Vec<&'static str>,
    /// The mode that was active before, when the mode changed
    pub previous_mode: Option<Mode>,
    /// Density, font scale or center moved; the lattice must be rebuilt
    pub needs_rebuild: bool,
    /// Settings whose requested value was clamped into range
    pub clamped: Vec<&'static str>,
}

impl ConfigChange {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }
}

// Accepted ranges; values outside are clamped
const HUE_RANGE: (f32, f32) = (0.0, 360.0);
const FRACTION_RANGE: (f32, f32) = (0.0, 1.0);
const FONT_SCALE_RANGE: (f32, f32) = (0.4, 3.0);
const BREATHE_RANGE: (f32, f32) = (0.0, 0.2);
const RIPPLE_STRENGTH_RANGE: (f32, f32) = (0.0, 4.0);
const PRESS_STRENGTH_RANGE: (f32, f32) = (0.0, 200.0);
const PRESS_RADIUS_RANGE: (f32, f32) = (10.0, 600.0);
const HUE_SPEED_RANGE: (f32, f32) = (-10.0, 10.0);

const KNOWN_KEYS: [&str; 11] = [
    "mode",
    "rainbow",
    "baseHueDegrees",
    "centerYFraction",
    "density",
    "fontScale",
    "breatheFraction",
    "rippleStrength",
    "pressStrength",
    "pressRadiusPixels",
    "hueRotationSpeed",
];

impl WallConfig {
    /// Parse a full config from a TOML table; missing keys keep their defaults
    pub fn from_toml(table: &toml::value::Table) -> Result<Self> {
        let mut config = Self::default();
        config.apply(&ConfigPatch::from_toml(table)?)?;
        Ok(config)
    }

    /// Load a TOML preset file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let table: toml::value::Table = toml::from_str(&text)?;
        Self::from_toml(&table)
    }

    /// Apply a patch, clamping numbers into range.
    ///
    /// A non-finite number rejects the whole patch and leaves the config as it was.
    pub fn apply(&mut self, patch: &ConfigPatch) -> Result<ConfigChange> {
        patch.validate()?;

        let mut change = ConfigChange::default();

        if let Some(mode) = patch.mode {
            if mode != self.mode {
                change.previous_mode = Some(self.mode);
                change.changed.push("mode");
                self.mode = mode;
            }
        }
        if let Some(rainbow) = patch.rainbow {
            if rainbow != self.rainbow {
                change.changed.push("rainbow");
                self.rainbow = rainbow;
            }
        }

        let mut set = |name: &'static str, slot: &mut f32, value: Option<f32>, range: (f32, f32)| {
            if let Some(requested) = value {
                let v = requested.clamp(range.0, range.1);
                if v != requested {
                    let err = GlyphwallError::ValueOutOfRange {
                        field: name.into(),
                        min: range.0 as f64,
                        max: range.1 as f64,
                        value: requested as f64,
                    };
                    warn!(clamped_to = v, "{err}");
                    change.clamped.push(name);
                }
                if v != *slot {
                    *slot = v;
                    change.changed.push(name);
                }
            }
        };
        set("baseHueDegrees", &mut self.base_hue_degrees, patch.base_hue_degrees, HUE_RANGE);
        set("centerYFraction", &mut self.center_y_fraction, patch.center_y_fraction, FRACTION_RANGE);
        set("density", &mut self.density, patch.density, FRACTION_RANGE);
        set("fontScale", &mut self.font_scale, patch.font_scale, FONT_SCALE_RANGE);
        set("breatheFraction", &mut self.breathe_fraction, patch.breathe_fraction, BREATHE_RANGE);
        set("rippleStrength", &mut self.ripple_strength, patch.ripple_strength, RIPPLE_STRENGTH_RANGE);
        set("pressStrength", &mut self.press_strength, patch.press_strength, PRESS_STRENGTH_RANGE);
        set(
            "pressRadiusPixels",
            &mut self.press_radius_pixels,
            patch.press_radius_pixels,
            PRESS_RADIUS_RANGE,
        );
        set(
            "hueRotationSpeed",
            &mut self.hue_rotation_speed,
            patch.hue_rotation_speed,
            HUE_SPEED_RANGE,
        );

        change.needs_rebuild = change
            .changed
            .iter()
            .any(|name| matches!(*name, "density" | "fontScale" | "centerYFraction"));
        Ok(change)
    }
}

impl ConfigPatch {
    /// Parse a patch from a TOML table (camelCase or snake_case keys)
    pub fn from_toml(table: &toml::value::Table) -> Result<Self> {
        for key in table.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) && !KNOWN_KEYS.contains(&camel_case(key).as_str())
            {
                warn!(key = key.as_str(), "ignoring unknown wall config key");
            }
        }

        let mode = match lookup(table, "mode") {
            Some(v) => {
                let name = v.as_str().ok_or_else(|| GlyphwallError::InvalidFieldType {
                    expected: "string".into(),
                    got: v.type_str().into(),
                })?;
                Some(name.parse::<Mode>()?)
            }
            None => None,
        };
        let rainbow = match lookup(table, "rainbow") {
            Some(v) => Some(v.as_bool().ok_or_else(|| GlyphwallError::InvalidFieldType {
                expected: "boolean".into(),
                got: v.type_str().into(),
            })?),
            None => None,
        };

        Ok(Self {
            mode,
            rainbow,
            base_hue_degrees: toml_number(table, "baseHueDegrees")?,
            center_y_fraction: toml_number(table, "centerYFraction")?,
            density: toml_number(table, "density")?,
            font_scale: toml_number(table, "fontScale")?,
            breathe_fraction: toml_number(table, "breatheFraction")?,
            ripple_strength: toml_number(table, "rippleStrength")?,
            press_strength: toml_number(table, "pressStrength")?,
            press_radius_pixels: toml_number(table, "pressRadiusPixels")?,
            hue_rotation_speed: toml_number(table, "hueRotationSpeed")?,
        })
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    fn validate(&self) -> Result<()> {
        let numbers = [
            ("baseHueDegrees", self.base_hue_degrees),
            ("centerYFraction", self.center_y_fraction),
            ("density", self.density),
            ("fontScale", self.font_scale),
            ("breatheFraction", self.breathe_fraction),
            ("rippleStrength", self.ripple_strength),
            ("pressStrength", self.press_strength),
            ("pressRadiusPixels", self.press_radius_pixels),
            ("hueRotationSpeed", self.hue_rotation_speed),
        ];
        for (name, value) in numbers {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(GlyphwallError::ConfigError(format!(
                        "{name} must be a finite number, got {v}"
                    )));
                }
            }
        }
        Ok(())
    }
}

// ── TOML helpers (handle integer/float coercion and key spelling) ──

fn lookup<'a>(table: &'a toml::value::Table, camel: &str) -> Option<&'a toml::Value> {
    table
        .get(camel)
        .or_else(|| table.get(snake_case(camel).as_str()))
}

fn toml_number(table: &toml::value::Table, camel: &str) -> Result<Option<f32>> {
    let Some(v) = lookup(table, camel) else {
        return Ok(None);
    };
    v.as_float()
        .map(|f| f as f32)
        .or_else(|| v.as_integer().map(|i| i as f32))
        .map(Some)
        .ok_or_else(|| GlyphwallError::InvalidFieldType {
            expected: "number".into(),
            got: v.type_str().into(),
        })
}

fn snake_case(camel: &str) -> String {
    let mut out = String::with_capacity(camel.len() + 4);
    for c in camel.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let config = WallConfig::default();
        assert!(config.density > 0.0 && config.density <= 1.0);
        assert!(config.press_radius_pixels > 0.0);
        assert_eq!(config.mode, Mode::Burst);
    }

    #[test]
    fn parse_from_toml() {
        let toml_str = r#"
mode = "tornado-hold"
rainbow = false
baseHueDegrees = 200
center_y_fraction = 0.5
pressRadiusPixels = 90.5
"#;
        let table: toml::value::Table = toml::from_str(toml_str).unwrap();
        let config = WallConfig::from_toml(&table).unwrap();
        assert_eq!(config.mode, Mode::TornadoHold);
        assert!(!config.rainbow);
        assert!((config.base_hue_degrees - 200.0).abs() < 0.01);
        assert!((config.center_y_fraction - 0.5).abs() < 0.01);
        assert!((config.press_radius_pixels - 90.5).abs() < 0.01);
        assert!((config.density - 0.6).abs() < 0.01);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let table: toml::value::Table = toml::from_str("mode = \"vortex\"").unwrap();
        let err = WallConfig::from_toml(&table).unwrap_err();
        assert!(matches!(err, GlyphwallError::InvalidEnumValue { .. }));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let table: toml::value::Table = toml::from_str("density = \"lots\"").unwrap();
        assert!(matches!(
            WallConfig::from_toml(&table),
            Err(GlyphwallError::InvalidFieldType { .. })
        ));
    }

    #[test]
    fn values_are_clamped() {
        let mut config = WallConfig::default();
        let patch = ConfigPatch {
            density: Some(3.0),
            press_radius_pixels: Some(-5.0),
            ..Default::default()
        };
        let change = config.apply(&patch).unwrap();
        assert_eq!(config.density, 1.0);
        assert_eq!(config.press_radius_pixels, 10.0);
        assert_eq!(change.clamped, vec!["density", "pressRadiusPixels"]);

        // Clamped again to the same value: reported, but nothing changed
        let again = config.apply(&patch).unwrap();
        assert!(again.is_empty());
        assert_eq!(again.clamped.len(), 2);
    }

    #[test]
    fn non_finite_rejects_whole_patch() {
        let mut config = WallConfig::default();
        let before = config.clone();
        let patch = ConfigPatch {
            mode: Some(Mode::Press),
            breathe_fraction: Some(f32::NAN),
            ..Default::default()
        };
        assert!(config.apply(&patch).is_err());
        assert_eq!(config, before);
    }

    #[test]
    fn identical_patch_is_a_no_op() {
        let mut config = WallConfig::default();
        let patch = ConfigPatch {
            mode: Some(Mode::Swirl),
            density: Some(0.8),
            rainbow: Some(false),
            ..Default::default()
        };
        let first = config.apply(&patch).unwrap();
        assert_eq!(first.previous_mode, Some(Mode::Burst));
        assert!(first.needs_rebuild);

        let snapshot = config.clone();
        let second = config.apply(&patch).unwrap();
        assert!(second.is_empty());
        assert!(!second.needs_rebuild);
        assert_eq!(config, snapshot);
    }

    #[test]
    fn cosmetic_change_needs_no_rebuild() {
        let mut config = WallConfig::default();
        let change = config
            .apply(&ConfigPatch {
                hue_rotation_speed: Some(2.0),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(change.changed, vec!["hueRotationSpeed"]);
        assert!(!change.needs_rebuild);
    }

    #[test]
    fn patch_from_json() {
        let patch: ConfigPatch =
            serde_json::from_str(r#"{"mode":"magnet","pressStrength":60}"#).unwrap();
        assert_eq!(patch.mode, Some(Mode::Magnet));
        assert_eq!(patch.press_strength, Some(60.0));
        assert!(patch.density.is_none());
    }

    #[test]
    fn key_spelling_helpers() {
        assert_eq!(snake_case("pressRadiusPixels"), "press_radius_pixels");
        assert_eq!(camel_case("press_radius_pixels"), "pressRadiusPixels");
    }
}
