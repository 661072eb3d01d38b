//! Weapon model: attribute record, stat values, target zones, DPS scenario.

mod ammo;
mod cycle;

pub use ammo::{coerce_number, coerce_str, parse_ammo_str, parse_ammo_value, AMMO_UNLIMITED};
pub use cycle::{damage_per_hit, round_half_up, simulate, simulate_dps, FireCycle};

use crate::config::{DEFAULT_DURATION_SECS, DEFAULT_PELLET_HIT_PERCENT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A single attribute value as it appears in weapon data.
/// Numbers, strings (`"inf"`, `"30+1"`, labels) and flags are all kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<f64> for StatValue {
    fn from(n: f64) -> Self {
        StatValue::Number(n)
    }
}

impl From<bool> for StatValue {
    fn from(b: bool) -> Self {
        StatValue::Bool(b)
    }
}

impl From<&str> for StatValue {
    fn from(s: &str) -> Self {
        StatValue::Text(s.to_string())
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Bool(b) => write!(f, "{}", b),
            StatValue::Number(n) => f.write_str(&format_number(*n)),
            StatValue::Text(s) => f.write_str(s),
        }
    }
}

/// Format a number the way the data reads: integers without a fractional part.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Weapon attribute record. Typed fields drive the simulator; every other
/// key from the data file is kept in `extra` and only compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub damage_max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_min: Option<f64>,
    /// Rounds per minute.
    pub firerate: f64,
    /// Magazine size: a number, `"a+b"` for combined pools, or `"inf"`.
    pub ammo: StatValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reload_speed_empty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reload_speed_partial: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reload_per_bullet: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pellet_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_multiplier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub torso_multiplier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limb_multiplier: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, StatValue>,
}

impl Weapon {
    /// Minimal record; remaining attributes absent.
    pub fn new(damage_max: f64, firerate: f64, ammo: impl Into<StatValue>) -> Self {
        Self {
            damage_max,
            damage_min: None,
            firerate,
            ammo: ammo.into(),
            reload_speed_empty: None,
            reload_speed_partial: None,
            reload_per_bullet: None,
            pellet_count: None,
            head_multiplier: None,
            torso_multiplier: None,
            limb_multiplier: None,
            extra: BTreeMap::new(),
        }
    }

    /// Look up an attribute by its data key. `None` when the weapon does not carry it.
    pub fn attribute(&self, key: &str) -> Option<StatValue> {
        let num = |v: Option<f64>| v.map(StatValue::Number);
        match key {
            "damage_max" => num(Some(self.damage_max)),
            "damage_min" => num(self.damage_min),
            "firerate" => num(Some(self.firerate)),
            "ammo" => Some(self.ammo.clone()),
            "reload_speed_empty" => num(self.reload_speed_empty),
            "reload_speed_partial" => num(self.reload_speed_partial),
            "reload_per_bullet" => self.reload_per_bullet.map(StatValue::Bool),
            "pellet_count" => num(self.pellet_count.map(f64::from)),
            "head_multiplier" => num(self.head_multiplier),
            "torso_multiplier" => num(self.torso_multiplier),
            "limb_multiplier" => num(self.limb_multiplier),
            other => self.extra.get(other).cloned(),
        }
    }

    /// Damage multiplier for a hit on `zone`; 1 when untargeted or not declared.
    pub fn zone_multiplier(&self, zone: Zone) -> f64 {
        match zone {
            Zone::None => 1.0,
            Zone::Head => self.head_multiplier.unwrap_or(1.0),
            Zone::Torso => self.torso_multiplier.unwrap_or(1.0),
            Zone::Limb => self.limb_multiplier.unwrap_or(1.0),
        }
    }

    /// Seconds to reload a full magazine. An absent reload time counts as
    /// instant and an absent per-bullet flag as a flat reload.
    pub fn reload_secs(&self) -> f64 {
        let secs = self.reload_speed_empty.unwrap_or(0.0);
        if self.reload_per_bullet.unwrap_or(false) {
            self.magazine() * secs
        } else {
            secs
        }
    }

    /// Magazine size after ammo parsing; may be infinite or NaN.
    pub fn magazine(&self) -> f64 {
        parse_ammo_value(&self.ammo)
    }
}

/// Target zone a DPS scenario assumes every hit lands on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    #[default]
    None,
    Head,
    Torso,
    Limb,
}

impl Zone {
    pub const ALL: [Zone; 4] = [Zone::None, Zone::Head, Zone::Torso, Zone::Limb];

    pub fn as_str(self) -> &'static str {
        match self {
            Zone::None => "none",
            Zone::Head => "head",
            Zone::Torso => "torso",
            Zone::Limb => "limb",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Zone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Zone::None),
            "head" => Ok(Zone::Head),
            "torso" => Ok(Zone::Torso),
            "limb" => Ok(Zone::Limb),
            other => Err(format!(
                "unknown zone {:?} (expected none, head, torso or limb)",
                other
            )),
        }
    }
}

/// Caller-supplied DPS parameters. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scenario {
    /// Simulated window in seconds.
    pub duration_secs: f64,
    pub zone: Zone,
    /// Share of pellets assumed to hit, 0-100.
    pub pellet_hit_percent: f64,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            zone: Zone::None,
            pellet_hit_percent: DEFAULT_PELLET_HIT_PERCENT,
        }
    }
}

impl Scenario {
    pub fn new(duration_secs: f64, zone: Zone, pellet_hit_percent: f64) -> Self {
        Self {
            duration_secs,
            zone,
            pellet_hit_percent,
        }
    }

    /// Build from raw user input: a duration that is not a positive number falls
    /// back to the default, a NaN hit share falls back to 100, and the share is clamped to 0-100.
    pub fn sanitized(duration_secs: f64, zone: Zone, pellet_hit_percent: f64) -> Self {
        let duration_secs = if duration_secs.is_finite() && duration_secs > 0.0 {
            duration_secs
        } else {
            DEFAULT_DURATION_SECS
        };
        let pellet_hit_percent = if pellet_hit_percent.is_nan() {
            DEFAULT_PELLET_HIT_PERCENT
        } else {
            pellet_hit_percent.clamp(0.0, 100.0)
        };
        Self::new(duration_secs, zone, pellet_hit_percent)
    }
}
