//! Pairwise stat classification and side-by-side weapon comparison.

use crate::catalog::Catalog;
use crate::model::{coerce_number, parse_ammo_value, Scenario, StatValue};
use serde::Serialize;

/// Key of the simulated DPS pseudo-stat.
pub const DPS_KEY: &str = "dps";

/// Placeholder shown for an attribute a weapon does not carry.
pub const MISSING: &str = "—";

/// How one side of a comparison fares against the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Same,
    Better,
    Worse,
    Incomparable,
}

/// Classify `left` relative to `right`. Equal values (both infinite included) are
/// `Same`; a NaN on either side is `Incomparable`.
pub fn classify(left: f64, right: f64, higher_is_better: bool) -> Verdict {
    if left == right {
        return Verdict::Same;
    }
    if left.is_nan() || right.is_nan() {
        return Verdict::Incomparable;
    }
    let better = if higher_is_better {
        left > right
    } else {
        left < right
    };
    if better {
        Verdict::Better
    } else {
        Verdict::Worse
    }
}

/// A comparable stat: data key, display label, direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stat {
    pub key: &'static str,
    pub label: &'static str,
    pub higher_is_better: bool,
    /// Simulated rather than read from the record.
    pub computed: bool,
}

const fn stat(key: &'static str, label: &'static str, higher_is_better: bool) -> Stat {
    Stat {
        key,
        label,
        higher_is_better,
        computed: false,
    }
}

/// Every stat shown and rankable, in display order.
pub const STATS: &[Stat] = &[
    Stat {
        key: DPS_KEY,
        label: "DPS",
        higher_is_better: true,
        computed: true,
    },
    stat("damage_max", "Damage (max)", true),
    stat("damage_min", "Damage (min)", true),
    stat("firerate", "Fire rate (RPM)", true),
    stat("damage_falloff_start", "Falloff start", true),
    stat("max_bullet_range", "Max range", true),
    stat("hip_fire_accuracy", "Hip accuracy", true),
    stat("ads_accuracy", "ADS accuracy", true),
    stat("vertical_recoil", "Vertical recoil", false),
    stat("horizontal_recoil", "Horizontal recoil", false),
    stat("head_multiplier", "Head multiplier", true),
    stat("torso_multiplier", "Torso multiplier", true),
    stat("limb_multiplier", "Limb multiplier", true),
    stat("reload_speed_partial", "Reload (partial)", false),
    stat("reload_speed_empty", "Reload (empty)", false),
    stat("equip_speed", "Equip speed", false),
    stat("aim_speed", "Aim speed", false),
    stat("weight", "Weight", false),
    stat("ammo", "Ammo", true),
    stat("pellet_count", "Pellet count", true),
    stat("reload_per_bullet", "Reload per bullet", false),
    stat("game_pass", "Game Pass", false),
];

pub fn find_stat(key: &str) -> Option<&'static Stat> {
    STATS.iter().find(|s| s.key == key)
}

/// Numeric form of a stat value: ammo goes through the ammo parser, everything else
/// through plain coercion. A missing value is NaN.
pub fn stat_number(key: &str, value: Option<&StatValue>) -> f64 {
    match value {
        None => f64::NAN,
        Some(v) if key == "ammo" => parse_ammo_value(v),
        Some(v) => coerce_number(v),
    }
}

/// Value of `stat` for a named weapon: simulated for DPS, read from the record otherwise.
/// `None` when the weapon is unknown or lacks the attribute.
pub fn stat_value(
    catalog: &Catalog,
    weapon: &str,
    stat: &Stat,
    scenario: &Scenario,
) -> Option<StatValue> {
    if stat.computed {
        catalog.compute_dps(weapon, scenario).map(StatValue::Number)
    } else {
        catalog.weapon(weapon)?.attribute(stat.key)
    }
}

/// One row of a side-by-side comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatComparison {
    pub key: &'static str,
    pub label: &'static str,
    pub left: Option<StatValue>,
    pub right: Option<StatValue>,
    pub left_verdict: Verdict,
    pub right_verdict: Verdict,
}

impl StatComparison {
    pub fn left_display(&self) -> String {
        display_or_missing(self.left.as_ref())
    }

    pub fn right_display(&self) -> String {
        display_or_missing(self.right.as_ref())
    }
}

fn display_or_missing(v: Option<&StatValue>) -> String {
    v.map(StatValue::to_string)
        .unwrap_or_else(|| MISSING.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub left: String,
    pub right: String,
    pub left_category: String,
    pub right_category: String,
    pub rows: Vec<StatComparison>,
}

/// Compare two weapons across every stat. Each side is classified against the other on its own.
pub fn compare_weapons(
    catalog: &Catalog,
    left: &str,
    right: &str,
    scenario: &Scenario,
) -> Comparison {
    let rows = STATS
        .iter()
        .map(|s| {
            let lv = stat_value(catalog, left, s, scenario);
            let rv = stat_value(catalog, right, s, scenario);
            let ln = stat_number(s.key, lv.as_ref());
            let rn = stat_number(s.key, rv.as_ref());
            StatComparison {
                key: s.key,
                label: s.label,
                left_verdict: classify(ln, rn, s.higher_is_better),
                right_verdict: classify(rn, ln, s.higher_is_better),
                left: lv,
                right: rv,
            }
        })
        .collect();
    Comparison {
        left: left.to_string(),
        right: right.to_string(),
        left_category: catalog.category_of(left).to_string(),
        right_category: catalog.category_of(right).to_string(),
        rows,
    }
}
