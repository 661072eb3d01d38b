//! Fire-cycle simulator: magazine, reload and pellet mechanics over a fixed window.
//!
//! The first round of every burst leaves at t=0 of that burst; the rest follow at
//! the steady rate. A finite magazine repeats "empty the magazine, then reload"
//! until the window closes; an unlimited one never reloads.

use super::{Scenario, Weapon};
use serde::Serialize;

/// Slack applied before flooring cycle and round counts, so a round landing
/// exactly on the window boundary survives float error.
const FLOOR_EPSILON: f64 = 1e-9;

/// Per-step result of one DPS simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FireCycle {
    pub damage_per_hit: f64,
    pub rounds_per_sec: f64,
    /// Parsed magazine size; infinite for weapons without reloads.
    pub magazine: f64,
    /// Time to empty one magazine. `None` when the magazine is unlimited.
    pub magazine_empty_secs: Option<f64>,
    pub reload_secs: f64,
    /// Magazine-empty time plus reload. `None` when the magazine is unlimited.
    pub cycle_secs: Option<f64>,
    pub full_cycles: f64,
    pub total_rounds: f64,
    /// Rounded damage per second over the window.
    pub dps: f64,
}

/// Damage of one trigger pull: max damage scaled by zone multiplier and the pellets assumed to land.
pub fn damage_per_hit(weapon: &Weapon, scenario: &Scenario) -> f64 {
    let pellet_mult = match weapon.pellet_count {
        Some(n) if n > 0 => f64::from(n) * scenario.pellet_hit_percent / 100.0,
        _ => 1.0,
    };
    weapon.damage_max * weapon.zone_multiplier(scenario.zone) * pellet_mult
}

/// Run the cycle simulation for one weapon.
pub fn simulate(weapon: &Weapon, scenario: &Scenario) -> FireCycle {
    let window = scenario.duration_secs;
    let damage = damage_per_hit(weapon, scenario);
    let rps = weapon.firerate / 60.0;
    let magazine = weapon.magazine();

    if magazine == f64::INFINITY {
        let total_rounds = 1.0 + window * rps;
        return FireCycle {
            damage_per_hit: damage,
            rounds_per_sec: rps,
            magazine,
            magazine_empty_secs: None,
            reload_secs: 0.0,
            cycle_secs: None,
            full_cycles: 0.0,
            total_rounds,
            dps: round_half_up(total_rounds * damage / window),
        };
    }

    let reload_secs = weapon.reload_secs();
    let empty_secs = (magazine - 1.0) / rps;
    let cycle_secs = empty_secs + reload_secs;
    let full_cycles = floor_tolerant(window / cycle_secs);
    let leftover_secs = window - full_cycles * cycle_secs;
    let leftover_rounds = nan_min(magazine, 1.0 + floor_tolerant(leftover_secs * rps));
    let total_rounds = full_cycles * magazine + leftover_rounds;

    FireCycle {
        damage_per_hit: damage,
        rounds_per_sec: rps,
        magazine,
        magazine_empty_secs: Some(empty_secs),
        reload_secs,
        cycle_secs: Some(cycle_secs),
        full_cycles,
        total_rounds,
        dps: round_half_up(total_rounds * damage / window),
    }
}

/// Rounded DPS only.
pub fn simulate_dps(weapon: &Weapon, scenario: &Scenario) -> f64 {
    simulate(weapon, scenario).dps
}

/// Round to nearest integer with halves going up (-2.5 -> -2). NaN and infinities pass through.
pub fn round_half_up(x: f64) -> f64 {
    let f = x.floor();
    if x - f >= 0.5 {
        f + 1.0
    } else {
        f
    }
}

fn floor_tolerant(x: f64) -> f64 {
    (x + FLOOR_EPSILON).floor()
}

// f64::min drops NaN; bad ammo data must stay NaN.
fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{StatValue, Zone};

    fn rifle(ammo: StatValue) -> Weapon {
        let mut w = Weapon::new(20.0, 600.0, ammo);
        w.reload_speed_empty = Some(2.0);
        w
    }

    #[test]
    fn unlimited_ammo_never_reloads() {
        let c = simulate(&rifle("inf".into()), &Scenario::default());
        assert_eq!(c.total_rounds, 101.0);
        assert_eq!(c.dps, 202.0);
        assert!(c.cycle_secs.is_none());
    }

    #[test]
    fn finite_ammo_standard_reload() {
        let c = simulate(&rifle(30.0.into()), &Scenario::default());
        assert!((c.magazine_empty_secs.unwrap() - 2.9).abs() < 1e-9);
        assert!((c.cycle_secs.unwrap() - 4.9).abs() < 1e-9);
        assert_eq!(c.full_cycles, 2.0);
        assert_eq!(c.total_rounds, 63.0);
        assert_eq!(c.dps, 126.0);
    }

    #[test]
    fn missing_reload_time_fires_continuously() {
        let w = Weapon::new(20.0, 600.0, 30.0);
        let c = simulate(&w, &Scenario::default());
        assert_eq!(c.reload_secs, 0.0);
        assert_eq!(c.full_cycles, 3.0);
        assert_eq!(c.total_rounds, 104.0);
        assert_eq!(c.dps, 208.0);
    }

    #[test]
    fn per_bullet_reload_clamps_to_magazine() {
        let mut w = rifle(30.0.into());
        w.reload_per_bullet = Some(true);
        let c = simulate(&w, &Scenario::default());
        assert_eq!(c.reload_secs, 60.0);
        assert_eq!(c.full_cycles, 0.0);
        assert_eq!(c.total_rounds, 30.0);
        assert_eq!(c.dps, 60.0);
    }

    #[test]
    fn composite_ammo_is_one_magazine() {
        let c = simulate(&rifle("30+1".into()), &Scenario::default());
        assert_eq!(c.magazine, 31.0);
        // 3.0s to empty + 2s reload = 5s cycle, two full cycles fill the window.
        assert_eq!(c.full_cycles, 2.0);
        assert_eq!(c.total_rounds, 63.0);
    }

    #[test]
    fn pellets_scale_damage_per_hit() {
        let mut w = Weapon::new(10.0, 60.0, 8.0);
        w.pellet_count = Some(8);
        let sc = Scenario::new(10.0, Zone::None, 50.0);
        assert_eq!(damage_per_hit(&w, &sc), 40.0);
        let sc = Scenario::new(10.0, Zone::None, 100.0);
        assert_eq!(damage_per_hit(&w, &sc), 80.0);
    }

    #[test]
    fn zone_multiplier_applies() {
        let mut w = rifle("inf".into());
        w.head_multiplier = Some(2.0);
        let sc = Scenario::new(10.0, Zone::Head, 100.0);
        assert_eq!(simulate_dps(&w, &sc), 404.0);
        let sc = Scenario::new(10.0, Zone::Torso, 100.0);
        assert_eq!(simulate_dps(&w, &sc), 202.0);
    }

    #[test]
    fn malformed_ammo_gives_nan() {
        let c = simulate(&rifle("abc".into()), &Scenario::default());
        assert!(c.dps.is_nan());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let w = rifle(30.0.into());
        let sc = Scenario::new(17.5, Zone::None, 100.0);
        assert_eq!(simulate(&w, &sc), simulate(&w, &sc));
    }

    #[test]
    fn round_half_up_matches_display_rounding() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(2.49), 2.0);
        assert!(round_half_up(f64::NAN).is_nan());
        assert_eq!(round_half_up(f64::INFINITY), f64::INFINITY);
    }
}
