//! Search and ranking over the catalog by one stat.

use crate::catalog::Catalog;
use crate::compare::{find_stat, stat_number, DPS_KEY};
use crate::model::{Scenario, StatValue};
use crate::util::name_matches;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Restricts ranking candidates to one category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Named(s.to_string()))
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Named(n) => f.write_str(n),
        }
    }
}

/// Parameters of one ranking request.
#[derive(Debug, Clone)]
pub struct RankQuery {
    /// Case-insensitive substring of the weapon name; empty matches everything.
    pub query: String,
    pub stat_key: String,
    pub scenario: Scenario,
    pub filter: CategoryFilter,
    /// Best first: for lower-is-better stats this orders values ascending.
    pub descending: bool,
}

impl Default for RankQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            stat_key: DPS_KEY.to_string(),
            scenario: Scenario::default(),
            filter: CategoryFilter::All,
            descending: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankEntry {
    pub name: String,
    pub value: StatValue,
    /// 1-based position in the final order.
    pub placement: usize,
}

/// Rank catalog weapons by `q.stat_key`.
///
/// Weapons without a value for the stat are left out. Keys not in the stat
/// table are read straight from the records and treated as lower-is-better.
/// Values that do not coerce to a number sort last, in candidate order.
pub fn rank(catalog: &Catalog, q: &RankQuery) -> Vec<RankEntry> {
    let (higher_is_better, computed) = match find_stat(&q.stat_key) {
        Some(s) => (s.higher_is_better, s.computed),
        None => (false, false),
    };

    let candidates: Vec<&str> = match &q.filter {
        CategoryFilter::All => catalog.names().collect(),
        CategoryFilter::Named(name) => {
            let mut seen = HashSet::new();
            catalog
                .category(name)
                .map(|c| {
                    c.weapons
                        .iter()
                        .map(String::as_str)
                        .filter(|w| seen.insert(*w))
                        .collect()
                })
                .unwrap_or_default()
        }
    };

    let mut scored: Vec<(&str, StatValue, f64)> = candidates
        .into_iter()
        .filter(|name| name_matches(name, &q.query))
        .filter_map(|name| {
            let value = if computed {
                catalog.compute_dps(name, &q.scenario).map(StatValue::Number)
            } else {
                catalog.weapon(name)?.attribute(&q.stat_key)
            }?;
            let key = stat_number(&q.stat_key, Some(&value));
            Some((name, value, key))
        })
        .collect();

    let best_first = q.descending == higher_is_better;
    scored.sort_by(|a, b| compare_keys(a.2, b.2, best_first));

    scored
        .into_iter()
        .enumerate()
        .map(|(i, (name, value, _))| RankEntry {
            name: name.to_string(),
            value,
            placement: i + 1,
        })
        .collect()
}

fn compare_keys(a: f64, b: f64, reverse: bool) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => {
            let o = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            if reverse {
                o.reverse()
            } else {
                o
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use crate::model::Weapon;
    use std::collections::BTreeMap;

    fn catalog() -> Catalog {
        let mut weapons = BTreeMap::new();
        let mut ak = Weapon::new(30.0, 600.0, "30+1");
        ak.reload_speed_empty = Some(2.5);
        ak.extra.insert("weight".to_string(), StatValue::Number(4.0));
        weapons.insert("AK-47".to_string(), ak);

        let mut m4 = Weapon::new(25.0, 800.0, 30.0);
        m4.reload_speed_empty = Some(2.0);
        m4.extra.insert("weight".to_string(), StatValue::Number(3.0));
        weapons.insert("M4A1".to_string(), m4);

        let mut pump = Weapon::new(12.0, 70.0, 6.0);
        pump.pellet_count = Some(8);
        pump.reload_per_bullet = Some(true);
        pump.reload_speed_empty = Some(0.5);
        weapons.insert("Pump Shotgun".to_string(), pump);

        weapons.insert("Minigun".to_string(), Weapon::new(15.0, 1200.0, "inf"));
        weapons.insert("Prototype".to_string(), Weapon::new(10.0, 60.0, "???"));

        let categories = vec![
            Category {
                name: "Assault Rifles".to_string(),
                weapons: vec!["AK-47".to_string(), "M4A1".to_string(), "AK-47".to_string()],
            },
            Category {
                name: "Shotguns".to_string(),
                weapons: vec!["Pump Shotgun".to_string(), "Missing".to_string()],
            },
        ];
        Catalog::new(weapons, categories).unwrap()
    }

    fn names(entries: &[RankEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn descending_dps_best_first() {
        let c = catalog();
        let r = rank(&c, &RankQuery::default());
        // Minigun 302, M4A1 ~, AK-47 186, Pump, Prototype (NaN) last.
        assert_eq!(r.first().map(|e| e.name.as_str()), Some("Minigun"));
        assert_eq!(r.last().map(|e| e.name.as_str()), Some("Prototype"));
        let placements: Vec<usize> = r.iter().map(|e| e.placement).collect();
        assert_eq!(placements, (1..=r.len()).collect::<Vec<_>>());
        assert_eq!(r.len(), 5);
    }

    #[test]
    fn weapons_without_reload_keys_are_left_out() {
        let c = catalog();
        let q = RankQuery {
            stat_key: "reload_speed_empty".to_string(),
            ..RankQuery::default()
        };
        let r = rank(&c, &q);
        assert_eq!(names(&r), vec!["Pump Shotgun", "M4A1", "AK-47"]);
        assert_eq!(r[0].value, StatValue::Number(0.5));

        let q = RankQuery {
            stat_key: "reload_per_bullet".to_string(),
            ..RankQuery::default()
        };
        assert_eq!(names(&rank(&c, &q)), vec!["Pump Shotgun"]);
    }

    #[test]
    fn lower_is_better_flips_direction() {
        let c = catalog();
        let q = RankQuery {
            stat_key: "weight".to_string(),
            descending: true,
            ..RankQuery::default()
        };
        let r = rank(&c, &q);
        assert_eq!(names(&r), vec!["M4A1", "AK-47"]);
        let q = RankQuery {
            descending: false,
            ..q
        };
        assert_eq!(names(&rank(&c, &q)), vec!["AK-47", "M4A1"]);
    }

    #[test]
    fn ascending_higher_is_better() {
        let c = catalog();
        let q = RankQuery {
            stat_key: "damage_max".to_string(),
            descending: false,
            ..RankQuery::default()
        };
        let r = rank(&c, &q);
        assert_eq!(
            names(&r),
            vec!["Prototype", "Pump Shotgun", "Minigun", "M4A1", "AK-47"]
        );
    }

    #[test]
    fn ammo_ranking_uses_ammo_parser() {
        let c = catalog();
        let q = RankQuery {
            stat_key: "ammo".to_string(),
            ..RankQuery::default()
        };
        let r = rank(&c, &q);
        assert_eq!(
            names(&r),
            vec!["Minigun", "AK-47", "M4A1", "Pump Shotgun", "Prototype"]
        );
        assert_eq!(r[1].value, StatValue::from("30+1"));
    }

    #[test]
    fn missing_attribute_is_excluded() {
        let c = catalog();
        let q = RankQuery {
            stat_key: "weight".to_string(),
            ..RankQuery::default()
        };
        let r = rank(&c, &q);
        assert!(r.iter().all(|e| e.name != "Minigun" && e.name != "Pump Shotgun"));
    }

    #[test]
    fn query_and_category_filter() {
        let c = catalog();
        let q = RankQuery {
            query: "a".to_string(),
            filter: CategoryFilter::Named("Assault Rifles".to_string()),
            ..RankQuery::default()
        };
        let r = rank(&c, &q);
        assert_eq!(names(&r), vec!["M4A1", "AK-47"]);

        let q = RankQuery {
            query: "PUMP".to_string(),
            ..RankQuery::default()
        };
        assert_eq!(names(&rank(&c, &q)), vec!["Pump Shotgun"]);

        let q = RankQuery {
            filter: CategoryFilter::Named("Snipers".to_string()),
            ..RankQuery::default()
        };
        assert!(rank(&c, &q).is_empty());
    }

    #[test]
    fn category_members_missing_from_catalog_are_skipped() {
        let c = catalog();
        let q = RankQuery {
            filter: CategoryFilter::Named("Shotguns".to_string()),
            ..RankQuery::default()
        };
        assert_eq!(names(&rank(&c, &q)), vec!["Pump Shotgun"]);
    }

    #[test]
    fn ranking_is_idempotent() {
        let c = catalog();
        let q = RankQuery {
            stat_key: "firerate".to_string(),
            ..RankQuery::default()
        };
        assert_eq!(rank(&c, &q), rank(&c, &q));
    }

    #[test]
    fn category_filter_from_str() {
        assert_eq!("all".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!(
            "Shotguns".parse::<CategoryFilter>(),
            Ok(CategoryFilter::Named("Shotguns".to_string()))
        );
    }
}
