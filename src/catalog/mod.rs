//! Read-only weapon catalog and ordered categories.

mod load;

pub use load::{
    catalog_from_js_module, catalog_from_json_str, catalog_from_toml_str, load_catalog,
    write_catalog_json,
};

use crate::config::MAX_CATALOG_WEAPONS;
use crate::model::{simulate, FireCycle, Scenario, Weapon};
use crate::parser::ParseError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Category name reported for weapons no category claims.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Named group of weapon names, e.g. a weapon class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub weapons: Vec<String>,
}

/// On-disk shape of JSON and TOML catalogs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    pub weapons: BTreeMap<String, Weapon>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    Io(String),
    UnsupportedFormat(String),
    Parse(ParseError),
    Decode(String),
    MissingExport(&'static str),
    Schema { weapon: String, message: String },
    InvalidData { weapon: String, reason: String },
    TooManyWeapons(usize),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io(e) => write!(f, "cannot read catalog: {}", e),
            CatalogError::UnsupportedFormat(ext) => write!(
                f,
                "unsupported catalog format {:?} (expected .js, .json or .toml)",
                ext
            ),
            CatalogError::Parse(e) => write!(f, "catalog parse error: {}", e),
            CatalogError::Decode(e) => write!(f, "catalog decode error: {}", e),
            CatalogError::MissingExport(name) => write!(f, "data module has no `{}` export", name),
            CatalogError::Schema { weapon, message } => {
                write!(f, "weapon {:?}: {}", weapon, message)
            }
            CatalogError::InvalidData { weapon, reason } => {
                write!(f, "invalid data for weapon {:?}: {}", weapon, reason)
            }
            CatalogError::TooManyWeapons(n) => write!(
                f,
                "catalog has {} weapons (max {})",
                n, MAX_CATALOG_WEAPONS
            ),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<ParseError> for CatalogError {
    fn from(e: ParseError) -> Self {
        CatalogError::Parse(e)
    }
}

/// Weapons keyed by unique name plus categories in their defined order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    weapons: BTreeMap<String, Weapon>,
    categories: Vec<Category>,
}

impl Catalog {
    /// Build a catalog, rejecting weapons whose numbers would break the simulator.
    pub fn new(
        weapons: BTreeMap<String, Weapon>,
        categories: Vec<Category>,
    ) -> Result<Self, CatalogError> {
        if weapons.len() > MAX_CATALOG_WEAPONS {
            return Err(CatalogError::TooManyWeapons(weapons.len()));
        }
        for (name, w) in &weapons {
            validate_weapon(w).map_err(|reason| CatalogError::InvalidData {
                weapon: name.clone(),
                reason,
            })?;
            if w.magazine().is_nan() {
                tracing::warn!(
                    "weapon {:?}: ammo {} is not a number; its DPS will be NaN",
                    name,
                    w.ammo
                );
            } else if w.reload_speed_empty.is_none() && w.magazine().is_finite() {
                tracing::debug!(
                    "weapon {:?} has no reload_speed_empty; simulating with instant reloads",
                    name
                );
            }
        }
        let mut claimed: HashMap<&str, &str> = HashMap::new();
        for c in &categories {
            for member in &c.weapons {
                if !weapons.contains_key(member) {
                    tracing::warn!("category {:?} lists unknown weapon {:?}", c.name, member);
                }
                if let Some(first) = claimed.get(member.as_str()) {
                    if *first != c.name {
                        tracing::debug!(
                            "weapon {:?} is in both {:?} and {:?}; using {:?}",
                            member,
                            first,
                            c.name,
                            first
                        );
                    }
                } else {
                    claimed.insert(member.as_str(), c.name.as_str());
                }
            }
        }
        Ok(Self {
            weapons,
            categories,
        })
    }

    pub fn from_file(file: CatalogFile) -> Result<Self, CatalogError> {
        Self::new(file.weapons, file.categories)
    }

    pub fn to_file(&self) -> CatalogFile {
        CatalogFile {
            weapons: self.weapons.clone(),
            categories: self.categories.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    pub fn weapon(&self, name: &str) -> Option<&Weapon> {
        self.weapons.get(name)
    }

    /// Weapon names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.weapons.keys().map(String::as_str)
    }

    pub fn weapons(&self) -> impl Iterator<Item = (&str, &Weapon)> {
        self.weapons.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// First category, in defined order, that lists `weapon`; [`UNKNOWN_CATEGORY`] otherwise.
    pub fn category_of(&self, weapon: &str) -> &str {
        self.categories
            .iter()
            .find(|c| c.weapons.iter().any(|w| w == weapon))
            .map(|c| c.name.as_str())
            .unwrap_or(UNKNOWN_CATEGORY)
    }

    /// Rounded DPS for a named weapon; `None` if the catalog has no such weapon.
    pub fn compute_dps(&self, weapon: &str, scenario: &Scenario) -> Option<f64> {
        self.simulate(weapon, scenario).map(|c| c.dps)
    }

    pub fn simulate(&self, weapon: &str, scenario: &Scenario) -> Option<FireCycle> {
        self.weapon(weapon).map(|w| simulate(w, scenario))
    }

    /// Give every weapon without a pellet count an explicit count of 1, so the
    /// pellet-hit share applies to single-projectile weapons too. Returns how many changed.
    pub fn fill_missing_pellet_counts(&mut self) -> usize {
        let mut changed = 0;
        for w in self.weapons.values_mut() {
            if w.pellet_count.is_none() {
                w.pellet_count = Some(1);
                changed += 1;
            }
        }
        changed
    }
}

fn validate_weapon(w: &Weapon) -> Result<(), String> {
    if !(w.firerate.is_finite() && w.firerate > 0.0) {
        return Err(format!("firerate must be a positive number, got {}", w.firerate));
    }
    let non_negative = [
        ("damage_max", Some(w.damage_max)),
        ("damage_min", w.damage_min),
        ("reload_speed_empty", w.reload_speed_empty),
        ("reload_speed_partial", w.reload_speed_partial),
        ("head_multiplier", w.head_multiplier),
        ("torso_multiplier", w.torso_multiplier),
        ("limb_multiplier", w.limb_multiplier),
    ];
    for (key, v) in non_negative {
        if let Some(v) = v {
            if !(v.is_finite() && v >= 0.0) {
                return Err(format!("{} must be a non-negative number, got {}", key, v));
            }
        }
    }
    if w.pellet_count == Some(0) {
        return Err("pellet_count must be at least 1".to_string());
    }
    Ok(())
}
