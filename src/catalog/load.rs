//! Catalog loading from JavaScript data modules, JSON and TOML.

use super::{Catalog, CatalogError, CatalogFile, Category};
use crate::config::MAX_CATALOG_FILE_BYTES;
use crate::model::Weapon;
use crate::parser::{parse_module, JsValue};
use crate::util::check_file_size;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const STATS_EXPORT: &str = "WEAPON_STATS";
const CATEGORIES_EXPORT: &str = "WEAPON_CATEGORIES";

/// Load a catalog, picking the format from the file extension.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    check_file_size(path, MAX_CATALOG_FILE_BYTES).map_err(CatalogError::Io)?;
    let content = fs::read_to_string(path).map_err(|e| CatalogError::Io(e.to_string()))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    let catalog = match ext.as_str() {
        "js" | "mjs" => catalog_from_js_module(&content)?,
        "json" => catalog_from_json_str(&content)?,
        "toml" => catalog_from_toml_str(&content)?,
        other => return Err(CatalogError::UnsupportedFormat(other.to_string())),
    };
    tracing::info!(
        "loaded {} weapon(s) in {} categor{} from {}",
        catalog.len(),
        catalog.categories().len(),
        if catalog.categories().len() == 1 { "y" } else { "ies" },
        path.display()
    );
    Ok(catalog)
}

pub fn catalog_from_json_str(s: &str) -> Result<Catalog, CatalogError> {
    let file: CatalogFile =
        serde_json::from_str(s).map_err(|e| CatalogError::Decode(e.to_string()))?;
    Catalog::from_file(file)
}

pub fn catalog_from_toml_str(s: &str) -> Result<Catalog, CatalogError> {
    let file: CatalogFile = toml::from_str(s).map_err(|e| CatalogError::Decode(e.to_string()))?;
    Catalog::from_file(file)
}

/// Read `WEAPON_STATS` (name -> record) and `WEAPON_CATEGORIES`
/// (class -> `{ weapons: [...] }`) from a data module.
pub fn catalog_from_js_module(s: &str) -> Result<Catalog, CatalogError> {
    let decls = parse_module(s)?;
    let find = |name: &str| decls.iter().rev().find(|(n, _)| n == name).map(|(_, v)| v);

    let stats = find(STATS_EXPORT)
        .and_then(JsValue::as_object)
        .ok_or(CatalogError::MissingExport(STATS_EXPORT))?;
    let mut weapons = BTreeMap::new();
    for (name, record) in stats {
        let weapon: Weapon =
            serde_json::from_value(record.to_json()).map_err(|e| CatalogError::Schema {
                weapon: name.clone(),
                message: e.to_string(),
            })?;
        if weapons.insert(name.clone(), weapon).is_some() {
            tracing::debug!("weapon {:?} defined twice; keeping the later record", name);
        }
    }

    let categories = match find(CATEGORIES_EXPORT).and_then(JsValue::as_object) {
        Some(entries) => categories_from_js(entries),
        None => {
            tracing::warn!(
                "data module has no {} export; every weapon is uncategorized",
                CATEGORIES_EXPORT
            );
            Vec::new()
        }
    };
    Catalog::new(weapons, categories)
}

/// One category per key: a repeated key keeps its first position and takes the later value.
fn categories_from_js(entries: &[(String, JsValue)]) -> Vec<Category> {
    let mut categories: Vec<Category> = Vec::with_capacity(entries.len());
    for (name, v) in entries {
        let category = category_from_js(name, v);
        match categories.iter_mut().find(|c| c.name == *name) {
            Some(existing) => {
                tracing::debug!("category {:?} defined twice; keeping the later list", name);
                *existing = category;
            }
            None => categories.push(category),
        }
    }
    categories
}

fn category_from_js(name: &str, v: &JsValue) -> Category {
    let weapons = v
        .get("weapons")
        .and_then(JsValue::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(JsValue::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    Category {
        name: name.to_string(),
        weapons,
    }
}

/// Write the catalog in the JSON catalog shape.
pub fn write_catalog_json(catalog: &Catalog, path: &Path) -> Result<(), String> {
    let json = serde_json::to_string_pretty(&catalog.to_file()).map_err(|e| e.to_string())?;
    fs::write(path, json).map_err(|e| e.to_string())?;
    Ok(())
}
