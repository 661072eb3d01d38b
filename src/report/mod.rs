//! Plain-text tables for the CLI and the JSON report file.

use crate::catalog::Catalog;
use crate::compare::{Comparison, Verdict};
use crate::model::{format_number, FireCycle, Scenario, Zone};
use crate::rank::RankEntry;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct WeaponReport {
    pub name: String,
    pub category: String,
    /// Rounded DPS per target zone, under the report scenario otherwise.
    pub dps: BTreeMap<Zone, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogReport {
    pub generated_at: DateTime<Utc>,
    pub scenario: Scenario,
    pub weapons: Vec<WeaponReport>,
}

/// DPS of every weapon for every zone.
pub fn build_report(catalog: &Catalog, scenario: &Scenario) -> CatalogReport {
    let weapons = catalog
        .names()
        .map(|name| {
            let dps = Zone::ALL
                .iter()
                .filter_map(|&zone| {
                    let sc = Scenario { zone, ..*scenario };
                    catalog.compute_dps(name, &sc).map(|d| (zone, d))
                })
                .collect();
            WeaponReport {
                name: name.to_string(),
                category: catalog.category_of(name).to_string(),
                dps,
            }
        })
        .collect();
    CatalogReport {
        generated_at: Utc::now(),
        scenario: *scenario,
        weapons,
    }
}

pub fn write_json_report(report: &CatalogReport, path: &Path) -> Result<(), String> {
    let json = serde_json::to_string_pretty(report).map_err(|e| e.to_string())?;
    fs::write(path, json).map_err(|e| e.to_string())?;
    Ok(())
}

fn marker(v: Verdict) -> &'static str {
    match v {
        Verdict::Better => "+",
        Verdict::Worse => "-",
        Verdict::Same => "=",
        Verdict::Incomparable => " ",
    }
}

/// Side-by-side table: left value, stat label, right value, each tagged with its verdict.
pub fn render_comparison(c: &Comparison) -> String {
    let label_w = c
        .rows
        .iter()
        .map(|r| r.label.len())
        .chain(["Class".len()])
        .max()
        .unwrap_or(0);
    let left_w = c
        .rows
        .iter()
        .map(|r| r.left_display().chars().count())
        .chain([c.left.chars().count(), c.left_category.chars().count()])
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(out, "  {:<left_w$}   {:<label_w$}   {}", c.left, "", c.right);
    let _ = writeln!(
        out,
        "  {:<left_w$}   {:<label_w$}   {}",
        c.left_category, "Class", c.right_category
    );
    for r in &c.rows {
        let _ = writeln!(
            out,
            "{} {:<left_w$}   {:<label_w$}   {} {}",
            marker(r.left_verdict),
            r.left_display(),
            r.label,
            marker(r.right_verdict),
            r.right_display(),
        );
    }
    out
}

pub fn render_ranking(entries: &[RankEntry]) -> String {
    if entries.is_empty() {
        return "No matching weapons.\n".to_string();
    }
    let name_w = entries.iter().map(|e| e.name.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for e in entries {
        let _ = writeln!(
            out,
            "#{:<4} {:<name_w$}  {}",
            e.placement,
            e.name,
            e.value
        );
    }
    out
}

pub fn render_cycle(name: &str, scenario: &Scenario, c: &FireCycle) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: {} DPS over {}s (zone {}, pellet hit {}%)",
        name,
        format_number(c.dps),
        format_number(scenario.duration_secs),
        scenario.zone,
        format_number(scenario.pellet_hit_percent)
    );
    let _ = writeln!(out, "  damage per hit:  {:.2}", c.damage_per_hit);
    let _ = writeln!(out, "  rounds/sec:      {:.3}", c.rounds_per_sec);
    match c.cycle_secs {
        Some(cycle) => {
            let _ = writeln!(out, "  magazine:        {}", format_number(c.magazine));
            if let Some(empty) = c.magazine_empty_secs {
                let _ = writeln!(out, "  empty time (s):  {:.3}", empty);
            }
            let _ = writeln!(out, "  reload (s):      {:.3}", c.reload_secs);
            let _ = writeln!(out, "  cycle (s):       {:.3}", cycle);
            let _ = writeln!(out, "  full cycles:     {}", format_number(c.full_cycles));
        }
        None => {
            let _ = writeln!(out, "  magazine:        unlimited");
        }
    }
    let _ = writeln!(out, "  rounds fired:    {:.2}", c.total_rounds);
    out
}
