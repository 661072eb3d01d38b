//! Weapon DPS simulator and stat ranker — CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use weapon_ranker::catalog::{load_catalog, write_catalog_json, Catalog};
use weapon_ranker::compare::{compare_weapons, DPS_KEY, STATS};
use weapon_ranker::config::Settings;
use weapon_ranker::model::{Scenario, Zone};
use weapon_ranker::rank::{rank, CategoryFilter, RankQuery};
use weapon_ranker::report::{
    build_report, render_comparison, render_cycle, render_ranking, write_json_report,
};
use weapon_ranker::util::{init_logging, normalize_name};

#[derive(Parser)]
#[command(name = "weapon-ranker")]
#[command(about = "Weapon DPS simulator with side-by-side comparison and stat ranking")]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (defaults to ./weapon-ranker.toml when present).
    #[arg(long, value_name = "TOML", global = true)]
    config: Option<PathBuf>,

    /// Catalog file: .js data module, .json or .toml.
    #[arg(long, value_name = "PATH", global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Default)]
struct ScenarioArgs {
    /// Simulated window in seconds.
    #[arg(long, value_name = "SECS")]
    duration: Option<f64>,
    /// Target zone: none, head, torso or limb.
    #[arg(long)]
    zone: Option<Zone>,
    /// Share of pellets assumed to hit (0-100).
    #[arg(long, value_name = "PERCENT")]
    pellet_hit: Option<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortOrder {
    Asc,
    Desc,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one weapon and print its DPS with the fire-cycle breakdown.
    Dps {
        weapon: String,
        #[command(flatten)]
        scenario: ScenarioArgs,
    },
    /// Compare two weapons stat by stat.
    Compare {
        left: String,
        right: String,
        #[command(flatten)]
        scenario: ScenarioArgs,
    },
    /// Rank weapons by one stat, optionally filtered by name and class.
    Rank {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value = DPS_KEY)]
        stat: String,
        #[arg(long, default_value = "all")]
        class: CategoryFilter,
        #[arg(long, value_enum, default_value = "desc")]
        order: SortOrder,
        #[command(flatten)]
        scenario: ScenarioArgs,
    },
    /// List rankable stats.
    Stats,
    /// Write a JSON report with every weapon's DPS per zone.
    Report {
        #[arg(long, value_name = "DIR", default_value = "out")]
        out: PathBuf,
        #[command(flatten)]
        scenario: ScenarioArgs,
    },
    /// Give every weapon without a pellet count a count of 1 and write the catalog as JSON.
    FillPellets {
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },
}

fn main() -> Result<(), String> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let settings = Settings::load(cli.config.as_deref())?;
    let catalog_path = cli.catalog.clone().or_else(|| settings.catalog.clone());
    let scenario_of =
        |a: &ScenarioArgs| settings.scenario.resolve(a.duration, a.zone, a.pellet_hit);

    match cli.command {
        Commands::Stats => {
            run_stats();
            Ok(())
        }
        Commands::Dps { weapon, scenario } => {
            let catalog = open_catalog(catalog_path.as_deref())?;
            run_dps(&catalog, &weapon, &scenario_of(&scenario))
        }
        Commands::Compare {
            left,
            right,
            scenario,
        } => {
            let catalog = open_catalog(catalog_path.as_deref())?;
            run_compare(&catalog, &left, &right, &scenario_of(&scenario))
        }
        Commands::Rank {
            query,
            stat,
            class,
            order,
            scenario,
        } => {
            let catalog = open_catalog(catalog_path.as_deref())?;
            run_rank(
                &catalog,
                RankQuery {
                    query,
                    stat_key: stat,
                    scenario: scenario_of(&scenario),
                    filter: class,
                    descending: matches!(order, SortOrder::Desc),
                },
            )
        }
        Commands::Report { out, scenario } => {
            let catalog = open_catalog(catalog_path.as_deref())?;
            run_report(&catalog, &out, &scenario_of(&scenario))
        }
        Commands::FillPellets { out } => {
            let mut catalog = open_catalog(catalog_path.as_deref())?;
            let changed = catalog.fill_missing_pellet_counts();
            write_catalog_json(&catalog, &out)?;
            tracing::info!(
                "set pellet_count = 1 on {} weapon(s); wrote {}",
                changed,
                out.display()
            );
            Ok(())
        }
    }
}

fn open_catalog(path: Option<&Path>) -> Result<Catalog, String> {
    let path = path.ok_or("provide --catalog or set `catalog` in weapon-ranker.toml")?;
    load_catalog(path).map_err(|e| e.to_string())
}

/// Exact name first, then a case-insensitive match.
fn resolve_weapon(catalog: &Catalog, name: &str) -> Result<String, String> {
    if catalog.weapon(name).is_some() {
        return Ok(name.to_string());
    }
    let key = normalize_name(name);
    catalog
        .names()
        .find(|n| normalize_name(n) == key)
        .map(str::to_string)
        .ok_or_else(|| format!("weapon not found in catalog: {}", name))
}

fn run_stats() {
    for s in STATS {
        println!(
            "{:<22} {:<20} {}",
            s.key,
            s.label,
            if s.higher_is_better {
                "higher is better"
            } else {
                "lower is better"
            }
        );
    }
}

fn run_dps(catalog: &Catalog, weapon: &str, scenario: &Scenario) -> Result<(), String> {
    let name = resolve_weapon(catalog, weapon)?;
    let cycle = catalog
        .simulate(&name, scenario)
        .ok_or_else(|| format!("weapon not found in catalog: {}", weapon))?;
    tracing::debug!("simulated {} with {:?}", name, scenario);
    print!("{}", render_cycle(&name, scenario, &cycle));
    println!("  class:           {}", catalog.category_of(&name));
    Ok(())
}

fn run_compare(
    catalog: &Catalog,
    left: &str,
    right: &str,
    scenario: &Scenario,
) -> Result<(), String> {
    let left = resolve_weapon(catalog, left)?;
    let right = resolve_weapon(catalog, right)?;
    let comparison = compare_weapons(catalog, &left, &right, scenario);
    print!("{}", render_comparison(&comparison));
    Ok(())
}

fn run_rank(catalog: &Catalog, q: RankQuery) -> Result<(), String> {
    if let CategoryFilter::Named(name) = &q.filter {
        if catalog.category(name).is_none() {
            tracing::warn!("no class named {:?}; nothing to rank", name);
        }
    }
    if !STATS.iter().any(|s| s.key == q.stat_key) {
        tracing::warn!(
            "{:?} is not a known stat; ranking raw values, lower first when descending",
            q.stat_key
        );
    }
    let entries = rank(catalog, &q);
    tracing::debug!("ranked {} weapon(s) by {}", entries.len(), q.stat_key);
    print!("{}", render_ranking(&entries));
    Ok(())
}

fn run_report(catalog: &Catalog, out: &Path, scenario: &Scenario) -> Result<(), String> {
    std::fs::create_dir_all(out).map_err(|e| e.to_string())?;
    let report = build_report(catalog, scenario);
    let path = out.join("report.json");
    write_json_report(&report, &path)?;
    tracing::info!(
        "wrote {} ({} weapons)",
        path.display(),
        report.weapons.len()
    );
    Ok(())
}
