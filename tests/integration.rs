//! CLI integration tests.

use std::path::PathBuf;
use std::process::{Command, Output};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

fn catalog_fixture() -> PathBuf {
    fixtures_dir().join("weapon-data.js")
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_weapon-ranker"))
        .arg("--catalog")
        .arg(catalog_fixture())
        .args(args)
        .output()
        .expect("run weapon-ranker")
}

fn stdout(o: &Output) -> String {
    String::from_utf8_lossy(&o.stdout).to_string()
}

#[test]
fn dps_command_prints_breakdown() {
    let output = run(&["dps", "minigun"]);
    assert!(
        output.status.success(),
        "dps should succeed: {:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    let s = stdout(&output);
    assert!(s.contains("Minigun: 302 DPS"), "unexpected output: {}", s);
    assert!(s.contains("Heavy"));
}

#[test]
fn dps_zone_flag_applies_multiplier() {
    let output = run(&["dps", "AK-47", "--zone", "head"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("AK-47: 372 DPS"));
}

#[test]
fn dps_unknown_weapon_fails() {
    let output = run(&["dps", "Railgun"]);
    assert!(!output.status.success());
}

#[test]
fn rank_by_dps_best_first() {
    let output = run(&["rank"]);
    assert!(output.status.success());
    let s = stdout(&output);
    let lines: Vec<&str> = s.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("#1") && lines[0].contains("Minigun"));
    assert!(lines[3].starts_with("#4") && lines[3].contains("Pump Shotgun"));
}

#[test]
fn rank_with_class_and_query() {
    let output = run(&["rank", "--class", "Assault Rifles", "--stat", "weight"]);
    assert!(output.status.success());
    let s = stdout(&output);
    let lines: Vec<&str> = s.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("M4A1"));
    assert!(lines[1].contains("AK-47"));

    let output = run(&["rank", "--query", "PUMP", "--order", "asc"]);
    assert!(output.status.success());
    let s = stdout(&output);
    assert_eq!(s.lines().count(), 1);
    assert!(s.contains("Pump Shotgun"));
}

#[test]
fn rank_leaves_out_weapons_missing_the_stat() {
    let output = run(&["rank", "--stat", "reload_speed_empty"]);
    assert!(output.status.success());
    let s = stdout(&output);
    let lines: Vec<&str> = s.lines().collect();
    assert_eq!(lines.len(), 3, "unexpected output: {}", s);
    assert!(lines[0].contains("Pump Shotgun"));
    assert!(!s.contains("Minigun"));

    let output = run(&["compare", "AK-47", "Minigun"]);
    assert!(output.status.success());
    let s = stdout(&output);
    assert!(s
        .lines()
        .any(|l| l.contains("Reload (empty)") && l.contains("2.5") && l.contains("—")));
}

#[test]
fn compare_two_weapons() {
    let output = run(&["compare", "AK-47", "M4A1"]);
    assert!(
        output.status.success(),
        "compare should succeed: {:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    let s = stdout(&output);
    assert!(s.contains("Assault Rifles"));
    assert!(s.lines().any(|l| l.contains("Ammo") && l.contains("30+1")));
}

#[test]
fn report_writes_json() {
    let out = tempfile::tempdir().expect("tempdir");
    let output = run(&["report", "--out", out.path().to_str().unwrap()]);
    assert!(output.status.success());
    let path = out.path().join("report.json");
    assert!(path.exists(), "report.json should exist");
    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(v["weapons"].as_array().map(Vec::len), Some(4));
}

#[test]
fn fill_pellets_writes_migrated_catalog() {
    let out = tempfile::tempdir().expect("tempdir");
    let path = out.path().join("catalog.json");
    let output = run(&["fill-pellets", "--out", path.to_str().unwrap()]);
    assert!(output.status.success());
    let s = std::fs::read_to_string(&path).unwrap();
    let catalog = weapon_ranker::catalog::catalog_from_json_str(&s).expect("load migrated");
    assert_eq!(catalog.len(), 4);
    assert!(catalog.weapons().all(|(_, w)| w.pellet_count.is_some()));
    assert_eq!(catalog.weapon("Pump Shotgun").unwrap().pellet_count, Some(8));
    assert_eq!(catalog.category_of("Minigun"), "Heavy");
}

#[test]
fn config_file_supplies_catalog_and_scenario() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = dir.path().join("settings.toml");
    std::fs::write(
        &cfg,
        format!(
            "catalog = {:?}\n[scenario]\nzone = \"head\"\n",
            catalog_fixture().to_str().unwrap()
        ),
    )
    .unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_weapon-ranker"))
        .args(["--config", cfg.to_str().unwrap(), "dps", "AK-47"])
        .output()
        .expect("run weapon-ranker");
    assert!(
        output.status.success(),
        "dps via config should succeed: {:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout(&output).contains("372 DPS"));
}

#[test]
fn stats_needs_no_catalog() {
    let output = Command::new(env!("CARGO_BIN_EXE_weapon-ranker"))
        .arg("stats")
        .output()
        .expect("run weapon-ranker");
    assert!(output.status.success());
    let s = stdout(&output);
    assert!(s.starts_with("dps"));
    assert!(s.contains("vertical_recoil"));
}
