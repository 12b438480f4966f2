use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::Value;
use tempfile::{tempdir, TempDir};

fn fixture_catalog() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/fixtures/catalog.json")
        .canonicalize()
        .expect("fixture catalog present")
}

fn shipyard() -> Command {
    let mut cmd = cargo_bin_cmd!("shipyard");
    cmd.env("RUST_LOG", "error")
        .env("NO_COLOR", "1")
        .env_remove("SHIPYARD_CATALOG")
        .arg("--catalog")
        .arg(fixture_catalog());
    cmd
}

fn new_frigate() -> (TempDir, PathBuf) {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("lancer.json");
    shipyard()
        .args(["new", path.to_str().unwrap(), "--name", "Lancer", "--hull", "frigate"])
        .assert()
        .success()
        .stdout(contains("Created Lancer on a Frigate hull"));
    (dir, path)
}

fn install(path: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    shipyard()
        .arg("install")
        .arg(path)
        .args(args)
        .assert()
}

/// The design object inside a save file.
fn saved(path: &Path) -> Value {
    let raw = fs::read_to_string(path).expect("read design");
    let mut file: Value = serde_json::from_str(&raw).expect("design is JSON");
    assert_eq!(file["formatVersion"], 1);
    file["design"].take()
}

#[test]
fn new_refuses_to_overwrite_without_force() {
    let (_dir, path) = new_frigate();

    shipyard()
        .args(["new", path.to_str().unwrap(), "--name", "Again", "--hull", "frigate"])
        .assert()
        .failure()
        .stderr(contains("pass --force"));

    shipyard()
        .args(["new", path.to_str().unwrap(), "--name", "Again", "--hull", "frigate", "--force"])
        .assert()
        .success();
    assert_eq!(saved(&path)["name"], "Again");
}

#[test]
fn new_rejects_hull_beyond_progress_level() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("cruiser.json");

    shipyard()
        .args(["new", path.to_str().unwrap(), "--name", "Big", "--hull", "cruiser"])
        .assert()
        .failure()
        .stdout(contains("error: Cruiser requires progress level 7"))
        .stderr(contains("design creation rejected"));
    assert!(!path.exists());
}

#[test]
fn installs_drive_train_and_summarises() {
    let (_dir, path) = new_frigate();

    install(&path, &["power-plant", "fusion", "--hp", "10"])
        .success()
        .stdout(contains("Installed Fusion Reactor"));
    install(&path, &["engine", "ion", "--hp", "20"])
        .success()
        .stdout(contains("Installed Ion Drive"));
    install(&path, &["weapon", "laser", "--arc", "forward"])
        .success()
        .stdout(contains("Installed Laser Cannon"));

    shipyard()
        .args(["summary", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Lancer (Frigate, light hull, 100 HP)"))
        .stdout(contains("Hull points: 32/100 used (68 free)"))
        .stdout(contains("Power: 50 generated, 41 used (9 spare)"));
}

#[test]
fn repeated_arc_flags_are_stored_once() {
    let (_dir, path) = new_frigate();
    install(&path, &["power-plant", "fusion", "--hp", "10"]).success();

    install(&path, &["weapon", "laser", "--arc", "forward", "--arc", "forward"]).success();
    install(&path, &["sensor", "radar", "--arc", "port", "--arc", "port"]).success();

    let design = saved(&path);
    assert_eq!(design["weapons"][0]["arcs"], serde_json::json!(["forward"]));
    assert_eq!(design["sensors"][0]["arcs"], serde_json::json!(["port"]));
}

#[test]
fn engine_without_power_is_rejected_and_not_saved() {
    let (_dir, path) = new_frigate();

    install(&path, &["engine", "ion", "--hp", "20"])
        .failure()
        .stdout(contains("error: Not enough power: Ion Drive needs 40"))
        .stderr(contains("engine installation rejected"));
    assert_eq!(saved(&path)["engines"].as_array().map(Vec::len).unwrap_or(0), 0);
}

#[test]
fn below_minimum_size_is_rejected() {
    let (_dir, path) = new_frigate();
    install(&path, &["power-plant", "fusion", "--hp", "10"]).success();

    install(&path, &["engine", "ion", "--hp", "3"])
        .failure()
        .stdout(contains(
            "error: Ion Drive requires at least 5 hull points (requested 3).",
        ));
}

#[test]
fn unknown_equipment_suggests_names() {
    let (_dir, path) = new_frigate();

    install(&path, &["engine", "ion-drive", "--hp", "10"])
        .failure()
        .stderr(contains("unknown engine: ion-drive"));
}

#[test]
fn edit_replaces_installation_in_place() {
    let (_dir, path) = new_frigate();
    install(&path, &["power-plant", "fusion", "--hp", "10"]).success();

    let output = shipyard()
        .args(["--format", "json", "install", path.to_str().unwrap()])
        .args(["engine", "ion", "--hp", "20"])
        .output()
        .expect("run install");
    assert!(output.status.success());
    let outcome: Value = serde_json::from_slice(&output.stdout).expect("json outcome");
    let engine_id = outcome["id"].as_str().expect("engine id").to_string();

    install(&path, &["--edit", &engine_id, "engine", "ion", "--hp", "24"])
        .success()
        .stdout(contains("Updated Ion Drive"));

    let design = saved(&path);
    let engines = design["engines"].as_array().expect("engines list");
    assert_eq!(engines.len(), 1);
    assert_eq!(engines[0]["id"], engine_id.as_str());
    assert_eq!(engines[0]["hullPoints"], 24);
}

#[test]
fn edit_with_unknown_id_fails() {
    let (_dir, path) = new_frigate();
    install(&path, &["power-plant", "fusion", "--hp", "10"]).success();

    install(&path, &["--edit", "engine-missing", "engine", "ion", "--hp", "10"])
        .failure()
        .stderr(contains("no installation with id engine-missing"));
}

#[test]
fn check_passes_with_warnings_only() {
    let (_dir, path) = new_frigate();
    install(&path, &["power-plant", "fusion", "--hp", "10"]).success();

    shipyard()
        .args(["check", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("warning: The design has no active sensor."))
        .stdout(contains("error:").not());
}

#[test]
fn check_json_reports_outcome() {
    let (_dir, path) = new_frigate();
    install(&path, &["power-plant", "fusion", "--hp", "10"]).success();

    let output = shipyard()
        .args(["--format", "json", "check", path.to_str().unwrap()])
        .output()
        .expect("run check");
    assert!(output.status.success());
    let outcome: Value = serde_json::from_slice(&output.stdout).expect("json outcome");
    assert_eq!(outcome["valid"], false);
    assert_eq!(outcome["warnings_only"], true);
    assert!(outcome["errors"]
        .as_array()
        .expect("errors list")
        .iter()
        .any(|msg| msg == "The design has no active sensor."));
}

#[test]
fn fuel_tank_for_fuel_free_engine_is_rejected() {
    let (_dir, path) = new_frigate();

    install(&path, &["fuel-tank", "--engine", "ion", "--hp", "5"])
        .failure()
        .stdout(contains("Ion Drive does not use fuel"));

    install(&path, &["fuel-tank", "--engine", "chemical", "--hp", "5"])
        .success()
        .stdout(contains("Installed Chemical Rocket fuel"));
}

#[test]
fn remove_drops_installation() {
    let (_dir, path) = new_frigate();
    let output = shipyard()
        .args(["--format", "json", "install", path.to_str().unwrap()])
        .args(["accommodation", "crew-bunks", "--quantity", "2"])
        .output()
        .expect("run install");
    assert!(output.status.success());
    let outcome: Value = serde_json::from_slice(&output.stdout).expect("json outcome");
    let id = outcome["id"].as_str().expect("id").to_string();

    shipyard()
        .args(["remove", path.to_str().unwrap(), &id])
        .assert()
        .success()
        .stdout(contains("Removed"));
    assert_eq!(saved(&path)["accommodations"].as_array().map(Vec::len), Some(0));

    shipyard()
        .args(["remove", path.to_str().unwrap(), &id])
        .assert()
        .failure();
}

#[test]
fn second_gravity_system_is_rejected() {
    let (_dir, path) = new_frigate();
    install(&path, &["gravity", "centrifuge"])
        .success()
        .stdout(contains("Installed Centrifuge"));

    install(&path, &["gravity", "centrifuge"])
        .failure()
        .stdout(contains("already has gravity provided by Centrifuge"));
}

#[test]
fn lowering_constraints_grandfathers_installed_items() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("cruiser.json");
    let path_arg = path.to_str().unwrap();

    shipyard()
        .args(["new", path_arg, "--name", "Big", "--hull", "cruiser", "--pl", "7", "--tracks", "G"])
        .assert()
        .success();
    install(&path, &["power-plant", "fusion", "--hp", "20"]).success();
    install(&path, &["engine", "gravitic", "--hp", "20"]).success();

    shipyard()
        .args(["constraints", path_arg, "--pl", "6", "--tracks", ""])
        .assert()
        .success()
        .stdout(contains("warning: Gravitic Drive exceeds the current design constraints"))
        .stdout(contains("it remains installed"));

    let design = saved(&path);
    assert_eq!(design["constraints"]["progressLevel"], 6);
    assert_eq!(design["engines"].as_array().map(Vec::len), Some(1));
}
