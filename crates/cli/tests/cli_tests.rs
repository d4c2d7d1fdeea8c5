// End-to-end tests for the `lk` binary.
// Run with: cargo test -p layoutkeeper-cli --test cli_tests

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../recon/tests/fixtures")
        .join(name)
}

/// Each test gets its own empty config so a user config never leaks in.
struct Env {
    dir: TempDir,
    config: PathBuf,
}

impl Env {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.toml");
        std::fs::write(&config, "").unwrap();
        Self { dir, config }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn lk(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_lk"))
            .arg("--config")
            .arg(&self.config)
            .args(args)
            .env_remove("RUST_LOG")
            .output()
            .expect("run lk")
    }
}

fn s(p: &Path) -> &str {
    p.to_str().unwrap()
}

fn json(out: &Output) -> serde_json::Value {
    serde_json::from_slice(&out.stdout).expect("stdout is a single JSON document")
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

// -------------------------------------------------------------------------
// reconcile
// -------------------------------------------------------------------------

#[test]
fn reconcile_json_reports_partitions() {
    let env = Env::new();
    let layout = fixture("cottage.json");
    let scene = fixture("cottage-indoors.scene.json");
    let out = env.lk(&["reconcile", s(&layout), "--scene", s(&scene), "--json"]);

    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    let v = json(&out);
    assert_eq!(v["summary"]["matched"], 3);
    assert_eq!(v["summary"]["missing"], 1);
    assert_eq!(v["summary"]["misplaced"], 1);
    assert_eq!(v["interior"].as_array().unwrap().len(), 4);
    assert_eq!(v["interior"][3]["live"], serde_json::Value::Null);
    assert_eq!(v["unused"][0]["name"], "Potted Fern");
    assert_eq!(v["exterior"][0]["correct_location"], false);
}

#[test]
fn reconcile_strict_exits_on_drift() {
    let env = Env::new();
    let layout = fixture("cottage.json");
    let scene = fixture("cottage-indoors.scene.json");
    let out = env.lk(&["reconcile", s(&layout), "--scene", s(&scene), "--strict"]);

    assert_eq!(out.status.code(), Some(3));
    assert!(stderr(&out).contains("hint:"));
    // Listing still printed.
    assert!(String::from_utf8_lossy(&out.stdout).contains("missing"));
}

#[test]
fn reconcile_outside_housing_mode() {
    let env = Env::new();
    let scene = env.path("closed.scene.json");
    std::fs::write(&scene, r#"{ "area": "indoors", "objects": [] }"#).unwrap();

    let out = env.lk(&["reconcile", s(&fixture("cottage.json")), "--scene", s(&scene)]);
    assert_eq!(out.status.code(), Some(4));
    assert!(stderr(&out).contains("housing layout mode"));
}

#[test]
fn broken_layout_is_an_import_error() {
    let env = Env::new();
    let layout = env.path("broken.json");
    std::fs::write(&layout, "{ not json").unwrap();

    let scene = fixture("cottage-indoors.scene.json");
    let out = env.lk(&["reconcile", s(&layout), "--scene", s(&scene)]);
    assert_eq!(out.status.code(), Some(6));
    assert!(stderr(&out).starts_with("error: import error"));
}

// -------------------------------------------------------------------------
// apply / set
// -------------------------------------------------------------------------

#[test]
fn apply_writes_corrected_scene() {
    let env = Env::new();
    let layout = fixture("cottage.json");
    let after = env.path("after.scene.json");
    let out = env.lk(&[
        "apply",
        s(&layout),
        "--scene",
        s(&fixture("cottage-indoors.scene.json")),
        "--output",
        s(&after),
        "--json",
    ]);
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    let report = json(&out);
    assert_eq!(report["written"], 1);
    assert_eq!(report["already_correct"], 2);
    assert_eq!(report["missing"], 1);

    let out = env.lk(&["reconcile", s(&layout), "--scene", s(&after), "--json"]);
    let v = json(&out);
    assert_eq!(v["summary"]["misplaced"], 0);
    assert_eq!(v["summary"]["missing"], 1);
}

#[test]
fn set_missing_item_exits_unbound() {
    let env = Env::new();
    let out = env.lk(&[
        "set",
        s(&fixture("cottage.json")),
        "--scene",
        s(&fixture("cottage-indoors.scene.json")),
        "--index",
        "3",
    ]);
    assert_eq!(out.status.code(), Some(5));
    assert!(stderr(&out).contains("Wall Lantern"));
}

#[test]
fn set_out_of_range_is_usage_error() {
    let env = Env::new();
    let out = env.lk(&[
        "set",
        s(&fixture("cottage.json")),
        "--scene",
        s(&fixture("cottage-indoors.scene.json")),
        "--list",
        "exterior",
        "--index",
        "9",
    ]);
    assert_eq!(out.status.code(), Some(2));
}

// -------------------------------------------------------------------------
// capture / sort / clear / export
// -------------------------------------------------------------------------

#[test]
fn capture_then_export() {
    let env = Env::new();
    let layout = env.path("new.json");
    let out = env.lk(&[
        "capture",
        s(&layout),
        "--scene",
        s(&fixture("cottage-indoors.scene.json")),
    ]);
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    assert!(layout.exists());

    let out = env.lk(&["export", s(&layout), "--json"]);
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    let v = json(&out);
    let items = v["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[1]["item_key"], 6002);
    assert_eq!(items[1]["count"], 2);
    assert!(v["link"]
        .as_str()
        .unwrap()
        .starts_with("https://ffxivteamcraft.com/import/"));
}

#[test]
fn sort_and_clear_rewrite_the_file() {
    let env = Env::new();
    let layout = env.path("cottage.json");
    std::fs::copy(fixture("cottage.json"), &layout).unwrap();

    let out = env.lk(&["sort", s(&layout), "--list", "interior"]);
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&layout).unwrap()).unwrap();
    let names: Vec<&str> = saved["interior_items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Oak Chair", "Oak Chair", "Oak Table", "Wall Lantern"]);
    // x breaks the chair tie.
    assert_eq!(saved["interior_items"][0]["x"], 0.0);

    let out = env.lk(&["clear", s(&layout), "--list", "exterior", "--fixtures"]);
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&layout).unwrap()).unwrap();
    assert!(saved["exterior_fixtures"].as_array().unwrap().is_empty());
    assert_eq!(saved["exterior_items"].as_array().unwrap().len(), 1);
}

#[test]
fn unused_list_is_not_in_a_save() {
    let env = Env::new();
    let out = env.lk(&["sort", s(&fixture("cottage.json")), "--list", "unused"]);
    assert_eq!(out.status.code(), Some(2));
}

// -------------------------------------------------------------------------
// config
// -------------------------------------------------------------------------

#[test]
fn config_validate_rejects_negative_tolerance() {
    let env = Env::new();
    let bad = env.path("bad.toml");
    std::fs::write(&bad, "[tolerance]\nposition = -1.0\n").unwrap();

    let out = env.lk(&["config", "validate", s(&bad)]);
    assert_eq!(out.status.code(), Some(7));
    assert!(stderr(&out).contains("tolerance.position"));

    let out = env.lk(&["config", "validate", s(&env.config)]);
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
}

#[test]
fn config_path_echoes_explicit_file() {
    let env = Env::new();
    let out = env.lk(&["config", "path"]);
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), s(&env.config));
}

#[test]
fn config_commands_do_not_load_a_broken_config() {
    let env = Env::new();
    std::fs::write(&env.config, "[tolerance\n").unwrap();

    // `config path` still answers; `config validate` reports the parse error.
    let out = env.lk(&["config", "path"]);
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    let out = env.lk(&["config", "validate"]);
    assert_eq!(out.status.code(), Some(7));
    assert!(stderr(&out).contains("config parse error"));
}

#[test]
fn apply_reports_disabled_floors() {
    let env = Env::new();
    std::fs::write(&env.config, "[apply.floors]\nground = false\n").unwrap();
    let out = env.lk(&[
        "apply",
        s(&fixture("cottage.json")),
        "--scene",
        s(&fixture("cottage-indoors.scene.json")),
        "--json",
    ]);
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    let report = json(&out);
    assert_eq!(report["written"], 0);
    assert_eq!(report["skipped_floor"], 4);
}

#[test]
fn wide_tolerance_from_config_accepts_moved_chair() {
    let env = Env::new();
    std::fs::write(&env.config, "[tolerance]\nposition = 1.0\n").unwrap();

    let out = env.lk(&[
        "reconcile",
        s(&fixture("cottage.json")),
        "--scene",
        s(&fixture("cottage-indoors.scene.json")),
        "--json",
    ]);
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    assert_eq!(json(&out)["summary"]["misplaced"], 0);
}
