//! End-to-end tests for the navgraph binary

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SCHEMA: &str = r#"
[[types]]
name = "formflow"
source = "formflows/*.yaml"
display = ["entity"]

[types.fields]
id = "guid"
name = "name"
entity = "entity"
image = "image"
tasks = "tasks.template"

[[types.references]]
field = "tasks"
target_type = "template"

[[types.references]]
field = "image"
target_type = "image"

[[types.references]]
field = "entity"
target_type = "entity"
reversed = true

[[types]]
name = "template"
source = "templates/*.yaml"

[types.fields]
id = "guid"
name = "name"
text = "body"

[[types.matchers]]
name = "jump"
pattern = 'jump to "(?P<formflow>[^"]+)"'
field = "jumps"

[[types]]
name = "image"
source = "images/*.yaml"

[types.fields]
id = "guid"
name = "name"

[[types]]
name = "entity"
source = "entities/*.yaml"
name_from_file = true

[types.fields]
name = "name"
"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A small repository: two formflows, two templates, an image and an entity
fn fixture() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "schema.toml", SCHEMA);
    write(
        root,
        "formflows/close.yaml",
        "guid: F1\nname: Close Case\nentity: Case\nimage: IMG1\ntasks:\n  - template: T1\n  - template: T2\n",
    );
    write(
        root,
        "formflows/reopen.yaml",
        "guid: F2\nname: Reopen Case\ntasks:\n  - template: T3\n",
    );
    write(
        root,
        "templates/t1.yaml",
        "guid: T1\nname: Close Reason\nbody: 'When done, jump to \"Reopen Case\"'\n",
    );
    write(root, "templates/t2.yaml", "guid: T2\nname: Summary\n");
    write(root, "images/logo.yaml", "guid: IMG1\nname: Logo\n");
    write(root, "entities/Case.yaml", "description: a case\n");
    dir
}

fn navgraph(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("navgraph").unwrap();
    cmd.env_remove("NAVGRAPH_SCHEMA")
        .env_remove("NAVGRAPH_ROOT")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .arg("--schema")
        .arg(dir.path().join("schema.toml"));
    cmd
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_stats() {
    let dir = fixture();
    navgraph(&dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nodes: 6"))
        .stdout(predicate::str::contains("Edges: 6"))
        .stdout(predicate::str::contains("1 dangling edges"));
}

#[test]
fn test_find_orders_by_type_then_name() {
    let dir = fixture();
    let json = json_output(navgraph(&dir).args(["-f", "json", "find", "case"]));

    let ids: Vec<_> = json["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["entity:Case@entities/Case.yaml", "F1", "F2"]);
}

#[test]
fn test_find_type_filter_and_summary() {
    let dir = fixture();
    navgraph(&dir)
        .args(["find", "counts: 1<1", "--summary", "-t", "template"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 nodes"))
        .stdout(predicate::str::contains("T1  type: template, name: Close Reason"));

    navgraph(&dir)
        .args(["find", "nothing-here"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No nodes match"));
}

#[test]
fn test_find_rejects_invalid_regex() {
    let dir = fixture();
    navgraph(&dir)
        .args(["find", "(unclosed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid pattern"));
}

#[test]
fn test_traverse_depth_one() {
    let dir = fixture();
    let json = json_output(navgraph(&dir).args(["-f", "json", "traverse", "F1", "-d", "1"]));

    let mut ids: Vec<_> = json["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["node"]["id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["F1", "IMG1", "T1", "T2"]);
}

#[test]
fn test_traverse_ancestors_through_reversed_and_text_edges() {
    let dir = fixture();
    navgraph(&dir)
        .args(["traverse", "F2", "--direction", "ancestors", "-d", "all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  <- jump: T1 (template) Close Reason"))
        .stdout(predicate::str::contains("    <- tasks: F1 (formflow) Close Case"))
        .stdout(predicate::str::contains(
            "      <- entity: entity:Case@entities/Case.yaml (entity) Case",
        ));
}

#[test]
fn test_traverse_unknown_seed_fails() {
    let dir = fixture();
    navgraph(&dir)
        .args(["traverse", "NOPE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Node not found: NOPE"));
}

#[test]
fn test_show_prints_both_directions() {
    let dir = fixture();
    navgraph(&dir)
        .args(["show", "^close case$", "--ignore", "image"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ancestors:"))
        .stdout(predicate::str::contains("  <- entity: entity:Case@entities/Case.yaml"))
        .stdout(predicate::str::contains("  -> tasks: T2 (template) Summary"))
        .stdout(predicate::str::contains("IMG1").not());
}

#[test]
fn test_diagnostics_reports_missing_nodes() {
    let dir = fixture();
    navgraph(&dir)
        .arg("diagnostics")
        .assert()
        .success()
        .stdout(predicate::str::contains("Missing nodes:"))
        .stdout(predicate::str::contains("F2 -[tasks]-> T3 (template)"));

    navgraph(&dir).args(["diagnostics", "--strict"]).assert().failure();
}

#[test]
fn test_export_to_file() {
    let dir = fixture();
    let out = dir.path().join("graph.json");
    navgraph(&dir)
        .arg("export")
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["nodes"].as_array().unwrap().len(), 6);
    assert_eq!(json["edges"].as_array().unwrap().len(), 6);
    assert_eq!(json["diagnostics"]["unresolved"][0]["target"], "T3");
}

#[test]
fn test_config_set_get_and_defaults() {
    let dir = fixture();
    navgraph(&dir)
        .args(["config", "set", "ignore_types", "entity"])
        .assert()
        .success();
    navgraph(&dir)
        .args(["config", "get", "ignore_types"])
        .assert()
        .success()
        .stdout(predicate::str::contains("entity"));

    // Configured ignores apply to find
    navgraph(&dir)
        .args(["find", "case"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 nodes"));

    navgraph(&dir)
        .args(["config", "set", "depth", "deep"])
        .assert()
        .failure();
}

#[test]
fn test_missing_schema_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("navgraph")
        .unwrap()
        .env_remove("NAVGRAPH_SCHEMA")
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No schema file"));
}

#[test]
fn test_completions() {
    Command::cargo_bin("navgraph")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("navgraph"));
}
