use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::Server;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

const MANIFEST: &str = r#"{
    "latest": {"release": "1.19.2", "snapshot": "22w42a"},
    "versions": [
        {"id": "22w42a", "type": "snapshot"},
        {"id": "1.20", "type": "release"},
        {"id": "1.19.2", "type": "release"},
        {"id": "1.19", "type": "release"}
    ]
}"#;

fn files_page(name: &str, game_version: &str) -> String {
    format!(
        "<html><body><table>\
         <thead><tr><th>Type</th><th>Name</th><th>Size</th><th>Uploaded</th>\
         <th>Game Version</th><th>Downloads</th><th>Actions</th></tr></thead>\
         <tbody><tr><td>R</td><td>{}\n  extra</td><td>1.2 MB</td><td>Sep 1, 2022</td>\
         <td>{}</td><td>1,234</td><td>Install</td></tr></tbody>\
         </table></body></html>",
        name, game_version
    )
}

fn create_mods(dir: &Path, names: &[&str]) {
    for name in names {
        std::fs::write(dir.join(name), b"PK").unwrap();
    }
}

fn mvm() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("mvm"));
    cmd.env_remove("MVM_MODS_DIR")
        .env_remove("MVM_CATALOG_URL")
        .env_remove("MVM_ALIASES")
        .env_remove("MVM_OUTLIERS");
    cmd
}

#[test]
fn test_end_to_end_check() {
    let mut server = Server::new();
    let url = server.url();

    let _manifest = server
        .mock("GET", "/versions.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(MANIFEST)
        .create();

    let sodium = server
        .mock("GET", "/mods/sodium/files")
        .with_status(200)
        .with_body(files_page("Sodium 0.4.4", "1.19.2"))
        .expect(1)
        .create();

    let xaeros = server
        .mock("GET", "/mods/xaeros-minimap/files")
        .with_status(200)
        .with_body(files_page("Xaero's Minimap 22.16", "1.19.2"))
        .expect(1)
        .create();

    let wurst = server
        .mock("GET", "/mods/wurst/files")
        .with_status(404)
        .expect(1)
        .create();

    let mods_dir = tempdir().unwrap();
    create_mods(
        mods_dir.path(),
        &[
            "Sodium-1.19.2-fabric.jar",
            "Xaeros_1.19.2.jar",
            "Wurst-Client-v7.30-MC1.19.2.jar",
            "notes.txt",
        ],
    );

    mvm()
        .arg("check")
        .arg("--mods-dir")
        .arg(mods_dir.path())
        .arg("--catalog-url")
        .arg(format!("{}/mods", url))
        .arg("--versions-url")
        .arg(format!("{}/versions.json", url))
        .assert()
        .success()
        .stdout(predicates::str::contains("200: OK"))
        .stdout(predicates::str::contains("Sodium 0.4.4 [1.19.2]"))
        .stdout(predicates::str::contains(
            "404: KNOWN MOD (see https://www.wurstclient.net/download/all/)",
        ))
        .stdout(predicates::str::contains("Platform: fabric"))
        .stdout(predicates::str::contains("Game version: 1.19.2"))
        .stdout(predicates::str::contains(
            "Checked 3 mod(s) from 3 archive(s) in 1 pass(es), 4 file row(s) returned",
        ));

    sodium.assert();
    xaeros.assert();
    wurst.assert();
}

#[test]
fn test_check_retries_blocked_batch() {
    let mut server = Server::new();
    let url = server.url();

    let _manifest = server
        .mock("GET", "/versions.json")
        .with_status(200)
        .with_body(MANIFEST)
        .create();

    // The first pass gets the 403, the retry gets the page
    let jei_blocked = server
        .mock("GET", "/mods/jei/files")
        .with_status(403)
        .expect(1)
        .create();
    let jei_ok = server
        .mock("GET", "/mods/jei/files")
        .with_status(200)
        .with_body(files_page("jei-1.19.2-forge-11.3.0", "1.19.2"))
        .expect(1)
        .create();
    let mouse_tweaks = server
        .mock("GET", "/mods/mouse-tweaks/files")
        .with_status(200)
        .with_body(files_page("MouseTweaks-forge-mc1.19-2.22", "1.19"))
        .expect(2)
        .create();

    let mods_dir = tempdir().unwrap();
    create_mods(
        mods_dir.path(),
        &["MouseTweaks-forge-mc1.19-2.22.jar", "jei-1.19.2-forge-11.3.0.jar"],
    );

    mvm()
        .arg("check")
        .arg("--mods-dir")
        .arg(mods_dir.path())
        .arg("--catalog-url")
        .arg(format!("{}/mods", url))
        .arg("--versions-url")
        .arg(format!("{}/versions.json", url))
        .arg("--retry-delay")
        .arg("0")
        .assert()
        .success()
        .stdout(predicates::str::contains("FORBIDDEN").not())
        .stdout(predicates::str::contains("Platform: forge"))
        .stdout(predicates::str::contains("in 2 pass(es)"));

    jei_blocked.assert();
    jei_ok.assert();
    mouse_tweaks.assert();
}

#[test]
fn test_check_json_output() {
    let mut server = Server::new();
    let url = server.url();

    let _manifest = server
        .mock("GET", "/versions.json")
        .with_status(404)
        .create();
    let _page = server
        .mock("GET", "/mods/sodium/files")
        .with_status(418)
        .create();

    let mods_dir = tempdir().unwrap();
    create_mods(mods_dir.path(), &["sodium.jar"]);

    let output = mvm()
        .arg("check")
        .arg("--json")
        .arg("--mods-dir")
        .arg(mods_dir.path())
        .arg("--catalog-url")
        .arg(format!("{}/mods", url))
        .arg("--versions-url")
        .arg(format!("{}/versions.json", url))
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["platform"], "unknown");
    assert_eq!(report["game_version"], serde_json::Value::Null);
    assert_eq!(report["results"][0]["slug"], "sodium");
    assert_eq!(report["results"][0]["outcome"], "unknown_status");
    assert_eq!(report["results"][0]["status"], 418);
    assert_eq!(report["issues"][0]["issue"], "platform_undetermined");
    assert_eq!(report["issues"][1]["issue"], "version_inference_failed");
}

#[test]
fn test_scan_with_alias_file() {
    let mods_dir = tempdir().unwrap();
    create_mods(
        mods_dir.path(),
        &["MouseTweaks-1.19-fabric.jar", "modMenu-4.0.6.jar", "JEI.jar"],
    );

    let tables = tempdir().unwrap();
    let aliases = tables.path().join("aliases.json");
    std::fs::write(&aliases, r#"{"menu": "modmenu"}"#).unwrap();

    mvm()
        .arg("scan")
        .arg("--mods-dir")
        .arg(mods_dir.path())
        .arg("--aliases")
        .arg(&aliases)
        .assert()
        .success()
        .stdout(predicates::str::contains("-> mouse-tweaks [fabric]"))
        .stdout(predicates::str::contains("-> modmenu"))
        .stdout(predicates::str::contains("-> j-e-i"))
        .stdout(predicates::str::contains("Platform: fabric"));
}

#[test]
fn test_scan_missing_directory_reports_no_mods() {
    let root = tempdir().unwrap();

    mvm()
        .arg("scan")
        .arg("--mods-dir")
        .arg(root.path().join("does-not-exist"))
        .assert()
        .success()
        .stdout(predicates::str::contains("No mods found."));
}

#[test]
fn test_check_fails_for_unreadable_alias_file() {
    let root = tempdir().unwrap();

    mvm()
        .arg("check")
        .arg("--mods-dir")
        .arg(root.path())
        .arg("--aliases")
        .arg(root.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicates::str::contains("Failed to read"));
}
