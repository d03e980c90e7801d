use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use kakebo_core::Store;
use tempfile::TempDir;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_kakebo"))
}

/// Isolated HOME/XDG directories for one test.
struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(dir.path().join("config")).expect("create config dir");
        std::fs::create_dir_all(dir.path().join("data")).expect("create data dir");
        Self { dir }
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("config").join("kakebo").join("config.toml")
    }

    fn store_path(&self) -> PathBuf {
        self.dir.path().join("data").join("kakebo").join("kakebo.db")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(bin());
        cmd.args(args)
            .env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .env("XDG_DATA_HOME", self.dir.path().join("data"))
            .env_remove("KAKEBO_DB")
            .env_remove("KAKEBO_CONFIG")
            .env_remove("KAKEBO_LOG")
            .stdin(Stdio::null());
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command(args).output().expect("run kakebo")
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "kakebo {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let stdout = self.run_ok(args);
        serde_json::from_str(&stdout).expect("stdout should be JSON")
    }

    fn write_config(&self, contents: &str) {
        let path = self.config_path();
        std::fs::create_dir_all(path.parent().expect("config parent")).expect("create dir");
        std::fs::write(path, contents).expect("write config");
    }
}

fn add(env: &Env, description: &str, amount: &str, category: &str, month: &str) -> Output {
    env.run(&[
        "-q", "expenses", "add", "-d", description, "-a", amount, "-c", category, "--month",
        month, "--year", "2017",
    ])
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn descriptions(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .expect("array")
        .iter()
        .map(|item| item["description"].as_str().expect("description").to_string())
        .collect()
}

#[test]
fn test_cli_init_writes_default_config() {
    let env = Env::new();
    env.run_ok(&["init"]);

    assert!(env.store_path().exists(), "store file should exist");
    assert!(env.config_path().exists(), "config file should exist");

    let contents = std::fs::read_to_string(env.config_path()).expect("read config");
    let value: toml::Value = toml::from_str(&contents).expect("parse config");
    let store = value.get("store").expect("store section");
    assert_eq!(
        store.get("path").and_then(|v| v.as_str()),
        Some(env.store_path().to_string_lossy().as_ref())
    );
    assert_eq!(store.get("period").and_then(|v| v.as_str()), Some("month"));
    assert_eq!(
        store.get("lock_timeout_ms").and_then(|v| v.as_integer()),
        Some(1000)
    );
}

#[test]
fn test_cli_init_refuses_to_overwrite() {
    let env = Env::new();
    env.run_ok(&["init"]);

    let again = env.run(&["init"]);
    assert_eq!(again.status.code(), Some(4));
    assert!(stderr(&again).contains("Config already exists"));

    env.run_ok(&["init", "--force", "--weekly"]);
    let contents = std::fs::read_to_string(env.config_path()).expect("read config");
    assert!(contents.contains("period = \"week\""));
}

#[test]
fn test_cli_init_force_replaces_malformed_config() {
    let env = Env::new();
    env.write_config("not [valid toml");

    let broken = env.run(&["check"]);
    assert!(!broken.status.success());

    env.run_ok(&["init", "--force"]);
    let contents = std::fs::read_to_string(env.config_path()).expect("read config");
    assert!(contents.contains("[store]"));
    assert!(env.run_ok(&["check"]).contains("Integrity check: OK"));
}

#[test]
fn test_cli_add_and_list_by_period() {
    let env = Env::new();

    let ids: Vec<String> = [
        ("Toothpaste", "5", "survival", "June"),
        ("Vacation", "1000", "optional", "July"),
        ("Food", "17", "survival", "October"),
    ]
    .iter()
    .map(|(d, a, c, m)| {
        let output = add(&env, d, a, c, m);
        assert!(output.status.success(), "{}", stderr(&output));
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    })
    .collect();
    assert_eq!(ids, vec!["1", "2", "3"]);

    let june = env.run_json(&[
        "expenses", "list", "--month", "June", "--year", "2017", "--json",
    ]);
    assert_eq!(descriptions(&june), vec!["Toothpaste"]);
    assert_eq!(june[0]["amount"], 5);
    assert_eq!(june[0]["category"], "survival");
    assert_eq!(june[0]["period"], "June 2017");

    let all = env.run_json(&["expenses", "list", "--all", "--json"]);
    assert_eq!(descriptions(&all), vec!["Toothpaste", "Vacation", "Food"]);

    let lower = env.run_json(&[
        "expenses", "list", "--month", "june", "--year", "2017", "--json",
    ]);
    assert!(lower.as_array().expect("array").is_empty());
}

#[test]
fn test_cli_table_output() {
    let env = Env::new();
    assert!(add(&env, "Toothpaste", "5", "survival", "June").status.success());

    let table = env.run_ok(&["expenses", "list", "--month", "June", "--year", "2017"]);
    assert!(table.contains("Toothpaste"));
    assert!(table.contains("Total"));

    let plain = env.run_ok(&[
        "-q", "expenses", "list", "--month", "June", "--year", "2017",
    ]);
    assert!(plain.contains("Description: Toothpaste | Amount: 5 | Category: survival"));
}

#[test]
fn test_cli_invalid_category() {
    let env = Env::new();
    let output = add(&env, "Snacks", "3", "food", "June");

    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("Invalid category"));

    let all = env.run_json(&["expenses", "list", "--all", "--json"]);
    assert!(all.as_array().expect("array").is_empty());
}

#[test]
fn test_cli_income_and_target() {
    let env = Env::new();
    let period = ["--month", "January", "--year", "2018"];

    let shown = env.run_json(&[&["income", "show", "--json"][..], &period[..]].concat());
    assert_eq!(shown["income"], 0);

    env.run_ok(&[&["income", "set", "2000"][..], &period[..]].concat());
    env.run_ok(&[&["income", "set", "2500"][..], &period[..]].concat());
    let shown = env.run_json(&[&["income", "show", "--json"][..], &period[..]].concat());
    assert_eq!(shown["period"], "January 2018");
    assert_eq!(shown["income"], 2500);

    env.run_ok(&[&["target", "set", "tbd"][..], &period[..]].concat());
    let target = env.run_json(&[&["target", "show", "--json"][..], &period[..]].concat());
    assert_eq!(target["target"], 0);
    assert_eq!(target["raw"], "tbd");

    env.run_ok(&[&["target", "set", "500"][..], &period[..]].concat());
    let target = env.run_json(&[&["target", "show", "--json"][..], &period[..]].concat());
    assert_eq!(target["target"], 500);
}

#[test]
fn test_cli_summary() {
    let env = Env::new();
    let period = ["--month", "June", "--year", "2017"];
    assert!(add(&env, "Toothpaste", "5", "survival", "June").status.success());
    assert!(add(&env, "Cinema", "12", "culture", "June").status.success());
    assert!(add(&env, "Trip", "300", "optional", "July").status.success());
    env.run_ok(&[&["income", "set", "2000"][..], &period[..]].concat());
    env.run_ok(&[&["target", "set", "500"][..], &period[..]].concat());

    let summary = env.run_json(&[&["summary", "--json"][..], &period[..]].concat());
    assert_eq!(summary["period"], "June 2017");
    assert_eq!(summary["spent"], 17);
    assert_eq!(summary["remaining"], 1483);
    assert_eq!(summary["categories"]["survival"], 5);
    assert_eq!(summary["categories"]["culture"], 12);
    assert!(summary["categories"].get("optional").is_none());
}

#[test]
fn test_cli_clear_requires_confirmation() {
    let env = Env::new();
    assert!(add(&env, "Toothpaste", "5", "survival", "June").status.success());
    assert!(add(&env, "Vacation", "1000", "optional", "July").status.success());

    let refused = env.run(&["clear"]);
    assert_eq!(refused.status.code(), Some(4));
    assert!(stderr(&refused).contains("--yes"));

    env.run_ok(&["clear", "--yes"]);
    let all = env.run_json(&["expenses", "list", "--all", "--json"]);
    assert!(all.as_array().expect("array").is_empty());

    let output = add(&env, "Food", "17", "survival", "October");
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "3");
}

#[test]
fn test_cli_check() {
    let env = Env::new();
    let missing = env.run(&["check"]);
    assert_eq!(missing.status.code(), Some(3));
    assert!(stderr(&missing).contains("No store found at"));

    env.run_ok(&["init"]);
    let output = env.run_ok(&["check"]);
    assert!(output.contains("Integrity check: OK"));
}

#[test]
fn test_cli_locked_store() {
    let env = Env::new();
    env.run_ok(&["init"]);
    let contents = std::fs::read_to_string(env.config_path()).expect("read config");
    env.write_config(&contents.replace("lock_timeout_ms = 1000", "lock_timeout_ms = 50"));

    let _held = Store::open(&env.store_path()).expect("hold store open");
    let output = env.run(&["expenses", "list", "--all"]);

    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("Failed to open store"));
}

#[test]
fn test_cli_garbage_store() {
    let env = Env::new();
    let path = env.dir.path().join("garbage.db");
    std::fs::write(&path, vec![0x5a; 4096]).expect("write garbage");

    let output = env.run(&["--db", &path.to_string_lossy(), "expenses", "list", "--all"]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_cli_backup() {
    let env = Env::new();
    assert!(add(&env, "Toothpaste", "5", "survival", "June").status.success());
    let destination = env.dir.path().join("backups").join("copy.db");
    let destination_arg = destination.to_string_lossy().to_string();

    env.run_ok(&["backup", &destination_arg]);
    assert!(destination.exists());

    let copied = env.run_json(&[
        "--db",
        &destination_arg,
        "expenses",
        "list",
        "--all",
        "--json",
    ]);
    assert_eq!(descriptions(&copied), vec!["Toothpaste"]);
}

#[test]
fn test_cli_weekly_store() {
    let env = Env::new();
    env.run_ok(&["init", "--weekly"]);

    let output = env.run(&[
        "-q", "expenses", "add", "-d", "Bus", "-a", "2", "-c", "survival", "--week", "3",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));

    let week = env.run_json(&["expenses", "list", "--week", "3", "--json"]);
    assert_eq!(descriptions(&week), vec!["Bus"]);
    assert_eq!(week[0]["period"], "3");

    let mismatch = add(&env, "Toothpaste", "5", "survival", "June");
    assert_eq!(mismatch.status.code(), Some(4));
}

#[test]
fn test_cli_db_flag_overrides_config() {
    let env = Env::new();
    env.run_ok(&["init"]);
    let other: &Path = &env.dir.path().join("other.db");
    let other_arg = other.to_string_lossy().to_string();

    env.run_ok(&[
        "--db", &other_arg, "expenses", "add", "-d", "Gum", "-a", "1", "-c", "extra",
    ]);
    assert!(other.exists());

    let default_store = env.run_json(&["expenses", "list", "--all", "--json"]);
    assert!(default_store.as_array().expect("array").is_empty());
}
