//! Command-line behaviour of the pluginforge binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn pluginforge(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pluginforge").unwrap();
    cmd.current_dir(cwd).env_remove("RUST_LOG");
    cmd
}

fn make_plugin(root: &Path, name: &str) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("package.json"), "{}").unwrap();
    fs::write(dir.join("composer.json"), r#"{"require": {"php": "^8.1"}}"#).unwrap();
    fs::write(dir.join("Gruntfile.js"), "module.exports = () => {};").unwrap();
}

#[test]
fn test_init_writes_config_once() {
    let temp = TempDir::new().unwrap();
    let cwd = temp.path().to_str().unwrap();

    pluginforge(temp.path())
        .args(["init", "--cwd", cwd])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config"));
    assert!(temp.path().join(".pluginforge.json").is_file());

    pluginforge(temp.path())
        .args(["init", "--cwd", cwd])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    pluginforge(temp.path())
        .args(["init", "--cwd", cwd, "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config"));
}

#[test]
fn test_list_selected_plugins() {
    let temp = TempDir::new().unwrap();
    make_plugin(temp.path(), "wp-alpha");
    make_plugin(temp.path(), "wp-beta");
    fs::create_dir(temp.path().join("node_modules")).unwrap();

    pluginforge(temp.path())
        .args(["list", "--exclude", "wp-beta"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wp-alpha"))
        .stdout(predicate::str::contains("wp-beta").not())
        .stdout(predicate::str::contains("node_modules").not());
}

#[test]
fn test_unknown_included_plugin_fails() {
    let temp = TempDir::new().unwrap();
    make_plugin(temp.path(), "wp-alpha");

    pluginforge(temp.path())
        .args(["build", "--include", "wp-missing", "--no-report"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("wp-missing"));
}

#[test]
fn test_invalid_plugin_name_fails() {
    let temp = TempDir::new().unwrap();
    make_plugin(temp.path(), "wp-alpha");

    pluginforge(temp.path())
        .args(["list", "--include", "alpha"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid unit name"));
}

#[test]
fn test_unknown_skip_step_fails() {
    let temp = TempDir::new().unwrap();
    make_plugin(temp.path(), "wp-alpha");

    pluginforge(temp.path())
        .args(["build", "--skip", "deploy", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown step 'deploy'"));
}

#[cfg(unix)]
mod with_shell {
    use super::*;

    fn write_config(root: &Path) {
        let config = serde_json::json!({
            "plugins_dir": "plugins",
            "output_dir": "build",
            "tools": [
                { "id": "shell", "command": "echo 5.2.0" }
            ],
            "interpreter": { "id": "php", "command": "echo 'PHP 8.1.0 (cli)'" },
            "steps": [
                { "key": "compile", "command": "echo compiling", "description": "Compile" },
                { "key": "grunt_css", "command": "exit 4", "description": "Compile CSS" },
                {
                    "key": "grunt_zip",
                    "command": "mkdir -p dist && echo zip > dist/$(basename \"$PWD\").zip",
                    "description": "Package"
                }
            ]
        });
        fs::write(
            root.join(".pluginforge.json"),
            serde_json::to_string_pretty(&config).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn test_build_end_to_end() {
        let temp = TempDir::new().unwrap();
        let plugins = temp.path().join("plugins");
        make_plugin(&plugins, "wp-alpha");
        fs::create_dir_all(plugins.join("wp-broken")).unwrap();
        write_config(temp.path());

        pluginforge(temp.path())
            .arg("build")
            .assert()
            .success()
            .stdout(predicate::str::contains("compiling"))
            .stdout(predicate::str::contains("1 succeeded, 0 failed (100% success)"))
            .stdout(predicate::str::contains("wp-broken"));

        let build = temp.path().join("build");
        assert!(build.join("wp-alpha.zip").is_file());
        assert!(!plugins.join("wp-alpha/dist/wp-alpha.zip").exists());
        assert!(build.join("build-report.json").is_file());
        let md = fs::read_to_string(build.join("BUILD_REPORT.md")).unwrap();
        assert!(md.contains("| grunt_css | failed | 0s | exit code 4 |"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(build.join("build-report.json")).unwrap())
                .unwrap();
        assert_eq!(json["build"]["totals"]["successful"], 1);
        assert_eq!(json["validation"]["incompatible"][0], "wp-broken");
    }

    #[test]
    fn test_fatal_step_sets_exit_code() {
        let temp = TempDir::new().unwrap();
        let plugins = temp.path().join("plugins");
        make_plugin(&plugins, "wp-alpha");
        write_config(temp.path());

        pluginforge(temp.path())
            .args(["build", "--json", "--no-report"])
            .arg("--skip")
            .arg("grunt_zip")
            .assert()
            .success()
            .stdout(predicate::str::contains("\"successful\": 1"));

        let config_path = temp.path().join(".pluginforge.json");
        let mut config: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&config_path).unwrap()).unwrap();
        config["steps"][0]["command"] = serde_json::json!("exit 9");
        fs::write(&config_path, config.to_string()).unwrap();

        pluginforge(temp.path())
            .args(["build", "--no-report"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("exit code 9"));
    }

    #[test]
    fn test_json_mode_streams_step_output_to_stderr() {
        let temp = TempDir::new().unwrap();
        let plugins = temp.path().join("plugins");
        make_plugin(&plugins, "wp-alpha");
        write_config(temp.path());

        let assert = pluginforge(temp.path())
            .args(["build", "--json", "--no-report"])
            .assert()
            .success()
            .stderr(predicate::str::contains("compiling"));

        let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        assert_eq!(json["build"]["totals"]["successful"], 1);
    }

    #[test]
    fn test_validate_reports_incompatible() {
        let temp = TempDir::new().unwrap();
        let plugins = temp.path().join("plugins");
        make_plugin(&plugins, "wp-alpha");
        fs::create_dir_all(plugins.join("wp-empty")).unwrap();
        write_config(temp.path());

        pluginforge(temp.path())
            .arg("validate")
            .assert()
            .code(1)
            .stdout(predicate::str::contains("✅ wp-alpha"))
            .stdout(predicate::str::contains("missing Gruntfile.js"));

        pluginforge(temp.path())
            .args(["validate", "--include", "wp-alpha"])
            .assert()
            .success();
    }
}
