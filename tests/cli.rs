use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn deckconf_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("deckconf").expect("binary exists");
    cmd.env("XDG_CONFIG_HOME", home.join("config"))
        .env("DECKCONF_RELOAD_COMMAND", "")
        .arg("--actions-dir")
        .arg(home.join("actions"));
    cmd
}

#[test]
fn help_lists_subcommands() {
    let temp = TempDir::new().unwrap();
    deckconf_cmd(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Record input sequences"))
        .stdout(predicate::str::contains("record"))
        .stdout(predicate::str::contains("compile"));
}

#[test]
fn compile_reads_events_from_stdin() {
    let temp = TempDir::new().unwrap();
    let events = r#"[
        {"type": "key", "key": "c", "code": "KeyC", "modifiers": ["ctrl"]},
        {"type": "key", "key": "v", "code": "KeyV", "modifiers": ["ctrl"]}
    ]"#;

    deckconf_cmd(temp.path())
        .arg("compile")
        .write_stdin(events)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("#!/bin/bash\n"))
        .stdout(predicate::str::contains(
            "xdotool key \"ctrl+c\"\nxdotool key \"ctrl+v\"\n",
        ));
}

#[test]
fn compile_reads_events_from_file() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("events.json");
    fs::write(
        &file,
        r#"[{"type": "key", "key": "ArrowUp", "modifiers": ["alt", "shift"]},
            {"type": "mouse", "button": "middle"},
            {"type": "key", "key": " "}]"#,
    )
    .unwrap();

    deckconf_cmd(temp.path())
        .arg("compile")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "xdotool key \"shift+alt+Up\"\nxdotool click 2\nxdotool key \"space\"\n",
        ));
}

#[test]
fn compile_honours_script_config() {
    let temp = TempDir::new().unwrap();
    let config_dir = temp.path().join("config").join("deckconf");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[script]\nshebang = \"#!/bin/sh\"\nkey_command = \"ydotool key\"\n",
    )
    .unwrap();

    deckconf_cmd(temp.path())
        .arg("compile")
        .write_stdin(r#"[{"type": "key", "key": "Enter"}]"#)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("#!/bin/sh\n"))
        .stdout(predicate::str::contains("ydotool key \"Return\"\n"));
}

#[test]
fn compile_rejects_malformed_json() {
    let temp = TempDir::new().unwrap();
    deckconf_cmd(temp.path())
        .arg("compile")
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse event list JSON"));
}

#[test]
fn assign_installs_executable_script_and_show_lists_it() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("mute.sh");
    fs::write(&script, "#!/bin/bash\npactl set-sink-mute @DEFAULT_SINK@ toggle\n").unwrap();

    deckconf_cmd(temp.path())
        .args(["assign", "button-2"])
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Assigned button-2"));

    let installed = temp.path().join("actions/buttons/button-2.sh");
    assert_eq!(
        fs::read_to_string(&installed).unwrap(),
        fs::read_to_string(&script).unwrap()
    );

    deckconf_cmd(temp.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("button-2"))
        .stdout(predicate::str::contains("script=buttons/button-2.sh"))
        .stdout(predicate::str::contains(
            "(pactl set-sink-mute @DEFAULT_SINK@ toggle)",
        ))
        .stdout(predicate::str::contains("not executable").not());
}

#[test]
fn label_sets_display_attributes() {
    let temp = TempDir::new().unwrap();

    deckconf_cmd(temp.path())
        .args([
            "label",
            "touch-2",
            "Lights",
            "--position",
            "top",
            "--font-size",
            "32",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("label=\"Lights\""))
        .stdout(predicate::str::contains("position=top"))
        .stdout(predicate::str::contains("font-size=32"));

    let dir = temp.path().join("actions/touchscreen");
    assert_eq!(fs::read_to_string(dir.join("touch-2.txt")).unwrap(), "Lights");
    assert_eq!(
        fs::read_to_string(dir.join("touch-2-position.txt")).unwrap(),
        "top"
    );
    assert_eq!(
        fs::read_to_string(dir.join("touch-2-fontsize.txt")).unwrap(),
        "32"
    );
}

#[test]
fn font_size_applies_to_every_zone() {
    let temp = TempDir::new().unwrap();

    deckconf_cmd(temp.path())
        .args(["font-size", "36", "--all", "zones"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Font size 36 applied to all touch zones (4)",
        ));

    let dir = temp.path().join("actions/touchscreen");
    for zone in 1..=4 {
        assert_eq!(
            fs::read_to_string(dir.join(format!("touch-{zone}-fontsize.txt"))).unwrap(),
            "36"
        );
    }
    assert!(!temp.path().join("actions/buttons/button-1-fontsize.txt").exists());

    deckconf_cmd(temp.path())
        .args(["font-size", "5", "--all", "buttons"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn show_uses_description_header_of_compiled_script() {
    let temp = TempDir::new().unwrap();
    let events = temp.path().join("events.json");
    fs::write(&events, r#"[{"type": "key", "key": "a"}]"#).unwrap();

    let output = deckconf_cmd(temp.path())
        .arg("compile")
        .arg(&events)
        .output()
        .unwrap();
    let script = temp.path().join("recorded.sh");
    fs::write(&script, output.stdout).unwrap();

    deckconf_cmd(temp.path())
        .args(["assign", "touch-1-longpress"])
        .arg(&script)
        .assert()
        .success();

    deckconf_cmd(temp.path())
        .args(["show", "touch-1-longpress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(Recorded input sequence)"));
}

#[test]
fn label_rejects_out_of_range_font_size() {
    let temp = TempDir::new().unwrap();
    deckconf_cmd(temp.path())
        .args(["label", "button-1", "--font-size", "80"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn label_rejects_dials() {
    let temp = TempDir::new().unwrap();
    deckconf_cmd(temp.path())
        .args(["label", "dial-1-cw", "Volume"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("dial-1-cw has no label"));
}

#[test]
fn invalid_element_is_a_usage_error() {
    let temp = TempDir::new().unwrap();
    deckconf_cmd(temp.path())
        .args(["show", "button-12"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("number must be between 1 and 8"));
}

#[test]
fn clear_removes_element_files() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("next.sh");
    fs::write(&script, "#!/bin/bash\nplayerctl next\n").unwrap();

    deckconf_cmd(temp.path())
        .args(["assign", "dial-4-press"])
        .arg(&script)
        .assert()
        .success();

    deckconf_cmd(temp.path())
        .args(["clear", "dial-4-press"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared dial-4-press (1 file(s) removed)"));
    assert!(!temp.path().join("actions/dials/dial-4-press.sh").exists());

    deckconf_cmd(temp.path())
        .args(["clear", "dial-4-press"])
        .assert()
        .success()
        .stdout(predicate::str::contains("was not configured"));
}

#[test]
fn show_on_empty_directory() {
    let temp = TempDir::new().unwrap();
    deckconf_cmd(temp.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("No elements configured"));
}

#[test]
fn reload_runs_configured_command() {
    let temp = TempDir::new().unwrap();
    deckconf_cmd(temp.path())
        .env("DECKCONF_RELOAD_COMMAND", "true")
        .arg("reload")
        .assert()
        .success()
        .stdout(predicate::str::contains("Daemon reloaded"));

    deckconf_cmd(temp.path())
        .arg("reload")
        .assert()
        .success()
        .stdout(predicate::str::contains("No reload command configured"));
}

#[test]
fn failed_reload_after_assign_is_only_a_warning() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("a.sh");
    fs::write(&script, "#!/bin/bash\ntrue\n").unwrap();

    deckconf_cmd(temp.path())
        .env("DECKCONF_RELOAD_COMMAND", "false")
        .args(["assign", "button-1"])
        .arg(&script)
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning: Reload command 'false'"));
}

#[test]
fn init_config_refuses_to_overwrite() {
    let temp = TempDir::new().unwrap();

    deckconf_cmd(temp.path())
        .arg("init-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config at"));

    let written = temp.path().join("config/deckconf/config.toml");
    assert!(
        fs::read_to_string(&written)
            .unwrap()
            .contains("reload_command")
    );

    deckconf_cmd(temp.path())
        .arg("init-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn long_version_carries_build_identifier() {
    let temp = TempDir::new().unwrap();
    deckconf_cmd(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")))
        .stdout(predicate::str::is_match(r"\(\S+\)").unwrap());
}
