// tests/config_loading.rs

use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::Duration;

use tempfile::TempDir;

use syncwatcher::config::{load_and_validate, load_and_validate_with, load_from_path};
use syncwatcher::errors::SyncWatcherError;
use syncwatcher::fs::mock::MockFileSystem;

type TestResult = Result<(), Box<dyn Error>>;

fn write_config(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

fn expect_config_error(result: syncwatcher::errors::Result<syncwatcher::config::ConfigFile>) -> String {
    match result {
        Err(SyncWatcherError::ConfigError(msg)) => msg,
        Err(e) => panic!("expected ConfigError, got: {e:?}"),
        Ok(cfg) => panic!("expected error, got Ok: {cfg:?}"),
    }
}

#[test]
fn json_config_with_defaults() -> TestResult {
    let tmp = TempDir::new()?;
    fs::create_dir(tmp.path().join("site"))?;
    let path = write_config(
        tmp.path(),
        "config.json",
        r#"{ "watch_settings": [ { "dir": "site", "script": "echo ok" } ] }"#,
    );

    let cfg = load_and_validate(&path)?;

    assert_eq!(cfg.interpreter().program, "sh");
    assert_eq!(cfg.interpreter().flag, "-c");
    assert_eq!(cfg.quiescence(), Duration::from_millis(500));
    assert_eq!(cfg.targets().len(), 1);

    let target = &cfg.targets()[0];
    assert_eq!(target.root_dir(), fs::canonicalize(tmp.path().join("site"))?);
    assert_eq!(target.script(), "echo ok");
    assert!(target.ignore().is_empty());
    assert!(!target.sync_first());
    assert!(!target.suppress_output_logging());
    Ok(())
}

#[test]
fn toml_config_is_selected_by_extension() -> TestResult {
    let tmp = TempDir::new()?;
    fs::create_dir(tmp.path().join("a"))?;
    fs::create_dir(tmp.path().join("b"))?;
    let path = write_config(
        tmp.path(),
        "syncwatcher.toml",
        r#"
terminal = "bash"
debounce_ms = 250

[[watch_settings]]
dir = "a"
script = "echo a"
ignore = ['^\.git/', '\.swp$']
sync_first = true

[[watch_settings]]
dir = "b"
script = "echo b"
ignore_script_output = true
"#,
    );

    let cfg = load_and_validate(&path)?;

    assert_eq!(cfg.interpreter().program, "bash");
    assert_eq!(cfg.interpreter().flag, "-c", "terminal_arg defaults on its own");
    assert_eq!(cfg.quiescence(), Duration::from_millis(250));

    let targets = cfg.targets();
    assert_eq!(targets.len(), 2);
    assert_eq!(targets[0].ignore().patterns().len(), 2);
    assert!(targets[0].sync_first());
    assert!(!targets[0].suppress_output_logging());
    assert!(!targets[1].sync_first());
    assert!(targets[1].suppress_output_logging());
    Ok(())
}

#[test]
fn script_file_is_resolved_to_an_absolute_path() -> TestResult {
    let tmp = TempDir::new()?;
    fs::create_dir(tmp.path().join("site"))?;
    fs::write(tmp.path().join("deploy.sh"), "echo deploy\n")?;
    let path = write_config(
        tmp.path(),
        "config.json",
        r#"{ "watch_settings": [ { "dir": "site", "script": "deploy.sh" } ] }"#,
    );

    let cfg = load_and_validate(&path)?;
    let expected = fs::canonicalize(tmp.path().join("deploy.sh"))?;
    assert_eq!(cfg.targets()[0].script(), expected.to_string_lossy());
    Ok(())
}

#[test]
fn missing_dir_is_rejected() -> TestResult {
    let tmp = TempDir::new()?;
    let path = write_config(
        tmp.path(),
        "config.json",
        r#"{ "watch_settings": [ { "dir": "nope", "script": "echo ok" } ] }"#,
    );

    let msg = expect_config_error(load_and_validate(&path));
    assert!(msg.contains("watch_settings[0].dir"), "{msg}");
    assert!(msg.contains("nope"), "{msg}");
    Ok(())
}

#[test]
fn dir_that_is_a_file_is_rejected() -> TestResult {
    let tmp = TempDir::new()?;
    fs::write(tmp.path().join("plain.txt"), "x")?;
    let path = write_config(
        tmp.path(),
        "config.json",
        r#"{ "watch_settings": [ { "dir": "plain.txt", "script": "echo ok" } ] }"#,
    );

    let msg = expect_config_error(load_and_validate(&path));
    assert!(msg.contains("is not a directory"), "{msg}");
    Ok(())
}

#[test]
fn invalid_ignore_pattern_names_the_pattern() -> TestResult {
    let tmp = TempDir::new()?;
    fs::create_dir(tmp.path().join("site"))?;
    let path = write_config(
        tmp.path(),
        "config.json",
        r#"{ "watch_settings": [ { "dir": "site", "script": "echo ok", "ignore": ["ok", "(unclosed"] } ] }"#,
    );

    let msg = expect_config_error(load_and_validate(&path));
    assert!(msg.contains("watch_settings[0].ignore"), "{msg}");
    assert!(msg.contains("(unclosed"), "{msg}");
    Ok(())
}

#[test]
fn empty_or_missing_watch_settings_is_rejected() -> TestResult {
    let tmp = TempDir::new()?;

    let empty = write_config(tmp.path(), "empty.json", r#"{ "watch_settings": [] }"#);
    let msg = expect_config_error(load_and_validate(&empty));
    assert!(msg.contains("at least one"), "{msg}");

    let missing = write_config(tmp.path(), "missing.json", r#"{ "terminal": "sh" }"#);
    let msg = expect_config_error(load_and_validate(&missing));
    assert!(msg.contains("at least one"), "{msg}");
    Ok(())
}

#[test]
fn zero_debounce_is_rejected() -> TestResult {
    let tmp = TempDir::new()?;
    fs::create_dir(tmp.path().join("site"))?;
    let path = write_config(
        tmp.path(),
        "config.json",
        r#"{ "debounce_ms": 0, "watch_settings": [ { "dir": "site", "script": "echo ok" } ] }"#,
    );

    let msg = expect_config_error(load_and_validate(&path));
    assert!(msg.contains("debounce_ms"), "{msg}");
    Ok(())
}

#[test]
fn script_that_is_a_directory_is_rejected() -> TestResult {
    let tmp = TempDir::new()?;
    fs::create_dir(tmp.path().join("site"))?;
    fs::create_dir(tmp.path().join("scripts"))?;
    let path = write_config(
        tmp.path(),
        "config.json",
        r#"{ "watch_settings": [ { "dir": "site", "script": "scripts" } ] }"#,
    );

    let msg = expect_config_error(load_and_validate(&path));
    assert!(msg.contains("is a directory"), "{msg}");
    Ok(())
}

#[test]
fn missing_script_path_is_rejected() -> TestResult {
    let tmp = TempDir::new()?;
    fs::create_dir(tmp.path().join("site"))?;
    let path = write_config(
        tmp.path(),
        "config.json",
        r#"{ "watch_settings": [ { "dir": "site", "script": "./bin/deploy.sh" } ] }"#,
    );

    let msg = expect_config_error(load_and_validate(&path));
    assert!(msg.contains("does not exist"), "{msg}");
    Ok(())
}

#[test]
fn terminal_path_with_spaces_is_kept_whole() -> TestResult {
    let tmp = TempDir::new()?;
    fs::create_dir(tmp.path().join("site"))?;
    let path = write_config(
        tmp.path(),
        "config.json",
        r#"{ "terminal": "/opt/My Tools/bash", "watch_settings": [ { "dir": "site", "script": "echo ok" } ] }"#,
    );

    let cfg = load_and_validate(&path)?;
    assert_eq!(cfg.interpreter().program, "/opt/My Tools/bash");
    assert_eq!(cfg.interpreter().flag, "-c");
    Ok(())
}

#[test]
fn unknown_fields_are_a_parse_error() -> TestResult {
    let tmp = TempDir::new()?;
    let path = write_config(
        tmp.path(),
        "config.json",
        r#"{ "watch_settings": [ { "dir": ".", "script": "echo", "recursive": true } ] }"#,
    );

    match load_and_validate(&path) {
        Err(SyncWatcherError::JsonError(_)) => Ok(()),
        other => panic!("expected JsonError, got: {other:?}"),
    }
}

#[test]
fn malformed_toml_is_a_toml_error() -> TestResult {
    let tmp = TempDir::new()?;
    let path = write_config(tmp.path(), "config.toml", "watch_settings = [ {");

    match load_and_validate(&path) {
        Err(SyncWatcherError::TomlError(_)) => Ok(()),
        other => panic!("expected TomlError, got: {other:?}"),
    }
}

#[test]
fn unreadable_config_file_is_a_config_error() {
    let msg = expect_config_error(load_and_validate("/definitely/not/here/config.json"));
    assert!(msg.contains("read config file"), "{msg}");
}

#[test]
fn validation_runs_against_mock_filesystem() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_dir("/srv/site/src");
    fs.add_file(
        "/etc/syncwatcher/config.json",
        r#"{ "watch_settings": [ { "dir": "/srv/site", "script": "rsync -a \"$syncdir/\" backup:" } ] }"#,
    );

    let raw = load_from_path(&fs, "/etc/syncwatcher/config.json")?;
    assert_eq!(raw.watch_settings.len(), 1);

    let cfg = load_and_validate_with(&fs, "/etc/syncwatcher/config.json")?;
    assert_eq!(cfg.targets()[0].root_dir(), Path::new("/srv/site"));
    assert_eq!(cfg.targets()[0].script(), r#"rsync -a "$syncdir/" backup:"#);
    Ok(())
}

#[test]
fn force_sync_first_overrides_every_target() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_dir("/a");
    fs.add_dir("/b");
    fs.add_file(
        "/cfg/config.json",
        r#"{ "watch_settings": [
            { "dir": "/a", "script": "echo a" },
            { "dir": "/b", "script": "echo b", "sync_first": true }
        ] }"#,
    );

    let mut cfg = load_and_validate_with(&fs, "/cfg/config.json")?;
    cfg.force_sync_first();
    assert!(cfg.targets().iter().all(|t| t.sync_first()));
    Ok(())
}
