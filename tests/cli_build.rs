//! CLI integration tests for the `abuild` binary.
//!
//! Tests the full command-line interface: config discovery, job listing,
//! building into a platform cache, output formats, overrides, and exit
//! codes. Every test runs the binary in its own temp directory so relative
//! paths in the config resolve against the test sandbox.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Config with two copy platforms and a relative cache root.
const COPY_CONFIG: &str = r#"
[worker]
name = "scripts"
extensions = ["lua"]
platforms = ["pc", "console"]

[cache]
root = "cache"
"#;

/// Config that compiles for console through `cat` (an identity filter).
#[cfg(unix)]
const COMPILE_CONFIG: &str = r#"
[worker]
name = "scripts"
extensions = ["lua"]
platforms = ["pc", "console"]

[cache]
root = "cache"

[platforms.console]
action = "compile"

[compiler]
command = ["cat"]
output_extension = "luac"
"#;

/// Run abuild in `dir` and return the raw process output.
fn run_raw(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_abuild"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to execute abuild")
}

/// Run abuild in `dir` and return (stdout, stderr, success).
fn run_in(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = run_raw(dir, args);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn write_config(dir: &Path, content: &str) {
    fs::write(dir.join("assetbuild.toml"), content).expect("should write config");
}

fn write_asset(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("should create asset dirs");
    }
    fs::write(&path, content).expect("should write asset");
}

// ============================================================================
// jobs subcommand
// ============================================================================

#[test]
fn test_jobs_lists_one_line_per_platform() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), COPY_CONFIG);

    let (stdout, stderr, ok) = run_in(
        temp.path(),
        &["jobs", "walk.lua", "--config", "assetbuild.toml"],
    );

    assert!(ok, "jobs should succeed: {}", stderr);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["copy:walk.lua@pc", "copy:walk.lua@console"]);
}

#[test]
fn test_jobs_reports_unsupported_asset() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), COPY_CONFIG);

    let (stdout, _, ok) = run_in(
        temp.path(),
        &["jobs", "hero.png", "--config", "assetbuild.toml"],
    );

    assert!(ok, "unsupported asset is a normal answer, not an error");
    assert!(stdout.contains("no jobs"));
}

#[test]
fn test_jobs_platforms_flag_overrides_config() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), COPY_CONFIG);

    let (stdout, _, ok) = run_in(
        temp.path(),
        &[
            "jobs",
            "walk.lua",
            "--platforms",
            "handheld",
            "--config",
            "assetbuild.toml",
        ],
    );

    assert!(ok);
    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec!["copy:walk.lua@handheld"]);
}

// ============================================================================
// build subcommand
// ============================================================================

#[test]
fn test_build_copies_asset_into_platform_cache() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), COPY_CONFIG);
    write_asset(temp.path(), "walk.lua", "print('walk')");

    let (stdout, stderr, ok) = run_in(
        temp.path(),
        &["build", "walk.lua", "--config", "assetbuild.toml"],
    );

    assert!(ok, "build should succeed: {}", stderr);
    assert!(stdout.contains("Build succeeded: 2 jobs"));
    for platform in ["pc", "console"] {
        let artifact = temp.path().join("cache").join(platform).join("walk.lua");
        assert_eq!(
            fs::read(&artifact).expect("artifact should exist"),
            b"print('walk')"
        );
    }
}

#[cfg(unix)]
#[test]
fn test_build_compiles_through_configured_command() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), COMPILE_CONFIG);
    write_asset(temp.path(), "walk.lua", "print('walk')");

    let (_, stderr, ok) = run_in(
        temp.path(),
        &["build", "walk.lua", "--config", "assetbuild.toml"],
    );

    assert!(ok, "build should succeed: {}", stderr);
    assert_eq!(
        fs::read(temp.path().join("cache/pc/walk.lua")).unwrap(),
        b"print('walk')"
    );
    assert_eq!(
        fs::read(temp.path().join("cache/console/walk.luac")).unwrap(),
        b"print('walk')"
    );
}

#[cfg(unix)]
#[test]
fn test_build_surfaces_compiler_rejection_and_fails() {
    let temp = TempDir::new().unwrap();
    write_config(
        temp.path(),
        r#"
[worker]
extensions = ["lua"]
platforms = ["console"]

[cache]
root = "cache"

[platforms.console]
action = "compile"

[compiler]
command = ["sh", "-c", "echo 'walk.lua:1: unexpected symbol' >&2; exit 1"]
output_extension = "luac"
"#,
    );
    write_asset(temp.path(), "walk.lua", "print('walk')");

    let (stdout, _, ok) = run_in(
        temp.path(),
        &["build", "walk.lua", "--config", "assetbuild.toml"],
    );

    assert!(!ok, "rejected compile should fail the build");
    assert!(stdout.contains("Build failed: 0 succeeded, 1 failed, 0 crashed"));
    assert!(stdout.contains("walk.lua:1: unexpected symbol"));
    assert!(!temp.path().join("cache/console").exists());
}

#[test]
fn test_build_missing_asset_fails() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), COPY_CONFIG);

    let (stdout, _, ok) = run_in(
        temp.path(),
        &["build", "missing.lua", "--config", "assetbuild.toml"],
    );

    assert!(!ok);
    assert!(stdout.contains("Build failed"));
}

#[test]
fn test_build_without_assets_is_a_usage_error() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), COPY_CONFIG);

    let (_, stderr, ok) = run_in(temp.path(), &["build", "--config", "assetbuild.toml"]);

    assert!(!ok);
    assert!(stderr.contains("no assets"));
}

#[test]
fn test_build_discovers_assets_under_src() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), COPY_CONFIG);
    write_asset(temp.path(), "scripts/walk.lua", "print('walk')");
    write_asset(temp.path(), "scripts/ai/idle.lua", "print('idle')");
    write_asset(temp.path(), "scripts/notes.md", "not an asset");

    let (stdout, stderr, ok) = run_in(
        temp.path(),
        &["build", "--src", "scripts", "--config", "assetbuild.toml"],
    );

    assert!(ok, "build should succeed: {}", stderr);
    assert!(stdout.contains("Build succeeded: 4 jobs"));
    assert!(temp.path().join("cache/pc/walk.lua").exists());
    assert!(temp.path().join("cache/pc/idle.lua").exists());
    assert!(temp.path().join("cache/console/walk.lua").exists());
    assert!(!temp.path().join("cache/pc/notes.md").exists());
}

#[test]
fn test_build_unsupported_asset_warns_and_exits_zero() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), COPY_CONFIG);
    write_asset(temp.path(), "notes.md", "not an asset");

    let (stdout, stderr, ok) = run_in(
        temp.path(),
        &["build", "notes.md", "--config", "assetbuild.toml"],
    );

    assert!(ok, "an asset nobody claims is not a build failure");
    assert!(stderr.contains("unsupported asset type"));
    assert!(stdout.contains("Build succeeded: 0 jobs"));
}

// ============================================================================
// Overrides and output formats
// ============================================================================

#[test]
fn test_build_platforms_flag_overrides_config() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), COPY_CONFIG);
    write_asset(temp.path(), "walk.lua", "print('walk')");

    let (_, stderr, ok) = run_in(
        temp.path(),
        &[
            "build",
            "walk.lua",
            "--platforms",
            "handheld",
            "--config",
            "assetbuild.toml",
        ],
    );

    assert!(ok, "build should succeed: {}", stderr);
    assert!(temp.path().join("cache/handheld/walk.lua").exists());
    assert!(!temp.path().join("cache/pc").exists());
}

#[test]
fn test_build_cache_flag_overrides_config() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), COPY_CONFIG);
    write_asset(temp.path(), "walk.lua", "print('walk')");

    let (_, stderr, ok) = run_in(
        temp.path(),
        &[
            "build",
            "walk.lua",
            "--cache",
            "out",
            "--config",
            "assetbuild.toml",
        ],
    );

    assert!(ok, "build should succeed: {}", stderr);
    assert!(temp.path().join("out/pc/walk.lua").exists());
    assert!(!temp.path().join("cache").exists());
}

#[test]
fn test_build_json_format_prints_full_response_on_stdout() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), COPY_CONFIG);
    write_asset(temp.path(), "walk.lua", "print('walk')");

    let (stdout, stderr, ok) = run_in(
        temp.path(),
        &[
            "build",
            "walk.lua",
            "--format",
            "json",
            "--config",
            "assetbuild.toml",
        ],
    );

    assert!(ok, "build should succeed: {}", stderr);
    // Progress events stream to stderr; stdout carries only the response.
    let response: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("stdout should be one JSON document");
    let reports = response["reports"].as_array().expect("reports array");
    assert_eq!(reports.len(), 2);
    for report in reports {
        assert_eq!(report["outcome"]["result"], "success");
        assert_eq!(report["key"]["kind"], "copy");
    }
    assert!(stderr.contains("batch_completed"));
}

#[test]
fn test_build_rejects_unknown_format() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), COPY_CONFIG);
    write_asset(temp.path(), "walk.lua", "print('walk')");

    let output = run_raw(
        temp.path(),
        &[
            "build",
            "walk.lua",
            "--format",
            "jsno",
            "--config",
            "assetbuild.toml",
        ],
    );

    assert_eq!(
        output.status.code(),
        Some(2),
        "a bad format value is invalid usage, not a build failure"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown format 'jsno'"));
    assert!(stderr.contains("Supported: console, json"));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Build succeeded"));
    assert!(
        !temp.path().join("cache").exists(),
        "nothing may be built under a rejected format"
    );
}

#[test]
fn test_build_quiet_suppresses_progress() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), COPY_CONFIG);
    write_asset(temp.path(), "walk.lua", "print('walk')");

    let (stdout, stderr, ok) = run_in(
        temp.path(),
        &["build", "walk.lua", "--quiet", "--config", "assetbuild.toml"],
    );

    assert!(ok);
    assert!(stderr.is_empty(), "quiet build should not write progress");
    assert!(stdout.contains("Build succeeded"));
}
