mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::cargo_bin("vrc-archiver").unwrap()
}

#[test]
fn test_cli_help() {
    cmd().arg("--help").assert().success();
}

#[test]
fn test_archive_help() {
    cmd().args(["archive", "--help"]).assert().success();
}

#[test]
fn test_export_help() {
    cmd().args(["export", "--help"]).assert().success();
}

#[test]
fn test_meta_help() {
    cmd().args(["meta", "--help"]).assert().success();
}

#[test]
fn test_archive_missing_args() {
    cmd().args(["archive"]).assert().failure();
}

#[test]
fn test_archive_nonexistent_source_reports_structured_failure() {
    let temp_dir = TempDir::new().unwrap();
    cmd()
        .args([
            "archive",
            "/nonexistent/source/folder",
            &temp_dir.path().to_string_lossy(),
            "-f",
            "zip",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"success\": false"));
}

#[test]
fn test_archive_unsupported_format_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("2024-05");
    common::fill_screenshot_folder(&src);

    cmd()
        .args([
            "archive",
            &src.to_string_lossy(),
            &temp_dir.path().to_string_lossy(),
            "-f",
            "rar",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"success\": false"));
}

#[test]
fn test_archive_folder_end_to_end_zip() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("2024-05");
    let out = temp_dir.path().join("archives");
    common::fill_screenshot_folder(&src);

    cmd()
        .args([
            "archive",
            &src.to_string_lossy(),
            &out.to_string_lossy(),
            "-f",
            "zip",
            "-q",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"success\": true"))
        .stdout(predicate::str::contains("\"file_count\": 3"))
        .stdout(predicate::str::contains("\"image_count\": 2"));

    assert!(out.join("2024-05.zip").exists());
}

#[test]
fn test_folders_lists_monthly_candidates() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("2024-01")).unwrap();
    fs::create_dir(temp_dir.path().join("2024-02")).unwrap();
    fs::create_dir(temp_dir.path().join("random")).unwrap();

    cmd()
        .args(["folders", &temp_dir.path().to_string_lossy()])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01"))
        .stdout(predicate::str::contains("2024-02"))
        .stdout(predicate::str::contains("random").not());
}

#[test]
fn test_export_empty_ids_fails_and_creates_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let index = temp_dir.path().join("index.json");
    fs::write(&index, "{}").unwrap();
    let output = temp_dir.path().join("export.zip");

    cmd()
        .args([
            "export",
            &output.to_string_lossy(),
            "--index",
            &index.to_string_lossy(),
            "-f",
            "zip",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"success\": false"));

    assert!(!output.exists());
}

#[test]
fn test_export_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let shot = temp_dir.path().join("shot.png");
    common::write_test_png(&shot, 8, 8);

    let index = temp_dir.path().join("index.json");
    fs::write(
        &index,
        format!(r#"{{"1": "{}"}}"#, shot.to_string_lossy().replace('\\', "/")),
    )
    .unwrap();
    let output = temp_dir.path().join("export.zip");

    cmd()
        .args([
            "export",
            &output.to_string_lossy(),
            "--index",
            &index.to_string_lossy(),
            "--ids",
            "1,2",
            "-f",
            "zip",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"exported_count\": 1"))
        .stdout(predicate::str::contains("\"missing_ids\""));

    assert!(output.exists());
}

#[test]
fn test_convert_png_to_jxl() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("shot.png");
    let output = temp_dir.path().join("shot.jxl");
    common::write_test_png(&input, 16, 16);

    cmd()
        .args([
            "convert",
            &input.to_string_lossy(),
            &output.to_string_lossy(),
            "--lossless",
        ])
        .assert()
        .success();

    assert!(output.exists());
}

#[test]
fn test_convert_invalid_quality_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("shot.png");
    let output = temp_dir.path().join("shot.jpg");
    common::write_test_png(&input, 8, 8);

    cmd()
        .args([
            "convert",
            &input.to_string_lossy(),
            &output.to_string_lossy(),
            "-Q",
            "0",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"success\": false"));
}

#[test]
fn test_meta_write_then_read_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let shot = temp_dir.path().join("shot.png");
    common::write_test_png(&shot, 8, 8);

    cmd()
        .args([
            "meta",
            "write",
            &shot.to_string_lossy(),
            "--world-id",
            "wrld_abc123",
            "--world-name",
            "ザ・ブラックキャット",
            "--friends",
            "alice,bob",
        ])
        .assert()
        .success();

    cmd()
        .args(["meta", "read", &shot.to_string_lossy()])
        .assert()
        .success()
        .stdout(predicate::str::contains("wrld_abc123"))
        .stdout(predicate::str::contains("ザ・ブラックキャット"))
        .stdout(predicate::str::contains("alice"));
}
