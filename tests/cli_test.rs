//! 実行ファイルとしての振る舞いのテスト
//!
//! HOME を一時フォルダに向け、利用者の設定ファイルを読まないようにする

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use predicates::prelude::*;
use predicates::str::contains;
use qr_expiry::display::HEADLESS_QUIT_HINT;
use std::path::Path;
use std::time::Duration;
use tempfile::{tempdir, TempDir};

fn cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("qr-expiry").unwrap();
    cmd.env("HOME", home)
        .env_remove("QR_EXPIRY_SOURCE")
        .env("RUST_LOG", "off")
        .timeout(Duration::from_secs(60));
    cmd
}

/// 白紙フレーム1枚だけのフォルダ
fn single_frame_dir() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");
    RgbImage::from_pixel(32, 32, Rgb([255, 255, 255]))
        .save(dir.path().join("frame_000.png"))
        .expect("フレーム保存失敗");
    dir
}

/// 開けない映像ソースはエラー表示して非0終了
#[test]
fn test_unopenable_source_fails() {
    let home = tempdir().expect("Failed to create temp dir");
    cmd(home.path())
        .args(["--source", "/nonexistent/frames"])
        .assert()
        .failure()
        .stdout(contains("Error: Could not open camera."))
        .stdout(contains("Press 'q' to quit.").not());
}

/// 画像のないフォルダも開けない扱い
#[test]
fn test_empty_folder_fails() {
    let home = tempdir().expect("Failed to create temp dir");
    let frames = tempdir().expect("Failed to create temp dir");
    cmd(home.path())
        .args(["--headless", "--source"])
        .arg(frames.path())
        .assert()
        .failure()
        .stdout(contains("Error: Could not open camera."));
}

/// --payload は3行を表示して終了
#[test]
fn test_payload_prints_three_lines() {
    let home = tempdir().expect("Failed to create temp dir");
    cmd(home.path())
        .args(["--payload", "LOT123 EXP 2099-01-01"])
        .assert()
        .success()
        .stdout(contains("QR Code Data: LOT123 EXP 2099-01-01"))
        .stdout(contains("Expiry Check: The product is still valid."))
        .stdout(contains("Duration: ").and(contains("day(s) remaining")));
}

/// 日付のないペイロード
#[test]
fn test_payload_without_date() {
    let home = tempdir().expect("Failed to create temp dir");
    cmd(home.path())
        .args(["-p", "hello world"])
        .assert()
        .success()
        .stdout(contains("Expiry Check: No expiry date found in QR code."))
        .stdout(contains("Duration: No expiry date found."));
}

/// --json はJSONで出力
#[test]
fn test_payload_json() {
    let home = tempdir().expect("Failed to create temp dir");
    let output = cmd(home.path())
        .args(["--payload", "EXP 01/01/2000", "--json"])
        .output()
        .expect("実行失敗");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSONではない");
    assert_eq!(value["payload"], "EXP 01/01/2000");
    assert_eq!(value["status"], "The product has expired.");
    assert_eq!(value["duration"], "The product has already expired.");
}

/// --json だけでは引数エラー
#[test]
fn test_json_without_payload_is_rejected() {
    let home = tempdir().expect("Failed to create temp dir");
    cmd(home.path()).arg("--json").assert().failure();
}

/// ヘッドレスでは標準入力からの終了方法を案内し、フレームが尽きたら正常終了
#[test]
fn test_headless_hint_and_exhausted_frames() {
    let home = tempdir().expect("Failed to create temp dir");
    let frames = single_frame_dir();
    cmd(home.path())
        .args(["--headless", "--source"])
        .arg(frames.path())
        .assert()
        .success()
        .stdout(contains(HEADLESS_QUIT_HINT))
        .stdout(contains("Press 'q' to quit.").not())
        .stdout(contains("Failed to grab frame."));
}

/// ヘッドレスのループ再生は標準入力の q で終わる
#[test]
fn test_headless_quits_on_q_line() {
    let home = tempdir().expect("Failed to create temp dir");
    let frames = single_frame_dir();
    cmd(home.path())
        .args(["--headless", "--loop-frames", "--source"])
        .arg(frames.path())
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(contains(HEADLESS_QUIT_HINT))
        .stdout(contains("Failed to grab frame.").not());
}

/// --save-config は引数の上書きを含めて保存する
#[test]
fn test_save_config_writes_file() {
    let home = tempdir().expect("Failed to create temp dir");
    cmd(home.path())
        .args(["--save-config", "--loop-frames", "--source", "/tmp/qr-frames"])
        .assert()
        .success()
        .stdout(contains("設定を保存しました"));

    let path = home.path().join(".config").join("qr-expiry").join("config.json");
    let content = std::fs::read_to_string(path).expect("設定ファイルがない");
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["source_dir"], "/tmp/qr-frames");
    assert_eq!(value["loop_frames"], true);

    cmd(home.path())
        .arg("--show-config")
        .assert()
        .success()
        .stdout(contains("/tmp/qr-frames"));
}
