//! スキャンの流れ全体のテスト
//!
//! フォルダの画像を仮想カメラとして読み、固定のデコーダでペイロードを返して
//! チャネル経由で表示面に届くまでを検証

use image::{Rgb, RgbImage};
use qr_expiry::decoder::{DetectedSymbol, SymbolDecoder};
use qr_expiry::display::{run_polling, TerminalSurface};
use qr_expiry::scan_loop::{LoopExit, ScanLoop};
use qr_expiry::source::{Frame, FrameDirectorySource, Point, VideoSource};
use qr_expiry_common::{LatestSlot, ResultChannel, StopSignal};
use std::path::Path;
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

/// フレーム番号ごとに決まったペイロードを返すデコーダ
struct ScriptedDecoder {
    payloads: Vec<&'static str>,
}

impl SymbolDecoder for ScriptedDecoder {
    fn decode(&self, frame: &Frame) -> Vec<DetectedSymbol> {
        match self.payloads.get(frame.sequence as usize) {
            Some(text) if !text.is_empty() => vec![DetectedSymbol::new(
                *text,
                vec![Point::new(1, 1), Point::new(6, 1), Point::new(6, 6), Point::new(1, 6)],
            )],
            _ => Vec::new(),
        }
    }
}

fn write_frames(dir: &Path, count: usize) {
    for i in 0..count {
        RgbImage::from_pixel(8, 8, Rgb([255, 255, 255]))
            .save(dir.join(format!("frame_{:03}.png", i)))
            .unwrap();
    }
}

fn open_source(dir: &Path) -> FrameDirectorySource {
    let mut source = FrameDirectorySource::new(dir, Duration::ZERO, false);
    source.open().expect("映像ソースを開けない");
    source
}

/// 最後にデコードされた結果だけが残る
#[test]
fn test_latest_result_wins() {
    let dir = tempdir().expect("Failed to create temp dir");
    write_frames(dir.path(), 3);

    let results = ResultChannel::new();
    let decoder = ScriptedDecoder {
        payloads: vec!["EXP 01/01/2000", "", "LOT123 EXP 2099-01-01"],
    };
    let summary = ScanLoop::new(open_source(dir.path()), decoder, results.clone(), StopSignal::new()).run();

    assert_eq!(summary.frames, 3);
    assert_eq!(summary.decode_events, 2);
    assert!(matches!(summary.exit, LoopExit::FrameReadFailed(_)));

    let latest = results.try_take().expect("結果があるはず");
    assert_eq!(latest.payload, "LOT123 EXP 2099-01-01");
    assert_eq!(latest.status, "The product is still valid.");
    assert!(latest.duration.ends_with("day(s) remaining"));
    assert!(results.try_take().is_none());
}

/// 日付のないペイロード
#[test]
fn test_payload_without_dates() {
    let dir = tempdir().expect("Failed to create temp dir");
    write_frames(dir.path(), 1);

    let results = ResultChannel::new();
    let decoder = ScriptedDecoder { payloads: vec!["no dates here"] };
    ScanLoop::new(open_source(dir.path()), decoder, results.clone(), StopSignal::new()).run();

    let latest = results.try_take().unwrap();
    assert_eq!(latest.status, "No expiry date found in QR code.");
    assert_eq!(latest.duration, "No expiry date found.");
}

/// プレビューには枠線付きのフレームが届く
#[test]
fn test_preview_receives_outlined_frames() {
    let dir = tempdir().expect("Failed to create temp dir");
    write_frames(dir.path(), 2);

    let preview: LatestSlot<Frame> = LatestSlot::new();
    let sink = preview.clone();
    let decoder = ScriptedDecoder { payloads: vec!["", "EXP 2099-01-01"] };
    ScanLoop::new(open_source(dir.path()), decoder, ResultChannel::new(), StopSignal::new())
        .with_preview(move |frame: &Frame| sink.publish(frame.clone()))
        .run();

    let frame = preview.try_take().expect("プレビューがあるはず");
    assert_eq!(frame.sequence, 1);
    assert_eq!(frame.image.get_pixel(3, 1), &Rgb([0, 255, 0]));
}

/// キャプチャと表示を別スレッドで動かし、停止フラグで両方が止まる
#[test]
fn test_capture_and_display_threads() {
    let dir = tempdir().expect("Failed to create temp dir");
    write_frames(dir.path(), 1);

    let mut source = FrameDirectorySource::new(dir.path(), Duration::from_millis(1), true);
    source.open().unwrap();

    let results = ResultChannel::new();
    let quit = StopSignal::new();
    let stop = StopSignal::new();

    let decoder = ScriptedDecoder { payloads: vec!["EXP 2099-01-01"; 1000] };
    let scan = ScanLoop::new(source, decoder, results.clone(), quit.clone());
    let capture_stop = stop.clone();
    let capture = thread::spawn(move || {
        let summary = scan.run();
        capture_stop.set();
        summary
    });

    let display_results = results.clone();
    let display_stop = stop.clone();
    let display = thread::spawn(move || {
        let mut surface = TerminalSurface::new(Vec::new());
        run_polling(&mut surface, &display_results, &display_stop, Duration::from_millis(5));
        String::from_utf8(surface.into_inner()).unwrap()
    });

    thread::sleep(Duration::from_millis(50));
    quit.set();

    let summary = capture.join().unwrap();
    assert_eq!(summary.exit, LoopExit::UserQuit);
    assert!(summary.frames >= 1);

    let output = display.join().unwrap();
    assert!(output.contains("QR Code Data: EXP 2099-01-01"));
}
