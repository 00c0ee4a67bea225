use std::io;
use std::process::ExitCode;
use std::thread;

use anyhow::{anyhow, Context};
use clap::Parser;
use qr_expiry::{cli, config, decoder, display, error, scan_loop, source};
use qr_expiry_common::{evaluate_payload, LatestSlot, ResultChannel, StopSignal};
use qr_expiry_desktop::{run_note_window, PreviewImage, WindowOptions};

use cli::Cli;
use config::Config;
use decoder::QrDecoder;
use scan_loop::ScanLoop;
use source::{open_source, Frame};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .filter(Some("wgpu"), log::LevelFilter::Warn)
        .filter(Some("winit"), log::LevelFilter::Warn)
        .filter(Some("eframe"), log::LevelFilter::Warn)
        .filter(Some("egui_glow"), log::LevelFilter::Warn)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    if let Some(payload) = &cli.payload {
        let result = evaluate_payload(payload);
        if cli.json {
            println!("{}", result.to_json()?);
        } else {
            for line in result.display_lines() {
                println!("{}", line);
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = Config::load().context("設定の読み込みに失敗しました")?;
    if let Some(source_dir) = cli.source {
        config.source_dir = Some(source_dir);
    }
    if let Some(index) = cli.camera {
        config.source_dir = None;
        config.camera_index = index;
    }
    if cli.loop_frames {
        config.loop_frames = true;
    }

    if cli.save_config {
        config.validate()?;
        config.save()?;
        println!("設定を保存しました: {}", Config::config_path()?.display());
        return Ok(ExitCode::SUCCESS);
    }

    let source_kind = config.source_kind();

    if cli.show_config {
        println!("設定:");
        println!("  パス: {}", Config::config_path()?.display());
        println!("  映像ソース: {}", source_kind);
        println!("  ループ再生: {}", config.loop_frames);
        println!("  フレーム間隔: {}ms", config.frame_interval_ms);
        println!("  更新間隔: {}ms", config.refresh_interval_ms);
        println!("  ウィンドウ: {}x{}", config.window_width, config.window_height);
        println!("  プレビュー: {}", if config.show_preview { "表示" } else { "非表示" });
        return Ok(ExitCode::SUCCESS);
    }

    let source = match open_source(&source_kind, config.frame_interval(), config.loop_frames) {
        Ok(source) => source,
        Err(err) => {
            log::error!("{}", err);
            println!("Error: Could not open camera.");
            return Ok(ExitCode::FAILURE);
        }
    };

    let results = ResultChannel::new();
    let preview: LatestSlot<PreviewImage> = LatestSlot::new();
    let quit = StopSignal::new();
    let stop = StopSignal::new();

    if cli.headless {
        // ウィンドウがないのでキー入力は標準入力から受ける
        println!("{}", display::HEADLESS_QUIT_HINT);
        display::watch_quit_line(io::BufReader::new(io::stdin()), quit.clone())
            .context("入力監視スレッドを起動できません")?;
    } else {
        println!("Press 'q' to quit.");
    }

    let show_preview = !cli.headless && config.show_preview;

    let mut scan = ScanLoop::new(source, QrDecoder, results.clone(), quit.clone());
    if show_preview {
        let preview = preview.clone();
        scan = scan.with_preview(move |frame: &Frame| {
            preview.publish(PreviewImage::from_rgb(
                frame.width(),
                frame.height(),
                frame.image.as_raw().clone(),
            ));
        });
    }

    let capture_stop = stop.clone();
    let capture = thread::Builder::new()
        .name("capture".into())
        .spawn(move || {
            let summary = scan.run();
            capture_stop.set();
            summary
        })
        .context("キャプチャスレッドを起動できません")?;

    let display_result = if cli.headless {
        let mut surface = display::TerminalSurface::stdout();
        display::run_polling(&mut surface, &results, &stop, config.refresh_interval());
        Ok(())
    } else {
        let options = WindowOptions {
            width: config.window_width,
            height: config.window_height,
            refresh_interval: config.refresh_interval(),
            show_preview,
            preview_interval: config.frame_interval(),
            ..Default::default()
        };
        run_note_window(options, results, preview, stop.clone(), quit.clone())
            .map_err(|e| error::ScannerError::Display(e.to_string()))
    };

    // ウィンドウが閉じられた場合もキャプチャを止める
    quit.set();
    let summary = capture
        .join()
        .map_err(|_| anyhow!("キャプチャスレッドが異常終了しました"))?;
    log::debug!("{:?}", summary);

    display_result?;
    Ok(ExitCode::SUCCESS)
}
