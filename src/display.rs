//! ターミナル表示面（--headless）

use chrono::Local;
use qr_expiry_common::{refresh_tick, DisplaySurface, ResultChannel, ScanResult, StopSignal};
use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;

/// ターミナル表示中の終了方法
pub const HEADLESS_QUIT_HINT: &str = "Type 'q' and press Enter to quit.";

/// 新しい結果が届くたびに3行を書き出す表示面
pub struct TerminalSurface<W: Write> {
    out: W,
}

impl TerminalSurface<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_result(&mut self, result: &ScanResult) -> std::io::Result<()> {
        writeln!(self.out, "--- {} ---", Local::now().format("%H:%M:%S"))?;
        for line in result.display_lines() {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()
    }
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn render(&mut self, result: &ScanResult) {
        if let Err(err) = self.write_result(result) {
            log::warn!("結果を書き出せません: {}", err);
        }
    }
}

/// 一定間隔でチャネルを確認して描画する。
/// 停止フラグは各更新の後に確認し、立っていれば次を予約しない
pub fn run_polling<S: DisplaySurface + ?Sized>(
    surface: &mut S,
    results: &ResultChannel,
    stop: &StopSignal,
    interval: Duration,
) -> u64 {
    let mut rendered = 0;
    loop {
        if refresh_tick(results, surface) {
            rendered += 1;
        }
        if stop.is_set() {
            break;
        }
        thread::sleep(interval);
    }
    rendered
}

/// 入力に `q` だけの行が来たら終了要求を立てる。入力が閉じたら何もせず終わる
pub fn watch_quit_line<R>(input: R, quit: StopSignal) -> std::io::Result<thread::JoinHandle<()>>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new().name("quit-key".into()).spawn(move || {
        for line in input.lines() {
            let Ok(line) = line else {
                break;
            };
            if line.trim().eq_ignore_ascii_case("q") {
                log::debug!("終了キーを受け付けました");
                quit.set();
                break;
            }
        }
    })
}
