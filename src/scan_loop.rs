//! キャプチャ → デコード → 判定 → チャネル書き込み のループ
//!
//! 1フレームごとに終了要求を確認する。フレーム取得の失敗は致命的で、
//! 再試行せずにループを抜ける。シンボル単位の失敗はログに残して次へ進む。

use qr_expiry_common::{evaluate_payload, ResultChannel, StopSignal};

use crate::annotate::{draw_closed_polygon, OUTLINE_COLOR, OUTLINE_THICKNESS};
use crate::decoder::SymbolDecoder;
use crate::source::{Frame, VideoSource};

/// 枠線付きフレームの受け取り先
pub type PreviewSink = Box<dyn FnMut(&Frame) + Send>;

/// ループを抜けた理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopExit {
    UserQuit,
    FrameReadFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    pub frames: u64,
    pub decode_events: u64,
    pub exit: LoopExit,
}

pub struct ScanLoop<S, D> {
    source: S,
    decoder: D,
    results: ResultChannel,
    quit: StopSignal,
    preview: Option<PreviewSink>,
}

impl<S: VideoSource, D: SymbolDecoder> ScanLoop<S, D> {
    /// `source` は開いた状態で渡すこと
    pub fn new(source: S, decoder: D, results: ResultChannel, quit: StopSignal) -> Self {
        Self {
            source,
            decoder,
            results,
            quit,
            preview: None,
        }
    }

    pub fn with_preview(mut self, sink: impl FnMut(&Frame) + Send + 'static) -> Self {
        self.preview = Some(Box::new(sink));
        self
    }

    /// 1フレーム分の処理。デコードできたシンボル数を返す
    pub fn process_frame(&self, frame: &mut Frame) -> usize {
        let mut events = 0;

        for symbol in self.decoder.decode(frame) {
            let Some(text) = symbol.text() else {
                log::warn!("フレーム{}: UTF-8でないQRデータをスキップ", frame.sequence);
                continue;
            };

            let result = evaluate_payload(text);
            log::debug!(
                "フレーム{}: {:?} → {} / {}",
                frame.sequence,
                result.payload,
                result.status,
                result.duration
            );
            self.results.publish(result);
            events += 1;

            if symbol.polygon.len() == 4 {
                draw_closed_polygon(&mut frame.image, &symbol.polygon, OUTLINE_COLOR, OUTLINE_THICKNESS);
            }
        }

        events
    }

    /// 終了要求かフレーム取得失敗までループし、ソースを解放する
    pub fn run(mut self) -> ScanSummary {
        let mut frames = 0;
        let mut decode_events = 0;

        let exit = loop {
            let mut frame = match self.source.read() {
                Ok(frame) => frame,
                Err(err) => {
                    println!("Failed to grab frame.");
                    log::warn!("{}", err);
                    break LoopExit::FrameReadFailed(err.to_string());
                }
            };

            frames += 1;
            decode_events += self.process_frame(&mut frame) as u64;

            if let Some(sink) = self.preview.as_mut() {
                sink(&frame);
            }

            if self.quit.is_set() {
                break LoopExit::UserQuit;
            }
        };

        self.source.release();
        log::info!(
            "スキャン終了: {}フレーム, {}件デコード ({:?})",
            frames,
            decode_events,
            exit
        );

        ScanSummary {
            frames,
            decode_events,
            exit,
        }
    }
}
