use std::time::{Duration, Instant};

/// 結果ウィンドウの表示テキスト
#[derive(Debug, Clone, Default)]
pub struct NoteState {
    pub qr_data_text: String,
    pub result_text: String,
    pub duration_text: String,
    pub last_poll: Option<Instant>,
    pub positioned: bool,
}

impl NoteState {
    /// 前回の確認から `interval` 以上経っていれば確認時刻を更新して `true`
    pub fn poll_due(&mut self, interval: Duration) -> bool {
        let due = self.last_poll.is_none_or(|t| t.elapsed() >= interval);
        if due {
            self.last_poll = Some(Instant::now());
        }
        due
    }
}

/// ウィンドウの構成
#[derive(Debug, Clone)]
pub struct WindowOptions {
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub refresh_interval: Duration,
    pub show_preview: bool,
    pub preview_interval: Duration,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "QR Code Results".to_string(),
            width: 500.0,
            height: 250.0,
            refresh_interval: Duration::from_millis(500),
            show_preview: true,
            preview_interval: Duration::from_millis(33),
        }
    }
}

/// プレビュー用のRGB画素
#[derive(Clone)]
pub struct PreviewImage {
    pub size: [usize; 2],
    pub pixels: Vec<u8>,
}

impl PreviewImage {
    pub fn from_rgb(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            size: [width as usize, height as usize],
            pixels,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size[0] == 0 || self.size[1] == 0 || self.pixels.len() != self.size[0] * self.size[1] * 3
    }
}

impl std::fmt::Debug for PreviewImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewImage").field("size", &self.size).finish()
    }
}
