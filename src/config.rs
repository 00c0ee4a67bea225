use crate::error::{Result, ScannerError};
use crate::source::SourceKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 映像ソースのフォルダを上書きする環境変数
pub const SOURCE_ENV: &str = "QR_EXPIRY_SOURCE";

/// カメラなしビルドでフォルダ未指定のときに使うフォルダ
pub const DEFAULT_FRAME_DIR: &str = "frames";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// フレーム画像のフォルダ（仮想カメラ）。未指定ならカメラを使う
    pub source_dir: Option<PathBuf>,
    /// `camera` フィーチャ有効時に開くデバイス番号
    pub camera_index: usize,
    /// 最後のフレームの後、先頭から再生し直す
    pub loop_frames: bool,
    pub frame_interval_ms: u64,
    /// 結果ウィンドウの更新間隔
    pub refresh_interval_ms: u64,
    pub window_width: f32,
    pub window_height: f32,
    /// 枠線付きフレームを別ウィンドウに表示
    pub show_preview: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: None,
            camera_index: 0,
            loop_frames: false,
            frame_interval_ms: 33,
            refresh_interval_ms: 500,
            window_width: 500.0,
            window_height: 250.0,
            show_preview: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let mut config = Self::load_from(&config_path)?;

        // 環境変数を優先
        if let Ok(dir) = std::env::var(SOURCE_ENV) {
            if !dir.is_empty() {
                config.source_dir = Some(PathBuf::from(dir));
            }
        }

        Ok(config)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ScannerError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("qr-expiry").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval_ms == 0 {
            return Err(ScannerError::Config("refresh_interval_ms は1以上にしてください".into()));
        }
        if self.window_width <= 0.0 || self.window_height <= 0.0 {
            return Err(ScannerError::Config("ウィンドウサイズが不正です".into()));
        }
        Ok(())
    }

    /// どの映像ソースを開くか決める
    pub fn source_kind(&self) -> SourceKind {
        match &self.source_dir {
            Some(dir) => SourceKind::Directory(dir.clone()),
            None if cfg!(feature = "camera") => SourceKind::Camera(self.camera_index),
            None => SourceKind::Directory(PathBuf::from(DEFAULT_FRAME_DIR)),
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}
