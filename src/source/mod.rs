//! 映像ソース
//!
//! カメラ本体は外部の協力者として扱い、`VideoSource` で抽象化する。
//! `camera` フィーチャ有効時は V4L2 デバイスを直接開く。
//! フォルダ指定時はフォルダ内の画像を一定間隔で再生する仮想カメラを使う。

#[cfg(feature = "camera")]
mod camera;
mod frame;
mod pixel;

#[cfg(feature = "camera")]
pub use camera::CameraSource;
pub use frame::{Frame, Point};
pub use pixel::yuyv_to_rgb;

use crate::error::{Result, ScannerError};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

/// 開く・1フレーム読む・解放する、だけを持つ映像ソース
pub trait VideoSource {
    fn open(&mut self) -> Result<()>;

    fn is_opened(&self) -> bool;

    /// 次のフレームを読む。失敗したらスキャンループは終了する
    fn read(&mut self) -> Result<Frame>;

    fn release(&mut self);
}

impl<V: VideoSource + ?Sized> VideoSource for Box<V> {
    fn open(&mut self) -> Result<()> {
        (**self).open()
    }

    fn is_opened(&self) -> bool {
        (**self).is_opened()
    }

    fn read(&mut self) -> Result<Frame> {
        (**self).read()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// 開く映像ソースの種類
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// デバイス番号
    Camera(usize),
    Directory(PathBuf),
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Camera(index) => write!(f, "カメラ {}", index),
            SourceKind::Directory(dir) => write!(f, "{}", dir.display()),
        }
    }
}

/// 映像ソースを作って開く。開けなければ `SourceUnavailable`
pub fn open_source(
    kind: &SourceKind,
    interval: Duration,
    looping: bool,
) -> Result<Box<dyn VideoSource + Send>> {
    let mut source: Box<dyn VideoSource + Send> = match kind {
        SourceKind::Directory(dir) => Box::new(FrameDirectorySource::new(dir, interval, looping)),
        #[cfg(feature = "camera")]
        SourceKind::Camera(index) => Box::new(CameraSource::new(*index)),
        #[cfg(not(feature = "camera"))]
        SourceKind::Camera(index) => {
            return Err(ScannerError::SourceUnavailable(format!(
                "カメラ {} を使うには camera フィーチャを有効にしてビルドしてください",
                index
            )));
        }
    };
    source.open()?;
    Ok(source)
}

const FRAME_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "JPG", "JPEG", "PNG", "BMP"];

/// フォルダ直下のフレーム画像をファイル名順に列挙
pub fn list_frames(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(ScannerError::SourceUnavailable(format!(
            "フォルダが見つかりません: {}",
            folder.display()
        )));
    }

    let mut frames: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .map(|ext| FRAME_EXTENSIONS.iter().any(|&e| e == ext.to_string_lossy()))
                .unwrap_or(false)
        })
        .collect();

    // ファイル名でソート
    frames.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(frames)
}

/// フォルダの画像列を再生する仮想カメラ
#[derive(Debug)]
pub struct FrameDirectorySource {
    folder: PathBuf,
    frames: Vec<PathBuf>,
    cursor: usize,
    sequence: u64,
    looping: bool,
    interval: Duration,
    last_read: Option<Instant>,
    opened: bool,
}

impl FrameDirectorySource {
    pub fn new(folder: impl Into<PathBuf>, interval: Duration, looping: bool) -> Self {
        Self {
            folder: folder.into(),
            frames: Vec::new(),
            cursor: 0,
            sequence: 0,
            looping,
            interval,
            last_read: None,
            opened: false,
        }
    }

    /// カメラのフレーム周期に合わせて待つ
    fn pace(&mut self) {
        if let Some(last) = self.last_read {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                thread::sleep(self.interval - elapsed);
            }
        }
        self.last_read = Some(Instant::now());
    }
}

impl VideoSource for FrameDirectorySource {
    fn open(&mut self) -> Result<()> {
        let frames = list_frames(&self.folder)?;
        if frames.is_empty() {
            return Err(ScannerError::SourceUnavailable(format!(
                "フレーム画像がありません: {}",
                self.folder.display()
            )));
        }

        log::info!("{}枚のフレームを検出: {}", frames.len(), self.folder.display());
        self.frames = frames;
        self.cursor = 0;
        self.sequence = 0;
        self.last_read = None;
        self.opened = true;
        Ok(())
    }

    fn is_opened(&self) -> bool {
        self.opened
    }

    fn read(&mut self) -> Result<Frame> {
        if !self.opened {
            return Err(ScannerError::FrameRead("映像ソースが開かれていません".into()));
        }

        if self.cursor >= self.frames.len() {
            if !self.looping {
                return Err(ScannerError::FrameRead("フレームがもうありません".into()));
            }
            self.cursor = 0;
        }

        self.pace();

        let path = &self.frames[self.cursor];
        let image = image::open(path)
            .map_err(|e| ScannerError::FrameRead(format!("{}: {}", path.display(), e)))?
            .to_rgb8();

        let frame = Frame::new(self.sequence, image);
        self.cursor += 1;
        self.sequence += 1;
        Ok(frame)
    }

    fn release(&mut self) {
        self.opened = false;
        self.frames.clear();
        self.cursor = 0;
    }
}
