use image::RgbImage;

/// 画像上の座標（ピクセル）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// 映像ソースから取り出した1フレーム
#[derive(Debug, Clone)]
pub struct Frame {
    /// ソースを開いてからの通し番号（0始まり）
    pub sequence: u64,
    pub image: RgbImage,
}

impl Frame {
    pub fn new(sequence: u64, image: RgbImage) -> Self {
        Self { sequence, image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
