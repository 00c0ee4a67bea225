//! QRコードのデコード
//!
//! シンボル検出・復号は外部ライブラリ（rqrr）に任せる。

use crate::source::{Frame, Point};

/// 1フレームから検出されたシンボル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedSymbol {
    pub data: Vec<u8>,
    /// 外形の頂点（正常な検出なら4点）
    pub polygon: Vec<Point>,
}

impl DetectedSymbol {
    pub fn new(data: impl Into<Vec<u8>>, polygon: Vec<Point>) -> Self {
        Self {
            data: data.into(),
            polygon,
        }
    }

    /// UTF-8として読めればテキストを返す
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}

pub trait SymbolDecoder {
    fn decode(&self, frame: &Frame) -> Vec<DetectedSymbol>;
}

/// rqrr によるQRコードデコーダ
#[derive(Debug, Clone, Copy, Default)]
pub struct QrDecoder;

impl SymbolDecoder for QrDecoder {
    fn decode(&self, frame: &Frame) -> Vec<DetectedSymbol> {
        let gray = image::imageops::grayscale(&frame.image);
        let (width, height) = gray.dimensions();
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            width as usize,
            height as usize,
            |x, y| gray.get_pixel(x as u32, y as u32)[0],
        );

        prepared
            .detect_grids()
            .into_iter()
            .filter_map(|grid| {
                let mut data = Vec::new();
                match grid.decode_to(&mut data) {
                    Ok(_) => Some(DetectedSymbol {
                        data,
                        polygon: grid.bounds.iter().map(|p| Point::new(p.x, p.y)).collect(),
                    }),
                    Err(err) => {
                        log::debug!("フレーム{}: QRコードを復号できません: {}", frame.sequence, err);
                        None
                    }
                }
            })
            .collect()
    }
}
