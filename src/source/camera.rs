//! V4L2 カメラ
//!
//! MJPG を優先して要求し、ドライバが受け付けなければ YUYV で受け取る。

use image::RgbImage;
use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;
use v4l::FourCC;

use super::{yuyv_to_rgb, Frame, VideoSource};
use crate::error::{Result, ScannerError};

const BUFFER_COUNT: u32 = 4;

/// `/dev/video{index}` から読むカメラ
pub struct CameraSource {
    index: usize,
    device: Option<Device>,
    stream: Option<Stream<'static>>,
    fourcc: FourCC,
    width: u32,
    height: u32,
    sequence: u64,
}

impl CameraSource {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            device: None,
            stream: None,
            fourcc: FourCC::new(b"MJPG"),
            width: 0,
            height: 0,
            sequence: 0,
        }
    }

    fn unavailable(&self, err: impl std::fmt::Display) -> ScannerError {
        ScannerError::SourceUnavailable(format!("/dev/video{}: {}", self.index, err))
    }

    fn to_image(&self, data: &[u8]) -> Result<RgbImage> {
        if self.fourcc == FourCC::new(b"MJPG") {
            image::load_from_memory(data)
                .map(|image| image.to_rgb8())
                .map_err(|e| ScannerError::FrameRead(format!("MJPGのデコードに失敗: {}", e)))
        } else {
            yuyv_to_rgb(self.width, self.height, data)
                .ok_or_else(|| ScannerError::FrameRead("YUYVバッファが短すぎます".into()))
        }
    }
}

impl VideoSource for CameraSource {
    fn open(&mut self) -> Result<()> {
        let device = Device::new(self.index).map_err(|e| self.unavailable(e))?;

        let mut format = device.format().map_err(|e| self.unavailable(e))?;
        format.fourcc = FourCC::new(b"MJPG");
        let mut format = device.set_format(&format).map_err(|e| self.unavailable(e))?;
        if format.fourcc != FourCC::new(b"MJPG") {
            format.fourcc = FourCC::new(b"YUYV");
            format = device.set_format(&format).map_err(|e| self.unavailable(e))?;
        }
        if format.fourcc != FourCC::new(b"MJPG") && format.fourcc != FourCC::new(b"YUYV") {
            return Err(self.unavailable(format!("未対応のピクセル形式 {}", format.fourcc)));
        }

        let stream = Stream::with_buffers(&device, Type::VideoCapture, BUFFER_COUNT)
            .map_err(|e| self.unavailable(e))?;

        log::info!(
            "カメラを開きました: /dev/video{} {}x{} {}",
            self.index,
            format.width,
            format.height,
            format.fourcc
        );
        self.fourcc = format.fourcc;
        self.width = format.width;
        self.height = format.height;
        self.sequence = 0;
        self.device = Some(device);
        self.stream = Some(stream);
        Ok(())
    }

    fn is_opened(&self) -> bool {
        self.device.is_some() && self.stream.is_some()
    }

    fn read(&mut self) -> Result<Frame> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| ScannerError::FrameRead("映像ソースが開かれていません".into()))?;

        let (data, meta) = stream
            .next()
            .map_err(|e| ScannerError::FrameRead(e.to_string()))?;
        let used = (meta.bytesused as usize).min(data.len());
        let data = data[..used].to_vec();

        let image = self.to_image(&data)?;
        let frame = Frame::new(self.sequence, image);
        self.sequence += 1;
        Ok(frame)
    }

    fn release(&mut self) {
        // ストリームを先に止める
        self.stream = None;
        self.device = None;
    }
}
