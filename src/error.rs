use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("映像ソースを開けません: {0}")]
    SourceUnavailable(String),

    #[error("フレーム取得エラー: {0}")]
    FrameRead(String),

    #[error("表示エラー: {0}")]
    Display(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScannerError>;
