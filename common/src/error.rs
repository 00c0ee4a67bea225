//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
