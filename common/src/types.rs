//! 判定結果の型定義
//!
//! - ExpiryStatus: 期限切れかどうかの分類
//! - RemainingDuration: 期限までの残り日数
//! - ScanResult: 表示面に渡す最新のスキャン結果（テキスト3行）

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// 期限日の分類結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryStatus {
    NoDateFound,
    InvalidFormat,
    Expired,
    Valid,
}

impl fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpiryStatus::NoDateFound => write!(f, "No expiry date found in QR code."),
            ExpiryStatus::InvalidFormat => {
                write!(f, "Invalid date format found in QR code. Expected YYYY-MM-DD.")
            }
            ExpiryStatus::Expired => write!(f, "The product has expired."),
            ExpiryStatus::Valid => write!(f, "The product is still valid."),
        }
    }
}

/// 残り日数が計算できない理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    NoDateFound,
    InvalidFormat,
}

/// 期限までの残り期間
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemainingDuration {
    /// 残り日数（常に1以上）
    Days(i64),
    Today,
    AlreadyExpired,
    Unavailable(UnavailableReason),
}

impl fmt::Display for RemainingDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemainingDuration::Days(days) => write!(f, "{} day(s) remaining", days),
            RemainingDuration::Today => write!(f, "The product will expire today!"),
            RemainingDuration::AlreadyExpired => write!(f, "The product has already expired."),
            RemainingDuration::Unavailable(UnavailableReason::NoDateFound) => {
                write!(f, "No expiry date found.")
            }
            RemainingDuration::Unavailable(UnavailableReason::InvalidFormat) => {
                write!(f, "Invalid date format found.")
            }
        }
    }
}

/// 表示面に渡すスキャン結果
///
/// 新しいスキャンのたびに丸ごと置き換えられ、履歴は持たない。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// QRコードのデコード済みテキスト
    pub payload: String,
    /// 期限判定テキスト
    pub status: String,
    /// 残り期間テキスト
    pub duration: String,
}

impl ScanResult {
    pub fn new(payload: impl Into<String>, status: impl Into<String>, duration: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            status: status.into(),
            duration: duration.into(),
        }
    }

    /// 表示ラベル3行（データ、判定、残り期間）
    pub fn display_lines(&self) -> [String; 3] {
        [
            format!("QR Code Data: {}", self.payload),
            format!("Expiry Check: {}", self.status),
            format!("Duration: {}", self.duration),
        ]
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
