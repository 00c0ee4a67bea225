//! QR Expiry Common Library
//!
//! スキャンループと表示面（egui / ターミナル）で共有される中核ロジック:
//! 日付抽出、期限判定、最新値のみを保持するチャネル

pub mod types;
pub mod error;
pub mod extractor;
pub mod evaluator;
pub mod channel;
pub mod surface;

pub use types::{ExpiryStatus, RemainingDuration, ScanResult, UnavailableReason};
pub use error::{Error, Result};
pub use extractor::{extract_expiry_date, DateExtractor, DatePattern, FieldOrder};
pub use evaluator::{classify, classify_at, evaluate_payload, evaluate_payload_at, remaining, remaining_at};
pub use channel::{LatestSlot, ResultChannel, StopSignal};
pub use surface::{refresh_tick, DisplaySurface};
