//! QRコードの期限日スキャナ
//!
//! 映像ソースからフレームを読み、QRコードのテキストから期限日を取り出して
//! 最新の判定結果を表示面へ渡す。

pub mod annotate;
pub mod cli;
pub mod config;
pub mod decoder;
pub mod display;
pub mod error;
pub mod scan_loop;
pub mod source;
