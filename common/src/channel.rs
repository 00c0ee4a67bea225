//! 最新値のみを保持する1スロットのチャネル
//!
//! 書き込みは未読の値を無条件に置き換え、読み出しは値を取り出して空にする。
//! どちらも相手を待たない。履歴ではなく「最新の状態」を渡すためのもの。

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::types::ScanResult;

/// 生産者と消費者で共有する1スロットのバッファ
#[derive(Debug)]
pub struct LatestSlot<T> {
    slot: Arc<Mutex<Option<T>>>,
}

/// スキャンループから表示面へ結果を渡すチャネル
pub type ResultChannel = LatestSlot<ScanResult>;

impl<T> LatestSlot<T> {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// 値を書き込む。未読の値があれば捨てる
    pub fn publish(&self, value: T) {
        *self.slot.lock() = Some(value);
    }

    /// 値があれば取り出す。なければ `None`
    pub fn try_take(&self) -> Option<T> {
        self.slot.lock().take()
    }
}

impl<T> Clone for LatestSlot<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// 協調的な停止フラグ
///
/// 強制的な割り込みではなく、相手が次に確認したときに効く。
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    flag: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
