//! 表示面の抽象
//!
//! 表示面は判定ロジックを持たず、チャネルから取り出した結果を描くだけ。

use crate::channel::ResultChannel;
use crate::types::ScanResult;

/// スキャン結果を描画する表示面
pub trait DisplaySurface {
    fn render(&mut self, result: &ScanResult);
}

/// 定期更新1回分: 新しい結果があれば描画して `true` を返す
pub fn refresh_tick<S: DisplaySurface + ?Sized>(channel: &ResultChannel, surface: &mut S) -> bool {
    match channel.try_take() {
        Some(result) => {
            surface.render(&result);
            true
        }
        None => false,
    }
}
