//! 結果ウィンドウ（egui）
//!
//! スキャンループとは `ResultChannel` と停止フラグだけでつながる。
//! eframe はメインスレッドで動かすこと。

mod app;
mod model;

pub use app::{configure_fonts, NoteWindow};
pub use model::{NoteState, PreviewImage, WindowOptions};

use qr_expiry_common::{LatestSlot, ResultChannel, StopSignal};

/// 結果ウィンドウを開き、閉じられるか `stop` が立つまでブロックする
pub fn run_note_window(
    options: WindowOptions,
    results: ResultChannel,
    preview: LatestSlot<PreviewImage>,
    stop: StopSignal,
    quit: StopSignal,
) -> eframe::Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(options.title.clone())
            .with_inner_size([options.width, options.height])
            .with_always_on_top(),
        ..Default::default()
    };

    let title = options.title.clone();
    eframe::run_native(
        &title,
        native_options,
        Box::new(move |cc| {
            configure_fonts(&cc.egui_ctx);
            Box::new(NoteWindow::new(options, results, preview, stop, quit))
        }),
    )
}
