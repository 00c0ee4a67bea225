use eframe::egui::{self, Color32, RichText};
use eframe::egui::{FontData, FontDefinitions, FontFamily};

use qr_expiry_common::{refresh_tick, DisplaySurface, LatestSlot, ResultChannel, ScanResult, StopSignal};

use crate::model::{NoteState, PreviewImage, WindowOptions};

const BACKGROUND: Color32 = Color32::from_rgb(0xf5, 0xf5, 0xf5);
const TITLE_COLOR: Color32 = Color32::from_rgb(0x33, 0x33, 0x33);
const DATA_COLOR: Color32 = Color32::from_rgb(0x55, 0x55, 0x55);
const RESULT_COLOR: Color32 = Color32::from_rgb(0xff, 0x57, 0x22);
const DURATION_COLOR: Color32 = Color32::from_rgb(0x00, 0x96, 0x88);
const WRAP_WIDTH: f32 = 480.0;

/// 最新のスキャン結果を表示する常に手前のウィンドウ
pub struct NoteWindow {
    state: NoteState,
    options: WindowOptions,
    results: ResultChannel,
    preview: LatestSlot<PreviewImage>,
    preview_texture: Option<egui::TextureHandle>,
    stop: StopSignal,
    quit: StopSignal,
}

impl NoteWindow {
    pub fn new(
        options: WindowOptions,
        results: ResultChannel,
        preview: LatestSlot<PreviewImage>,
        stop: StopSignal,
        quit: StopSignal,
    ) -> Self {
        Self {
            state: NoteState::default(),
            options,
            results,
            preview,
            preview_texture: None,
            stop,
            quit,
        }
    }

    /// 画面右端・上下中央へ移動（モニタサイズが分かった最初のフレームで1回）
    fn position_on_right_edge(&mut self, ctx: &egui::Context) {
        if self.state.positioned {
            return;
        }
        let Some(monitor) = ctx.input(|i| i.viewport().monitor_size) else {
            return;
        };
        let x = (monitor.x - self.options.width).max(0.0);
        let y = ((monitor.y - self.options.height) / 2.0).max(0.0);
        ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(x, y)));
        self.state.positioned = true;
    }

    fn handle_quit_key(&self, ctx: &egui::Context) {
        if ctx.input(|i| i.key_pressed(egui::Key::Q)) {
            self.quit.set();
        }
    }

    fn update_preview_texture(&mut self, ctx: &egui::Context) {
        let Some(image) = self.preview.try_take() else {
            return;
        };
        if image.is_empty() {
            return;
        }
        let color_image = egui::ColorImage::from_rgb(image.size, &image.pixels);
        match &mut self.preview_texture {
            Some(texture) => texture.set(color_image, egui::TextureOptions::default()),
            None => {
                self.preview_texture =
                    Some(ctx.load_texture("qr_scanner_preview", color_image, egui::TextureOptions::default()));
            }
        }
    }

    fn show_preview_viewport(&self, ctx: &egui::Context) {
        let texture = self.preview_texture.clone();
        let quit = self.quit.clone();
        ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("qr_scanner_preview"),
            egui::ViewportBuilder::default()
                .with_title("QR Code Scanner")
                .with_inner_size([640.0, 480.0]),
            move |ctx, _class| {
                egui::CentralPanel::default().show(ctx, |ui| match &texture {
                    Some(texture) => {
                        ui.add(egui::Image::new(texture).shrink_to_fit());
                    }
                    None => {
                        ui.label("Waiting for frames...");
                    }
                });
                if ctx.input(|i| i.key_pressed(egui::Key::Q)) {
                    quit.set();
                }
            },
        );
    }

    fn render_labels(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.set_max_width(WRAP_WIDTH);
            ui.add_space(10.0);
            ui.label(RichText::new("QR Code Results").size(18.0).strong().color(TITLE_COLOR));
            ui.add_space(5.0);
            ui.add(
                egui::Label::new(RichText::new(&self.state.qr_data_text).size(12.0).color(DATA_COLOR))
                    .wrap(true),
            );
            ui.add_space(5.0);
            ui.label(RichText::new(&self.state.result_text).size(14.0).strong().color(RESULT_COLOR));
            ui.add_space(5.0);
            ui.label(RichText::new(&self.state.duration_text).size(12.0).color(DURATION_COLOR));
        });
    }
}

impl DisplaySurface for NoteWindow {
    fn render(&mut self, result: &ScanResult) {
        let [data, status, duration] = result.display_lines();
        self.state.qr_data_text = data;
        self.state.result_text = status;
        self.state.duration_text = duration;
    }
}

pub fn configure_fonts(ctx: &egui::Context) {
    let mut fonts = FontDefinitions::default();
    let candidates = [
        r"C:\Windows\Fonts\meiryo.ttc",
        r"C:\Windows\Fonts\msgothic.ttc",
        "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
        "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    ];

    // QRデータに日本語が含まれても表示できるようにする
    for path in candidates {
        if let Ok(data) = std::fs::read(path) {
            fonts.font_data.insert("jp_fallback".to_string(), FontData::from_owned(data));
            fonts.families
                .entry(FontFamily::Proportional)
                .or_default()
                .push("jp_fallback".to_string());
            fonts.families
                .entry(FontFamily::Monospace)
                .or_default()
                .push("jp_fallback".to_string());
            ctx.set_fonts(fonts);
            return;
        }
    }
}

impl eframe::App for NoteWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.position_on_right_edge(ctx);
        self.handle_quit_key(ctx);

        if self.state.poll_due(self.options.refresh_interval) {
            let results = self.results.clone();
            refresh_tick(&results, self);
            // 停止後は次の更新を予約しない
            if self.stop.is_set() {
                log::debug!("停止要求を受けたので結果ウィンドウを閉じます");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                return;
            }
        }

        if self.options.show_preview {
            self.update_preview_texture(ctx);
            self.show_preview_viewport(ctx);
        }

        let frame = egui::Frame::none()
            .fill(BACKGROUND)
            .stroke(egui::Stroke::new(2.0, Color32::from_gray(200)))
            .inner_margin(egui::Margin::same(10.0));
        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            self.render_labels(ui);
        });

        let next = if self.options.show_preview {
            self.options.refresh_interval.min(self.options.preview_interval)
        } else {
            self.options.refresh_interval
        };
        ctx.request_repaint_after(next);
    }
}
