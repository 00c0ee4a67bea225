use clap::Parser;
use std::path::PathBuf;

/// 引数なしで起動すると設定ファイルの映像ソースからスキャンを始める
#[derive(Parser, Debug, Default)]
#[command(name = "qr-expiry")]
#[command(about = "QRコードの期限日を読み取り、有効期限と残り日数を表示する", long_about = None)]
pub struct Cli {
    /// フレーム画像のフォルダ（設定・環境変数より優先）
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// カメラのデバイス番号（camera フィーチャ有効時）
    #[arg(short, long, conflicts_with = "source")]
    pub camera: Option<usize>,

    /// 結果ウィンドウを開かず、ターミナルに表示
    #[arg(long)]
    pub headless: bool,

    /// 最後のフレームの後、先頭から再生し直す
    #[arg(long)]
    pub loop_frames: bool,

    /// ペイロード1件を評価して終了
    #[arg(short, long)]
    pub payload: Option<String>,

    /// --payload の結果をJSONで出力
    #[arg(long, requires = "payload")]
    pub json: bool,

    /// 設定を表示して終了
    #[arg(long)]
    pub show_config: bool,

    /// 現在の設定（引数の上書き込み）を設定ファイルに保存して終了
    #[arg(long)]
    pub save_config: bool,

    /// 詳細ログを出力
    #[arg(short, long)]
    pub verbose: bool,
}
