use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "plant-disease")]
#[command(about = "植物の画像を解析サーバーに送信し、病害の診断結果を表示する", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像を1枚解析
    Analyze {
        /// 画像ファイルのパス
        #[arg(required = true)]
        image: PathBuf,

        /// 解析サーバーのベースURL（設定・環境変数より優先）
        #[arg(short, long)]
        endpoint: Option<String>,

        /// 結果をJSONで保存
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 表示形式 (text/json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// キャッシュを使用（同じ画像の再送信をスキップ）
        #[arg(long)]
        use_cache: bool,

        /// 処理済み画像を保存
        #[arg(long)]
        save_masked: Option<PathBuf>,
    },

    /// フォルダ内の画像をまとめて解析
    Batch {
        /// 画像フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// 出力JSONファイル（デフォルト: 入力フォルダ/plant-disease-results.json）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 解析サーバーのベースURL
        #[arg(short, long)]
        endpoint: Option<String>,

        /// キャッシュを使用
        #[arg(long)]
        use_cache: bool,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,
    },

    /// フォルダから対話的に画像を選んで解析
    Pick {
        /// 画像フォルダのパス
        #[arg(default_value = ".")]
        folder: PathBuf,

        /// 解析サーバーのベースURL
        #[arg(short, long)]
        endpoint: Option<String>,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 解析サーバーのベースURLを設定
        #[arg(long)]
        set_endpoint: Option<String>,

        /// タイムアウト秒数を設定（0でなし）
        #[arg(long)]
        set_timeout: Option<u64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// キャッシュ管理
    Cache {
        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// 対象フォルダ（省略時はカレント）
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
