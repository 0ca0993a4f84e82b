use crate::importer::Candidate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "farm-records")]
#[command(about = "農作業記録簿 - 作付け・作業記録の管理とCSVインポート", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// データベースファイル（未指定なら設定ファイルに従う）
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// CSVファイルから作業記録をインポート
    Import {
        /// CSVファイルのパス（Shift-JIS / UTF-8 対応）
        #[arg(required = true)]
        file: PathBuf,

        /// 日付の列ラベル
        #[arg(long)]
        date_col: Option<String>,

        /// 作業種別の列ラベル
        #[arg(long)]
        type_col: Option<String>,

        /// 圃場IDの列ラベル
        #[arg(long)]
        field_col: Option<String>,

        /// 畝IDの列ラベル
        #[arg(long)]
        row_col: Option<String>,

        /// 内容の列ラベル
        #[arg(long)]
        content_col: Option<String>,

        /// 備考の列ラベル
        #[arg(long)]
        note_col: Option<String>,

        /// エンコーディング候補の試行順（カンマ区切り）
        #[arg(long, value_delimiter = ',')]
        encodings: Option<Vec<Candidate>>,

        /// 登録せずプレビューのみ
        #[arg(long)]
        dry_run: bool,
    },

    /// 作業記録の操作
    #[command(subcommand)]
    Log(LogCommands),

    /// 作付けの操作
    #[command(subcommand)]
    Cycle(CycleCommands),

    /// ダッシュボードを表示
    Dashboard,

    /// 作付けのタイムラインを表示
    Timeline {
        /// 作付けID
        cycle_id: i64,
    },

    /// 集計を表示
    #[command(subcommand)]
    Stats(StatsCommands),

    /// 設定の表示・変更
    Config {
        /// データベースファイルのパスを設定
        #[arg(long)]
        set_db_path: Option<PathBuf>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum LogCommands {
    /// 作業記録を追加
    Add {
        /// 作業日（YYYY-MM-DD、省略時は今日）
        #[arg(short, long)]
        date: Option<String>,

        /// 作業種別（省略時は一覧から選択）
        #[arg(short = 't', long)]
        work_type: Option<String>,

        /// 圃場ID（例: d01, hs01）
        #[arg(short, long)]
        field: Option<String>,

        /// 畝ID（例: 1, A）
        #[arg(short, long)]
        row: Option<String>,

        /// 作業内容
        #[arg(short, long)]
        content: Option<String>,

        /// 備考
        #[arg(short, long)]
        note: Option<String>,

        /// 紐づける作付けID
        #[arg(long)]
        cycle: Option<i64>,
    },

    /// 作業記録一覧を表示
    List {
        /// 開始日（YYYY-MM-DD）
        #[arg(long)]
        from: Option<String>,

        /// 終了日（YYYY-MM-DD）
        #[arg(long)]
        to: Option<String>,

        /// 作業種別で絞り込み
        #[arg(long)]
        work_type: Option<String>,

        /// 圃場IDで絞り込み
        #[arg(long)]
        field: Option<String>,

        /// 未紐づけの記録のみ
        #[arg(long)]
        unlinked: bool,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 作業記録を削除
    Delete {
        /// 作業記録ID
        id: i64,
    },

    /// 作業記録を作付けに紐づける
    Link {
        /// 作業記録ID
        id: i64,
        /// 作付けID
        cycle_id: i64,
    },

    /// 作業記録の紐づけを解除
    Unlink {
        /// 作業記録ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum CycleCommands {
    /// 作付けを登録
    Add {
        /// 作物名（例: トマト）
        crop_name: String,

        /// 品種（例: 桃太郎）
        #[arg(short, long)]
        variety: Option<String>,

        /// 圃場ID（例: d01）
        #[arg(short, long)]
        field: Option<String>,

        /// 畝ID（例: 1）
        #[arg(short, long)]
        row: Option<String>,

        /// 開始日（YYYY-MM-DD、省略時は今日）
        #[arg(short, long)]
        start: Option<String>,

        /// ステータス（計画中/進行中/完了）
        #[arg(long)]
        status: Option<String>,

        /// コメント
        #[arg(long)]
        comment: Option<String>,
    },

    /// 作付け一覧を表示
    List {
        /// ステータスで絞り込み
        #[arg(long)]
        status: Option<String>,

        /// 作物名で検索（部分一致）
        #[arg(long)]
        crop: Option<String>,

        /// 圃場IDで絞り込み
        #[arg(long)]
        field: Option<String>,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 作付けの詳細を表示
    Show {
        /// 作付けID
        id: i64,
    },

    /// 作付けを更新（指定した項目のみ。テキスト項目は空文字列でクリア）
    Update {
        /// 作付けID
        id: i64,

        #[arg(long)]
        crop_name: Option<String>,

        #[arg(long)]
        variety: Option<String>,

        #[arg(long)]
        field: Option<String>,

        #[arg(long)]
        row: Option<String>,

        /// 開始日（YYYY-MM-DD）
        #[arg(long)]
        start: Option<String>,

        /// 終了日（YYYY-MM-DD）
        #[arg(long)]
        end: Option<String>,

        /// ステータス（計画中/進行中/完了）
        #[arg(long)]
        status: Option<String>,

        /// 収量（0で未記録に戻す）
        #[arg(long)]
        yield_amount: Option<f64>,

        /// 収量の単位
        #[arg(long)]
        yield_unit: Option<String>,

        /// 品質評価（A/B/C）
        #[arg(long)]
        quality: Option<String>,

        /// 品質メモ
        #[arg(long)]
        quality_note: Option<String>,

        #[arg(long)]
        comment: Option<String>,
    },

    /// 作付けを削除（紐づく作業記録は未紐づけに戻る）
    Delete {
        /// 作付けID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum StatsCommands {
    /// 月別の作業件数
    Monthly,

    /// 作業種別ごとの件数
    Types,

    /// 作物別の収量集計
    Yield,
}
