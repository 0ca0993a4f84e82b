use thiserror::Error;

#[derive(Error, Debug)]
pub enum FarmError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("CSVの読み込みに失敗しました。エンコーディングを確認してください")]
    Decode,

    #[error("作付けが見つかりません: ID {0}")]
    CycleNotFound(i64),

    #[error("作業記録が見つかりません: ID {0}")]
    WorkLogNotFound(i64),

    #[error("日付の形式が不正です: {0}（YYYY-MM-DD で指定してください）")]
    InvalidDate(String),

    #[error("データベースエラー: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("入力エラー: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FarmError>;
