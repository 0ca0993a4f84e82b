//! CSVインポート
//!
//! 過去の農作業記録CSV（混在エンコーディング・日付抜け・形式ゆれ）を
//! 正規化して作業記録として取り込む。
//!
//! ## 処理フロー
//! 1. エンコーディング自動判定（`encoding`）
//! 2. 列の対応づけ（ユーザー指定、`table::ColumnMapping`）
//! 3. 正規化（`normalize`）
//! 4. 保存（`db` に渡す）

pub mod encoding;
pub mod normalize;
pub mod table;

use crate::error::{FarmError, Result};
use std::path::Path;

pub use encoding::{resolve, resolve_with, Candidate, DEFAULT_CANDIDATES};
pub use normalize::normalize;
pub use table::{ColumnMapping, RawTable};

/// CSVファイルを読み込んでテーブルにする
pub fn load_table(path: &Path, candidates: &[Candidate]) -> Result<RawTable> {
    if !path.exists() {
        return Err(FarmError::FileNotFound(path.display().to_string()));
    }
    let raw = std::fs::read(path)?;
    resolve_with(&raw, candidates)
}
