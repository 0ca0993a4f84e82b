//! 共通データ型
//!
//! 作付け・作業記録のレコード型と、アプリ全体で使う定数を定義する。

use serde::{Deserialize, Serialize};

/// 作業種別の既定リスト（手動入力も可）
pub const WORK_TYPES: &[&str] = &[
    "播種", "播種セル", "播種ポット", "育苗", "定植", "施肥", "基肥",
    "耕耘", "畝立て", "畝立てマルチ張り", "マルチ張り",
    "灌水", "除草", "防除", "摘果・摘花",
    "誘引・仕立て", "剪定・整枝",
    "収穫", "出荷・販売",
    "土作り", "圃場準備", "片付け",
    "観察・記録", "機械整備", "その他",
];

/// 作付けステータス
pub const STATUS_OPTIONS: &[&str] = &["計画中", "進行中", "完了"];

/// 新規作付けの既定ステータス
pub const DEFAULT_STATUS: &str = "進行中";

/// 作業種別が空欄のときの既定値
pub const DEFAULT_WORK_TYPE: &str = "その他";

/// 作付け（1回の植え付け〜収穫のライフサイクル）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropCycle {
    pub id: i64,
    pub crop_name: String,
    pub variety: Option<String>,
    pub field_id: Option<String>,
    pub row_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: String,
    pub yield_amount: Option<f64>,
    pub yield_unit: Option<String>,
    pub quality_rating: Option<String>,
    pub quality_note: Option<String>,
    pub comment: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// 作業記録（保存済みの1件）
///
/// `crop_name` / `variety` は作付けを JOIN したクエリでのみ埋まる。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkLog {
    pub id: i64,
    pub cycle_id: Option<i64>,
    pub work_date: String,
    pub work_type: String,
    pub cell_pot: Option<String>,
    pub quantity: Option<String>,
    pub field_id: Option<String>,
    pub row_id: Option<String>,
    pub content: Option<String>,
    pub note: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variety: Option<String>,
}

/// CSVインポートの正規化済みレコード
///
/// 正規化後に必ず成り立つこと:
/// - `work_date` は `YYYY-MM-DD` か空文字列
/// - `work_type` は非空（空欄は「その他」に置換済み）
/// - `work_date` と `content` の両方が空のレコードは存在しない
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkLogRecord {
    pub work_date: String,
    pub work_type: String,
    pub field_id: Option<String>,
    pub row_id: Option<String>,
    pub content: Option<String>,
    pub note: Option<String>,
}
