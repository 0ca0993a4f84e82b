//! SQLiteデータベース
//!
//! 作付け・作業記録の保存とCRUD、集計クエリを提供する。
//! スキーマ初期化は冪等で、既存DBには不足カラムだけを追加する。

mod cycles;
mod logs;
mod stats;

pub use cycles::{CropCycleUpdate, CycleFilter, NewCropCycle};
pub use logs::{NewWorkLog, WorkLogFilter, WorkLogUpdate};
pub use stats::{DashboardStats, MonthlyCount, WorkTypeCount, YieldSummary};

use crate::error::Result;
use rusqlite::Connection;
use std::path::Path;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS crop_cycles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    crop_name TEXT NOT NULL,
    variety TEXT,
    field_id TEXT,
    row_id TEXT,
    start_date TEXT,
    end_date TEXT,
    status TEXT DEFAULT '進行中' CHECK(status IN ('計画中', '進行中', '完了')),
    yield_amount REAL,
    yield_unit TEXT DEFAULT 'kg',
    quality_rating TEXT,
    quality_note TEXT,
    comment TEXT,
    created_at TEXT DEFAULT (datetime('now', 'localtime')),
    updated_at TEXT DEFAULT (datetime('now', 'localtime'))
);

CREATE TABLE IF NOT EXISTS work_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    cycle_id INTEGER REFERENCES crop_cycles(id) ON DELETE SET NULL,
    work_date TEXT NOT NULL,
    work_type TEXT NOT NULL,
    cell_pot TEXT,
    quantity TEXT,
    field_id TEXT,
    row_id TEXT,
    content TEXT,
    note TEXT,
    created_at TEXT DEFAULT (datetime('now', 'localtime'))
);
";

pub struct Database {
    conn: Connection,
}

impl Database {
    /// データベースファイルを開く（なければ作成）
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::init(Connection::open(path)?)
    }

    /// インメモリDBを開く（テスト用）
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA)?;

        // 旧バージョンのDBに後から増えたカラムを追加する。
        // 既にあれば ALTER は失敗するので無視する。
        for (name, ty) in [("cell_pot", "TEXT"), ("quantity", "TEXT")] {
            let _ = conn.execute(
                &format!("ALTER TABLE work_logs ADD COLUMN {name} {ty}"),
                [],
            );
        }

        Ok(Self { conn })
    }
}
