//! 作付け (crop_cycles) のCRUD

use super::Database;
use crate::error::Result;
use crate::model::{CropCycle, DEFAULT_STATUS};
use rusqlite::{OptionalExtension, Row, ToSql};

/// 新規作付けの入力値
#[derive(Debug, Clone)]
pub struct NewCropCycle {
    pub crop_name: String,
    pub variety: Option<String>,
    pub field_id: Option<String>,
    pub row_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: String,
    pub yield_amount: Option<f64>,
    pub yield_unit: String,
    pub quality_rating: Option<String>,
    pub quality_note: Option<String>,
    pub comment: Option<String>,
}

impl Default for NewCropCycle {
    fn default() -> Self {
        Self {
            crop_name: String::new(),
            variety: None,
            field_id: None,
            row_id: None,
            start_date: None,
            end_date: None,
            status: DEFAULT_STATUS.to_string(),
            yield_amount: None,
            yield_unit: "kg".to_string(),
            quality_rating: None,
            quality_note: None,
            comment: None,
        }
    }
}

/// 作付け一覧の絞り込み条件（None は条件なし）
#[derive(Debug, Clone, Default)]
pub struct CycleFilter {
    pub status: Option<String>,
    /// 作物名の部分一致
    pub crop: Option<String>,
    pub field_id: Option<String>,
}

/// 作付け更新の入力値
///
/// `None` のフィールドは変更しない。テキスト項目は空文字列で NULL に
/// 戻せる。`yield_amount` は 0 で未記録（NULL）扱い。
#[derive(Debug, Clone, Default)]
pub struct CropCycleUpdate {
    pub crop_name: Option<String>,
    pub variety: Option<String>,
    pub field_id: Option<String>,
    pub row_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<String>,
    pub yield_amount: Option<f64>,
    pub yield_unit: Option<String>,
    pub quality_rating: Option<String>,
    pub quality_note: Option<String>,
    pub comment: Option<String>,
}

fn cycle_from_row(row: &Row<'_>) -> rusqlite::Result<CropCycle> {
    Ok(CropCycle {
        id: row.get("id")?,
        crop_name: row.get("crop_name")?,
        variety: row.get("variety")?,
        field_id: row.get("field_id")?,
        row_id: row.get("row_id")?,
        start_date: row.get("start_date")?,
        end_date: row.get("end_date")?,
        status: row.get("status")?,
        yield_amount: row.get("yield_amount")?,
        yield_unit: row.get("yield_unit")?,
        quality_rating: row.get("quality_rating")?,
        quality_note: row.get("quality_note")?,
        comment: row.get("comment")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// 空文字列を NULL に落とす
fn text_or_null(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl Database {
    /// 作付けを新規作成してIDを返す
    pub fn create_crop_cycle(&self, new: &NewCropCycle) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO crop_cycles
                (crop_name, variety, field_id, row_id,
                 start_date, end_date, status,
                 yield_amount, yield_unit,
                 quality_rating, quality_note, comment)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            rusqlite::params![
                new.crop_name,
                new.variety,
                new.field_id,
                new.row_id,
                new.start_date,
                new.end_date,
                new.status,
                new.yield_amount,
                new.yield_unit,
                new.quality_rating,
                new.quality_note,
                new.comment,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// 作付けを1件取得
    pub fn get_crop_cycle(&self, cycle_id: i64) -> Result<Option<CropCycle>> {
        let cycle = self
            .conn
            .query_row(
                "SELECT * FROM crop_cycles WHERE id = ?1",
                [cycle_id],
                cycle_from_row,
            )
            .optional()?;
        Ok(cycle)
    }

    /// 作付け一覧を取得（絞り込み付き）
    ///
    /// 開始日の新しい順。開始日未設定は先頭に来る。
    pub fn list_crop_cycles(&self, filter: &CycleFilter) -> Result<Vec<CropCycle>> {
        let mut sql = String::from("SELECT * FROM crop_cycles WHERE 1=1");
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(status) = &filter.status {
            sql.push_str(" AND status = ?");
            params.push(Box::new(status.clone()));
        }
        if let Some(crop) = &filter.crop {
            sql.push_str(" AND crop_name LIKE ?");
            params.push(Box::new(format!("%{crop}%")));
        }
        if let Some(field) = &filter.field_id {
            sql.push_str(" AND field_id = ?");
            params.push(Box::new(field.clone()));
        }

        sql.push_str(" ORDER BY COALESCE(start_date, '9999') DESC, id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let rows = stmt.query_map(&refs[..], cycle_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// 作付けを更新（指定フィールドのみ）。更新行数を返す
    pub fn update_crop_cycle(&self, cycle_id: i64, update: &CropCycleUpdate) -> Result<usize> {
        let mut sets: Vec<&str> = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(v) = &update.crop_name {
            sets.push("crop_name = ?");
            params.push(Box::new(v.clone()));
        }
        for (clause, value) in [
            ("variety = ?", &update.variety),
            ("field_id = ?", &update.field_id),
            ("row_id = ?", &update.row_id),
            ("start_date = ?", &update.start_date),
            ("end_date = ?", &update.end_date),
            ("quality_rating = ?", &update.quality_rating),
            ("quality_note = ?", &update.quality_note),
            ("comment = ?", &update.comment),
        ] {
            if let Some(v) = value {
                sets.push(clause);
                params.push(Box::new(text_or_null(v)));
            }
        }
        if let Some(status) = &update.status {
            sets.push("status = ?");
            params.push(Box::new(status.clone()));
        }
        if let Some(amount) = update.yield_amount {
            sets.push("yield_amount = ?");
            // 0 は未記録扱い
            params.push(Box::new(if amount > 0.0 { Some(amount) } else { None }));
        }
        if let Some(unit) = &update.yield_unit {
            sets.push("yield_unit = ?");
            params.push(Box::new(unit.clone()));
        }

        if sets.is_empty() {
            return Ok(0);
        }

        let sql = format!(
            "UPDATE crop_cycles SET {}, updated_at = datetime('now', 'localtime') WHERE id = ?",
            sets.join(", ")
        );
        params.push(Box::new(cycle_id));

        let refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        Ok(self.conn.execute(&sql, &refs[..])?)
    }

    /// 作付けを削除。削除行数を返す
    ///
    /// 紐づく作業記録は外部キーの ON DELETE SET NULL で未紐づけに戻る。
    pub fn delete_crop_cycle(&self, cycle_id: i64) -> Result<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM crop_cycles WHERE id = ?1", [cycle_id])?)
    }
}
