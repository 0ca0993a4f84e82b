//! 作業記録 (work_logs) のCRUDとCSV一括インポート

use super::Database;
use crate::error::Result;
use crate::model::{WorkLog, WorkLogRecord, DEFAULT_WORK_TYPE};
use rusqlite::{Row, ToSql};

/// 新規作業記録の入力値
#[derive(Debug, Clone, Default)]
pub struct NewWorkLog {
    pub work_date: String,
    pub work_type: String,
    pub cycle_id: Option<i64>,
    pub cell_pot: Option<String>,
    pub quantity: Option<String>,
    pub field_id: Option<String>,
    pub row_id: Option<String>,
    pub content: Option<String>,
    pub note: Option<String>,
}

/// 作業記録一覧の絞り込み条件（None は条件なし）
#[derive(Debug, Clone, Default)]
pub struct WorkLogFilter {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub work_type: Option<String>,
    pub field_id: Option<String>,
    pub cycle_id: Option<i64>,
}

/// 作業記録更新の入力値（None のフィールドは変更しない）
#[derive(Debug, Clone, Default)]
pub struct WorkLogUpdate {
    pub work_date: Option<String>,
    pub work_type: Option<String>,
    pub field_id: Option<String>,
    pub row_id: Option<String>,
    pub content: Option<String>,
    pub note: Option<String>,
}

/// work_logs 単独のクエリ用
fn log_from_row(row: &Row<'_>) -> rusqlite::Result<WorkLog> {
    Ok(WorkLog {
        id: row.get("id")?,
        cycle_id: row.get("cycle_id")?,
        work_date: row.get("work_date")?,
        work_type: row.get("work_type")?,
        cell_pot: row.get("cell_pot")?,
        quantity: row.get("quantity")?,
        field_id: row.get("field_id")?,
        row_id: row.get("row_id")?,
        content: row.get("content")?,
        note: row.get("note")?,
        created_at: row.get("created_at")?,
        crop_name: None,
        variety: None,
    })
}

/// crop_cycles をJOINしたクエリ用
fn log_with_crop_from_row(row: &Row<'_>) -> rusqlite::Result<WorkLog> {
    let mut log = log_from_row(row)?;
    log.crop_name = row.get("crop_name")?;
    log.variety = row.get("variety")?;
    Ok(log)
}

impl Database {
    /// 作業記録を新規作成してIDを返す
    pub fn create_work_log(&self, new: &NewWorkLog) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO work_logs (cycle_id, work_date, work_type, cell_pot, quantity,
                                    field_id, row_id, content, note)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                new.cycle_id,
                new.work_date,
                new.work_type,
                new.cell_pot,
                new.quantity,
                new.field_id,
                new.row_id,
                new.content,
                new.note,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// 作業記録一覧を取得（絞り込み付き、作付け名をJOIN、新しい順）
    pub fn list_work_logs(&self, filter: &WorkLogFilter) -> Result<Vec<WorkLog>> {
        let mut sql = String::from(
            "SELECT wl.*, cc.crop_name, cc.variety
             FROM work_logs wl
             LEFT JOIN crop_cycles cc ON wl.cycle_id = cc.id
             WHERE 1=1",
        );
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(from) = &filter.date_from {
            sql.push_str(" AND wl.work_date >= ?");
            params.push(Box::new(from.clone()));
        }
        if let Some(to) = &filter.date_to {
            sql.push_str(" AND wl.work_date <= ?");
            params.push(Box::new(to.clone()));
        }
        if let Some(work_type) = &filter.work_type {
            sql.push_str(" AND wl.work_type = ?");
            params.push(Box::new(work_type.clone()));
        }
        if let Some(field) = &filter.field_id {
            sql.push_str(" AND wl.field_id = ?");
            params.push(Box::new(field.clone()));
        }
        if let Some(cycle_id) = filter.cycle_id {
            sql.push_str(" AND wl.cycle_id = ?");
            params.push(Box::new(cycle_id));
        }

        sql.push_str(" ORDER BY wl.work_date DESC, wl.id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let rows = stmt.query_map(&refs[..], log_with_crop_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// 指定作付けの作業記録を時系列で取得
    pub fn work_logs_by_cycle(&self, cycle_id: i64) -> Result<Vec<WorkLog>> {
        let mut stmt = self.conn.prepare(
            "SELECT * FROM work_logs WHERE cycle_id = ?1
             ORDER BY work_date ASC, id ASC",
        )?;
        let rows = stmt.query_map([cycle_id], log_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// 最近の作業記録を取得
    pub fn recent_work_logs(&self, limit: usize) -> Result<Vec<WorkLog>> {
        let mut stmt = self.conn.prepare(
            "SELECT wl.*, cc.crop_name, cc.variety
             FROM work_logs wl
             LEFT JOIN crop_cycles cc ON wl.cycle_id = cc.id
             ORDER BY wl.work_date DESC, wl.id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit as i64], log_with_crop_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// 作付けに紐づいていない作業記録を取得
    pub fn unlinked_work_logs(&self) -> Result<Vec<WorkLog>> {
        let mut stmt = self.conn.prepare(
            "SELECT * FROM work_logs WHERE cycle_id IS NULL
             ORDER BY work_date DESC, id DESC",
        )?;
        let rows = stmt.query_map([], log_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// 作業記録を更新（指定フィールドのみ）。更新行数を返す
    pub fn update_work_log(&self, log_id: i64, update: &WorkLogUpdate) -> Result<usize> {
        let mut sets: Vec<&str> = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        for (clause, value) in [
            ("work_date = ?", &update.work_date),
            ("work_type = ?", &update.work_type),
            ("field_id = ?", &update.field_id),
            ("row_id = ?", &update.row_id),
            ("content = ?", &update.content),
            ("note = ?", &update.note),
        ] {
            if let Some(v) = value {
                sets.push(clause);
                params.push(Box::new(v.clone()));
            }
        }

        if sets.is_empty() {
            return Ok(0);
        }

        let sql = format!("UPDATE work_logs SET {} WHERE id = ?", sets.join(", "));
        params.push(Box::new(log_id));

        let refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        Ok(self.conn.execute(&sql, &refs[..])?)
    }

    /// 作業記録を削除。削除行数を返す
    pub fn delete_work_log(&self, log_id: i64) -> Result<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM work_logs WHERE id = ?1", [log_id])?)
    }

    /// 作業記録を作付けに紐づける
    pub fn link_work_log(&self, log_id: i64, cycle_id: i64) -> Result<usize> {
        Ok(self.conn.execute(
            "UPDATE work_logs SET cycle_id = ?1 WHERE id = ?2",
            rusqlite::params![cycle_id, log_id],
        )?)
    }

    /// 作業記録の作付け紐づけを解除
    pub fn unlink_work_log(&self, log_id: i64) -> Result<usize> {
        Ok(self.conn.execute(
            "UPDATE work_logs SET cycle_id = NULL WHERE id = ?1",
            [log_id],
        )?)
    }

    /// 正規化済みレコードを一括インポートして件数を返す
    ///
    /// 全件を1トランザクションで書き込む（途中失敗時は何も残さない）。
    pub fn import_records(&mut self, records: &[WorkLogRecord]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO work_logs
                    (work_date, work_type, field_id, row_id, content, note)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for rec in records {
                let work_type = if rec.work_type.is_empty() {
                    DEFAULT_WORK_TYPE
                } else {
                    &rec.work_type
                };
                stmt.execute(rusqlite::params![
                    rec.work_date,
                    work_type,
                    rec.field_id,
                    rec.row_id,
                    rec.content,
                    rec.note,
                ])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::NewCropCycle;

    fn sample_log(date: &str, work_type: &str) -> NewWorkLog {
        NewWorkLog {
            work_date: date.into(),
            work_type: work_type.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_list_delete() {
        let db = Database::open_in_memory().unwrap();
        let id = db
            .create_work_log(&NewWorkLog {
                field_id: Some("d01".into()),
                content: Some("トマト播種".into()),
                ..sample_log("2024-03-01", "播種")
            })
            .unwrap();

        let logs = db.list_work_logs(&WorkLogFilter::default()).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].id, id);
        assert_eq!(logs[0].work_type, "播種");
        assert_eq!(logs[0].crop_name, None);

        assert_eq!(db.delete_work_log(id).unwrap(), 1);
        assert_eq!(db.delete_work_log(id).unwrap(), 0);
    }

    #[test]
    fn test_filters() {
        let db = Database::open_in_memory().unwrap();
        db.create_work_log(&sample_log("2024-03-01", "播種")).unwrap();
        db.create_work_log(&NewWorkLog {
            field_id: Some("d01".into()),
            ..sample_log("2024-04-15", "灌水")
        })
        .unwrap();
        db.create_work_log(&sample_log("2024-05-20", "収穫")).unwrap();

        let by_range = db
            .list_work_logs(&WorkLogFilter {
                date_from: Some("2024-04-01".into()),
                date_to: Some("2024-04-30".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_range.len(), 1);
        assert_eq!(by_range[0].work_type, "灌水");

        let by_type = db
            .list_work_logs(&WorkLogFilter {
                work_type: Some("収穫".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_type.len(), 1);

        let by_field = db
            .list_work_logs(&WorkLogFilter {
                field_id: Some("d01".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_field.len(), 1);

        // 新しい順
        let all = db.list_work_logs(&WorkLogFilter::default()).unwrap();
        assert_eq!(all[0].work_date, "2024-05-20");
    }

    #[test]
    fn test_link_unlink_and_cycle_join() {
        let db = Database::open_in_memory().unwrap();
        let cycle_id = db
            .create_crop_cycle(&NewCropCycle {
                crop_name: "トマト".into(),
                ..Default::default()
            })
            .unwrap();
        let log_id = db.create_work_log(&sample_log("2024-03-01", "播種")).unwrap();

        assert_eq!(db.unlinked_work_logs().unwrap().len(), 1);

        db.link_work_log(log_id, cycle_id).unwrap();
        assert!(db.unlinked_work_logs().unwrap().is_empty());

        let by_cycle = db.work_logs_by_cycle(cycle_id).unwrap();
        assert_eq!(by_cycle.len(), 1);

        let joined = db.list_work_logs(&WorkLogFilter::default()).unwrap();
        assert_eq!(joined[0].crop_name.as_deref(), Some("トマト"));

        db.unlink_work_log(log_id).unwrap();
        assert_eq!(db.unlinked_work_logs().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_cycle_unlinks_logs() {
        let db = Database::open_in_memory().unwrap();
        let cycle_id = db
            .create_crop_cycle(&NewCropCycle {
                crop_name: "トマト".into(),
                ..Default::default()
            })
            .unwrap();
        let log_id = db
            .create_work_log(&NewWorkLog {
                cycle_id: Some(cycle_id),
                ..sample_log("2024-03-01", "播種")
            })
            .unwrap();

        db.delete_crop_cycle(cycle_id).unwrap();

        // ON DELETE SET NULL で記録自体は残る
        let logs = db.list_work_logs(&WorkLogFilter::default()).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].id, log_id);
        assert_eq!(logs[0].cycle_id, None);
    }

    #[test]
    fn test_update_work_log() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_work_log(&sample_log("2024-03-01", "播種")).unwrap();

        let changed = db
            .update_work_log(
                id,
                &WorkLogUpdate {
                    work_type: Some("定植".into()),
                    content: Some("第2畝へ".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(changed, 1);

        let logs = db.list_work_logs(&WorkLogFilter::default()).unwrap();
        assert_eq!(logs[0].work_type, "定植");
        assert_eq!(logs[0].content.as_deref(), Some("第2畝へ"));
    }

    #[test]
    fn test_import_records() {
        let mut db = Database::open_in_memory().unwrap();
        let records = vec![
            WorkLogRecord {
                work_date: "2024-01-05".into(),
                work_type: "播種".into(),
                field_id: Some("d01".into()),
                row_id: None,
                content: Some("トマト".into()),
                note: None,
            },
            WorkLogRecord {
                work_date: "".into(),
                work_type: "その他".into(),
                field_id: None,
                row_id: None,
                content: Some("日付不明の記録".into()),
                note: None,
            },
        ];
        let count = db.import_records(&records).unwrap();
        assert_eq!(count, 2);

        let logs = db.list_work_logs(&WorkLogFilter::default()).unwrap();
        assert_eq!(logs.len(), 2);
    }
}
