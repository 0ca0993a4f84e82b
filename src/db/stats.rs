//! 統計・集計クエリ

use super::Database;
use crate::error::Result;
use serde::Serialize;

/// ダッシュボード用の統計
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_cycles: i64,
    pub active_cycles: i64,
    pub completed_cycles: i64,
    pub total_logs: i64,
    pub crop_types: i64,
}

/// 月別の作業件数
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyCount {
    /// `YYYY-MM`
    pub month: String,
    pub count: i64,
}

/// 作業種別ごとの件数
#[derive(Debug, Clone, Serialize)]
pub struct WorkTypeCount {
    pub work_type: String,
    pub count: i64,
}

/// 作物別の収量集計
#[derive(Debug, Clone, Serialize)]
pub struct YieldSummary {
    pub crop_name: String,
    pub variety: Option<String>,
    pub total_yield: f64,
    pub yield_unit: Option<String>,
    pub avg_yield: f64,
    pub count: i64,
}

impl Database {
    fn count(&self, sql: &str) -> Result<i64> {
        Ok(self.conn.query_row(sql, [], |row| row.get(0))?)
    }

    /// ダッシュボード用の統計を取得
    pub fn dashboard_stats(&self) -> Result<DashboardStats> {
        Ok(DashboardStats {
            total_cycles: self.count("SELECT COUNT(*) FROM crop_cycles")?,
            active_cycles: self
                .count("SELECT COUNT(*) FROM crop_cycles WHERE status = '進行中'")?,
            completed_cycles: self
                .count("SELECT COUNT(*) FROM crop_cycles WHERE status = '完了'")?,
            total_logs: self.count("SELECT COUNT(*) FROM work_logs")?,
            crop_types: self.count("SELECT COUNT(DISTINCT crop_name) FROM crop_cycles")?,
        })
    }

    /// 月別作業件数を取得（日付の入った記録のみ）
    pub fn monthly_work_counts(&self) -> Result<Vec<MonthlyCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT substr(work_date, 1, 7) as month, COUNT(*) as count
             FROM work_logs
             WHERE work_date IS NOT NULL AND work_date != ''
             GROUP BY month
             ORDER BY month",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(MonthlyCount {
                month: row.get("month")?,
                count: row.get("count")?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// 作業種別ごとの件数を取得（多い順）
    pub fn work_type_counts(&self) -> Result<Vec<WorkTypeCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT work_type, COUNT(*) as count
             FROM work_logs
             GROUP BY work_type
             ORDER BY count DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(WorkTypeCount {
                work_type: row.get("work_type")?,
                count: row.get("count")?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// 作物別の収量集計を取得（収量記録のある作付けのみ）
    pub fn yield_summary(&self) -> Result<Vec<YieldSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT crop_name, variety,
                    SUM(yield_amount) as total_yield,
                    yield_unit,
                    AVG(yield_amount) as avg_yield,
                    COUNT(*) as count
             FROM crop_cycles
             WHERE yield_amount IS NOT NULL AND yield_amount > 0
             GROUP BY crop_name, yield_unit
             ORDER BY total_yield DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(YieldSummary {
                crop_name: row.get("crop_name")?,
                variety: row.get("variety")?,
                total_yield: row.get("total_yield")?,
                yield_unit: row.get("yield_unit")?,
                avg_yield: row.get("avg_yield")?,
                count: row.get("count")?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn distinct(&self, sql: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// 登録済み圃場IDの一覧（作付け・作業記録の両方から）
    pub fn distinct_fields(&self) -> Result<Vec<String>> {
        self.distinct(
            "SELECT DISTINCT field_id FROM (
                 SELECT field_id FROM crop_cycles
                 WHERE field_id IS NOT NULL AND field_id != ''
                 UNION
                 SELECT field_id FROM work_logs
                 WHERE field_id IS NOT NULL AND field_id != ''
             ) ORDER BY field_id",
        )
    }

    /// 登録済み作物名の一覧
    pub fn distinct_crops(&self) -> Result<Vec<String>> {
        self.distinct(
            "SELECT DISTINCT crop_name FROM crop_cycles ORDER BY crop_name",
        )
    }

    /// 登録済み作業種別の一覧
    pub fn distinct_work_types(&self) -> Result<Vec<String>> {
        self.distinct(
            "SELECT DISTINCT work_type FROM work_logs ORDER BY work_type",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{CropCycleUpdate, NewCropCycle, NewWorkLog};

    fn seed(db: &Database) {
        for (crop, status, field) in [
            ("トマト", "進行中", "d01"),
            ("ナス", "完了", "d01"),
            ("キュウリ", "完了", "hs01"),
        ] {
            let id = db
                .create_crop_cycle(&NewCropCycle {
                    crop_name: crop.into(),
                    status: status.into(),
                    field_id: Some(field.into()),
                    ..Default::default()
                })
                .unwrap();
            if status == "完了" {
                db.update_crop_cycle(
                    id,
                    &CropCycleUpdate {
                        yield_amount: Some(10.0),
                        ..Default::default()
                    },
                )
                .unwrap();
            }
        }
        for (date, work_type) in [
            ("2024-03-01", "播種"),
            ("2024-03-15", "灌水"),
            ("2024-04-02", "灌水"),
            ("", "その他"),
        ] {
            db.create_work_log(&NewWorkLog {
                work_date: date.into(),
                work_type: work_type.into(),
                ..Default::default()
            })
            .unwrap();
        }
    }

    #[test]
    fn test_dashboard_stats() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);
        let stats = db.dashboard_stats().unwrap();
        assert_eq!(stats.total_cycles, 3);
        assert_eq!(stats.active_cycles, 1);
        assert_eq!(stats.completed_cycles, 2);
        assert_eq!(stats.total_logs, 4);
        assert_eq!(stats.crop_types, 3);
    }

    #[test]
    fn test_monthly_counts_exclude_blank_dates() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);
        let monthly = db.monthly_work_counts().unwrap();
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].month, "2024-03");
        assert_eq!(monthly[0].count, 2);
        assert_eq!(monthly[1].month, "2024-04");
    }

    #[test]
    fn test_work_type_counts_ordered() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);
        let counts = db.work_type_counts().unwrap();
        assert_eq!(counts[0].work_type, "灌水");
        assert_eq!(counts[0].count, 2);
    }

    #[test]
    fn test_yield_summary() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);
        let yields = db.yield_summary().unwrap();
        assert_eq!(yields.len(), 2);
        for y in &yields {
            assert_eq!(y.total_yield, 10.0);
            assert_eq!(y.count, 1);
        }
    }

    #[test]
    fn test_distinct_lookups() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);
        assert_eq!(db.distinct_fields().unwrap(), vec!["d01", "hs01"]);
        assert_eq!(
            db.distinct_crops().unwrap(),
            vec!["キュウリ", "トマト", "ナス"]
        );
        assert_eq!(db.distinct_work_types().unwrap().len(), 3);
    }
}
