//! レコード正規化
//!
//! 手書き日誌由来のCSVを作業記録のレコードに揃える。方針は「最大限
//! 救い出す」: 行単位の不備はエラーにせず、既定値・前行からの
//! 引き継ぎ・空行スキップで黙って処理する。
//!
//! - 日付は `YYYY-MM-DD` に統一。空欄・解釈不能な日付は前行の日付を
//!   引き継ぐ（先頭行なら空のまま）
//! - 作業種別の空欄は「その他」
//! - 日付も内容も空の行は捨てる

use crate::importer::table::{ColumnMapping, RawTable};
use crate::model::{WorkLogRecord, DEFAULT_WORK_TYPE};

/// 欠損セルが文字列化されたときの表記（スプレッドシート由来）
const NAN_SENTINEL: &str = "nan";

/// テーブル全体を正規化する
///
/// 行の不備で失敗することはない。対応づけられていない列や、テーブルに
/// 存在しないラベルはすべて空欄として扱う。
pub fn normalize(table: &RawTable, mapping: &ColumnMapping) -> Vec<WorkLogRecord> {
    let col = |label: &Option<String>| {
        label
            .as_deref()
            .and_then(|l| table.column_index(l))
    };
    let date_col = col(&mapping.date);
    let type_col = col(&mapping.work_type);
    let field_col = col(&mapping.field_id);
    let row_col = col(&mapping.row_id);
    let content_col = col(&mapping.content);
    let note_col = col(&mapping.note);

    let cell = |row: &[String], idx: Option<usize>| -> String {
        idx.and_then(|i| row.get(i))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };

    let mut records = Vec::new();
    let mut prev_date = String::new();

    for row in table.rows() {
        // 日付: 解釈できたら更新、できなければ前行の日付のまま
        let raw_date = cell(row, date_col);
        let work_date = convert_date(&raw_date, &prev_date);
        if !work_date.is_empty() {
            prev_date = work_date.clone();
        }

        // 作業種別: 空欄・nan は既定値
        let mut work_type = cell(row, type_col);
        if work_type.is_empty() || work_type == NAN_SENTINEL {
            work_type = DEFAULT_WORK_TYPE.to_string();
        }

        let field_id = cell_value(cell(row, field_col));
        let row_id = cell_value(cell(row, row_col));
        let content = cell_value(cell(row, content_col));
        let note = cell_value(cell(row, note_col));

        // 空行スキップ: 日付も内容もない行は情報を持たない
        if work_date.is_empty() && content.is_none() {
            continue;
        }

        records.push(WorkLogRecord {
            work_date,
            work_type,
            field_id,
            row_id,
            content,
            note,
        });
    }

    records
}

/// 日付文字列を `YYYY-MM-DD` に変換する
///
/// 優先順に試す:
/// 1. `Y/M/D`（年が100未満なら2000年代とみなす）
/// 2. ハイフン入り10文字はそのまま採用（暦の妥当性は見ない）
/// 3. 8桁数字は `YYYYMMDD` として読む
///
/// どれにも当てはまらない場合（空欄・nan・解釈不能）は `prev` を返す。
/// 解釈不能な非空文字列を空欄と同じ扱いにするのは意図した仕様で、
/// 引き継ぎ中の日付を消さない。
pub fn convert_date(raw: &str, prev: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() || raw == NAN_SENTINEL {
        return prev.to_string();
    }

    // Y/M/D 形式
    if raw.contains('/') {
        let parts: Vec<&str> = raw.split('/').collect();
        if parts.len() == 3 {
            let nums: Option<Vec<i32>> =
                parts.iter().map(|p| p.trim().parse::<i32>().ok()).collect();
            if let Some(nums) = nums {
                let (mut y, m, d) = (nums[0], nums[1], nums[2]);
                if y < 100 {
                    y += 2000;
                }
                return format!("{y:04}-{m:02}-{d:02}");
            }
        }
    }

    // YYYY-MM-DD 形式（そのまま）
    if raw.chars().count() == 10 && raw.contains('-') {
        return raw.to_string();
    }

    // YYYYMMDD 形式（8桁数字）
    if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
        return format!("{}-{}-{}", &raw[..4], &raw[4..6], &raw[6..8]);
    }

    prev.to_string()
}

/// セル値の欠損判定: 空欄・空白のみ・nan は `None`
fn cell_value(trimmed: String) -> Option<String> {
    if trimmed.is_empty() || trimmed == NAN_SENTINEL {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::table::RawTable;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn full_mapping() -> ColumnMapping {
        ColumnMapping {
            date: Some("日付".into()),
            work_type: Some("作業".into()),
            field_id: Some("圃場".into()),
            row_id: Some("畝".into()),
            content: Some("内容".into()),
            note: Some("備考".into()),
        }
    }

    #[test]
    fn test_convert_date_slash() {
        assert_eq!(convert_date("2024/1/5", ""), "2024-01-05");
        assert_eq!(convert_date("24/3/1", ""), "2024-03-01");
        assert_eq!(convert_date("99/12/31", ""), "2099-12-31");
    }

    #[test]
    fn test_convert_date_hyphen_passthrough() {
        assert_eq!(convert_date("2024-01-15", ""), "2024-01-15");
        // 暦としての妥当性は検証しない
        assert_eq!(convert_date("2024-13-99", ""), "2024-13-99");
    }

    #[test]
    fn test_convert_date_eight_digits() {
        assert_eq!(convert_date("20240115", ""), "2024-01-15");
    }

    #[test]
    fn test_convert_date_unparseable_inherits_prev() {
        assert_eq!(convert_date("", "2024-01-05"), "2024-01-05");
        assert_eq!(convert_date("nan", "2024-01-05"), "2024-01-05");
        assert_eq!(convert_date("覚えていない", "2024-01-05"), "2024-01-05");
        // 先頭行相当: 引き継ぎ元がなければ空のまま
        assert_eq!(convert_date("not-a-date", ""), "");
        // スラッシュ3分割でも数値でなければ引き継ぎに落ちる
        assert_eq!(convert_date("a/b/c", "2024-01-05"), "2024-01-05");
    }

    #[test]
    fn test_convert_date_canonical_is_fixed_point() {
        // 正規化出力をもう一度通しても変わらない
        for date in ["2024-01-05", "2024-03-01", "2024-12-31"] {
            assert_eq!(convert_date(date, ""), date);
        }
    }

    #[test]
    fn test_carry_forward_sequence() {
        let t = table(
            &["日付", "作業", "圃場", "畝", "内容", "備考"],
            &[
                &["2024-01-05", "播種", "", "", "a", ""],
                &["", "灌水", "", "", "b", ""],
                &["", "灌水", "", "", "c", ""],
                &["2024/02/10", "定植", "", "", "d", ""],
                &["", "灌水", "", "", "e", ""],
            ],
        );
        let records = normalize(&t, &full_mapping());
        let dates: Vec<&str> = records.iter().map(|r| r.work_date.as_str()).collect();
        assert_eq!(
            dates,
            vec![
                "2024-01-05",
                "2024-01-05",
                "2024-01-05",
                "2024-02-10",
                "2024-02-10"
            ]
        );
    }

    #[test]
    fn test_blank_work_type_defaults() {
        let t = table(
            &["日付", "作業", "圃場", "畝", "内容", "備考"],
            &[&["2024-01-05", "", "", "", "", ""]],
        );
        let records = normalize(&t, &full_mapping());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].work_type, "その他");
    }

    #[test]
    fn test_nan_fields_become_absent() {
        let t = table(
            &["日付", "作業", "圃場", "畝", "内容", "備考"],
            &[&["2024-01-05", "nan", "nan", "  ", "耕した", "nan"]],
        );
        let records = normalize(&t, &full_mapping());
        assert_eq!(records[0].work_type, "その他");
        assert_eq!(records[0].field_id, None);
        assert_eq!(records[0].row_id, None);
        assert_eq!(records[0].content.as_deref(), Some("耕した"));
        assert_eq!(records[0].note, None);
    }

    #[test]
    fn test_empty_rows_suppressed() {
        let t = table(
            &["日付", "作業", "圃場", "畝", "内容", "備考"],
            &[
                // 日付も内容もない → 捨てる（備考があっても）
                &["", "灌水", "d01", "1", "", "メモ"],
                // 日付なしでも内容があれば残す
                &["", "灌水", "", "", "水やり", ""],
            ],
        );
        let records = normalize(&t, &full_mapping());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].work_date, "");
        assert_eq!(records[0].content.as_deref(), Some("水やり"));
    }

    #[test]
    fn test_unparseable_first_row_suppressed() {
        let t = table(
            &["日付", "作業", "圃場", "畝", "内容", "備考"],
            &[&["not-a-date", "播種", "", "", "", ""]],
        );
        let records = normalize(&t, &full_mapping());
        assert!(records.is_empty());
    }

    #[test]
    fn test_unmapped_columns_treated_as_blank() {
        let t = table(&["日付", "内容"], &[&["2024-01-05", "収穫した"]]);
        let mapping = ColumnMapping {
            date: Some("日付".into()),
            content: Some("内容".into()),
            ..Default::default()
        };
        let records = normalize(&t, &mapping);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].work_type, "その他");
        assert_eq!(records[0].field_id, None);
    }

    #[test]
    fn test_mapped_label_missing_from_table() {
        // 対応づけたラベルがテーブルに存在しなくても空欄扱いで進む
        let t = table(&["内容"], &[&["間引き"]]);
        let mapping = ColumnMapping {
            date: Some("日付".into()),
            content: Some("内容".into()),
            ..Default::default()
        };
        let records = normalize(&t, &mapping);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].work_date, "");
    }

    #[test]
    fn test_idempotent_on_canonical_table() {
        let t = table(
            &["日付", "作業", "圃場", "畝", "内容", "備考"],
            &[
                &["2024-01-05", "播種", "d01", "1", "トマト播種", "セル"],
                &["2024-01-06", "灌水", "d01", "1", "朝のみ", ""],
            ],
        );
        let records = normalize(&t, &full_mapping());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].work_date, "2024-01-05");
        assert_eq!(records[0].work_type, "播種");
        assert_eq!(records[0].field_id.as_deref(), Some("d01"));
        assert_eq!(records[1].note, None);
    }
}
