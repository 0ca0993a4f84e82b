//! デコード済みCSVの生テーブル表現

/// デコード済みのCSVテーブル
///
/// ヘッダ行と、セル文字列の行列をそのまま保持する。
/// 生成後は変更しない（正規化は別レコードを作って返す）。
#[derive(Debug, Clone)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 列ラベルから列番号を引く
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == label)
    }
}

/// 論理フィールド → CSV列ラベルの対応づけ
///
/// ユーザーがCLIフラグか対話プロンプトで指定する。`None` は「列なし」。
/// ここでは検証せず、存在しないラベルは正規化時に空欄として扱う。
#[derive(Debug, Clone, Default)]
pub struct ColumnMapping {
    pub date: Option<String>,
    pub work_type: Option<String>,
    pub field_id: Option<String>,
    pub row_id: Option<String>,
    pub content: Option<String>,
    pub note: Option<String>,
}

impl ColumnMapping {
    /// すべてのフィールドが未対応か
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.work_type.is_none()
            && self.field_id.is_none()
            && self.row_id.is_none()
            && self.content.is_none()
            && self.note.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index() {
        let table = RawTable::new(
            vec!["日付".into(), "作業".into()],
            vec![vec!["2024-01-05".into(), "播種".into()]],
        );
        assert_eq!(table.column_index("日付"), Some(0));
        assert_eq!(table.column_index("作業"), Some(1));
        assert_eq!(table.column_index("備考"), None);
    }

    #[test]
    fn test_mapping_is_empty() {
        assert!(ColumnMapping::default().is_empty());

        let mapping = ColumnMapping {
            date: Some("日付".into()),
            ..Default::default()
        };
        assert!(!mapping.is_empty());
    }
}
