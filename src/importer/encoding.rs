//! エンコーディング自動判定
//!
//! 過去の記録CSVは Shift-JIS / UTF-8 / BOM付きUTF-8 が混在しているため、
//! 候補エンコーディングを順に試し、最初にデコードとCSV解析の両方が
//! 通ったものを採用する。latin1 は任意のバイト列を受理するため、
//! 事実上「ほぼ何でも読む」フォールバックとして働く。

use crate::error::{FarmError, Result};
use crate::importer::table::RawTable;
use clap::ValueEnum;
use encoding_rs::{SHIFT_JIS, UTF_8, WINDOWS_1252};
use std::borrow::Cow;

/// 候補エンコーディング
///
/// cp932 と shift_jis はどちらも encoding_rs の SHIFT_JIS（Windows-31J）に
/// 対応する。順序は元データで多い順。
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Candidate {
    #[value(name = "cp932")]
    Cp932,
    #[value(name = "shift_jis")]
    ShiftJis,
    #[value(name = "utf-8")]
    Utf8,
    #[value(name = "utf-8-sig")]
    Utf8Sig,
    #[value(name = "latin1")]
    Latin1,
}

/// 既定の候補順
pub const DEFAULT_CANDIDATES: &[Candidate] = &[
    Candidate::Cp932,
    Candidate::ShiftJis,
    Candidate::Utf8,
    Candidate::Utf8Sig,
    Candidate::Latin1,
];

impl Candidate {
    /// バイト列をデコードする。デコードエラーがあれば `None`。
    ///
    /// BOM自動判定は使わない（BOMでUTF-8に化けると候補順の意味が
    /// なくなるため）。latin1 はエラーになり得ないので常に受理。
    fn decode(self, raw: &[u8]) -> Option<Cow<'_, str>> {
        match self {
            Candidate::Cp932 | Candidate::ShiftJis => {
                let (text, had_errors) = SHIFT_JIS.decode_without_bom_handling(raw);
                (!had_errors).then_some(text)
            }
            Candidate::Utf8 => {
                let (text, had_errors) = UTF_8.decode_without_bom_handling(raw);
                (!had_errors).then_some(text)
            }
            Candidate::Utf8Sig => {
                let (text, _, had_errors) = UTF_8.decode(raw);
                (!had_errors).then_some(text)
            }
            Candidate::Latin1 => {
                let (text, _) = WINDOWS_1252.decode_without_bom_handling(raw);
                Some(text)
            }
        }
    }
}

/// 生バイト列からテーブルを読み取る（既定の候補順）
pub fn resolve(raw: &[u8]) -> Result<RawTable> {
    resolve_with(raw, DEFAULT_CANDIDATES)
}

/// 候補順を指定してテーブルを読み取る
///
/// 最初にデコードとCSV解析の両方が通った候補を採用する。内容が
/// 意味的に正しいかは検証しない。全候補が失敗したときだけエラー。
pub fn resolve_with(raw: &[u8], candidates: &[Candidate]) -> Result<RawTable> {
    for candidate in candidates {
        let Some(text) = candidate.decode(raw) else {
            continue;
        };
        if let Ok(table) = parse_csv(&text) {
            return Ok(table);
        }
    }
    Err(FarmError::Decode)
}

/// デコード済みテキストをCSVとして解析する
fn parse_csv(text: &str) -> std::result::Result<RawTable, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable::new(headers, rows))
}
