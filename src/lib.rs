//! 農作業記録簿
//!
//! 作付け（植え付け〜収穫のライフサイクル）と作業記録を管理する
//! 単一ユーザー向けの記録システム。過去の記録CSV（混在エンコーディング・
//! 日付抜け・形式ゆれ）の取り込みに対応する。

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod importer;
pub mod model;
pub mod report;
