//! 画面表示
//!
//! ダッシュボード・タイムライン・一覧・集計の端末出力。

use crate::db::Database;
use crate::error::{FarmError, Result};
use crate::model::{CropCycle, WorkLog};

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("―")
}

/// ダッシュボードを表示
pub fn print_dashboard(db: &Database) -> Result<()> {
    let stats = db.dashboard_stats()?;

    println!("📊 ダッシュボード\n");
    println!(
        "作付け総数: {}　進行中: {}　完了: {}　作業記録数: {}",
        stats.total_cycles, stats.active_cycles, stats.completed_cycles, stats.total_logs
    );

    println!("\n🌱 進行中の作付け");
    let active = db.list_crop_cycles(&crate::db::CycleFilter {
        status: Some("進行中".into()),
        ..Default::default()
    })?;
    if active.is_empty() {
        println!("  進行中の作付けはありません");
    } else {
        for cy in active.iter().take(10) {
            let logs = db.work_logs_by_cycle(cy.id)?;
            let last_work = logs
                .last()
                .map(|l| l.work_type.clone())
                .unwrap_or_else(|| "―".to_string());
            let variety = cy
                .variety
                .as_deref()
                .map(|v| format!("（{v}）"))
                .unwrap_or_default();
            println!(
                "  [{}] {}{}　📍 {}　開始: {}　作業数: {}件　最新: {}",
                cy.id,
                cy.crop_name,
                variety,
                opt(&cy.field_id),
                cy.start_date.as_deref().unwrap_or("未設定"),
                logs.len(),
                last_work
            );
        }
    }

    println!("\n📝 最近の作業");
    let recent = db.recent_work_logs(10)?;
    if recent.is_empty() {
        println!("  作業記録がありません");
    } else {
        for log in &recent {
            let crop = log
                .crop_name
                .as_deref()
                .map(|c| format!(" → {c}"))
                .unwrap_or_default();
            println!(
                "  {}　[{}]{}　{}",
                if log.work_date.is_empty() {
                    "????-??-??"
                } else {
                    &log.work_date
                },
                log.work_type,
                crop,
                log.content.as_deref().unwrap_or("")
            );
        }
    }

    Ok(())
}

/// 作付けのタイムラインを表示
pub fn print_timeline(db: &Database, cycle_id: i64) -> Result<()> {
    let cycle = db
        .get_crop_cycle(cycle_id)?
        .ok_or(FarmError::CycleNotFound(cycle_id))?;

    let variety = cycle
        .variety
        .as_deref()
        .map(|v| format!("（{v}）"))
        .unwrap_or_default();
    println!("🌱 {}{}", cycle.crop_name, variety);
    println!(
        "圃場: {}　畝: {}　ステータス: {}　期間: {} ～ {}",
        opt(&cycle.field_id),
        opt(&cycle.row_id),
        cycle.status,
        cycle.start_date.as_deref().unwrap_or("?"),
        cycle.end_date.as_deref().unwrap_or("継続中"),
    );
    if let Some(amount) = cycle.yield_amount {
        println!(
            "収量: {} {}　品質: {}　品質メモ: {}",
            amount,
            cycle.yield_unit.as_deref().unwrap_or("kg"),
            opt(&cycle.quality_rating),
            opt(&cycle.quality_note),
        );
    }
    if let Some(comment) = &cycle.comment {
        println!("💬 {comment}");
    }

    let logs = db.work_logs_by_cycle(cycle_id)?;
    if logs.is_empty() {
        println!("\nこの作付けにはまだ作業記録がありません");
        return Ok(());
    }

    println!("\n📋 作業記録: {} 件", logs.len());
    for log in &logs {
        println!("┃");
        println!(
            "┣━ {}  [{}]",
            if log.work_date.is_empty() {
                "????-??-??"
            } else {
                &log.work_date
            },
            log.work_type
        );
        if let Some(content) = &log.content {
            println!("┃    {content}");
        }
        if let Some(note) = &log.note {
            println!("┃    📌 {note}");
        }
    }

    Ok(())
}

/// 作付け一覧を表示
pub fn print_cycles(cycles: &[CropCycle]) {
    if cycles.is_empty() {
        println!("該当する作付けがありません");
        return;
    }
    println!("{} 件の作付け\n", cycles.len());
    for cy in cycles {
        let variety = cy
            .variety
            .as_deref()
            .map(|v| format!("（{v}）"))
            .unwrap_or_default();
        println!(
            "[{}] {}{}　📍 {}　｜　{} ～ {}　{}",
            cy.id,
            cy.crop_name,
            variety,
            opt(&cy.field_id),
            cy.start_date.as_deref().unwrap_or("?"),
            cy.end_date.as_deref().unwrap_or("継続中"),
            cy.status,
        );
    }
}

/// 作付けの詳細を表示
pub fn print_cycle_detail(db: &Database, cycle: &CropCycle) -> Result<()> {
    let variety = cycle
        .variety
        .as_deref()
        .map(|v| format!("（{v}）"))
        .unwrap_or_default();
    println!("🌱 [{}] {}{}", cycle.id, cycle.crop_name, variety);
    println!("  ステータス: {}", cycle.status);
    println!("  圃場: {}　畝: {}", opt(&cycle.field_id), opt(&cycle.row_id));
    println!(
        "  期間: {} ～ {}",
        cycle.start_date.as_deref().unwrap_or("?"),
        cycle.end_date.as_deref().unwrap_or("継続中"),
    );
    if let Some(amount) = cycle.yield_amount {
        println!(
            "  収量: {} {}　品質: {}",
            amount,
            cycle.yield_unit.as_deref().unwrap_or("kg"),
            opt(&cycle.quality_rating),
        );
    }
    if let Some(note) = &cycle.quality_note {
        println!("  品質メモ: {note}");
    }
    if let Some(comment) = &cycle.comment {
        println!("  コメント: {comment}");
    }

    let logs = db.work_logs_by_cycle(cycle.id)?;
    println!("  作業記録: {} 件", logs.len());
    Ok(())
}

/// 作業記録一覧を表示
pub fn print_logs(logs: &[WorkLog]) {
    if logs.is_empty() {
        println!("該当する作業記録がありません");
        return;
    }
    println!("{} 件の作業記録\n", logs.len());
    for log in logs {
        let crop = log
            .crop_name
            .as_deref()
            .map(|c| format!(" → {c}"))
            .unwrap_or_default();
        let field = log
            .field_id
            .as_deref()
            .map(|f| format!("　📍 {f}"))
            .unwrap_or_default();
        println!(
            "[{}] {}　[{}]{}{}　{}",
            log.id,
            if log.work_date.is_empty() {
                "????-??-??"
            } else {
                &log.work_date
            },
            log.work_type,
            crop,
            field,
            log.content.as_deref().unwrap_or(""),
        );
    }
}

/// 月別作業件数を表示
pub fn print_monthly_counts(db: &Database) -> Result<()> {
    let monthly = db.monthly_work_counts()?;
    if monthly.is_empty() {
        println!("データがありません");
        return Ok(());
    }
    println!("📊 月別作業件数\n");
    let max = monthly.iter().map(|m| m.count).max().unwrap_or(1).max(1);
    for m in &monthly {
        let width = (m.count * 40 / max) as usize;
        println!("{}  {:>4} {}", m.month, m.count, "■".repeat(width));
    }
    Ok(())
}

/// 作業種別ごとの件数を表示
pub fn print_work_type_counts(db: &Database) -> Result<()> {
    let counts = db.work_type_counts()?;
    if counts.is_empty() {
        println!("データがありません");
        return Ok(());
    }
    println!("🔧 作業種別の件数\n");
    let total: i64 = counts.iter().map(|c| c.count).sum();
    for c in &counts {
        println!(
            "{:<12}　{:>4} 件（{:.1}%）",
            c.work_type,
            c.count,
            c.count as f64 / total as f64 * 100.0
        );
    }
    Ok(())
}

/// 作物別の収量集計を表示
pub fn print_yield_summary(db: &Database) -> Result<()> {
    let yields = db.yield_summary()?;
    if yields.is_empty() {
        println!("収量データがありません");
        return Ok(());
    }
    println!("🌾 作物別 総収量\n");
    for y in &yields {
        println!(
            "{:<12}　総収量: {} {}　平均: {:.1}　作付け数: {}",
            y.crop_name,
            y.total_yield,
            y.yield_unit.as_deref().unwrap_or("kg"),
            y.avg_yield,
            y.count,
        );
    }
    Ok(())
}
