use anyhow::Context;
use clap::Parser;
use farm_records::cli::{Cli, Commands, CycleCommands, LogCommands, StatsCommands};
use farm_records::config::Config;
use farm_records::db::{
    CropCycleUpdate, CycleFilter, Database, NewCropCycle, NewWorkLog, WorkLogFilter,
};
use farm_records::error::{FarmError, Result};
use farm_records::importer::{self, ColumnMapping, DEFAULT_CANDIDATES};
use farm_records::model::{STATUS_OPTIONS, WORK_TYPES};
use farm_records::report;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load()?;

    // 設定コマンドはDBを開かずに処理する
    if let Commands::Config { set_db_path, show } = &cli.command {
        if let Some(path) = set_db_path {
            config.set_db_path(path.clone())?;
            println!("✔ データベースパスを設定しました: {}", path.display());
        }
        if *show || set_db_path.is_none() {
            println!("設定ファイル: {}", Config::config_path()?.display());
            println!(
                "データベース: {}",
                config.database_path(cli.db.as_ref()).display()
            );
        }
        return Ok(());
    }

    let db_path = config.database_path(cli.db.as_ref());
    let mut db = Database::open(&db_path)
        .with_context(|| format!("データベースを開けません: {}", db_path.display()))?;

    match cli.command {
        Commands::Import {
            file,
            date_col,
            type_col,
            field_col,
            row_col,
            content_col,
            note_col,
            encodings,
            dry_run,
        } => {
            println!("📥 CSVインポート\n");

            let candidates = encodings.as_deref().unwrap_or(DEFAULT_CANDIDATES);
            let table = importer::load_table(&file, candidates)?;
            println!(
                "✔ 読み込み完了　列数: {}　行数: {}",
                table.headers().len(),
                table.row_count()
            );

            let mapping = ColumnMapping {
                date: date_col,
                work_type: type_col,
                field_id: field_col,
                row_id: row_col,
                content: content_col,
                note: note_col,
            };
            // 列指定がなければ対話で対応づけ
            let mapping = if mapping.is_empty() {
                prompt_mapping(table.headers())?
            } else {
                mapping
            };

            let records = importer::normalize(&table, &mapping);
            if records.is_empty() {
                println!("インポートするレコードがありませんでした");
                return Ok(());
            }

            if dry_run {
                println!("\n📋 プレビュー（{} 件、登録なし）", records.len());
                for rec in records.iter().take(20) {
                    println!(
                        "  {}　[{}]　{}",
                        if rec.work_date.is_empty() {
                            "????-??-??"
                        } else {
                            &rec.work_date
                        },
                        rec.work_type,
                        rec.content.as_deref().unwrap_or("")
                    );
                }
                if records.len() > 20 {
                    println!("  ...他 {} 件", records.len() - 20);
                }
                return Ok(());
            }

            let count = db.import_records(&records)?;
            println!("\n✅ {count} 件の作業記録をインポートしました！");
        }

        Commands::Log(command) => run_log_command(&db, command)?,
        Commands::Cycle(command) => run_cycle_command(&db, command)?,

        Commands::Dashboard => report::print_dashboard(&db)?,

        Commands::Timeline { cycle_id } => report::print_timeline(&db, cycle_id)?,

        Commands::Stats(command) => match command {
            StatsCommands::Monthly => report::print_monthly_counts(&db)?,
            StatsCommands::Types => report::print_work_type_counts(&db)?,
            StatsCommands::Yield => report::print_yield_summary(&db)?,
        },

        Commands::Config { .. } => unreachable!(),
    }

    Ok(())
}

fn run_log_command(db: &Database, command: LogCommands) -> Result<()> {
    match command {
        LogCommands::Add {
            date,
            work_type,
            field,
            row,
            content,
            note,
            cycle,
        } => {
            let work_date = match date {
                Some(d) => validate_date(&d)?,
                None => today(),
            };
            let work_type = match work_type {
                Some(t) => t,
                None => prompt_work_type()?,
            };
            if let Some(cycle_id) = cycle {
                if db.get_crop_cycle(cycle_id)?.is_none() {
                    return Err(FarmError::CycleNotFound(cycle_id));
                }
            }

            let id = db.create_work_log(&NewWorkLog {
                work_date,
                work_type,
                cycle_id: cycle,
                field_id: field,
                row_id: row,
                content,
                note,
                ..Default::default()
            })?;
            println!("✅ 作業記録を登録しました（ID {id}）");
        }

        LogCommands::List {
            from,
            to,
            work_type,
            field,
            unlinked,
            json,
        } => {
            let logs = if unlinked {
                db.unlinked_work_logs()?
            } else {
                db.list_work_logs(&WorkLogFilter {
                    date_from: from,
                    date_to: to,
                    work_type,
                    field_id: field,
                    cycle_id: None,
                })?
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&logs)?);
            } else {
                report::print_logs(&logs);
            }
        }

        LogCommands::Delete { id } => {
            if db.delete_work_log(id)? == 0 {
                return Err(FarmError::WorkLogNotFound(id));
            }
            println!("🗑️ 作業記録 ID {id} を削除しました");
        }

        LogCommands::Link { id, cycle_id } => {
            if db.get_crop_cycle(cycle_id)?.is_none() {
                return Err(FarmError::CycleNotFound(cycle_id));
            }
            if db.link_work_log(id, cycle_id)? == 0 {
                return Err(FarmError::WorkLogNotFound(id));
            }
            println!("🔗 作業記録 ID {id} を作付け ID {cycle_id} に紐づけました");
        }

        LogCommands::Unlink { id } => {
            if db.unlink_work_log(id)? == 0 {
                return Err(FarmError::WorkLogNotFound(id));
            }
            println!("✔ 作業記録 ID {id} の紐づけを解除しました");
        }
    }
    Ok(())
}

fn run_cycle_command(db: &Database, command: CycleCommands) -> Result<()> {
    match command {
        CycleCommands::Add {
            crop_name,
            variety,
            field,
            row,
            start,
            status,
            comment,
        } => {
            let start_date = match start {
                Some(d) => validate_date(&d)?,
                None => today(),
            };
            let status = match status {
                Some(s) => validate_status(s)?,
                None => NewCropCycle::default().status,
            };

            let id = db.create_crop_cycle(&NewCropCycle {
                crop_name: crop_name.clone(),
                variety,
                field_id: field,
                row_id: row,
                start_date: Some(start_date),
                status,
                comment,
                ..Default::default()
            })?;
            println!("✅ 「{crop_name}」の作付けを登録しました（ID {id}）");
        }

        CycleCommands::List {
            status,
            crop,
            field,
            json,
        } => {
            let cycles = db.list_crop_cycles(&CycleFilter {
                status,
                crop,
                field_id: field,
            })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&cycles)?);
            } else {
                report::print_cycles(&cycles);
            }
        }

        CycleCommands::Show { id } => {
            let cycle = db
                .get_crop_cycle(id)?
                .ok_or(FarmError::CycleNotFound(id))?;
            report::print_cycle_detail(db, &cycle)?;
        }

        CycleCommands::Update {
            id,
            crop_name,
            variety,
            field,
            row,
            start,
            end,
            status,
            yield_amount,
            yield_unit,
            quality,
            quality_note,
            comment,
        } => {
            let start = start.map(|d| validate_date(&d)).transpose()?;
            let end = end
                .map(|d| {
                    // 空文字列は終了日クリア
                    if d.is_empty() {
                        Ok(d)
                    } else {
                        validate_date(&d)
                    }
                })
                .transpose()?;
            let status = status.map(validate_status).transpose()?;

            let changed = db.update_crop_cycle(
                id,
                &CropCycleUpdate {
                    crop_name,
                    variety,
                    field_id: field,
                    row_id: row,
                    start_date: start,
                    end_date: end,
                    status,
                    yield_amount,
                    yield_unit,
                    quality_rating: quality,
                    quality_note,
                    comment,
                },
            )?;
            if changed == 0 {
                return Err(FarmError::CycleNotFound(id));
            }
            println!("💾 作付け ID {id} を保存しました");
        }

        CycleCommands::Delete { id } => {
            if db.delete_crop_cycle(id)? == 0 {
                return Err(FarmError::CycleNotFound(id));
            }
            println!("🗑️ 作付け ID {id} を削除しました");
        }
    }
    Ok(())
}

/// 今日の日付（YYYY-MM-DD）
fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// CLIで受け取った日付の形式チェック
fn validate_date(date: &str) -> Result<String> {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| FarmError::InvalidDate(date.to_string()))?;
    Ok(date.to_string())
}

fn validate_status(status: String) -> Result<String> {
    if STATUS_OPTIONS.contains(&status.as_str()) {
        Ok(status)
    } else {
        Err(FarmError::Config(format!(
            "ステータスは {} のいずれかを指定してください",
            STATUS_OPTIONS.join("/")
        )))
    }
}

/// 列の対応づけを対話で決める
fn prompt_mapping(headers: &[String]) -> Result<ColumnMapping> {
    const NONE_LABEL: &str = "（なし）";

    let mut options: Vec<&str> = vec![NONE_LABEL];
    options.extend(headers.iter().map(String::as_str));

    let select = |name: &str, default: usize| -> Result<Option<String>> {
        let index = dialoguer::Select::new()
            .with_prompt(format!("{name}の列"))
            .items(&options)
            .default(default.min(options.len() - 1))
            .interact()?;
        if index == 0 {
            Ok(None)
        } else {
            Ok(Some(options[index].to_string()))
        }
    };

    Ok(ColumnMapping {
        date: select("日付", 1)?,
        work_type: select("作業種別", 2)?,
        field_id: select("圃場ID", 3)?,
        row_id: select("畝ID", 4)?,
        content: select("内容", 5)?,
        note: select("備考", 6)?,
    })
}

/// 作業種別を対話で選ぶ（手動入力も可）
fn prompt_work_type() -> Result<String> {
    const MANUAL_LABEL: &str = "（手動入力）";

    let mut options: Vec<&str> = WORK_TYPES.to_vec();
    options.push(MANUAL_LABEL);

    let index = dialoguer::Select::new()
        .with_prompt("作業種別")
        .items(&options)
        .default(0)
        .interact()?;

    if options[index] == MANUAL_LABEL {
        let input: String = dialoguer::Input::new()
            .with_prompt("作業種別を入力")
            .interact_text()?;
        Ok(input)
    } else {
        Ok(options[index].to_string())
    }
}
