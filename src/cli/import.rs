use std::path::{Path, PathBuf};

use colored::Colorize;
use rusqlite::Connection;
use sha2::{Digest, Sha256};

use crate::db::get_connection;
use crate::error::Result;
use crate::settings::{db_path, load_settings};
use crate::stats::etl::{run_stats_import, StatsImportOptions, StatsImportResult};
use crate::stats::parser::parse_stats_csv;
use crate::stats::validation::{validate_stats_rows, Level, ValidationMessage};

fn compute_checksum(file_path: &Path) -> Result<String> {
    let data = std::fs::read(file_path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

fn is_duplicate_file(conn: &Connection, checksum: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT 1 FROM imports WHERE checksum = ?1")?;
    Ok(stmt.exists([checksum])?)
}

fn print_messages(messages: &[ValidationMessage]) {
    for msg in messages {
        let level = match msg.level {
            Level::Error => "error".red().bold(),
            Level::Warning => "warning".yellow().bold(),
        };
        println!("  row {:>4}  {level}  {}", msg.row, msg.message);
    }
}

fn print_summary(result: &StatsImportResult) {
    println!(
        "{} inserted, {} skipped, {} duplicates, {} failed",
        result.inserted.to_string().green(),
        result.skipped,
        result.duplicates,
        result.failed
    );
    for outcome in &result.batches {
        if let Some(err) = &outcome.first_error {
            println!("  batch of {}: {} ({err})", outcome.attempted, "insert failures".red());
        }
    }
}

pub fn run(
    file: &str,
    default_locale: Option<&str>,
    batch_size: Option<usize>,
    validate_only: bool,
) -> Result<()> {
    let file_path = PathBuf::from(file);
    let csv_text = std::fs::read_to_string(&file_path)?;
    let conn = get_connection(&db_path())?;

    let settings = load_settings();
    let mut options = StatsImportOptions {
        default_locale: settings.default_locale,
        ..Default::default()
    };
    if let Some(locale) = default_locale {
        options.default_locale = locale.to_string();
    }
    if let Some(size) = batch_size {
        options.batch_size = size;
    }

    if validate_only {
        let rows = parse_stats_csv(&csv_text)?;
        let validation = validate_stats_rows(&conn, &rows)?;
        print_messages(&validation.messages);
        if validation.is_valid {
            println!("{} rows ready to import.", rows.len());
        } else {
            println!("{}", "Validation failed; nothing was written.".red());
        }
        return Ok(());
    }

    let checksum = compute_checksum(&file_path)?;
    if is_duplicate_file(&conn, &checksum)? {
        println!("This file has already been imported (duplicate checksum).");
        return Ok(());
    }

    let result = run_stats_import(&conn, &csv_text, &options)?;
    print_messages(&result.messages);

    let has_errors = result.messages.iter().any(|m| m.level == Level::Error);
    if has_errors {
        println!("{}", "Import refused; nothing was written.".red());
        return Ok(());
    }

    print_summary(&result);

    let record_count = result.inserted + result.skipped + result.duplicates + result.failed;
    conn.execute(
        "INSERT INTO imports (filename, checksum, record_count, inserted, skipped) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            file_path.file_name().and_then(|n| n.to_str()).unwrap_or(""),
            checksum,
            record_count as i64,
            result.inserted as i64,
            result.skipped as i64,
        ],
    )?;
    Ok(())
}
