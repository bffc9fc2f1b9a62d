use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::{MaestroError, Result};
use crate::settings::db_path;
use crate::stats::validation::is_valid_iso_date;

pub fn add(
    locale: &str,
    tier: Option<&str>,
    per_unit: f64,
    per_hour: f64,
    currency: &str,
    effective_from: &str,
    effective_to: Option<&str>,
) -> Result<()> {
    if !is_valid_iso_date(effective_from) {
        return Err(MaestroError::Other(format!(
            "--from must be YYYY-MM-DD, got '{effective_from}'"
        )));
    }
    if let Some(to) = effective_to {
        if !is_valid_iso_date(to) {
            return Err(MaestroError::Other(format!("--to must be YYYY-MM-DD, got '{to}'")));
        }
        if to < effective_from {
            return Err(MaestroError::Other(format!(
                "--to ({to}) precedes --from ({effective_from})"
            )));
        }
    }

    let conn = get_connection(&db_path())?;
    conn.execute(
        "INSERT INTO rates_payable \
         (locale, expert_tier, rate_per_unit, rate_per_hour, currency, effective_from, effective_to) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![locale, tier, per_unit, per_hour, currency, effective_from, effective_to],
    )?;
    println!("Added rate: {locale} / {}", tier.unwrap_or("(no tier)"));
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let mut stmt = conn.prepare(
        "SELECT id, locale, expert_tier, rate_per_unit, rate_per_hour, currency, \
                effective_from, effective_to \
         FROM rates_payable ORDER BY locale, expert_tier, effective_from",
    )?;
    let rows: Vec<(i64, String, Option<String>, f64, f64, String, String, Option<String>)> = stmt
        .query_map([], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut table = Table::new();
    table.set_header(vec![
        "ID", "Locale", "Tier", "Per Unit", "Per Hour", "Currency", "From", "To",
    ]);
    for (id, locale, tier, per_unit, per_hour, currency, from, to) in rows {
        table.add_row(vec![
            Cell::new(id),
            Cell::new(locale),
            Cell::new(tier.unwrap_or_default()),
            Cell::new(format!("{per_unit:.4}")),
            Cell::new(format!("{per_hour:.4}")),
            Cell::new(currency),
            Cell::new(from),
            Cell::new(to.unwrap_or_else(|| "open".to_string())),
        ]);
    }
    println!("Rates payable\n{table}");
    Ok(())
}
