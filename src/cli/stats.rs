use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::settings::db_path;

pub fn list(month: Option<&str>, worker: Option<&str>, project: Option<&str>) -> Result<()> {
    let conn = get_connection(&db_path())?;

    let mut sql = String::from(
        "SELECT w.name, p.project_code, s.work_date, s.units_completed, s.hours_worked, \
                s.earnings, s.currency, s.locale \
         FROM work_stats s \
         JOIN workers w ON w.id = s.worker_id \
         JOIN projects p ON p.id = s.project_id",
    );
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<String> = Vec::new();

    if let Some(month) = month {
        clauses.push(format!("s.work_date LIKE ?{}", params.len() + 1));
        params.push(format!("{month}-%"));
    }
    if let Some(email) = worker {
        clauses.push(format!(
            "s.worker_id IN (SELECT worker_id FROM worker_accounts \
             WHERE lower(trim(worker_account_email)) = ?{})",
            params.len() + 1
        ));
        params.push(email.trim().to_lowercase());
    }
    if let Some(code) = project {
        clauses.push(format!("lower(p.project_code) = ?{}", params.len() + 1));
        params.push(code.trim().to_lowercase());
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY s.work_date, w.name");

    let mut stmt = conn.prepare(&sql)?;
    let rows: Vec<(String, String, String, f64, f64, Option<f64>, Option<String>, Option<String>)> =
        stmt.query_map(rusqlite::params_from_iter(params.iter()), |row| {
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
        "Worker", "Project", "Date", "Units", "Hours", "Earnings", "Locale",
    ]);
    let mut total_rows = 0usize;
    for (name, code, date, units, hours, earnings, currency, locale) in rows {
        let earned = match (earnings, currency.as_deref()) {
            (Some(amount), Some(code)) => money(amount, code),
            _ => "\u{2014}".to_string(),
        };
        table.add_row(vec![
            Cell::new(name),
            Cell::new(code),
            Cell::new(date),
            Cell::new(units),
            Cell::new(hours),
            Cell::new(earned),
            Cell::new(locale.unwrap_or_default()),
        ]);
        total_rows += 1;
    }
    println!("Work stats ({total_rows})\n{table}");
    Ok(())
}
