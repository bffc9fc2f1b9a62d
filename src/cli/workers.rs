use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::settings::db_path;

pub fn add(name: &str, email: &str, locale: Option<&str>) -> Result<()> {
    let conn = get_connection(&db_path())?;
    conn.execute("INSERT INTO workers (name) VALUES (?1)", [name])?;
    let worker_id = conn.last_insert_rowid();
    conn.execute(
        "INSERT INTO worker_accounts (worker_id, worker_account_email, locale) VALUES (?1, ?2, ?3)",
        rusqlite::params![worker_id, email, locale],
    )?;
    println!("Added worker: {name} <{email}>");
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let mut stmt = conn.prepare(
        "SELECT w.id, w.name, w.status, a.worker_account_email, a.locale \
         FROM workers w LEFT JOIN worker_accounts a ON a.worker_id = w.id \
         ORDER BY w.id",
    )?;
    let rows: Vec<(i64, String, String, Option<String>, Option<String>)> = stmt
        .query_map([], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Status", "Email", "Locale"]);
    for (id, name, status, email, locale) in rows {
        table.add_row(vec![
            Cell::new(id),
            Cell::new(name),
            Cell::new(status),
            Cell::new(email.unwrap_or_default()),
            Cell::new(locale.unwrap_or_default()),
        ]);
    }
    println!("Workers\n{table}");
    Ok(())
}
