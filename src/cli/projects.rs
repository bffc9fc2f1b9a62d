use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::settings::db_path;

pub fn add(
    code: &str,
    name: Option<&str>,
    locale: Option<&str>,
    rate_card: Option<&str>,
) -> Result<()> {
    let conn = get_connection(&db_path())?;
    conn.execute(
        "INSERT INTO projects (project_code, name, locale, rate_card_id) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![code, name, locale, rate_card],
    )?;
    println!("Added project: {code}");
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let mut stmt = conn.prepare(
        "SELECT id, project_code, name, locale, rate_card_id FROM projects ORDER BY id",
    )?;
    let rows: Vec<(i64, String, Option<String>, Option<String>, Option<String>)> = stmt
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
    table.set_header(vec!["ID", "Code", "Name", "Locale", "Rate Card"]);
    for (id, code, name, locale, rate_card) in rows {
        table.add_row(vec![
            Cell::new(id),
            Cell::new(code),
            Cell::new(name.unwrap_or_default()),
            Cell::new(locale.unwrap_or_default()),
            Cell::new(rate_card.unwrap_or_default()),
        ]);
    }
    println!("Projects\n{table}");
    Ok(())
}
