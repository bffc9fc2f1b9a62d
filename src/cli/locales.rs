use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::settings::db_path;

pub fn add(client: &str, iso: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    conn.execute(
        "INSERT INTO locale_mappings (client_locale, iso_locale) VALUES (?1, ?2) \
         ON CONFLICT (client_locale) DO UPDATE SET iso_locale = excluded.iso_locale",
        rusqlite::params![client.trim().to_lowercase(), iso],
    )?;
    println!("Mapped locale: {client} \u{2192} {iso}");
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let mut stmt = conn
        .prepare("SELECT client_locale, iso_locale FROM locale_mappings ORDER BY client_locale")?;
    let rows: Vec<(String, String)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut table = Table::new();
    table.set_header(vec!["Client Locale", "ISO Locale"]);
    for (client, iso) in rows {
        table.add_row(vec![Cell::new(client), Cell::new(iso)]);
    }
    println!("Locale mappings\n{table}");
    Ok(())
}
