use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::format_bytes;
use crate::settings::{get_data_dir, load_settings};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = get_data_dir();
    let db_path = data_dir.join("maestro.db");

    println!("Data dir:        {}", data_dir.display());
    println!("Database:        {}", db_path.display());
    println!("Default locale:  {}", settings.default_locale);

    if db_path.exists() {
        let size = std::fs::metadata(&db_path)?.len();
        println!("DB size:         {}", format_bytes(size));

        let conn = get_connection(&db_path)?;
        let workers: i64 = conn.query_row("SELECT count(*) FROM workers", [], |r| r.get(0))?;
        let projects: i64 = conn.query_row("SELECT count(*) FROM projects", [], |r| r.get(0))?;
        let rates: i64 = conn.query_row("SELECT count(*) FROM rates_payable", [], |r| r.get(0))?;
        let mappings: i64 =
            conn.query_row("SELECT count(*) FROM locale_mappings", [], |r| r.get(0))?;
        let stats: i64 = conn.query_row("SELECT count(*) FROM work_stats", [], |r| r.get(0))?;
        let imports: i64 = conn.query_row("SELECT count(*) FROM imports", [], |r| r.get(0))?;

        println!();
        println!("Workers:          {workers}");
        println!("Projects:         {projects}");
        println!("Rates:            {rates}");
        println!("Locale mappings:  {mappings}");
        println!("Work stats:       {stats}");
        println!("Imports:          {imports}");
    } else {
        println!();
        println!("Database not found. Run `maestro init` to set up.");
    }

    Ok(())
}
