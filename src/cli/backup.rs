use std::path::PathBuf;

use rusqlite::backup::Backup;

use crate::db::get_connection;
use crate::error::{MaestroError, Result};
use crate::fmt::format_bytes;
use crate::settings::get_data_dir;

pub fn run(output: Option<String>) -> Result<()> {
    let data_dir = get_data_dir();
    let conn = get_connection(&data_dir.join("maestro.db"))?;

    let backups_dir = data_dir.join("backups");
    let dest_path = match output {
        Some(p) => PathBuf::from(p),
        None => {
            std::fs::create_dir_all(&backups_dir)?;
            let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
            backups_dir.join(format!("maestro-{stamp}.db"))
        }
    };
    if dest_path.exists() {
        return Err(MaestroError::Other(format!(
            "Refusing to overwrite {}",
            dest_path.display()
        )));
    }

    let mut dest_conn = rusqlite::Connection::open(&dest_path)?;
    let backup = Backup::new(&conn, &mut dest_conn)?;
    backup.run_to_completion(100, std::time::Duration::from_millis(10), None)?;

    let size = std::fs::metadata(&dest_path)?.len();
    println!("Backup saved to {} ({})", dest_path.display(), format_bytes(size));

    if backups_dir.exists() {
        let count = std::fs::read_dir(&backups_dir)?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "db"))
            .count();
        println!("{count} backup(s) in {}", backups_dir.display());
    }
    Ok(())
}
