use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS workers (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'active',
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS worker_accounts (
    id INTEGER PRIMARY KEY,
    worker_id INTEGER NOT NULL,
    worker_account_email TEXT NOT NULL,
    locale TEXT,
    status TEXT NOT NULL DEFAULT 'active',
    created_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (worker_id) REFERENCES workers(id)
);

CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY,
    project_code TEXT NOT NULL UNIQUE,
    name TEXT,
    locale TEXT,
    rate_card_id TEXT,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS locale_mappings (
    id INTEGER PRIMARY KEY,
    client_locale TEXT NOT NULL UNIQUE,
    iso_locale TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS rates_payable (
    id INTEGER PRIMARY KEY,
    locale TEXT NOT NULL,
    expert_tier TEXT,
    rate_per_unit REAL NOT NULL DEFAULT 0,
    rate_per_hour REAL NOT NULL DEFAULT 0,
    currency TEXT NOT NULL,
    effective_from TEXT NOT NULL,
    effective_to TEXT,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS work_stats (
    id INTEGER PRIMARY KEY,
    worker_id INTEGER NOT NULL,
    project_id INTEGER NOT NULL,
    work_date TEXT NOT NULL,
    units_completed REAL NOT NULL,
    hours_worked REAL NOT NULL,
    currency TEXT,
    locale TEXT,
    earnings REAL,
    imported_at TEXT,
    FOREIGN KEY (worker_id) REFERENCES workers(id),
    FOREIGN KEY (project_id) REFERENCES projects(id),
    UNIQUE (worker_id, project_id, work_date)
);

CREATE TABLE IF NOT EXISTS imports (
    id INTEGER PRIMARY KEY,
    filename TEXT NOT NULL,
    checksum TEXT,
    record_count INTEGER,
    inserted INTEGER,
    skipped INTEGER,
    imported_at TEXT DEFAULT (datetime('now'))
);
";

// (client_locale, iso_locale) as client spellings appear in delivery exports
const DEFAULT_LOCALE_MAPPINGS: &[(&str, &str)] = &[
    ("en", "en-US"),
    ("en-us", "en-US"),
    ("en-gb", "en-GB"),
    ("es", "es-ES"),
    ("es-mx", "es-419"),
    ("es-latam", "es-419"),
    ("pt-br", "pt-BR"),
    ("fr", "fr-FR"),
    ("fr-ca", "fr-CA"),
    ("de", "de-DE"),
    ("ja", "ja-JP"),
    ("ko", "ko-KR"),
    ("zh-hans", "zh-CN"),
    ("zh-hant", "zh-TW"),
    ("hi", "hi-IN"),
];

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;

    let count: i64 = conn.query_row("SELECT count(*) FROM locale_mappings", [], |row| row.get(0))?;
    if count == 0 {
        for (client, iso) in DEFAULT_LOCALE_MAPPINGS {
            conn.execute(
                "INSERT INTO locale_mappings (client_locale, iso_locale) VALUES (?1, ?2)",
                rusqlite::params![client, iso],
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_init_db_creates_tables() {
        let (_dir, conn) = test_db();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        for expected in &[
            "workers",
            "worker_accounts",
            "projects",
            "locale_mappings",
            "rates_payable",
            "work_stats",
            "imports",
        ] {
            assert!(tables.contains(&expected.to_string()), "missing table: {expected}");
        }
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn).unwrap();
    }

    #[test]
    fn test_init_db_seeds_locale_mappings() {
        let (_dir, conn) = test_db();
        let count: i64 = conn
            .query_row("SELECT count(*) FROM locale_mappings", [], |r| r.get(0))
            .unwrap();
        assert!(count >= 15, "expected at least 15 locale mappings, got {count}");
        let iso: String = conn
            .query_row(
                "SELECT iso_locale FROM locale_mappings WHERE client_locale = 'es-mx'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(iso, "es-419");
    }

    #[test]
    fn test_work_stats_unique_key() {
        let (_dir, conn) = test_db();
        conn.execute("INSERT INTO workers (name) VALUES ('W')", []).unwrap();
        conn.execute(
            "INSERT INTO projects (project_code) VALUES ('atlas')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO work_stats (worker_id, project_id, work_date, units_completed, hours_worked) \
             VALUES (1, 1, '2025-11-10', 10, 2)",
            [],
        )
        .unwrap();
        let dup = conn.execute(
            "INSERT INTO work_stats (worker_id, project_id, work_date, units_completed, hours_worked) \
             VALUES (1, 1, '2025-11-10', 99, 9)",
            [],
        );
        assert!(dup.is_err(), "duplicate (worker, project, date) must be rejected");
    }
}
