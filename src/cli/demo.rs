use rusqlite::Connection;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::db_path;

struct DemoWorker {
    name: &'static str,
    email: &'static str,
    locale: Option<&'static str>,
}

const WORKERS: &[DemoWorker] = &[
    DemoWorker { name: "Ada Reyes", email: "worker1@example.com", locale: Some("es-mx") },
    DemoWorker { name: "Grace Okafor", email: "worker2@example.com", locale: Some("en") },
    DemoWorker { name: "Mei Tanaka", email: "worker3@example.com", locale: Some("ja") },
];

// (code, name, locale, rate_card)
const PROJECTS: &[(&str, &str, &str, &str)] = &[
    ("atlas", "Atlas Annotation", "en", "expert"),
    ("beacon", "Beacon Transcription", "en", "standard"),
];

// (locale, tier, per_unit, per_hour, currency, from)
const RATES: &[(&str, &str, f64, f64, &str, &str)] = &[
    ("es-419", "expert", 2.0, 15.0, "USD", "2025-01-01"),
    ("en-US", "expert", 2.4, 18.0, "USD", "2025-01-01"),
    ("en-US", "standard", 0.0, 12.5, "USD", "2025-01-01"),
    ("ja-JP", "expert", 310.0, 2300.0, "JPY", "2025-01-01"),
];

fn seed(conn: &Connection) -> Result<()> {
    for worker in WORKERS {
        conn.execute("INSERT INTO workers (name) VALUES (?1)", [worker.name])?;
        let worker_id = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO worker_accounts (worker_id, worker_account_email, locale) \
             VALUES (?1, ?2, ?3)",
            rusqlite::params![worker_id, worker.email, worker.locale],
        )?;
    }
    for (code, name, locale, rate_card) in PROJECTS {
        conn.execute(
            "INSERT INTO projects (project_code, name, locale, rate_card_id) \
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![code, name, locale, rate_card],
        )?;
    }
    for (locale, tier, per_unit, per_hour, currency, from) in RATES {
        conn.execute(
            "INSERT INTO rates_payable \
             (locale, expert_tier, rate_per_unit, rate_per_hour, currency, effective_from) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![locale, tier, per_unit, per_hour, currency, from],
        )?;
    }
    Ok(())
}

pub fn run() -> Result<()> {
    let path = db_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = get_connection(&path)?;
    init_db(&conn)?;

    let existing: i64 = conn.query_row("SELECT count(*) FROM workers", [], |r| r.get(0))?;
    if existing > 0 {
        println!("Database already has workers; demo data not loaded.");
        return Ok(());
    }

    seed(&conn)?;
    println!("Loaded demo data: {} workers, {} projects, {} rates.", WORKERS.len(), PROJECTS.len(), RATES.len());
    println!("Try `maestro template` then `maestro import stats-import-template.csv`.");
    Ok(())
}
