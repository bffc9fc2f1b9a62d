use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use rusqlite::Connection;

use crate::error::Result;
use crate::models::StatsRow;

use super::normalize_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationMessage {
    pub id: String,
    /// 1-based line number in the file, so index + 2 to account for the header.
    pub row: usize,
    pub level: Level,
    pub message: String,
}

#[derive(Debug)]
pub struct StatsValidationResult {
    pub messages: Vec<ValidationMessage>,
    pub is_valid: bool,
}

fn iso_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap())
}

pub fn is_positive_number(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Strict YYYY-MM-DD: the string must match the ISO shape and survive a
/// round trip through the date parser unchanged.
pub fn is_valid_iso_date(value: &str) -> bool {
    if !iso_date_re().is_match(value) {
        return false;
    }
    match chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => date.format("%Y-%m-%d").to_string() == value,
        Err(_) => false,
    }
}

fn dedup_normalized(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for value in values {
        if value.is_empty() {
            continue;
        }
        if seen.insert(value.clone()) {
            out.push(value);
        }
    }
    out
}

fn existing_worker_emails(conn: &Connection, emails: &[String]) -> Result<HashSet<String>> {
    if emails.is_empty() {
        return Ok(HashSet::new());
    }
    let placeholders = vec!["?"; emails.len()].join(", ");
    let sql = format!(
        "SELECT worker_account_email FROM worker_accounts \
         WHERE status = 'active' AND lower(trim(worker_account_email)) IN ({placeholders})"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(emails.iter()), |row| {
        row.get::<_, String>(0)
    })?;
    let mut set = HashSet::new();
    for row in rows {
        set.insert(normalize_key(&row?));
    }
    Ok(set)
}

fn existing_project_codes(conn: &Connection, codes: &[String]) -> Result<HashSet<String>> {
    if codes.is_empty() {
        return Ok(HashSet::new());
    }
    let placeholders = vec!["?"; codes.len()].join(", ");
    let sql = format!(
        "SELECT project_code FROM projects WHERE lower(trim(project_code)) IN ({placeholders})"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(codes.iter()), |row| {
        row.get::<_, String>(0)
    })?;
    let mut set = HashSet::new();
    for row in rows {
        set.insert(normalize_key(&row?));
    }
    Ok(set)
}

/// Validate parsed rows against static, cross-row and existence constraints.
/// Existence checks run as two batched queries over the deduplicated emails
/// and project codes, not per row. Store errors here abort the import.
pub fn validate_stats_rows(conn: &Connection, rows: &[StatsRow]) -> Result<StatsValidationResult> {
    let mut messages = Vec::new();

    let emails = dedup_normalized(rows.iter().map(|r| normalize_key(&r.worker_account_email)));
    let codes = dedup_normalized(rows.iter().map(|r| normalize_key(&r.project_code)));

    let valid_emails = existing_worker_emails(conn, &emails)?;
    let valid_projects = existing_project_codes(conn, &codes)?;

    for (index, row) in rows.iter().enumerate() {
        let row_number = index + 2;
        if row.worker_account_email.is_empty()
            || !valid_emails.contains(&normalize_key(&row.worker_account_email))
        {
            messages.push(ValidationMessage {
                id: format!("missing-email-{index}"),
                row: row_number,
                level: Level::Error,
                message: format!(
                    "Unknown worker_account_email \"{}\".",
                    row.worker_account_email
                ),
            });
        }
        if row.project_code.is_empty()
            || !valid_projects.contains(&normalize_key(&row.project_code))
        {
            messages.push(ValidationMessage {
                id: format!("missing-project-{index}"),
                row: row_number,
                level: Level::Error,
                message: format!("Unknown project_code \"{}\".", row.project_code),
            });
        }
        if !is_valid_iso_date(&row.work_date) {
            messages.push(ValidationMessage {
                id: format!("invalid-date-{index}"),
                row: row_number,
                level: Level::Error,
                message: "work_date must be a valid ISO date (YYYY-MM-DD).".to_string(),
            });
        }
        if !is_positive_number(row.units_completed) {
            messages.push(ValidationMessage {
                id: format!("invalid-units-{index}"),
                row: row_number,
                level: Level::Error,
                message: "units_completed must be a positive number.".to_string(),
            });
        }
        if !is_positive_number(row.hours_worked) {
            messages.push(ValidationMessage {
                id: format!("invalid-hours-{index}"),
                row: row_number,
                level: Level::Error,
                message: "hours_worked must be a positive number.".to_string(),
            });
        }
    }

    // Cross-row duplicates: one message per (email, project, date) group,
    // tagged with the lowest row number in the group.
    let mut seen: HashMap<String, Vec<usize>> = HashMap::new();
    let mut key_order: Vec<String> = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        let key = format!(
            "{}|{}|{}",
            normalize_key(&row.worker_account_email),
            normalize_key(&row.project_code),
            row.work_date
        );
        let entry = seen.entry(key.clone()).or_default();
        if entry.is_empty() {
            key_order.push(key);
        }
        entry.push(index);
    }
    for key in &key_order {
        let indices = &seen[key];
        if indices.len() > 1 {
            messages.push(ValidationMessage {
                id: format!("duplicate-{key}"),
                row: indices.iter().min().unwrap() + 2,
                level: Level::Error,
                message: "Duplicate record detected for worker, project, and date combination."
                    .to_string(),
            });
        }
    }

    let is_valid = messages.iter().all(|m| m.level != Level::Error);
    Ok(StatsValidationResult { messages, is_valid })
}
