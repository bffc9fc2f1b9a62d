use std::collections::{HashMap, HashSet};

use chrono::{SecondsFormat, Utc};
use rusqlite::Connection;

use crate::error::Result;
use crate::models::{NewWorkStat, Project, RatePayable, WorkerAccount};

use super::normalize_key;
use super::parser::parse_stats_csv;
use super::rates::{calculate_earnings, find_rate, resolve_locale};
use super::validation::{validate_stats_rows, Level, ValidationMessage};

#[derive(Debug, Clone)]
pub struct StatsImportOptions {
    /// Fallback locale when neither worker nor project locale has a mapping.
    pub default_locale: String,
    /// Rows per insert batch.
    pub batch_size: usize,
}

impl Default for StatsImportOptions {
    fn default() -> Self {
        Self {
            default_locale: "en-US".to_string(),
            batch_size: 50,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub attempted: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub failed: usize,
    pub first_error: Option<String>,
}

#[derive(Debug, Default)]
pub struct StatsImportResult {
    /// Rows confirmed written, never an assumed count.
    pub inserted: usize,
    /// Rows whose worker or project could not be resolved.
    pub skipped: usize,
    /// Rows suppressed by the (worker, project, date) unique key.
    pub duplicates: usize,
    /// Rows the store rejected during insert.
    pub failed: usize,
    pub batches: Vec<BatchOutcome>,
    pub messages: Vec<ValidationMessage>,
}

impl StatsImportResult {
    fn refused(total_rows: usize, messages: Vec<ValidationMessage>) -> Self {
        Self {
            inserted: 0,
            skipped: total_rows,
            messages,
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Reference-data lookups, batched over deduplicated keys
// ---------------------------------------------------------------------------

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

fn fetch_worker_accounts(
    conn: &Connection,
    emails: &[String],
) -> Result<HashMap<String, WorkerAccount>> {
    if emails.is_empty() {
        return Ok(HashMap::new());
    }
    let placeholders = vec!["?"; emails.len()].join(", ");
    let sql = format!(
        "SELECT worker_id, worker_account_email, locale FROM worker_accounts \
         WHERE status = 'active' AND lower(trim(worker_account_email)) IN ({placeholders})"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(emails.iter()), |row| {
        Ok(WorkerAccount {
            worker_id: row.get(0)?,
            worker_account_email: row.get(1)?,
            locale: row.get(2)?,
        })
    })?;
    let mut map = HashMap::new();
    for row in rows {
        let account = row?;
        map.insert(normalize_key(&account.worker_account_email), account);
    }
    Ok(map)
}

fn fetch_projects(conn: &Connection, codes: &[String]) -> Result<HashMap<String, Project>> {
    if codes.is_empty() {
        return Ok(HashMap::new());
    }
    let placeholders = vec!["?"; codes.len()].join(", ");
    let sql = format!(
        "SELECT id, project_code, locale, rate_card_id FROM projects \
         WHERE lower(trim(project_code)) IN ({placeholders})"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(codes.iter()), |row| {
        Ok(Project {
            id: row.get(0)?,
            project_code: row.get(1)?,
            locale: row.get(2)?,
            rate_card_id: row.get(3)?,
        })
    })?;
    let mut map = HashMap::new();
    for row in rows {
        let project = row?;
        map.insert(normalize_key(&project.project_code), project);
    }
    Ok(map)
}

fn fetch_locale_mappings(conn: &Connection) -> Result<HashMap<String, String>> {
    let mut stmt = conn.prepare("SELECT client_locale, iso_locale FROM locale_mappings")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;
    let mut map = HashMap::new();
    for row in rows {
        let (client, iso) = row?;
        map.insert(normalize_key(&client), iso);
    }
    Ok(map)
}

fn fetch_rates_payable(conn: &Connection) -> Result<Vec<RatePayable>> {
    let mut stmt = conn.prepare(
        "SELECT id, locale, expert_tier, rate_per_unit, rate_per_hour, currency, \
                effective_from, effective_to \
         FROM rates_payable",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(RatePayable {
            id: row.get(0)?,
            locale: row.get(1)?,
            expert_tier: row.get(2)?,
            rate_per_unit: row.get(3)?,
            rate_per_hour: row.get(4)?,
            currency: row.get(5)?,
            effective_from: row.get(6)?,
            effective_to: row.get(7)?,
        })
    })?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Into::into)
}

// ---------------------------------------------------------------------------
// Batch writer
// ---------------------------------------------------------------------------

struct BatchWriter<'a> {
    conn: &'a Connection,
    batch_size: usize,
    buf: Vec<NewWorkStat>,
    outcomes: Vec<BatchOutcome>,
}

impl<'a> BatchWriter<'a> {
    fn new(conn: &'a Connection, batch_size: usize) -> Self {
        Self {
            conn,
            batch_size: batch_size.max(1),
            buf: Vec::new(),
            outcomes: Vec::new(),
        }
    }

    fn push(&mut self, record: NewWorkStat) {
        self.buf.push(record);
        if self.buf.len() >= self.batch_size {
            self.flush();
        }
    }

    // One transaction per batch. The unique key on (worker, project, date)
    // is the sole duplicate signal: a conflicting row is suppressed and
    // counted, and a failed row is recorded without aborting the rest of
    // the batch or any later batch. Only confirmed writes count as inserted.
    fn flush(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let rows: Vec<NewWorkStat> = self.buf.drain(..).collect();
        let mut outcome = BatchOutcome {
            attempted: rows.len(),
            ..Default::default()
        };

        let tx = match self.conn.unchecked_transaction() {
            Ok(tx) => tx,
            Err(e) => {
                outcome.failed = outcome.attempted;
                outcome.first_error = Some(e.to_string());
                self.outcomes.push(outcome);
                return;
            }
        };
        for row in &rows {
            let result = tx.execute(
                "INSERT INTO work_stats \
                 (worker_id, project_id, work_date, units_completed, hours_worked, \
                  currency, locale, earnings, imported_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) \
                 ON CONFLICT (worker_id, project_id, work_date) DO NOTHING",
                rusqlite::params![
                    row.worker_id,
                    row.project_id,
                    row.work_date,
                    row.units_completed,
                    row.hours_worked,
                    row.currency,
                    row.locale,
                    row.earnings,
                    row.imported_at,
                ],
            );
            match result {
                Ok(1) => outcome.inserted += 1,
                Ok(_) => outcome.duplicates += 1,
                Err(e) => {
                    outcome.failed += 1;
                    if outcome.first_error.is_none() {
                        outcome.first_error = Some(e.to_string());
                    }
                }
            }
        }
        if let Err(e) = tx.commit() {
            outcome.failed = outcome.attempted;
            outcome.inserted = 0;
            outcome.duplicates = 0;
            outcome.first_error = Some(e.to_string());
        }
        self.outcomes.push(outcome);
    }

    fn finish(mut self) -> Vec<BatchOutcome> {
        self.flush();
        self.outcomes
    }
}

// ---------------------------------------------------------------------------
// run_stats_import
// ---------------------------------------------------------------------------

pub fn run_stats_import(
    conn: &Connection,
    csv_text: &str,
    options: &StatsImportOptions,
) -> Result<StatsImportResult> {
    let parsed_rows = parse_stats_csv(csv_text)?;
    let validation = validate_stats_rows(conn, &parsed_rows)?;
    if !validation.is_valid {
        return Ok(StatsImportResult::refused(parsed_rows.len(), validation.messages));
    }
    let mut messages = validation.messages;

    let unique_emails =
        dedup_normalized(parsed_rows.iter().map(|r| normalize_key(&r.worker_account_email)));
    let unique_codes =
        dedup_normalized(parsed_rows.iter().map(|r| normalize_key(&r.project_code)));

    let worker_map = fetch_worker_accounts(conn, &unique_emails)?;
    let project_map = fetch_projects(conn, &unique_codes)?;
    let locale_mappings = fetch_locale_mappings(conn)?;
    let rates = fetch_rates_payable(conn)?;

    let imported_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    // Resolution pass. Rows that lost their worker or project between
    // validation and now are skipped, not failed. Writes only begin after
    // every row resolved cleanly, so a rate-table conflict surfaces before
    // anything is persisted.
    let mut resolved: Vec<NewWorkStat> = Vec::new();
    let mut skipped = 0usize;
    let mut conflicts = 0usize;
    for (index, row) in parsed_rows.iter().enumerate() {
        let worker = worker_map.get(&normalize_key(&row.worker_account_email));
        let project = project_map.get(&normalize_key(&row.project_code));
        let (Some(worker), Some(project)) = (worker, project) else {
            skipped += 1;
            continue;
        };

        let locale = resolve_locale(
            worker.locale.as_deref(),
            project.locale.as_deref(),
            &locale_mappings,
            &options.default_locale,
        );
        let rate = match find_rate(&rates, &locale, project.rate_card_id.as_deref(), &row.work_date)
        {
            Ok(rate) => rate,
            Err(conflict) => {
                conflicts += 1;
                messages.push(ValidationMessage {
                    id: format!("ambiguous-rate-{index}"),
                    row: index + 2,
                    level: Level::Error,
                    message: format!(
                        "{} overlapping rates for locale {} / tier {} on {}.",
                        conflict.candidates,
                        conflict.locale,
                        conflict.expert_tier.as_deref().unwrap_or("(none)"),
                        conflict.work_date
                    ),
                });
                continue;
            }
        };
        let (currency, earnings) = calculate_earnings(row.units_completed, row.hours_worked, rate);
        resolved.push(NewWorkStat {
            worker_id: worker.worker_id,
            project_id: project.id,
            work_date: row.work_date.clone(),
            units_completed: row.units_completed,
            hours_worked: row.hours_worked,
            currency,
            locale,
            earnings,
            imported_at: imported_at.clone(),
        });
    }

    if conflicts > 0 {
        return Ok(StatsImportResult::refused(parsed_rows.len(), messages));
    }

    let mut writer = BatchWriter::new(conn, options.batch_size);
    for record in resolved {
        writer.push(record);
    }
    let batches = writer.finish();

    let mut result = StatsImportResult {
        skipped,
        messages,
        ..Default::default()
    };
    for outcome in &batches {
        result.inserted += outcome.inserted;
        result.duplicates += outcome.duplicates;
        result.failed += outcome.failed;
    }
    result.batches = batches;
    Ok(result)
}
