use crate::error::Result;
use crate::models::StatsRow;

use super::template::TEMPLATE_COLUMNS;

fn field(record: &csv::StringRecord, idx: Option<usize>) -> String {
    idx.and_then(|i| record.get(i)).unwrap_or("").to_string()
}

// Lenient coercion: absent or empty is 0.0, anything unparseable is NaN.
// The validator's finite-and-positive check is what actually rejects bad
// numbers, so parsing never fails on a malformed value.
fn numeric_field(record: &csv::StringRecord, idx: Option<usize>) -> f64 {
    let raw = idx.and_then(|i| record.get(i)).unwrap_or("");
    if raw.is_empty() {
        return 0.0;
    }
    raw.parse::<f64>().unwrap_or(f64::NAN)
}

/// Parse stats CSV text into rows. The header row names the columns;
/// empty lines are skipped and every field is trimmed.
pub fn parse_stats_csv(csv_text: &str) -> Result<Vec<StatsRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(csv_text.as_bytes());

    let headers = rdr.headers()?.clone();
    let col = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let idx_email = col(TEMPLATE_COLUMNS[0]);
    let idx_code = col(TEMPLATE_COLUMNS[1]);
    let idx_date = col(TEMPLATE_COLUMNS[2]);
    let idx_units = col(TEMPLATE_COLUMNS[3]);
    let idx_hours = col(TEMPLATE_COLUMNS[4]);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        rows.push(StatsRow {
            worker_account_email: field(&record, idx_email),
            project_code: field(&record, idx_code),
            work_date: field(&record, idx_date),
            units_completed: numeric_field(&record, idx_units),
            hours_worked: numeric_field(&record, idx_hours),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "worker_account_email,project_code,work_date,units_completed,hours_worked";

    #[test]
    fn test_parse_basic_rows() {
        let csv_text = format!("{HEADER}\na@x.com,atlas,2025-01-15,10,2.5\nb@x.com,beacon,2025-01-16,20,3\n");
        let rows = parse_stats_csv(&csv_text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].worker_account_email, "a@x.com");
        assert_eq!(rows[1].units_completed, 20.0);
    }

    #[test]
    fn test_parse_skips_empty_lines() {
        let csv_text = format!("{HEADER}\na@x.com,atlas,2025-01-15,10,2.5\n\n\nb@x.com,beacon,2025-01-16,20,3\n");
        let rows = parse_stats_csv(&csv_text).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_parse_trims_fields() {
        let csv_text = format!("{HEADER}\n  a@x.com , atlas ,2025-01-15, 10 , 2.5\n");
        let rows = parse_stats_csv(&csv_text).unwrap();
        assert_eq!(rows[0].worker_account_email, "a@x.com");
        assert_eq!(rows[0].project_code, "atlas");
        assert_eq!(rows[0].units_completed, 10.0);
    }

    #[test]
    fn test_parse_missing_numeric_defaults_to_zero() {
        let csv_text = format!("{HEADER}\na@x.com,atlas,2025-01-15,,\n");
        let rows = parse_stats_csv(&csv_text).unwrap();
        assert_eq!(rows[0].units_completed, 0.0);
        assert_eq!(rows[0].hours_worked, 0.0);
    }

    #[test]
    fn test_parse_short_row_defaults_missing_fields() {
        let csv_text = format!("{HEADER}\na@x.com,atlas,2025-01-15\n");
        let rows = parse_stats_csv(&csv_text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].work_date, "2025-01-15");
        assert_eq!(rows[0].units_completed, 0.0);
    }

    #[test]
    fn test_parse_non_numeric_becomes_nan() {
        let csv_text = format!("{HEADER}\na@x.com,atlas,2025-01-15,abc,xyz\n");
        let rows = parse_stats_csv(&csv_text).unwrap();
        assert!(rows[0].units_completed.is_nan());
        assert!(rows[0].hours_worked.is_nan());
    }

    #[test]
    fn test_parse_header_order_does_not_matter() {
        let csv_text = "project_code,worker_account_email,hours_worked,units_completed,work_date\n\
                        atlas,a@x.com,2.5,10,2025-01-15\n";
        let rows = parse_stats_csv(csv_text).unwrap();
        assert_eq!(rows[0].worker_account_email, "a@x.com");
        assert_eq!(rows[0].project_code, "atlas");
        assert_eq!(rows[0].units_completed, 10.0);
        assert_eq!(rows[0].hours_worked, 2.5);
    }

    #[test]
    fn test_parse_header_only_yields_no_rows() {
        let rows = parse_stats_csv(&format!("{HEADER}\n")).unwrap();
        assert!(rows.is_empty());
    }
}
