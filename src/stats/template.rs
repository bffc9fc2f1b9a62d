pub const TEMPLATE_COLUMNS: [&str; 5] = [
    "worker_account_email",
    "project_code",
    "work_date",
    "units_completed",
    "hours_worked",
];

const SAMPLE_ROWS: [&str; 2] = [
    "worker1@example.com,atlas,2025-11-10,120,8.5",
    "worker2@example.com,beacon,2025-11-10,95,7.0",
];

/// Fixed-header CSV template with two illustrative sample rows.
pub fn generate_stats_template() -> String {
    let mut out = TEMPLATE_COLUMNS.join(",");
    out.push('\n');
    for row in SAMPLE_ROWS {
        out.push_str(row);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::parser::parse_stats_csv;

    #[test]
    fn test_template_header() {
        let template = generate_stats_template();
        let header = template.lines().next().unwrap();
        assert_eq!(
            header,
            "worker_account_email,project_code,work_date,units_completed,hours_worked"
        );
    }

    #[test]
    fn test_template_round_trips_through_parser() {
        let rows = parse_stats_csv(&generate_stats_template()).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].worker_account_email, "worker1@example.com");
        assert_eq!(rows[0].project_code, "atlas");
        assert_eq!(rows[0].work_date, "2025-11-10");
        assert_eq!(rows[0].units_completed, 120.0);
        assert_eq!(rows[0].hours_worked, 8.5);

        assert_eq!(rows[1].worker_account_email, "worker2@example.com");
        assert_eq!(rows[1].project_code, "beacon");
        assert_eq!(rows[1].work_date, "2025-11-10");
        assert_eq!(rows[1].units_completed, 95.0);
        assert_eq!(rows[1].hours_worked, 7.0);
    }
}
