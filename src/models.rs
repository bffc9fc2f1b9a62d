#[derive(Debug, Clone)]
pub struct WorkerAccount {
    pub worker_id: i64,
    pub worker_account_email: String,
    pub locale: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Project {
    pub id: i64,
    pub project_code: String,
    pub locale: Option<String>,
    pub rate_card_id: Option<String>,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RatePayable {
    pub id: i64,
    pub locale: String,
    pub expert_tier: Option<String>,
    pub rate_per_unit: f64,
    pub rate_per_hour: f64,
    pub currency: String,
    pub effective_from: String,
    pub effective_to: Option<String>,
}

/// Intermediate representation of one CSV data line before resolution.
/// Numeric fields are parsed leniently: missing/empty becomes 0.0 and
/// non-numeric text becomes NaN, which validation rejects.
#[derive(Debug, Clone)]
pub struct StatsRow {
    pub worker_account_email: String,
    pub project_code: String,
    pub work_date: String,
    pub units_completed: f64,
    pub hours_worked: f64,
}

/// Fully resolved work stat ready for insert.
#[derive(Debug, Clone)]
pub struct NewWorkStat {
    pub worker_id: i64,
    pub project_id: i64,
    pub work_date: String,
    pub units_completed: f64,
    pub hours_worked: f64,
    pub currency: Option<String>,
    pub locale: String,
    pub earnings: Option<f64>,
    pub imported_at: String,
}

