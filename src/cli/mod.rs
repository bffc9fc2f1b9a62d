pub mod backup;
pub mod completions;
pub mod demo;
pub mod import;
pub mod init;
pub mod locales;
pub mod projects;
pub mod rates;
pub mod stats;
pub mod status;
pub mod template;
pub mod workers;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "maestro", about = "Workforce stats import CLI for PPH Connect teams.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up Maestro: choose a data directory and initialize the database.
    Init {
        /// Path for Maestro data (default: ~/Documents/maestro)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Manage workers and their accounts.
    Workers {
        #[command(subcommand)]
        command: WorkersCommands,
    },
    /// Manage projects.
    Projects {
        #[command(subcommand)]
        command: ProjectsCommands,
    },
    /// Manage client-to-ISO locale mappings.
    Locales {
        #[command(subcommand)]
        command: LocalesCommands,
    },
    /// Manage payable rates.
    Rates {
        #[command(subcommand)]
        command: RatesCommands,
    },
    /// Write the stats import CSV template.
    Template {
        /// Output path (default: stats-import-template.csv)
        #[arg(long)]
        output: Option<String>,
    },
    /// Import a work-stats CSV file.
    Import {
        /// Path to CSV file to import
        file: String,
        /// Fallback locale when no mapping applies
        #[arg(long = "default-locale")]
        default_locale: Option<String>,
        /// Rows per insert batch
        #[arg(long = "batch-size")]
        batch_size: Option<usize>,
        /// Validate and report without writing anything
        #[arg(long = "validate-only")]
        validate_only: bool,
    },
    /// List imported work stats.
    Stats {
        /// Month filter: YYYY-MM
        #[arg(long)]
        month: Option<String>,
        /// Filter by worker account email
        #[arg(long)]
        worker: Option<String>,
        /// Filter by project code
        #[arg(long)]
        project: Option<String>,
    },
    /// Show current database and summary statistics.
    Status,
    /// Back up the database.
    Backup {
        /// Output path (default: <data_dir>/backups/maestro-YYYYMMDD-HHMMSS.db)
        #[arg(long)]
        output: Option<String>,
    },
    /// Load sample data (workers, projects, rates) to explore Maestro.
    Demo,
    /// Generate shell completions.
    Completions {
        /// Shell to generate for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum WorkersCommands {
    /// Add a worker with an account email.
    Add {
        /// Worker name, e.g. 'Ada Lovelace'
        name: String,
        /// Worker account email used in stats CSVs
        #[arg(long)]
        email: String,
        /// Client locale string, e.g. 'es-mx'
        #[arg(long)]
        locale: Option<String>,
    },
    /// List workers and their accounts.
    List,
}

#[derive(Subcommand)]
pub enum ProjectsCommands {
    /// Add a project.
    Add {
        /// Project code used in stats CSVs, e.g. 'atlas'
        code: String,
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Client locale string
        #[arg(long)]
        locale: Option<String>,
        /// Expert-tier key used for rate lookup
        #[arg(long = "rate-card")]
        rate_card: Option<String>,
    },
    /// List all projects.
    List,
}

#[derive(Subcommand)]
pub enum LocalesCommands {
    /// Map a client locale string to an ISO locale.
    Add {
        /// Client locale as it appears in exports, e.g. 'es-latam'
        client: String,
        /// Canonical ISO locale, e.g. 'es-419'
        iso: String,
    },
    /// List locale mappings.
    List,
}

#[derive(Subcommand)]
pub enum RatesCommands {
    /// Add a payable rate.
    Add {
        /// ISO locale the rate applies to
        #[arg(long)]
        locale: String,
        /// Expert-tier key
        #[arg(long)]
        tier: Option<String>,
        /// Rate per completed unit
        #[arg(long = "per-unit", default_value = "0")]
        per_unit: f64,
        /// Rate per worked hour
        #[arg(long = "per-hour", default_value = "0")]
        per_hour: f64,
        /// Currency code, e.g. USD
        #[arg(long)]
        currency: String,
        /// Effective from date: YYYY-MM-DD
        #[arg(long = "from")]
        effective_from: String,
        /// Effective to date: YYYY-MM-DD (open-ended when omitted)
        #[arg(long = "to")]
        effective_to: Option<String>,
    },
    /// List all payable rates.
    List,
}
