use std::path::PathBuf;

use crate::error::Result;
use crate::stats::template::generate_stats_template;

pub fn run(output: Option<String>) -> Result<()> {
    let path = PathBuf::from(output.unwrap_or_else(|| "stats-import-template.csv".to_string()));
    std::fs::write(&path, generate_stats_template())?;
    println!("Template written to {}", path.display());
    Ok(())
}
