//! `taskflow stats`: print statistics of the stored collection

use std::io;
use std::path::Path;

use chrono::Utc;

use crate::error::{Result, TaskflowError};
use crate::operations::stats::TaskStats;
use crate::storage::tasks;

/// Stats of the task file; a missing or corrupt file counts as the seed dataset.
/// Read-only: nothing is written back. Other read failures are returned.
pub fn stats_for(data_dir: &Path) -> Result<TaskStats> {
    let path = tasks::tasks_file_path(data_dir);
    let collection = match tasks::load_tasks(&path) {
        Ok(t) => t,
        Err(TaskflowError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
            tasks::seed_tasks(Utc::now())
        }
        Err(e @ TaskflowError::JsonParse(_)) => {
            tracing::warn!(path = %path.display(), error = %e, "corrupt task file, reporting seed data");
            tasks::seed_tasks(Utc::now())
        }
        Err(e) => return Err(e),
    };
    Ok(TaskStats::from_tasks(&collection))
}

/// Execute `taskflow stats`
pub fn execute(data_dir: &Path) {
    let rendered = stats_for(data_dir)
        .and_then(|stats| serde_json::to_string_pretty(&stats).map_err(TaskflowError::from));
    match rendered {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to read stats from {}: {}", data_dir.display(), e);
            std::process::exit(1);
        }
    }
}
