use std::path::Path;

use chrono::Utc;

use crate::error::Result;
use crate::storage::{self, config, quotes, tasks};

/// What `init` did with one data file
#[derive(Debug, PartialEq, Eq)]
pub enum FileAction {
    Created,
    Overwritten,
    Kept,
}

/// Write one data file unless it exists (or `force` is set)
fn write_file(path: &Path, force: bool, write: impl FnOnce() -> Result<()>) -> Result<FileAction> {
    let existed = path.exists();
    if existed && !force {
        return Ok(FileAction::Kept);
    }
    write()?;
    Ok(if existed {
        FileAction::Overwritten
    } else {
        FileAction::Created
    })
}

/// 初始化数据目录：种子任务、种子名言、默认配置
pub fn init_data_dir(data_dir: &Path, force: bool) -> Result<Vec<(String, FileAction)>> {
    storage::ensure_data_dir(data_dir)?;

    let tasks_path = tasks::tasks_file_path(data_dir);
    let quotes_path = quotes::quotes_file_path(data_dir);
    let config_path = config::config_path(data_dir);

    let results = vec![
        (
            tasks_path.display().to_string(),
            write_file(&tasks_path, force, || {
                tasks::save_tasks(&tasks_path, &tasks::seed_tasks(Utc::now()))
            })?,
        ),
        (
            quotes_path.display().to_string(),
            write_file(&quotes_path, force, || {
                storage::save_json(&quotes_path, &quotes::seed_quotes())
            })?,
        ),
        // 配置文件只在缺失时写入，不受 --force 影响
        (
            config_path.display().to_string(),
            write_file(&config_path, false, || {
                config::save_config(data_dir, &config::Config::default())
            })?,
        ),
    ];

    Ok(results)
}

/// Execute `taskflow init`
pub fn execute(data_dir: &Path, force: bool) {
    match init_data_dir(data_dir, force) {
        Ok(results) => {
            for (path, action) in results {
                let label = match action {
                    FileAction::Created => "created",
                    FileAction::Overwritten => "overwritten",
                    FileAction::Kept => "kept",
                };
                println!("  {:<12}{}", label, path);
            }
        }
        Err(e) => {
            eprintln!("Failed to initialise {}: {}", data_dir.display(), e);
            std::process::exit(1);
        }
    }
}
