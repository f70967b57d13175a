//! Core task operations shared between the CLI and Web API
//!
//! `TaskStore` is the single owner of the task collection. It keeps the
//! collection in memory behind an async mutex and mirrors it to a JSON file.
//!
//! ## Consistency
//!
//! Every mutating operation holds the lock for its whole
//! read → mutate → persist cycle and works on a copy of the collection.
//! The copy only replaces the in-memory state once the file write has
//! succeeded, so a failed write leaves both memory and disk untouched and
//! two concurrent creates can never hand out the same id.
//!
//! ## Architecture
//!
//! ```text
//! CLI (src/cli)       ──┐
//!                       ├──> operations::tasks (this module) ──> storage::tasks (JSON file)
//! Web (handlers)    ────┘
//! ```

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::sync::{Mutex, MutexGuard};

use super::stats::TaskStats;
use crate::error::{Result, TaskflowError};
use crate::storage::{self, tasks};
use crate::storage::tasks::{Task, TaskDraft, TaskPatch};

/// File-backed task collection
pub struct TaskStore {
    path: PathBuf,
    tasks: Mutex<Vec<Task>>,
}

/// Load the collection from disk, seeding it when missing or unreadable
///
/// # Steps
///
/// 1. Missing file: write the seed dataset
/// 2. Valid array: use every readable record. When some records had to be
///    skipped, the file is first copied to `<file>.bak` so the next write
///    does not lose them.
/// 3. Not a JSON array at all: move it aside to `<file>.bak`, then write the
///    seed dataset
///
/// Any other I/O failure (permissions, etc.) is returned as an error.
pub fn load_or_seed(path: &Path) -> Result<Vec<Task>> {
    if !path.exists() {
        let seed = tasks::seed_tasks(Utc::now());
        tasks::save_tasks(path, &seed)?;
        tracing::info!(path = %path.display(), "seeded task file");
        return Ok(seed);
    }

    match tasks::read_tasks(path) {
        Ok(loaded) => {
            if loaded.skipped > 0 {
                let backup = backup_path(path);
                std::fs::copy(path, &backup)?;
                tracing::warn!(
                    path = %path.display(),
                    backup = %backup.display(),
                    skipped = loaded.skipped,
                    "task file has unreadable records, original kept as backup"
                );
            }
            warn_duplicate_ids(&loaded.tasks);
            Ok(loaded.tasks)
        }
        Err(e @ TaskflowError::JsonParse(_)) => {
            let backup = backup_path(path);
            tracing::warn!(
                path = %path.display(),
                backup = %backup.display(),
                error = %e,
                "task file is corrupt, replacing with seed data"
            );
            std::fs::rename(path, &backup)?;
            let seed = tasks::seed_tasks(Utc::now());
            tasks::save_tasks(path, &seed)?;
            Ok(seed)
        }
        Err(e) => Err(e),
    }
}

fn backup_path(path: &Path) -> PathBuf {
    path.with_extension("json.bak")
}

/// Externally edited files may contain duplicate ids; they are kept but reported
fn warn_duplicate_ids(loaded: &[Task]) {
    let mut ids: Vec<u64> = loaded.iter().map(|t| t.id).collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.len() != loaded.len() {
        tracing::warn!(
            duplicates = loaded.len() - ids.len(),
            "task file contains duplicate ids"
        );
    }
}

/// Next id: one past the current maximum, or 1 for an empty collection
fn next_id(tasks: &[Task]) -> Result<u64> {
    match tasks.iter().map(|t| t.id).max() {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| TaskflowError::storage("task id space exhausted")),
    }
}

impl TaskStore {
    /// Open the store backed by `path`, creating parent directories as needed
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            storage::ensure_data_dir(parent)?;
        }

        let load_path = path.clone();
        let loaded = tokio::task::spawn_blocking(move || load_or_seed(&load_path))
            .await
            .map_err(|e| TaskflowError::storage(format!("load task panicked: {}", e)))??;

        tracing::info!(path = %path.display(), count = loaded.len(), "task store opened");
        Ok(Self {
            path,
            tasks: Mutex::new(loaded),
        })
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All tasks in insertion order
    pub async fn list(&self) -> Vec<Task> {
        self.tasks.lock().await.clone()
    }

    /// A single task by id
    pub async fn get(&self, id: u64) -> Result<Task> {
        self.tasks
            .lock()
            .await
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(TaskflowError::NotFound(id))
    }

    /// Create a task from a draft
    ///
    /// The stored record always starts with `completed = false` and a fresh
    /// `createdAt`. It is only returned once the file write has succeeded.
    pub async fn create(&self, draft: TaskDraft) -> Result<Task> {
        let mut guard = self.tasks.lock().await;

        let task = draft.into_task(next_id(&guard)?, Utc::now())?;
        let mut next = guard.clone();
        next.push(task.clone());

        self.commit(&mut guard, next).await?;
        tracing::info!(id = task.id, title = %task.title, "task created");
        Ok(task)
    }

    /// Shallow-merge a patch over an existing task
    pub async fn update(&self, id: u64, patch: TaskPatch) -> Result<Task> {
        let mut guard = self.tasks.lock().await;

        let index = guard
            .iter()
            .position(|t| t.id == id)
            .ok_or(TaskflowError::NotFound(id))?;

        let mut next = guard.clone();
        next[index].apply(patch)?;
        let updated = next[index].clone();

        self.commit(&mut guard, next).await?;
        tracing::info!(id, completed = updated.completed, "task updated");
        Ok(updated)
    }

    /// Permanently remove a task, returning the removed record
    pub async fn delete(&self, id: u64) -> Result<Task> {
        let mut guard = self.tasks.lock().await;

        let index = guard
            .iter()
            .position(|t| t.id == id)
            .ok_or(TaskflowError::NotFound(id))?;

        let mut next = guard.clone();
        let removed = next.remove(index);

        self.commit(&mut guard, next).await?;
        tracing::info!(id, "task deleted");
        Ok(removed)
    }

    /// Statistics derived from the current collection
    pub async fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks.lock().await)
    }

    /// Persist `next`, then make it the in-memory state
    async fn commit(&self, guard: &mut MutexGuard<'_, Vec<Task>>, next: Vec<Task>) -> Result<()> {
        if let Err(e) = storage::save_json_async(&self.path, &next).await {
            tracing::error!(path = %self.path.display(), error = %e, "failed to persist tasks");
            return Err(e);
        }
        **guard = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::tasks::Priority;
    use std::sync::Arc;

    fn draft(title: &str, category: &str, priority: Priority) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            category: Some(category.to_string()),
            priority: Some(priority),
            due_date: None,
        }
    }

    /// Store over an empty collection (file exists with `[]`)
    async fn empty_store(dir: &Path) -> TaskStore {
        let path = tasks::tasks_file_path(dir);
        std::fs::write(&path, "[]").unwrap();
        TaskStore::open(path).await.unwrap()
    }

    #[tokio::test]
    async fn test_open_seeds_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tasks.json");
        let store = TaskStore::open(&path).await.unwrap();

        assert!(path.exists());
        assert_eq!(store.list().await.len(), 4);
        assert_eq!(tasks::load_tasks(&path).unwrap(), store.list().await);
    }

    #[tokio::test]
    async fn test_open_corrupt_file_backs_up_and_seeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = tasks::tasks_file_path(dir.path());
        std::fs::write(&path, "not json at all").unwrap();

        let store = TaskStore::open(&path).await.unwrap();
        assert_eq!(store.list().await.len(), 4);

        let backup = dir.path().join("tasks.json.bak");
        assert_eq!(std::fs::read_to_string(backup).unwrap(), "not json at all");
    }

    #[tokio::test]
    async fn test_open_keeps_records_beside_unreadable_ones() {
        let dir = tempfile::tempdir().unwrap();
        let path = tasks::tasks_file_path(dir.path());
        let original = r#"[
            {"id":10,"title":"My real task","category":"Work","priority":"high","dueDate":"2025-03-01"},
            {"id":11,"title":"Timestamped","category":"Work","priority":"low","dueDate":"2025-03-01T09:00:00.000Z"},
            {"id":12,"title":"Broken","category":"Work","priority":"urgent"}
        ]"#;
        std::fs::write(&path, original).unwrap();

        let store = TaskStore::open(&path).await.unwrap();
        let titles: Vec<String> = store.list().await.into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["My real task", "Timestamped"]);

        let backup = dir.path().join("tasks.json.bak");
        assert_eq!(std::fs::read_to_string(backup).unwrap(), original);

        let task = store.create(draft("Next", "Work", Priority::Low)).await.unwrap();
        assert_eq!(task.id, 12);
    }

    #[tokio::test]
    async fn test_open_valid_file_leaves_no_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = tasks::tasks_file_path(dir.path());
        std::fs::write(&path, r#"[{"id":3,"title":"Only","category":"Home","priority":"low"}]"#).unwrap();

        let store = TaskStore::open(&path).await.unwrap();
        assert_eq!(store.list().await.len(), 1);
        assert!(!dir.path().join("tasks.json.bak").exists());
    }

    #[tokio::test]
    async fn test_create_after_max_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = tasks::tasks_file_path(dir.path());
        let json = format!(
            r#"[{{"id":{},"title":"Last","category":"Work","priority":"low"}}]"#,
            u64::MAX
        );
        std::fs::write(&path, &json).unwrap();
        let store = TaskStore::open(&path).await.unwrap();
        let before = store.list().await;

        let err = store.create(draft("Overflow", "Work", Priority::Low)).await.unwrap_err();
        assert!(err.is_storage());
        assert_eq!(store.list().await, before);
        assert_eq!(tasks::load_tasks(&path).unwrap(), before);
    }

    #[test]
    fn test_next_id() {
        assert_eq!(next_id(&[]).unwrap(), 1);
        let mut seed = tasks::seed_tasks(Utc::now());
        assert_eq!(next_id(&seed).unwrap(), 5);
        seed[0].id = u64::MAX;
        assert!(next_id(&seed).is_err());
    }

    #[tokio::test]
    async fn test_seed_stats() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(tasks::tasks_file_path(dir.path())).await.unwrap();

        let stats = store.stats().await;
        assert_eq!(
            (stats.total, stats.completed, stats.pending, stats.high_priority),
            (4, 1, 3, 1)
        );
    }

    #[tokio::test]
    async fn test_create_on_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = empty_store(dir.path()).await;

        let task = store.create(draft("X", "Work", Priority::Low)).await.unwrap();
        assert_eq!(task.id, 1);
        assert!(!task.completed);
        assert!(task.created_at.is_some());

        let listed = store.list().await;
        let matching: Vec<_> = listed
            .iter()
            .filter(|t| t.title == "X" && t.category == "Work" && t.priority == Priority::Low)
            .collect();
        assert_eq!(matching.len(), 1);
        assert!(!matching[0].completed);
    }

    #[tokio::test]
    async fn test_serial_ids_strictly_increasing() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(tasks::tasks_file_path(dir.path())).await.unwrap();

        let mut last = 4;
        for i in 0..10 {
            let task = store
                .create(draft(&format!("Task {}", i), "Work", Priority::Medium))
                .await
                .unwrap();
            assert!(task.id > last);
            last = task.id;
        }
        assert_eq!(last, 14);
    }

    #[tokio::test]
    async fn test_id_after_delete_uses_max() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(tasks::tasks_file_path(dir.path())).await.unwrap();

        store.delete(2).await.unwrap();
        let task = store.create(draft("Next", "Home", Priority::High)).await.unwrap();
        assert_eq!(task.id, 5);
    }

    #[tokio::test]
    async fn test_concurrent_creates_unique_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(empty_store(dir.path()).await);

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .create(draft(&format!("T{}", i), "Work", Priority::Low))
                        .await
                        .unwrap()
                        .id
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=16).collect::<Vec<u64>>());
        assert_eq!(tasks::load_tasks(store.path()).unwrap().len(), 16);
    }

    #[tokio::test]
    async fn test_update_completed_leaves_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(tasks::tasks_file_path(dir.path())).await.unwrap();
        let before = store.get(1).await.unwrap();

        let patch = TaskPatch {
            completed: Some(true),
            ..Default::default()
        };
        let updated = store.update(1, patch).await.unwrap();

        assert!(updated.completed);
        assert_eq!(Task { completed: false, ..updated.clone() }, before);
        assert_eq!(store.get(1).await.unwrap(), updated);
        assert_eq!(tasks::load_tasks(store.path()).unwrap(), store.list().await);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(tasks::tasks_file_path(dir.path())).await.unwrap();
        let before = store.list().await;

        let patch = TaskPatch {
            completed: Some(true),
            ..Default::default()
        };
        let err = store.update(999, patch).await.unwrap_err();
        assert!(matches!(err, TaskflowError::NotFound(999)));
        assert_eq!(store.list().await, before);
        assert_eq!(tasks::load_tasks(store.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_update_invalid_patch_leaves_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(tasks::tasks_file_path(dir.path())).await.unwrap();
        let before = store.list().await;

        let patch = TaskPatch {
            id: Some(42),
            completed: Some(true),
            ..Default::default()
        };
        assert!(matches!(
            store.update(1, patch).await,
            Err(TaskflowError::InvalidData(_))
        ));
        assert_eq!(store.list().await, before);
    }

    #[tokio::test]
    async fn test_delete_then_delete_again() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(tasks::tasks_file_path(dir.path())).await.unwrap();

        let removed = store.delete(3).await.unwrap();
        assert_eq!(removed.id, 3);
        let remaining = store.list().await;
        assert_eq!(remaining.len(), 3);
        assert!(remaining.iter().all(|t| t.id != 3));

        assert!(matches!(
            store.delete(3).await,
            Err(TaskflowError::NotFound(3))
        ));
        assert_eq!(store.list().await.len(), 3);
    }

    #[tokio::test]
    async fn test_stats_consistent_through_mutations() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(tasks::tasks_file_path(dir.path())).await.unwrap();

        let check = |stats: TaskStats| assert_eq!(stats.total, stats.completed + stats.pending);
        check(store.stats().await);

        let task = store.create(draft("A", "Errands", Priority::High)).await.unwrap();
        check(store.stats().await);
        assert_eq!(store.stats().await.high_priority, 2);

        let done = TaskPatch {
            completed: Some(true),
            ..Default::default()
        };
        store.update(task.id, done).await.unwrap();
        let stats = store.stats().await;
        check(stats.clone());
        assert_eq!(stats.high_priority, 1);
        assert_eq!(stats.by_category.get("Errands"), Some(&1));

        store.delete(task.id).await.unwrap();
        let stats = store.stats().await;
        check(stats.clone());
        assert_eq!(stats, TaskStats::from_tasks(&store.list().await));
    }

    #[tokio::test]
    async fn test_failed_write_does_not_commit() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let store = TaskStore::open(tasks::tasks_file_path(&data_dir)).await.unwrap();
        let before = store.list().await;

        // Removing the directory makes the temp-file write fail
        std::fs::remove_dir_all(&data_dir).unwrap();

        let err = store.create(draft("Lost", "Work", Priority::Low)).await.unwrap_err();
        assert!(err.is_storage());
        assert_eq!(store.list().await, before);
    }

    #[tokio::test]
    async fn test_reopen_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = tasks::tasks_file_path(dir.path());
        let store = TaskStore::open(&path).await.unwrap();
        store.create(draft("Persist me", "Work", Priority::High)).await.unwrap();
        let expected = store.list().await;
        drop(store);

        let reopened = TaskStore::open(&path).await.unwrap();
        assert_eq!(reopened.list().await, expected);
    }
}
