//! Derived task statistics

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::storage::tasks::{Priority, Task};

/// Completion statistics, recomputed from the collection on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// High priority tasks that are still pending
    pub high_priority: usize,
    pub by_category: BTreeMap<String, usize>,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut stats = Self {
            total: tasks.len(),
            ..Default::default()
        };

        for task in tasks {
            if task.completed {
                stats.completed += 1;
            } else if task.priority == Priority::High {
                stats.high_priority += 1;
            }
            *stats.by_category.entry(task.category.clone()).or_insert(0) += 1;
        }
        stats.pending = stats.total - stats.completed;

        stats
    }
}
