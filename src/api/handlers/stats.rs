//! Stats API handlers

use axum::{extract::State, Json};

use crate::api::AppState;
use crate::operations::stats::TaskStats;

/// GET /api/stats
/// Completion statistics derived from the current task list
pub async fn get_stats(State(state): State<AppState>) -> Json<TaskStats> {
    Json(state.store.stats().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::test_support::seeded_state;

    #[tokio::test]
    async fn test_seed_stats() {
        let dir = tempfile::tempdir().unwrap();
        let state = seeded_state(dir.path()).await;

        let Json(stats) = get_stats(State(state)).await;
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 3);
        assert_eq!(stats.high_priority, 1);

        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["byCategory"]["Study"], 2);
    }
}
