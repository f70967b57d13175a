//! Quote API handler

use axum::{extract::State, Json};

use crate::api::AppState;
use crate::storage::quotes::{self, Quote};

/// GET /api/quote
/// A random quote; falls back to a fixed quote instead of failing
pub async fn get_quote(State(state): State<AppState>) -> Json<Quote> {
    Json(quotes::random_quote(&state.quotes_path).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::test_support::seeded_state;

    #[tokio::test]
    async fn test_quote_from_seed_pool() {
        let dir = tempfile::tempdir().unwrap();
        let state = seeded_state(dir.path()).await;

        let Json(quote) = get_quote(State(state)).await;
        assert!(quotes::seed_quotes().contains(&quote));
    }

    #[tokio::test]
    async fn test_quote_file_removed() {
        let dir = tempfile::tempdir().unwrap();
        let state = seeded_state(dir.path()).await;
        std::fs::remove_file(state.quotes_path.as_path()).unwrap();

        let Json(quote) = get_quote(State(state)).await;
        assert_eq!(quote, Quote::fallback());
    }
}
