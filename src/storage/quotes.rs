use std::path::{Path, PathBuf};

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// 名言数据文件名
pub const QUOTES_FILE: &str = "quotes.json";

/// 名言
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

impl Quote {
    fn new(text: &str, author: &str) -> Self {
        Self {
            text: text.to_string(),
            author: author.to_string(),
        }
    }

    /// 读取失败或名言池为空时返回的固定名言
    pub fn fallback() -> Self {
        Self::new(
            "The only way to do great work is to love what you do.",
            "Steve Jobs",
        )
    }
}

/// 获取 quotes.json 文件路径
pub fn quotes_file_path(data_dir: &Path) -> PathBuf {
    data_dir.join(QUOTES_FILE)
}

/// 加载名言池
pub async fn load_quotes(path: &Path) -> Result<Vec<Quote>> {
    super::load_json_async(path).await
}

/// 首次运行时的种子名言池
pub fn seed_quotes() -> Vec<Quote> {
    vec![
        Quote::new(
            "The way to get started is to quit talking and begin doing.",
            "Walt Disney",
        ),
        Quote::new(
            "Your time is limited, so don't waste it living someone else's life.",
            "Steve Jobs",
        ),
        Quote::new("The future depends on what you do today.", "Mahatma Gandhi"),
        Quote::new(
            "Don't watch the clock; do what it does. Keep going.",
            "Sam Levenson",
        ),
    ]
}

/// 不存在则写入种子名言池
pub fn ensure_quotes_file(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    super::save_json(path, &seed_quotes())
}

/// 随机挑选一条名言；任何读取错误都退回固定名言，不会失败
pub async fn random_quote(path: &Path) -> Quote {
    let quotes = match load_quotes(path).await {
        Ok(q) => q,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read quotes, using fallback");
            return Quote::fallback();
        }
    };

    quotes
        .choose(&mut rand::rng())
        .cloned()
        .unwrap_or_else(Quote::fallback)
}
