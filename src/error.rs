//! Taskflow 统一错误类型定义
//!
//! 使用 `thiserror` 库提供统一的错误处理，支持错误链式传播。

use std::io;
use thiserror::Error;

/// Taskflow 错误类型
#[derive(Debug, Error)]
pub enum TaskflowError {
    /// I/O 错误（文件读写、目录操作等）
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON 解析/序列化错误
    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// TOML 解析错误
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// 存储错误（通用）
    #[error("Storage error: {0}")]
    Storage(String),

    /// 任务不存在
    #[error("Task not found: {0}")]
    NotFound(u64),

    /// 无效数据（空标题、修改不可变字段等）
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Taskflow Result 类型别名
pub type Result<T> = std::result::Result<T, TaskflowError>;

impl TaskflowError {
    /// 创建 Storage 错误
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// 创建 InvalidData 错误
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// 是否属于存储层故障（I/O、序列化）
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::JsonParse(_) | Self::TomlParse(_) | Self::Storage(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TaskflowError::NotFound(42);
        assert_eq!(err.to_string(), "Task not found: 42");

        let err = TaskflowError::invalid_data("title must not be empty");
        assert_eq!(err.to_string(), "Invalid data: title must not be empty");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: TaskflowError = io_err.into();
        assert!(matches!(err, TaskflowError::Io(_)));
        assert!(err.is_storage());
    }

    #[test]
    fn test_not_found_is_not_storage() {
        assert!(!TaskflowError::NotFound(1).is_storage());
        assert!(!TaskflowError::invalid_data("x").is_storage());
        assert!(TaskflowError::storage("disk full").is_storage());
    }
}
