use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::{Result, TaskflowError};

/// 任务数据文件名
pub const TASKS_FILE: &str = "tasks.json";

/// 未指定分类时使用的默认分类
pub const DEFAULT_CATEGORY: &str = "General";

/// 任务优先级
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// 任务数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// 任务 ID（单调递增，唯一）
    pub id: u64,
    /// 任务标题
    pub title: String,
    /// 分类（自由文本，如 "Work"）
    pub category: String,
    /// 优先级
    pub priority: Priority,
    /// 截止日期
    #[serde(
        default,
        deserialize_with = "due_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<NaiveDate>,
    /// 是否已完成
    #[serde(default)]
    pub completed: bool,
    /// 创建时间（旧数据文件可能缺失）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// 创建任务的请求数据
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "due_date")]
    pub due_date: Option<NaiveDate>,
}

/// 更新任务的补丁：每个字段独立地存在或缺省
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// 不可变字段，仅允许回传原值
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    /// `Some(None)` 表示显式传入 null，清除截止日期
    #[serde(default, deserialize_with = "due_date_patch")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub completed: Option<bool>,
    /// 不可变字段，仅允许回传原值
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// 解析截止日期
///
/// 接受 `YYYY-MM-DD`，也接受完整的 ISO 8601 时间戳（取其书写的日期部分）。
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    raw.parse::<NaiveDateTime>().ok().map(|dt| dt.date())
}

/// `dueDate` 反序列化：null 和空串都视为无截止日期
fn due_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_due_date(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid dueDate: {:?}", raw))),
    }
}

/// 区分 "字段缺省" 与 "字段为 null"
fn due_date_patch<'de, D>(deserializer: D) -> std::result::Result<Option<Option<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    due_date(deserializer).map(Some)
}

/// 校验并规范化标题
fn normalize_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskflowError::invalid_data("title must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// 规范化分类：去除首尾空白，空值使用默认分类
fn normalize_category(category: Option<String>) -> String {
    category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}

impl TaskDraft {
    /// 生成新任务：completed 恒为 false，created_at 取传入时间
    pub fn into_task(self, id: u64, now: DateTime<Utc>) -> Result<Task> {
        let title = normalize_title(&self.title)?;
        let category = normalize_category(self.category);

        Ok(Task {
            id,
            title,
            category,
            priority: self.priority.unwrap_or_default(),
            due_date: self.due_date,
            completed: false,
            created_at: Some(now),
        })
    }
}

impl Task {
    /// 浅合并补丁。先完成全部校验再写入，失败时任务保持原样。
    pub fn apply(&mut self, patch: TaskPatch) -> Result<()> {
        if let Some(id) = patch.id {
            if id != self.id {
                return Err(TaskflowError::invalid_data("id is immutable"));
            }
        }
        if let Some(created_at) = patch.created_at {
            if self.created_at != Some(created_at) {
                return Err(TaskflowError::invalid_data("createdAt is immutable"));
            }
        }
        let title = patch.title.as_deref().map(normalize_title).transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(category) = patch.category {
            self.category = normalize_category(Some(category));
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        Ok(())
    }
}

/// 获取 tasks.json 文件路径
pub fn tasks_file_path(data_dir: &Path) -> PathBuf {
    data_dir.join(TASKS_FILE)
}

/// 逐条解析后的任务文件
#[derive(Debug, Default)]
pub struct LoadedTasks {
    pub tasks: Vec<Task>,
    /// 无法识别而被跳过的记录数
    pub skipped: usize,
}

/// 读取任务文件
///
/// 文件本身必须是 JSON 数组，否则返回 `JsonParse`。数组中无法识别的单条
/// 记录会被跳过并记录警告，其余记录照常加载。
pub fn read_tasks(path: &Path) -> Result<LoadedTasks> {
    let records: Vec<serde_json::Value> = super::load_json(path)?;

    let mut loaded = LoadedTasks::default();
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Task>(record) {
            Ok(task) => loaded.tasks.push(task),
            Err(e) => {
                tracing::warn!(path = %path.display(), index, error = %e, "skipping unreadable task record");
                loaded.skipped += 1;
            }
        }
    }
    Ok(loaded)
}

/// 加载任务列表（跳过无法识别的记录）
pub fn load_tasks(path: &Path) -> Result<Vec<Task>> {
    read_tasks(path).map(|loaded| loaded.tasks)
}

/// 保存任务列表
pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<()> {
    super::save_json(path, tasks)
}

/// 首次运行时的种子数据
pub fn seed_tasks(now: DateTime<Utc>) -> Vec<Task> {
    let seed = |id, title: &str, completed, priority, category: &str, due: (i32, u32, u32)| Task {
        id,
        title: title.to_string(),
        category: category.to_string(),
        priority,
        due_date: NaiveDate::from_ymd_opt(due.0, due.1, due.2),
        completed,
        created_at: Some(now),
    };

    vec![
        seed(1, "Complete web app assignment", false, Priority::High, "Study", (2025, 1, 15)),
        seed(2, "Review project documentation", true, Priority::Medium, "Work", (2025, 1, 12)),
        seed(3, "Plan weekly schedule", false, Priority::Medium, "Personal", (2025, 1, 14)),
        seed(4, "Research responsive design patterns", false, Priority::Low, "Study", (2025, 1, 20)),
    ]
}
