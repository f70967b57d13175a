//! 应用配置持久化

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, TaskflowError};

/// 未配置 API key 时 `.env` 模板中的占位值
const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// 前端静态文件目录（为空则只提供 API）
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

/// 天气服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key（为空则使用合成数据）
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_city")]
    pub default_city: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_city() -> String {
    "London".to_string()
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_city: default_city(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl WeatherConfig {
    /// 有效的 API key：空串和占位值视为未配置
    pub fn effective_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && *k != PLACEHOLDER_API_KEY)
    }
}

/// 获取配置文件路径
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// 加载配置（不存在或解析失败则返回默认值）
pub fn load_config(data_dir: &Path) -> Config {
    let path = config_path(data_dir);
    if !path.exists() {
        return Config::default();
    }
    match super::load_toml(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
            Config::default()
        }
    }
}

/// 用环境变量覆盖配置（WEATHER_API_KEY / HOST / PORT）
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(key) = lookup("WEATHER_API_KEY") {
        config.weather.api_key = Some(key);
    }
    if let Some(host) = lookup("HOST").filter(|h| !h.trim().is_empty()) {
        config.server.host = host;
    }
    if let Some(port) = lookup("PORT") {
        match port.trim().parse() {
            Ok(p) => config.server.port = p,
            Err(_) => tracing::warn!(%port, "PORT is not a valid port number, ignoring"),
        }
    }
}

/// 保存配置
pub fn save_config(data_dir: &Path, config: &Config) -> Result<()> {
    fs::create_dir_all(data_dir)?;

    let content = toml::to_string_pretty(config)
        .map_err(|e| TaskflowError::storage(format!("cannot serialize config: {}", e)))?;
    fs::write(config_path(data_dir), content)?;
    Ok(())
}
