//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::time::Duration;

use crate::application::{FormOptions, ValidationRules};
use crate::domain::manga::{ChapterPrecision, ScoreFloor};
use crate::infrastructure::adapters::GoogleBooksClientConfig;
use crate::infrastructure::worker::FormSweeperConfig;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    /// 书目检索服务
    #[serde(default)]
    pub books: BooksConfig,

    /// 表单向导
    #[serde(default)]
    pub form: FormConfig,

    /// 预置登录令牌
    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// 公开访问的 Base URL，未设置时使用 http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn public_base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            let host = if self.host == "0.0.0.0" {
                "localhost"
            } else {
                &self.host
            };
            format!("http://{}:{}", host, self.port)
        })
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite 文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/mangalog.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// sqlx 连接串（文件不存在时创建）
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.path)
    }
}

/// 书目检索配置
#[derive(Debug, Clone, Deserialize)]
pub struct BooksConfig {
    #[serde(default = "default_books_url")]
    pub url: String,

    #[serde(default = "default_books_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

fn default_books_url() -> String {
    "https://www.googleapis.com/books/v1/volumes".to_string()
}

fn default_books_timeout() -> u64 {
    10
}

fn default_max_results() -> u32 {
    20
}

impl Default for BooksConfig {
    fn default() -> Self {
        Self {
            url: default_books_url(),
            timeout_secs: default_books_timeout(),
            max_results: default_max_results(),
        }
    }
}

impl BooksConfig {
    pub fn client_config(&self) -> GoogleBooksClientConfig {
        GoogleBooksClientConfig {
            base_url: self.url.clone(),
            timeout_secs: self.timeout_secs,
            max_results: self.max_results,
        }
    }
}

/// 表单向导配置
#[derive(Debug, Clone, Deserialize)]
pub struct FormConfig {
    /// 评分下限（0 或 1）
    #[serde(default)]
    pub score_min: u8,

    #[serde(default)]
    pub chapter_precision: ChapterPrecision,

    /// 保存成功后跳转延迟
    #[serde(default = "default_redirect_delay")]
    pub redirect_delay_ms: u64,

    #[serde(default = "default_submit_timeout")]
    pub submit_timeout_secs: u64,

    /// 闲置多久后回收表单会话
    #[serde(default = "default_session_idle")]
    pub session_idle_secs: u64,

    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_redirect_delay() -> u64 {
    1500
}

fn default_submit_timeout() -> u64 {
    30
}

fn default_session_idle() -> u64 {
    1800
}

fn default_sweep_interval() -> u64 {
    60
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            score_min: 0,
            chapter_precision: ChapterPrecision::default(),
            redirect_delay_ms: default_redirect_delay(),
            submit_timeout_secs: default_submit_timeout(),
            session_idle_secs: default_session_idle(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

impl FormConfig {
    /// 非法下限在加载时已被拒绝，这里回退到默认值
    pub fn rules(&self) -> ValidationRules {
        ValidationRules {
            score_floor: ScoreFloor::try_from(self.score_min).unwrap_or_default(),
            chapter_precision: self.chapter_precision,
        }
    }

    pub fn options(&self) -> FormOptions {
        FormOptions {
            rules: self.rules(),
            redirect_delay: Duration::from_millis(self.redirect_delay_ms),
            submit_timeout: Duration::from_secs(self.submit_timeout_secs),
            ..FormOptions::default()
        }
    }

    pub fn sweeper(&self) -> FormSweeperConfig {
        FormSweeperConfig {
            interval: Duration::from_secs(self.sweep_interval_secs),
            idle_timeout_secs: self.session_idle_secs,
        }
    }
}

/// 登录令牌配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    pub token: String,
    pub user_id: String,
    #[serde(default)]
    pub name: String,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON 格式输出
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl LogConfig {
    /// 默认过滤规则，可被 RUST_LOG 覆盖
    pub fn filter(&self) -> String {
        format!("{0},mangalog={0},tower_http=debug", self.level)
    }
}
