//! Configuration Module
//!
//! 多层级配置来源：环境变量 > 配置文件（TOML）> 默认值

mod loader;
mod types;

pub use loader::{load_config, load_config_from_path, print_config, ConfigError};
pub use types::{
    AppConfig, AuthConfig, BooksConfig, DatabaseConfig, FormConfig, LogConfig, ServerConfig,
    TokenConfig,
};
