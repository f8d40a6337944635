//! Memory Layer - In-Memory State Management
//!
//! 认证 token 与表单向导会话的内存状态

mod auth_sessions;
mod form_session_manager;

pub use auth_sessions::InMemoryAuthStore;
pub use form_session_manager::InMemoryFormSessionManager;
