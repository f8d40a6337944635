//! Notifier / Navigator Ports
//!
//! 表单控制器的副作用出口：提示消息与页面跳转，均为 fire-and-forget

use serde::Serialize;

/// 提示类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
        }
    }
}

/// Notifier Port
pub trait NotifierPort: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str);
}

/// Navigator Port
pub trait NavigatorPort: Send + Sync {
    fn navigate(&self, path: &str);
}
