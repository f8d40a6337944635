//! Form Sweeper - 回收闲置的表单会话

use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::FormSessionManagerPort;
use crate::infrastructure::events::EventPublisher;

/// Sweeper 配置
#[derive(Debug, Clone)]
pub struct FormSweeperConfig {
    /// 扫描间隔
    pub interval: Duration,
    /// 闲置超过该秒数的会话被关闭
    pub idle_timeout_secs: u64,
}

impl Default for FormSweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            idle_timeout_secs: 1800,
        }
    }
}

/// 表单会话回收 Worker
pub struct FormSweeper {
    config: FormSweeperConfig,
    form_sessions: Arc<dyn FormSessionManagerPort>,
    event_publisher: Arc<EventPublisher>,
}

impl FormSweeper {
    pub fn new(
        config: FormSweeperConfig,
        form_sessions: Arc<dyn FormSessionManagerPort>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            config,
            form_sessions,
            event_publisher,
        }
    }

    /// 启动 Worker
    pub async fn run(self) {
        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            idle_timeout_secs = self.config.idle_timeout_secs,
            "FormSweeper started"
        );

        let mut ticker = tokio::time::interval(self.config.interval);
        // 第一次 tick 立即返回
        ticker.tick().await;

        loop {
            ticker.tick().await;
            self.sweep_once();
        }
    }

    /// 执行一次回收，返回关闭的会话数
    pub fn sweep_once(&self) -> usize {
        let expired = self
            .form_sessions
            .get_expired_sessions(self.config.idle_timeout_secs);

        let mut closed = 0;
        for form_id in expired {
            if self.form_sessions.close(&form_id).is_ok() {
                self.event_publisher.publish_form_closed(&form_id, "expired");
                self.event_publisher.unregister_form(&form_id);
                closed += 1;
            }
        }

        if closed > 0 {
            tracing::info!(closed, "Expired form sessions swept");
        }
        closed
    }
}
