//! Worker Layer - Background Task Processing
//!
//! 实现 FormSweeper，定期回收闲置的表单会话

mod form_sweeper;

pub use form_sweeper::{FormSweeper, FormSweeperConfig};
