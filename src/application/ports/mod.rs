//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod auth;
mod book_search;
mod form_sessions;
mod manga_saver;
mod notifier;
mod repositories;

pub use auth::{AuthPort, AuthUser};
pub use book_search::{BookHit, BookSearchError, BookSearchPort};
pub use form_sessions::{FormSession, FormSessionError, FormSessionManagerPort};
pub use manga_saver::{MangaSavePort, SaveOutcome, SubmissionError};
pub use notifier::{NavigatorPort, NotificationKind, NotifierPort};
pub use repositories::{MangaRepositoryPort, RepositoryError};
