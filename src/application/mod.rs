//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Repository、BookSearch、Auth、Notifier/Navigator、FormSessions）
//! - form: 四步表单控制器（校验、步骤导航、提交）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod form;
pub mod ports;
pub mod queries;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use commands::{
    handlers::{DeleteMangaHandler, SaveMangaHandler, ScopedMangaSaver},
    DeleteManga, SaveManga,
};

pub use error::ApplicationError;

pub use form::{
    FieldName, FormOptions, FormSnapshot, FormStep, StepChange, StepFormController,
    SubmissionState, SubmitOutcome, ValidationRules,
};

pub use ports::{
    AuthPort, AuthUser, BookHit, BookSearchError, BookSearchPort, FormSession, FormSessionError,
    FormSessionManagerPort, MangaRepositoryPort, MangaSavePort, NavigatorPort, NotificationKind,
    NotifierPort, RepositoryError, SaveOutcome, SubmissionError,
};

pub use queries::{
    handlers::{
        CollectionStats, GetCollectionStatsHandler, GetMangaHandler, ListMangaLogsHandler,
        MangaView, SearchBooksHandler,
    },
    GetCollectionStats, GetManga, ListMangaLogs, SearchBooks, SortBy, StatusFilter,
};
