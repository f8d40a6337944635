//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    DeleteMangaHandler, SaveMangaHandler,
    // Query handlers
    GetCollectionStatsHandler, GetMangaHandler, ListMangaLogsHandler, SearchBooksHandler,
    // Form
    FormOptions,
    // Ports
    AuthPort, BookSearchPort, FormSessionManagerPort, MangaRepositoryPort,
};
use crate::infrastructure::events::EventPublisher;

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub manga_repo: Arc<dyn MangaRepositoryPort>,
    pub book_search: Arc<dyn BookSearchPort>,
    pub auth: Arc<dyn AuthPort>,
    pub form_sessions: Arc<dyn FormSessionManagerPort>,
    pub event_publisher: Arc<EventPublisher>,

    /// 新建表单控制器时使用的选项
    pub form_options: FormOptions,

    // ========== Command Handlers ==========
    pub save_manga_handler: SaveMangaHandler,
    pub delete_manga_handler: DeleteMangaHandler,

    // ========== Query Handlers ==========
    pub list_manga_handler: ListMangaLogsHandler,
    pub get_manga_handler: GetMangaHandler,
    pub collection_stats_handler: GetCollectionStatsHandler,
    pub search_books_handler: SearchBooksHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        manga_repo: Arc<dyn MangaRepositoryPort>,
        book_search: Arc<dyn BookSearchPort>,
        auth: Arc<dyn AuthPort>,
        form_sessions: Arc<dyn FormSessionManagerPort>,
        event_publisher: Arc<EventPublisher>,
        form_options: FormOptions,
    ) -> Self {
        Self {
            // Ports
            manga_repo: manga_repo.clone(),
            book_search: book_search.clone(),
            auth,
            form_sessions,
            event_publisher,
            form_options,

            // Command handlers
            save_manga_handler: SaveMangaHandler::new(manga_repo.clone()),
            delete_manga_handler: DeleteMangaHandler::new(manga_repo.clone()),

            // Query handlers
            list_manga_handler: ListMangaLogsHandler::new(manga_repo.clone()),
            get_manga_handler: GetMangaHandler::new(manga_repo.clone()),
            collection_stats_handler: GetCollectionStatsHandler::new(manga_repo),
            search_books_handler: SearchBooksHandler::new(book_search),
        }
    }
}
