//! Book Search Query Handler

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{BookHit, BookSearchPort};
use crate::application::queries::SearchBooks;

/// SearchBooks Handler
pub struct SearchBooksHandler {
    book_search: Arc<dyn BookSearchPort>,
}

impl SearchBooksHandler {
    pub fn new(book_search: Arc<dyn BookSearchPort>) -> Self {
        Self { book_search }
    }

    pub async fn handle(&self, query: SearchBooks) -> Result<Vec<BookHit>, ApplicationError> {
        let term = query.query.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let hits = self.book_search.search(term).await?;
        tracing::info!(query = %term, hits = hits.len(), "Book search completed");
        Ok(hits)
    }
}
