//! Books Adapter - 外部书目检索客户端

mod google_books_client;

pub use google_books_client::*;
