//! HTTP Handlers

mod books;
mod form;
mod manga;
mod ping;
mod progress;
mod websocket;

pub use books::*;
pub use form::*;
pub use manga::*;
pub use ping::*;
pub use progress::*;
pub use websocket::*;
