//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping               GET   健康检查
//! - /api/manga/list         GET   列出当前用户的记录（search / status / sort）
//! - /api/manga/get          POST  获取单条记录
//! - /api/manga/save         POST  新建或更新记录
//! - /api/manga/delete       POST  删除记录
//! - /api/manga/stats        GET   收藏统计
//! - /api/progress           POST  进度分类
//! - /api/books/search       GET   漫画书目检索
//! - /api/form/open          POST  打开表单向导（新建 / 编辑）
//! - /api/form/state         POST  获取表单状态
//! - /api/form/field         POST  更新文本字段
//! - /api/form/completed     POST  更新完成状态
//! - /api/form/next          POST  下一步
//! - /api/form/previous      POST  上一步
//! - /api/form/goto          POST  跳转到指定步骤
//! - /api/form/pick          POST  选择检索结果
//! - /api/form/submit        POST  提交
//! - /api/form/close         POST  关闭表单
//! - /ws/events              WS    当前用户的收藏变更事件
//! - /ws/form/{form_id}      WS    表单会话事件（提示 / 跳转）

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/form/:form_id", get(handlers::form_websocket_handler))
        .route("/ws/events", get(handlers::global_websocket_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/progress", post(handlers::classify_progress))
        .route("/books/search", get(handlers::search_books))
        .nest("/manga", manga_routes())
        .nest("/form", form_routes())
}

/// Manga 路由
fn manga_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/list", get(handlers::list_manga))
        .route("/get", post(handlers::get_manga))
        .route("/save", post(handlers::save_manga))
        .route("/delete", post(handlers::delete_manga))
        .route("/stats", get(handlers::collection_stats))
}

/// Form 路由
fn form_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/open", post(handlers::open_form))
        .route("/state", post(handlers::get_form_state))
        .route("/field", post(handlers::set_form_field))
        .route("/completed", post(handlers::set_form_completed))
        .route("/next", post(handlers::next_step))
        .route("/previous", post(handlers::previous_step))
        .route("/goto", post(handlers::goto_step))
        .route("/pick", post(handlers::pick_search_result))
        .route("/submit", post(handlers::submit_form))
        .route("/close", post(handlers::close_form))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{BookHit, BookSearchError, BookSearchPort, FormOptions};
    use crate::domain::manga::UserId;
    use crate::infrastructure::http::server::{HttpServer, ServerConfig};
    use crate::infrastructure::memory::{InMemoryAuthStore, InMemoryFormSessionManager};
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteMangaRepository,
    };
    use crate::infrastructure::EventPublisher;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::util::ServiceExt;

    struct FakeBooks;

    #[async_trait]
    impl BookSearchPort for FakeBooks {
        async fn search(&self, query: &str) -> Result<Vec<BookHit>, BookSearchError> {
            Ok(vec![BookHit {
                id: "vol-1".to_string(),
                title: format!("{}, Vol. 1", query),
                authors: vec!["Someone".to_string()],
                thumbnail: Some("https://books/vol-1.png".to_string()),
                published_date: None,
            }])
        }
    }

    async fn app() -> Router {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let auth = InMemoryAuthStore::new();
        auth.issue("t1", UserId::new("u1"), "Alice");
        auth.issue("t2", UserId::new("u2"), "Bob");

        let state = AppState::new(
            Arc::new(SqliteMangaRepository::new(pool)),
            Arc::new(FakeBooks),
            Arc::new(auth),
            Arc::new(InMemoryFormSessionManager::new()),
            Arc::new(EventPublisher::new()),
            FormOptions {
                redirect_delay: Duration::ZERO,
                ..FormOptions::default()
            },
        );
        HttpServer::new(ServerConfig::default(), state).build_router()
    }

    async fn call(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Value {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn post(app: &Router, uri: &str, token: Option<&str>, body: Value) -> Value {
        call(app, Method::POST, uri, token, Some(body)).await
    }

    async fn get(app: &Router, uri: &str, token: Option<&str>) -> Value {
        call(app, Method::GET, uri, token, None).await
    }

    #[tokio::test]
    async fn test_ping() {
        let app = app().await;
        let body = get(&app, "/api/ping", None).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "mangalog");
    }

    #[tokio::test]
    async fn test_anonymous_access() {
        let app = app().await;

        let body = get(&app, "/api/manga/list", None).await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"], json!([]));

        let body = get(&app, "/api/manga/stats", None).await;
        assert_eq!(body["data"]["total"], 0);

        let body = post(&app, "/api/manga/save", None, json!({"title": "Naruto"})).await;
        assert_eq!(body["errno"], 401);

        let body = post(&app, "/api/form/open", None, json!({})).await;
        assert_eq!(body["errno"], 401);
    }

    #[tokio::test]
    async fn test_manga_crud() {
        let app = app().await;

        let body = post(
            &app,
            "/api/manga/save",
            Some("t1"),
            json!({"title": "Vinland Saga", "score": 4.5, "volume_progress": 6, "is_completed": true}),
        )
        .await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["created"], true);
        let id = body["data"]["manga"]["id"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["manga"]["progress"]["stage"], "intermediate");

        let body = post(&app, "/api/manga/save", Some("t1"), json!({"title": "  "})).await;
        assert_eq!(body["errno"], 400);
        assert_eq!(body["error"], "Title is required");

        let body = post(&app, "/api/manga/save", Some("t1"), json!({"title": "X", "score": 9})).await;
        assert_eq!(body["errno"], 400);

        let body = post(
            &app,
            "/api/manga/save",
            Some("t2"),
            json!({"id": id, "title": "Stolen"}),
        )
        .await;
        assert_eq!(body["errno"], 404);

        let body = get(&app, "/api/manga/list?sort=title&status=completed&search=vin", Some("t1")).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["title"], "Vinland Saga");

        let body = get(&app, "/api/manga/stats", Some("t1")).await;
        assert_eq!(body["data"]["completed"], 1);
        assert_eq!(body["data"]["avg_score"], 4.5);

        let body = post(&app, "/api/manga/get", Some("t1"), json!({"id": id})).await;
        assert_eq!(body["data"]["achievement"]["text"], "Dedicated Reader");

        let body = post(&app, "/api/manga/delete", Some("t2"), json!({"id": id})).await;
        assert_eq!(body["errno"], 403);

        let body = post(&app, "/api/manga/delete", Some("t1"), json!({"id": id})).await;
        assert_eq!(body["errno"], 0);

        let body = get(&app, "/api/manga/list", Some("t1")).await;
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn test_progress_and_book_search() {
        let app = app().await;

        let body = post(&app, "/api/progress", None, json!({"chapter_progress": 320})).await;
        assert_eq!(body["data"]["progress"]["stage"], "expert");
        assert_eq!(body["data"]["progress"]["volume_text"], "Chapter 320");

        let body = get(&app, "/api/books/search?q=Akira", None).await;
        assert_eq!(body["data"][0]["title"], "Akira, Vol. 1");

        let body = get(&app, "/api/books/search?q=%20", None).await;
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn test_form_wizard_flow() {
        let app = app().await;

        let body = post(&app, "/api/form/open", Some("t1"), json!({})).await;
        let form_id = body["data"]["form_id"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["step_number"], 1);
        assert_eq!(body["data"]["is_edit"], false);

        let body = post(&app, "/api/form/next", Some("t1"), json!({"form_id": form_id})).await;
        assert_eq!(body["data"]["change"]["moved"], false);
        assert_eq!(body["data"]["change"]["errors"][0]["field"], "title");
        assert_eq!(body["data"]["draft"]["title"]["errors"][0], "Title is required");
        assert_eq!(body["data"]["invalid_steps"], json!(["basic_info"]));

        let body = post(
            &app,
            "/api/form/pick",
            Some("t1"),
            json!({"form_id": form_id, "title": "Naruto", "thumbnail": "http://x/img.png"}),
        )
        .await;
        assert_eq!(body["data"]["draft"]["thumbnail"], "https://x/img.png");
        assert_eq!(body["data"]["step_number"], 1);

        let body = post(&app, "/api/form/next", Some("t1"), json!({"form_id": form_id})).await;
        assert_eq!(body["data"]["change"]["to"], 2);

        let body = post(
            &app,
            "/api/form/field",
            Some("t1"),
            json!({"form_id": form_id, "field": "score", "value": "4"}),
        )
        .await;
        assert_eq!(body["data"]["draft"]["score"]["value"], "4");

        let body = post(
            &app,
            "/api/form/field",
            Some("t1"),
            json!({"form_id": form_id, "field": "status", "value": "x"}),
        )
        .await;
        assert_eq!(body["errno"], 400);

        let body = post(&app, "/api/form/goto", Some("t1"), json!({"form_id": form_id, "step": 9})).await;
        assert_eq!(body["errno"], 400);

        let body = post(&app, "/api/form/state", Some("t2"), json!({"form_id": form_id})).await;
        assert_eq!(body["errno"], 403);

        let body = post(&app, "/api/form/submit", Some("t1"), json!({"form_id": form_id})).await;
        assert_eq!(body["data"]["outcome"], "saved");
        assert_eq!(body["data"]["created"], true);
        assert_eq!(body["data"]["submission"]["state"], "succeeded");

        let body = get(&app, "/api/manga/list", Some("t1")).await;
        assert_eq!(body["data"][0]["title"], "Naruto");
        assert_eq!(body["data"][0]["thumbnail"], "https://x/img.png");
        assert_eq!(body["data"][0]["score"], 4.0);

        let body = post(&app, "/api/form/close", Some("t1"), json!({"form_id": form_id})).await;
        assert_eq!(body["errno"], 0);

        let body = post(&app, "/api/form/state", Some("t1"), json!({"form_id": form_id})).await;
        assert_eq!(body["errno"], 404);
    }

    #[tokio::test]
    async fn test_form_edit_existing_record() {
        let app = app().await;

        let body = post(&app, "/api/manga/save", Some("t1"), json!({"title": "Monster"})).await;
        let id = body["data"]["manga"]["id"].as_str().unwrap().to_string();

        let body = post(&app, "/api/form/open", Some("t2"), json!({"manga_id": id})).await;
        assert_eq!(body["errno"], 404);

        let body = post(&app, "/api/form/open", Some("t1"), json!({"manga_id": id})).await;
        assert_eq!(body["data"]["is_edit"], true);
        assert_eq!(body["data"]["draft"]["title"]["value"], "Monster");
        let form_id = body["data"]["form_id"].as_str().unwrap().to_string();

        let body = post(&app, "/api/form/submit", Some("t1"), json!({"form_id": form_id})).await;
        assert_eq!(body["data"]["outcome"], "saved");
        assert_eq!(body["data"]["created"], false);
        assert_eq!(body["data"]["manga_id"], id);
    }
}
