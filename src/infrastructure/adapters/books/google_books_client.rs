//! Google Books Client - 调用 Google Books volumes API
//!
//! 实现 BookSearchPort trait
//!
//! 外部 API:
//! GET https://www.googleapis.com/books/v1/volumes?q=...&maxResults=20&printType=books
//! Response: {"totalItems": n, "items": [{"id": "...", "volumeInfo": {...}}]}

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::application::ports::{BookHit, BookSearchError, BookSearchPort};
use crate::domain::manga::normalize_https;

/// 保留的分类关键字（小写匹配）
const ACCEPTED_CATEGORIES: [&str; 2] = ["comics", "graphic novels"];

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
struct Volume {
    id: String,
    #[serde(rename = "volumeInfo")]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    #[serde(default)]
    title: String,
    #[serde(default)]
    authors: Vec<String>,
    #[serde(default)]
    categories: Vec<String>,
    image_links: Option<ImageLinks>,
    published_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageLinks {
    thumbnail: Option<String>,
}

impl VolumeInfo {
    fn is_comic(&self) -> bool {
        self.categories.iter().any(|category| {
            let category = category.to_lowercase();
            ACCEPTED_CATEGORIES.iter().any(|accepted| category.contains(accepted))
        })
    }
}

impl From<Volume> for BookHit {
    fn from(volume: Volume) -> Self {
        let info = volume.volume_info;
        Self {
            id: volume.id,
            title: info.title,
            authors: info.authors,
            thumbnail: info
                .image_links
                .and_then(|links| links.thumbnail)
                .map(|url| normalize_https(&url)),
            published_date: info.published_date,
        }
    }
}

/// Google Books 客户端配置
#[derive(Debug, Clone)]
pub struct GoogleBooksClientConfig {
    /// volumes 接口 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 每次检索的最大结果数
    pub max_results: u32,
}

impl Default for GoogleBooksClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/books/v1/volumes".to_string(),
            timeout_secs: 10,
            max_results: 20,
        }
    }
}

impl GoogleBooksClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Google Books 客户端
pub struct GoogleBooksClient {
    client: Client,
    config: GoogleBooksClientConfig,
}

impl GoogleBooksClient {
    pub fn new(config: GoogleBooksClientConfig) -> Result<Self, BookSearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BookSearchError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 追加漫画相关关键字以提高命中率
    fn enhanced_query(query: &str) -> String {
        format!("{} manga OR comic OR graphic novel", query)
    }

    /// 只保留漫画 / 图像小说分类
    fn filter_comics(response: VolumesResponse) -> Vec<BookHit> {
        response
            .items
            .into_iter()
            .filter(|volume| volume.volume_info.is_comic())
            .map(BookHit::from)
            .collect()
    }
}

#[async_trait]
impl BookSearchPort for GoogleBooksClient {
    async fn search(&self, query: &str) -> Result<Vec<BookHit>, BookSearchError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let q = Self::enhanced_query(query);
        let max_results = self.config.max_results.to_string();

        tracing::debug!(url = %self.config.base_url, query = %q, "Sending book search request");

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("q", q.as_str()),
                ("maxResults", max_results.as_str()),
                ("printType", "books"),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BookSearchError::Timeout
                } else if e.is_connect() {
                    BookSearchError::NetworkError(format!("Cannot connect to book service: {}", e))
                } else {
                    BookSearchError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Book search request failed");
            return Err(BookSearchError::ServiceError(status.as_u16().to_string()));
        }

        let body: VolumesResponse = response
            .json()
            .await
            .map_err(|e| BookSearchError::InvalidResponse(e.to_string()))?;

        let hits = Self::filter_comics(body);
        tracing::debug!(hits = hits.len(), "Book search response filtered");

        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = GoogleBooksClientConfig::default();
        assert_eq!(config.base_url, "https://www.googleapis.com/books/v1/volumes");
        assert_eq!(config.max_results, 20);
        assert_eq!(GoogleBooksClientConfig::new("http://x").with_timeout(3).timeout_secs, 3);
    }

    #[test]
    fn test_enhanced_query() {
        assert_eq!(
            GoogleBooksClient::enhanced_query("naruto"),
            "naruto manga OR comic OR graphic novel"
        );
    }

    #[test]
    fn test_filter_comics_and_normalize_thumbnail() {
        let body = r#"{
            "totalItems": 3,
            "items": [
                {"id": "a", "volumeInfo": {
                    "title": "Naruto, Vol. 1",
                    "authors": ["Masashi Kishimoto"],
                    "categories": ["Comics & Graphic Novels"],
                    "imageLinks": {"thumbnail": "http://books.google.com/a.jpg"},
                    "publishedDate": "2003"
                }},
                {"id": "b", "volumeInfo": {"title": "Cooking Basics", "categories": ["Cooking"]}},
                {"id": "c", "volumeInfo": {"title": "No Categories"}},
                {"id": "d", "volumeInfo": {"title": "Watchmen", "categories": ["Graphic Novels / General"]}}
            ]
        }"#;
        let response: VolumesResponse = serde_json::from_str(body).unwrap();
        let hits = GoogleBooksClient::filter_comics(response);

        let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d"]);
        assert_eq!(hits[0].thumbnail.as_deref(), Some("https://books.google.com/a.jpg"));
        assert_eq!(hits[0].authors, vec!["Masashi Kishimoto".to_string()]);
        assert_eq!(hits[1].thumbnail, None);
    }

    #[test]
    fn test_empty_response() {
        let response: VolumesResponse = serde_json::from_str(r#"{"totalItems": 0}"#).unwrap();
        assert!(GoogleBooksClient::filter_comics(response).is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_skips_request() {
        let client = GoogleBooksClient::new(GoogleBooksClientConfig::new("http://127.0.0.1:9")).unwrap();
        assert!(client.search("   ").await.unwrap().is_empty());
    }
}
