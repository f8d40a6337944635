//! Data Transfer Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::form::{FieldError, FormSnapshot};
use crate::application::{SortBy, StatusFilter, StepChange};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self::success(Empty {})
    }
}

// ============================================================================
// Manga DTOs
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ListMangaRequest {
    pub search: Option<String>,
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default)]
    pub sort: SortBy,
}

#[derive(Debug, Deserialize)]
pub struct MangaIdRequest {
    pub id: Uuid,
}

/// 直接保存（不经过表单向导）
#[derive(Debug, Deserialize)]
pub struct SaveMangaRequest {
    pub id: Option<Uuid>,
    pub title: String,
    pub score: Option<f64>,
    #[serde(default)]
    pub is_completed: bool,
    pub volume_progress: Option<u32>,
    pub chapter_progress: Option<f64>,
    pub note: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveMangaResponse<T: Serialize> {
    pub created: bool,
    pub manga: T,
}

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub volume_progress: Option<u32>,
    pub chapter_progress: Option<f64>,
}

// ============================================================================
// Book search DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct BookSearchRequest {
    #[serde(default)]
    pub q: String,
}

// ============================================================================
// Form DTOs
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct OpenFormRequest {
    /// 为空时新建，否则编辑已有记录
    pub manga_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct FormIdRequest {
    pub form_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SetFieldRequest {
    pub form_id: String,
    pub field: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct SetCompletedRequest {
    pub form_id: String,
    pub completed: bool,
}

#[derive(Debug, Deserialize)]
pub struct GotoStepRequest {
    pub form_id: String,
    pub step: u8,
}

#[derive(Debug, Deserialize)]
pub struct PickResultRequest {
    pub form_id: String,
    pub title: String,
    pub thumbnail: Option<String>,
}

/// 表单状态响应
#[derive(Debug, Serialize)]
pub struct FormStateResponse {
    pub form_id: String,
    #[serde(flatten)]
    pub state: FormSnapshot,
}

/// 步骤导航结果
#[derive(Debug, Serialize)]
pub struct StepChangeResponse {
    pub moved: bool,
    pub from: Option<u8>,
    pub to: Option<u8>,
    pub errors: Vec<FieldError>,
}

impl From<StepChange> for StepChangeResponse {
    fn from(change: StepChange) -> Self {
        match change {
            StepChange::Moved { from, to } => Self {
                moved: true,
                from: Some(from.number()),
                to: Some(to.number()),
                errors: Vec::new(),
            },
            StepChange::Unchanged => Self {
                moved: false,
                from: None,
                to: None,
                errors: Vec::new(),
            },
            StepChange::Blocked { step, errors } => Self {
                moved: false,
                from: Some(step.number()),
                to: None,
                errors,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FormNavigationResponse {
    pub change: StepChangeResponse,
    #[serde(flatten)]
    pub form: FormStateResponse,
}

/// 提交结果
#[derive(Debug, Serialize)]
pub struct FormSubmitResponse {
    /// saved | in_flight | invalid | failed
    pub outcome: &'static str,
    pub created: Option<bool>,
    pub manga_id: Option<Uuid>,
    pub message: Option<String>,
    pub errors: Vec<FieldError>,
    #[serde(flatten)]
    pub form: FormStateResponse,
}
