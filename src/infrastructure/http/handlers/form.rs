//! Form Wizard HTTP Handlers
//!
//! 每个表单会话在服务端持有一个 StepFormController；
//! 提示与跳转通过 /ws/form/:form_id 推送

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::form::FieldName;
use crate::application::{
    FormSession, FormStep, GetManga, ScopedMangaSaver, StepFormController, SubmitOutcome,
};
use crate::domain::manga::{MangaId, UserId};
use crate::infrastructure::events::FormEventSink;
use crate::infrastructure::http::auth::CurrentUser;
use crate::infrastructure::http::dto::{
    ApiResponse, Empty, FormIdRequest, FormNavigationResponse, FormStateResponse,
    FormSubmitResponse, GotoStepRequest, OpenFormRequest, PickResultRequest,
    SetCompletedRequest, SetFieldRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 获取当前用户的表单会话
fn load_session(
    state: &AppState,
    user: CurrentUser,
    form_id: &str,
) -> Result<FormSession, ApiError> {
    let user = user.require()?;
    Ok(state.form_sessions.get(form_id, &user.id)?)
}

async fn form_state(session: &FormSession) -> FormStateResponse {
    FormStateResponse {
        form_id: session.id.clone(),
        state: session.controller.snapshot().await,
    }
}

/// 打开表单（新建或编辑）
pub async fn open_form(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(request): Json<OpenFormRequest>,
) -> Result<Json<ApiResponse<FormStateResponse>>, ApiError> {
    let user = user.require()?;

    let existing = match request.manga_id {
        Some(id) => Some(
            state
                .get_manga_handler
                .handle(GetManga {
                    user: Some(user.id.clone()),
                    manga_id: MangaId::from_uuid(id),
                })
                .await?
                .record,
        ),
        None => None,
    };

    let form_id = FormSession::generate_id();
    let saver = Arc::new(ScopedMangaSaver::new(
        state.save_manga_handler.clone(),
        Some(user.id.clone()),
    ));
    let sink = Arc::new(FormEventSink::new(state.event_publisher.clone(), form_id.clone()));
    let controller = StepFormController::new(
        existing.as_ref(),
        saver,
        sink.clone(),
        sink,
        state.form_options.clone(),
    );

    let session = FormSession::new(form_id.clone(), user.id.clone(), Arc::new(controller));
    state.form_sessions.create(session.clone())?;
    // 通道随会话存在，WebSocket 可稍后订阅
    drop(state.event_publisher.register_form(&form_id));

    tracing::info!(
        form_id = %form_id,
        user_id = %user.id,
        edit = existing.is_some(),
        "Form opened"
    );

    Ok(Json(ApiResponse::success(form_state(&session).await)))
}

/// 获取表单状态
pub async fn get_form_state(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(request): Json<FormIdRequest>,
) -> Result<Json<ApiResponse<FormStateResponse>>, ApiError> {
    let session = load_session(&state, user, &request.form_id)?;
    Ok(Json(ApiResponse::success(form_state(&session).await)))
}

/// 更新文本字段
pub async fn set_form_field(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(request): Json<SetFieldRequest>,
) -> Result<Json<ApiResponse<FormStateResponse>>, ApiError> {
    let session = load_session(&state, user, &request.form_id)?;
    let field = FieldName::from_str(&request.field)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown field: {}", request.field)))?;

    session.controller.set_field(field, request.value).await;
    Ok(Json(ApiResponse::success(form_state(&session).await)))
}

/// 更新完成状态
pub async fn set_form_completed(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(request): Json<SetCompletedRequest>,
) -> Result<Json<ApiResponse<FormStateResponse>>, ApiError> {
    let session = load_session(&state, user, &request.form_id)?;
    session.controller.set_completed(request.completed).await;
    Ok(Json(ApiResponse::success(form_state(&session).await)))
}

/// 下一步
pub async fn next_step(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(request): Json<FormIdRequest>,
) -> Result<Json<ApiResponse<FormNavigationResponse>>, ApiError> {
    let session = load_session(&state, user, &request.form_id)?;
    let change = session.controller.go_next().await;
    Ok(Json(ApiResponse::success(FormNavigationResponse {
        change: change.into(),
        form: form_state(&session).await,
    })))
}

/// 上一步
pub async fn previous_step(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(request): Json<FormIdRequest>,
) -> Result<Json<ApiResponse<FormNavigationResponse>>, ApiError> {
    let session = load_session(&state, user, &request.form_id)?;
    let change = session.controller.go_previous().await;
    Ok(Json(ApiResponse::success(FormNavigationResponse {
        change: change.into(),
        form: form_state(&session).await,
    })))
}

/// 跳转到指定步骤（1..=4）
pub async fn goto_step(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(request): Json<GotoStepRequest>,
) -> Result<Json<ApiResponse<FormNavigationResponse>>, ApiError> {
    let session = load_session(&state, user, &request.form_id)?;
    let step = FormStep::from_number(request.step)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid step: {}", request.step)))?;

    let change = session.controller.go_to_step(step).await;
    Ok(Json(ApiResponse::success(FormNavigationResponse {
        change: change.into(),
        form: form_state(&session).await,
    })))
}

/// 选择书目检索结果
pub async fn pick_search_result(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(request): Json<PickResultRequest>,
) -> Result<Json<ApiResponse<FormStateResponse>>, ApiError> {
    let session = load_session(&state, user, &request.form_id)?;
    session
        .controller
        .select_search_result(&request.title, request.thumbnail.as_deref())
        .await;
    Ok(Json(ApiResponse::success(form_state(&session).await)))
}

/// 提交表单
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(request): Json<FormIdRequest>,
) -> Result<Json<ApiResponse<FormSubmitResponse>>, ApiError> {
    let session = load_session(&state, user, &request.form_id)?;
    let outcome = session.controller.submit().await;

    let mut response = FormSubmitResponse {
        outcome: "saved",
        created: None,
        manga_id: None,
        message: None,
        errors: Vec::new(),
        form: form_state(&session).await,
    };

    match outcome {
        SubmitOutcome::Saved(saved) => {
            let record = &saved.record;
            state.event_publisher.publish_manga_saved(
                record.id,
                &record.user_id,
                record.title.as_str(),
                saved.created,
            );
            response.created = Some(saved.created);
            response.manga_id = Some(*record.id.as_uuid());
        }
        SubmitOutcome::InFlight => response.outcome = "in_flight",
        SubmitOutcome::Invalid(errors) => {
            response.outcome = "invalid";
            response.errors = errors;
        }
        SubmitOutcome::Failed(error) => {
            response.outcome = "failed";
            response.message = Some(error.to_string());
        }
    }

    Ok(Json(ApiResponse::success(response)))
}

/// 关闭表单
pub async fn close_form(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(request): Json<FormIdRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let session = load_session(&state, user, &request.form_id)?;
    close_session(&state, &session.id, &session.user_id)?;
    Ok(Json(ApiResponse::ok()))
}

fn close_session(state: &AppState, form_id: &str, user_id: &UserId) -> Result<(), ApiError> {
    state.form_sessions.close(form_id)?;
    state.event_publisher.publish_form_closed(form_id, "closed");
    state.event_publisher.unregister_form(form_id);
    tracing::info!(form_id = %form_id, user_id = %user_id, "Form closed");
    Ok(())
}
