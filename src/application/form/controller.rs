//! Step Form Controller
//!
//! 四步向导状态机：
//! - 前进 / 跳转前校验当前步骤，失败时停留并标注字段错误
//! - 后退不校验
//! - 搜索结果选择同时覆盖标题与缩略图，不改变步骤
//! - 同一时间最多一个提交在途，在途期间的提交请求被拒绝

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::validation::{build_input, parse_chapter, parse_volume, validate_step};
use super::{FieldError, FieldName, FormStep, MangaDraft, ValidationRules};
use crate::application::ports::{
    MangaSavePort, NavigatorPort, NotificationKind, NotifierPort, SaveOutcome, SubmissionError,
};
use crate::domain::manga::{normalize_https, MangaRecord};
use crate::domain::reading_progress::{
    reading_achievement, reading_progress, Achievement, ProgressInfo,
};

/// 控制器选项
#[derive(Debug, Clone)]
pub struct FormOptions {
    pub rules: ValidationRules,
    /// 保存成功后跳转前的等待时间（留给成功提示展示）
    pub redirect_delay: Duration,
    /// 单次提交超时
    pub submit_timeout: Duration,
    /// 保存成功后的跳转路径
    pub return_path: String,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            rules: ValidationRules::default(),
            redirect_delay: Duration::from_millis(1500),
            submit_timeout: Duration::from_secs(30),
            return_path: "/manga".to_string(),
        }
    }
}

/// 提交状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Submitting,
    Succeeded,
    Failed { message: String },
}

impl SubmissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Submitting => "submitting",
            SubmissionState::Succeeded => "succeeded",
            SubmissionState::Failed { .. } => "failed",
        }
    }
}

/// 步骤导航结果
#[derive(Debug, Clone, PartialEq)]
pub enum StepChange {
    Moved { from: FormStep, to: FormStep },
    Unchanged,
    Blocked { step: FormStep, errors: Vec<FieldError> },
}

/// 提交结果
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Saved(SaveOutcome),
    /// 已有提交在途，本次被拒绝
    InFlight,
    Invalid(Vec<FieldError>),
    Failed(SubmissionError),
}

/// 控制器快照（用于展示）
#[derive(Debug, Clone, Serialize)]
pub struct FormSnapshot {
    pub current_step: FormStep,
    pub step_number: u8,
    pub step_title: &'static str,
    pub step_description: &'static str,
    pub step_progress: f64,
    /// 最后一步显示提交按钮而非“下一步”
    pub is_last_step: bool,
    /// 存在字段错误的步骤（升序）
    pub invalid_steps: Vec<FormStep>,
    pub is_edit: bool,
    pub draft: MangaDraft,
    pub submission: SubmissionState,
    pub submit_enabled: bool,
    pub preview: ProgressInfo,
    pub achievement: Achievement,
}

struct FormState {
    current_step: FormStep,
    draft: MangaDraft,
    submission: SubmissionState,
}

impl FormState {
    fn initial(existing: Option<&MangaRecord>) -> Self {
        Self {
            current_step: FormStep::BasicInfo,
            draft: existing.map(MangaDraft::from_record).unwrap_or_default(),
            submission: SubmissionState::Idle,
        }
    }

    /// 校验当前步骤并把错误写回字段
    fn validate_current(&mut self, rules: &ValidationRules) -> Vec<FieldError> {
        let step = self.current_step;
        let errors = validate_step(step, &self.draft, rules);
        self.draft.clear_step_errors(step);
        self.mark_errors(&errors);
        errors
    }

    fn mark_errors(&mut self, errors: &[FieldError]) {
        for error in errors {
            self.draft.field_mut(error.field).errors.push(error.message.clone());
        }
    }
}

/// 四步表单控制器
pub struct StepFormController {
    state: Mutex<FormState>,
    saver: Arc<dyn MangaSavePort>,
    notifier: Arc<dyn NotifierPort>,
    navigator: Arc<dyn NavigatorPort>,
    options: FormOptions,
}

impl StepFormController {
    /// 创建控制器；`existing` 为 Some 时进入编辑模式
    pub fn new(
        existing: Option<&MangaRecord>,
        saver: Arc<dyn MangaSavePort>,
        notifier: Arc<dyn NotifierPort>,
        navigator: Arc<dyn NavigatorPort>,
        options: FormOptions,
    ) -> Self {
        Self {
            state: Mutex::new(FormState::initial(existing)),
            saver,
            notifier,
            navigator,
            options,
        }
    }

    /// 重置草稿并回到第一步
    pub async fn initialize(&self, existing: Option<&MangaRecord>) {
        let mut state = self.state.lock().await;
        *state = FormState::initial(existing);
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub async fn current_step(&self) -> FormStep {
        self.state.lock().await.current_step
    }

    pub async fn draft(&self) -> MangaDraft {
        self.state.lock().await.draft.clone()
    }

    pub async fn submission_state(&self) -> SubmissionState {
        self.state.lock().await.submission.clone()
    }

    /// 提交按钮是否可用
    pub async fn is_submit_enabled(&self) -> bool {
        self.state.lock().await.submission != SubmissionState::Submitting
    }

    /// 更新文本字段，清除该字段旧错误
    pub async fn set_field(&self, name: FieldName, value: impl Into<String>) {
        let mut state = self.state.lock().await;
        let field = state.draft.field_mut(name);
        field.value = value.into();
        field.errors.clear();
    }

    pub async fn set_completed(&self, completed: bool) {
        self.state.lock().await.draft.is_completed = completed;
    }

    /// 下一步
    pub async fn go_next(&self) -> StepChange {
        let mut state = self.state.lock().await;
        let from = state.current_step;

        let errors = state.validate_current(&self.options.rules);
        if !errors.is_empty() {
            tracing::debug!(step = from.number(), errors = errors.len(), "Step validation failed");
            return StepChange::Blocked { step: from, errors };
        }

        match from.next() {
            Some(to) => {
                state.current_step = to;
                tracing::debug!(from = from.number(), to = to.number(), "Form step changed");
                StepChange::Moved { from, to }
            }
            None => StepChange::Unchanged,
        }
    }

    /// 上一步（不校验）
    pub async fn go_previous(&self) -> StepChange {
        let mut state = self.state.lock().await;
        let from = state.current_step;

        match from.previous() {
            Some(to) => {
                state.current_step = to;
                tracing::debug!(from = from.number(), to = to.number(), "Form step changed");
                StepChange::Moved { from, to }
            }
            None => StepChange::Unchanged,
        }
    }

    /// 跳转到指定步骤（校验离开的步骤，不限相邻）
    pub async fn go_to_step(&self, target: FormStep) -> StepChange {
        let mut state = self.state.lock().await;
        let from = state.current_step;
        if target == from {
            return StepChange::Unchanged;
        }

        let errors = state.validate_current(&self.options.rules);
        if !errors.is_empty() {
            tracing::debug!(step = from.number(), target = target.number(), "Step jump blocked");
            return StepChange::Blocked { step: from, errors };
        }

        state.current_step = target;
        tracing::debug!(from = from.number(), to = target.number(), "Form step changed");
        StepChange::Moved { from, to: target }
    }

    /// 从书目检索结果回填标题与缩略图
    pub async fn select_search_result(&self, title: &str, thumbnail: Option<&str>) {
        let mut state = self.state.lock().await;
        state.draft.title.value = title.to_string();
        state.draft.title.errors.clear();
        state.draft.thumbnail = thumbnail
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(normalize_https);

        tracing::debug!(title = %title, has_thumbnail = state.draft.thumbnail.is_some(), "Search result selected");
    }

    /// 提交草稿
    ///
    /// 先校验全部步骤；失败时跳到第一个出错步骤且不调用持久化。
    pub async fn submit(&self) -> SubmitOutcome {
        let input = {
            let mut state = self.state.lock().await;
            if state.submission == SubmissionState::Submitting {
                tracing::debug!("Submit rejected: submission already in flight");
                return SubmitOutcome::InFlight;
            }

            match build_input(&state.draft, &self.options.rules) {
                Ok(input) => {
                    state.submission = SubmissionState::Submitting;
                    input
                }
                Err(errors) => {
                    for step in FormStep::ALL {
                        state.draft.clear_step_errors(step);
                    }
                    state.mark_errors(&errors);
                    if let Some(first) = errors.first() {
                        state.current_step = first.field.step();
                    }
                    tracing::debug!(errors = errors.len(), "Submit blocked by validation");
                    return SubmitOutcome::Invalid(errors);
                }
            }
        };

        let result =
            match tokio::time::timeout(self.options.submit_timeout, self.saver.save(input)).await {
                Ok(result) => result,
                Err(_) => Err(SubmissionError::Timeout),
            };

        let mut state = self.state.lock().await;
        match result {
            Ok(outcome) => {
                state.submission = SubmissionState::Succeeded;
                state.draft.id = Some(outcome.record.id);
                drop(state);

                let message = if outcome.created {
                    format!("Added \"{}\" to your collection!", outcome.record.title)
                } else {
                    format!("Updated \"{}\" successfully!", outcome.record.title)
                };
                tracing::info!(
                    manga_id = %outcome.record.id,
                    created = outcome.created,
                    "Form submitted"
                );
                self.notifier.notify(NotificationKind::Success, &message);
                self.schedule_navigation();

                SubmitOutcome::Saved(outcome)
            }
            Err(error) => {
                let message = error.to_string();
                state.submission = SubmissionState::Failed {
                    message: message.clone(),
                };
                drop(state);

                tracing::warn!(error = %message, "Form submission failed");
                self.notifier.notify(NotificationKind::Error, &message);

                SubmitOutcome::Failed(error)
            }
        }
    }

    /// 延迟跳转，让成功提示先展示
    fn schedule_navigation(&self) {
        let navigator = self.navigator.clone();
        let path = self.options.return_path.clone();
        let delay = self.options.redirect_delay;

        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            navigator.navigate(&path);
        });
    }

    pub async fn snapshot(&self) -> FormSnapshot {
        let state = self.state.lock().await;
        let step = state.current_step;

        let volume = parse_volume(&state.draft.volume_progress.value)
            .ok()
            .flatten();
        let chapter = parse_chapter(
            &state.draft.chapter_progress.value,
            self.options.rules.chapter_precision,
        )
        .ok()
        .flatten();

        FormSnapshot {
            current_step: step,
            step_number: step.number(),
            step_title: step.title(),
            step_description: step.description(),
            step_progress: step.progress_percent(),
            is_last_step: step.is_last(),
            invalid_steps: state.draft.invalid_steps(),
            is_edit: state.draft.id.is_some(),
            draft: state.draft.clone(),
            submission: state.submission.clone(),
            submit_enabled: state.submission != SubmissionState::Submitting,
            preview: reading_progress(volume, chapter),
            achievement: reading_achievement(volume, chapter),
        }
    }
}
