//! 表单向导 - 四步录入状态机
//!
//! - steps: 步骤定义与顺序
//! - fields: 草稿与字段描述（name / value / errors）
//! - validation: 逐步校验与显式字符串解析
//! - controller: 步骤导航、搜索结果同步、提交

mod controller;
mod fields;
mod steps;
mod validation;

pub use controller::{
    FormOptions, FormSnapshot, StepChange, StepFormController, SubmissionState, SubmitOutcome,
};
pub use fields::{FieldDescriptor, FieldName, MangaDraft};
pub use steps::FormStep;
pub use validation::{
    build_input, parse_chapter, parse_score, parse_title, parse_volume, validate_step,
    FieldError, ValidationRules,
};
