//! Form Steps

use serde::Serialize;

/// 向导步骤，全序，1..=4
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStep {
    BasicInfo = 1,
    RatingStatus = 2,
    Progress = 3,
    Notes = 4,
}

impl FormStep {
    pub const ALL: [FormStep; 4] = [
        FormStep::BasicInfo,
        FormStep::RatingStatus,
        FormStep::Progress,
        FormStep::Notes,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|step| step.number() == n)
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    pub fn is_last(self) -> bool {
        self == FormStep::Notes
    }

    pub fn title(self) -> &'static str {
        match self {
            FormStep::BasicInfo => "Basic Info",
            FormStep::RatingStatus => "Rating & Status",
            FormStep::Progress => "Progress",
            FormStep::Notes => "Notes",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            FormStep::BasicInfo => "Title and basic details",
            FormStep::RatingStatus => "Score and completion status",
            FormStep::Progress => "Reading progress tracking",
            FormStep::Notes => "Personal notes and thoughts",
        }
    }

    /// 向导整体进度百分比
    pub fn progress_percent(self) -> f64 {
        f64::from(self.number()) / Self::ALL.len() as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order() {
        assert_eq!(FormStep::BasicInfo.next(), Some(FormStep::RatingStatus));
        assert_eq!(FormStep::Notes.next(), None);
        assert_eq!(FormStep::BasicInfo.previous(), None);
        assert_eq!(FormStep::Notes.previous(), Some(FormStep::Progress));
        assert!(FormStep::BasicInfo < FormStep::Notes);
    }

    #[test]
    fn test_from_number() {
        assert_eq!(FormStep::from_number(3), Some(FormStep::Progress));
        assert_eq!(FormStep::from_number(0), None);
        assert_eq!(FormStep::from_number(5), None);
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(FormStep::BasicInfo.progress_percent(), 25.0);
        assert_eq!(FormStep::Notes.progress_percent(), 100.0);
    }
}
