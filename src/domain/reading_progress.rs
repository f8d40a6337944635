//! 阅读进度分级
//!
//! 将卷数/话数映射为阅读阶段、阶段内百分比、展示文案与成就。
//!
//! 规则:
//! 1. 10 话折算为 1 卷（向下取整）
//! 2. 有效卷数 = max(实际卷数, 折算卷数)
//! 3. 按阶段上限升序查找第一个 `上限 >= 有效卷数` 的阶段
//! 4. 最后一个阶段无上限，进入即 100%

use serde::{Deserialize, Serialize};

/// 每卷折算话数
pub const CHAPTERS_PER_VOLUME: f64 = 10.0;

/// 阅读阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStage {
    /// 尚未开始
    None,
    Beginner,
    Intermediate,
    Advanced,
    Expert,
    Master,
}

impl ProgressStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStage::None => "none",
            ProgressStage::Beginner => "beginner",
            ProgressStage::Intermediate => "intermediate",
            ProgressStage::Advanced => "advanced",
            ProgressStage::Expert => "expert",
            ProgressStage::Master => "master",
        }
    }
}

impl std::fmt::Display for ProgressStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 阶段定义
#[derive(Debug, Clone, Copy)]
pub struct StageBand {
    pub stage: ProgressStage,
    /// 有效卷数上限（含），`None` 表示无上限
    pub upper_bound: Option<u32>,
    pub label: &'static str,
    pub color: &'static str,
}

/// 阶段表（按上限升序）
pub static STAGE_BANDS: [StageBand; 5] = [
    StageBand {
        stage: ProgressStage::Beginner,
        upper_bound: Some(5),
        label: "Quick Reader",
        color: "bg-green-500",
    },
    StageBand {
        stage: ProgressStage::Intermediate,
        upper_bound: Some(15),
        label: "Dedicated Reader",
        color: "bg-blue-500",
    },
    StageBand {
        stage: ProgressStage::Advanced,
        upper_bound: Some(30),
        label: "Manga Enthusiast",
        color: "bg-yellow-500",
    },
    StageBand {
        stage: ProgressStage::Expert,
        upper_bound: Some(50),
        label: "Manga Expert",
        color: "bg-orange-500",
    },
    StageBand {
        stage: ProgressStage::Master,
        upper_bound: None,
        label: "Manga Master",
        color: "bg-red-500",
    },
];

/// 成就徽章（按阶段下标）
static ACHIEVEMENT_EMOJIS: [&str; 5] = ["✨", "📚", "🎓", "👑", "🏆"];

const NOT_STARTED_LABEL: &str = "Not Started";
const NOT_STARTED_COLOR: &str = "bg-gray-300";
const NOT_STARTED_TEXT: &str = "Not started";
const START_READING_TEXT: &str = "Start Reading";
const START_READING_EMOJI: &str = "📖";

/// 阅读进度信息
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressInfo {
    /// 阶段内百分比 [0, 100]
    pub percentage: f64,
    pub label: &'static str,
    pub color: &'static str,
    pub volume_text: String,
    pub stage: ProgressStage,
}

/// 阅读成就
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub text: &'static str,
    pub emoji: &'static str,
}

/// 话数是否有效（非零、有限、为正）
fn has_chapters(chapter_progress: Option<f64>) -> bool {
    matches!(chapter_progress, Some(c) if c.is_finite() && c > 0.0)
}

/// 计算有效卷数
pub fn effective_volumes(volume_progress: Option<u32>, chapter_progress: Option<f64>) -> u32 {
    let from_chapters = if has_chapters(chapter_progress) {
        let chapters = chapter_progress.unwrap_or_default();
        (chapters / CHAPTERS_PER_VOLUME).floor().min(u32::MAX as f64) as u32
    } else {
        0
    };
    volume_progress.unwrap_or(0).max(from_chapters)
}

/// 查找阶段及其下标，未命中时回退到最后一个阶段
fn locate_stage(effective: u32) -> (usize, &'static StageBand) {
    STAGE_BANDS
        .iter()
        .enumerate()
        .find(|(_, band)| band.upper_bound.map_or(true, |max| effective <= max))
        .unwrap_or((STAGE_BANDS.len() - 1, &STAGE_BANDS[STAGE_BANDS.len() - 1]))
}

fn is_not_started(effective: u32, chapter_progress: Option<f64>) -> bool {
    effective == 0 && !has_chapters(chapter_progress)
}

/// 格式化进度文案
pub fn volume_text(volume_progress: Option<u32>, chapter_progress: Option<f64>) -> String {
    let volume = volume_progress.filter(|v| *v > 0);
    let chapter = chapter_progress.filter(|_| has_chapters(chapter_progress));

    match (volume, chapter) {
        (Some(v), Some(c)) => format!("Vol. {}, Ch. {}", v, c),
        (Some(1), None) => "1 volume".to_string(),
        (Some(v), None) => format!("{} volumes", v),
        (None, Some(c)) => format!("Chapter {}", c),
        (None, None) => NOT_STARTED_TEXT.to_string(),
    }
}

/// 计算阅读进度
pub fn reading_progress(volume_progress: Option<u32>, chapter_progress: Option<f64>) -> ProgressInfo {
    let effective = effective_volumes(volume_progress, chapter_progress);

    if is_not_started(effective, chapter_progress) {
        return ProgressInfo {
            percentage: 0.0,
            label: NOT_STARTED_LABEL,
            color: NOT_STARTED_COLOR,
            volume_text: NOT_STARTED_TEXT.to_string(),
            stage: ProgressStage::None,
        };
    }

    let (index, band) = locate_stage(effective);
    let previous_bound = if index > 0 {
        STAGE_BANDS[index - 1].upper_bound.unwrap_or(0)
    } else {
        0
    };

    let percentage = match band.upper_bound {
        None => 100.0,
        Some(max) => {
            let range = f64::from(max - previous_bound);
            let in_stage = f64::from(effective.saturating_sub(previous_bound));
            (in_stage / range * 100.0).min(100.0)
        }
    };

    ProgressInfo {
        percentage,
        label: band.label,
        color: band.color,
        volume_text: volume_text(volume_progress, chapter_progress),
        stage: band.stage,
    }
}

/// 计算阅读成就
pub fn reading_achievement(volume_progress: Option<u32>, chapter_progress: Option<f64>) -> Achievement {
    let effective = effective_volumes(volume_progress, chapter_progress);

    if is_not_started(effective, chapter_progress) {
        return Achievement {
            text: START_READING_TEXT,
            emoji: START_READING_EMOJI,
        };
    }

    let (index, band) = locate_stage(effective);
    let emoji = ACHIEVEMENT_EMOJIS
        .get(index)
        .copied()
        .unwrap_or(ACHIEVEMENT_EMOJIS[ACHIEVEMENT_EMOJIS.len() - 1]);

    Achievement {
        text: band.label,
        emoji,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_colors_are_background_classes() {
        let colors: Vec<&str> = [3, 10, 20, 40, 60]
            .into_iter()
            .map(|v| reading_progress(Some(v), None).color)
            .collect();
        assert_eq!(
            colors,
            vec!["bg-green-500", "bg-blue-500", "bg-yellow-500", "bg-orange-500", "bg-red-500"]
        );
    }

    #[test]
    fn test_not_started() {
        let info = reading_progress(Some(0), None);
        assert_eq!(info.percentage, 0.0);
        assert_eq!(info.stage, ProgressStage::None);
        assert_eq!(info.label, "Not Started");
        assert_eq!(info.color, "bg-gray-300");
        assert_eq!(info.volume_text, "Not started");

        let info = reading_progress(None, None);
        assert_eq!(info.stage, ProgressStage::None);
    }

    #[test]
    fn test_exact_upper_bound_is_full() {
        let info = reading_progress(Some(5), None);
        assert_eq!(info.stage, ProgressStage::Beginner);
        assert_eq!(info.percentage, 100.0);
        assert_eq!(info.label, "Quick Reader");
    }

    #[test]
    fn test_enters_next_stage() {
        let info = reading_progress(Some(6), None);
        assert_eq!(info.stage, ProgressStage::Intermediate);
        assert!(info.percentage > 0.0 && info.percentage < 100.0);
        assert_eq!(info.percentage, 10.0);
    }

    #[test]
    fn test_chapters_drive_stage() {
        let info = reading_progress(None, Some(100.0));
        assert_eq!(effective_volumes(None, Some(100.0)), 10);
        assert_eq!(info.stage, ProgressStage::Intermediate);
        assert_eq!(info.volume_text, "Chapter 100");
    }

    #[test]
    fn test_few_chapters_still_started() {
        let info = reading_progress(None, Some(5.0));
        assert_eq!(info.stage, ProgressStage::Beginner);
        assert_eq!(info.percentage, 0.0);
        assert_eq!(info.volume_text, "Chapter 5");

        let achievement = reading_achievement(None, Some(5.0));
        assert_eq!(achievement.text, "Quick Reader");
        assert_eq!(achievement.emoji, "✨");
    }

    #[test]
    fn test_master_is_terminal() {
        let info = reading_progress(Some(60), None);
        assert_eq!(info.stage, ProgressStage::Master);
        assert_eq!(info.percentage, 100.0);

        let info = reading_progress(Some(u32::MAX), None);
        assert_eq!(info.stage, ProgressStage::Master);
    }

    #[test]
    fn test_percentage_always_in_range() {
        for volume in 0..120u32 {
            for chapter in [None, Some(0.0), Some(7.5), Some(42.0), Some(900.0)] {
                let info = reading_progress(Some(volume), chapter);
                assert!(
                    (0.0..=100.0).contains(&info.percentage),
                    "volume={} chapter={:?} -> {}",
                    volume,
                    chapter,
                    info.percentage
                );
            }
        }
    }

    #[test]
    fn test_effective_volumes_monotonic() {
        let chapters: Vec<f64> = (0..300).map(|c| c as f64 * 0.5).collect();
        for volume in 0..80u32 {
            for pair in chapters.windows(2) {
                let lower = effective_volumes(Some(volume), Some(pair[0]));
                let higher = effective_volumes(Some(volume), Some(pair[1]));
                assert!(lower <= higher);
                assert!(lower <= effective_volumes(Some(volume + 1), Some(pair[0])));
            }
        }
    }

    #[test]
    fn test_volume_text_formats() {
        assert_eq!(volume_text(Some(3), None), "3 volumes");
        assert_eq!(volume_text(Some(1), None), "1 volume");
        assert_eq!(volume_text(Some(2), Some(15.0)), "Vol. 2, Ch. 15");
        assert_eq!(volume_text(Some(2), Some(12.5)), "Vol. 2, Ch. 12.5");
        assert_eq!(volume_text(None, Some(15.0)), "Chapter 15");
        assert_eq!(volume_text(Some(0), Some(0.0)), "Not started");
    }

    #[test]
    fn test_achievements_per_stage() {
        assert_eq!(reading_achievement(None, None).text, "Start Reading");
        assert_eq!(reading_achievement(None, None).emoji, "📖");
        assert_eq!(reading_achievement(Some(3), None).emoji, "✨");
        assert_eq!(reading_achievement(Some(10), None).emoji, "📚");
        assert_eq!(reading_achievement(Some(20), None).emoji, "🎓");
        assert_eq!(reading_achievement(Some(40), None).emoji, "👑");
        let master = reading_achievement(Some(51), None);
        assert_eq!(master.emoji, "🏆");
        assert_eq!(master.text, "Manga Master");
    }
}
