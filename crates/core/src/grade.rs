//! Grading of finalized sessions and display tiers for per-question ratios.
//!
//! Both scales share the same cut points (0.75, 0.50, 0.25) applied to a
//! `part / whole` ratio. Comparisons are done in integer arithmetic so the
//! boundaries are inclusive and exact (`3/4` is `Excellent`, `1/4` is
//! `Average`).

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GradeError {
    #[error("unknown grade label: {0}")]
    UnknownLabel(String),

    #[error("score ({score}) exceeds total ({total})")]
    ScoreExceedsTotal { score: u32, total: u32 },
}

/// Returns the quarter bucket (0..=3) for `part / whole`.
///
/// `whole == 0` is bucket 0.
fn quarter_bucket(part: u64, whole: u64) -> u8 {
    if whole == 0 {
        return 0;
    }
    if part * 4 >= whole * 3 {
        3
    } else if part * 2 >= whole {
        2
    } else if part * 4 >= whole {
        1
    } else {
        0
    }
}

/// `part / whole` as a float in `[0, 1]`, 0 when `whole` is 0.
#[must_use]
pub fn ratio(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(whole)
    }
}

/// `part / whole * 100`, rounded half up. 0 when `whole` is 0.
#[must_use]
pub fn rounded_percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let part = u64::from(part);
    let whole = u64::from(whole);
    let pct = (part * 200 + whole) / (whole * 2);
    u32::try_from(pct).unwrap_or(u32::MAX)
}

//
// ─── GRADE ─────────────────────────────────────────────────────────────────────
//

/// Qualitative bucket assigned to a finalized session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    Excellent,
    Good,
    Average,
    Poor,
}

impl Grade {
    /// Grade for `score` YES answers out of `total` active questions.
    ///
    /// An empty questionnaire (`total == 0`) grades as `Poor`.
    #[must_use]
    pub fn from_score(score: u32, total: u32) -> Self {
        match quarter_bucket(u64::from(score), u64::from(total)) {
            3 => Grade::Excellent,
            2 => Grade::Good,
            1 => Grade::Average,
            _ => Grade::Poor,
        }
    }

    /// Stable label used for storage and display.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Grade::Excellent => "Excellent",
            Grade::Good => "Good",
            Grade::Average => "Average",
            Grade::Poor => "Poor",
        }
    }

    /// Parses a stored label.
    ///
    /// # Errors
    ///
    /// Returns `GradeError::UnknownLabel` for anything but the four labels.
    pub fn parse(label: &str) -> Result<Self, GradeError> {
        match label {
            "Excellent" => Ok(Grade::Excellent),
            "Good" => Ok(Grade::Good),
            "Average" => Ok(Grade::Average),
            "Poor" => Ok(Grade::Poor),
            other => Err(GradeError::UnknownLabel(other.to_owned())),
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── SESSION SCORE ─────────────────────────────────────────────────────────────
//

/// Score and grade written to a session at finalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionScore {
    score: u32,
    total: u32,
    grade: Grade,
}

impl SessionScore {
    /// Computes the grade for `score` out of `total`.
    ///
    /// # Errors
    ///
    /// Returns `GradeError::ScoreExceedsTotal` if more YES answers than
    /// active questions are reported.
    pub fn compute(score: u32, total: u32) -> Result<Self, GradeError> {
        if score > total {
            return Err(GradeError::ScoreExceedsTotal { score, total });
        }
        Ok(Self {
            score,
            total,
            grade: Grade::from_score(score, total),
        })
    }

    /// Rehydrates a stored score. The stored grade is kept as-is.
    #[must_use]
    pub fn from_persisted(score: u32, total: u32, grade: Grade) -> Self {
        Self {
            score,
            total,
            grade,
        }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn grade(&self) -> Grade {
        self.grade
    }

    #[must_use]
    pub fn ratio(&self) -> f64 {
        ratio(self.score, self.total)
    }
}

//
// ─── HEAT TIER ─────────────────────────────────────────────────────────────────
//

/// Display tier of a question's YES ratio on the admin heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeatTier {
    /// ratio >= 0.75
    Strong,
    /// ratio >= 0.50
    Moderate,
    /// ratio >= 0.25
    Weak,
    Low,
}

impl HeatTier {
    #[must_use]
    pub fn from_counts(yes: u32, no: u32) -> Self {
        let total = u64::from(yes) + u64::from(no);
        match quarter_bucket(u64::from(yes), total) {
            3 => HeatTier::Strong,
            2 => HeatTier::Moderate,
            1 => HeatTier::Weak,
            _ => HeatTier::Low,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HeatTier::Strong => "strong",
            HeatTier::Moderate => "moderate",
            HeatTier::Weak => "weak",
            HeatTier::Low => "low",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_table() {
        assert_eq!(Grade::from_score(4, 4), Grade::Excellent);
        assert_eq!(Grade::from_score(3, 4), Grade::Excellent);
        assert_eq!(Grade::from_score(2, 4), Grade::Good);
        assert_eq!(Grade::from_score(1, 4), Grade::Average);
        assert_eq!(Grade::from_score(0, 4), Grade::Poor);
    }

    #[test]
    fn boundaries_are_inclusive_for_odd_totals() {
        // 2/3 = 0.66 → Good, 1/3 = 0.33 → Average, 5/7 ≈ 0.71 → Good
        assert_eq!(Grade::from_score(2, 3), Grade::Good);
        assert_eq!(Grade::from_score(1, 3), Grade::Average);
        assert_eq!(Grade::from_score(5, 7), Grade::Good);
        assert_eq!(Grade::from_score(6, 8), Grade::Excellent);
        assert_eq!(Grade::from_score(1, 5), Grade::Poor);
    }

    #[test]
    fn empty_questionnaire_is_poor() {
        assert_eq!(Grade::from_score(0, 0), Grade::Poor);
        let score = SessionScore::compute(0, 0).unwrap();
        assert_eq!(score.grade(), Grade::Poor);
        assert_eq!(score.ratio(), 0.0);
    }

    #[test]
    fn labels_round_trip() {
        for grade in [Grade::Excellent, Grade::Good, Grade::Average, Grade::Poor] {
            assert_eq!(Grade::parse(grade.as_str()).unwrap(), grade);
        }
        assert!(matches!(
            Grade::parse("Great"),
            Err(GradeError::UnknownLabel(_))
        ));
    }

    #[test]
    fn score_above_total_is_rejected() {
        let err = SessionScore::compute(5, 4).unwrap_err();
        assert_eq!(err, GradeError::ScoreExceedsTotal { score: 5, total: 4 });
    }

    #[test]
    fn heat_tiers_use_same_cut_points() {
        assert_eq!(HeatTier::from_counts(3, 1), HeatTier::Strong);
        assert_eq!(HeatTier::from_counts(1, 1), HeatTier::Moderate);
        assert_eq!(HeatTier::from_counts(1, 3), HeatTier::Weak);
        assert_eq!(HeatTier::from_counts(0, 5), HeatTier::Low);
        assert_eq!(HeatTier::from_counts(0, 0), HeatTier::Low);
    }

    #[test]
    fn rounded_percent_rounds_half_up() {
        assert_eq!(rounded_percent(1, 8), 13);
        assert_eq!(rounded_percent(1, 3), 33);
        assert_eq!(rounded_percent(2, 3), 67);
        assert_eq!(rounded_percent(3, 4), 75);
        assert_eq!(rounded_percent(5, 0), 0);
    }
}
