use crate::grade::{HeatTier, ratio, rounded_percent};
use crate::model::ids::QuestionId;

/// YES/NO tally for one question across every session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionStats {
    pub question_id: QuestionId,
    pub question: String,
    pub yes: u32,
    pub no: u32,
}

impl QuestionStats {
    #[must_use]
    pub fn new(question_id: QuestionId, question: impl Into<String>, yes: u32, no: u32) -> Self {
        Self {
            question_id,
            question: question.into(),
            yes,
            no,
        }
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.yes.saturating_add(self.no)
    }

    /// `yes / (yes + no)`, 0 when nobody answered.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        ratio(self.yes, self.total())
    }

    #[must_use]
    pub fn yes_percent(&self) -> u32 {
        rounded_percent(self.yes, self.total())
    }

    #[must_use]
    pub fn tier(&self) -> HeatTier {
        HeatTier::from_counts(self.yes, self.no)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_yes_one_no_is_top_tier() {
        let stats = QuestionStats::new(QuestionId::new(1), "Q", 3, 1);
        assert_eq!(stats.total(), 4);
        assert_eq!(stats.ratio(), 0.75);
        assert_eq!(stats.yes_percent(), 75);
        assert_eq!(stats.tier(), HeatTier::Strong);
    }

    #[test]
    fn unanswered_question_has_zero_ratio() {
        let stats = QuestionStats::new(QuestionId::new(2), "Q", 0, 0);
        assert_eq!(stats.ratio(), 0.0);
        assert_eq!(stats.yes_percent(), 0);
        assert_eq!(stats.tier(), HeatTier::Low);
    }
}
