use services::{AdminDashboard, ResponseDetail, SessionDetail};
use survey_core::model::{HeatTier, QuestionStats, SessionStatus};

use crate::vm::result_vm::grade_class;
use crate::vm::time_fmt::{format_datetime, format_optional_datetime};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionStatRowVm {
    pub question: String,
    pub yes: u32,
    pub no: u32,
    pub yes_percent_label: String,
    pub tier_class: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseRowVm {
    pub question: String,
    pub answer_label: &'static str,
    pub answer_class: &'static str,
    pub answered_at_str: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionCardVm {
    pub session_id: String,
    pub started_at_str: String,
    pub completed_at_str: String,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub score_label: String,
    pub grade_label: &'static str,
    pub grade_class: &'static str,
    pub responses: Vec<ResponseRowVm>,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AdminVm {
    pub stats: Vec<QuestionStatRowVm>,
    pub sessions: Vec<SessionCardVm>,
    pub total_sessions: usize,
    pub completed_sessions: usize,
}

/// CSS class for a heatmap cell.
#[must_use]
pub fn tier_class(tier: HeatTier) -> &'static str {
    match tier {
        HeatTier::Strong => "heat heat-strong",
        HeatTier::Moderate => "heat heat-moderate",
        HeatTier::Weak => "heat heat-weak",
        HeatTier::Low => "heat heat-low",
    }
}

impl From<&QuestionStats> for QuestionStatRowVm {
    fn from(stats: &QuestionStats) -> Self {
        Self {
            question: stats.question.clone(),
            yes: stats.yes,
            no: stats.no,
            yes_percent_label: format!("{}%", stats.yes_percent()),
            tier_class: tier_class(stats.tier()),
        }
    }
}

impl From<&ResponseDetail> for ResponseRowVm {
    fn from(detail: &ResponseDetail) -> Self {
        Self {
            question: detail.question.clone(),
            answer_label: if detail.answer { "YES" } else { "NO" },
            answer_class: if detail.answer { "answer-yes" } else { "answer-no" },
            answered_at_str: format_datetime(detail.answered_at),
        }
    }
}

impl From<&SessionDetail> for SessionCardVm {
    fn from(detail: &SessionDetail) -> Self {
        let status_class = match detail.status {
            SessionStatus::Completed => "status status-completed",
            SessionStatus::InProgress => "status status-in-progress",
        };
        Self {
            session_id: detail.session_id.to_string(),
            started_at_str: format_datetime(detail.started_at),
            completed_at_str: format_optional_datetime(detail.completed_at),
            status_label: detail.status.label(),
            status_class,
            score_label: detail
                .score
                .map_or_else(|| "-".to_string(), |score| score.to_string()),
            grade_label: detail.grade.map_or("-", |grade| grade.as_str()),
            grade_class: detail.grade.map_or("grade", grade_class),
            responses: detail.responses.iter().map(ResponseRowVm::from).collect(),
        }
    }
}

#[must_use]
pub fn map_admin_dashboard(dashboard: &AdminDashboard) -> AdminVm {
    AdminVm {
        stats: dashboard
            .question_stats
            .iter()
            .map(QuestionStatRowVm::from)
            .collect(),
        sessions: dashboard.sessions.iter().map(SessionCardVm::from).collect(),
        total_sessions: dashboard.sessions.len(),
        completed_sessions: dashboard.completed_sessions(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_core::model::{Grade, QuestionId, SessionId};
    use survey_core::time::fixed_now;

    #[test]
    fn stat_row_buckets_ratio() {
        let row = QuestionStatRowVm::from(&QuestionStats::new(QuestionId::new(1), "Q?", 3, 1));
        assert_eq!(row.yes_percent_label, "75%");
        assert_eq!(row.tier_class, "heat heat-strong");

        let row = QuestionStatRowVm::from(&QuestionStats::new(QuestionId::new(2), "Q?", 0, 0));
        assert_eq!(row.yes_percent_label, "0%");
        assert_eq!(row.tier_class, "heat heat-low");
    }

    #[test]
    fn session_card_shows_placeholders_until_completed() {
        let open = SessionDetail {
            session_id: SessionId::generate(),
            started_at: fixed_now(),
            completed_at: None,
            score: None,
            grade: None,
            status: SessionStatus::InProgress,
            responses: vec![ResponseDetail {
                question_id: QuestionId::new(1),
                question: "Q?".into(),
                answer: false,
                answered_at: fixed_now(),
            }],
        };
        let card = SessionCardVm::from(&open);
        assert_eq!(card.status_label, "In Progress");
        assert_eq!(card.completed_at_str, "-");
        assert_eq!(card.grade_label, "-");
        assert_eq!(card.responses[0].answer_label, "NO");

        let done = SessionDetail {
            completed_at: Some(fixed_now()),
            score: Some(2),
            grade: Some(Grade::Good),
            status: SessionStatus::Completed,
            ..open
        };
        let card = SessionCardVm::from(&done);
        assert_eq!(card.status_label, "Completed");
        assert_eq!(card.score_label, "2");
        assert_eq!(card.grade_class, "grade grade-good");
    }
}
