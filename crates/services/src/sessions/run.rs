use std::fmt;

use survey_core::grade::rounded_percent;
use survey_core::model::{Question, SessionId};

//
// ─── RUN ───────────────────────────────────────────────────────────────────────
//

/// In-memory questionnaire context for one session.
///
/// Holds the session token, the ordered active questions, and the pointer to
/// the question being answered. The pointer only moves through
/// `QuestionnaireService::answer_current` once the answer is stored.
#[derive(Clone)]
pub struct QuestionnaireRun {
    session_id: SessionId,
    questions: Vec<Question>,
    current: usize,
    finalized: bool,
}

impl QuestionnaireRun {
    pub(crate) fn new(session_id: SessionId, questions: Vec<Question>) -> Self {
        Self {
            session_id,
            questions,
            current: 0,
            finalized: false,
        }
    }

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// 1-based position of the current question, capped at `total`.
    #[must_use]
    pub fn step_number(&self) -> usize {
        (self.current + 1).min(self.questions.len())
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// `step_number / total * 100`, rounded half up.
    #[must_use]
    pub fn progress_percent(&self) -> u32 {
        let step = u32::try_from(self.step_number()).unwrap_or(u32::MAX);
        let total = u32::try_from(self.total()).unwrap_or(u32::MAX);
        rounded_percent(step, total)
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        !self.questions.is_empty() && self.current + 1 == self.questions.len()
    }

    /// No question is left to answer.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.current >= self.questions.len()
    }

    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub(crate) fn advance(&mut self) {
        if self.current < self.questions.len() {
            self.current += 1;
        }
    }

    pub(crate) fn mark_finalized(&mut self) {
        self.finalized = true;
    }
}

impl fmt::Debug for QuestionnaireRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuestionnaireRun")
            .field("session_id", &self.session_id)
            .field("total", &self.questions.len())
            .field("current", &self.current)
            .field("finalized", &self.finalized)
            .finish()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
