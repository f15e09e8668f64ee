use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::QuestionId;

/// Longest question text accepted, in characters.
pub const MAX_QUESTION_LEN: usize = 500;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question text is too long: {len} characters (max {MAX_QUESTION_LEN})")]
    TooLong { len: usize },
}

/// Trims and checks a question text.
///
/// # Errors
///
/// Returns `QuestionError::EmptyText` for blank input and
/// `QuestionError::TooLong` above `MAX_QUESTION_LEN` characters.
pub fn normalize_question_text(raw: &str) -> Result<String, QuestionError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(QuestionError::EmptyText);
    }
    let len = text.chars().count();
    if len > MAX_QUESTION_LEN {
        return Err(QuestionError::TooLong { len });
    }
    Ok(text.to_owned())
}

/// A yes/no question shown to respondents.
///
/// Read-only from the questionnaire's point of view; only active questions
/// are delivered, in creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl Question {
    /// Creates an active question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text fails validation.
    pub fn new(
        id: QuestionId,
        text: impl AsRef<str>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, QuestionError> {
        Self::from_persisted(id, text, true, created_at)
    }

    /// Rehydrate a question from storage.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the stored text is not a valid question.
    pub fn from_persisted(
        id: QuestionId,
        text: impl AsRef<str>,
        is_active: bool,
        created_at: DateTime<Utc>,
    ) -> Result<Self, QuestionError> {
        Ok(Self {
            id,
            text: normalize_question_text(text.as_ref())?,
            is_active,
            created_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Orders questions the way they are delivered: by creation time, then id.
pub fn sort_for_delivery(questions: &mut [Question]) {
    questions.sort_by_key(|q| (q.created_at, q.id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn text_is_trimmed() {
        let q = Question::new(QuestionId::new(1), "  Do you plan weekly?  ", fixed_now()).unwrap();
        assert_eq!(q.text(), "Do you plan weekly?");
        assert!(q.is_active());
    }

    #[test]
    fn blank_text_is_rejected() {
        let err = Question::new(QuestionId::new(1), "   ", fixed_now()).unwrap_err();
        assert_eq!(err, QuestionError::EmptyText);
    }

    #[test]
    fn overlong_text_is_rejected() {
        let text = "x".repeat(MAX_QUESTION_LEN + 1);
        let err = normalize_question_text(&text).unwrap_err();
        assert_eq!(
            err,
            QuestionError::TooLong {
                len: MAX_QUESTION_LEN + 1
            }
        );
    }

    #[test]
    fn delivery_order_is_creation_time_then_id() {
        let now = fixed_now();
        let later = now + chrono::Duration::seconds(1);
        let mut qs = vec![
            Question::new(QuestionId::new(3), "c", later).unwrap(),
            Question::new(QuestionId::new(2), "b", now).unwrap(),
            Question::new(QuestionId::new(1), "a", now).unwrap(),
        ];
        sort_for_delivery(&mut qs);
        let ids: Vec<u64> = qs.iter().map(|q| q.id().value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
