use services::SessionResult;
use survey_core::model::Grade;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResultVm {
    Graded {
        score_label: String,
        grade_label: &'static str,
        grade_class: &'static str,
    },
    Calculating,
}

#[must_use]
pub fn grade_class(grade: Grade) -> &'static str {
    match grade {
        Grade::Excellent => "grade grade-excellent",
        Grade::Good => "grade grade-good",
        Grade::Average => "grade grade-average",
        Grade::Poor => "grade grade-poor",
    }
}

impl From<&SessionResult> for ResultVm {
    fn from(result: &SessionResult) -> Self {
        match result {
            SessionResult::Completed(score) => ResultVm::Graded {
                score_label: format!("{} of {} answered YES", score.score(), score.total()),
                grade_label: score.grade().as_str(),
                grade_class: grade_class(score.grade()),
            },
            SessionResult::Calculating => ResultVm::Calculating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_core::model::SessionScore;

    #[test]
    fn graded_result_labels() {
        let score = SessionScore::compute(3, 4).unwrap();
        let vm = ResultVm::from(&SessionResult::Completed(score));
        assert_eq!(
            vm,
            ResultVm::Graded {
                score_label: "3 of 4 answered YES".to_string(),
                grade_label: "Excellent",
                grade_class: "grade grade-excellent",
            }
        );
        assert_eq!(ResultVm::from(&SessionResult::Calculating), ResultVm::Calculating);
    }
}
