mod admin_vm;
mod questionnaire_vm;
mod result_vm;
mod start_vm;
mod time_fmt;

pub use admin_vm::{
    AdminVm, QuestionStatRowVm, ResponseRowVm, SessionCardVm, map_admin_dashboard, tier_class,
};
pub use questionnaire_vm::{
    OpenedQuestionnaire, QuestionCardVm, QuestionnaireOutcome, QuestionnaireVm,
    open_questionnaire,
};
pub use result_vm::{ResultVm, grade_class};
pub use start_vm::begin_session;
pub use time_fmt::{format_datetime, format_optional_datetime};
