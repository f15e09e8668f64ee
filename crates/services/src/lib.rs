#![forbid(unsafe_code)]

pub mod admin_service;
pub mod app_services;
pub mod error;
pub mod result_service;
pub mod sessions;

pub use survey_core::Clock;

pub use admin_service::{AdminDashboard, AdminService, ResponseDetail, SessionDetail};
pub use app_services::AppServices;
pub use error::{AdminError, AppServicesError, SessionError};
pub use result_service::{ResultService, SessionResult};
pub use sessions::{
    AnswerOutcome, QuestionnaireRun, QuestionnaireService, SessionBootstrap, SessionStart,
};
