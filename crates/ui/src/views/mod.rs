mod admin;
mod complete;
mod questions;
mod start;
mod state;

pub use admin::AdminView;
pub use complete::CompleteView;
pub use questions::QuestionsView;
pub use start::StartView;
pub use state::{ViewError, ViewState, view_state_from_resource};

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;
