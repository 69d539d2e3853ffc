pub mod attorney;
pub mod session;
pub mod state_limit;
pub mod submission;
pub mod user;
