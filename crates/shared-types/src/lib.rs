pub mod error;
pub mod feature_flags;

// Estate intake domain
pub mod attorney;
pub mod document;
pub mod referral;
pub mod state_limit;
pub mod submission;
pub mod user;

pub use error::*;
pub use feature_flags::*;

pub use attorney::*;
pub use document::*;
pub use referral::*;
pub use state_limit::*;
pub use submission::*;
pub use user::*;
