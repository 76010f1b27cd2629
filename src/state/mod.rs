//! Check outcome types
//!
//! - `CheckStatus`: the closed set of per-version outcomes
//! - `CheckResult`: one report row produced per version per run

mod check_result;
mod check_status;

pub use check_result::CheckResult;
pub use check_status::CheckStatus;
