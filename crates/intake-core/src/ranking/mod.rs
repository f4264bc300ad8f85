//! Applicant ranking against an admission-intake threshold.

mod classifier;
mod model;

pub use classifier::classify;
pub use model::{Applicant, RankedApplicant, RankingOutcome};
