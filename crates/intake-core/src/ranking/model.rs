//! Ranking domain models.
//!
//! Pure data carried into and out of the admission classifier. None of these
//! types have persistent identity of their own; outcomes are threaded back
//! into a conversation's message history by the application layer.

use serde::{Deserialize, Serialize};

/// One applicant as submitted to the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: String,
    pub name: String,
    /// Admission-point score, the ranking key.
    pub aps_score: u32,
}

/// An applicant after ranking.
///
/// `rank` is the 1-based position after sorting, unique and contiguous across
/// the whole outcome, not reset per tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedApplicant {
    pub rank: u32,
    pub applicant_id: String,
    pub applicant_name: String,
    pub aps_score: u32,
}

/// The four disjoint admission tiers produced by the classifier.
///
/// The tiers partition the full input set: every applicant appears in exactly
/// one tier, and `auto_accept.len() <= intake_limit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingOutcome {
    pub auto_accept: Vec<RankedApplicant>,
    pub conditional: Vec<RankedApplicant>,
    pub waitlist: Vec<RankedApplicant>,
    pub rejected: Vec<RankedApplicant>,
    /// The cutoff score actually applied. `None` when the whole pool fit
    /// inside the intake limit and no override was supplied.
    pub cutoff_aps: Option<u32>,
    /// The intake limit the outcome was computed against.
    pub intake_limit: u32,
}

impl RankingOutcome {
    /// Total number of applicants across all tiers.
    pub fn total(&self) -> usize {
        self.auto_accept.len() + self.conditional.len() + self.waitlist.len() + self.rejected.len()
    }

    /// Per-tier counts, in display order. Feeds chart descriptors.
    pub fn tier_counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("auto_accept", self.auto_accept.len()),
            ("conditional", self.conditional.len()),
            ("waitlist", self.waitlist.len()),
            ("rejected", self.rejected.len()),
        ]
    }

    /// Short human-readable digest for message content and notifications.
    pub fn summary(&self) -> String {
        let cutoff = match self.cutoff_aps {
            Some(score) => format!("cutoff APS {}", score),
            None => "no cutoff applied".to_string(),
        };
        format!(
            "{} auto-accepted, {} conditional, {} waitlisted, {} rejected ({}, intake limit {})",
            self.auto_accept.len(),
            self.conditional.len(),
            self.waitlist.len(),
            self.rejected.len(),
            cutoff,
            self.intake_limit
        )
    }
}
