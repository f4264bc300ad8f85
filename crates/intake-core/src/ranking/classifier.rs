//! Admission ranking classifier.
//!
//! A pure function that partitions applicants into admission tiers against an
//! intake limit. No hidden state, no I/O; callable directly in tests.

use crate::error::{IntakeError, Result};

use super::model::{Applicant, RankedApplicant, RankingOutcome};

/// Classifies applicants into the four admission tiers.
///
/// Applicants are ranked by `aps_score` descending; ties keep their input
/// order (stable sort; the tie-break policy is part of the contract, not an
/// accident of implementation). The effective cutoff is `cutoff_override` when given,
/// otherwise the score of the applicant at rank `intake_limit`. When the pool
/// is smaller than the intake limit and no override is supplied, there is no
/// cutoff applicant and everyone is auto-accepted.
///
/// # Errors
///
/// Returns `InvalidArgument` when `intake_limit` is zero, before any
/// computation. An empty applicant list is valid and yields four empty tiers.
pub fn classify(
    applicants: &[Applicant],
    intake_limit: u32,
    cutoff_override: Option<u32>,
) -> Result<RankingOutcome> {
    if intake_limit == 0 {
        return Err(IntakeError::invalid_argument(
            "intake limit must be a positive integer",
        ));
    }

    let limit = intake_limit as usize;

    // Stable sort: equal scores keep their input order.
    let mut sorted: Vec<&Applicant> = applicants.iter().collect();
    sorted.sort_by(|a, b| b.aps_score.cmp(&a.aps_score));

    // The cutoff is the lowest score still inside the intake limit, unless
    // the caller overrides it. A pool smaller than the limit has no cutoff.
    let cutoff = cutoff_override.or_else(|| {
        if sorted.len() >= limit {
            Some(sorted[limit - 1].aps_score)
        } else {
            None
        }
    });

    let mut outcome = RankingOutcome {
        auto_accept: Vec::new(),
        conditional: Vec::new(),
        waitlist: Vec::new(),
        rejected: Vec::new(),
        cutoff_aps: cutoff,
        intake_limit,
    };

    for (index, applicant) in sorted.iter().enumerate() {
        let rank = (index + 1) as u32;
        let ranked = RankedApplicant {
            rank,
            applicant_id: applicant.id.clone(),
            applicant_name: applicant.name.clone(),
            aps_score: applicant.aps_score,
        };

        let tier = match cutoff {
            None => &mut outcome.auto_accept,
            Some(cutoff) => {
                let inside_limit = (rank as usize) <= limit;
                let meets_cutoff = applicant.aps_score >= cutoff;
                match (inside_limit, meets_cutoff) {
                    (true, true) => &mut outcome.auto_accept,
                    (true, false) => &mut outcome.conditional,
                    (false, true) => &mut outcome.waitlist,
                    (false, false) => &mut outcome.rejected,
                }
            }
        };
        tier.push(ranked);
    }

    // The tiers must partition the input, and auto-accept must respect the
    // numeric intake limit.
    if outcome.total() != applicants.len() {
        return Err(IntakeError::internal(format!(
            "ranking tiers lost applicants: {} in, {} out",
            applicants.len(),
            outcome.total()
        )));
    }
    if outcome.auto_accept.len() > limit {
        return Err(IntakeError::internal(format!(
            "auto-accept tier exceeds intake limit: {} > {}",
            outcome.auto_accept.len(),
            limit
        )));
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn applicant(id: &str, name: &str, aps_score: u32) -> Applicant {
        Applicant {
            id: id.to_string(),
            name: name.to_string(),
            aps_score,
        }
    }

    fn sample_pool() -> Vec<Applicant> {
        vec![
            applicant("a", "Amara", 90),
            applicant("b", "Bongani", 80),
            applicant("c", "Chen", 80),
            applicant("d", "Divya", 70),
        ]
    }

    #[test]
    fn test_zero_intake_limit_rejected() {
        let err = classify(&sample_pool(), 0, None).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_empty_pool_yields_empty_tiers() {
        let outcome = classify(&[], 5, None).unwrap();
        assert_eq!(outcome.total(), 0);
        assert!(outcome.cutoff_aps.is_none());
    }

    #[test]
    fn test_tie_at_cutoff_goes_to_waitlist() {
        // Cutoff is the score at rank 2 (80). Chen ties it but sits outside
        // the numeric limit, so Chen is waitlisted, not rejected.
        let outcome = classify(&sample_pool(), 2, None).unwrap();

        assert_eq!(outcome.cutoff_aps, Some(80));
        let auto: Vec<&str> = outcome
            .auto_accept
            .iter()
            .map(|r| r.applicant_name.as_str())
            .collect();
        assert_eq!(auto, vec!["Amara", "Bongani"]);
        let waitlist: Vec<&str> = outcome
            .waitlist
            .iter()
            .map(|r| r.applicant_name.as_str())
            .collect();
        assert_eq!(waitlist, vec!["Chen"]);
        let rejected: Vec<&str> = outcome
            .rejected
            .iter()
            .map(|r| r.applicant_name.as_str())
            .collect();
        assert_eq!(rejected, vec!["Divya"]);
        assert!(outcome.conditional.is_empty());
    }

    #[test]
    fn test_pool_smaller_than_limit_all_auto_accepted() {
        let pool = vec![
            applicant("a", "Amara", 50),
            applicant("b", "Bongani", 40),
            applicant("c", "Chen", 30),
        ];
        let outcome = classify(&pool, 5, None).unwrap();

        assert_eq!(outcome.auto_accept.len(), 3);
        assert!(outcome.conditional.is_empty());
        assert!(outcome.waitlist.is_empty());
        assert!(outcome.rejected.is_empty());
        assert!(outcome.cutoff_aps.is_none());
    }

    #[test]
    fn test_ranks_are_contiguous_and_unique_across_tiers() {
        let outcome = classify(&sample_pool(), 2, None).unwrap();

        let mut ranks: Vec<u32> = outcome
            .auto_accept
            .iter()
            .chain(&outcome.conditional)
            .chain(&outcome.waitlist)
            .chain(&outcome.rejected)
            .map(|r| r.rank)
            .collect();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_tiers_partition_the_input() {
        let pool = sample_pool();
        let outcome = classify(&pool, 3, None).unwrap();

        let ids: HashSet<&str> = outcome
            .auto_accept
            .iter()
            .chain(&outcome.conditional)
            .chain(&outcome.waitlist)
            .chain(&outcome.rejected)
            .map(|r| r.applicant_id.as_str())
            .collect();
        assert_eq!(ids.len(), pool.len());
        assert_eq!(outcome.total(), pool.len());
        assert!(outcome.auto_accept.len() <= 3);
    }

    #[test]
    fn test_tie_break_preserves_input_order() {
        // Bongani appears before Chen in the input and must get the better
        // rank despite the equal score.
        let outcome = classify(&sample_pool(), 4, None).unwrap();

        let bongani = outcome
            .auto_accept
            .iter()
            .find(|r| r.applicant_name == "Bongani")
            .unwrap();
        let chen = outcome
            .auto_accept
            .iter()
            .find(|r| r.applicant_name == "Chen")
            .unwrap();
        assert!(bongani.rank < chen.rank);
    }

    #[test]
    fn test_strict_cutoff_override_produces_conditional_tier() {
        // Override stricter than the rank-2 score: Bongani and Chen fall
        // below it but hold ranks inside the limit.
        let pool = vec![
            applicant("a", "Amara", 90),
            applicant("b", "Bongani", 80),
            applicant("c", "Chen", 70),
        ];
        let outcome = classify(&pool, 2, Some(85)).unwrap();

        assert_eq!(outcome.auto_accept.len(), 1);
        assert_eq!(outcome.auto_accept[0].applicant_name, "Amara");
        assert_eq!(outcome.conditional.len(), 1);
        assert_eq!(outcome.conditional[0].applicant_name, "Bongani");
        assert!(outcome.waitlist.is_empty());
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].applicant_name, "Chen");
    }

    #[test]
    fn test_lenient_cutoff_override_grows_waitlist() {
        let outcome = classify(&sample_pool(), 2, Some(70)).unwrap();

        // Everyone meets the lenient cutoff; the limit still caps auto-accept.
        assert_eq!(outcome.auto_accept.len(), 2);
        assert_eq!(outcome.waitlist.len(), 2);
        assert!(outcome.conditional.is_empty());
        assert!(outcome.rejected.is_empty());
    }

    #[test]
    fn test_summary_mentions_counts_and_cutoff() {
        let outcome = classify(&sample_pool(), 2, None).unwrap();
        let summary = outcome.summary();
        assert!(summary.contains("2 auto-accepted"));
        assert!(summary.contains("cutoff APS 80"));
        assert!(summary.contains("intake limit 2"));
    }
}
