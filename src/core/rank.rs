use super::types::{Difficulty, Rank, RankProgress};

const LADDER: [(Rank, u64); 5] = [
    (Rank::Novice, 0),
    (Rank::Apprentice, 500),
    (Rank::Expert, 1_500),
    (Rank::Master, 3_000),
    (Rank::Legendary, 5_000),
];

pub fn rank_for_xp(xp: u64) -> RankProgress {
    let idx = LADDER
        .iter()
        .rposition(|&(_, min)| xp >= min)
        .unwrap_or(0);
    let (rank, min_xp) = LADDER[idx];
    let next = LADDER.get(idx + 1).copied();

    let progress_to_next = match next {
        Some((_, next_min)) => {
            let span = (next_min - min_xp) as f64;
            ((xp - min_xp) as f64 / span * 100.0).clamp(0.0, 100.0)
        }
        None => 100.0,
    };

    RankProgress {
        xp,
        rank,
        min_xp,
        next_rank: next.map(|(r, _)| r),
        next_rank_min_xp: next.map(|(_, m)| m),
        progress_to_next,
    }
}

/// XP granted for finishing a whole learning module.
pub fn module_completion_xp(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Beginner => 100,
        Difficulty::Intermediate => 250,
        Difficulty::Expert => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    #[test]
    fn thresholds_are_inclusive_lower_bounds() {
        assert_eq!(rank_for_xp(0).rank, Rank::Novice);
        assert_eq!(rank_for_xp(499).rank, Rank::Novice);
        assert_eq!(rank_for_xp(500).rank, Rank::Apprentice);
        assert_eq!(rank_for_xp(1_500).rank, Rank::Expert);
        assert_eq!(rank_for_xp(2_999).rank, Rank::Expert);
        assert_eq!(rank_for_xp(3_000).rank, Rank::Master);
        assert_eq!(rank_for_xp(5_000).rank, Rank::Legendary);
    }

    #[test]
    fn progress_is_share_of_current_band() {
        let p = rank_for_xp(1_000);
        assert_eq!(p.rank, Rank::Apprentice);
        assert_eq!(p.next_rank, Some(Rank::Expert));
        assert_eq!(p.next_rank_min_xp, Some(1_500));
        assert_eq!(p.progress_to_next, 50.0);
    }

    #[test]
    fn legendary_is_terminal() {
        let p = rank_for_xp(1_000_000);
        assert_eq!(p.rank, Rank::Legendary);
        assert_eq!(p.next_rank, None);
        assert_eq!(p.next_rank_min_xp, None);
        assert_eq!(p.progress_to_next, 100.0);
    }

    #[test]
    fn module_xp_by_difficulty() {
        assert_eq!(module_completion_xp(Difficulty::Beginner), 100);
        assert_eq!(module_completion_xp(Difficulty::Intermediate), 250);
        assert_eq!(module_completion_xp(Difficulty::Expert), 500);
        assert_eq!(module_completion_xp(Difficulty::from_label("")), 100);
    }

    proptest! {
        #[test]
        fn prop_progress_stays_in_range(xp in 0u64..20_000) {
            let p = rank_for_xp(xp);
            prop_assert!((0.0..=100.0).contains(&p.progress_to_next));
            prop_assert!(xp >= p.min_xp);
            if let Some(next_min) = p.next_rank_min_xp {
                prop_assert!(xp < next_min);
            }
        }
    }
}
