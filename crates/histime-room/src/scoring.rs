//! Chronological correctness of a placement.
//!
//! A card dropped into slot `p` is compared against its nearest occupied
//! neighbours: the placement with the greatest position below `p` and the
//! one with the least position above `p`. The card is correct when its year
//! fits between theirs. A missing neighbour is an open boundary and never
//! makes a placement wrong, so the first card on an empty timeline is
//! always correct.
//!
//! Neighbours are judged by the years they carry, not by whether they were
//! themselves placed correctly.

use histime_protocol::Placement;

/// The nearest occupied slots on each side of `position`.
pub fn neighbours(timeline: &[Placement], position: u32) -> (Option<&Placement>, Option<&Placement>) {
    let left = timeline
        .iter()
        .filter(|p| p.position < position)
        .max_by_key(|p| p.position);
    let right = timeline
        .iter()
        .filter(|p| p.position > position)
        .min_by_key(|p| p.position);
    (left, right)
}

/// Returns `true` if a card from `year` belongs at `position`.
///
/// With `accept_equal_years`, a year equal to a neighbour's counts as
/// in order; without it, the card must be strictly between them.
pub fn is_correct(timeline: &[Placement], year: i32, position: u32, accept_equal_years: bool) -> bool {
    let (left, right) = neighbours(timeline, position);
    let in_order = |earlier: i32, later: i32| {
        if accept_equal_years {
            earlier <= later
        } else {
            earlier < later
        }
    };
    left.is_none_or(|l| in_order(l.year, year)) && right.is_none_or(|r| in_order(year, r.year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use histime_protocol::CardId;

    fn placed(position: u32, year: i32) -> Placement {
        Placement {
            card_id: CardId(format!("c{position}")),
            title: String::new(),
            year,
            position,
            placed_by: 0,
            placement_time: Utc::now(),
            is_correct: true,
        }
    }

    #[test]
    fn test_is_correct_empty_timeline_always_true() {
        assert!(is_correct(&[], -3000, 0, true));
        assert!(is_correct(&[], 2024, 7, false));
    }

    #[test]
    fn test_is_correct_between_neighbours() {
        let timeline = vec![placed(2, 1500), placed(6, 1900)];
        assert!(is_correct(&timeline, 1700, 4, true));
        assert!(!is_correct(&timeline, 1950, 4, true));
        assert!(!is_correct(&timeline, 1400, 4, true));
    }

    #[test]
    fn test_is_correct_open_boundaries() {
        let timeline = vec![placed(3, 1800)];
        // Left of the only card: must be earlier.
        assert!(is_correct(&timeline, 1700, 0, true));
        assert!(!is_correct(&timeline, 1850, 0, true));
        // Right of it: must be later.
        assert!(is_correct(&timeline, 1850, 5, true));
        assert!(!is_correct(&timeline, 1700, 5, true));
    }

    #[test]
    fn test_is_correct_uses_nearest_neighbours_only() {
        // 1000 at 0 and 2000 at 9 are further away than 1500 at 4 / 1600 at 6.
        let timeline = vec![placed(0, 1000), placed(4, 1500), placed(6, 1600), placed(9, 2000)];
        assert!(is_correct(&timeline, 1550, 5, true));
        assert!(!is_correct(&timeline, 1700, 5, true));
    }

    #[test]
    fn test_is_correct_equal_years_follow_policy() {
        let timeline = vec![placed(1, 1945)];
        assert!(is_correct(&timeline, 1945, 2, true));
        assert!(!is_correct(&timeline, 1945, 2, false));
        assert!(!is_correct(&timeline, 1945, 0, false));
    }

    #[test]
    fn test_is_correct_ignores_insertion_order() {
        // Placed out of positional order; only positions matter.
        let timeline = vec![placed(8, 1990), placed(1, 1100), placed(5, 1600)];
        assert!(is_correct(&timeline, 1800, 6, true));
        assert!(is_correct(&timeline, 1200, 3, true));
    }

    #[test]
    fn test_is_correct_negative_years() {
        let timeline = vec![placed(2, -500), placed(4, 100)];
        assert!(is_correct(&timeline, -44, 3, true));
        assert!(!is_correct(&timeline, -753, 3, true));
    }

    #[test]
    fn test_neighbours_missing_sides() {
        let timeline = vec![placed(3, 1800)];
        let (left, right) = neighbours(&timeline, 3);
        assert!(left.is_none() && right.is_none());
    }
}
