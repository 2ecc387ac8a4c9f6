// Community scoring — log-compressed aggregation of external signals.
//
// The inputs are already-retrieved counts (HN points, HN comments, and a
// slot for a secondary platform); fetching them is crate::hn's job. The
// log compression keeps a viral 2000-point post from drowning out
// everything else in the final ranking.

/// Combine external popularity counts into a community score in [0, 100].
///
/// Formula: ln(1 + points*2 + comments*3 + secondary) * 10, capped at 100.
/// All-zero input returns exactly 0.
pub fn community_score(points: u32, comments: u32, secondary: u32) -> f64 {
    if points == 0 && comments == 0 && secondary == 0 {
        return 0.0;
    }

    // Widen before multiplying so extreme counts can't overflow
    let raw = points as f64 * 2.0 + comments as f64 * 3.0 + secondary as f64;
    let score = (1.0 + raw).ln() * 10.0;
    score.min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_signals_score_exactly_zero() {
        assert_eq!(community_score(0, 0, 0), 0.0);
    }

    #[test]
    fn test_positive_and_bounded() {
        let score = community_score(100, 50, 0);
        assert!(score > 0.0);
        assert!(score <= 100.0);
    }

    #[test]
    fn test_non_decreasing_in_points_and_comments() {
        let base = community_score(10, 5, 0);
        assert!(community_score(11, 5, 0) >= base);
        assert!(community_score(10, 6, 0) >= base);
        assert!(community_score(500, 5, 0) >= base);
    }

    #[test]
    fn test_viral_post_is_compressed() {
        // 100x the points yields nowhere near 100x the score
        let modest = community_score(20, 0, 0);
        let viral = community_score(2000, 0, 0);
        assert!(viral < modest * 3.0, "log compression should flatten outliers");
    }

    #[test]
    fn test_cap_at_100() {
        assert!(community_score(u32::MAX / 4, u32::MAX / 4, 0) <= 100.0);
    }
}
