//! Word scoring, tile validation and the shot model.
//!
//! All functions here are pure apart from the RNG passed to [`shot_success`].

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Shortest scorable word.
pub const MIN_SCORING_LENGTH: usize = 3;

/// Points by word length, starting at length 3.
const LENGTH_SCORES: [u32; 10] = [1, 2, 3, 5, 8, 13, 21, 34, 55, 89];

/// Base score for a word of `length` characters.
///
/// Follows the Fibonacci sequence: 1, 2, 3, 5, ... up to 89 for twelve
/// letters, and keeps going past that.
pub fn length_score(length: usize) -> u32 {
    if length < MIN_SCORING_LENGTH {
        return 0;
    }
    if let Some(score) = LENGTH_SCORES.get(length - MIN_SCORING_LENGTH) {
        return *score;
    }

    let (mut a, mut b) = (55u32, 89u32);
    for _ in LENGTH_SCORES.len() + MIN_SCORING_LENGTH - 1..length {
        let next = a.saturating_add(b);
        a = b;
        b = next;
    }
    b
}

/// Whether `word` uses the center tile. Case-insensitive.
pub fn has_center_bonus(word: &str, center_tile: &str) -> bool {
    let center = center_tile.trim().to_uppercase();
    !center.is_empty() && word.to_uppercase().contains(&center)
}

/// Score for a word: the length score, doubled if it contains the center tile.
pub fn word_score(word: &str, center_tile: &str) -> u32 {
    let word = word.trim();
    let base = length_score(word.chars().count());
    if has_center_bonus(word, center_tile) {
        base.saturating_mul(2)
    } else {
        base
    }
}

/// Split `word` into tiles from `available`, or `None` if it can't be built.
///
/// Tiles may be reused any number of times. At each position a
/// multi-character tile wins over a single letter; the longest such tile is
/// tried first.
pub fn decompose<S: AsRef<str>>(word: &str, available: &[S]) -> Option<Vec<String>> {
    let word = word.trim().to_uppercase();
    let mut digraphs: Vec<String> = available
        .iter()
        .map(|tile| tile.as_ref().trim().to_uppercase())
        .filter(|tile| tile.chars().count() > 1)
        .collect();
    digraphs.sort_by(|a, b| b.len().cmp(&a.len()));
    let singles: Vec<String> = available
        .iter()
        .map(|tile| tile.as_ref().trim().to_uppercase())
        .filter(|tile| tile.chars().count() == 1)
        .collect();

    let mut tiles = Vec::new();
    let mut rest = word.as_str();
    while let Some(c) = rest.chars().next() {
        if let Some(tile) = digraphs.iter().find(|tile| rest.starts_with(tile.as_str())) {
            rest = &rest[tile.len()..];
            tiles.push(tile.clone());
            continue;
        }
        let single = &rest[..c.len_utf8()];
        if !singles.iter().any(|tile| tile == single) {
            return None;
        }
        tiles.push(single.to_string());
        rest = &rest[c.len_utf8()..];
    }

    if tiles.is_empty() {
        None
    } else {
        Some(tiles)
    }
}

/// Whether `word` can be spelled from `available` tiles.
pub fn is_valid_composition<S: AsRef<str>>(word: &str, available: &[S]) -> bool {
    decompose(word, available).is_some()
}

/// Outcome of a shot on goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotResult {
    pub success: bool,
    /// 0-100, from time left on the clock.
    pub accuracy: f64,
    /// 0-100, from points banked beyond the shot threshold.
    pub power: f64,
}

impl ShotResult {
    /// Probability of scoring for the given accuracy and power.
    pub fn success_chance(accuracy: f64, power: f64) -> f64 {
        0.4 + 0.4 * (accuracy / 100.0) + 0.2 * (power / 100.0)
    }
}

/// Shot accuracy: two points per second left, capped at 100.
pub fn shot_accuracy(time_remaining: f64) -> f64 {
    (time_remaining * 2.0).clamp(0.0, 100.0)
}

/// Shot power: logarithmic in bonus points, capped at 100.
pub fn shot_power(bonus_points: i64) -> f64 {
    if bonus_points <= 0 {
        return 0.0;
    }
    ((bonus_points as f64 + 1.0).log2() * 15.0).min(100.0)
}

/// Take a shot: one Bernoulli draw against the combined chance.
pub fn shot_success<R: Rng + ?Sized>(time_remaining: f64, bonus_points: i64, rng: &mut R) -> ShotResult {
    let accuracy = shot_accuracy(time_remaining);
    let power = shot_power(bonus_points);
    let chance = ShotResult::success_chance(accuracy, power);
    let success = rng.gen::<f64>() < chance;

    ShotResult {
        success,
        accuracy,
        power,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_length_table() {
        let expected = [(3, 1), (4, 2), (5, 3), (6, 5), (7, 8), (8, 13), (9, 21), (10, 34), (11, 55), (12, 89)];
        for (length, score) in expected {
            assert_eq!(length_score(length), score, "length {}", length);
            assert_eq!(word_score(&"B".repeat(length), "Z"), score);
        }
    }

    #[test]
    fn test_long_words_continue_fibonacci() {
        assert_eq!(length_score(13), 144);
        assert_eq!(length_score(14), 233);
        assert_eq!(length_score(15), 377);
    }

    #[test]
    fn test_very_long_words_saturate() {
        assert_eq!(length_score(48), 2_971_215_073);
        assert_eq!(length_score(60), u32::MAX);
        assert_eq!(word_score(&"A".repeat(48), "Z"), 2_971_215_073);
        assert_eq!(word_score(&"A".repeat(48), "A"), u32::MAX);
    }

    #[test]
    fn test_short_words_score_zero() {
        assert_eq!(length_score(0), 0);
        assert_eq!(length_score(2), 0);
        assert_eq!(word_score("AT", "A"), 0);
    }

    #[test]
    fn test_center_bonus_doubles() {
        assert_eq!(word_score("RATES", "R"), 6);
        assert_eq!(word_score("SEATS", "R"), 3);
        assert_eq!(word_score("rates", "r"), 6);
        assert_eq!(word_score("QUITE", "QU"), 6);
        assert_eq!(word_score("BBBBBBBBBBBBB", "B"), 288);
    }

    #[test]
    fn test_composition_reuses_tiles() {
        let tiles = ["R", "A", "E", "S", "T", "N"];
        assert!(is_valid_composition("RATES", &tiles));
        assert!(is_valid_composition("tenant", &tiles));
        assert!(is_valid_composition("STREETS", &tiles));
        assert!(!is_valid_composition("RATED", &tiles));
        assert!(!is_valid_composition("", &tiles));
    }

    #[test]
    fn test_composition_digraph_is_atomic() {
        let tiles = ["QU", "I", "E", "T", "S", "R"];
        assert_eq!(
            decompose("QUITE", &tiles),
            Some(vec!["QU".into(), "I".into(), "T".into(), "E".into()])
        );
        assert!(is_valid_composition("QUIETS", &tiles));
        // A bare U has no tile of its own.
        assert!(!is_valid_composition("TRUE", &tiles));
        assert!(!is_valid_composition("QIT", &tiles));
    }

    #[test]
    fn test_composition_from_tile_sequences() {
        let tiles = ["QU", "A", "R", "T", "S", "E"];
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..500 {
            let length = rng.gen_range(1..8);
            let word: String = (0..length)
                .map(|_| tiles[rng.gen_range(0..tiles.len())])
                .collect();
            assert!(is_valid_composition(&word, &tiles), "{} should be valid", word);
            assert!(!is_valid_composition(&format!("{}Z", word), &tiles));
        }
    }

    #[test]
    fn test_shot_accuracy_and_power() {
        assert_eq!(shot_accuracy(12.5), 25.0);
        assert_eq!(shot_accuracy(80.0), 100.0);
        assert_eq!(shot_power(0), 0.0);
        assert_eq!(shot_power(-10), 0.0);
        assert_eq!(shot_power(1), 15.0);
        assert_eq!(shot_power(3), 30.0);
        assert_eq!(shot_power(1_000_000), 100.0);
    }

    #[test]
    fn test_shot_draw_uses_rng() {
        // StepRng(0, 0) always yields 0.0, below any chance.
        let result = shot_success(0.0, 0, &mut StepRng::new(0, 0));
        assert!(result.success);
        assert_eq!(result.accuracy, 0.0);

        // u64::MAX yields just under 1.0, above a 0.4 chance.
        let result = shot_success(0.0, 0, &mut StepRng::new(u64::MAX, 0));
        assert!(!result.success);
    }

    #[test]
    fn test_success_chance_bounds() {
        assert!((ShotResult::success_chance(0.0, 0.0) - 0.4).abs() < 1e-12);
        assert!((ShotResult::success_chance(100.0, 100.0) - 1.0).abs() < 1e-12);
    }
}
