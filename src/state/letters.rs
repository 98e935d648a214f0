//! Seed-word corpus and letter-set generation.
//!
//! Every round is drawn from a curated corpus of six-tile "seed words", each
//! known to support plenty of dictionary words. A row lists its tiles, which
//! of them make a playable center, and how hard each center is.
//!
//! ```text
//! seed_word,letters,viable_centres,centre_difficulty,...
//! ARTENS,"A,R,T,E,N,S","R,T,N","{'R': 'Hard', 'T': 'Medium', 'N': 'Easy'}",...
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;

use once_cell::sync::OnceCell;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::source::TextSource;
use crate::error::LoadError;

/// One playable unit: usually a letter, occasionally a digraph such as `QU`.
pub type Tile = String;

/// Tiles on the board besides the center.
pub const SURROUNDING_TILES: usize = 5;

/// Letter sets per possession: four passes and the shot.
pub const ROUND_SIZE: usize = 5;

/// Attempts per set before duplicate combinations are tolerated.
pub const MAX_SET_ATTEMPTS: usize = 100;

/// Seed word reported for procedurally generated sets.
pub const FALLBACK_SEED_WORD: &str = "FALLBACK";

const VOWELS: [&str; 5] = ["A", "E", "I", "O", "U"];
const COMMON_CONSONANTS: [&str; 5] = ["R", "S", "T", "N", "L"];
const OTHER_CONSONANTS: [&str; 11] = ["B", "C", "D", "G", "H", "K", "M", "P", "W", "Y", "F"];
const FALLBACK_CENTERS: [&str; 12] = ["R", "S", "T", "N", "L", "D", "C", "M", "P", "B", "G", "H"];

/// How hard a center tile is to build words around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }

    /// Sampling weight for center selection. Harder centers come up a bit more.
    pub fn weight(&self) -> f64 {
        match self {
            Self::Easy => 1.0,
            Self::Medium => 1.5,
            Self::Hard => 2.0,
        }
    }

    /// Parse a corpus label. Anything unrecognised is `Easy`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "medium" => Self::Medium,
            "hard" => Self::Hard,
            _ => Self::Easy,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The six active tiles for one pass segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterSet {
    pub center: Tile,
    pub surrounding: Vec<Tile>,
    pub seed_word: String,
    pub difficulty: Difficulty,
}

impl LetterSet {
    /// Center plus surrounding tiles.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        std::iter::once(&self.center).chain(self.surrounding.iter())
    }

    /// Order-independent identity of the six tiles.
    pub fn combination_key(&self) -> String {
        let mut tiles: Vec<&str> = self.tiles().map(String::as_str).collect();
        tiles.sort_unstable();
        tiles.join(",")
    }
}

/// One row of the seed-word corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedWordEntry {
    pub seed_word: String,
    pub letters: Vec<Tile>,
    pub viable_centers: Vec<Tile>,
    pub center_difficulty: HashMap<Tile, Difficulty>,
}

impl SeedWordEntry {
    pub fn difficulty_of(&self, center: &str) -> Difficulty {
        self.center_difficulty
            .get(center)
            .copied()
            .unwrap_or_default()
    }

    /// Every tile of the row except `center`.
    pub fn surrounding_for(&self, center: &str) -> Vec<Tile> {
        self.letters
            .iter()
            .filter(|tile| tile.as_str() != center)
            .cloned()
            .collect()
    }

    fn letter_set(&self, center: &str) -> LetterSet {
        LetterSet {
            center: center.to_string(),
            surrounding: self.surrounding_for(center),
            seed_word: self.seed_word.clone(),
            difficulty: self.difficulty_of(center),
        }
    }

    /// Pick a viable center, weighted by difficulty.
    fn pick_center<R: Rng + ?Sized>(&self, rng: &mut R) -> &Tile {
        let weights = self
            .viable_centers
            .iter()
            .map(|center| self.difficulty_of(center).weight());
        match WeightedIndex::new(weights) {
            Ok(dist) => &self.viable_centers[dist.sample(rng)],
            Err(_) => &self.viable_centers[0],
        }
    }
}

/// Produces rounds of letter sets from the seed-word corpus.
#[derive(Debug)]
pub struct LetterGenerator {
    source: TextSource,
    entries: OnceCell<Vec<SeedWordEntry>>,
}

impl LetterGenerator {
    pub fn new(source: TextSource) -> Self {
        Self {
            source,
            entries: OnceCell::new(),
        }
    }

    /// Build and load a generator from in-memory CSV.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::EmptyCorpus`] if no row is usable.
    pub fn from_csv(csv: &str) -> Result<Self, LoadError> {
        let generator = Self::new(TextSource::inline(csv));
        generator.load()?;
        Ok(generator)
    }

    /// Load and parse the corpus once. Malformed rows are skipped.
    ///
    /// # Errors
    ///
    /// Propagates read failures, and fails with [`LoadError::EmptyCorpus`]
    /// when nothing usable remains.
    pub fn load(&self) -> Result<(), LoadError> {
        self.entries.get_or_try_init(|| {
            let text = self.source.read()?;
            let entries = parse_corpus(&text);
            if entries.is_empty() {
                return Err(LoadError::EmptyCorpus);
            }
            log::info!("Seed-word corpus loaded with {} rows", entries.len());
            Ok(entries)
        })?;
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.entries.get().is_some()
    }

    pub fn entries(&self) -> &[SeedWordEntry] {
        self.entries.get().map_or(&[], Vec::as_slice)
    }

    pub fn entry_count(&self) -> usize {
        self.entries().len()
    }

    /// Generate the five letter sets of a round.
    ///
    /// The same `seed` always yields the same round; `None` seeds from the
    /// wall clock.
    pub fn generate_round_sets(&self, seed: Option<u64>) -> Vec<LetterSet> {
        let seed = seed.unwrap_or_else(|| chrono::Utc::now().timestamp_millis() as u64);
        log::debug!("Generating round with seed {}", seed);
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate_round_sets_with_rng(&mut rng)
    }

    /// Generate a round from a caller-supplied RNG.
    pub fn generate_round_sets_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<LetterSet> {
        let entries = self.entries();
        let mut sets: Vec<LetterSet> = Vec::with_capacity(ROUND_SIZE);

        if entries.is_empty() {
            log::warn!("Seed-word corpus not loaded; using procedural letter sets");
            for _ in 0..ROUND_SIZE {
                let used: Vec<Tile> = sets.iter().map(|s| s.center.clone()).collect();
                sets.push(fallback_letter_set(rng, &used));
            }
            return sets;
        }

        let mut used_keys = HashSet::new();
        for _ in 0..ROUND_SIZE {
            let set = pick_set(entries, rng, &used_keys);
            used_keys.insert(set.combination_key());
            sets.push(set);
        }
        sets
    }
}

fn pick_set<R: Rng + ?Sized>(
    entries: &[SeedWordEntry],
    rng: &mut R,
    used_keys: &HashSet<String>,
) -> LetterSet {
    for _ in 0..MAX_SET_ATTEMPTS {
        let entry = &entries[rng.gen_range(0..entries.len())];
        let center = entry.pick_center(rng);
        let set = entry.letter_set(center);

        if set.surrounding.len() != SURROUNDING_TILES {
            continue;
        }
        if !used_keys.contains(&set.combination_key()) {
            return set;
        }
    }

    // Out of attempts: take whatever comes up, duplicates allowed.
    log::debug!("Retry budget exhausted; allowing a repeated letter combination");
    let entry = &entries[rng.gen_range(0..entries.len())];
    entry.letter_set(&entry.viable_centers[0])
}

/// Procedurally build a set when no corpus is available.
///
/// The surrounding tiles hold two or three vowels and one or two common
/// consonants, all distinct. The center comes from a fixed consonant pool,
/// skipping `excluded_centers` while any choice remains.
pub fn fallback_letter_set<R: Rng + ?Sized>(rng: &mut R, excluded_centers: &[Tile]) -> LetterSet {
    let open: Vec<&str> = FALLBACK_CENTERS
        .iter()
        .copied()
        .filter(|c| !excluded_centers.iter().any(|e| e == c))
        .collect();
    let pool = if open.is_empty() {
        FALLBACK_CENTERS.to_vec()
    } else {
        open
    };
    let center = pool[rng.gen_range(0..pool.len())];

    let vowel_count = rng.gen_range(2..=3);
    let common_count = rng.gen_range(1..=2);
    let other_count = SURROUNDING_TILES - vowel_count - common_count;

    let mut surrounding: Vec<&str> = Vec::with_capacity(SURROUNDING_TILES);
    surrounding.extend(VOWELS.choose_multiple(rng, vowel_count));
    let commons: Vec<&str> = COMMON_CONSONANTS
        .iter()
        .copied()
        .filter(|c| *c != center)
        .collect();
    surrounding.extend(commons.choose_multiple(rng, common_count));
    let others: Vec<&str> = OTHER_CONSONANTS
        .iter()
        .copied()
        .filter(|c| *c != center)
        .collect();
    surrounding.extend(others.choose_multiple(rng, other_count));
    surrounding.shuffle(rng);

    LetterSet {
        center: center.to_string(),
        surrounding: surrounding.into_iter().map(str::to_string).collect(),
        seed_word: FALLBACK_SEED_WORD.to_string(),
        difficulty: Difficulty::Easy,
    }
}

/// Parse the corpus CSV. The first line is a header.
pub fn parse_corpus(text: &str) -> Vec<SeedWordEntry> {
    text.lines()
        .skip(1)
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| {
            let entry = parse_corpus_row(line.trim());
            if entry.is_none() {
                log::warn!("Skipping malformed seed-word row {}: {}", index + 2, line);
            }
            entry
        })
        .collect()
}

/// Parse one corpus row, or `None` if it can't be played.
pub fn parse_corpus_row(line: &str) -> Option<SeedWordEntry> {
    let fields = split_csv_line(line);
    if fields.len() < 4 {
        return None;
    }

    let seed_word = fields[0].trim().to_uppercase();
    let letters = parse_tile_list(&fields[1]);
    let distinct: HashSet<&Tile> = letters.iter().collect();
    if letters.len() != SURROUNDING_TILES + 1 || distinct.len() != letters.len() {
        return None;
    }

    let viable_centers: Vec<Tile> = parse_tile_list(&fields[2])
        .into_iter()
        .filter(|center| letters.contains(center))
        .collect();
    if viable_centers.is_empty() {
        return None;
    }

    let center_difficulty = parse_difficulty_map(&fields[3])
        .map(|labels| {
            viable_centers
                .iter()
                .map(|center| {
                    let difficulty = labels
                        .get(center)
                        .map_or(Difficulty::Easy, |label| Difficulty::from_label(label));
                    (center.clone(), difficulty)
                })
                .collect()
        })
        .unwrap_or_else(|| {
            viable_centers
                .iter()
                .map(|center| (center.clone(), Difficulty::Easy))
                .collect()
        });

    Some(SeedWordEntry {
        seed_word,
        letters,
        viable_centers,
        center_difficulty,
    })
}

fn parse_tile_list(field: &str) -> Vec<Tile> {
    field
        .split(',')
        .map(|tile| tile.trim().to_uppercase())
        .filter(|tile| !tile.is_empty())
        .collect()
}

/// Parse `{'R': 'Hard', "T": "Easy"}` into uppercase keys.
fn parse_difficulty_map(field: &str) -> Option<HashMap<Tile, String>> {
    let normalized = field.trim().replace('\'', "\"");
    let parsed: HashMap<String, String> = serde_json::from_str(&normalized).ok()?;
    Some(
        parsed
            .into_iter()
            .map(|(tile, label)| (tile.trim().to_uppercase(), label))
            .collect(),
    )
}

/// Split a CSV line, honouring quotes and `""` escapes.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CORPUS: &str = "\
seed_word,letters,viable_centres,centre_difficulty,words_3,words_4,words_5
ARTENS,\"A,R,T,E,N,S\",\"R,T,N\",\"{'R': 'Hard', 'T': 'Medium', 'N': 'Easy'}\",12,20,9
PLATES,\"P,L,A,T,E,S\",\"P,L,T\",\"{\"\"P\"\": \"\"Easy\"\", \"\"L\"\": \"\"Medium\"\"}\",8,11,4
QUIETS,\"QU,I,E,T,S,R\",\"QU,T\",not-a-map,3,4,1
BADROW,\"B,A,D\",\"B\",\"{'B': 'Easy'}\",1,1,1
NOCENT,\"N,O,C,E,N,T\",\"\",\"{}\",1,1,1
DRAWLS,\"D,R,A,W,L,S\",\"D,W\",\"{'D': 'Hard', 'W': 'Hard'}\",4,6,2
MOUNTS,\"M,O,U,N,T,S\",\"M,S\",\"{'M': 'Easy', 'S': 'Medium'}\",5,5,5
CHIRPS,\"C,H,I,R,P,S\",\"C,H,P\",\"{'C': 'Medium', 'H': 'Hard', 'P': 'Easy'}\",5,6,3
";

    fn generator() -> LetterGenerator {
        LetterGenerator::from_csv(CORPUS).unwrap()
    }

    #[test]
    fn test_difficulty_labels() {
        assert_eq!(Difficulty::from_label("Hard"), Difficulty::Hard);
        assert_eq!(Difficulty::from_label(" medium "), Difficulty::Medium);
        assert_eq!(Difficulty::from_label("Impossible"), Difficulty::Easy);
        assert_eq!(Difficulty::Hard.weight(), 2.0);
        assert_eq!(Difficulty::Medium.weight(), 1.5);
    }

    #[test]
    fn test_csv_split_quotes() {
        let fields = split_csv_line("A,\"B,C\",\"say \"\"hi\"\"\",");
        assert_eq!(fields, vec!["A", "B,C", "say \"hi\"", ""]);
    }

    #[test]
    fn test_parse_single_quoted_difficulty() {
        let entry = parse_corpus_row(
            "ARTENS,\"A,R,T,E,N,S\",\"R,T,N\",\"{'R': 'Hard', 'T': 'Medium', 'N': 'Easy'}\",1",
        )
        .unwrap();
        assert_eq!(entry.seed_word, "ARTENS");
        assert_eq!(entry.letters, vec!["A", "R", "T", "E", "N", "S"]);
        assert_eq!(entry.viable_centers, vec!["R", "T", "N"]);
        assert_eq!(entry.difficulty_of("R"), Difficulty::Hard);
        assert_eq!(entry.difficulty_of("T"), Difficulty::Medium);
        assert_eq!(entry.difficulty_of("N"), Difficulty::Easy);
    }

    #[test]
    fn test_malformed_difficulty_defaults_to_easy() {
        let entry = parse_corpus_row("QUIETS,\"QU,I,E,T,S,R\",\"QU,T\",oops").unwrap();
        assert_eq!(entry.letters[0], "QU");
        assert_eq!(entry.difficulty_of("QU"), Difficulty::Easy);
        assert_eq!(entry.difficulty_of("T"), Difficulty::Easy);
    }

    #[test]
    fn test_unplayable_rows_skipped() {
        assert!(parse_corpus_row("BADROW,\"B,A,D\",\"B\",\"{}\"").is_none());
        assert!(parse_corpus_row("NOCENT,\"N,O,C,E,N,T\",\"N\",\"{}\"").is_none());
        assert!(parse_corpus_row("EMPTYC,\"E,M,P,T,Y,C\",\"\",\"{}\"").is_none());
        assert!(parse_corpus_row("SHORT,\"S,H,O,R,T,X\"").is_none());

        let gen = generator();
        assert_eq!(gen.entry_count(), 6);
        assert!(gen.entries().iter().all(|e| e.seed_word != "BADROW"));
    }

    #[test]
    fn test_empty_corpus_is_fatal() {
        let result = LetterGenerator::from_csv("seed_word,letters,viable_centres,centre_difficulty\n");
        assert!(matches!(result, Err(LoadError::EmptyCorpus)));
    }

    #[test]
    fn test_round_has_five_well_formed_sets() {
        let sets = generator().generate_round_sets(Some(7));
        assert_eq!(sets.len(), ROUND_SIZE);
        for set in &sets {
            assert_eq!(set.surrounding.len(), SURROUNDING_TILES);
            assert!(!set.surrounding.contains(&set.center));
        }
    }

    #[test]
    fn test_round_is_reproducible() {
        let gen = generator();
        assert_eq!(gen.generate_round_sets(Some(42)), gen.generate_round_sets(Some(42)));
    }

    #[test]
    fn test_round_has_no_repeated_combinations() {
        let gen = generator();
        for seed in 0..20 {
            let sets = gen.generate_round_sets(Some(seed));
            let keys: HashSet<String> = sets.iter().map(LetterSet::combination_key).collect();
            assert_eq!(keys.len(), ROUND_SIZE, "seed {} repeated a combination", seed);
        }
    }

    #[test]
    fn test_single_row_corpus_falls_back_to_duplicates() {
        let gen = LetterGenerator::from_csv(
            "header\nARTENS,\"A,R,T,E,N,S\",\"R\",\"{'R': 'Hard'}\"\n",
        )
        .unwrap();
        let sets = gen.generate_round_sets(Some(1));
        assert_eq!(sets.len(), ROUND_SIZE);
        assert!(sets.iter().all(|s| s.center == "R" && s.seed_word == "ARTENS"));
        assert!(sets.iter().all(|s| s.difficulty == Difficulty::Hard));
    }

    #[test]
    fn test_unloaded_generator_uses_fallback() {
        let gen = LetterGenerator::new(TextSource::inline(CORPUS));
        let sets = gen.generate_round_sets(Some(3));
        assert_eq!(sets.len(), ROUND_SIZE);
        let centers: HashSet<&Tile> = sets.iter().map(|s| &s.center).collect();
        assert_eq!(centers.len(), ROUND_SIZE);
        assert!(sets.iter().all(|s| s.seed_word == FALLBACK_SEED_WORD));
    }

    #[test]
    fn test_fallback_set_shape() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let set = fallback_letter_set(&mut rng, &["R".to_string(), "S".to_string()]);
            assert!(set.center != "R" && set.center != "S");
            assert_eq!(set.surrounding.len(), SURROUNDING_TILES);
            assert!(!set.surrounding.contains(&set.center));

            let distinct: HashSet<&Tile> = set.surrounding.iter().collect();
            assert_eq!(distinct.len(), SURROUNDING_TILES);

            let vowels = set
                .surrounding
                .iter()
                .filter(|t| VOWELS.contains(&t.as_str()))
                .count();
            let common = set
                .surrounding
                .iter()
                .filter(|t| COMMON_CONSONANTS.contains(&t.as_str()))
                .count();
            assert!(vowels >= 2);
            assert!((1..=2).contains(&common));
        }
    }

    #[test]
    fn test_fallback_ignores_exclusions_when_pool_exhausted() {
        let mut rng = StdRng::seed_from_u64(5);
        let all: Vec<Tile> = FALLBACK_CENTERS.iter().map(|c| c.to_string()).collect();
        let set = fallback_letter_set(&mut rng, &all);
        assert!(FALLBACK_CENTERS.contains(&set.center.as_str()));
    }

    #[test]
    fn test_hard_centers_favoured() {
        let entry = parse_corpus_row("XXXXXX,\"A,B,C,D,E,F\",\"A,B\",\"{'A': 'Easy', 'B': 'Hard'}\"")
            .unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let hard = (0..3000)
            .filter(|_| entry.pick_center(&mut rng) == "B")
            .count();
        // Expected share is 2/3.
        assert!(hard > 1800 && hard < 2200, "hard picked {} times", hard);
    }
}
