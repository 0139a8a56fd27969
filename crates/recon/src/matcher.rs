use serde::{Deserialize, Serialize};

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Options + result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MatchOptions {
    /// Lowercase and replace non-alphanumerics with spaces before scoring.
    #[serde(default)]
    pub normalize: bool,
}

/// Best candidate for a query: index into the candidate list, score in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchResult {
    pub index: usize,
    pub score: f64,
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Lowercase, map every non-alphanumeric char to a space, trim.
pub fn normalize_text(s: &str) -> String {
    let mapped: String = s
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    mapped.trim().to_string()
}

/// Whitespace tokens sorted lexicographically, joined by single spaces.
pub fn sort_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Normalized Indel similarity: `100 * 2 * LCS / (len_a + len_b)`, over chars.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

/// Order-insensitive similarity: sort tokens of both strings, then [`ratio`].
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sort_tokens(a), &sort_tokens(b))
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    100.0 * (2 * lcs_len(a, b)) as f64 / total as f64
}

/// Longest common subsequence length, single rolling row over the shorter input.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let mut row = vec![0usize; short.len() + 1];

    for &lc in long {
        let mut diag = 0;
        for (j, &sc) in short.iter().enumerate() {
            let up = row[j + 1];
            row[j + 1] = if lc == sc { diag + 1 } else { up.max(row[j]) };
            diag = up;
        }
    }

    row[short.len()]
}

// ---------------------------------------------------------------------------
// Candidate pool
// ---------------------------------------------------------------------------

/// Candidates pre-processed once (normalized, token-sorted, split into chars)
/// so a batch scores each name without re-tokenizing it per query.
#[derive(Debug, Clone)]
pub struct CandidatePool {
    options: MatchOptions,
    prepared: Vec<Vec<char>>,
}

impl CandidatePool {
    pub fn new<S: AsRef<str>>(candidates: &[S], options: MatchOptions) -> Self {
        let prepared = candidates
            .iter()
            .map(|c| prepare(c.as_ref(), options).chars().collect())
            .collect();
        Self { options, prepared }
    }

    pub fn len(&self) -> usize {
        self.prepared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prepared.is_empty()
    }

    /// Highest-scoring candidate. Ties go to the earliest candidate.
    pub fn best_match(&self, query: &str) -> Result<MatchResult, ReconError> {
        let query: Vec<char> = prepare(query, self.options).chars().collect();
        let mut best: Option<MatchResult> = None;

        for (index, candidate) in self.prepared.iter().enumerate() {
            let score = ratio_chars(&query, candidate);
            if best.map_or(true, |b| score > b.score) {
                best = Some(MatchResult { index, score });
                if score >= 100.0 {
                    break;
                }
            }
        }

        best.ok_or(ReconError::EmptyReferenceTable)
    }
}

fn prepare(s: &str, options: MatchOptions) -> String {
    if options.normalize {
        sort_tokens(&normalize_text(s))
    } else {
        sort_tokens(s)
    }
}

/// Best match for `query` among `candidates` by token-sort ratio.
///
/// Fails with [`ReconError::EmptyReferenceTable`] when `candidates` is empty.
pub fn best_match<S: AsRef<str>>(query: &str, candidates: &[S]) -> Result<MatchResult, ReconError> {
    best_match_with(query, candidates, MatchOptions::default())
}

pub fn best_match_with<S: AsRef<str>>(
    query: &str,
    candidates: &[S],
    options: MatchOptions,
) -> Result<MatchResult, ReconError> {
    CandidatePool::new(candidates, options).best_match(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn ratio_basics() {
        assert!(close(ratio("abc", "abc"), 100.0));
        assert!(close(ratio("", ""), 100.0));
        assert!(close(ratio("abc", ""), 0.0));
        assert!(close(ratio("abc", "xyz"), 0.0));
        // LCS("kitten", "sitting") = 4 ("ittn") -> 2*4/13
        assert!(close(ratio("kitten", "sitting"), 800.0 / 13.0));
    }

    #[test]
    fn ratio_counts_chars_not_bytes() {
        // "é" is two bytes but one char
        assert!(close(ratio("café", "cafe"), 75.0));
    }

    #[test]
    fn token_order_does_not_matter() {
        assert!(close(token_sort_ratio("fuel diesel", "diesel fuel"), 100.0));
        assert!(close(token_sort_ratio("  diesel   fuel ", "fuel diesel"), 100.0));
    }

    #[test]
    fn token_sort_is_case_sensitive_by_default() {
        assert!(token_sort_ratio("Diesel Fuel", "diesel fuel") < 100.0);
    }

    #[test]
    fn token_sort_known_value() {
        // sorted: "A Diesel Fuel Type" (18) vs "Diesel Fuel" (11), LCS = 11
        assert!(close(token_sort_ratio("Diesel Fuel Type A", "Diesel Fuel"), 2200.0 / 29.0));
    }

    #[test]
    fn normalize_text_strips_punctuation() {
        assert_eq!(normalize_text("  Diesel-Fuel (B7) "), "diesel fuel  b7");
        assert_eq!(sort_tokens(&normalize_text("Diesel-Fuel (B7)")), "b7 diesel fuel");
    }

    #[test]
    fn best_match_picks_highest() {
        let names = ["Natural Gas", "Diesel Fuel", "Petrol"];
        let m = best_match("Diesel Fuel Type A", &names).unwrap();
        assert_eq!(m.index, 1);
        assert!(m.score > 50.0 && m.score < 100.0);
    }

    #[test]
    fn exact_candidate_scores_100() {
        let names = vec!["Coal".to_string(), "Fuel Oil".to_string(), "Propane".to_string()];
        let m = best_match("Fuel Oil", &names).unwrap();
        assert_eq!(m.index, 1);
        assert!(close(m.score, 100.0));
    }

    #[test]
    fn ties_go_to_first_candidate() {
        let names = ["Diesel", "Petrol", "Diesel"];
        let m = best_match("Diesel", &names).unwrap();
        assert_eq!(m.index, 0);

        // Equal non-perfect scores
        let names = ["ab", "ac"];
        let m = best_match("a", &names).unwrap();
        assert_eq!(m.index, 0);
    }

    #[test]
    fn empty_candidates_is_an_error() {
        let names: [&str; 0] = [];
        let err = best_match("diesel", &names).unwrap_err();
        assert!(matches!(err, ReconError::EmptyReferenceTable));
    }

    #[test]
    fn normalize_option_ignores_case_and_punctuation() {
        let names = ["DIESEL FUEL", "petrol"];
        let m = best_match_with("diesel-fuel", &names, MatchOptions { normalize: true }).unwrap();
        assert_eq!(m.index, 0);
        assert!(close(m.score, 100.0));
    }

    #[test]
    fn pool_reuse_matches_one_shot() {
        let names = ["Natural Gas", "Diesel Fuel", "Petrol", "Kerosene"];
        let pool = CandidatePool::new(&names, MatchOptions::default());
        assert_eq!(pool.len(), 4);
        for q in ["Petrol 95", "kerosene", "Gas, natural"] {
            assert_eq!(pool.best_match(q).unwrap(), best_match(q, &names).unwrap());
        }
    }
}
