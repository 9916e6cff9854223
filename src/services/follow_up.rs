//! Follow-up question suggestion.
//!
//! Picks one of the retrieved passages' stored questions as a "you might
//! also ask" hint. Candidates too close to the asked question are skipped;
//! the rest are ranked by how many of the answer's longer words they mention.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::domain::models::RetrievedPassage;

/// Candidates above this closeness to the asked question are dropped.
pub const MAX_SIMILARITY: f64 = 0.6;

/// Answer words must be longer than this many characters to count.
const MIN_WORD_CHARS: usize = 5;

const STRIP_CHARS: &[char] = &['.', ',', '!', '?', '(', ')', '[', ']', '{', '}', ':', ';', '"', '\''];

/// Ratcliff/Obershelp similarity of two strings, case-insensitive.
///
/// Returns `2 * M / T` where `M` is the number of matched characters and
/// `T` the total character count of both strings. Two empty strings are
/// identical (1.0). When `b` has at least [`AUTOJUNK_MIN_LEN`] characters,
/// characters making up more than 1% of it cannot start a match, though
/// they can still extend one.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let popular = popular_chars(&b);
    2.0 * matching_chars(&a, &b, &popular) as f64 / total as f64
}

/// Below this length of `b` no character counts as popular.
pub const AUTOJUNK_MIN_LEN: usize = 200;

/// Characters occurring more than `len / 100 + 1` times in a long `b`.
fn popular_chars(b: &[char]) -> HashSet<char> {
    if b.len() < AUTOJUNK_MIN_LEN {
        return HashSet::new();
    }
    let threshold = b.len() / 100 + 1;
    let mut counts: HashMap<char, usize> = HashMap::new();
    for &c in b {
        *counts.entry(c).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|&(_, n)| n > threshold)
        .map(|(c, _)| c)
        .collect()
}

/// Sum of the lengths of recursively found longest common blocks.
fn matching_chars(a: &[char], b: &[char], popular: &HashSet<char>) -> usize {
    let (start_a, start_b, len) = longest_common_block(a, b, popular);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..start_a], &b[..start_b], popular)
        + matching_chars(&a[start_a + len..], &b[start_b + len..], popular)
}

/// Longest common substring free of popular characters, then widened over
/// equal neighbours. Earliest in `a`, then earliest in `b`, wins ties.
fn longest_common_block(a: &[char], b: &[char], popular: &HashSet<char>) -> (usize, usize, usize) {
    let (mut start_a, mut start_b, mut len) = (0, 0, 0);
    // run[j + 1] = length of the common run ending at a[i], b[j]
    let mut prev = vec![0usize; b.len() + 1];
    let mut run = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        for (j, cb) in b.iter().enumerate() {
            run[j + 1] = if ca == cb && !popular.contains(cb) { prev[j] + 1 } else { 0 };
            let k = run[j + 1];
            if k > len {
                (start_a, start_b, len) = (i + 1 - k, j + 1 - k, k);
            }
        }
        std::mem::swap(&mut prev, &mut run);
    }

    while start_a > 0 && start_b > 0 && a[start_a - 1] == b[start_b - 1] {
        start_a -= 1;
        start_b -= 1;
        len += 1;
    }
    while start_a + len < a.len() && start_b + len < b.len() && a[start_a + len] == b[start_b + len] {
        len += 1;
    }
    (start_a, start_b, len)
}

/// Distinct lowercased answer words longer than five characters.
fn keywords(answer: &str) -> BTreeSet<String> {
    answer
        .split_whitespace()
        .filter(|word| word.chars().count() > MIN_WORD_CHARS)
        .map(|word| word.to_lowercase().trim_matches(STRIP_CHARS).to_string())
        .filter(|word| !word.is_empty())
        .collect()
}

struct Candidate<'a> {
    question: &'a str,
    similarity: f64,
    matches: usize,
}

/// Suggest a follow-up question, or `None` when no passage qualifies.
///
/// # Arguments
/// * `asked` - The question the user asked
/// * `answer` - The generated answer
/// * `passages` - Retrieved passages, most relevant first
pub fn suggest_follow_up(asked: &str, answer: &str, passages: &[RetrievedPassage]) -> Option<String> {
    let keywords = keywords(answer);

    let mut candidates: Vec<Candidate<'_>> = passages
        .iter()
        .filter_map(|passage| {
            let question = passage.question()?.trim();
            if question.is_empty() {
                return None;
            }
            let similarity = similarity_ratio(asked, question);
            if similarity > MAX_SIMILARITY {
                return None;
            }
            let lowered = question.to_lowercase();
            let matches = keywords.iter().filter(|word| lowered.contains(word.as_str())).count();
            Some(Candidate {
                question,
                similarity,
                matches,
            })
        })
        .collect();

    // stable: equal keys keep retrieval order
    candidates.sort_by(|a, b| {
        b.matches
            .cmp(&a.matches)
            .then(a.similarity.total_cmp(&b.similarity))
    });

    candidates.first().map(|c| c.question.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::META_QUESTION;

    fn stored(question: &str) -> RetrievedPassage {
        RetrievedPassage::new("answer body", 0.5).with_metadata(META_QUESTION, question)
    }

    #[test]
    fn test_similarity_ratio_known_values() {
        assert_eq!(similarity_ratio("abcd", "bcde"), 0.75);
        assert_eq!(similarity_ratio("Qubit", "qubit"), 1.0);
        assert_eq!(similarity_ratio("abc", "xyz"), 0.0);
        assert_eq!(similarity_ratio("", ""), 1.0);
        assert_eq!(similarity_ratio("abc", ""), 0.0);
    }

    #[test]
    fn test_popular_characters_in_long_candidates_cannot_start_a_match() {
        let long = "how does a qubit differ from a classical bit when measured ".repeat(5);
        let long: String = long.chars().take(250).collect();

        // every letter of the asked question is popular in the long candidate
        assert_eq!(similarity_ratio("what is a qubit?", &long), 0.0);
        assert!(similarity_ratio("what is a qubit?", &long[..150]) > 0.0);
    }

    #[test]
    fn test_popular_characters_still_extend_a_match() {
        let candidate = format!("{}qubit{}", "x".repeat(150), "y".repeat(45));

        let r = similarity_ratio("xxqubit", &candidate);
        assert!((r - 14.0 / 207.0).abs() < 1e-12);
        let r = similarity_ratio("qubit", &candidate);
        assert!((r - 10.0 / 205.0).abs() < 1e-12);
    }

    #[test]
    fn test_similarity_ratio_is_bounded() {
        let r = similarity_ratio("What is a qubit?", "What is quantum entanglement?");
        assert!((0.0..=1.0).contains(&r));
    }

    #[test]
    fn test_skips_near_duplicates_of_asked_question() {
        let passages = vec![stored("What is a qubit?"), stored("How do quantum gates work?")];
        let suggestion = suggest_follow_up("what is a qubit", "Qubits hold superposition.", &passages);
        assert_eq!(suggestion.as_deref(), Some("How do quantum gates work?"));
    }

    #[test]
    fn test_prefers_questions_mentioning_answer_keywords() {
        let passages = vec![
            stored("Why is error correction hard?"),
            stored("What does entanglement enable?"),
        ];
        let answer = "Qubits can share entanglement, which enables teleportation.";
        let suggestion = suggest_follow_up("Tell me about qubits", answer, &passages);
        assert_eq!(suggestion.as_deref(), Some("What does entanglement enable?"));
    }

    #[test]
    fn test_no_candidates() {
        assert_eq!(suggest_follow_up("What is a qubit?", "answer", &[]), None);
        let unlabeled = vec![RetrievedPassage::new("body", 0.9), stored("   ")];
        assert_eq!(suggest_follow_up("What is a qubit?", "answer", &unlabeled), None);
    }

    #[test]
    fn test_keywords_strip_punctuation_and_short_words() {
        let words = keywords("Quantum (entanglement), is \"spooky\" action!");
        assert!(words.contains("quantum"));
        assert!(words.contains("entanglement"));
        assert!(words.contains("action"));
        assert!(words.contains("spooky"));
        assert!(!words.contains("is"));
        assert!(!keywords("a tiny qubit").contains("qubit"));
    }
}
