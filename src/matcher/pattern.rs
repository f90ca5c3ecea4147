//! Mention matching: name + reporting-verb adjacency
//!
//! A mention is a configured name directly adjacent to a reporting verb,
//! either order, separated by whitespace only: `"Elon Musk predicts"` or
//! `"says Elon Musk"`. Matching is case-insensitive and word-boundary
//! delimited where the name's edge characters support a boundary (names
//! like `"A.I."` or `"C++"` end in non-word characters; anchoring `\b`
//! against those would make them unmatchable, so the boundary is applied
//! per edge).
//!
//! Every user-supplied character is escaped: a name cannot break or inject
//! into the pattern.
//!
//! Cost model: one combined-pattern existence test plus one regex per
//! candidate name, O(names × text). An Aho-Corasick pass over the ASCII
//! names first drops names that never appear, so the per-name regexes only
//! run for plausible candidates. Acceptable on debounced triggers.

use std::collections::HashSet;

use aho_corasick::AhoCorasickBuilder;
use regex::{Regex, RegexBuilder};
use unicode_segmentation::UnicodeSegmentation;

use super::vocabulary::ReportingLexicon;

/// Bytes of context kept on each side of a match when clipping an excerpt.
const EXCERPT_RADIUS: usize = 48;

/// A single matched name with the clipped text around its first mention.
#[derive(Debug, Clone, PartialEq)]
pub struct MentionHit {
    pub name: String,
    pub excerpt: String,
}

// =============================================================================
// Pattern construction
// =============================================================================

/// Build the combined existence pattern over all usable names.
///
/// Returns `None` when no usable (non-blank) name remains or the verb
/// vocabulary is empty; evaluation treats that as "nothing configured" and
/// leaves the overlay untouched.
pub fn build_vocabulary_pattern(names: &[String], lexicon: &ReportingLexicon) -> Option<Regex> {
    if lexicon.is_empty() {
        return None;
    }
    let bounded: Vec<String> = usable_names(names).map(bounded_literal).collect();
    if bounded.is_empty() {
        return None;
    }
    let name_alt = format!("(?:{})", bounded.join("|"));
    compile_adjacency(&name_alt, &verb_alternation(lexicon))
}

/// Find every configured name participating in an adjacency match, in
/// configured order, each at most once.
pub fn find_matches(text: &str, names: &[String], lexicon: &ReportingLexicon) -> Vec<String> {
    find_mentions(text, names, lexicon)
        .into_iter()
        .map(|hit| hit.name)
        .collect()
}

/// Like [`find_matches`], additionally clipping an excerpt around the first
/// mention of each name for the quote-augmented overlay body.
pub fn find_mentions(text: &str, names: &[String], lexicon: &ReportingLexicon) -> Vec<MentionHit> {
    if lexicon.is_empty() {
        return Vec::new();
    }
    let usable: Vec<&str> = usable_names(names).collect();
    if usable.is_empty() {
        return Vec::new();
    }
    let verb_alt = verb_alternation(lexicon);
    let present = prescreen(text, &usable);

    let mut seen = HashSet::new();
    let mut hits = Vec::new();
    for (idx, name) in usable.iter().enumerate() {
        if !present[idx] || !seen.insert(*name) {
            continue;
        }
        let Some(re) = compile_adjacency(&bounded_literal(name), &verb_alt) else {
            continue;
        };
        if let Some(m) = re.find(text) {
            hits.push(MentionHit {
                name: (*name).to_string(),
                excerpt: clip_excerpt(text, m.start(), m.end()),
            });
        }
    }
    hits
}

fn usable_names(names: &[String]) -> impl Iterator<Item = &str> + '_ {
    names.iter().map(|n| n.as_str()).filter(|n| !n.trim().is_empty())
}

fn verb_alternation(lexicon: &ReportingLexicon) -> String {
    lexicon
        .forms()
        .iter()
        .map(|form| regex::escape(form))
        .collect::<Vec<_>>()
        .join("|")
}

/// Escape a name and wrap it in `\b` anchors on the edges that can carry a
/// word boundary.
fn bounded_literal(name: &str) -> String {
    let lead = name.chars().next().map(is_word_char).unwrap_or(false);
    let trail = name.chars().last().map(is_word_char).unwrap_or(false);
    format!(
        "{}{}{}",
        if lead { r"\b" } else { "" },
        regex::escape(name),
        if trail { r"\b" } else { "" },
    )
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn compile_adjacency(name_alt: &str, verb_alt: &str) -> Option<Regex> {
    let pattern = format!(
        r"(?:{n}\s+(?:{v})\b|\b(?:{v})\s+{n})",
        n = name_alt,
        v = verb_alt,
    );
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .ok()
}

/// Mark which names appear in the text at all. ASCII names go through an
/// Aho-Corasick pass (overlapping, case-insensitive); non-ASCII names skip
/// the fast path and stay candidates for the Unicode-aware regex.
fn prescreen(text: &str, names: &[&str]) -> Vec<bool> {
    let mut present = vec![true; names.len()];
    let ascii: Vec<(usize, &str)> = names
        .iter()
        .enumerate()
        .filter(|(_, n)| n.is_ascii())
        .map(|(i, n)| (i, *n))
        .collect();
    if ascii.is_empty() {
        return present;
    }
    let Ok(automaton) = AhoCorasickBuilder::new()
        .ascii_case_insensitive(true)
        .build(ascii.iter().map(|(_, n)| *n))
    else {
        return present;
    };
    for (idx, _) in &ascii {
        present[*idx] = false;
    }
    let mut remaining = ascii.len();
    for m in automaton.find_overlapping_iter(text) {
        let idx = ascii[m.pattern().as_usize()].0;
        if !present[idx] {
            present[idx] = true;
            remaining -= 1;
            if remaining == 0 {
                break;
            }
        }
    }
    present
}

// =============================================================================
// Excerpt clipping
// =============================================================================

/// Clip the text around a match span, snapping truncated edges to grapheme
/// boundaries and collapsing runs of whitespace.
fn clip_excerpt(text: &str, start: usize, end: usize) -> String {
    let mut lo = start.saturating_sub(EXCERPT_RADIUS);
    let mut hi = (end + EXCERPT_RADIUS).min(text.len());
    while lo > 0 && !text.is_char_boundary(lo) {
        lo -= 1;
    }
    while hi < text.len() && !text.is_char_boundary(hi) {
        hi += 1;
    }
    let mut slice = &text[lo..hi];
    // A char boundary is not a grapheme boundary; drop the edge clusters on
    // truncated sides rather than showing half of one.
    if lo > 0 {
        let mut graphemes = slice.grapheme_indices(true);
        graphemes.next();
        let offset = graphemes.next().map(|(i, _)| i).unwrap_or(slice.len());
        slice = &slice[offset..];
    }
    if hi < text.len() {
        if let Some((i, _)) = slice.grapheme_indices(true).last() {
            slice = &slice[..i];
        }
    }
    let collapsed = slice.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut excerpt = String::new();
    if lo > 0 {
        excerpt.push('…');
    }
    excerpt.push_str(&collapsed);
    if hi < text.len() {
        excerpt.push('…');
    }
    excerpt
}

// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|n| n.to_string()).collect()
    }

    fn lexicon() -> ReportingLexicon {
        ReportingLexicon::default()
    }

    // -------------------------------------------------------------------------
    // Pattern construction
    // -------------------------------------------------------------------------

    #[test]
    fn test_empty_names_build_no_pattern() {
        assert!(build_vocabulary_pattern(&[], &lexicon()).is_none());
    }

    #[test]
    fn test_blank_names_build_no_pattern() {
        assert!(build_vocabulary_pattern(&names(&["", "   "]), &lexicon()).is_none());
    }

    #[test]
    fn test_metacharacter_names_compile_and_match() {
        let ns = names(&["A.I.", "C++"]);
        let pattern = build_vocabulary_pattern(&ns, &lexicon()).expect("must compile");
        assert!(pattern.is_match("Today A.I. predicts the weather"));
        assert!(pattern.is_match("C++ says no"));
        // the dot is literal, not a wildcard
        assert!(!pattern.is_match("AxIx says no"));
    }

    #[test]
    fn test_word_boundary_blocks_substring_names() {
        let ns = names(&["Sam"]);
        let pattern = build_vocabulary_pattern(&ns, &lexicon()).unwrap();
        assert!(!pattern.is_match("Samson says hello"));
        assert!(pattern.is_match("Sam says hello"));
    }

    // -------------------------------------------------------------------------
    // find_matches / find_mentions
    // -------------------------------------------------------------------------

    #[test]
    fn test_end_to_end_example() {
        let found = find_matches(
            "Reports say Elon Musk predicts doom",
            &names(&["Elon Musk"]),
            &lexicon(),
        );
        assert_eq!(found, vec!["Elon Musk"]);
    }

    #[test]
    fn test_result_is_ordered_subsequence_without_duplicates() {
        let ns = names(&["Ada", "Elon Musk", "Grace", "Elon Musk"]);
        let found = find_matches(
            "Grace warned everyone. Elon Musk says hi. Elon Musk said bye.",
            &ns,
            &lexicon(),
        );
        assert_eq!(found, vec!["Elon Musk", "Grace"]);
    }

    #[test]
    fn test_verb_first_adjacency() {
        let found = find_matches("as says Elon Musk, anything goes", &names(&["Elon Musk"]), &lexicon());
        assert_eq!(found, vec!["Elon Musk"]);
    }

    #[test]
    fn test_adjacency_requires_whitespace_only() {
        let ns = names(&["Elon Musk"]);
        assert!(find_matches("Elon Musk quickly says hi", &ns, &lexicon()).is_empty());
        assert!(find_matches("Elon Musk is here", &ns, &lexicon()).is_empty());
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let found = find_matches("ELON MUSK SAYS HELLO", &names(&["Elon Musk"]), &lexicon());
        assert_eq!(found, vec!["Elon Musk"]);
    }

    #[test]
    fn test_non_ascii_name_bypasses_prescreen() {
        let found = find_matches("frau MÜLLER says ja", &names(&["Müller"]), &lexicon());
        assert_eq!(found, vec!["Müller"]);
    }

    #[test]
    fn test_empty_name_is_skipped_not_fatal() {
        let found = find_matches("Elon Musk says hi", &names(&["", "Elon Musk"]), &lexicon());
        assert_eq!(found, vec!["Elon Musk"]);
    }

    #[test]
    fn test_mention_excerpt_contains_name_and_verb() {
        let hits = find_mentions("Reports say Elon Musk predicts doom", &names(&["Elon Musk"]), &lexicon());
        assert_eq!(hits.len(), 1);
        assert!(hits[0].excerpt.contains("Elon Musk"));
        assert!(hits[0].excerpt.to_lowercase().contains("predicts"));
    }

    // -------------------------------------------------------------------------
    // Excerpt clipping
    // -------------------------------------------------------------------------

    #[test]
    fn test_excerpt_clips_long_context_with_ellipses() {
        let text = format!("{} Elon Musk says hi {}", "x".repeat(300), "y".repeat(300));
        let hits = find_mentions(&text, &names(&["Elon Musk"]), &lexicon());
        let excerpt = &hits[0].excerpt;
        assert!(excerpt.starts_with('…'), "excerpt: {}", excerpt);
        assert!(excerpt.ends_with('…'), "excerpt: {}", excerpt);
        assert!(excerpt.len() < 200);
    }

    #[test]
    fn test_excerpt_short_text_has_no_ellipses() {
        let hits = find_mentions("Elon Musk says hi", &names(&["Elon Musk"]), &lexicon());
        assert_eq!(hits[0].excerpt, "Elon Musk says hi");
    }

    #[test]
    fn test_excerpt_collapses_whitespace() {
        let hits = find_mentions("Elon Musk\n\t  says\n hi", &names(&["Elon Musk"]), &lexicon());
        assert_eq!(hits[0].excerpt, "Elon Musk says hi");
    }

    #[test]
    fn test_excerpt_never_splits_grapheme_clusters() {
        // the window edge lands inside the flag emoji run on both sides
        let text = format!("{} Elon Musk says hi {}", "🇺🇸".repeat(40), "🇺🇸".repeat(40));
        let hits = find_mentions(&text, &names(&["Elon Musk"]), &lexicon());
        // a torn cluster would produce a lone regional indicator; the excerpt
        // must remain valid, fully-formed text
        assert!(hits[0].excerpt.contains("Elon Musk"));
    }
}
