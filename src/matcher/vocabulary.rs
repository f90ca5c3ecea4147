//! Reporting-verb vocabulary: inflection-based surface forms
//!
//! Template-based conjugation: store base reporting verbs with a pattern and
//! generate every inflected form (`say` → says, said, saying). Compact
//! storage, O(1) membership, and one place to grow the verb list.

use std::collections::HashSet;

// =============================================================================
// Core Types
// =============================================================================

/// Conjugation pattern for English verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbPattern {
    /// Regular: warn → warns, warned, warning
    Regular,
    /// -e ending: state → states, stated, stating (drop e for -ing)
    RegularE,
    /// Consonant doubling: admit → admits, admitted, admitting
    DoubleConsonant,
    /// -y to -ies/-ied: deny → denies, denied, denying
    YToI,
    /// Irregular with explicit past and past participle
    Irregular {
        past: &'static str,
        past_participle: &'static str,
    },
}

/// A verb entry with base form and conjugation pattern
#[derive(Debug, Clone)]
pub struct VerbEntry {
    pub base: &'static str,
    pub pattern: VerbPattern,
}

impl VerbEntry {
    pub const fn regular(base: &'static str) -> Self {
        Self { base, pattern: VerbPattern::Regular }
    }

    pub const fn e_ending(base: &'static str) -> Self {
        Self { base, pattern: VerbPattern::RegularE }
    }

    pub const fn double_consonant(base: &'static str) -> Self {
        Self { base, pattern: VerbPattern::DoubleConsonant }
    }

    pub const fn y_to_i(base: &'static str) -> Self {
        Self { base, pattern: VerbPattern::YToI }
    }

    pub const fn irregular(base: &'static str, past: &'static str, past_participle: &'static str) -> Self {
        Self { base, pattern: VerbPattern::Irregular { past, past_participle } }
    }

    /// Generate all inflected forms of this verb
    pub fn inflections(&self) -> Vec<String> {
        let base = self.base;
        let mut forms = vec![base.to_string()];

        match &self.pattern {
            VerbPattern::Regular => {
                forms.push(third_singular(base));
                forms.push(format!("{}ed", base));
                forms.push(format!("{}ing", base));
            }
            VerbPattern::RegularE => {
                let stem = &base[..base.len() - 1];
                forms.push(third_singular(base));
                forms.push(format!("{}d", base));
                forms.push(format!("{}ing", stem));
            }
            VerbPattern::DoubleConsonant => {
                let last = &base[base.len() - 1..];
                forms.push(third_singular(base));
                forms.push(format!("{}{}ed", base, last));
                forms.push(format!("{}{}ing", base, last));
            }
            VerbPattern::YToI => {
                let stem = &base[..base.len() - 1];
                forms.push(format!("{}ies", stem));
                forms.push(format!("{}ied", stem));
                forms.push(format!("{}ing", base));
            }
            VerbPattern::Irregular { past, past_participle } => {
                forms.push(third_singular(base));
                forms.push(past.to_string());
                if past_participle != past {
                    forms.push(past_participle.to_string());
                }
                if let Some(stem) = base.strip_suffix('e') {
                    forms.push(format!("{}ing", stem));
                } else {
                    forms.push(format!("{}ing", base));
                }
            }
        }

        forms
    }
}

/// Third-person singular present form
fn third_singular(base: &str) -> String {
    if base.ends_with('s')
        || base.ends_with('x')
        || base.ends_with('z')
        || base.ends_with("ch")
        || base.ends_with("sh")
    {
        format!("{}es", base)
    } else {
        format!("{}s", base)
    }
}

// =============================================================================
// ReportingLexicon
// =============================================================================

/// Base reporting verbs the matcher pairs names with.
const REPORTING_VERBS: &[VerbEntry] = &[
    VerbEntry::irregular("say", "said", "said"),
    VerbEntry::irregular("tell", "told", "told"),
    VerbEntry::irregular("write", "wrote", "written"),
    VerbEntry::regular("claim"),
    VerbEntry::regular("predict"),
    VerbEntry::regular("warn"),
    VerbEntry::regular("report"),
    VerbEntry::regular("insist"),
    VerbEntry::regular("suggest"),
    VerbEntry::regular("assert"),
    VerbEntry::e_ending("argue"),
    VerbEntry::e_ending("state"),
    VerbEntry::e_ending("announce"),
    VerbEntry::e_ending("declare"),
    VerbEntry::y_to_i("deny"),
    VerbEntry::double_consonant("admit"),
    VerbEntry::regular("add"),
];

/// Fixed reporting-verb vocabulary, expanded from [`REPORTING_VERBS`].
///
/// Keeps the generated forms in a stable order (for pattern building) and a
/// set (for O(1) lookup).
#[derive(Debug)]
pub struct ReportingLexicon {
    forms: Vec<String>,
    lookup: HashSet<String>,
}

impl Default for ReportingLexicon {
    fn default() -> Self {
        Self::from_entries(REPORTING_VERBS)
    }
}

impl ReportingLexicon {
    pub fn from_entries(entries: &[VerbEntry]) -> Self {
        let mut forms = Vec::new();
        let mut lookup = HashSet::new();
        for entry in entries {
            for form in entry.inflections() {
                if lookup.insert(form.clone()) {
                    forms.push(form);
                }
            }
        }
        Self { forms, lookup }
    }

    /// All surface forms in generation order.
    pub fn forms(&self) -> &[String] {
        &self.forms
    }

    /// O(1) membership check, case-insensitive.
    pub fn is_reporting_verb(&self, word: &str) -> bool {
        self.lookup.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // VerbEntry Inflection Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_regular_inflections() {
        let forms = VerbEntry::regular("warn").inflections();
        assert!(forms.contains(&"warn".to_string()), "Missing base form");
        assert!(forms.contains(&"warns".to_string()), "Missing 3rd singular");
        assert!(forms.contains(&"warned".to_string()), "Missing past");
        assert!(forms.contains(&"warning".to_string()), "Missing present participle");
    }

    #[test]
    fn test_e_ending_inflections() {
        let forms = VerbEntry::e_ending("state").inflections();
        assert!(forms.contains(&"states".to_string()));
        assert!(forms.contains(&"stated".to_string()));
        assert!(forms.contains(&"stating".to_string()), "Should drop e");
        assert!(!forms.contains(&"stateing".to_string()));
    }

    #[test]
    fn test_double_consonant_inflections() {
        let forms = VerbEntry::double_consonant("admit").inflections();
        assert!(forms.contains(&"admits".to_string()));
        assert!(forms.contains(&"admitted".to_string()), "Should double consonant");
        assert!(forms.contains(&"admitting".to_string()), "Should double consonant");
    }

    #[test]
    fn test_y_to_i_inflections() {
        let forms = VerbEntry::y_to_i("deny").inflections();
        assert!(forms.contains(&"denies".to_string()), "y → ies");
        assert!(forms.contains(&"denied".to_string()), "y → ied");
        assert!(forms.contains(&"denying".to_string()), "y → ying");
    }

    #[test]
    fn test_irregular_inflections() {
        let forms = VerbEntry::irregular("say", "said", "said").inflections();
        assert!(forms.contains(&"say".to_string()));
        assert!(forms.contains(&"says".to_string()));
        assert!(forms.contains(&"said".to_string()));
        assert!(forms.contains(&"saying".to_string()));
        // past == participle stored once
        assert_eq!(forms.iter().filter(|f| *f == "said").count(), 1);
    }

    #[test]
    fn test_irregular_e_drop_for_ing() {
        let forms = VerbEntry::irregular("write", "wrote", "written").inflections();
        assert!(forms.contains(&"writing".to_string()));
        assert!(!forms.contains(&"writeing".to_string()));
        assert!(forms.contains(&"written".to_string()));
    }

    // -------------------------------------------------------------------------
    // ReportingLexicon Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_default_lexicon_covers_reporting_forms() {
        let lexicon = ReportingLexicon::default();
        for form in ["says", "said", "predicts", "claims", "warned", "announced", "denies"] {
            assert!(lexicon.is_reporting_verb(form), "missing form: {}", form);
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let lexicon = ReportingLexicon::default();
        assert!(lexicon.is_reporting_verb("Says"));
        assert!(lexicon.is_reporting_verb("SAID"));
    }

    #[test]
    fn test_non_verbs_rejected() {
        let lexicon = ReportingLexicon::default();
        assert!(!lexicon.is_reporting_verb("wizard"));
        assert!(!lexicon.is_reporting_verb(""));
    }

    #[test]
    fn test_forms_are_unique() {
        let lexicon = ReportingLexicon::default();
        let mut seen = HashSet::new();
        for form in lexicon.forms() {
            assert!(seen.insert(form), "duplicate form: {}", form);
        }
    }
}
