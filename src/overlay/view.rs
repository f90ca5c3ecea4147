//! Overlay view descriptor
//!
//! Pure view model: what the widget shows, with no DOM types. The host
//! mounts it; tests inspect it directly.

use std::collections::HashMap;

use crate::matcher::MentionHit;

pub const OVERLAY_TITLE: &str = "Call Them Out";
pub const OVERLAY_CAPTION: &str =
    "Matches show when the page pairs a watched name with a reporting verb.";

/// One matched name in the expanded body: name tag, the quote clipped from
/// the page, and how long ago this session first spotted it.
#[derive(Debug, Clone, PartialEq)]
pub struct MentionTag {
    pub name: String,
    pub excerpt: String,
    pub age: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayView {
    pub collapsed: bool,
    pub count_label: String,
    pub lead: String,
    pub tags: Vec<MentionTag>,
}

/// Assemble the view for the current matches and collapse flag.
pub fn build_view(
    hits: &[MentionHit],
    collapsed: bool,
    first_seen_ms: &HashMap<String, f64>,
    now_ms: f64,
) -> OverlayView {
    let count = hits.len();
    let count_label = format!("{} match{}", count, if count == 1 { "" } else { "es" });
    let lead = if hits.is_empty() {
        "We spotted a match.".to_string()
    } else {
        "We spotted mentions:".to_string()
    };
    let tags = hits
        .iter()
        .map(|hit| {
            let seen = first_seen_ms.get(&hit.name).copied().unwrap_or(now_ms);
            MentionTag {
                name: hit.name.clone(),
                excerpt: hit.excerpt.clone(),
                age: format_relative_age(now_ms - seen),
            }
        })
        .collect();
    OverlayView {
        collapsed,
        count_label,
        lead,
        tags,
    }
}

/// Wall-clock delta → "just now" / "42s ago" / "5m ago" / "2h ago".
pub fn format_relative_age(delta_ms: f64) -> String {
    if !(delta_ms.is_finite()) || delta_ms < 10_000.0 {
        return "just now".to_string();
    }
    let seconds = (delta_ms / 1000.0) as u64;
    if seconds < 60 {
        format!("{}s ago", seconds)
    } else if seconds < 3600 {
        format!("{}m ago", seconds / 60)
    } else {
        format!("{}h ago", seconds / 3600)
    }
}

// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn hit(name: &str) -> MentionHit {
        MentionHit {
            name: name.to_string(),
            excerpt: format!("{} says things", name),
        }
    }

    #[test]
    fn test_count_label_pluralizes() {
        let view = build_view(&[hit("Ada")], false, &HashMap::new(), 0.0);
        assert_eq!(view.count_label, "1 match");
        let view = build_view(&[hit("Ada"), hit("Grace")], false, &HashMap::new(), 0.0);
        assert_eq!(view.count_label, "2 matches");
    }

    #[test]
    fn test_tags_preserve_match_order() {
        let view = build_view(&[hit("Ada"), hit("Grace")], false, &HashMap::new(), 0.0);
        let names: Vec<&str> = view.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Grace"]);
    }

    #[test]
    fn test_tag_age_uses_first_seen_ledger() {
        let mut ledger = HashMap::new();
        ledger.insert("Ada".to_string(), 1_000.0);
        let view = build_view(&[hit("Ada")], false, &ledger, 301_000.0);
        assert_eq!(view.tags[0].age, "5m ago");
    }

    #[test]
    fn test_unseen_name_reads_just_now() {
        let view = build_view(&[hit("Ada")], false, &HashMap::new(), 5_000_000.0);
        assert_eq!(view.tags[0].age, "just now");
    }

    #[test]
    fn test_relative_age_buckets() {
        assert_eq!(format_relative_age(-50.0), "just now");
        assert_eq!(format_relative_age(3_000.0), "just now");
        assert_eq!(format_relative_age(42_000.0), "42s ago");
        assert_eq!(format_relative_age(125_000.0), "2m ago");
        assert_eq!(format_relative_age(7_200_000.0), "2h ago");
    }
}
