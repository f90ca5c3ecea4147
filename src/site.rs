//! SiteFilter: hostname eligibility by site mode
//!
//! List entries are case-insensitive substrings of the hostname, not host
//! suffixes: `"example.com"` matches `"www.example.com"` and
//! `"example.com.evil.net"` alike. That containment semantics is intentional
//! and preserved as-is.

use crate::settings::SiteMode;

/// Decide whether evaluation should run on `hostname` at all.
///
/// - `All` → always eligible.
/// - `Whitelist` → eligible iff the hostname contains at least one entry;
///   an empty whitelist admits nothing.
/// - `Blacklist` → eligible iff the hostname contains no entry; an empty
///   blacklist blocks nothing.
pub fn is_eligible(hostname: &str, mode: SiteMode, whitelist: &[String], blacklist: &[String]) -> bool {
    let host = hostname.to_lowercase();
    match mode {
        SiteMode::All => true,
        SiteMode::Whitelist => whitelist
            .iter()
            .any(|entry| host.contains(&entry.to_lowercase())),
        SiteMode::Blacklist => !blacklist
            .iter()
            .any(|entry| host.contains(&entry.to_lowercase())),
    }
}

// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn list(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_all_mode_is_always_eligible() {
        assert!(is_eligible("y.com", SiteMode::All, &[], &[]));
        assert!(is_eligible("", SiteMode::All, &list(&["x"]), &list(&["y"])));
    }

    #[test]
    fn test_whitelist_substring_containment() {
        let wl = list(&["example.com"]);
        assert!(is_eligible("www.example.com", SiteMode::Whitelist, &wl, &[]));
        assert!(!is_eligible("other.com", SiteMode::Whitelist, &wl, &[]));
    }

    #[test]
    fn test_whitelist_is_case_insensitive() {
        let wl = list(&["Example.COM"]);
        assert!(is_eligible("WWW.EXAMPLE.com", SiteMode::Whitelist, &wl, &[]));
    }

    #[test]
    fn test_empty_whitelist_admits_nothing() {
        assert!(!is_eligible("example.com", SiteMode::Whitelist, &[], &[]));
    }

    #[test]
    fn test_blacklist_blocks_containment() {
        let bl = list(&["x.com"]);
        assert!(!is_eligible("x.com", SiteMode::Blacklist, &[], &bl));
        assert!(!is_eligible("www.x.com", SiteMode::Blacklist, &[], &bl));
        assert!(is_eligible("y.com", SiteMode::Blacklist, &[], &bl));
    }

    #[test]
    fn test_empty_blacklist_blocks_nothing() {
        assert!(is_eligible("y.com", SiteMode::Blacklist, &[], &[]));
    }

    #[test]
    fn test_containment_goes_both_directions() {
        // Documented limitation: an entry matches any host that merely
        // contains it, including lookalike registrations.
        let wl = list(&["bank.com"]);
        assert!(is_eligible("bank.com.phish.net", SiteMode::Whitelist, &wl, &[]));
    }
}
