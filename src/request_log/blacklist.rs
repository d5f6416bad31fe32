//! Path blacklist deciding which requests are not logged.

use std::collections::HashSet;

/// Two independent rule sets matched case-insensitively against the
/// request path: prefixes first, then exact matches.
///
/// Entries are folded to lowercase once at construction, so a check
/// costs a single lowercase copy of the path.
#[derive(Clone, Debug, Default)]
pub struct Blacklist {
    starts_with: Vec<String>,
    equality: HashSet<String>,
}

impl Blacklist {
    pub fn new<I, J, S, T>(starts_with: I, equality: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            starts_with: starts_with
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
            equality: equality
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// A blacklist that lets every path through.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `false` when `path` is blacklisted.
    pub fn should_log(&self, path: &str) -> bool {
        if self.starts_with.is_empty() && self.equality.is_empty() {
            return true;
        }

        let path = path.to_lowercase();

        if self.starts_with.iter().any(|prefix| path.starts_with(prefix.as_str())) {
            return false;
        }

        !self.equality.contains(&path)
    }

    pub fn is_empty(&self) -> bool {
        self.starts_with.is_empty() && self.equality.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blacklist() -> Blacklist {
        Blacklist::new(["/static/", "/Internal"], ["/health", "/metrics"])
    }

    #[test]
    fn test_prefix_match() {
        let bl = blacklist();
        assert!(!bl.should_log("/static/app.js"));
        assert!(!bl.should_log("/STATIC/app.js"));
        assert!(!bl.should_log("/internal/debug"));
        assert!(!bl.should_log("/internal"));
        assert!(bl.should_log("/stat"));
    }

    #[test]
    fn test_equality_match() {
        let bl = blacklist();
        assert!(!bl.should_log("/health"));
        assert!(!bl.should_log("/HEALTH"));
        assert!(!bl.should_log("/Metrics"));

        // Exact only: longer paths still log
        assert!(bl.should_log("/health/deep"));
        assert!(bl.should_log("/healthz"));
    }

    #[test]
    fn test_unlisted_paths_log() {
        let bl = blacklist();
        assert!(bl.should_log("/orders/42"));
        assert!(bl.should_log("/"));
        assert!(bl.should_log(""));
    }

    #[test]
    fn test_empty_blacklist_logs_everything() {
        let bl = Blacklist::empty();
        assert!(bl.is_empty());
        assert!(bl.should_log("/health"));
        assert!(bl.should_log("/static/x"));
    }

    #[test]
    fn test_matches_either_set() {
        // For every path, blacklisted iff some prefix or some exact entry matches
        let prefixes = ["/a/", "/B"];
        let exact = ["/c", "/D/e"];
        let bl = Blacklist::new(prefixes, exact);

        for path in ["/a/", "/a/x", "/b", "/bcd", "/c", "/C", "/d/E", "/a", "/c/", "/d", "/x"] {
            let lower = path.to_lowercase();
            let expected_blocked = prefixes
                .iter()
                .any(|p| lower.starts_with(&p.to_lowercase()))
                || exact.iter().any(|e| lower == e.to_lowercase());
            assert_eq!(bl.should_log(path), !expected_blocked, "path {path}");
        }
    }
}
