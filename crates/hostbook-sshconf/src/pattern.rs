//! `Host` line patterns.

use globset::{GlobBuilder, GlobMatcher};

/// Characters with wildcard meaning in a host pattern.
const WILDCARDS: &[char] = &['*', '?'];

/// One pattern from a `Host` line, e.g. `web*` or `!bastion`.
#[derive(Debug, Clone)]
pub struct HostPattern {
    text: String,
    negated: bool,
    matcher: GlobMatcher,
}

impl HostPattern {
    /// Compile a pattern. A leading `!` negates it.
    pub fn new(text: &str) -> Result<Self, globset::Error> {
        let (negated, body) = match text.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        // Only `*` and `?` are special in ssh_config; everything else is literal.
        let mut glob = String::with_capacity(body.len());
        for c in body.chars() {
            if WILDCARDS.contains(&c) {
                glob.push(c);
            } else {
                glob.push_str(&globset::escape(c.encode_utf8(&mut [0; 4])));
            }
        }

        let matcher = GlobBuilder::new(&glob)
            .case_insensitive(true)
            .literal_separator(false)
            .build()?
            .compile_matcher();

        Ok(Self {
            text: text.to_string(),
            negated,
            matcher,
        })
    }

    /// The pattern as written, including any `!`.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn has_wildcard(&self) -> bool {
        self.text.contains(WILDCARDS)
    }

    /// Whether the pattern body matches `host`, ignoring negation.
    pub fn matches(&self, host: &str) -> bool {
        self.matcher.is_match(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_pattern() {
        let p = HostPattern::new("db.internal").unwrap();
        assert!(p.matches("db.internal"));
        assert!(p.matches("DB.internal"));
        assert!(!p.matches("dbxinternal"));
        assert!(!p.has_wildcard());
        assert!(!p.is_negated());
    }

    #[test]
    fn test_wildcards() {
        let star = HostPattern::new("web*").unwrap();
        assert!(star.matches("web"));
        assert!(star.matches("web01.example.com"));
        assert!(!star.matches("api01"));
        assert!(star.has_wildcard());

        let single = HostPattern::new("node?").unwrap();
        assert!(single.matches("node1"));
        assert!(!single.matches("node12"));
        assert!(single.has_wildcard());
    }

    #[test]
    fn test_negation() {
        let p = HostPattern::new("!jump").unwrap();
        assert!(p.is_negated());
        assert!(p.matches("jump"));
        assert_eq!(p.as_str(), "!jump");
    }

    #[test]
    fn test_glob_metacharacters_are_literal() {
        let p = HostPattern::new("[host]").unwrap();
        assert!(p.matches("[host]"));
        assert!(!p.matches("h"));
    }
}
