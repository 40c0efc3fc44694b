//! OpenSSH client configuration reader.
//!
//! Parses the `ssh_config(5)` syntax into an ordered list of blocks and
//! answers per-host lookups with OpenSSH's first-obtained-value-wins rule:
//! blocks are consulted in file order and the first block that matches the
//! host and carries the keyword supplies the value.

mod parser;
mod pattern;

pub use parser::{parse, parse_bytes};
pub use pattern::HostPattern;

use std::str::FromStr;

/// Error raised while parsing a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    /// 1-based line number of the offending line
    pub line: usize,
    pub message: String,
}

/// A parsed OpenSSH client configuration.
#[derive(Debug, Clone, Default)]
pub struct SshConfig {
    blocks: Vec<Block>,
}

/// What selects the directives of a block.
#[derive(Debug, Clone)]
pub enum BlockKind {
    /// Directives that appear before the first `Host` or `Match` line.
    Global,
    /// `Host pattern...`
    Host(Vec<HostPattern>),
    /// `Match criteria...`; kept verbatim, never applied during lookup.
    Match(String),
}

/// One `Host`/`Match` section (or the leading global section).
#[derive(Debug, Clone)]
pub struct Block {
    pub kind: BlockKind,
    pub directives: Vec<Directive>,
}

/// A single `Keyword value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Keyword as written in the file
    pub keyword: String,
    /// Argument text with one pair of enclosing quotes removed
    pub value: String,
}

impl SshConfig {
    /// All blocks in file order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Look up the effective value of `keyword` for `host`.
    pub fn get(&self, host: &str, keyword: &str) -> Option<&str> {
        self.blocks
            .iter()
            .filter(|b| b.applies_to(host))
            .find_map(|b| b.get(keyword))
    }

    /// Every value of a repeatable keyword (e.g. `IdentityFile`) for `host`,
    /// in the order OpenSSH would try them.
    pub fn get_all(&self, host: &str, keyword: &str) -> Vec<&str> {
        self.blocks
            .iter()
            .filter(|b| b.applies_to(host))
            .flat_map(|b| {
                b.directives
                    .iter()
                    .filter(move |d| d.keyword.eq_ignore_ascii_case(keyword))
                    .map(|d| d.value.as_str())
            })
            .collect()
    }

    /// Concrete host names declared on `Host` lines.
    ///
    /// Patterns containing wildcards and negated patterns are left out.
    /// Each name appears once, in order of first declaration.
    pub fn host_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for block in &self.blocks {
            if let BlockKind::Host(patterns) = &block.kind {
                for pattern in patterns {
                    if pattern.is_negated() || pattern.has_wildcard() {
                        continue;
                    }
                    if !names.contains(&pattern.as_str()) {
                        names.push(pattern.as_str());
                    }
                }
            }
        }
        names
    }
}

impl FromStr for SshConfig {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl Block {
    /// Whether this block's directives apply to `host`.
    pub fn applies_to(&self, host: &str) -> bool {
        match &self.kind {
            BlockKind::Global => true,
            BlockKind::Host(patterns) => {
                let mut matched = false;
                for pattern in patterns {
                    if pattern.matches(host) {
                        if pattern.is_negated() {
                            return false;
                        }
                        matched = true;
                    }
                }
                matched
            }
            BlockKind::Match(_) => false,
        }
    }

    /// First value of `keyword` in this block (case-insensitive keyword).
    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.directives
            .iter()
            .find(|d| d.keyword.eq_ignore_ascii_case(keyword))
            .map(|d| d.value.as_str())
    }
}
