//! Line parser for the `ssh_config(5)` syntax.
//!
//! Each non-blank, non-comment line is `Keyword value` or `Keyword=value`.
//! `Host` and `Match` lines open a new block; everything before the first
//! one lands in the global block.

use crate::{Block, BlockKind, Directive, HostPattern, ParseError, SshConfig};

/// Parse configuration text.
pub fn parse(input: &str) -> Result<SshConfig, ParseError> {
    let mut blocks = vec![Block {
        kind: BlockKind::Global,
        directives: Vec::new(),
    }];

    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (keyword, value) = split_directive(trimmed);
        if value.is_empty() {
            return Err(ParseError {
                line,
                message: format!("missing argument for '{}'", keyword),
            });
        }
        if keyword.eq_ignore_ascii_case("Host") {
            let patterns = split_args(value, line)?
                .iter()
                .map(|p| {
                    HostPattern::new(p).map_err(|e| ParseError {
                        line,
                        message: format!("invalid host pattern '{}': {}", p, e),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            blocks.push(Block {
                kind: BlockKind::Host(patterns),
                directives: Vec::new(),
            });
            continue;
        }

        let value = unquote(value, line)?;
        if value.is_empty() {
            return Err(ParseError {
                line,
                message: format!("missing argument for '{}'", keyword),
            });
        }
        if keyword.eq_ignore_ascii_case("Match") {
            blocks.push(Block {
                kind: BlockKind::Match(value.to_string()),
                directives: Vec::new(),
            });
        } else if let Some(block) = blocks.last_mut() {
            block.directives.push(Directive {
                keyword: keyword.to_string(),
                value: value.to_string(),
            });
        }
    }

    if blocks[0].directives.is_empty() {
        blocks.remove(0);
    }

    Ok(SshConfig { blocks })
}

/// Parse configuration bytes as read from disk.
///
/// Invalid UTF-8 is reported on the line holding the first bad byte.
pub fn parse_bytes(input: &[u8]) -> Result<SshConfig, ParseError> {
    let text = std::str::from_utf8(input).map_err(|e| {
        let valid = &input[..e.valid_up_to()];
        ParseError {
            line: valid.iter().filter(|&&b| b == b'\n').count() + 1,
            message: "invalid UTF-8".to_string(),
        }
    })?;
    parse(text)
}

/// Split a trimmed line into keyword and the (possibly empty) argument text.
fn split_directive(line: &str) -> (&str, &str) {
    let end = line
        .find(|c: char| c.is_whitespace() || c == '=')
        .unwrap_or(line.len());
    let (keyword, rest) = line.split_at(end);

    let rest = rest.trim_start();
    let rest = rest.strip_prefix('=').unwrap_or(rest);
    (keyword, rest.trim())
}

/// Strip one pair of quotes enclosing the whole value; reject unbalanced quotes.
fn unquote(value: &str, line: usize) -> Result<&str, ParseError> {
    if value.matches('"').count() % 2 != 0 {
        return Err(ParseError {
            line,
            message: "unterminated quote".to_string(),
        });
    }
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        let inner = &value[1..value.len() - 1];
        // `"a" "b"` is two quoted words, not one quoted value
        if !inner.contains('"') {
            return Ok(inner);
        }
    }
    Ok(value)
}

/// Split whitespace-separated arguments, honoring double quotes.
fn split_args(value: &str, line: usize) -> Result<Vec<String>, ParseError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in value.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if in_quotes {
        return Err(ParseError {
            line,
            message: "unterminated quote".to_string(),
        });
    }
    if !current.is_empty() {
        args.push(current);
    }
    if args.is_empty() {
        return Err(ParseError {
            line,
            message: "missing argument for 'Host'".to_string(),
        });
    }
    Ok(args)
}
