//! Parser for `.properties` text.
//!
//! Follows the usual grammar: `#`/`!` comments, backslash line continuation,
//! keys terminated by an unescaped `=`, `:` or whitespace, and `\uXXXX`
//! escapes. Entries come back in file order; a later duplicate overrides an
//! earlier one once collected into a map.

use crate::error::{MessageFilesError, Result};

pub fn parse(content: &str) -> Result<Vec<(String, String)>> {
    let mut entries = Vec::new();
    for (line_no, logical) in logical_lines(content) {
        entries.push(parse_entry(&logical, line_no)?);
    }
    Ok(entries)
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\x0c'
}

// Joins continuation lines. Yields the 1-based number of the first physical
// line together with the joined text, escapes still raw.
fn logical_lines(content: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for (idx, raw) in physical_lines(content).into_iter().enumerate() {
        let line = raw.trim_start_matches(is_blank);

        let (start, mut text) = match current.take() {
            Some((start, text)) => (start, text),
            None => {
                if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                    continue;
                }
                (idx + 1, String::new())
            }
        };

        let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
        if trailing % 2 == 1 {
            text.push_str(&line[..line.len() - 1]);
            current = Some((start, text));
        } else {
            text.push_str(line);
            out.push((start, text));
        }
    }

    // A continuation on the final line just ends the entry.
    if let Some(pending) = current {
        out.push(pending);
    }
    out
}

fn physical_lines(content: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = content;
    while !rest.is_empty() {
        match rest.find(['\n', '\r']) {
            Some(pos) => {
                lines.push(&rest[..pos]);
                let skip = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[pos + skip..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }
    lines
}

fn parse_entry(logical: &str, line: usize) -> Result<(String, String)> {
    let chars: Vec<char> = logical.chars().collect();
    let mut i = 0;

    // Key runs up to the first unescaped separator.
    let mut key_end = chars.len();
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == '=' || c == ':' || is_blank(c) => {
                key_end = i;
                break;
            }
            _ => i += 1,
        }
    }
    let key_end = key_end.min(chars.len());

    let mut j = key_end;
    while j < chars.len() && is_blank(chars[j]) {
        j += 1;
    }
    if j < chars.len() && (chars[j] == '=' || chars[j] == ':') {
        j += 1;
    }
    while j < chars.len() && is_blank(chars[j]) {
        j += 1;
    }

    let key = unescape(&chars[..key_end], line)?;
    let value = unescape(&chars[j..], line)?;
    Ok((key, value))
}

fn unescape(chars: &[char], line: usize) -> Result<String> {
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(&escaped) = chars.get(i) else {
            break;
        };
        i += 1;
        match escaped {
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'f' => out.push('\x0c'),
            'u' => {
                let Some(code) = hex4(chars, i) else {
                    let near: String = chars.iter().skip(i).take(4).collect();
                    return Err(MessageFilesError::Malformed {
                        line,
                        reason: format!("malformed \\uXXXX encoding near \"\\u{}\"", near),
                    });
                };
                i += 4;

                // Non-BMP characters arrive as a UTF-16 surrogate pair.
                let mut decoded = char::from_u32(code);
                if (0xD800..=0xDBFF).contains(&code)
                    && chars.get(i) == Some(&'\\')
                    && chars.get(i + 1) == Some(&'u')
                {
                    if let Some(low) = hex4(chars, i + 2).filter(|l| (0xDC00..=0xDFFF).contains(l)) {
                        decoded = char::from_u32(0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00));
                        i += 6;
                    }
                }
                out.push(decoded.unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

// Exactly four ASCII hex digits starting at `at`.
fn hex4(chars: &[char], at: usize) -> Option<u32> {
    let digits = chars.get(at..at + 4)?;
    if !digits.iter().all(char::is_ascii_hexdigit) {
        return None;
    }
    let hex: String = digits.iter().collect();
    u32::from_str_radix(&hex, 16).ok()
}
