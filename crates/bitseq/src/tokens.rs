//! Format string tokenisation
//!
//! Turns compact format strings such as `"u12, hex8, 0b110"`,
//! `"<2H3f"` or `"2*(b, u4)"` into a list of tokens for packing,
//! unpacking and reading. Handles `name:length` and `name=value`
//! tokens, `0x`/`0o`/`0b` literals, struct-style endian codes,
//! multiplicative factors and bracket expansion.

use std::sync::OnceLock;

use regex::Regex;

use crate::dtype::{self, DtypeKind};
use crate::error::{Error, Result};

/// A single parsed token from a format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    /// The dtype or literal-prefix name (`"uint"`, `"0x"`, ...).
    pub name: String,
    /// Length in token units, if one was given.
    pub length: Option<usize>,
    /// The value string from `name=value` tokens and literals.
    pub value: Option<String>,
}

impl Token {
    fn new(name: &str, length: Option<usize>, value: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            length,
            value,
        }
    }

    /// Whether this is a `0x` / `0o` / `0b` literal token.
    pub fn is_literal(&self) -> bool {
        matches!(self.name.as_str(), "0x" | "0o" | "0b")
    }
}

fn name_length_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Longest names first so the alternation prefers them.
        let mut names: Vec<&str> = dtype::registry().keys().copied().collect();
        names.sort_by_key(|n| std::cmp::Reverse(n.len()));
        let pattern = format!("^({}):?([0-9]*)$", names.join("|"));
        Regex::new(&pattern).expect("valid dtype name pattern")
    })
}

fn factor_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]+)\*(.+)$").expect("valid factor pattern"))
}

fn struct_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([<>@=])((?:[0-9]*[bBhHlLqQefd])+)$").expect("valid struct pattern")
    })
}

fn bracket_factor_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([0-9]+)\*$").expect("valid bracket factor pattern"))
}

/// Split a token such as `"u12"` or `"hex:8"` into its name and length.
pub(crate) fn parse_name_length_token(token: &str) -> Result<(String, Option<usize>)> {
    let caps = name_length_re()
        .captures(token)
        .ok_or_else(|| Error::value(format!("cannot parse token '{token}'")))?;
    let name = caps[1].to_string();
    let length = if caps[2].is_empty() {
        None
    } else {
        Some(caps[2].parse::<usize>().map_err(|_| {
            Error::value(format!("token '{token}' has an out of range length"))
        })?)
    };
    Ok((name, length))
}

/// Parse a whole format string into tokens.
pub(crate) fn tokenparser(fmt: &str) -> Result<Vec<Token>> {
    let compact: String = fmt.chars().filter(|c| !c.is_whitespace()).collect();
    let expanded = expand_brackets(&compact)?;
    let mut tokens = Vec::new();
    for item in expanded.split(',') {
        parse_item(item, &mut tokens)?;
    }
    Ok(tokens)
}

/// Expand `n*(...)` groups into comma-joined repetitions.
fn expand_brackets(s: &str) -> Result<String> {
    let mut s = s.to_string();
    loop {
        let Some(start) = s.find('(') else {
            if s.contains(')') {
                return Err(Error::value(format!("unbalanced parenthesis in '{s}'")));
            }
            return Ok(s);
        };
        let mut depth = 0usize;
        let mut close = None;
        for (i, c) in s.char_indices().skip(start) {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(i);
                        break;
                    }
                }
                _ => {}
            }
        }
        let Some(close) = close else {
            return Err(Error::value(format!("unbalanced parenthesis in '{s}'")));
        };
        let inner = s[start + 1..close].to_string();
        let before = &s[..start];
        if let Some(caps) = bracket_factor_re().captures(before) {
            let n: usize = caps[1]
                .parse()
                .map_err(|_| Error::value("bracket multiplier out of range"))?;
            let factor_start = before.len() - caps[0].len();
            let repeated = vec![inner; n].join(",");
            s = format!("{}{}{}", &s[..factor_start], repeated, &s[close + 1..]);
        } else {
            s = format!("{}{}{}", before, inner, &s[close + 1..]);
        }
    }
}

fn parse_item(item: &str, tokens: &mut Vec<Token>) -> Result<()> {
    if item.is_empty() {
        return Ok(());
    }
    // A leading integer factor repeats the rest of the item.
    if let Some(caps) = factor_re().captures(item) {
        let n: usize = caps[1]
            .parse()
            .map_err(|_| Error::value("token multiplier out of range"))?;
        let rest = caps[2].to_string();
        let mut repeated = Vec::new();
        parse_item(&rest, &mut repeated)?;
        for _ in 0..n {
            tokens.extend(repeated.iter().cloned());
        }
        return Ok(());
    }
    // Struct-style compact formats, e.g. "<2H3f".
    if let Some(caps) = struct_re().captures(item) {
        let endian = caps[1].as_bytes()[0] as char;
        expand_struct_tokens(endian, &caps[2], tokens)?;
        return Ok(());
    }
    // Hex, octal and binary literals.
    for prefix in ["0x", "0X", "0o", "0O", "0b", "0B"] {
        if let Some(rest) = item.strip_prefix(prefix) {
            // Literals never carry '=' values
            tokens.push(Token::new(
                &prefix.to_lowercase(),
                None,
                Some(rest.to_string()),
            ));
            return Ok(());
        }
    }
    // Plain "name", "name:length" or "name=value" tokens.
    let (head, value) = match item.split_once('=') {
        Some((head, value)) => (head, Some(value.to_string())),
        None => (item, None),
    };
    let (name, length) = parse_name_length_token(head)?;
    tokens.push(Token::new(&name, length, value));
    Ok(())
}

/// Expand the codes of a struct token into dtype tokens.
fn expand_struct_tokens(endian: char, codes: &str, tokens: &mut Vec<Token>) -> Result<()> {
    let mut count = 0usize;
    let mut have_count = false;
    for c in codes.chars() {
        if let Some(d) = c.to_digit(10) {
            count = count * 10 + d as usize;
            have_count = true;
            continue;
        }
        let (name, length) = struct_code(c, endian)?;
        let repeats = if have_count { count } else { 1 };
        for _ in 0..repeats {
            tokens.push(Token::new(name, Some(length), None));
        }
        count = 0;
        have_count = false;
    }
    Ok(())
}

fn struct_code(code: char, endian: char) -> Result<(&'static str, usize)> {
    let little = match endian {
        '<' => true,
        '>' => false,
        '@' | '=' => cfg!(target_endian = "little"),
        _ => return Err(Error::value(format!("unknown endianness '{endian}'"))),
    };
    let token = match (code, little) {
        ('b', _) => ("int", 8),
        ('B', _) => ("uint", 8),
        ('h', false) => ("intbe", 16),
        ('h', true) => ("intle", 16),
        ('H', false) => ("uintbe", 16),
        ('H', true) => ("uintle", 16),
        ('l', false) => ("intbe", 32),
        ('l', true) => ("intle", 32),
        ('L', false) => ("uintbe", 32),
        ('L', true) => ("uintle", 32),
        ('q', false) => ("intbe", 64),
        ('q', true) => ("intle", 64),
        ('Q', false) => ("uintbe", 64),
        ('Q', true) => ("uintle", 64),
        ('e', false) => ("float", 16),
        ('e', true) => ("floatle", 16),
        ('f', false) => ("float", 32),
        ('f', true) => ("floatle", 32),
        ('d', false) => ("float", 64),
        ('d', true) => ("floatle", 64),
        _ => return Err(Error::value(format!("unknown struct format code '{code}'"))),
    };
    Ok(token)
}

/// Resolve a token's name to its dtype kind.
pub(crate) fn token_kind(token: &Token) -> Result<DtypeKind> {
    dtype::lookup_kind(&token.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(fmt: &str) -> Vec<String> {
        tokenparser(fmt)
            .unwrap()
            .into_iter()
            .map(|t| match t.length {
                Some(l) => format!("{}{}", t.name, l),
                None => t.name,
            })
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        assert_eq!(names("u12, hex:8,bool"), ["u12", "hex8", "bool"]);
    }

    #[test]
    fn test_value_token() {
        let tokens = tokenparser("u12=352").unwrap();
        assert_eq!(tokens[0].name, "u");
        assert_eq!(tokens[0].length, Some(12));
        assert_eq!(tokens[0].value.as_deref(), Some("352"));
    }

    #[test]
    fn test_literal_tokens() {
        let tokens = tokenparser("0xff, 0b110").unwrap();
        assert!(tokens[0].is_literal());
        assert_eq!(tokens[0].value.as_deref(), Some("ff"));
        assert_eq!(tokens[1].name, "0b");
    }

    #[test]
    fn test_struct_format() {
        assert_eq!(
            names("<2H3f"),
            ["uintle16", "uintle16", "floatle32", "floatle32", "floatle32"]
        );
        assert_eq!(names(">bB"), ["int8", "uint8"]);
    }

    #[test]
    fn test_factor() {
        assert_eq!(names("3*u4"), ["u4", "u4", "u4"]);
    }

    #[test]
    fn test_bracket_expansion() {
        assert_eq!(names("2*(b, u4)"), ["b", "u4", "b", "u4"]);
        assert_eq!(names("(u8)"), ["u8"]);
    }

    #[test]
    fn test_unbalanced_brackets() {
        assert!(tokenparser("2*(u8").is_err());
        assert!(tokenparser("u8)").is_err());
    }

    #[test]
    fn test_unknown_name() {
        assert!(tokenparser("wibble4").is_err());
    }
}
