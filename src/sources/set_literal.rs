//! Parser for the set-of-strings literals written by the rule mining job.
//!
//! Accepted forms:
//!
//! ```text
//! frozenset({'python', "machine learning"})
//! frozenset()
//! {'sql'}
//! set()
//! ```
//!
//! Only string elements are allowed. Anything else is rejected.

use std::collections::BTreeSet;
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SetLiteralError {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected character {found:?} at offset {offset}, expected {expected}")]
    Unexpected {
        found: char,
        offset: usize,
        expected: &'static str,
    },

    #[error("unknown escape sequence \\{0}")]
    UnknownEscape(char),
}

type ParseResult<T> = Result<T, SetLiteralError>;

/// Parses a set literal into its string elements
pub fn parse_string_set(input: &str) -> ParseResult<BTreeSet<String>> {
    let mut parser = Parser {
        input,
        chars: input.char_indices().peekable(),
    };
    let set = parser.literal()?;
    parser.skip_whitespace();
    match parser.chars.next() {
        None => Ok(set),
        Some((offset, found)) => Err(SetLiteralError::Unexpected {
            found,
            offset,
            expected: "end of input",
        }),
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn literal(&mut self) -> ParseResult<BTreeSet<String>> {
        self.skip_whitespace();
        match self.peek()? {
            '{' => self.braced(),
            c if c.is_ascii_alphabetic() => self.constructor(),
            found => Err(self.unexpected(found, "'{' or set constructor")),
        }
    }

    /// `frozenset(...)` or `set(...)` wrapping an optional braced body
    fn constructor(&mut self) -> ParseResult<BTreeSet<String>> {
        let start = self.offset();
        while matches!(self.chars.peek(), Some((_, c)) if c.is_ascii_alphabetic()) {
            self.chars.next();
        }
        let name = &self.input[start..self.offset()];
        if name != "frozenset" && name != "set" {
            return Err(SetLiteralError::Unexpected {
                found: name.chars().next().unwrap_or(' '),
                offset: start,
                expected: "'frozenset' or 'set'",
            });
        }

        self.skip_whitespace();
        self.expect('(')?;
        self.skip_whitespace();
        let set = if self.peek()? == ')' {
            BTreeSet::new()
        } else {
            self.braced()?
        };
        self.skip_whitespace();
        self.expect(')')?;
        Ok(set)
    }

    fn braced(&mut self) -> ParseResult<BTreeSet<String>> {
        self.expect('{')?;
        let mut set = BTreeSet::new();
        loop {
            self.skip_whitespace();
            match self.peek()? {
                '}' => {
                    self.chars.next();
                    return Ok(set);
                }
                '\'' | '"' => {
                    set.insert(self.string()?);
                    self.skip_whitespace();
                    match self.next()? {
                        (_, ',') => continue,
                        (_, '}') => return Ok(set),
                        (offset, found) => {
                            return Err(SetLiteralError::Unexpected {
                                found,
                                offset,
                                expected: "',' or '}'",
                            })
                        }
                    }
                }
                found => return Err(self.unexpected(found, "string or '}'")),
            }
        }
    }

    fn string(&mut self) -> ParseResult<String> {
        let (_, quote) = self.next()?;
        let mut value = String::new();
        loop {
            match self.next()? {
                (_, c) if c == quote => return Ok(value),
                (_, '\\') => {
                    let (_, escaped) = self.next()?;
                    value.push(match escaped {
                        '\\' | '\'' | '"' => escaped,
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        other => return Err(SetLiteralError::UnknownEscape(other)),
                    });
                }
                (_, c) => value.push(c),
            }
        }
    }

    fn expect(&mut self, wanted: char) -> ParseResult<()> {
        match self.next()? {
            (_, c) if c == wanted => Ok(()),
            (offset, found) => Err(SetLiteralError::Unexpected {
                found,
                offset,
                expected: match wanted {
                    '(' => "'('",
                    ')' => "')'",
                    '{' => "'{'",
                    _ => "delimiter",
                },
            }),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some((_, c)) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn peek(&mut self) -> ParseResult<char> {
        self.chars
            .peek()
            .map(|&(_, c)| c)
            .ok_or(SetLiteralError::UnexpectedEnd)
    }

    fn next(&mut self) -> ParseResult<(usize, char)> {
        self.chars.next().ok_or(SetLiteralError::UnexpectedEnd)
    }

    fn offset(&mut self) -> usize {
        self.chars
            .peek()
            .map(|&(offset, _)| offset)
            .unwrap_or(self.input.len())
    }

    fn unexpected(&mut self, found: char, expected: &'static str) -> SetLiteralError {
        SetLiteralError::Unexpected {
            found,
            offset: self.offset(),
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_frozenset() {
        assert_eq!(
            parse_string_set("frozenset({'Python', 'Machine Learning'})").unwrap(),
            set(&["Python", "Machine Learning"])
        );
    }

    #[test]
    fn test_bare_braces_and_double_quotes() {
        assert_eq!(
            parse_string_set(r#"{"it's", 'sql',}"#).unwrap(),
            set(&["it's", "sql"])
        );
    }

    #[test]
    fn test_empty_forms() {
        assert!(parse_string_set("frozenset()").unwrap().is_empty());
        assert!(parse_string_set("set()").unwrap().is_empty());
        assert!(parse_string_set(" {} ").unwrap().is_empty());
    }

    #[test]
    fn test_escapes() {
        assert_eq!(
            parse_string_set(r"{'C\'s \\ path'}").unwrap(),
            set(&[r"C's \ path"])
        );
        assert_eq!(
            parse_string_set(r"{'\q'}"),
            Err(SetLiteralError::UnknownEscape('q'))
        );
    }

    #[test]
    fn test_rejects_expressions() {
        assert!(parse_string_set("__import__('os').system('ls')").is_err());
        assert!(parse_string_set("{1, 2}").is_err());
        assert!(parse_string_set("frozenset({'a'}) or {'b'}").is_err());
        assert!(parse_string_set("list(['a'])").is_err());
    }

    #[test]
    fn test_rejects_truncated_input() {
        assert_eq!(
            parse_string_set("frozenset({'a'"),
            Err(SetLiteralError::UnexpectedEnd)
        );
        assert_eq!(parse_string_set(""), Err(SetLiteralError::UnexpectedEnd));
    }
}
