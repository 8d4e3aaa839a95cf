// src/parser.rs
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::{EvalError, Result};

/// Characters the expression grammar reserves; everything else may appear in
/// an identifier, including any non-ASCII script.
pub const OPERATOR_CHARS: &str = "+-*/%^()<>=!&|,";

/// Deepest nesting of parentheses and prefix/power operators accepted.
pub const MAX_NESTING: usize = 64;

fn syntax(msg: impl Into<String>) -> EvalError {
    EvalError::Parse(msg.into())
}

/// Byte cursor over an expression. Always advances by whole chars so
/// multi-byte labels are never cut in half.
pub struct Parser<'a> {
    s: &'a str,
    i: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0, depth: 0 }
    }

    /// Enter one nesting level; pair with [`Parser::ascend`].
    pub fn descend(&mut self) -> Result<()> {
        if self.depth >= MAX_NESTING {
            return Err(syntax("expression nested too deeply"));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn is_ident_char(c: char) -> bool {
        !c.is_whitespace() && !OPERATOR_CHARS.contains(c)
    }

    pub fn at_identifier(&self) -> bool {
        self.peek_char()
            .map(|c| Self::is_ident_char(c) && !c.is_ascii_digit() && c != '.')
            .unwrap_or(false)
    }

    pub fn at_number(&self) -> bool {
        self.peek_char()
            .map(|c| c.is_ascii_digit() || c == '.')
            .unwrap_or(false)
    }

    pub fn parse_identifier(&mut self) -> Result<&'a str> {
        if !self.at_identifier() {
            return Err(syntax(format!("identifier expected at offset {}", self.i)));
        }
        let start = self.i;
        while let Some(c) = self.peek_char() {
            if Self::is_ident_char(c) {
                self.bump(c);
            } else {
                break;
            }
        }
        Ok(&self.s[start..self.i])
    }

    /// Unsigned decimal literal: `12`, `1.08`, `.5`, `3.`.
    pub fn parse_number_literal(&mut self) -> Result<Decimal> {
        let start = self.i;
        let mut seen_dot = false;
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.bump(c);
            } else if c == '.' && !seen_dot {
                seen_dot = true;
                self.bump(c);
            } else {
                break;
            }
        }
        let lit = &self.s[start..self.i];
        if lit.is_empty() || lit == "." {
            return Err(syntax(format!("number expected at offset {start}")));
        }
        if let Some(c) = self.peek_char() {
            if Self::is_ident_char(c) {
                return Err(syntax(format!("malformed number `{lit}{c}`")));
            }
        }
        Decimal::from_str(lit.trim_end_matches('.'))
            .or_else(|_| Decimal::from_str(&format!("0{lit}")))
            .map_err(|_| syntax(format!("bad number `{lit}`")))
    }

    pub fn expect(&mut self, c: char) -> Result<()> {
        if self.consume_char(c) {
            Ok(())
        } else {
            Err(syntax(format!("expected '{}' at offset {}", c, self.i)))
        }
    }

    pub fn consume_char(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.bump(c);
            true
        } else {
            false
        }
    }

    pub fn consume_str(&mut self, lit: &str) -> bool {
        if self.peek_str(lit) {
            self.i += lit.len();
            true
        } else {
            false
        }
    }

    pub fn peek_char(&self) -> Option<char> {
        self.s[self.i..].chars().next()
    }

    pub fn peek_str(&self, lit: &str) -> bool {
        self.s[self.i..].starts_with(lit)
    }

    pub fn skip_ws(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.bump(c);
            } else {
                break;
            }
        }
    }

    pub fn rest(&self) -> &'a str {
        &self.s[self.i..]
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    fn bump(&mut self, c: char) {
        self.i += c.len_utf8();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_multibyte_identifiers_whole() {
        let mut p = Parser::new("本月利息支出-x");
        assert_eq!(p.parse_identifier().unwrap(), "本月利息支出");
        assert!(p.consume_char('-'));
        assert_eq!(p.parse_identifier().unwrap(), "x");
        assert!(p.eof());
    }

    #[test]
    fn reads_decimal_literals() {
        assert_eq!(Parser::new("1.08").parse_number_literal().unwrap().to_string(), "1.08");
        assert_eq!(Parser::new(".5").parse_number_literal().unwrap().to_string(), "0.5");
        assert_eq!(Parser::new("3.)").parse_number_literal().unwrap().to_string(), "3");
        assert!(Parser::new("12ab").parse_number_literal().is_err());
        assert!(Parser::new(".").parse_number_literal().is_err());
    }

    #[test]
    fn nesting_is_bounded() {
        let mut p = Parser::new("");
        for _ in 0..MAX_NESTING {
            p.descend().unwrap();
        }
        assert_eq!(p.descend(), Err(EvalError::Parse("expression nested too deeply".into())));
        p.ascend();
        assert!(p.descend().is_ok());
    }

    #[test]
    fn identifiers_cannot_start_with_digits() {
        assert!(Parser::new("1abc").parse_identifier().is_err());
        assert!(Parser::new("+").parse_identifier().is_err());
    }
}
