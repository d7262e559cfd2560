//! Recognizer for operators embedded in condition values.

use super::ast::{BitOp, CmpOp, Matcher};
use crate::error::{PdoError, PdoResult};

/// Cursor over the unread part of a value.
struct Scanner<'a> {
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self { rest: input }
    }

    fn eat(&mut self, token: &str) -> bool {
        match self.rest.strip_prefix(token) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let end = self.rest.find(|c| !pred(c)).unwrap_or(self.rest.len());
        let (head, tail) = self.rest.split_at(end);
        self.rest = tail;
        head
    }

    fn gap(&mut self) -> &'a str {
        self.take_while(char::is_whitespace)
    }

    fn digits(&mut self) -> &'a str {
        self.take_while(|c| c.is_ascii_digit())
    }

    fn rest(&self) -> &'a str {
        self.rest
    }

    fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }
}

/// Parse a value into a [`Matcher`]. `None` is a genuine NULL.
///
/// Patterns are tried in a fixed order and the first structural match wins.
/// A structural match whose whitespace is malformed is an error rather than
/// a fall-through.
pub fn parse(value: Option<&str>) -> PdoResult<Matcher> {
    let Some(value) = value else {
        return Ok(Matcher::NullLiteral { negated: false });
    };
    if let Some(m) = between(value)? {
        return Ok(m);
    }
    if let Some(m) = bitwise(value)? {
        return Ok(m);
    }
    if let Some(m) = compare(value)? {
        return Ok(m);
    }
    if let Some(m) = like(value)? {
        return Ok(m);
    }
    if value.starts_with('%') || value.ends_with('%') {
        return Ok(Matcher::Like {
            negated: false,
            pattern: value.to_string(),
        });
    }
    if let Some(m) = null_words(value) {
        return Ok(m);
    }
    Ok(Matcher::Equals(value.to_string()))
}

fn check_gap(gap: &str) -> PdoResult<()> {
    if gap.is_empty() || gap == " " {
        Ok(())
    } else {
        Err(PdoError::invalid_argument(
            "malformed whitespace between operator and value",
        ))
    }
}

fn between(value: &str) -> PdoResult<Option<Matcher>> {
    let mut s = Scanner::new(value);
    let negated = if s.eat("!><") {
        true
    } else if s.eat("><") {
        false
    } else {
        return Ok(None);
    };
    let gap = s.gap();
    let low = s.digits();
    if low.is_empty() {
        return Ok(None);
    }
    let before_amp = s.gap();
    if !s.eat("&") {
        return Ok(None);
    }
    let after_amp = s.gap();
    let high = s.digits();
    if high.is_empty() || !s.is_empty() {
        return Ok(None);
    }
    check_gap(gap)?;
    if before_amp != " " || after_amp != " " {
        return Err(PdoError::invalid_argument(
            "missing whitespace between operator and value",
        ));
    }
    Ok(Some(Matcher::Between {
        negated,
        low: low.to_string(),
        high: high.to_string(),
    }))
}

fn bitwise(value: &str) -> PdoResult<Option<Matcher>> {
    let mut s = Scanner::new(value);
    let Some(op) = BitOp::TOKENS
        .iter()
        .find_map(|(token, op)| s.eat(token).then_some(*op))
    else {
        return Ok(None);
    };
    let gap = s.gap();
    let operand = s.digits();
    if operand.is_empty() || !s.is_empty() {
        return Ok(None);
    }
    check_gap(gap)?;
    Ok(Some(Matcher::Bitwise {
        op,
        operand: operand.to_string(),
    }))
}

fn compare(value: &str) -> PdoResult<Option<Matcher>> {
    let mut s = Scanner::new(value);
    let Some(op) = CmpOp::TOKENS
        .iter()
        .find_map(|(token, op)| s.eat(token).then_some(*op))
    else {
        return Ok(None);
    };
    let gap = s.gap();
    if s.is_empty() {
        // The operand may itself be whitespace: `"> "` compares against a
        // single space, with anything before it as the gap.
        let Some((at, _)) = gap.char_indices().next_back() else {
            return Ok(None);
        };
        check_gap(&gap[..at])?;
        return Ok(Some(Matcher::Compare {
            op,
            operand: gap[at..].to_string(),
        }));
    }
    check_gap(gap)?;
    Ok(Some(Matcher::Compare {
        op,
        operand: s.rest().to_string(),
    }))
}

fn like(value: &str) -> PdoResult<Option<Matcher>> {
    let mut s = Scanner::new(value);
    let negated = if s.eat("!%") {
        true
    } else if s.eat("%") {
        false
    } else {
        return Ok(None);
    };
    let gap = s.gap();
    // `%foo` without the space is an implicit wildcard, not an operator.
    if s.is_empty() || (!negated && gap.is_empty()) {
        return Ok(None);
    }
    check_gap(gap)?;
    Ok(Some(Matcher::Like {
        negated,
        pattern: s.rest().to_string(),
    }))
}

fn null_words(value: &str) -> Option<Matcher> {
    let words: Vec<&str> = value.split_whitespace().collect();
    match words.as_slice() {
        [is, null] if is.eq_ignore_ascii_case("is") && null.eq_ignore_ascii_case("null") => {
            Some(Matcher::NullLiteral { negated: false })
        }
        [is, not, null]
            if is.eq_ignore_ascii_case("is")
                && not.eq_ignore_ascii_case("not")
                && null.eq_ignore_ascii_case("null") =>
        {
            Some(Matcher::NullLiteral { negated: true })
        }
        _ => None,
    }
}
