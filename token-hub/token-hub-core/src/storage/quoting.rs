//! Strict RFC 4180 quote checking. The `csv` reader accepts stray and
//! unterminated quotes as data; rows parsed that way must never be rewritten.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    /// `"` inside a field that did not start with a quote.
    BareQuote { line: usize },
    /// A closing quote followed by something other than a delimiter or line end.
    ExtraneousQuote { line: usize },
    /// Quoted field still open at end of input.
    Unterminated { line: usize },
}

impl fmt::Display for QuoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteError::BareQuote { line } => {
                write!(f, "line {line}: bare \" in non-quoted field")
            }
            QuoteError::ExtraneousQuote { line } => {
                write!(f, "line {line}: extraneous \" in quoted field")
            }
            QuoteError::Unterminated { line } => {
                write!(f, "line {line}: quoted field is never closed")
            }
        }
    }
}

impl std::error::Error for QuoteError {}

#[derive(Clone, Copy)]
enum State {
    FieldStart,
    Unquoted,
    Quoted,
    ClosingQuote,
}

pub fn check_quoting(bytes: &[u8]) -> Result<(), QuoteError> {
    let mut state = State::FieldStart;
    let mut line = 1;
    // Line on which the currently open quoted field started.
    let mut opened_at = 1;

    for &b in bytes {
        state = match (state, b) {
            (State::Quoted, b'"') => State::ClosingQuote,
            (State::Quoted, _) => State::Quoted,
            (State::ClosingQuote, b'"') => State::Quoted,
            (State::FieldStart, b'"') => {
                opened_at = line;
                State::Quoted
            }
            (State::Unquoted, b'"') => return Err(QuoteError::BareQuote { line }),
            (_, b',' | b'\n' | b'\r') => State::FieldStart,
            (State::ClosingQuote, _) => return Err(QuoteError::ExtraneousQuote { line }),
            (State::FieldStart | State::Unquoted, _) => State::Unquoted,
        };
        if b == b'\n' {
            line += 1;
        }
    }

    match state {
        State::Quoted => Err(QuoteError::Unterminated { line: opened_at }),
        _ => Ok(()),
    }
}
