use std::{error, fmt};

#[derive(Debug, Eq, PartialEq)]
pub enum InnerLexError {
    UnexpectedChar(char),
    BadOperator(String),
    BadConstantSuffix(char),
}

#[derive(Debug, PartialEq)]
pub struct LexError {
    inner: InnerLexError,
    ln: u64,
}

impl LexError {
    pub fn get_ln(&self) -> u64 {
        self.ln
    }
}

impl InnerLexError {
    pub(super) fn set_line(self, ln: u64) -> LexError {
        LexError { inner: self, ln }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.ln, self.inner)
    }
}

impl error::Error for LexError {}

impl fmt::Display for InnerLexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UnexpectedChar(c) => write!(f, "unexpected character: {c}"),
            Self::BadOperator(s) => write!(f, "bad operator: {s}"),
            Self::BadConstantSuffix(c) => write!(f, "bad constant suffix: {c}"),
        }
    }
}

impl error::Error for InnerLexError {}
