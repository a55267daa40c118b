use std::{error, fmt};

#[derive(Debug, Eq, PartialEq)]
pub enum GrammarError {
    MissingArrow { ln: usize },
    EmptyLeftSide { ln: usize },
    EmptyAlternative { ln: usize },
    MissingStartProduction,
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MissingArrow { ln } => {
                write!(f, "grammar line {ln}: declaration has no `->`")
            }
            Self::EmptyLeftSide { ln } => {
                write!(f, "grammar line {ln}: declaration has an empty left side")
            }
            Self::EmptyAlternative { ln } => {
                write!(f, "grammar line {ln}: declaration has an empty alternative")
            }
            Self::MissingStartProduction => {
                write!(f, "grammar has no start production `S -> Program`")
            }
        }
    }
}

impl error::Error for GrammarError {}
