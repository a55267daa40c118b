use super::Action;
use std::{error, fmt};

#[derive(Debug, Eq, PartialEq)]
pub enum TableError {
    Conflict {
        state: usize,
        symbol: String,
        existing: Action,
        found: Action,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Conflict {
                state,
                symbol,
                existing,
                found,
            } => write!(
                f,
                "ACTION conflict in state {state} on `{symbol}`: {existing} vs {found}"
            ),
        }
    }
}

impl error::Error for TableError {}
