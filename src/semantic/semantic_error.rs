use std::{error, fmt};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SemanticError {
    VariableRedefined { name: String, line: u64 },
    FunctionRedefined { name: String, line: u64 },
    ParameterRedefined { name: String, line: u64 },
    UndefinedFunctionCall { name: String, line: u64 },
    TooFewArguments { name: String, line: u64 },
    TooManyArguments { name: String, line: u64 },
    MainUndefined,
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::VariableRedefined { name, line } => {
                write!(f, "line {line}: variable {name} redefined")
            }
            Self::FunctionRedefined { name, line } => {
                write!(f, "line {line}: function {name} redefined")
            }
            Self::ParameterRedefined { name, line } => {
                write!(f, "line {line}: function parameter {name} redefined")
            }
            Self::UndefinedFunctionCall { name, line } => {
                write!(f, "line {line}: calling undefined function {name}")
            }
            Self::TooFewArguments { name, line } => {
                write!(f, "line {line}: calling function {name}, too few arguments")
            }
            Self::TooManyArguments { name, line } => {
                write!(f, "line {line}: calling function {name}, too many arguments")
            }
            Self::MainUndefined => write!(f, "main undefined"),
        }
    }
}

impl error::Error for SemanticError {}
