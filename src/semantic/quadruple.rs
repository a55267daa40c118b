use std::fmt;
use std::io::{self, Write};

/// A three-address instruction. Unused fields hold `-`; a `result`
/// waiting for backpatching holds the empty string until it is filled.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Quadruple {
    pub label: usize,
    pub op: String,
    pub arg1: String,
    pub arg2: String,
    pub result: String,
}

impl Quadruple {
    pub fn new(label: usize, op: &str, arg1: &str, arg2: &str, result: &str) -> Self {
        Self {
            label,
            op: op.to_owned(),
            arg1: arg1.to_owned(),
            arg2: arg2.to_owned(),
            result: result.to_owned(),
        }
    }
}

impl fmt::Display for Quadruple {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} : {}, {}, {}, {}",
            self.label, self.op, self.arg1, self.arg2, self.result
        )
    }
}

/// Writes the intermediate code dump, one quadruple per line.
pub fn write_quadruples(quadruples: &[Quadruple], out: &mut impl Write) -> io::Result<()> {
    for quadruple in quadruples {
        writeln!(out, "{quadruple}")?;
    }
    Ok(())
}
