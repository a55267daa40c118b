mod grammar_error;
#[cfg(test)]
mod grammar_tests;

pub use grammar_error::GrammarError;

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;

pub type Result<T> = std::result::Result<T, GrammarError>;
pub type SymbolSet = BTreeSet<usize>;

/// The end-of-input marker `#`.
pub const END_MARKER: &str = "#";
/// The empty string `@`.
pub const EPSILON: &str = "@";
/// The augmented start symbol; it expands to the user start symbol in
/// the single start production.
pub const START: &str = "S";

const ARROW: &str = "->";
const ALT_SPLIT: &str = " | ";
const TOKEN_DECL: &str = "%token";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SymbolKind {
    Epsilon,
    Terminal,
    NonTerminal,
    EndMarker,
}

/// An entry in the symbol registry. Everything else refers to symbols
/// by their index in [`Grammar::symbols`].
#[derive(Debug)]
pub struct Symbol {
    pub id: String,
    pub kind: SymbolKind,
    pub first: SymbolSet,
}

/// A rule `left -> right`, where an epsilon production has a single
/// right element, the `@` symbol.
#[derive(Debug, Eq, PartialEq)]
pub struct Production {
    pub left: usize,
    pub right: Vec<usize>,
}

#[derive(Debug)]
pub struct Grammar {
    pub symbols: Vec<Symbol>,
    pub terminals: Vec<usize>,
    pub non_terminals: Vec<usize>,
    pub productions: Vec<Production>,
    pub start_production: usize,
    pub end_marker: usize,
    pub epsilon: usize,
    index: HashMap<String, usize>,
}

impl Grammar {
    /// Parses the grammar text format: `LHS -> ALT1 | ALT2 | ...` lines,
    /// a `%token -> t1 | t2 | ...` terminal declaration, `#` comment
    /// lines, `@` for the empty string.
    pub fn parse(text: &str) -> Result<Self> {
        let mut grammar = Self {
            symbols: Vec::new(),
            terminals: Vec::new(),
            non_terminals: Vec::new(),
            productions: Vec::new(),
            start_production: 0,
            end_marker: 0,
            epsilon: 0,
            index: HashMap::new(),
        };
        grammar.end_marker = grammar.register(END_MARKER, SymbolKind::EndMarker);
        grammar.epsilon = grammar.register(EPSILON, SymbolKind::Epsilon);

        let mut start_production = None;
        for (ln0, raw) in text.lines().enumerate() {
            let ln = ln0 + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (left, right) = line.split_once(ARROW).ok_or(GrammarError::MissingArrow { ln })?;
            let left = left.trim();
            if left.is_empty() {
                return Err(GrammarError::EmptyLeftSide { ln });
            }

            if left == TOKEN_DECL {
                for alt in right.split(ALT_SPLIT) {
                    let id = alt.trim();
                    if id.is_empty() {
                        return Err(GrammarError::EmptyAlternative { ln });
                    }
                    grammar.register(id, SymbolKind::Terminal);
                }
                continue;
            }

            let left_index = grammar.register(left, SymbolKind::NonTerminal);
            for alt in right.split(ALT_SPLIT) {
                let units: Vec<&str> = alt.split_whitespace().collect();
                if units.is_empty() {
                    return Err(GrammarError::EmptyAlternative { ln });
                }
                let right_index = units
                    .iter()
                    .map(|unit| grammar.register(unit, SymbolKind::NonTerminal))
                    .collect();
                grammar.productions.push(Production {
                    left: left_index,
                    right: right_index,
                });
                if left == START {
                    start_production = Some(grammar.productions.len() - 1);
                }
            }
        }

        grammar.start_production = start_production.ok_or(GrammarError::MissingStartProduction)?;
        grammar.compute_first();
        Ok(grammar)
    }

    /// Registers a symbol on first encounter; later encounters keep the
    /// kind the symbol was first seen with.
    fn register(&mut self, id: &str, kind: SymbolKind) -> usize {
        if let Some(&index) = self.index.get(id) {
            return index;
        }
        let index = self.symbols.len();
        self.symbols.push(Symbol {
            id: id.to_owned(),
            kind,
            first: SymbolSet::new(),
        });
        self.index.insert(id.to_owned(), index);
        match kind {
            SymbolKind::Terminal | SymbolKind::EndMarker => self.terminals.push(index),
            SymbolKind::NonTerminal => self.non_terminals.push(index),
            SymbolKind::Epsilon => {}
        }
        index
    }

    pub fn symbol_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn symbol_id(&self, index: usize) -> &str {
        &self.symbols[index].id
    }

    pub fn is_terminal(&self, index: usize) -> bool {
        matches!(
            self.symbols[index].kind,
            SymbolKind::Terminal | SymbolKind::EndMarker
        )
    }

    pub fn is_non_terminal(&self, index: usize) -> bool {
        self.symbols[index].kind == SymbolKind::NonTerminal
    }

    pub fn is_epsilon(&self, index: usize) -> bool {
        self.symbols[index].kind == SymbolKind::Epsilon
    }

    /// Whether the production derives only the empty string.
    pub fn is_epsilon_production(&self, production: usize) -> bool {
        let right = &self.productions[production].right;
        right.len() == 1 && self.is_epsilon(right[0])
    }

    /// `L -> R1 R2 ...` rendering used by the parse trace.
    pub fn display_production(&self, production: usize) -> String {
        let p = &self.productions[production];
        let mut out = self.symbols[p.left].id.clone();
        out.push_str(" ->");
        for &r in &p.right {
            let _ = write!(out, " {}", self.symbols[r].id);
        }
        out
    }

    /// FIRST of a symbol sequence: concatenation with epsilon
    /// propagation; FIRST of the empty sequence is `{@}`.
    pub fn first_of_sequence(&self, sequence: &[usize]) -> SymbolSet {
        let mut first = SymbolSet::new();
        let mut derives_epsilon = true;
        for &s in sequence {
            let symbol_first = &self.symbols[s].first;
            first.extend(symbol_first.iter().copied().filter(|&x| x != self.epsilon));
            if !symbol_first.contains(&self.epsilon) {
                derives_epsilon = false;
                break;
            }
        }
        if derives_epsilon {
            first.insert(self.epsilon);
        }
        first
    }

    /// FIRST of a terminal is itself, FIRST of `@` is `{@}`, FIRST of a
    /// non-terminal is the fixed point over its productions.
    fn compute_first(&mut self) {
        for &t in &self.terminals {
            self.symbols[t].first.insert(t);
        }
        let epsilon = self.epsilon;
        self.symbols[epsilon].first.insert(epsilon);

        loop {
            let mut changed = false;
            for i in 0..self.productions.len() {
                let left = self.productions[i].left;
                let right = self.productions[i].right.clone();
                let add = self.first_of_sequence(&right);
                let target = &mut self.symbols[left].first;
                for s in add {
                    changed |= target.insert(s);
                }
            }
            if !changed {
                break;
            }
        }
    }
}
