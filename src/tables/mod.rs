mod table_error;
#[cfg(test)]
mod tables_tests;

pub use table_error::TableError;

use crate::grammar::{Grammar, START};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::{self, Write};

pub type Result<T> = std::result::Result<T, TableError>;

/// A production with a dot position in `[0, |right|]`. Items live in a
/// single arena ordered by production, so `(production, dot)` resolves
/// to an arena index by offset.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DottedItem {
    pub production: usize,
    pub dot: usize,
}

/// A dotted item paired with a lookahead terminal. Item sets are kept
/// sorted and deduplicated, so set equality is vector equality.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Lr1Item {
    pub item: usize,
    pub lookahead: usize,
}

type ItemSet = Vec<Lr1Item>;

/// One ACTION cell; `GOTO` cells are plain state numbers.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Action {
    Shift(usize),
    Reduce(usize),
    Accept,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Shift(state) => write!(f, "s{state}"),
            Self::Reduce(production) => write!(f, "r{production}"),
            Self::Accept => write!(f, "acc"),
        }
    }
}

/// The canonical LR(1) collection and the ACTION/GOTO tables filled
/// from it. Built once from a [`Grammar`], read-only afterwards.
#[derive(Debug)]
pub struct Tables {
    items: Vec<DottedItem>,
    item_offsets: Vec<usize>,
    states: Vec<ItemSet>,
    n_symbols: usize,
    action: Vec<Option<Action>>,
    goto_: Vec<Option<usize>>,
}

impl Tables {
    pub fn build(grammar: &Grammar) -> Result<Self> {
        let mut tables = Self {
            items: Vec::new(),
            item_offsets: Vec::new(),
            states: Vec::new(),
            n_symbols: grammar.symbols.len(),
            action: Vec::new(),
            goto_: Vec::new(),
        };
        tables.materialize_items(grammar);
        let transitions = tables.build_collection(grammar);
        tables.fill(grammar, &transitions)?;
        Ok(tables)
    }

    pub fn n_states(&self) -> usize {
        self.states.len()
    }

    pub fn action(&self, state: usize, terminal: usize) -> Option<Action> {
        self.action[state * self.n_symbols + terminal]
    }

    pub fn goto(&self, state: usize, non_terminal: usize) -> Option<usize> {
        self.goto_[state * self.n_symbols + non_terminal]
    }

    fn item_index(&self, production: usize, dot: usize) -> usize {
        self.item_offsets[production] + dot
    }

    /// Every `(production, dot)` pair, including both dot positions of
    /// epsilon productions; closure never materializes the dot-before-@
    /// form in a state, so no transition on `@` ever arises.
    fn materialize_items(&mut self, grammar: &Grammar) {
        for (i, production) in grammar.productions.iter().enumerate() {
            self.item_offsets.push(self.items.len());
            for dot in 0..=production.right.len() {
                self.items.push(DottedItem { production: i, dot });
            }
        }
    }

    fn closure(&self, grammar: &Grammar, set: &mut ItemSet) {
        let mut seen: HashSet<Lr1Item> = set.iter().copied().collect();
        let mut i = 0;
        while i < set.len() {
            let lr1 = set[i];
            i += 1;
            let dotted = self.items[lr1.item];
            let production = &grammar.productions[dotted.production];
            if dotted.dot >= production.right.len() {
                continue;
            }
            let b = production.right[dotted.dot];
            if !grammar.is_non_terminal(b) {
                continue;
            }
            let mut beta: Vec<usize> = production.right[dotted.dot + 1..].to_vec();
            beta.push(lr1.lookahead);
            let first = grammar.first_of_sequence(&beta);

            for (p, candidate) in grammar.productions.iter().enumerate() {
                if candidate.left != b {
                    continue;
                }
                // for B -> @ enter with the dot already past epsilon
                let dot = usize::from(grammar.is_epsilon_production(p));
                let item = self.item_index(p, dot);
                for &la in &first {
                    if grammar.is_epsilon(la) {
                        continue;
                    }
                    let new = Lr1Item {
                        item,
                        lookahead: la,
                    };
                    if seen.insert(new) {
                        set.push(new);
                    }
                }
            }
        }
        set.sort_unstable();
    }

    fn goto_set(&self, grammar: &Grammar, state: &ItemSet, x: usize) -> ItemSet {
        let mut kernel = ItemSet::new();
        for lr1 in state {
            let dotted = self.items[lr1.item];
            let production = &grammar.productions[dotted.production];
            if dotted.dot >= production.right.len() || production.right[dotted.dot] != x {
                continue;
            }
            kernel.push(Lr1Item {
                item: self.item_index(dotted.production, dotted.dot + 1),
                lookahead: lr1.lookahead,
            });
        }
        if !kernel.is_empty() {
            self.closure(grammar, &mut kernel);
        }
        kernel
    }

    /// Worklist saturation from `CLOSURE({[S -> . Program, #]})`.
    /// Returns the transition map `(state, symbol) -> state`.
    fn build_collection(&mut self, grammar: &Grammar) -> HashMap<(usize, usize), usize> {
        let mut initial = vec![Lr1Item {
            item: self.item_index(grammar.start_production, 0),
            lookahead: grammar.end_marker,
        }];
        self.closure(grammar, &mut initial);

        let mut known: HashMap<ItemSet, usize> = HashMap::new();
        known.insert(initial.clone(), 0);
        self.states.push(initial);

        let mut transitions = HashMap::new();
        let mut i = 0;
        while i < self.states.len() {
            for x in 0..grammar.symbols.len() {
                if !grammar.is_terminal(x) && !grammar.is_non_terminal(x) {
                    continue;
                }
                let next = self.goto_set(grammar, &self.states[i], x);
                if next.is_empty() {
                    continue;
                }
                let target = match known.get(&next) {
                    Some(&existing) => existing,
                    None => {
                        let new = self.states.len();
                        known.insert(next.clone(), new);
                        self.states.push(next);
                        new
                    }
                };
                transitions.insert((i, x), target);
            }
            i += 1;
        }
        transitions
    }

    fn set_action(
        &mut self,
        grammar: &Grammar,
        state: usize,
        terminal: usize,
        action: Action,
    ) -> Result<()> {
        let cell = &mut self.action[state * self.n_symbols + terminal];
        match *cell {
            None => {
                *cell = Some(action);
                Ok(())
            }
            Some(existing) if existing == action => Ok(()),
            Some(existing) => Err(TableError::Conflict {
                state,
                symbol: grammar.symbol_id(terminal).to_owned(),
                existing,
                found: action,
            }),
        }
    }

    fn fill(
        &mut self,
        grammar: &Grammar,
        transitions: &HashMap<(usize, usize), usize>,
    ) -> Result<()> {
        self.action = vec![None; self.states.len() * self.n_symbols];
        self.goto_ = vec![None; self.states.len() * self.n_symbols];

        for (&(state, x), &target) in transitions {
            if grammar.is_terminal(x) {
                self.set_action(grammar, state, x, Action::Shift(target))?;
            } else {
                self.goto_[state * self.n_symbols + x] = Some(target);
            }
        }

        for state in 0..self.states.len() {
            for i in 0..self.states[state].len() {
                let lr1 = self.states[state][i];
                let dotted = self.items[lr1.item];
                let production = &grammar.productions[dotted.production];
                if dotted.dot < production.right.len() {
                    continue;
                }
                if dotted.production == grammar.start_production {
                    self.set_action(grammar, state, grammar.end_marker, Action::Accept)?;
                } else {
                    let action = Action::Reduce(dotted.production);
                    self.set_action(grammar, state, lr1.lookahead, action)?;
                }
            }
        }
        Ok(())
    }

    /// Writes the tabular ACTION/GOTO dump: one row per state, `sN`,
    /// `rN`, `acc` or blank under each terminal, a state number or
    /// blank under each non-terminal. The augmented start symbol gets
    /// no GOTO column.
    pub fn write_table(&self, grammar: &Grammar, out: &mut impl Write) -> io::Result<()> {
        const STATE_WIDTH: usize = 6;
        const ACTION_WIDTH: usize = 8;
        const GOTO_WIDTH: usize = 14;

        let goto_columns: Vec<usize> = grammar
            .non_terminals
            .iter()
            .copied()
            .filter(|&n| grammar.symbol_id(n) != START)
            .collect();

        write!(out, "{:>STATE_WIDTH$}", "state")?;
        write!(
            out,
            "{:>width$}",
            "ACTION",
            width = grammar.terminals.len() * ACTION_WIDTH
        )?;
        writeln!(
            out,
            "{:>width$}",
            "GOTO",
            width = goto_columns.len() * GOTO_WIDTH
        )?;

        write!(out, "{:>STATE_WIDTH$}", "")?;
        for &t in &grammar.terminals {
            write!(out, "{:>ACTION_WIDTH$}", grammar.symbol_id(t))?;
        }
        for &n in &goto_columns {
            write!(out, "{:>GOTO_WIDTH$}", grammar.symbol_id(n))?;
        }
        writeln!(out)?;

        for state in 0..self.states.len() {
            write!(out, "{state:>STATE_WIDTH$}")?;
            for &t in &grammar.terminals {
                match self.action(state, t) {
                    Some(action) => write!(out, "{:>ACTION_WIDTH$}", action.to_string())?,
                    None => write!(out, "{:>ACTION_WIDTH$}", "")?,
                }
            }
            for &n in &goto_columns {
                match self.goto(state, n) {
                    Some(target) => write!(out, "{target:>GOTO_WIDTH$}")?,
                    None => write!(out, "{:>GOTO_WIDTH$}", "")?,
                }
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
