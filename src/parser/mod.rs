#[cfg(test)]
mod parser_tests;

use crate::grammar::Grammar;
use crate::lexer::LinedToken;
use crate::semantic::Semantic;
use crate::tables::{Action, Tables};
use std::fmt::Write as _;
use std::io::{self, Write};

/// Error counters accumulated over one parse. `accepted` is false only
/// when recovery exhausted the stack or the input ran out without the
/// accept action being reached.
#[derive(Debug, Eq, PartialEq)]
pub struct ParseOutcome {
    pub syntax_errors: u32,
    pub semantic_errors: u32,
    pub accepted: bool,
}

struct InputToken {
    symbol: Option<usize>,
    kind: &'static str,
    lexeme: String,
    line: Option<u64>,
}

fn input_tokens(grammar: &Grammar, tokens: &[LinedToken]) -> Vec<InputToken> {
    let mut input: Vec<InputToken> = tokens
        .iter()
        .map(|t| InputToken {
            symbol: grammar.symbol_index(t.grammar_id()),
            kind: t.grammar_id(),
            lexeme: t.lexeme().to_owned(),
            line: Some(t.get_line()),
        })
        .collect();
    // the end sentinel has no source line
    input.push(InputToken {
        symbol: Some(grammar.end_marker),
        kind: "#",
        lexeme: "#".to_owned(),
        line: None,
    });
    input
}

fn report_syntax_error(token: &InputToken) {
    match token.line {
        Some(line) => println!("syntax error near `{}` at line {line}", token.lexeme),
        None => println!("syntax error near `{}` at end of input", token.lexeme),
    }
}

fn trace_step(
    out: &mut impl Write,
    step: &mut u32,
    grammar: &Grammar,
    stack: &[(usize, usize)],
    production: Option<usize>,
) -> io::Result<()> {
    *step += 1;
    let mut rendered = String::new();
    for &(state, symbol) in stack {
        let _ = write!(rendered, "({state},{})", grammar.symbol_id(symbol));
    }
    let production = match production {
        Some(p) => grammar.display_production(p),
        None => String::new(),
    };
    writeln!(out, "{step}\t{rendered}\t{production}")
}

/// Runs the shift-reduce loop over the token stream, dispatching every
/// reduction to the semantic analyzer and writing one trace line per
/// step. Errors are reported to stdout and counted; an undefined cell
/// triggers panic-mode recovery (the stack is popped until the current
/// token becomes viable, without advancing the input).
pub fn parse(
    grammar: &Grammar,
    tables: &Tables,
    tokens: &[LinedToken],
    semantic: &mut Semantic,
    trace: &mut impl Write,
) -> io::Result<ParseOutcome> {
    let input = input_tokens(grammar, tokens);
    let mut outcome = ParseOutcome {
        syntax_errors: 0,
        semantic_errors: 0,
        accepted: false,
    };

    let mut stack: Vec<(usize, usize)> = vec![(0, grammar.end_marker)];
    let mut step = 0;
    writeln!(trace, "step\tstack\tproduction")?;
    trace_step(trace, &mut step, grammar, &stack, None)?;

    // pops until ACTION at the new top is defined for `symbol`;
    // false means the stack was exhausted
    let recover = |stack: &mut Vec<(usize, usize)>, symbol: usize| -> bool {
        loop {
            stack.pop();
            let Some(&(state, _)) = stack.last() else {
                return false;
            };
            if tables.action(state, symbol).is_some() {
                return true;
            }
        }
    };

    let mut i = 0;
    while i < input.len() {
        let token = &input[i];
        let Some(symbol) = token.symbol else {
            // token kind the grammar does not know; skip it
            report_syntax_error(token);
            outcome.syntax_errors += 1;
            i += 1;
            continue;
        };
        let (state, _) = *stack.last().expect("stack holds at least the start state");

        match tables.action(state, symbol) {
            None => {
                report_syntax_error(token);
                outcome.syntax_errors += 1;
                if !recover(&mut stack, symbol) {
                    println!("parsing aborted: recovery emptied the stack");
                    return Ok(outcome);
                }
            }
            Some(Action::Shift(target)) => {
                stack.push((target, symbol));
                semantic.push_token(token.kind, &token.lexeme, token.line);
                i += 1;
                trace_step(trace, &mut step, grammar, &stack, None)?;
            }
            Some(Action::Reduce(p)) => {
                let production = &grammar.productions[p];
                if !grammar.is_epsilon_production(p) {
                    stack.truncate(stack.len() - production.right.len());
                }
                let (top, _) = *stack.last().expect("recovery keeps the start state");
                match tables.goto(top, production.left) {
                    Some(target) => {
                        stack.push((target, production.left));
                        let lhs = grammar.symbol_id(production.left);
                        let rhs: Vec<&str> =
                            production.right.iter().map(|&r| grammar.symbol_id(r)).collect();
                        if let Err(err) = semantic.reduce(lhs, &rhs) {
                            println!("semantic error: {err}");
                            outcome.semantic_errors += 1;
                        }
                        trace_step(trace, &mut step, grammar, &stack, Some(p))?;
                    }
                    None => {
                        report_syntax_error(token);
                        outcome.syntax_errors += 1;
                        if !recover(&mut stack, symbol) {
                            println!("parsing aborted: recovery emptied the stack");
                            return Ok(outcome);
                        }
                    }
                }
            }
            Some(Action::Accept) => {
                outcome.accepted = true;
                return Ok(outcome);
            }
        }
    }

    Ok(outcome)
}
