use super::*;
use crate::lexer;
use crate::tables::Tables;

// a Program is a parenthesized, comma-separated list of integers
const TOY_GRAMMAR: &str = "\
%token -> ( | ) | , | <INT>
S -> Program
Program -> ( List )
List -> <INT> Tail | @
Tail -> , <INT> Tail | @
";

fn run(source: &str) -> (ParseOutcome, String) {
    let grammar = Grammar::parse(TOY_GRAMMAR).unwrap();
    let tables = Tables::build(&grammar).unwrap();
    let tokens = lexer::lex(source).unwrap();
    let mut semantic = Semantic::new();
    let mut trace = Vec::new();
    let outcome = parse(&grammar, &tables, &tokens, &mut semantic, &mut trace).unwrap();
    (outcome, String::from_utf8(trace).unwrap())
}

#[test]
fn test_accepts_well_formed_input() {
    let (outcome, _) = run("(1, 2, 3)");
    assert!(outcome.accepted);
    assert_eq!(0, outcome.syntax_errors);
    // the toy grammar defines no main function
    assert_eq!(1, outcome.semantic_errors);
}

#[test]
fn test_accepts_empty_list() {
    let (outcome, _) = run("()");
    assert!(outcome.accepted);
    assert_eq!(0, outcome.syntax_errors);
}

#[test]
fn test_trace_records_productions() {
    let (_, trace) = run("(7)");
    assert!(trace.starts_with("step\tstack\tproduction\n"));
    assert!(trace.contains("Tail -> @"));
    assert!(trace.contains("Program -> ( List )"));
    // initial stack line
    assert!(trace.contains("1\t(0,#)\t\n"));
}

#[test]
fn test_recovers_from_syntax_error() {
    // the doubled comma hits one undefined cell; recovery pops back to
    // a state that can shift it and the rest still reaches accept
    let (outcome, _) = run("(1, , 2)");
    assert_eq!(1, outcome.syntax_errors);
    assert!(outcome.accepted);
}

#[test]
fn test_recovery_does_not_advance_input() {
    // the missing comma is reported once, then `2` is shifted after the
    // pop instead of being skipped
    let (outcome, trace) = run("(1 2)");
    assert_eq!(1, outcome.syntax_errors);
    assert!(outcome.accepted);
    assert!(trace.contains("Tail -> , <INT> Tail") || trace.contains("List -> <INT> Tail"));
}

#[test]
fn test_abort_when_recovery_exhausts_stack() {
    let (outcome, _) = run(") )");
    assert!(!outcome.accepted);
    assert!(outcome.syntax_errors >= 1);
}
