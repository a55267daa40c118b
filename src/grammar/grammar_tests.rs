use super::*;

const LIST_GRAMMAR: &str = "\
# items separated by commas, possibly none
%token -> a | ,
S -> Program
Program -> List
List -> a Tail | @
Tail -> , a Tail | @
";

fn set(grammar: &Grammar, ids: &[&str]) -> SymbolSet {
    ids.iter()
        .map(|id| grammar.symbol_index(id).unwrap())
        .collect()
}

#[test]
fn test_registry() {
    let g = Grammar::parse(LIST_GRAMMAR).unwrap();

    assert_eq!(Some(g.end_marker), g.symbol_index("#"));
    assert_eq!(Some(g.epsilon), g.symbol_index("@"));
    assert_eq!("#", g.symbol_id(g.end_marker));

    let a = g.symbol_index("a").unwrap();
    assert!(g.is_terminal(a));
    let list = g.symbol_index("List").unwrap();
    assert!(g.is_non_terminal(list));
    assert!(g.is_epsilon(g.epsilon));

    // # and a and , are terminals
    assert_eq!(3, g.terminals.len());
    assert_eq!(4, g.non_terminals.len());
}

#[test]
fn test_productions() {
    let g = Grammar::parse(LIST_GRAMMAR).unwrap();
    assert_eq!(6, g.productions.len());

    let start = &g.productions[g.start_production];
    assert_eq!(g.symbol_index("S").unwrap(), start.left);
    assert_eq!(vec![g.symbol_index("Program").unwrap()], start.right);

    // List -> @ is an epsilon production, List -> a Tail is not
    assert!(g.is_epsilon_production(3));
    assert!(!g.is_epsilon_production(2));

    assert_eq!("List -> a Tail", g.display_production(2));
}

#[test]
fn test_first_sets() {
    let g = Grammar::parse(LIST_GRAMMAR).unwrap();
    let a = g.symbol_index("a").unwrap();
    let list = g.symbol_index("List").unwrap();
    let tail = g.symbol_index("Tail").unwrap();

    assert_eq!(set(&g, &["a"]), g.symbols[a].first);
    assert_eq!(set(&g, &["a", "@"]), g.symbols[list].first);
    assert_eq!(set(&g, &[",", "@"]), g.symbols[tail].first);
}

#[test]
fn test_first_of_sequence() {
    let g = Grammar::parse(LIST_GRAMMAR).unwrap();
    let list = g.symbol_index("List").unwrap();
    let tail = g.symbol_index("Tail").unwrap();
    let a = g.symbol_index("a").unwrap();

    // epsilon propagates through both nullable symbols
    assert_eq!(set(&g, &["a", ",", "@"]), g.first_of_sequence(&[list, tail]));
    // a stops the propagation
    assert_eq!(set(&g, &["a", ","]), g.first_of_sequence(&[tail, a, g.end_marker]));
    assert_eq!(set(&g, &["@"]), g.first_of_sequence(&[]));
}

#[test]
fn test_missing_arrow() {
    let err = Grammar::parse("%token -> a\nS -> Program\nProgram a\n").unwrap_err();
    assert_eq!(GrammarError::MissingArrow { ln: 3 }, err);
}

#[test]
fn test_missing_start() {
    let err = Grammar::parse("%token -> a\nProgram -> a\n").unwrap_err();
    assert_eq!(GrammarError::MissingStartProduction, err);
}

#[test]
fn test_empty_right_side() {
    let err = Grammar::parse("%token -> a\nS -> Program\nProgram -> a\nProgram ->\n").unwrap_err();
    assert_eq!(GrammarError::EmptyAlternative { ln: 4 }, err);
}
