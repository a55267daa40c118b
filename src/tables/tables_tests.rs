use super::*;
use crate::grammar::Grammar;

// balanced parentheses around a single a
const NEST_GRAMMAR: &str = "\
%token -> ( | ) | a
S -> Program
Program -> Nest
Nest -> ( Nest ) | a
";

const NULLABLE_GRAMMAR: &str = "\
%token -> a | b
S -> Program
Program -> Opt b
Opt -> a | @
";

#[test]
fn test_initial_state_shifts() {
    let g = Grammar::parse(NEST_GRAMMAR).unwrap();
    let t = Tables::build(&g).unwrap();

    let open = g.symbol_index("(").unwrap();
    let a = g.symbol_index("a").unwrap();
    assert!(matches!(t.action(0, open), Some(Action::Shift(_))));
    assert!(matches!(t.action(0, a), Some(Action::Shift(_))));
    // ) cannot start a Program
    let close = g.symbol_index(")").unwrap();
    assert_eq!(None, t.action(0, close));
}

#[test]
fn test_shift_matches_goto_transition() {
    let g = Grammar::parse(NEST_GRAMMAR).unwrap();
    let t = Tables::build(&g).unwrap();
    let open = g.symbol_index("(").unwrap();

    // shifting ( from its target must be defined again (nesting)
    let Some(Action::Shift(target)) = t.action(0, open) else {
        panic!("expected a shift on (");
    };
    assert!(matches!(t.action(target, open), Some(Action::Shift(_))));
}

#[test]
fn test_accept_is_reachable() {
    let g = Grammar::parse(NEST_GRAMMAR).unwrap();
    let t = Tables::build(&g).unwrap();

    let accepts = (0..t.n_states())
        .filter(|&s| t.action(s, g.end_marker) == Some(Action::Accept))
        .count();
    assert_eq!(1, accepts);
}

#[test]
fn test_reduce_cells_carry_production_index() {
    let g = Grammar::parse(NEST_GRAMMAR).unwrap();
    let t = Tables::build(&g).unwrap();

    // Nest -> a is production 3; its reduce must appear with both
    // follow terminals ) and #
    let close = g.symbol_index(")").unwrap();
    let reduce_on = |terminal: usize| {
        (0..t.n_states()).any(|s| t.action(s, terminal) == Some(Action::Reduce(3)))
    };
    assert!(reduce_on(close));
    assert!(reduce_on(g.end_marker));
}

#[test]
fn test_epsilon_gets_no_transition() {
    let g = Grammar::parse(NULLABLE_GRAMMAR).unwrap();
    let t = Tables::build(&g).unwrap();

    for state in 0..t.n_states() {
        assert_eq!(None, t.action(state, g.epsilon));
        assert_eq!(None, t.goto(state, g.epsilon));
    }
}

#[test]
fn test_nullable_production_reduces_on_lookahead() {
    let g = Grammar::parse(NULLABLE_GRAMMAR).unwrap();
    let t = Tables::build(&g).unwrap();

    // Opt -> @ is production 3; state 0 must reduce it on b
    let b = g.symbol_index("b").unwrap();
    assert_eq!(Some(Action::Reduce(3)), t.action(0, b));
}

#[test]
fn test_ambiguous_grammar_is_a_conflict() {
    let ambiguous = "\
%token -> + | x
S -> Program
Program -> E
E -> E + E | x
";
    let g = Grammar::parse(ambiguous).unwrap();
    let err = Tables::build(&g).unwrap_err();
    assert!(matches!(err, TableError::Conflict { .. }));
}

#[test]
fn test_construction_is_deterministic() {
    let g1 = Grammar::parse(NEST_GRAMMAR).unwrap();
    let g2 = Grammar::parse(NEST_GRAMMAR).unwrap();
    let t1 = Tables::build(&g1).unwrap();
    let t2 = Tables::build(&g2).unwrap();

    assert_eq!(t1.n_states(), t2.n_states());
    let mut dump1 = Vec::new();
    let mut dump2 = Vec::new();
    t1.write_table(&g1, &mut dump1).unwrap();
    t2.write_table(&g2, &mut dump2).unwrap();
    assert_eq!(dump1, dump2);
}

#[test]
fn test_table_dump_shape() {
    let g = Grammar::parse(NULLABLE_GRAMMAR).unwrap();
    let t = Tables::build(&g).unwrap();

    let mut dump = Vec::new();
    t.write_table(&g, &mut dump).unwrap();
    let text = String::from_utf8(dump).unwrap();
    let mut lines = text.lines();

    let banner = lines.next().unwrap();
    assert!(banner.contains("ACTION"));
    assert!(banner.contains("GOTO"));
    let header = lines.next().unwrap();
    assert!(header.contains('#'));
    assert!(header.contains('a'));
    // the augmented start symbol has no GOTO column
    assert!(!header.contains('S'));
    // one row per state
    assert_eq!(t.n_states(), lines.count());
}
