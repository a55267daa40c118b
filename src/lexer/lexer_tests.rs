use super::*;

fn kinds(input: &str) -> Vec<Token> {
    lex(input)
        .unwrap()
        .into_iter()
        .map(Token::from)
        .collect()
}

#[test]
fn test_basic_program() {
    let input = "int main() { return 0; }";
    let expected = vec![
        Token::Int,
        Token::Identifier(String::from("main")),
        Token::OpenParen,
        Token::CloseParen,
        Token::OpenCurly,
        Token::Return,
        Token::IntConst(String::from("0")),
        Token::Semicolon,
        Token::CloseCurly,
    ];
    assert_eq!(expected, kinds(input));
}

#[test]
fn test_operators() {
    let input = "a += b == c <= 1 && !d || e != f;";
    let expected = vec![
        Token::Identifier(String::from("a")),
        Token::AssignAdd,
        Token::Identifier(String::from("b")),
        Token::IsEqual,
        Token::Identifier(String::from("c")),
        Token::IsLessThanOrEqual,
        Token::IntConst(String::from("1")),
        Token::LogicalAnd,
        Token::LogicalNot,
        Token::Identifier(String::from("d")),
        Token::LogicalOr,
        Token::Identifier(String::from("e")),
        Token::IsNotEqual,
        Token::Identifier(String::from("f")),
        Token::Semicolon,
    ];
    assert_eq!(expected, kinds(input));
}

#[test]
fn test_float_constant() {
    let expected = vec![
        Token::Float,
        Token::Identifier(String::from("x")),
        Token::Assign,
        Token::FloatConst(String::from("3.14")),
        Token::Semicolon,
    ];
    assert_eq!(expected, kinds("float x = 3.14;"));
}

#[test]
fn test_line_numbers() {
    let input = "int a;\nint b;\n\nint c;";
    let lines: Vec<u64> = lex(input).unwrap().iter().map(LinedToken::get_line).collect();
    assert_eq!(vec![1, 1, 1, 2, 2, 2, 4, 4, 4], lines);
}

#[test]
fn test_comments() {
    let input = "int a; // trailing\n/* block\n comment */ int b;";
    let tokens = lex(input).unwrap();
    let expected = vec![
        Token::Int,
        Token::Identifier(String::from("a")),
        Token::Semicolon,
        Token::Int,
        Token::Identifier(String::from("b")),
        Token::Semicolon,
    ];
    let got: Vec<Token> = tokens.iter().map(|t| t.get_inner().clone()).collect();
    assert_eq!(expected, got);
    // the block comment spans two lines
    assert_eq!(3, tokens[3].get_line());
}

#[test]
fn test_unterminated_block_comment() {
    let tokens = lex("int a; /* runs to eof").unwrap();
    assert_eq!(3, tokens.len());
}

#[test]
fn test_bad_char() {
    let err = lex("int a;\nint $b;").unwrap_err();
    assert_eq!(2, err.get_ln());
}

#[test]
fn test_bad_single_ampersand() {
    assert!(lex("a & b").is_err());
}

#[test]
fn test_bad_constant_suffix() {
    assert!(lex("int a = 1x;").is_err());
}

#[test]
fn test_token_dump() {
    let tokens = lex("int a;").unwrap();
    let mut out = Vec::new();
    write_tokens(&tokens, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!("1\tint\tint\n1\t<ID>\ta\n1\t;\t;\n", text);
}
