mod cursor;
mod lexer_error;
#[cfg(test)]
mod lexer_tests;
mod token;

use cursor::Cursor;
pub use lexer_error::{InnerLexError, LexError};
pub use token::{LinedToken, Token};

use std::io::{self, Write};

pub type Tokens = Vec<LinedToken>;

fn lex_mcharop2(first: char, second: char) -> Option<Token> {
    match (first, second) {
        ('|', '|') => Some(Token::LogicalOr),
        ('&', '&') => Some(Token::LogicalAnd),
        ('=', '=') => Some(Token::IsEqual),
        ('!', '=') => Some(Token::IsNotEqual),
        ('>', '=') => Some(Token::IsGreaterThanOrEqual),
        ('<', '=') => Some(Token::IsLessThanOrEqual),
        ('+', '=') => Some(Token::AssignAdd),
        ('-', '=') => Some(Token::AssignSub),
        ('*', '=') => Some(Token::AssignMul),
        ('/', '=') => Some(Token::AssignDiv),
        _ => None,
    }
}

fn lex_scharop(c: char) -> Result<Token, InnerLexError> {
    match c {
        ',' => Ok(Token::Comma),
        ';' => Ok(Token::Semicolon),
        '(' => Ok(Token::OpenParen),
        ')' => Ok(Token::CloseParen),
        '{' => Ok(Token::OpenCurly),
        '}' => Ok(Token::CloseCurly),
        '+' => Ok(Token::Plus),
        '-' => Ok(Token::Minus),
        '*' => Ok(Token::Asterisk),
        '/' => Ok(Token::FSlash),
        '=' => Ok(Token::Assign),
        '!' => Ok(Token::LogicalNot),
        '>' => Ok(Token::IsGreaterThan),
        '<' => Ok(Token::IsLessThan),
        // & and | form tokens only in pairs
        '&' | '|' => Err(InnerLexError::BadOperator(c.to_string())),
        _ => Err(InnerLexError::UnexpectedChar(c)),
    }
}

fn lex_operator(cursor: &mut Cursor) -> Result<Token, InnerLexError> {
    let first = cursor.take().expect("caller peeked");
    if let Some(second) = cursor.peek() {
        if let Some(op) = lex_mcharop2(first, second) {
            cursor.take();
            return Ok(op);
        }
    }
    lex_scharop(first)
}

fn check_const_suffix(cursor: &Cursor) -> Result<(), InnerLexError> {
    let is_bad = |c: &char| c.is_alphabetic() || *c == '_';
    if let Some(bad) = cursor.peek().filter(is_bad) {
        return Err(InnerLexError::BadConstantSuffix(bad));
    }
    Ok(())
}

fn lex_constant(cursor: &mut Cursor) -> Result<Token, InnerLexError> {
    let start = cursor.as_str();
    let mut len = 0;

    while cursor.skip_if(|c| c.is_ascii_digit()) {
        len += 1;
    }

    let is_float = cursor.peek() == Some('.');
    if is_float {
        cursor.take();
        len += 1;
        while cursor.skip_if(|c| c.is_ascii_digit()) {
            len += 1;
        }
    }

    check_const_suffix(cursor)?;

    let text = start[..len].to_owned();
    if is_float {
        Ok(Token::FloatConst(text))
    } else {
        Ok(Token::IntConst(text))
    }
}

fn lex_identifier(cursor: &mut Cursor) -> Token {
    let start = cursor.as_str();
    let mut len = 0;

    let predicate = |c: char| c.is_ascii_alphanumeric() || c == '_';
    while cursor.skip_if(predicate) {
        len += 1;
    }

    Token::from(&start[..len])
}

pub fn lex(input: &str) -> Result<Tokens, LexError> {
    let mut tokens = Tokens::new();
    let mut cursor = Cursor::new(input);
    cursor.skip_trivia();

    while let Some(peek) = cursor.peek() {
        let ln = cursor.get_ln();
        let set_line = |t: Token| LinedToken::new(t, ln);
        let set_err_line = |err: InnerLexError| err.set_line(ln);
        let token = match peek {
            '_' | 'a'..='z' | 'A'..='Z' => Ok(lex_identifier(&mut cursor)),
            '0'..='9' => lex_constant(&mut cursor),
            _ => lex_operator(&mut cursor),
        }
        .map(set_line)
        .map_err(set_err_line)?;
        tokens.push(token);
        cursor.skip_trivia();
    }

    Ok(tokens)
}

/// Writes the token stream dump, one token per line: `line<TAB>kind<TAB>lexeme`.
pub fn write_tokens(tokens: &[LinedToken], out: &mut impl Write) -> io::Result<()> {
    for token in tokens {
        writeln!(
            out,
            "{}\t{}\t{}",
            token.get_line(),
            token.grammar_id(),
            token.lexeme()
        )?;
    }
    Ok(())
}
