mod args;

use args::Args;
use lrcc::grammar::Grammar;
use lrcc::lexer;
use lrcc::parser;
use lrcc::semantic::{write_quadruples, Semantic};
use lrcc::tables::Tables;

use std::fs::{self, File};
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};

const TOKEN_STREAM_FILE: &str = "Lex_token_stream.txt";
const TABLE_FILE: &str = "Lr1_table.txt";
const PROCESS_FILE: &str = "Lr1_process.txt";
const INTER_CODE_FILE: &str = "inter_code.txt";

fn create(path: &str) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("cannot create {path}"))?;
    Ok(BufWriter::new(file))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let source = fs::read_to_string(&args.source)
        .with_context(|| format!("cannot read source file {}", args.source.display()))?;
    let tokens = lexer::lex(&source).context("lexical analysis failed")?;
    let mut token_out = create(TOKEN_STREAM_FILE)?;
    lexer::write_tokens(&tokens, &mut token_out)?;
    token_out.flush()?;

    let grammar_text = fs::read_to_string(&args.grammar)
        .with_context(|| format!("cannot read grammar file {}", args.grammar.display()))?;
    let grammar = Grammar::parse(&grammar_text).context("loading the grammar failed")?;
    let tables = Tables::build(&grammar).context("LR(1) construction failed")?;
    let mut table_out = create(TABLE_FILE)?;
    tables.write_table(&grammar, &mut table_out)?;
    table_out.flush()?;

    let mut semantic = Semantic::new();
    let mut trace = create(PROCESS_FILE)?;
    let outcome = parser::parse(&grammar, &tables, &tokens, &mut semantic, &mut trace)?;
    trace.flush()?;

    let mut code_out = create(INTER_CODE_FILE)?;
    write_quadruples(semantic.quadruples(), &mut code_out)?;
    code_out.flush()?;

    println!(
        "{} syntax errors, {} semantic errors",
        outcome.syntax_errors, outcome.semantic_errors
    );
    println!("  token stream:      {TOKEN_STREAM_FILE}");
    println!("  ACTION/GOTO table: {TABLE_FILE}");
    println!("  parse trace:       {PROCESS_FILE}");
    println!("  intermediate code: {INTER_CODE_FILE}");

    Ok(())
}
