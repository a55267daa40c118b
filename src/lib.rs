/*!
A compiler front-end for a small C-like language, driven by a table
parser built at run time from a declarative grammar file.

## Compilation stages
1. **Tokenization** - [lex](lexer::lex) scans the source for the known
   token kinds and produces a collection of [LinedToken](lexer::LinedToken).
   An unknown character raises [LexError](lexer::LexError).
2. **Grammar loading** - [Grammar::parse](grammar::Grammar::parse) reads the
   grammar file into a symbol registry and a production list, and computes
   the FIRST set of every symbol.
3. **Table construction** - [Tables::build](tables::Tables::build) computes
   the canonical LR(1) item-set collection and fills the ACTION and GOTO
   tables. A conflicting cell raises [TableError](tables::TableError);
   the expected grammars are LR(1) and build conflict-free.
4. **Parsing and translation** - [parse](parser::parse) runs the
   shift-reduce loop over the token stream, recovers from syntax errors in
   panic mode, and invokes the [Semantic](semantic::Semantic) dispatcher on
   every reduction, which maintains the scoped symbol tables and emits
   [Quadruple](semantic::Quadruple) three-address code with backpatched
   control-flow targets.

Syntax and semantic errors are reported and counted, not raised: the
parse runs to accept whenever recovery allows and the driver prints the
final counters.
*/

#![deny(unused_must_use)]
#![warn(clippy::pedantic)]
#![allow(clippy::wildcard_imports)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod semantic;
pub mod tables;
