//! A module consists of the stack based tokenizer.
//!
//! A [StackLexer] is built from a textual definition of named sub-lexers:
//!
//! ```text
//! == main ==
//!   START innerLexer
//!   outerword  /\w+/
//!   shared
//! == innerLexer ==
//!   STOP ^
//!   innerword  /\w+/
//!   shared
//! == shared ==
//!   space /\s+/ -
//! ```
//!
//! Each rule line has the form `KIND [/REGEX/] [(CAPTURE)] [TARGET] [-]`.
//! When the regex is absent the kind's literal text is the pattern. `(N)`
//! replaces the lexeme value with capture group N of the match. `TARGET`
//! pushes the named sub-lexer onto the stack, or pops: `^` one level, `^^`
//! two, and so on. A trailing `-` discards the lexeme. A line naming another
//! sub-lexer and nothing else inherits all of that sub-lexer's rules at that
//! position, including rules added to the parent later in the definition.
//!
//! At run time the top sub-lexer's rules are matched against the remaining
//! input, picking the longest match and breaking ties by rule order (or the
//! other way round after [by_priority](StackLexer::by_priority)). Input which
//! no rule matches is collapsed into lexemes of the reserved `Error` kind and
//! lexing continues behind them.
mod construct;
mod lex;

use crate::pike::Pike;
use crate::symbol::{Symbol, SymbolSet};
use crate::util::Log;
use once_cell::unsync::OnceCell;
use std::rc::Rc;

#[cfg(test)]
mod __tests__;

/// A rule based tokenizer with a stack of sub-lexers.
#[derive(Debug)]
pub struct StackLexer {
    set: Rc<SymbolSet>,
    lexers: Vec<SubLexer>,
    start: usize,
    error_kind: Symbol,
    order: MatchOrder,
    debug: OnceCell<Log<&'static str>>,
}

#[derive(Debug)]
struct SubLexer {
    name: String,
    rules: Vec<Rule>,
}

#[derive(Debug, Clone)]
struct Rule {
    kind: Symbol,
    pattern: Pike,
    capture: Option<u32>,
    action: Action,
    discard: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    None,
    Push(usize),
    Pop(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchOrder {
    LengthThenPriority,
    PriorityThenLength,
}
