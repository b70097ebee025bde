//! A module consists of a small non backtracking regular expression virtual machine.
//!
//! A pattern is parsed into an AST, compiled into a flat bytecode program of one
//! byte opcodes with 32 bit little endian operands, and executed by advancing a
//! set of cursors in lock step over the input, in the manner of Pike's VM.
//! Every cursor holds its instruction pointer together with interned ids for
//! its capture group chains and its bounded repetition counters, so two cursors
//! in an identical state are detected and merged instead of multiplying.
//! The running time is bounded by the product of the pattern and input sizes.
//!
//! The supported syntax covers literal runes, `.`, escapes and classes like
//! `[a-z0-9]` / `[^"\\]`, groups `(..)` numbered from 1, alternation `|`, the
//! postfix operators `*`, `+`, `?` and the bounded repetitions `{m,n}`, `{m,}`
//! and `{,n}`. There is no lookaround and there are no backreferences.
//!
//! # Example
//! ```
//! use lang_kit::pike::Pike;
//!
//! let re = Pike::new("c(a*|o)t").unwrap();
//!
//! let m = re.longest_match("caaat").unwrap();
//! assert_eq!(m.end, 5);
//! assert_eq!(m.group(1), Some(&[(1, 4)][..]));
//!
//! assert!(re.longest_match("dog").is_none());
//! ```
mod ast;
mod builder;
mod cursor;
mod parser;
mod printcode;
mod run;

use crate::GrammarError;
use std::collections::HashMap;

#[cfg(test)]
mod __tests__;

pub(crate) use cursor::{CounterTable, Cursor, GroupTable};

/// One byte opcodes of the compiled program. `Match` and `MatchRange` consume
/// the current input rune; every other opcode executes without consuming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Inst {
    Stop,
    Match,        // rune
    MatchRange,   // lo, hi
    Branch,       // addr
    Jump,         // addr
    Accept,
    StartGroup,   // idx
    CloseGroup,
    StartCounter,
    IncCounter,
    CloseCounter,
    CkLtC,        // val
    CkGteC,       // val
}

/// A compiled regular expression program: flat bytecode addressed by byte offset.
#[derive(Debug, Clone)]
pub struct Program {
    code: Vec<u8>,
    // counters saturate here; every ck comparison is below this value
    counter_cap: u32,
}

/// A compiled regular expression usable standalone or as a lexer rule pattern.
#[derive(Debug, Clone)]
pub struct Pike {
    program: Program,
}

/// The result of a successful match: the byte offset one past the last matched
/// rune and the capture table of the winning cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PikeMatch {
    pub end: usize,
    groups: HashMap<u32, Vec<(usize, usize)>>,
}

impl Pike {
    /// Compile a pattern. Fails with [GrammarError::BadPattern] when the
    /// pattern does not fit the supported syntax.
    pub fn new(pattern: &str) -> Result<Self, GrammarError> {
        let node = parser::parse(pattern)?;
        let mut builder = builder::Builder::new();
        node.build(&mut builder);
        builder.accept();
        builder.stop();
        let mut program = builder.close();
        program.optimize();
        Ok(Self { program })
    }

    /// Find the longest match of the pattern anchored at the start of `input`.
    /// [None] when not even the empty prefix is accepted.
    pub fn longest_match(&self, input: &str) -> Option<PikeMatch> {
        self.program.run(input)
    }

    pub fn program(&self) -> &Program {
        &self.program
    }
}

impl std::fmt::Display for Pike {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.program, f)
    }
}

impl PikeMatch {
    /// The captures of group `idx` (1-based, in source order of `(`),
    /// earliest capture first.
    pub fn group(&self, idx: u32) -> Option<&[(usize, usize)]> {
        self.groups.get(&idx).map(|g| g.as_slice())
    }

    pub fn groups(&self) -> &HashMap<u32, Vec<(usize, usize)>> {
        &self.groups
    }
}

impl Inst {
    pub(crate) fn from_byte(byte: u8) -> Inst {
        match byte {
            1 => Inst::Match,
            2 => Inst::MatchRange,
            3 => Inst::Branch,
            4 => Inst::Jump,
            5 => Inst::Accept,
            6 => Inst::StartGroup,
            7 => Inst::CloseGroup,
            8 => Inst::StartCounter,
            9 => Inst::IncCounter,
            10 => Inst::CloseCounter,
            11 => Inst::CkLtC,
            12 => Inst::CkGteC,
            _ => Inst::Stop,
        }
    }

    pub(crate) fn to_byte(self) -> u8 {
        match self {
            Inst::Stop => 0,
            Inst::Match => 1,
            Inst::MatchRange => 2,
            Inst::Branch => 3,
            Inst::Jump => 4,
            Inst::Accept => 5,
            Inst::StartGroup => 6,
            Inst::CloseGroup => 7,
            Inst::StartCounter => 8,
            Inst::IncCounter => 9,
            Inst::CloseCounter => 10,
            Inst::CkLtC => 11,
            Inst::CkGteC => 12,
        }
    }
}
