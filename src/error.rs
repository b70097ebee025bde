use crate::GrammarError;
use std::fmt::{Display, Formatter};

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarError::Malformed(what) => {
                write!(f, "GrammarError: malformed definition; {}", what)
            }
            GrammarError::DuplicateKind(kind) => {
                write!(f, "GrammarError: duplicate kind '{}'.", kind)
            }
            GrammarError::CyclicInheritance(name) => {
                write!(f, "GrammarError: cyclic inheritance through '{}'.", name)
            }
            GrammarError::UnknownSubLexer(name) => {
                write!(f, "GrammarError: sub-lexer '{}' is not defined.", name)
            }
            GrammarError::BadPattern(what) => {
                write!(f, "GrammarError: invalid pattern; {}", what)
            }
            GrammarError::LeftRecursionNotSupported => {
                write!(f, "GrammarError: the grammar is left recursive.")
            }
        }
    }
}

impl std::error::Error for GrammarError {}
