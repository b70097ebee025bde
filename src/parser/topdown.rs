use crate::grammar::{is_left_recursive, Grammar};
use crate::symbol::Symbol;
use crate::tree::ParseNode;
use crate::{GrammarError, IParser, Lexeme};
use std::collections::HashMap;
use std::rc::Rc;

/// A memoised recursive descent parser.
///
/// Tries the productions of each non-terminal in priority order and accepts
/// the first derivation which fits; at the root the derivation must consume
/// the whole lexeme stream. Every `(symbol, position)` outcome is memoised,
/// so the same derivation is never attempted twice.
pub struct TopDown {
    grammar: Rc<Grammar>,
}

impl TopDown {
    /// Create a top down parser for a grammar. Fails with
    /// [GrammarError::LeftRecursionNotSupported] when the grammar is left
    /// recursive; use the [Packrat](crate::parser::Packrat) parser for those.
    pub fn new(grammar: Rc<Grammar>) -> Result<Self, GrammarError> {
        if is_left_recursive(&grammar) {
            return Err(GrammarError::LeftRecursionNotSupported);
        }
        Ok(Self { grammar })
    }

    pub fn grammar(&self) -> &Rc<Grammar> {
        &self.grammar
    }
}

impl IParser for TopDown {
    fn parse(&self, lexemes: &[Lexeme]) -> Option<ParseNode> {
        let start = self.grammar.start()?;
        let mut op = TdOp {
            grammar: &self.grammar,
            lexemes,
            memo: HashMap::new(),
        };
        op.accept(TreeKey {
            symbol: start,
            pos: 0,
            all: true,
        })
        .map(|resp| resp.node)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TreeKey {
    symbol: Symbol,
    pos: usize,
    // the derivation must consume every lexeme; set at the outermost call
    all: bool,
}

#[derive(Clone)]
struct AcceptResp {
    node: ParseNode,
    end: usize,
}

struct TdOp<'g> {
    grammar: &'g Grammar,
    lexemes: &'g [Lexeme],
    memo: HashMap<TreeKey, Option<AcceptResp>>,
}

impl<'g> TdOp<'g> {
    fn accept(&mut self, key: TreeKey) -> Option<AcceptResp> {
        if let Some(resp) = self.memo.get(&key) {
            return resp.clone();
        }
        let resp = self.try_accept(key);
        self.memo.insert(key, resp.clone());
        resp
    }

    fn try_accept(&mut self, key: TreeKey) -> Option<AcceptResp> {
        let productions = match self.grammar.productions(key.symbol) {
            None => {
                // key.symbol is a terminal
                return match self.lexemes.get(key.pos) {
                    Some(lexeme) if lexeme.kind == key.symbol => Some(AcceptResp {
                        node: ParseNode::leaf(lexeme.clone()),
                        end: key.pos + 1,
                    }),
                    _ => None,
                };
            }
            Some(productions) => productions.clone(),
        };

        for prod in productions.iter() {
            if let Some(resp) = self.accept_prod(&key, prod) {
                if !key.all || resp.end == self.lexemes.len() {
                    return Some(resp);
                }
            }
        }
        None
    }

    fn accept_prod(
        &mut self,
        key: &TreeKey,
        prod: &crate::grammar::Production,
    ) -> Option<AcceptResp> {
        let mut children = Vec::with_capacity(prod.len());
        let mut pos = key.pos;

        for symbol in prod.symbols() {
            let resp = self.accept(TreeKey {
                symbol: *symbol,
                pos,
                all: false,
            })?;
            pos = resp.end;
            children.push(resp.node);
        }

        Some(AcceptResp {
            node: ParseNode::marker(key.symbol, children),
            end: pos,
        })
    }
}
