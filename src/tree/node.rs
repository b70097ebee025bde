use super::ParseNode;
use crate::symbol::{Symbol, SymbolSet};
use crate::util::Position;
use crate::Lexeme;
use ptree::TreeItem;
use std::rc::Rc;

impl ParseNode {
    pub fn new(lexeme: Lexeme, children: Vec<ParseNode>) -> Self {
        Self { lexeme, children }
    }

    /// Create a leaf node around an input lexeme.
    pub fn leaf(lexeme: Lexeme) -> Self {
        ParseNode::new(lexeme, Vec::with_capacity(0))
    }

    /// Create a non-terminal node with a valueless marker lexeme.
    pub fn marker(kind: Symbol, children: Vec<ParseNode>) -> Self {
        ParseNode::new(Lexeme::marker(kind), children)
    }

    pub fn kind(&self) -> Symbol {
        self.lexeme.kind
    }

    pub fn value(&self) -> &str {
        &self.lexeme.value
    }

    pub fn position(&self) -> Position {
        self.lexeme.position
    }

    /// Find the first node of the given kind, searching through all nested
    /// children including self.
    pub fn find(&self, kind: Symbol) -> Option<&ParseNode> {
        if self.kind() == kind {
            Some(self)
        } else {
            self.children.iter().find_map(|child| child.find(kind))
        }
    }

    pub fn contains(&self, kind: Symbol) -> bool {
        self.find(kind).is_some()
    }

    /// The number of nodes in the tree including self.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(|child| child.size()).sum::<usize>()
    }

    /// The terminal leaves of the tree, left to right.
    pub fn leaves(&self) -> Vec<&Lexeme> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'t>(&'t self, out: &mut Vec<&'t Lexeme>) {
        if self.children.is_empty() {
            out.push(&self.lexeme);
        } else {
            for child in &self.children {
                child.collect_leaves(out);
            }
        }
    }

    /// Pretty print the tree to stdout.
    pub fn print(&self, set: &Rc<SymbolSet>) -> Result<(), std::io::Error> {
        ptree::print_tree(&TreeView {
            node: self.clone(),
            set: set.clone(),
        })
    }
}

#[derive(Clone)]
struct TreeView {
    node: ParseNode,
    set: Rc<SymbolSet>,
}

impl TreeItem for TreeView {
    type Child = Self;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        if self.node.value().is_empty() {
            write!(f, "{}", self.set.name(self.node.kind()))
        } else {
            write!(
                f,
                "{} : '{}'",
                self.set.name(self.node.kind()),
                self.node.value()
            )
        }
    }

    fn children(&self) -> std::borrow::Cow<[Self::Child]> {
        std::borrow::Cow::from(
            self.node
                .children
                .iter()
                .map(|child| TreeView {
                    node: child.clone(),
                    set: self.set.clone(),
                })
                .collect::<Vec<TreeView>>(),
        )
    }
}
