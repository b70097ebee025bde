use super::{ParseNode, Reducer, Reduction};
use crate::symbol::SymbolSet;
use std::collections::HashMap;
use std::rc::Rc;

impl Reducer {
    pub fn new(set: &Rc<SymbolSet>) -> Self {
        Self {
            set: set.clone(),
            reductions: HashMap::new(),
        }
    }

    /// Register the reduction applied to nodes of the given kind. A kind
    /// registered twice chains the reductions in registration order.
    pub fn add(&mut self, kind: &str, reduction: Reduction) {
        let kind = self.set.intern(kind);
        let reduction = match self.reductions.remove(&kind) {
            Some(existing) => existing.chain(reduction),
            None => reduction,
        };
        self.reductions.insert(kind, reduction);
    }

    /// Whether the reducer has a rule for the given node.
    pub fn can(&self, node: &ParseNode) -> bool {
        self.reductions.contains_key(&node.kind())
    }

    /// Merge two reducers. For a kind present in both, the merged reducer
    /// behaves as running `first` then `second` on the node.
    pub fn merge(first: &Reducer, second: &Reducer) -> Reducer {
        let mut merged = Reducer::new(&first.set);
        for (kind, reduction) in &first.reductions {
            merged.reductions.insert(*kind, reduction.clone());
        }
        for (kind, reduction) in &second.reductions {
            let combined = match merged.reductions.remove(kind) {
                Some(existing) => existing.chain(reduction.clone()),
                None => reduction.clone(),
            };
            merged.reductions.insert(*kind, combined);
        }
        merged
    }

    /// Reduce a tree bottom up. The children are reduced into a fresh copy
    /// first, then the kind's reduction rewrites the copied node; the input
    /// tree is left untouched.
    pub fn reduce(&self, node: &ParseNode) -> ParseNode {
        let mut copy = ParseNode::new(
            node.lexeme.clone(),
            node.children.iter().map(|child| self.reduce(child)).collect(),
        );
        if let Some(reduction) = self.reductions.get(&copy.kind()) {
            reduction.apply(&mut copy);
        }
        copy
    }

    pub fn symbols(&self) -> &Rc<SymbolSet> {
        &self.set
    }
}
