use super::{Condition, ParseNode, Reduction};
use crate::symbol::Symbol;
use std::rc::Rc;

impl Reduction {
    pub fn new<F: Fn(&mut ParseNode) + 'static>(f: F) -> Self {
        Self(Rc::new(f))
    }

    pub fn apply(&self, node: &mut ParseNode) {
        (self.0)(node)
    }

    /// Run self, then `next`, on the same node.
    pub fn chain(self, next: Reduction) -> Reduction {
        Reduction::new(move |node| {
            (self.0)(node);
            (next.0)(node);
        })
    }

    /// A reduction which leaves the node untouched.
    pub fn nil() -> Reduction {
        Reduction::new(|_| {})
    }

    /// Branch on a condition. Either side may be absent.
    pub fn when(
        condition: Condition,
        then: Option<Reduction>,
        otherwise: Option<Reduction>,
    ) -> Reduction {
        Reduction::new(move |node| {
            let branch = if (condition.0)(node) { &then } else { &otherwise };
            if let Some(reduction) = branch {
                (reduction.0)(node);
            }
        })
    }

    pub fn promote_single_child() -> Reduction {
        Reduction::new(|node| {
            node.promote_single_child();
        })
    }

    pub fn promote_child(c_idx: isize) -> Reduction {
        Reduction::new(move |node| {
            node.promote_child(c_idx);
        })
    }

    pub fn promote_child_value(c_idx: isize) -> Reduction {
        Reduction::new(move |node| {
            node.promote_child_value(c_idx);
        })
    }

    pub fn promote_children_of(c_idx: isize) -> Reduction {
        Reduction::new(move |node| {
            node.promote_children_of(c_idx);
        })
    }

    pub fn promote_grand_children() -> Reduction {
        Reduction::new(|node| {
            node.promote_grand_children();
        })
    }

    pub fn replace_with_child(c_idx: isize) -> Reduction {
        Reduction::new(move |node| {
            node.replace_with_child(c_idx);
        })
    }

    pub fn remove_child(c_idx: isize) -> Reduction {
        Reduction::new(move |node| {
            node.remove_child(c_idx);
        })
    }

    pub fn remove_children(c_idxs: Vec<isize>) -> Reduction {
        Reduction::new(move |node| {
            node.remove_children(&c_idxs);
        })
    }

    pub fn remove_all(symbols: Vec<Symbol>) -> Reduction {
        Reduction::new(move |node| {
            node.remove_all(&symbols);
        })
    }
}

impl Condition {
    pub fn new<F: Fn(&ParseNode) -> bool + 'static>(f: F) -> Self {
        Self(Rc::new(f))
    }

    /// True when the child at `c_idx` is of the given kind.
    pub fn child_is(c_idx: isize, kind: Symbol) -> Condition {
        Condition::new(move |node| node.child_is(c_idx, kind))
    }
}
