use super::ParseNode;
use crate::symbol::Symbol;
use crate::Lexeme;

impl ParseNode {
    /// Convert a child index into a position. A negative index counts from
    /// the end, so `-1` is the last child. [None] when out of bounds.
    pub fn get_idx(&self, c_idx: isize) -> Option<usize> {
        let len = self.children.len() as isize;
        let c_idx = if c_idx < 0 { len + c_idx } else { c_idx };
        if c_idx >= 0 && c_idx < len {
            Some(c_idx as usize)
        } else {
            None
        }
    }

    /// Whether the child at `c_idx` is of the given kind.
    pub fn child_is(&self, c_idx: isize, kind: Symbol) -> bool {
        match self.get_idx(c_idx) {
            Some(idx) => self.children[idx].kind() == kind,
            None => false,
        }
    }

    /// Remove the child at `c_idx`. Out of bounds indices take no action.
    pub fn remove_child(&mut self, c_idx: isize) -> bool {
        match self.get_idx(c_idx) {
            Some(idx) => {
                self.children.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Call [remove_child](ParseNode::remove_child) for each index in turn.
    /// The positions shift between removals, so removing what start as
    /// indices 1, 3 and 5 takes either `[5, 3, 1]` or `[1, 2, 3]`.
    pub fn remove_children(&mut self, c_idxs: &[isize]) {
        for c_idx in c_idxs {
            self.remove_child(*c_idx);
        }
    }

    /// Remove every direct child whose kind is in `symbols`.
    pub fn remove_all(&mut self, symbols: &[Symbol]) {
        self.children
            .retain(|child| !symbols.contains(&child.kind()));
    }

    /// Replace the whole node with its child at `c_idx`.
    pub fn replace_with_child(&mut self, c_idx: isize) -> bool {
        match self.get_idx(c_idx) {
            Some(idx) => {
                let child = self.children.swap_remove(idx);
                *self = child;
                true
            }
            None => false,
        }
    }

    /// Replace the node's lexeme with the one of the child at `c_idx` and
    /// splice the grandchildren into the child's position.
    pub fn promote_child(&mut self, c_idx: isize) -> bool {
        match self.get_idx(c_idx) {
            Some(idx) => {
                let child = self.children.remove(idx);
                self.lexeme = child.lexeme;
                self.children.splice(idx..idx, child.children);
                true
            }
            None => false,
        }
    }

    /// Promote the only child to replace the node. Takes no action unless the
    /// node has exactly one child.
    pub fn promote_single_child(&mut self) -> bool {
        if self.children.len() == 1 {
            self.promote_child(0);
            true
        } else {
            false
        }
    }

    /// Take the value and position of the child at `c_idx` into the node's
    /// own lexeme, keeping the kind, and remove the child.
    pub fn promote_child_value(&mut self, c_idx: isize) {
        if let Some(idx) = self.get_idx(c_idx) {
            let child = &self.children[idx];
            self.lexeme = Lexeme::new(
                self.lexeme.kind,
                child.value().to_string(),
                child.position(),
            );
        }
        self.remove_child(c_idx);
    }

    /// Remove the child at `c_idx` and splice its children into its position.
    pub fn promote_children_of(&mut self, c_idx: isize) -> bool {
        match self.get_idx(c_idx) {
            Some(idx) => {
                let child = self.children.remove(idx);
                self.children.splice(idx..idx, child.children);
                true
            }
            None => false,
        }
    }

    /// Replace all the immediate children with the grandchildren.
    pub fn promote_grand_children(&mut self) {
        let children = std::mem::take(&mut self.children);
        self.children = children
            .into_iter()
            .flat_map(|child| child.children)
            .collect();
    }
}
