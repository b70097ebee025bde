use std::collections::HashMap;

/// One independent thread of execution inside the VM. Cheap to copy; the
/// capture and counter chains live in interned tables so the cursor itself is
/// four words and hashable for de-duplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct Cursor {
    pub ip: u32,
    pub partial_groups: GroupId,
    pub groups: GroupId,
    pub counter: CounterId,
}

/// An id into the group chain table. Zero is the empty chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct GroupId(u32);

/// An id into the counter chain table. Zero is the empty chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct CounterId(u32);

// end == usize::MAX marks a capture which is still open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GroupNode {
    idx: u32,
    start: usize,
    end: usize,
    prev: GroupId,
}

const OPEN: usize = usize::MAX;

/// A value interning table for capture chains. Identical histories share one
/// id, so two cursors whose captures agree hash and compare equal.
pub(crate) struct GroupTable {
    nodes: Vec<GroupNode>,
    ids: HashMap<GroupNode, GroupId>,
}

impl GroupTable {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            ids: HashMap::new(),
        }
    }

    fn intern(&mut self, node: GroupNode) -> GroupId {
        if let Some(id) = self.ids.get(&node) {
            return *id;
        }
        self.nodes.push(node);
        let id = GroupId(self.nodes.len() as u32);
        self.ids.insert(node, id);
        id
    }

    fn node(&self, id: GroupId) -> Option<GroupNode> {
        if id.0 == 0 {
            None
        } else {
            Some(self.nodes[id.0 as usize - 1])
        }
    }

    /// Push an open capture for group `idx` onto the partial chain.
    pub fn open(&mut self, partial: GroupId, idx: u32, start: usize) -> GroupId {
        self.intern(GroupNode {
            idx,
            start,
            end: OPEN,
            prev: partial,
        })
    }

    /// Close the most recently opened capture at `end`, popping it from the
    /// partial chain and linking it onto the completed chain.
    /// Returns the new `(partial, completed)` pair.
    pub fn close(&mut self, partial: GroupId, completed: GroupId, end: usize) -> (GroupId, GroupId) {
        let open = match self.node(partial) {
            Some(node) => node,
            None => return (partial, completed), // unbalanced close, ignore
        };
        // an ε capture repeated at the same position adds nothing; collapsing it
        // keeps the chain finite when a nullable body loops
        if open.start == end {
            if let Some(head) = self.node(completed) {
                if head.idx == open.idx && head.start == open.start && head.end == end {
                    return (open.prev, completed);
                }
            }
        }
        let closed = self.intern(GroupNode {
            idx: open.idx,
            start: open.start,
            end,
            prev: completed,
        });
        (open.prev, closed)
    }

    /// Walk a completed chain into a capture table, earliest capture first.
    pub fn to_map(&self, mut chain: GroupId) -> HashMap<u32, Vec<(usize, usize)>> {
        let mut entries = Vec::new();
        while let Some(node) = self.node(chain) {
            entries.push((node.idx, node.start, node.end));
            chain = node.prev;
        }
        let mut map: HashMap<u32, Vec<(usize, usize)>> = HashMap::new();
        for (idx, start, end) in entries.into_iter().rev() {
            map.entry(idx).or_default().push((start, end));
        }
        map
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CounterNode {
    value: u32,
    prev: CounterId,
}

/// A value interning table for the counter chains of bounded repetitions.
pub(crate) struct CounterTable {
    nodes: Vec<CounterNode>,
    ids: HashMap<CounterNode, CounterId>,
}

impl CounterTable {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            ids: HashMap::new(),
        }
    }

    fn intern(&mut self, node: CounterNode) -> CounterId {
        if let Some(id) = self.ids.get(&node) {
            return *id;
        }
        self.nodes.push(node);
        let id = CounterId(self.nodes.len() as u32);
        self.ids.insert(node, id);
        id
    }

    fn node(&self, id: CounterId) -> Option<CounterNode> {
        if id.0 == 0 {
            None
        } else {
            Some(self.nodes[id.0 as usize - 1])
        }
    }

    /// Open a nested counter at zero.
    pub fn push(&mut self, chain: CounterId) -> CounterId {
        self.intern(CounterNode {
            value: 0,
            prev: chain,
        })
    }

    /// Increment the innermost counter, saturating at `cap`.
    pub fn inc(&mut self, chain: CounterId, cap: u32) -> CounterId {
        let node = match self.node(chain) {
            Some(node) => node,
            None => return chain,
        };
        self.intern(CounterNode {
            value: node.value.saturating_add(1).min(cap),
            prev: node.prev,
        })
    }

    /// The value of the innermost counter.
    pub fn value(&self, chain: CounterId) -> u32 {
        self.node(chain).map_or(0, |node| node.value)
    }

    /// Close the innermost counter.
    pub fn pop(&self, chain: CounterId) -> CounterId {
        self.node(chain).map_or(chain, |node| node.prev)
    }
}
