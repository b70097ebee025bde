use super::builder::Builder;

/// The parsed form of a pattern. Every node knows how to emit its own bytecode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    Empty,
    Match(char),
    /// One rune out of a set of inclusive ranges. `.` and the class escapes
    /// compile to this as well.
    Class(Vec<(char, char)>),
    Seq(Vec<Node>),
    Or(Box<Node>, Box<Node>),
    Star(Box<Node>),
    Plus(Box<Node>),
    Opt(Box<Node>),
    Min {
        min: u32,
        child: Box<Node>,
    },
    Max {
        max: u32,
        child: Box<Node>,
    },
    MinMax {
        min: u32,
        max: u32,
        child: Box<Node>,
    },
    Group {
        idx: u32,
        child: Box<Node>,
    },
}

impl Node {
    pub(crate) fn build(&self, b: &mut Builder) {
        match self {
            Node::Empty => {}
            Node::Match(r) => b.match_rune(*r),
            Node::Class(ranges) => {
                // ordered alternation over the ranges, one consuming opcode each
                let mut exits = Vec::new();
                for (i, (lo, hi)) in ranges.iter().enumerate() {
                    let alt = if i + 1 < ranges.len() {
                        Some(b.defer_branch())
                    } else {
                        None
                    };
                    if lo == hi {
                        b.match_rune(*lo);
                    } else {
                        b.match_range(*lo, *hi);
                    }
                    if let Some(alt) = alt {
                        exits.push(b.defer_jump());
                        b.patch_loc(alt);
                    }
                }
                for exit in exits {
                    b.patch_loc(exit);
                }
            }
            Node::Seq(nodes) => {
                for node in nodes {
                    node.build(b);
                }
            }
            Node::Or(left, right) => {
                let alt = b.defer_branch();
                left.build(b);
                let exit = b.defer_jump();
                b.patch_loc(alt);
                right.build(b);
                b.patch_loc(exit);
            }
            Node::Star(child) => {
                let loc = b.loc();
                let exit = b.defer_branch();
                child.build(b);
                b.jump(loc);
                b.patch_loc(exit);
            }
            Node::Plus(child) => {
                let loc = b.loc();
                child.build(b);
                b.branch(loc);
            }
            Node::Opt(child) => {
                let exit = b.defer_branch();
                child.build(b);
                b.patch_loc(exit);
            }
            Node::Min { min, child } => {
                b.start_counter();
                let loc = b.loc();
                let exit = b.defer_branch();
                child.build(b);
                b.inc_counter();
                b.jump(loc);
                b.patch_loc(exit);
                b.ck_gte_c(*min);
                b.close_counter();
            }
            Node::Max { max, child } => {
                b.start_counter();
                let loc = b.loc();
                let exit = b.defer_branch();
                b.ck_lt_c(*max);
                child.build(b);
                b.inc_counter();
                b.jump(loc);
                b.patch_loc(exit);
                b.close_counter();
            }
            Node::MinMax { min, max, child } => {
                b.start_counter();
                let loc = b.loc();
                let exit = b.defer_branch();
                b.ck_lt_c(*max);
                child.build(b);
                b.inc_counter();
                b.jump(loc);
                b.patch_loc(exit);
                b.ck_gte_c(*min);
                b.close_counter();
            }
            Node::Group { idx, child } => {
                b.start_group(*idx);
                child.build(b);
                b.close_group();
            }
        }
    }
}
