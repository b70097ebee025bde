use crate::grammar::{Grammar, Production};
use crate::symbol::Symbol;
use crate::tree::ParseNode;
use crate::util::Log;
use crate::{IParser, Lexeme};
use once_cell::unsync::OnceCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// A worklist driven chart parser tolerant of left recursion.
///
/// Recognitions are memoised per `(symbol, start, end)` key and extended
/// through a stack of pending extensions instead of the call stack, so left
/// recursive and cyclic grammars terminate. When two recognitions cover the
/// same key the one built from the lower indexed production wins, comparing
/// children pairwise on a tie, and a replacement is rejected when it would
/// make a recognition reachable from itself.
pub struct Packrat {
    grammar: Rc<Grammar>,
    debug: OnceCell<Log<&'static str>>,
}

impl Packrat {
    pub fn new(grammar: Rc<Grammar>) -> Self {
        Self {
            grammar,
            debug: OnceCell::new(),
        }
    }

    pub fn grammar(&self) -> &Rc<Grammar> {
        &self.grammar
    }

    /// Set a log label to debug the parser based on the level of [Log].
    pub fn set_log(&self, log: Log<&'static str>) -> Result<(), String> {
        self.debug
            .set(log)
            .map_err(|err| format!("Log label {} is already assigned.", err))
    }
}

impl IParser for Packrat {
    fn parse(&self, lexemes: &[Lexeme]) -> Option<ParseNode> {
        let start = self.grammar.start()?;
        let mut op = PrOp {
            grammar: &self.grammar,
            lexemes,
            memo: HashMap::new(),
            markers: HashMap::new(),
            partials: HashMap::new(),
            queued: HashSet::new(),
            stack: Vec::new(),
            #[cfg(debug_assertions)]
            debug: self.debug.get().copied().unwrap_or(Log::None),
        };

        op.add_prods(TreeMarker { symbol: start, start: 0 });

        while let Some((partial, key)) = op.stack.pop() {
            op.apply(partial, key);
        }

        let accept = TreeKey {
            marker: TreeMarker { symbol: start, start: 0 },
            end: lexemes.len(),
        };
        let accepted = op.memo.get(&accept)?.clone();
        Some(op.to_node(&accepted))
    }
}

// a claim: we are trying to recognise `symbol` starting at `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TreeMarker {
    symbol: Symbol,
    start: usize,
}

// a completed claim: `symbol` matched from `start` to `end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TreeKey {
    marker: TreeMarker,
    end: usize,
}

// a successful recognition; the priority is the index of the production used
#[derive(Debug, Clone)]
struct TreeDef {
    key: TreeKey,
    children: Vec<TreeKey>,
    priority: usize,
}

// an in-flight recognition waiting for its next child
#[derive(Debug, Clone)]
struct TreePartial {
    marker: TreeMarker,
    end: usize,
    children: Vec<TreeKey>,
    priority: usize,
}

struct PrOp<'g> {
    grammar: &'g Grammar,
    lexemes: &'g [Lexeme],
    memo: HashMap<TreeKey, TreeDef>,
    // every completed recognition sharing a marker
    markers: HashMap<TreeMarker, Vec<TreeKey>>,
    // every in-flight recognition blocked waiting for a marker
    partials: HashMap<TreeMarker, Vec<TreePartial>>,
    // markers whose productions have been expanded already
    queued: HashSet<TreeMarker>,
    // pending extension requests, LIFO
    stack: Vec<(TreePartial, TreeKey)>,
    #[cfg(debug_assertions)]
    debug: Log<&'static str>,
}

impl<'g> PrOp<'g> {
    fn production(&self, partial: &TreePartial) -> &Production {
        self.grammar
            .productions(partial.marker.symbol)
            .expect("a partial always belongs to a non-terminal")
            .get(partial.priority)
            .expect("a partial's priority indexes its production")
    }

    // extend a partial with a completed child; either the production is done
    // and the completion is recorded, or the partial starts waiting on the
    // marker of its next symbol
    fn apply(&mut self, mut partial: TreePartial, extension: TreeKey) {
        partial.children.push(extension);
        partial.end = extension.end;

        let prod = self.production(&partial);
        if partial.children.len() == prod.len() {
            let def = TreeDef {
                key: TreeKey {
                    marker: partial.marker,
                    end: partial.end,
                },
                children: partial.children,
                priority: partial.priority,
            };
            self.add_to_memo(def);
            return;
        }

        let requires = TreeMarker {
            symbol: prod.get(partial.children.len()).unwrap(),
            start: partial.end,
        };
        self.add_partial(partial, requires);
    }

    // register a wait on a marker: terminals synthesise their trivial
    // completion, non-terminals are recorded as blocked, completions already
    // known are replayed, and the marker's own productions are expanded once
    fn add_partial(&mut self, partial: TreePartial, requires: TreeMarker) {
        if self.grammar.is_non_terminal(requires.symbol) {
            self.partials.entry(requires).or_default().push(partial.clone());
        } else if let Some(lexeme) = self.lexemes.get(requires.start) {
            if lexeme.kind == requires.symbol {
                self.add_to_memo(TreeDef {
                    key: TreeKey {
                        marker: requires,
                        end: requires.start + 1,
                    },
                    children: Vec::new(),
                    priority: 0,
                });
            }
        }

        if let Some(keys) = self.markers.get(&requires) {
            for key in keys.clone() {
                self.stack.push((partial.clone(), key));
            }
        }

        self.add_prods(requires);
    }

    // expand the productions of a marker once; ε productions complete
    // immediately, the rest become partials waiting on their first symbol
    fn add_prods(&mut self, root: TreeMarker) {
        if !self.queued.insert(root) {
            return;
        }
        let prods = match self.grammar.productions(root.symbol) {
            Some(prods) => prods.clone(),
            None => return,
        };
        for (priority, prod) in prods.iter().enumerate() {
            if prod.is_empty() {
                self.add_to_memo(TreeDef {
                    key: TreeKey {
                        marker: root,
                        end: root.start,
                    },
                    children: Vec::new(),
                    priority,
                });
                continue;
            }
            let partial = TreePartial {
                marker: root,
                end: root.start,
                children: Vec::new(),
                priority,
            };
            let prod_start = TreeMarker {
                symbol: prod.first().unwrap(),
                start: root.start,
            };
            self.add_partial(partial, prod_start);
        }
    }

    fn add_to_memo(&mut self, def: TreeDef) {
        match self.memo.get(&def.key) {
            None => {
                #[cfg(debug_assertions)]
                if self.debug.order() >= Log::Verbose(()).order() {
                    println!(
                        "[{}; Packrat]: completed {:?} {}..{} (priority {})",
                        self.debug,
                        def.key.marker.symbol,
                        def.key.marker.start,
                        def.key.end,
                        def.priority
                    );
                }
                self.markers.entry(def.key.marker).or_default().push(def.key);
                let waiting = self
                    .partials
                    .get(&def.key.marker)
                    .cloned()
                    .unwrap_or_default();
                let key = def.key;
                self.memo.insert(def.key, def);
                for partial in waiting {
                    self.stack.push((partial, key));
                }
            }
            Some(old) => {
                let old = old.clone();
                if self.compare_priority(&def, &old) == 1 && !self.creates_circular(&def, def.key) {
                    #[cfg(debug_assertions)]
                    if self.debug.order() >= Log::Default(()).order() {
                        println!(
                            "[{}; Packrat]: replaced {:?} {}..{} with priority {}",
                            self.debug,
                            def.key.marker.symbol,
                            def.key.marker.start,
                            def.key.end,
                            def.priority
                        );
                    }
                    self.memo.insert(def.key, def);
                }
            }
        }
    }

    // would making `def` the memo entry for its key let the key reach itself
    // through its memoised descendants
    fn creates_circular(&self, def: &TreeDef, root: TreeKey) -> bool {
        for child in &def.children {
            if *child == root {
                return true;
            }
            if let Some(child_def) = self.memo.get(child) {
                if self.creates_circular(child_def, root) {
                    return true;
                }
            }
        }
        false
    }

    //  1: a beats b, which means a.priority is the lower number
    //  0: equal
    // -1: b beats a
    fn compare_priority(&self, a: &TreeDef, b: &TreeDef) -> i8 {
        if a.priority != b.priority {
            return if a.priority < b.priority { 1 } else { -1 };
        }
        // equal priority means equal production, so equal arity
        debug_assert_eq!(a.children.len(), b.children.len());
        for (ck1, ck2) in a.children.iter().zip(b.children.iter()) {
            if ck1 == ck2 {
                continue;
            }
            let (c1, c2) = match (self.memo.get(ck1), self.memo.get(ck2)) {
                (Some(c1), Some(c2)) => (c1, c2),
                _ => continue,
            };
            let p = self.compare_priority(c1, c2);
            if p != 0 {
                return p;
            }
        }
        0
    }

    fn to_node(&self, def: &TreeDef) -> ParseNode {
        let symbol = def.key.marker.symbol;
        let lexeme = match self.lexemes.get(def.key.marker.start) {
            Some(lexeme)
                if lexeme.kind == symbol && !self.grammar.is_non_terminal(symbol) =>
            {
                lexeme.clone()
            }
            _ => Lexeme::marker(symbol),
        };
        let children = def
            .children
            .iter()
            .map(|child| {
                let child_def = self
                    .memo
                    .get(child)
                    .expect("a recognition's children are memoised");
                self.to_node(child_def)
            })
            .collect();
        ParseNode::new(lexeme, children)
    }
}
