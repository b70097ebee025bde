use super::{Grammar, Production};
use crate::symbol::Symbol;
use std::collections::{HashMap, HashSet};

/// Check if a grammar is left recursive.
///
/// A non-terminal revisited while still on the depth first stack signals left
/// recursion. A symbol whose production can vanish through its leftmost chain
/// makes the walk continue into the next sibling, so `A -> B C` with a
/// nullable `B` still finds a recursion through `C`.
pub fn is_left_recursive(grammar: &Grammar) -> bool {
    let mut op = LrCheckOp {
        grammar,
        checked: HashMap::new(),
        stack: HashSet::new(),
    };
    for nt in grammar.non_terminals() {
        op.stack.clear();
        let (is_lr, _) = op.check(*nt);
        if is_lr {
            return true;
        }
    }
    false
}

struct LrCheckOp<'g> {
    grammar: &'g Grammar,
    // value is whether the symbol's leftmost chain can derive ε
    checked: HashMap<Symbol, bool>,
    stack: HashSet<Symbol>,
}

impl<'g> LrCheckOp<'g> {
    // returns (is_left_recursive, check_next_sibling)
    fn check(&mut self, s: Symbol) -> (bool, bool) {
        if let Some(nilable) = self.checked.get(&s) {
            return (false, *nilable);
        }

        let prods = match self.grammar.productions(s) {
            Some(prods) => prods.clone(),
            None => {
                // s is a terminal
                self.checked.insert(s, false);
                return (false, false);
            }
        };

        if self.stack.contains(&s) {
            return (true, false);
        }
        self.stack.insert(s);

        let mut ret_check_next = false;
        for prod in prods.iter() {
            if prod.is_empty() {
                ret_check_next = true;
                continue;
            }
            let mut check_next = true;
            let mut j = 0;
            while j < prod.len() && check_next {
                let (is_lr, cn) = self.check(prod.get(j).unwrap());
                if is_lr {
                    return (true, false);
                }
                check_next = cn;
                j += 1;
            }
            // the whole production vanished through its leftmost chain
            if check_next {
                ret_check_next = true;
            }
        }

        self.checked.insert(s, ret_check_next);
        self.stack.remove(&s);
        (false, ret_check_next)
    }
}

/// Convert a grammar with left recursion into an equivalent one without.
///
/// Productions whose leftmost symbol is an already processed non-terminal are
/// replaced by the processed symbol's rewritten productions, then direct left
/// recursion is eliminated by introducing a fresh tail non-terminal. The
/// fresh symbol takes the original name with apostrophes appended until the
/// name is unused by the grammar.
pub fn remove_left_recursion(grammar: &Grammar) -> Grammar {
    let mut op = LrRemoveOp {
        grammar,
        out: Grammar::empty(grammar.symbols()),
        done: HashSet::new(),
        used: used_symbols(grammar),
    };
    for cur in grammar.non_terminals().to_vec() {
        let mut has_direct = false;
        if let Some(prods) = grammar.productions(cur) {
            for prod in prods.clone().iter() {
                op.safe_add(cur, prod.clone(), &mut has_direct);
            }
        }
        if has_direct {
            op.remove_direct_left_recursion(cur);
        }
        op.done.insert(cur);
    }
    op.out
}

struct LrRemoveOp<'g> {
    grammar: &'g Grammar,
    out: Grammar,
    done: HashSet<Symbol>,
    used: HashSet<Symbol>,
}

fn used_symbols(grammar: &Grammar) -> HashSet<Symbol> {
    let mut used: HashSet<Symbol> = grammar.non_terminals().iter().copied().collect();
    for nt in grammar.non_terminals() {
        for prod in grammar.productions(*nt).unwrap().iter() {
            used.extend(prod.symbols().iter().copied());
        }
    }
    used
}

impl<'g> LrRemoveOp<'g> {
    fn safe_add(&mut self, cur: Symbol, prod: Production, has_direct: &mut bool) {
        match prod.first() {
            Some(first) if self.done.contains(&first) => {
                // substitute the rewritten productions of the leading symbol
                let tail: Vec<Symbol> = prod.symbols()[1..].to_vec();
                let leads: Vec<Production> = self
                    .out
                    .productions(first)
                    .map(|p| p.iter().cloned().collect())
                    .unwrap_or_default();
                for lead in leads {
                    let mut symbols = lead.symbols().to_vec();
                    symbols.extend(tail.iter().copied());
                    self.safe_add(cur, Production::new(symbols), has_direct);
                }
            }
            first => {
                if first == Some(cur) {
                    *has_direct = true;
                }
                self.out.add(cur, prod);
            }
        }
    }

    fn remove_direct_left_recursion(&mut self, cur: Symbol) {
        let set = self.grammar.symbols().clone();
        let mut name = set.name(cur);
        let new_sym = loop {
            name.push('\'');
            match set.get(&name) {
                Some(sym) if self.used.contains(&sym) => continue,
                _ => break set.intern(&name),
            }
        };
        self.used.insert(new_sym);

        let prods = self.out.take_productions(cur);
        for prod in prods.iter() {
            if prod.first() != Some(cur) {
                let mut symbols = prod.symbols().to_vec();
                symbols.push(new_sym);
                self.out.add(cur, Production::new(symbols));
            } else {
                let mut symbols = prod.symbols()[1..].to_vec();
                if !symbols.is_empty() {
                    symbols.push(new_sym);
                    self.out.add(new_sym, Production::new(symbols));
                }
            }
        }
        self.out.add(new_sym, Production::new(Vec::new()));
    }
}
