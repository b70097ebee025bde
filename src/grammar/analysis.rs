use super::{Analytics, Grammar};
use crate::symbol::Symbol;
use std::collections::{HashMap, HashSet};

struct AnalysisOp<'g> {
    grammar: &'g Grammar,
    nonterm2firsts: HashMap<Symbol, Vec<Symbol>>,
    nil_in_first: HashMap<Symbol, bool>,
    done: HashSet<Symbol>,
}

impl Analytics {
    /// Analyse a grammar. Walks every non-terminal depth first, accumulating
    /// the terminals which can begin a derivation. When a leftmost child can
    /// derive ε the walk continues into the next sibling.
    pub fn analyze(grammar: &Grammar) -> Self {
        let mut op = AnalysisOp {
            grammar,
            nonterm2firsts: HashMap::new(),
            nil_in_first: HashMap::new(),
            done: HashSet::new(),
        };

        for nt in grammar.non_terminals() {
            op.firsts(*nt);
        }

        let mut first2nonterms: HashMap<Symbol, HashSet<Symbol>> = HashMap::new();
        for (symbol, firsts) in &op.nonterm2firsts {
            for first in firsts {
                first2nonterms.entry(*first).or_default().insert(*symbol);
            }
        }

        Analytics {
            nonterm2firsts: op.nonterm2firsts,
            first2nonterms,
            nil_in_first: op.nil_in_first,
        }
    }

    /// The first set of a non-terminal. Unknown symbols and symbols without
    /// reachable terminals yield an empty set.
    pub fn firsts(&self, symbol: Symbol) -> Vec<Symbol> {
        self.nonterm2firsts
            .get(&symbol)
            .cloned()
            .unwrap_or_default()
    }

    /// Whether `first` can begin a derivation rooted at `symbol`.
    /// A terminal has itself as its only first.
    pub fn has_first(&self, symbol: Symbol, first: Symbol) -> bool {
        // a terminal begins itself even when it also begins some non-terminal
        if symbol == first {
            return true;
        }
        match self.first2nonterms.get(&first) {
            Some(nonterms) => nonterms.contains(&symbol),
            None => false,
        }
    }

    /// Whether `symbol` can reach an ε production through leftmost children only.
    pub fn nil_in_first(&self, symbol: Symbol) -> bool {
        self.nil_in_first.get(&symbol).copied().unwrap_or(false)
    }

    pub fn is_non_terminal(&self, symbol: Symbol) -> bool {
        self.nonterm2firsts.contains_key(&symbol)
    }

    /// The non-terminals whose first set contains the terminal `first`.
    pub fn first_non_terminals(&self, first: Symbol) -> Vec<Symbol> {
        self.first2nonterms
            .get(&first)
            .map(|nts| nts.iter().copied().collect())
            .unwrap_or_default()
    }
}

impl<'g> AnalysisOp<'g> {
    fn firsts(&mut self, s: Symbol) -> (Vec<Symbol>, bool) {
        if !self.done.insert(s) {
            return (
                self.nonterm2firsts.get(&s).cloned().unwrap_or_default(),
                self.nil_in_first.get(&s).copied().unwrap_or(false),
            );
        }
        let mut fs: Vec<Symbol> = Vec::new();
        let mut nil_in_first = false;
        let prods = match self.grammar.productions(s) {
            Some(prods) => prods.clone(),
            None => return (fs, false),
        };
        for prod in prods.iter() {
            if prod.is_empty() {
                nil_in_first = true;
                continue;
            }
            let mut do_next = true;
            let mut i = 0;
            while i < prod.len() && do_next {
                let symbol = prod.get(i).unwrap();
                if !self.grammar.is_non_terminal(symbol) {
                    do_next = false;
                    if !fs.contains(&symbol) {
                        fs.push(symbol);
                    }
                } else {
                    let (firsts, dn) = self.firsts(symbol);
                    do_next = dn;
                    nil_in_first = nil_in_first || dn;
                    for f in firsts {
                        if !fs.contains(&f) {
                            fs.push(f);
                        }
                    }
                }
                i += 1;
            }
        }
        self.nonterm2firsts.insert(s, fs.clone());
        self.nil_in_first.insert(s, nil_in_first);
        (fs, nil_in_first)
    }
}
