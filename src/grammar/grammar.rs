use super::{Analytics, Grammar, Production, Productions};
use crate::symbol::{Symbol, SymbolSet};
use crate::GrammarError;
use once_cell::unsync::OnceCell;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

impl Production {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self { symbols }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn first(&self) -> Option<Symbol> {
        self.symbols.first().copied()
    }

    pub fn get(&self, index: usize) -> Option<Symbol> {
        self.symbols.get(index).copied()
    }

    /// Render the production as space separated symbol names.
    pub fn display(&self, set: &SymbolSet) -> String {
        self.symbols
            .iter()
            .map(|s| set.name(*s))
            .collect::<Vec<String>>()
            .join(" ")
    }
}

impl Productions {
    pub fn new(prods: Vec<Production>) -> Self {
        Self { prods }
    }

    pub fn len(&self) -> usize {
        self.prods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prods.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Production> {
        self.prods.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Production> {
        self.prods.iter()
    }

    fn push(&mut self, prod: Production) {
        self.prods.push(prod);
    }
}

impl Grammar {
    /// Create a grammar without any production rule.
    pub fn empty(set: &Rc<SymbolSet>) -> Self {
        Self {
            set: set.clone(),
            order: Vec::new(),
            productions: HashMap::new(),
            analytics: OnceCell::new(),
        }
    }

    /// Parse a grammar from its textual form.
    ///
    /// Each line defines one production `NT -> S1 S2 ... Sn`.
    /// A line with a blank left hand side, or without any `->`, continues the
    /// previous non-terminal. A missing right hand side defines an ε production.
    /// A rule before any non-terminal has been named falls under `START`.
    pub fn parse(set: &Rc<SymbolSet>, definition: &str) -> Result<Self, GrammarError> {
        let mut grammar = Grammar::empty(set);
        let mut cur = set.intern("START");
        for line in definition.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split("->").collect();
            let rhs = match parts.len() {
                1 => parts[0],
                2 => {
                    let lhs = parts[0].trim();
                    if !lhs.is_empty() {
                        cur = set.intern(lhs);
                    }
                    parts[1]
                }
                _ => return Err(GrammarError::Malformed(line.to_string())),
            };
            let symbols: Vec<Symbol> = rhs.split_whitespace().map(|s| set.intern(s)).collect();
            grammar.add(cur, Production::new(symbols));
        }
        Ok(grammar)
    }

    /// Add a production to the grammar. A symbol seen as a left hand side for
    /// the first time is appended to the non-terminal order.
    pub fn add(&mut self, from: Symbol, to: Production) {
        if !self.productions.contains_key(&from) {
            self.order.push(from);
        }
        self.productions.entry(from).or_default().push(to);
        self.analytics.take();
    }

    /// The productions of a non-terminal. [None] marks `symbol` as a terminal.
    pub fn productions(&self, symbol: Symbol) -> Option<&Productions> {
        self.productions.get(&symbol)
    }

    /// Remove and return the productions of a non-terminal, leaving it defined
    /// with an empty production set and keeping its place in the order.
    pub(crate) fn take_productions(&mut self, from: Symbol) -> Productions {
        self.analytics.take();
        self.productions
            .insert(from, Productions::default())
            .unwrap_or_default()
    }

    /// The non-terminals of the grammar. The first one is the start symbol.
    pub fn non_terminals(&self) -> &[Symbol] {
        &self.order
    }

    pub fn start(&self) -> Option<Symbol> {
        self.order.first().copied()
    }

    pub fn is_non_terminal(&self, symbol: Symbol) -> bool {
        self.productions.contains_key(&symbol)
    }

    pub fn symbols(&self) -> &Rc<SymbolSet> {
        &self.set
    }

    /// The cached analysis of the grammar, computed on first use.
    pub fn analytics(&self) -> &Analytics {
        self.analytics.get_or_init(|| Analytics::analyze(self))
    }

    /// The terminals which can begin a derivation of `symbol`.
    pub fn firsts(&self, symbol: Symbol) -> Vec<Symbol> {
        self.analytics().firsts(symbol)
    }

    /// Whether `first` can be the first terminal in a derivation of `symbol`.
    /// For a terminal `symbol` this is simple equality.
    pub fn has_first(&self, symbol: Symbol, first: Symbol) -> bool {
        self.analytics().has_first(symbol, first)
    }

    /// Whether `symbol` can reach an ε production through leftmost children only.
    pub fn nil_in_first(&self, symbol: Symbol) -> bool {
        self.analytics().nil_in_first(symbol)
    }
}

impl PartialEq for Grammar {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order && self.productions == other.productions
    }
}

impl Display for Grammar {
    /// Format the grammar with aligned `->` columns. The output parses back
    /// into an equal grammar as long as every non-terminal has at least one
    /// production. A non-terminal without any, as left recursion removal can
    /// leave behind for a self-only rule like `A -> A`, cannot be expressed
    /// in the textual form, where a blank right hand side already means ε,
    /// and is omitted from the output.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let longest = self
            .order
            .iter()
            .map(|nt| self.set.name(*nt).chars().count())
            .max()
            .unwrap_or(0);

        let mut first_line = true;
        for nt in &self.order {
            let mut lhs = self.set.name(*nt);
            for prod in self.productions[nt].iter() {
                if !first_line {
                    writeln!(f)?;
                }
                first_line = false;
                write!(f, "{0:<1$} -> {2}", lhs, longest, prod.display(&self.set))?;
                lhs = String::new();
            }
        }
        Ok(())
    }
}
