use super::{Action, MatchOrder, Rule, StackLexer, SubLexer};
use crate::pike::Pike;
use crate::symbol::{Symbol, SymbolSet};
use crate::util::Log;
use crate::GrammarError;
use once_cell::unsync::OnceCell;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

// == name ==  section header
fn section_re() -> Regex {
    Regex::new(r"(?m)^\s*==\s*([a-zA-Z_][a-zA-Z_0-9]*)\s*(?:==)?\s*$").unwrap()
}

// KIND [/REGEX/] [(CAPTURE)] [TARGET] [-]
fn line_re() -> Regex {
    Regex::new(r"^([^/\s]+)\s*(?:/((?:[^/\\]|\\.)+)/)?\s*(?:\((\d+)\))?\s*(\^+|[a-zA-Z_][a-zA-Z_0-9]*)?\s*(-?)$")
        .unwrap()
}

enum RawRule {
    Rule {
        kind: String,
        pattern: String,
        capture: Option<u32>,
        target: Option<String>,
        discard: bool,
    },
    Inherit(String),
}

impl StackLexer {
    /// Build a stack lexer from its textual definition. The first sub-lexer
    /// section is the one active at the start of the input.
    pub fn new(set: &Rc<SymbolSet>, definition: &str) -> Result<Self, GrammarError> {
        let sections = split_sections(definition)?;

        let mut names: HashMap<String, usize> = HashMap::new();
        for (index, (name, _)) in sections.iter().enumerate() {
            if names.insert(name.clone(), index).is_some() {
                return Err(GrammarError::Malformed(format!(
                    "sub-lexer '{}' is defined twice",
                    name
                )));
            }
        }

        let mut raw: Vec<Vec<RawRule>> = Vec::with_capacity(sections.len());
        for (_, body) in &sections {
            raw.push(parse_rules(body, &names)?);
        }

        let mut op = MaterializeOp {
            set,
            names: &names,
            sections: &sections,
            raw: &raw,
            done: vec![None; sections.len()],
            stack: HashSet::new(),
        };
        let mut lexers = Vec::with_capacity(sections.len());
        for index in 0..sections.len() {
            op.materialize(index)?;
        }
        for (index, (name, _)) in sections.iter().enumerate() {
            lexers.push(SubLexer {
                name: name.clone(),
                rules: op.done[index].take().unwrap(),
            });
        }

        Ok(Self {
            set: set.clone(),
            lexers,
            start: 0,
            error_kind: set.intern("Error"),
            order: MatchOrder::LengthThenPriority,
            debug: OnceCell::new(),
        })
    }

    /// Choose the longest match and break ties by rule order. This is the default.
    pub fn by_length(&mut self) {
        self.order = MatchOrder::LengthThenPriority;
    }

    /// Choose the first rule in order which matches and break ties by length.
    pub fn by_priority(&mut self) {
        self.order = MatchOrder::PriorityThenLength;
    }

    /// The reserved kind carried by error lexemes.
    pub fn error_kind(&self) -> Symbol {
        self.error_kind
    }

    pub fn symbols(&self) -> &Rc<SymbolSet> {
        &self.set
    }

    /// The names of the sub-lexers in definition order. The first one is
    /// active at the start of the input.
    pub fn sub_lexers(&self) -> Vec<&str> {
        self.lexers.iter().map(|l| l.name.as_str()).collect()
    }

    /// Set a log label to debug the lexer based on the level of [Log].
    pub fn set_log(&self, log: Log<&'static str>) -> Result<(), String> {
        self.debug
            .set(log)
            .map_err(|err| format!("Log label {} is already assigned.", err))
    }
}

fn split_sections(definition: &str) -> Result<Vec<(String, String)>, GrammarError> {
    let re = section_re();
    let mut sections: Vec<(String, String)> = Vec::new();
    let mut cur: Option<(String, usize)> = None;
    for m in re.captures_iter(definition) {
        let whole = m.get(0).unwrap();
        if let Some((name, from)) = cur.take() {
            sections.push((name, definition[from..whole.start()].to_string()));
        }
        cur = Some((m[1].to_string(), whole.end()));
    }
    match cur {
        Some((name, from)) => {
            sections.push((name, definition[from..].to_string()));
            Ok(sections)
        }
        None => Err(GrammarError::Malformed(
            "a lexer definition needs at least one '== name ==' section".into(),
        )),
    }
}

fn parse_rules(
    body: &str,
    names: &HashMap<String, usize>,
) -> Result<Vec<RawRule>, GrammarError> {
    let re = line_re();
    let mut rules = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let m = re
            .captures(line)
            .ok_or_else(|| GrammarError::Malformed(line.to_string()))?;

        let kind = m[1].to_string();
        let pattern = m.get(2).map(|p| p.as_str().to_string());
        let capture = m.get(3).and_then(|c| c.as_str().parse::<u32>().ok());
        let target = m.get(4).map(|t| t.as_str().to_string());
        let discard = !m[5].is_empty();

        // a bare sub-lexer name inherits that sub-lexer's rules
        if pattern.is_none()
            && capture.is_none()
            && target.is_none()
            && !discard
            && names.contains_key(&kind)
        {
            rules.push(RawRule::Inherit(kind));
            continue;
        }

        if let Some(target) = &target {
            if !target.starts_with('^') && !names.contains_key(target) {
                return Err(GrammarError::UnknownSubLexer(target.clone()));
            }
        }

        let pattern = match pattern {
            Some(pattern) => pattern,
            None => literal_pattern(&kind),
        };

        rules.push(RawRule::Rule {
            kind,
            pattern,
            capture,
            target,
            discard,
        });
    }
    Ok(rules)
}

// when a rule has no regex the kind itself is the pattern
fn literal_pattern(kind: &str) -> String {
    let mut out = String::with_capacity(kind.len() * 2);
    for c in kind.chars() {
        if !c.is_alphanumeric() {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

struct MaterializeOp<'a> {
    set: &'a Rc<SymbolSet>,
    names: &'a HashMap<String, usize>,
    sections: &'a [(String, String)],
    raw: &'a [Vec<RawRule>],
    done: Vec<Option<Vec<Rule>>>,
    stack: HashSet<usize>,
}

impl<'a> MaterializeOp<'a> {
    // resolve inheritance depth first; the finished rule list of a parent is
    // spliced into its heirs, so it reflects the whole definition
    fn materialize(&mut self, index: usize) -> Result<(), GrammarError> {
        if self.done[index].is_some() {
            return Ok(());
        }
        if !self.stack.insert(index) {
            return Err(GrammarError::CyclicInheritance(
                self.sections[index].0.clone(),
            ));
        }

        let mut rules: Vec<Rule> = Vec::new();
        let mut kinds: HashSet<Symbol> = HashSet::new();
        let raws: &'a [Vec<RawRule>] = self.raw;
        for raw in &raws[index] {
            match raw {
                RawRule::Inherit(name) => {
                    let parent = self.names[name];
                    self.materialize(parent)?;
                    for rule in self.done[parent].as_ref().unwrap().clone() {
                        if !kinds.insert(rule.kind) {
                            return Err(GrammarError::DuplicateKind(self.set.name(rule.kind)));
                        }
                        rules.push(rule);
                    }
                }
                RawRule::Rule {
                    kind,
                    pattern,
                    capture,
                    target,
                    discard,
                } => {
                    let kind = self.set.intern(kind);
                    if !kinds.insert(kind) {
                        return Err(GrammarError::DuplicateKind(self.set.name(kind)));
                    }
                    let compiled = Pike::new(pattern)?;
                    if compiled.longest_match("").is_some() {
                        return Err(GrammarError::BadPattern(format!(
                            "pattern /{}/ should not match the empty string",
                            pattern
                        )));
                    }
                    let action = match target {
                        None => Action::None,
                        Some(t) if t.starts_with('^') => Action::Pop(t.len()),
                        Some(t) => Action::Push(self.names[t]),
                    };
                    rules.push(Rule {
                        kind,
                        pattern: compiled,
                        capture: *capture,
                        action,
                        discard: *discard,
                    });
                }
            }
        }

        self.stack.remove(&index);
        self.done[index] = Some(rules);
        Ok(())
    }
}
