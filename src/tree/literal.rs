use super::ParseNode;
use crate::symbol::SymbolSet;
use crate::{GrammarError, Lexeme};
use regex::Regex;
use std::rc::Rc;

// the items of the literal form: a closing brace, or a kind with an optional
// quoted value and an optional opening brace
fn item_re() -> Regex {
    Regex::new(r"(\})|([^}{:'\s]+)\s*(?::\s*'((?:[^'\\]|\\.)*)')?\s*(\{?)").unwrap()
}

impl ParseNode {
    /// Build a tree from its literal form. Trees usually come from a parser;
    /// this form is for tests and for pinning down expected shapes:
    ///
    /// ```text
    /// E {
    ///   int: '1'
    ///   op: '+'
    ///   E {
    ///     int: '2'
    ///   }
    /// }
    /// ```
    pub fn build(set: &Rc<SymbolSet>, text: &str) -> Result<ParseNode, GrammarError> {
        let re = item_re();
        let mut stack: Vec<ParseNode> = vec![ParseNode::marker(set.intern(""), Vec::new())];
        let mut last = 0;
        for m in re.captures_iter(text) {
            let whole = m.get(0).unwrap();
            if !text[last..whole.start()].trim().is_empty() {
                return Err(GrammarError::Malformed(text[last..whole.start()].to_string()));
            }
            last = whole.end();

            if m.get(1).is_some() {
                if stack.len() < 2 {
                    return Err(GrammarError::Malformed("unbalanced '}'".into()));
                }
                let done = stack.pop().unwrap();
                stack.last_mut().unwrap().children.push(done);
                continue;
            }

            let kind = set.intern(&m[2]);
            let value = m.get(3).map_or(String::new(), |v| unescape(v.as_str()));
            let node = ParseNode::new(Lexeme::new(kind, value, Default::default()), Vec::new());
            if &m[4] == "{" {
                stack.push(node);
            } else {
                stack.last_mut().unwrap().children.push(node);
            }
        }
        if !text[last..].trim().is_empty() {
            return Err(GrammarError::Malformed(text[last..].to_string()));
        }
        if stack.len() != 1 {
            return Err(GrammarError::Malformed("unclosed tree braces".into()));
        }
        stack
            .pop()
            .unwrap()
            .children
            .into_iter()
            .next()
            .ok_or_else(|| GrammarError::Malformed("empty tree literal".into()))
    }

    /// Render the tree in its literal form. The output builds back into an
    /// equal tree apart from positions, which the literal form does not carry.
    pub fn fmt(&self, set: &Rc<SymbolSet>) -> String {
        let mut out = String::new();
        self.fmt_into(set, "", &mut out);
        out
    }

    fn fmt_into(&self, set: &Rc<SymbolSet>, pad: &str, out: &mut String) {
        out.push_str(pad);
        out.push_str(&set.name(self.kind()));
        if !self.value().is_empty() {
            out.push_str(": '");
            out.push_str(&escape(self.value()));
            out.push('\'');
        }
        if self.children.is_empty() {
            out.push('\n');
        } else {
            out.push_str(" {\n");
            let sub = format!("{}\t", pad);
            for child in &self.children {
                child.fmt_into(set, &sub, out);
            }
            out.push_str(pad);
            out.push_str("}\n");
        }
    }
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
