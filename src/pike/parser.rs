use super::ast::Node;
use crate::GrammarError;

/// Parse a pattern into its AST. Groups are numbered from 1 in the order of
/// their opening parenthesis.
pub(crate) fn parse(pattern: &str) -> Result<Node, GrammarError> {
    let mut op = ParseOp {
        chars: pattern.chars().collect(),
        pos: 0,
        group: 0,
    };
    let node = op.alternation()?;
    if !op.done() {
        return Err(op.error("unbalanced ')'"));
    }
    Ok(node)
}

struct ParseOp {
    chars: Vec<char>,
    pos: usize,
    group: u32,
}

impl ParseOp {
    fn done(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn error(&self, message: &str) -> GrammarError {
        GrammarError::BadPattern(format!("{} at offset {}", message, self.pos))
    }

    fn alternation(&mut self) -> Result<Node, GrammarError> {
        let mut node = self.concat()?;
        while self.eat('|') {
            let right = self.concat()?;
            node = Node::Or(Box::new(node), Box::new(right));
        }
        Ok(node)
    }

    fn concat(&mut self) -> Result<Node, GrammarError> {
        let mut nodes = Vec::new();
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            nodes.push(self.postfix()?);
        }
        Ok(match nodes.len() {
            0 => Node::Empty,
            1 => nodes.pop().unwrap(),
            _ => Node::Seq(nodes),
        })
    }

    fn postfix(&mut self) -> Result<Node, GrammarError> {
        let mut node = self.atom()?;
        loop {
            node = match self.peek() {
                Some('*') => {
                    self.pos += 1;
                    Node::Star(Box::new(node))
                }
                Some('+') => {
                    self.pos += 1;
                    Node::Plus(Box::new(node))
                }
                Some('?') => {
                    self.pos += 1;
                    Node::Opt(Box::new(node))
                }
                Some('{') => {
                    self.pos += 1;
                    self.min_max(node)?
                }
                _ => return Ok(node),
            };
        }
    }

    // a bounded repetition {m,n}, {m,} or {,n}; the '{' is already consumed
    fn min_max(&mut self, child: Node) -> Result<Node, GrammarError> {
        let min = self.digits();
        if !self.eat(',') {
            return Err(self.error("expected ',' in bounded repetition"));
        }
        let max = self.digits();
        if !self.eat('}') {
            return Err(self.error("expected '}' in bounded repetition"));
        }
        let child = Box::new(child);
        match (min, max) {
            (Some(min), Some(max)) => Ok(Node::MinMax { min, max, child }),
            (Some(min), None) => Ok(Node::Min { min, child }),
            (None, Some(max)) => Ok(Node::Max { max, child }),
            (None, None) => Err(self.error("empty bounded repetition")),
        }
    }

    fn digits(&mut self) -> Option<u32> {
        while self.peek() == Some(' ') {
            self.pos += 1;
        }
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return None;
        }
        let digits: String = self.chars[start..self.pos].iter().collect();
        let value = digits.parse().ok();
        while self.peek() == Some(' ') {
            self.pos += 1;
        }
        value
    }

    fn atom(&mut self) -> Result<Node, GrammarError> {
        match self.next() {
            None => Ok(Node::Empty),
            Some('(') => {
                self.group += 1;
                let idx = self.group;
                let child = self.alternation()?;
                if !self.eat(')') {
                    return Err(self.error("unclosed group"));
                }
                Ok(Node::Group {
                    idx,
                    child: Box::new(child),
                })
            }
            Some('[') => self.class(),
            Some('.') => Ok(Node::Class(any_rune())),
            Some('\\') => {
                let c = self.next().ok_or_else(|| self.error("dangling escape"))?;
                Ok(escape_node(c))
            }
            Some(c @ ('*' | '+' | '?' | '{')) => {
                Err(self.error(&format!("'{}' with nothing to repeat", c)))
            }
            Some(c) => Ok(Node::Match(c)),
        }
    }

    // a character class; the '[' is already consumed
    fn class(&mut self) -> Result<Node, GrammarError> {
        let negate = self.eat('^');
        let mut ranges: Vec<(char, char)> = Vec::new();
        loop {
            let c = match self.next() {
                None => return Err(self.error("unclosed character class")),
                Some(']') => break,
                Some('\\') => {
                    let e = self.next().ok_or_else(|| self.error("dangling escape"))?;
                    match class_escape(e) {
                        Some(expansion) => {
                            ranges.extend(expansion);
                            continue;
                        }
                        None => escape_rune(e),
                    }
                }
                Some(c) => c,
            };
            if self.peek() == Some('-') && self.chars.get(self.pos + 1) != Some(&']') {
                self.pos += 1; // consume '-'
                let hi = match self.next() {
                    None => return Err(self.error("unclosed character class")),
                    Some('\\') => {
                        let e = self.next().ok_or_else(|| self.error("dangling escape"))?;
                        escape_rune(e)
                    }
                    Some(hi) => hi,
                };
                if hi < c {
                    return Err(self.error("inverted range in character class"));
                }
                ranges.push((c, hi));
            } else {
                ranges.push((c, c));
            }
        }
        if ranges.is_empty() {
            return Err(self.error("empty character class"));
        }
        let ranges = normalize(ranges);
        Ok(Node::Class(if negate { complement(ranges) } else { ranges }))
    }
}

fn any_rune() -> Vec<(char, char)> {
    vec![('\0', char::MAX)]
}

fn escape_rune(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        _ => c,
    }
}

fn digit_ranges() -> Vec<(char, char)> {
    vec![('0', '9')]
}

fn word_ranges() -> Vec<(char, char)> {
    vec![('0', '9'), ('A', 'Z'), ('_', '_'), ('a', 'z')]
}

fn space_ranges() -> Vec<(char, char)> {
    vec![('\t', '\r'), (' ', ' ')]
}

fn class_escape(c: char) -> Option<Vec<(char, char)>> {
    match c {
        'd' => Some(digit_ranges()),
        'w' => Some(word_ranges()),
        's' => Some(space_ranges()),
        _ => None,
    }
}

fn escape_node(c: char) -> Node {
    match c {
        'd' => Node::Class(digit_ranges()),
        'D' => Node::Class(complement(digit_ranges())),
        'w' => Node::Class(word_ranges()),
        'W' => Node::Class(complement(word_ranges())),
        's' => Node::Class(space_ranges()),
        'S' => Node::Class(complement(space_ranges())),
        _ => Node::Match(escape_rune(c)),
    }
}

/// Sort and merge overlapping or adjacent ranges.
fn normalize(mut ranges: Vec<(char, char)>) -> Vec<(char, char)> {
    ranges.sort();
    let mut merged: Vec<(char, char)> = Vec::with_capacity(ranges.len());
    for (lo, hi) in ranges {
        match merged.last_mut() {
            Some(last) if lo as u32 <= (last.1 as u32).saturating_add(1) => {
                last.1 = last.1.max(hi);
            }
            _ => merged.push((lo, hi)),
        }
    }
    merged
}

/// The complement of a normalized range set over all valid runes.
fn complement(ranges: Vec<(char, char)>) -> Vec<(char, char)> {
    let ranges = normalize(ranges);
    let mut out = Vec::new();
    let mut next = 0u32;
    for (lo, hi) in ranges {
        push_scalar_range(&mut out, next, lo as u32);
        next = (hi as u32).saturating_add(1);
    }
    push_scalar_range(&mut out, next, char::MAX as u32 + 1);
    out
}

// append [from, to) skipping the surrogate block
fn push_scalar_range(out: &mut Vec<(char, char)>, from: u32, to: u32) {
    const SURROGATE_LO: u32 = 0xD800;
    const SURROGATE_HI: u32 = 0xDFFF;
    if from >= to {
        return;
    }
    let segments = [
        (from, to.min(SURROGATE_LO)),
        (from.max(SURROGATE_HI + 1), to),
    ];
    for (lo, hi) in segments {
        if lo < hi {
            if let (Some(l), Some(h)) = (char::from_u32(lo), char::from_u32(hi - 1)) {
                out.push((l, h));
            }
        }
    }
}
