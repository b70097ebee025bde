use super::{Action, MatchOrder, Rule, StackLexer};
use crate::util::Code;
#[cfg(debug_assertions)]
use crate::util::Log;
use crate::{ILexer, Lexeme};

impl ILexer for StackLexer {
    /// Tokenize the input and return the lexeme stream. Regions no rule
    /// matches are collapsed into single lexemes of the reserved error kind.
    fn lex(&self, input: &str) -> Vec<Lexeme> {
        let code = Code::from(input);
        let mut op = LexOp {
            lexer: self,
            code,
            input,
            stack: Vec::new(),
            current: self.start,
            cur: 0,
            err_start: None,
            lexemes: Vec::new(),
        };
        op.lex();
        op.lexemes
    }
}

impl StackLexer {
    /// Filter the error lexemes back out of a stream, so a caller can keep
    /// the partial stream and still enumerate every failed region.
    pub fn errors<'lex>(&self, lexemes: &'lex [Lexeme]) -> Vec<&'lex Lexeme> {
        lexemes
            .iter()
            .filter(|lex| lex.kind == self.error_kind)
            .collect()
    }
}

struct LexOp<'l> {
    lexer: &'l StackLexer,
    code: Code<'l>,
    input: &'l str,
    stack: Vec<usize>,
    current: usize,
    cur: usize,
    err_start: Option<usize>,
    lexemes: Vec<Lexeme>,
}

impl<'l> LexOp<'l> {
    fn lex(&mut self) {
        #[cfg(debug_assertions)]
        let debug = self.lexer.debug.get().copied().unwrap_or(Log::None);

        while self.cur < self.input.len() {
            let found = self.find_next_match();
            let (rule_index, end) = match found {
                None => {
                    // no rule matched; start or extend an error region
                    if self.err_start.is_none() {
                        self.err_start = Some(self.cur);
                    }
                    self.cur += next_rune_len(self.input, self.cur);
                    continue;
                }
                Some(found) => found,
            };
            self.flush_error();

            let rule = &self.lexer.lexers[self.current].rules[rule_index];
            let value = self.rule_value(rule, end);
            let position = self.code.obtain_position(self.cur);

            #[cfg(debug_assertions)]
            if debug.order() >= Log::Success(()).order() {
                println!(
                    "[{}; Lexeme]: {} at {}",
                    debug,
                    self.lexer.set.name(rule.kind),
                    position
                );
            }

            if !rule.discard {
                self.lexemes.push(Lexeme::new(rule.kind, value, position));
            }
            self.cur += end;
            if self.cur >= self.input.len() {
                break;
            }

            match rule.action {
                Action::None => {}
                Action::Push(target) => {
                    self.stack.push(self.current);
                    self.current = target;

                    #[cfg(debug_assertions)]
                    if debug.order() >= Log::Default(()).order() {
                        println!(
                            "{}: pushing sub-lexer '{}' at {}",
                            debug,
                            self.lexer.lexers[target].name,
                            self.code.obtain_position(self.cur)
                        );
                    }
                }
                Action::Pop(levels) => {
                    for _ in 0..levels {
                        match self.stack.pop() {
                            Some(prev) => self.current = prev,
                            None => {
                                // popped past the bottom; the rest of the
                                // input cannot be matched any more
                                self.err_start = Some(self.cur);
                                self.cur = self.input.len();
                                self.flush_error();
                                return;
                            }
                        }
                    }

                    #[cfg(debug_assertions)]
                    if debug.order() >= Log::Default(()).order() {
                        println!(
                            "{}: popped to sub-lexer '{}' at {}",
                            debug,
                            self.lexer.lexers[self.current].name,
                            self.code.obtain_position(self.cur)
                        );
                    }
                }
            }
        }
        self.flush_error();
    }

    // the winning rule for the current position, with its match length
    fn find_next_match(&self) -> Option<(usize, usize)> {
        let rest = &self.input[self.cur..];
        let mut found: Option<(usize, usize)> = None;
        for (index, rule) in self.lexer.lexers[self.current].rules.iter().enumerate() {
            let end = match rule.pattern.longest_match(rest) {
                Some(m) if m.end > 0 => m.end,
                _ => continue,
            };
            match self.lexer.order {
                MatchOrder::PriorityThenLength => return Some((index, end)),
                MatchOrder::LengthThenPriority => {
                    if found.map_or(true, |(_, best)| end > best) {
                        found = Some((index, end));
                    }
                }
            }
        }
        found
    }

    fn rule_value(&self, rule: &Rule, end: usize) -> String {
        let rest = &self.input[self.cur..self.cur + end];
        match rule.capture {
            None => rest.to_string(),
            Some(group) => {
                let m = rule.pattern.longest_match(rest);
                m.and_then(|m| m.group(group).and_then(|g| g.first().copied()))
                    .map(|(start, end)| rest[start..end].to_string())
                    .unwrap_or_default()
            }
        }
    }

    fn flush_error(&mut self) {
        if let Some(start) = self.err_start.take() {
            let value = self.input[start..self.cur].to_string();
            let position = self.code.obtain_position(start);
            self.lexemes
                .push(Lexeme::new(self.lexer.error_kind, value, position));
        }
    }
}

fn next_rune_len(input: &str, at: usize) -> usize {
    input[at..].chars().next().map_or(1, |c| c.len_utf8())
}
