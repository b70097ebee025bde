use super::{Condition, ParseNode, Reducer, Reduction};
use crate::grammar::Grammar;
use crate::lexer::StackLexer;
use crate::parser::Packrat;
use crate::symbol::SymbolSet;
use crate::{GrammarError, ILexer, IParser};
use std::rc::Rc;

const LEXER_RULES: &str = r#"
  == main ==
  If
  ChildIs
  PromoteChildrenOf
  PromoteChildValue
  PromoteGrandChildren
  PromoteSingleChild
  PromoteChild
  RemoveChildren
  RemoveChild
  RemoveAll
  ReplaceWithChild
  Nil
  number  /-?\d+/
  rule    /\w+/
  string  /"([^"\\]|\\.)*"/
  lp      /\(/
  rp      /\)/
  comma   /,/
  period  /\./
  comment /\/\/[^\n]*/ -
  space   /\s+/ -
"#;

const GRAMMAR_RULES: &str = "
  Rules     -> Rule Rules
            ->
  Rule      -> rule Chain
  Chain     -> Reduction period Chain
            -> Reduction period
            -> Reduction
  Reduction -> PromoteSingleChild NoArgs
            -> RemoveChildren VarNumArg
            -> PromoteChildValue OneNumArg
            -> RemoveChild OneNumArg
            -> ReplaceWithChild OneNumArg
            -> PromoteGrandChildren NoArgs
            -> PromoteChildrenOf OneNumArg
            -> PromoteChild OneNumArg
            -> RemoveAll VarStrArg
            -> Nil
            -> If lp Condition comma Chain comma Chain rp
  VarNumArg -> lp NumList rp
  NumList   -> number comma NumList
            -> number
  VarStrArg -> lp StrList rp
  StrList   -> string comma StrList
            -> string
  OneNumArg -> lp number rp
  NoArgs    -> lp rp
  Condition -> ChildIs lp number comma string rp
";

// the pipeline parsing the DSL itself, over its own symbol set
struct DslOp {
    set: Rc<SymbolSet>,
    lexer: StackLexer,
    parser: Packrat,
    reducer: Reducer,
}

impl DslOp {
    fn new() -> Self {
        let set = Rc::new(SymbolSet::new());
        let lexer =
            StackLexer::new(&set, LEXER_RULES).expect("the reducer DSL lexer rules are fixed");
        let grammar = Rc::new(
            Grammar::parse(&set, GRAMMAR_RULES).expect("the reducer DSL grammar is fixed"),
        );
        let parser = Packrat::new(grammar);

        let mut reducer = Reducer::new(&set);
        let period = set.intern("period");
        let comma = set.intern("comma");
        let lp = set.intern("lp");
        let rp = set.intern("rp");
        reducer.add("Rules", Reduction::promote_children_of(1));
        reducer.add(
            "Rule",
            Reduction::promote_child_value(0)
                .chain(Reduction::promote_children_of(0))
                .chain(Reduction::remove_all(vec![period])),
        );
        reducer.add(
            "Chain",
            Reduction::remove_all(vec![period]).chain(Reduction::promote_children_of(1)),
        );
        reducer.add(
            "Reduction",
            Reduction::remove_all(vec![comma, lp, rp]).chain(Reduction::promote_child(0)),
        );
        reducer.add(
            "NumList",
            Reduction::remove_all(vec![comma]).chain(Reduction::promote_children_of(1)),
        );
        reducer.add(
            "StrList",
            Reduction::remove_all(vec![comma]).chain(Reduction::promote_children_of(1)),
        );
        reducer.add(
            "VarNumArg",
            Reduction::remove_children(vec![0, -1]).chain(Reduction::promote_children_of(0)),
        );
        reducer.add(
            "VarStrArg",
            Reduction::remove_children(vec![0, -1]).chain(Reduction::promote_children_of(0)),
        );
        reducer.add("OneNumArg", Reduction::remove_children(vec![0, -1]));
        reducer.add(
            "Condition",
            Reduction::remove_all(vec![comma, lp, rp]).chain(Reduction::promote_child(0)),
        );

        Self {
            set,
            lexer,
            parser,
            reducer,
        }
    }

    fn kind_name(&self, node: &ParseNode) -> String {
        self.set.name(node.kind())
    }

    fn eval_reduction(
        &self,
        target: &Rc<SymbolSet>,
        nodes: &[ParseNode],
    ) -> Option<Reduction> {
        let mut out: Option<Reduction> = None;
        let push = |r: Reduction, out: &mut Option<Reduction>| {
            *out = Some(match out.take() {
                Some(existing) => existing.chain(r),
                None => r,
            });
        };
        for node in nodes {
            let reduction = match self.kind_name(node).as_str() {
                "PromoteSingleChild" => Reduction::promote_single_child(),
                "RemoveChildren" => Reduction::remove_children(eval_num_args(&node.children[0])),
                "PromoteChildValue" => Reduction::promote_child_value(eval_one_num(&node.children[0])),
                "RemoveChild" => Reduction::remove_child(eval_one_num(&node.children[0])),
                "ReplaceWithChild" => Reduction::replace_with_child(eval_one_num(&node.children[0])),
                "PromoteGrandChildren" => Reduction::promote_grand_children(),
                "PromoteChildrenOf" => Reduction::promote_children_of(eval_one_num(&node.children[0])),
                "PromoteChild" => Reduction::promote_child(eval_one_num(&node.children[0])),
                "RemoveAll" => {
                    let symbols = node.children[0]
                        .children
                        .iter()
                        .map(|n| target.intern(&eval_str(n.value())))
                        .collect();
                    Reduction::remove_all(symbols)
                }
                "If" => {
                    let condition = self.eval_condition(target, &node.children[0]);
                    let then = self.eval_reduction(target, &node.children[1].children);
                    let otherwise = self.eval_reduction(target, &node.children[2].children);
                    Reduction::when(condition, then, otherwise)
                }
                _ => continue, // Nil
            };
            push(reduction, &mut out);
        }
        out
    }

    fn eval_condition(&self, target: &Rc<SymbolSet>, node: &ParseNode) -> Condition {
        // ChildIs is the only condition so far
        let c_idx = eval_num(&node.children[0]);
        let kind = target.intern(&eval_str(node.children[1].value()));
        Condition::child_is(c_idx, kind)
    }
}

fn eval_num(node: &ParseNode) -> isize {
    node.value().parse().unwrap_or(0)
}

fn eval_one_num(node: &ParseNode) -> isize {
    node.children.first().map_or(0, eval_num)
}

fn eval_num_args(node: &ParseNode) -> Vec<isize> {
    node.children.iter().map(eval_num).collect()
}

fn eval_str(value: &str) -> String {
    let inner = &value[1..value.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
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

impl Reducer {
    /// Parse a reducer from its DSL form. Each line names a node kind and the
    /// chain of reductions applied to it:
    ///
    /// ```text
    /// // strip wrappers, keep the operator on top
    /// E If(ChildIs(1, "op"), PromoteChild(1), PromoteSingleChild())
    /// P ReplaceWithChild(1)
    /// ```
    ///
    /// The DSL is lexed, parsed and reduced by the library's own pipeline; the
    /// resulting reducer is registered against `set`.
    pub fn parse(set: &Rc<SymbolSet>, text: &str) -> Result<Reducer, GrammarError> {
        let op = DslOp::new();

        let lexemes = op.lexer.lex(text);
        if let Some(err) = op.lexer.errors(&lexemes).first() {
            return Err(GrammarError::Malformed(format!(
                "reducer DSL: unexpected '{}' at {}",
                err.value, err.position
            )));
        }

        let tree = op
            .parser
            .parse(&lexemes)
            .ok_or_else(|| GrammarError::Malformed("reducer DSL does not parse".into()))?;
        let tree = op.reducer.reduce(&tree);

        let mut reducer = Reducer::new(set);
        let rule = op.set.intern("Rule");
        for node in &tree.children {
            if node.kind() == rule {
                if let Some(reduction) = op.eval_reduction(set, &node.children) {
                    reducer.add(node.value(), reduction);
                } else {
                    reducer.add(node.value(), Reduction::nil());
                }
            }
        }
        Ok(reducer)
    }
}
