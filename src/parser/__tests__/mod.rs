use crate::grammar::Grammar;
use crate::lexer::StackLexer;
use crate::parser::{Packrat, TopDown};
use crate::symbol::SymbolSet;
use crate::tree::ParseNode;
use crate::{GrammarError, ILexer, IParser};
use std::rc::Rc;

fn math_lexer(set: &Rc<SymbolSet>) -> StackLexer {
    StackLexer::new(
        set,
        r#"
    == main ==
      ( /\(/
      ) /\)/
      op /[+\-*\/]/
      int /\d+/
      space /\s+/ -
  "#,
    )
    .unwrap()
}

fn keep_space_lexer(set: &Rc<SymbolSet>) -> StackLexer {
    StackLexer::new(
        set,
        r#"
    == main ==
      ( /\(/
      ) /\)/
      op /[+\-*\/]/
      int /\d+/
      space /\s+/
  "#,
    )
    .unwrap()
}

fn expect_tree(set: &Rc<SymbolSet>, tree: &ParseNode, literal: &str) {
    let expected = ParseNode::build(set, literal).unwrap();
    assert_eq!(expected.fmt(set), tree.fmt(set));
}

#[test]
fn topdown_right_recursive_expression() {
    let set = Rc::new(SymbolSet::new());
    let lexer = math_lexer(&set);
    let grammar = Rc::new(
        Grammar::parse(
            &set,
            "
    E -> T op E
      -> T
    T -> ( E )
      -> int
  ",
        )
        .unwrap(),
    );

    let parser = TopDown::new(grammar).unwrap();
    let tree = parser.parse(&lexer.lex("1+2+3")).unwrap();
    expect_tree(
        &set,
        &tree,
        r"
        E {
          T {
            int: '1'
          }
          op: '+'
          E {
            T {
              int: '2'
            }
            op: '+'
            E {
              T {
                int: '3'
              }
            }
          }
        }
      ",
    );
}

#[test]
fn topdown_parens() {
    let set = Rc::new(SymbolSet::new());
    let lexer = math_lexer(&set);
    let grammar = Rc::new(
        Grammar::parse(
            &set,
            "
    E -> T op E
      -> T
    T -> P
      -> int
    P -> ( E )
  ",
        )
        .unwrap(),
    );

    let parser = TopDown::new(grammar).unwrap();
    let tree = parser.parse(&lexer.lex("(1+2)*3")).unwrap();

    let int = set.intern("int");
    let values: Vec<&str> = tree.leaves().iter().map(|l| l.value.as_str()).collect();
    assert_eq!(values, ["(", "1", "+", "2", ")", "*", "3"]);
    assert!(tree.contains(int));
}

#[test]
fn topdown_nullable_gaps() {
    let set = Rc::new(SymbolSet::new());
    let lexer = keep_space_lexer(&set);
    let grammar = Rc::new(
        Grammar::parse(
            &set,
            "
    E   -> T Gap op Gap E
        -> T
    T   -> P
        -> int
    P   -> ( Gap E Gap )
    Gap -> space Gap
        ->
  ",
        )
        .unwrap(),
    );

    let parser = TopDown::new(grammar).unwrap();
    assert!(parser.parse(&lexer.lex("( 1 + 2 )  *  3")).is_some());
}

#[test]
fn topdown_rejects_left_recursion() {
    let set = Rc::new(SymbolSet::new());
    let grammar = Rc::new(
        Grammar::parse(
            &set,
            "
    E -> E op E
      -> ( E )
      -> int
  ",
        )
        .unwrap(),
    );
    assert!(matches!(
        TopDown::new(grammar),
        Err(GrammarError::LeftRecursionNotSupported)
    ));
}

#[test]
fn topdown_rejects_partial_consumption() {
    let set = Rc::new(SymbolSet::new());
    let lexer = math_lexer(&set);
    let grammar = Rc::new(Grammar::parse(&set, "E -> int op int").unwrap());
    let parser = TopDown::new(grammar).unwrap();
    assert!(parser.parse(&lexer.lex("1+2")).is_some());
    assert!(parser.parse(&lexer.lex("1+2+3")).is_none());
    assert!(parser.parse(&lexer.lex("1+")).is_none());
}

#[test]
fn packrat_right_recursive_expression() {
    let set = Rc::new(SymbolSet::new());
    let lexer = math_lexer(&set);
    let grammar = Rc::new(
        Grammar::parse(
            &set,
            "
    E -> T op E
      -> T
    T -> ( E )
      -> int
  ",
        )
        .unwrap(),
    );

    let parser = Packrat::new(grammar);
    let tree = parser.parse(&lexer.lex("1+2+3")).unwrap();
    expect_tree(
        &set,
        &tree,
        r"
        E {
          T {
            int: '1'
          }
          op: '+'
          E {
            T {
              int: '2'
            }
            op: '+'
            E {
              T {
                int: '3'
              }
            }
          }
        }
      ",
    );
}

#[test]
fn packrat_parens() {
    let set = Rc::new(SymbolSet::new());
    let lexer = math_lexer(&set);
    let grammar = Rc::new(
        Grammar::parse(
            &set,
            "
    E -> T op E
      -> T
    T -> P
      -> int
    P -> ( E )
  ",
        )
        .unwrap(),
    );

    let parser = Packrat::new(grammar);
    let tree = parser.parse(&lexer.lex("(1+2)*3")).unwrap();
    tree.print(&set).unwrap();
    expect_tree(
        &set,
        &tree,
        r"
    E {
      T {
        P {
          (: '('
          E {
            T {
              int: '1'
            }
            op: '+'
            E {
              T {
                int: '2'
              }
            }
          }
          ): ')'
        }
      }
      op: '*'
      E {
        T {
          int: '3'
        }
      }
    }
  ",
    );
}

#[test]
fn packrat_left_recursive_expression() {
    let set = Rc::new(SymbolSet::new());
    let lexer = math_lexer(&set);
    let grammar = Rc::new(
        Grammar::parse(
            &set,
            "
    E -> E op E
      -> ( E )
      -> int
  ",
        )
        .unwrap(),
    );

    let parser = Packrat::new(grammar);
    let tree = parser.parse(&lexer.lex("5*(1+2)*3")).unwrap();
    expect_tree(
        &set,
        &tree,
        r"
    E {
      E {
        E {
          int: '5'
        }
        op: '*'
        E {
          (: '('
          E {
            E {
              int: '1'
            }
            op: '+'
            E {
              int: '2'
            }
          }
          ): ')'
        }
      }
      op: '*'
      E {
        int: '3'
      }
    }
  ",
    );
}

#[test]
fn packrat_cyclic_grammar_terminates() {
    let set = Rc::new(SymbolSet::new());
    let lexer = StackLexer::new(
        &set,
        r"
    == main ==
      + /\+/
      - /\-/
  ",
    )
    .unwrap();
    let grammar = Rc::new(
        Grammar::parse(
            &set,
            "
    A -> B +
      -> +
    B -> A A
      -> -
  ",
        )
        .unwrap(),
    );

    let parser = Packrat::new(grammar);
    let tree = parser.parse(&lexer.lex("+-++")).unwrap();
    expect_tree(
        &set,
        &tree,
        r"
    A {
      B {
        A {
          +: '+'
        }
        A {
          B {
            -: '-'
          }
          +: '+'
        }
      }
      +: '+'
    }
  ",
    );
}

#[test]
fn packrat_nullable_gaps() {
    let set = Rc::new(SymbolSet::new());
    let lexer = keep_space_lexer(&set);
    let grammar = Rc::new(
        Grammar::parse(
            &set,
            "
    E   -> E op E
        -> P
        -> int
        -> Gap E Gap
    P   -> ( E )
    Gap -> space
        ->
  ",
        )
        .unwrap(),
    );

    let parser = Packrat::new(grammar);
    let tree = parser.parse(&lexer.lex(" ( 1 + 2)  *  3 ")).unwrap();

    // the structure is pinned by the priority rules; spot check the leaves
    let values: Vec<String> = tree
        .leaves()
        .iter()
        .map(|l| l.value.clone())
        .filter(|v| !v.trim().is_empty())
        .collect();
    assert_eq!(values, ["(", "1", "+", "2", ")", "*", "3"]);
}

#[test]
fn packrat_priority_follows_grammar_order() {
    let set = Rc::new(SymbolSet::new());
    let lexer = math_lexer(&set);

    let left_first = Rc::new(
        Grammar::parse(
            &set,
            "
    E -> E op E
      -> int
  ",
        )
        .unwrap(),
    );
    let int_first = Rc::new(
        Grammar::parse(
            &set,
            "
    E -> int
      -> E op E
  ",
        )
        .unwrap(),
    );

    let lexemes = lexer.lex("1+2+3");

    // recursion first groups to the left
    let tree = Packrat::new(left_first).parse(&lexemes).unwrap();
    expect_tree(
        &set,
        &tree,
        r"
    E {
      E {
        E {
          int: '1'
        }
        op: '+'
        E {
          int: '2'
        }
      }
      op: '+'
      E {
        int: '3'
      }
    }
  ",
    );

    // the leaf production first groups to the right
    let tree = Packrat::new(int_first).parse(&lexemes).unwrap();
    expect_tree(
        &set,
        &tree,
        r"
    E {
      E {
        int: '1'
      }
      op: '+'
      E {
        E {
          int: '2'
        }
        op: '+'
        E {
          int: '3'
        }
      }
    }
  ",
    );
}

#[test]
fn parsers_agree_on_non_left_recursive_grammars() {
    let set = Rc::new(SymbolSet::new());
    let lexer = math_lexer(&set);
    let grammar = Rc::new(
        Grammar::parse(
            &set,
            "
    E -> T op E
      -> T
    T -> ( E )
      -> int
  ",
        )
        .unwrap(),
    );

    let topdown = TopDown::new(grammar.clone()).unwrap();
    let packrat = Packrat::new(grammar);

    for input in ["1", "1+2", "1+2*3", "(1+2)*3", "((1))"] {
        let lexemes = lexer.lex(input);
        let td = topdown.parse(&lexemes).unwrap();
        let pr = packrat.parse(&lexemes).unwrap();

        let td_leaves: Vec<&crate::Lexeme> = td.leaves();
        assert_eq!(td_leaves.len(), lexemes.len(), "leaves of '{}'", input);
        for (leaf, lexeme) in td_leaves.iter().zip(lexemes.iter()) {
            assert_eq!(**leaf, *lexeme);
        }
        assert_eq!(td.fmt(&set), pr.fmt(&set), "trees for '{}'", input);
    }

    for input in ["", "1+", "1 2", ")("] {
        let lexemes = lexer.lex(input);
        assert!(topdown.parse(&lexemes).is_none(), "topdown '{}'", input);
        assert!(packrat.parse(&lexemes).is_none(), "packrat '{}'", input);
    }
}

#[test]
fn removed_left_recursion_parses_the_same_language() {
    let set = Rc::new(SymbolSet::new());
    let lexer = math_lexer(&set);
    let grammar = Rc::new(
        Grammar::parse(
            &set,
            "
    E -> E op E
      -> ( E )
      -> int
  ",
        )
        .unwrap(),
    );
    let rewritten = Rc::new(crate::grammar::remove_left_recursion(&grammar));

    // the rewritten grammar is top down parseable
    let topdown = TopDown::new(rewritten).unwrap();
    let packrat = Packrat::new(grammar);

    for input in ["1", "1+2", "5*(1+2)*3", "((7))"] {
        let lexemes = lexer.lex(input);
        assert!(packrat.parse(&lexemes).is_some(), "packrat '{}'", input);
        assert!(topdown.parse(&lexemes).is_some(), "topdown '{}'", input);
    }
    for input in ["1+", "*1", "()"] {
        let lexemes = lexer.lex(input);
        assert!(packrat.parse(&lexemes).is_none(), "packrat '{}'", input);
        assert!(topdown.parse(&lexemes).is_none(), "topdown '{}'", input);
    }
}
