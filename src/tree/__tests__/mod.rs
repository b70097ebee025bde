use crate::symbol::SymbolSet;
use crate::tree::{Condition, ParseNode, Reducer, Reduction};
use std::rc::Rc;

fn build(set: &Rc<SymbolSet>, literal: &str) -> ParseNode {
    ParseNode::build(set, literal).unwrap()
}

#[test]
fn literal_round_trip() {
    let set = Rc::new(SymbolSet::new());
    let tree = build(
        &set,
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
      }
    }
  ",
    );
    assert_eq!(tree.children.len(), 3);
    assert_eq!(tree.children[1].value(), "+");

    let rebuilt = build(&set, &tree.fmt(&set));
    assert_eq!(tree, rebuilt);
}

#[test]
fn literal_rejects_bad_input() {
    let set = Rc::new(SymbolSet::new());
    assert!(ParseNode::build(&set, "E {").is_err());
    assert!(ParseNode::build(&set, "}").is_err());
    assert!(ParseNode::build(&set, "").is_err());
}

#[test]
fn navigation() {
    let set = Rc::new(SymbolSet::new());
    let tree = build(
        &set,
        r"
    E {
      int: '1'
      op: '+'
      int: '2'
    }
  ",
    );
    let (int, op, missing) = (set.intern("int"), set.intern("op"), set.intern("zzz"));

    assert_eq!(tree.get_idx(0), Some(0));
    assert_eq!(tree.get_idx(-1), Some(2));
    assert_eq!(tree.get_idx(-3), Some(0));
    assert_eq!(tree.get_idx(3), None);
    assert_eq!(tree.get_idx(-4), None);

    assert!(tree.child_is(0, int));
    assert!(tree.child_is(1, op));
    assert!(tree.child_is(-1, int));
    assert!(!tree.child_is(0, op));
    assert!(!tree.child_is(9, int));

    assert!(tree.contains(op));
    assert!(!tree.contains(missing));
    assert_eq!(tree.size(), 4);
    assert_eq!(tree.find(int).unwrap().value(), "1");
}

#[test]
fn structural_operations() {
    let set = Rc::new(SymbolSet::new());
    let comma = set.intern("comma");

    let mut tree = build(
        &set,
        r"
    L {
      lp: '('
      int: '1'
      comma: ','
      int: '2'
      comma: ','
      int: '3'
      rp: ')'
    }
  ",
    );
    tree.remove_children(&[0, -1]);
    tree.remove_all(&[comma]);
    assert_eq!(tree.fmt(&set), build(&set, "L { int:'1' int:'2' int:'3' }").fmt(&set));

    let mut tree = build(&set, "P { lp:'(' E { int:'1' } rp:')' }");
    assert!(tree.replace_with_child(1));
    assert_eq!(tree.fmt(&set), build(&set, "E { int:'1' }").fmt(&set));

    let mut tree = build(&set, "E { A { x:'x' } op:'+' B { y:'y' } }");
    assert!(tree.promote_child(1));
    assert_eq!(
        tree.fmt(&set),
        build(&set, "op: '+' { A { x:'x' } B { y:'y' } }").fmt(&set)
    );

    let mut tree = build(&set, "E { A { x:'1' x:'2' } B { y:'3' } }");
    tree.promote_grand_children();
    assert_eq!(tree.fmt(&set), build(&set, "E { x:'1' x:'2' y:'3' }").fmt(&set));

    let mut tree = build(&set, "E { A { x:'1' x:'2' } B { y:'3' } }");
    assert!(tree.promote_children_of(0));
    assert_eq!(
        tree.fmt(&set),
        build(&set, "E { x:'1' x:'2' B { y:'3' } }").fmt(&set)
    );

    let mut tree = build(&set, "E { int:'7' }");
    tree.promote_child_value(0);
    assert_eq!(tree.value(), "7");
    assert!(tree.children.is_empty());
    assert_eq!(set.name(tree.kind()), "E");

    // out of bounds indices take no action
    let mut tree = build(&set, "E { int:'7' }");
    assert!(!tree.remove_child(5));
    assert!(!tree.promote_child(-2));
    assert_eq!(tree.fmt(&set), build(&set, "E { int:'7' }").fmt(&set));

    // two children is not a single child
    let mut tree = build(&set, "E { int:'1' int:'2' }");
    assert!(!tree.promote_single_child());
    assert_eq!(tree.children.len(), 2);
}

#[test]
fn reduce_expression_tree() {
    let set = Rc::new(SymbolSet::new());
    let tree = build(
        &set,
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

    let mut reducer = Reducer::new(&set);
    reducer.add("T", Reduction::promote_single_child());
    reducer.add("E", Reduction::promote_single_child());
    reducer.add("P", Reduction::promote_child(1));

    let reduced = reducer.reduce(&tree);
    let expected = build(
        &set,
        r"
    E {
      E {
        (: '('
        int: '1'
        op: '+'
        int: '2'
        ): ')'
      }
      op: '*'
      int: '3'
    }
  ",
    );
    assert_eq!(reduced.fmt(&set), expected.fmt(&set));

    // the input tree is untouched and the reduction is idempotent
    assert_eq!(set.name(tree.children[0].kind()), "T");
    let twice = reducer.reduce(&reduced);
    assert_eq!(twice.fmt(&set), reduced.fmt(&set));
}

#[test]
fn conditional_reduction() {
    let set = Rc::new(SymbolSet::new());
    let op = set.intern("op");

    let mut reducer = Reducer::new(&set);
    reducer.add(
        "E",
        Reduction::when(
            Condition::child_is(1, op),
            Some(Reduction::promote_child(1)),
            Some(Reduction::promote_single_child()),
        ),
    );

    let with_op = build(&set, "E { int:'1' op:'+' int:'2' }");
    let reduced = reducer.reduce(&with_op);
    assert_eq!(reduced.value(), "+");
    assert_eq!(reduced.children.len(), 2);

    let single = build(&set, "E { int:'9' }");
    let reduced = reducer.reduce(&single);
    assert_eq!(set.name(reduced.kind()), "int");
    assert_eq!(reduced.value(), "9");
}

#[test]
fn merge_chains_overlapping_kinds() {
    let set = Rc::new(SymbolSet::new());

    let mut first = Reducer::new(&set);
    first.add("E", Reduction::remove_child(0));
    first.add("A", Reduction::promote_single_child());

    let mut second = Reducer::new(&set);
    second.add("E", Reduction::remove_child(0));
    second.add("B", Reduction::promote_single_child());

    let merged = Reducer::merge(&first, &second);

    let tree = build(&set, "E { x:'1' x:'2' x:'3' }");
    let reduced = merged.reduce(&tree);
    assert_eq!(reduced.children.len(), 1);
    assert_eq!(reduced.children[0].value(), "3");

    assert!(merged.can(&build(&set, "A { x:'1' }")));
    assert!(merged.can(&build(&set, "B { x:'1' }")));
}

#[test]
fn dsl_matches_hand_built_reducer() {
    let set = Rc::new(SymbolSet::new());
    let tree = build(
        &set,
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

    let mut by_hand = Reducer::new(&set);
    by_hand.add("T", Reduction::promote_single_child());
    by_hand.add("E", Reduction::promote_single_child());
    by_hand.add("P", Reduction::promote_child(1));

    let parsed = Reducer::parse(
        &set,
        r"
    // strip the single child wrappers, then drop the parenthesis node
    T PromoteSingleChild()
    E PromoteSingleChild()
    P PromoteChild(1)
  ",
    )
    .unwrap();

    assert_eq!(
        by_hand.reduce(&tree).fmt(&set),
        parsed.reduce(&tree).fmt(&set)
    );
}

#[test]
fn dsl_chains_and_arguments() {
    let set = Rc::new(SymbolSet::new());
    let reducer = Reducer::parse(
        &set,
        r#"
    L RemoveChildren(0, -1). RemoveAll("comma")
  "#,
    )
    .unwrap();

    let tree = build(
        &set,
        r"
    L {
      lp: '('
      int: '1'
      comma: ','
      int: '2'
      rp: ')'
    }
  ",
    );
    let reduced = reducer.reduce(&tree);
    assert_eq!(
        reduced.fmt(&set),
        build(&set, "L { int:'1' int:'2' }").fmt(&set)
    );
}

#[test]
fn dsl_conditionals() {
    let set = Rc::new(SymbolSet::new());
    let reducer = Reducer::parse(
        &set,
        r#"
    E If(ChildIs(1, "op"), PromoteChild(1), PromoteSingleChild())
  "#,
    )
    .unwrap();

    let with_op = build(&set, "E { int:'1' op:'+' int:'2' }");
    assert_eq!(reducer.reduce(&with_op).value(), "+");

    let single = build(&set, "E { int:'9' }");
    assert_eq!(reducer.reduce(&single).value(), "9");
}

#[test]
fn dsl_nil_registers_a_noop() {
    let set = Rc::new(SymbolSet::new());
    let reducer = Reducer::parse(&set, "X Nil").unwrap();

    let tree = build(&set, "X { y:'1' }");
    assert!(reducer.can(&tree));
    assert_eq!(reducer.reduce(&tree).fmt(&set), tree.fmt(&set));
}

#[test]
fn dsl_rejects_garbage() {
    let set = Rc::new(SymbolSet::new());
    assert!(Reducer::parse(&set, "E PromoteChild(").is_err());
    assert!(Reducer::parse(&set, "E §§").is_err());
    assert!(Reducer::parse(&set, "PromoteChild(1)").is_err());
}
