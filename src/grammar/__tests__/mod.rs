use crate::grammar::{is_left_recursive, remove_left_recursion, Grammar};
use crate::symbol::SymbolSet;
use std::rc::Rc;

#[test]
fn grammar_string_round_trip() {
    let set = Rc::new(SymbolSet::new());
    let g1 = Grammar::parse(
        &set,
        "
    A -> B C
         x
    B -> y
    C -> z
  ",
    )
    .unwrap();

    let g2 = Grammar::parse(&set, &g1.to_string()).unwrap();
    assert_eq!(g1.to_string(), g2.to_string());
    assert!(g1 == g2);

    let a = set.intern("A");
    let x = set.intern("x");
    assert!(g1.productions(a).is_some());
    assert!(g1.productions(x).is_none());
    assert_eq!(
        g1.productions(a).unwrap().get(1).unwrap().first(),
        Some(x)
    );
}

#[test]
fn empty_production_parses() {
    let set = Rc::new(SymbolSet::new());
    let g = Grammar::parse(
        &set,
        "
    A   -> B C
           x
    B   -> Y
    C   -> z
        -> NIL
    Y   -> A
    NIL ->
  ",
    )
    .unwrap();

    let nil = set.get("NIL").unwrap();
    let nil_prods = g.productions(nil).unwrap();
    assert_eq!(nil_prods.len(), 1);
    assert_eq!(nil_prods.get(0).unwrap().len(), 0);
}

#[test]
fn double_arrow_is_malformed() {
    let set = Rc::new(SymbolSet::new());
    assert!(Grammar::parse(&set, "A -> b -> c").is_err());
}

#[test]
fn default_start_symbol() {
    let set = Rc::new(SymbolSet::new());
    let g = Grammar::parse(&set, "-> a b").unwrap();
    assert_eq!(g.start(), set.get("START"));
}

#[test]
fn analyse_firsts() {
    let set = Rc::new(SymbolSet::new());
    let g = Grammar::parse(
        &set,
        "
    AA -> B C
         x
    B -> y
    C -> z
  ",
    )
    .unwrap();

    let (aa, b, c) = (set.intern("AA"), set.intern("B"), set.intern("C"));
    let (x, y, z) = (set.intern("x"), set.intern("y"), set.intern("z"));

    assert_eq!(g.firsts(aa).len(), 2);
    assert_eq!(g.firsts(b).len(), 1);
    assert_eq!(g.firsts(c).len(), 1);

    assert!(g.has_first(aa, x));
    assert!(g.has_first(aa, y));
    assert!(!g.has_first(aa, z));
    assert!(!g.has_first(b, x));
    assert!(g.has_first(b, y));
    assert!(!g.has_first(b, z));
    assert!(!g.has_first(c, x));
    assert!(!g.has_first(c, y));
    assert!(g.has_first(c, z));

    // a terminal has itself as its only first
    assert!(g.has_first(x, x));
    assert!(!g.has_first(x, y));
}

#[test]
fn analyse_nullable_firsts() {
    let set = Rc::new(SymbolSet::new());
    let g = Grammar::parse(
        &set,
        "
    A -> B C
         x
    B -> y
      ->
    C -> z
  ",
    )
    .unwrap();

    let (a, b, c) = (set.intern("A"), set.intern("B"), set.intern("C"));
    let (x, y, z) = (set.intern("x"), set.intern("y"), set.intern("z"));

    // with B nullable, the firsts of C leak into A
    assert!(g.has_first(a, x));
    assert!(g.has_first(a, y));
    assert!(g.has_first(a, z));

    assert!(g.nil_in_first(a));
    assert!(g.nil_in_first(b));
    assert!(!g.nil_in_first(c));

    assert_eq!(g.firsts(x), Vec::new());
}

#[test]
fn left_recursion_detection() {
    let set = Rc::new(SymbolSet::new());
    let g = Grammar::parse(
        &set,
        "
    A -> B C
      -> x
    B -> y
      -> w
    C -> z
      -> A
  ",
    )
    .unwrap();
    assert!(!is_left_recursive(&g));

    let g = Grammar::parse(
        &set,
        "
    A -> B C
      -> x
    B -> Y
    C -> z
    Y -> A
  ",
    )
    .unwrap();
    assert!(is_left_recursive(&g));

    // left recursion reached through a nullable leftmost sibling
    let g = Grammar::parse(
        &set,
        "
    A -> B C
      -> x
    B -> w
      ->
    C -> A
      -> a
  ",
    )
    .unwrap();
    assert!(is_left_recursive(&g));
}

#[test]
fn direct_left_recursion_removal() {
    let set = Rc::new(SymbolSet::new());
    let g = Grammar::parse(
        &set,
        "
    E -> E op E
      -> ( E )
      -> int
  ",
    )
    .unwrap();
    assert!(is_left_recursive(&g));

    let no_recur = remove_left_recursion(&g);
    let expected = Grammar::parse(
        &set,
        "
    E  -> ( E ) E'
       -> int E'
    E' -> op E E'
       ->
  ",
    )
    .unwrap();
    assert_eq!(expected.to_string(), no_recur.to_string());
    assert!(!is_left_recursive(&no_recur));
}

#[test]
fn indirect_left_recursion_removal() {
    let set = Rc::new(SymbolSet::new());
    let g = Grammar::parse(
        &set,
        "
    A -> B C
    B -> x
      ->
    C -> A
      -> y
  ",
    )
    .unwrap();
    assert!(is_left_recursive(&g));

    let no_recur = remove_left_recursion(&g);
    let expected = Grammar::parse(
        &set,
        "
    A  -> B C
    B  -> x
       ->
    C  -> x C C'
       -> y C'
    C' ->
    ",
    )
    .unwrap();
    assert_eq!(expected.to_string(), no_recur.to_string());
    assert!(!is_left_recursive(&no_recur));
}

#[test]
fn self_production_removal() {
    let set = Rc::new(SymbolSet::new());
    let g = Grammar::parse(&set, "A -> A").unwrap();
    let no_recur = remove_left_recursion(&g);

    let a = set.intern("A");
    let a1 = set.intern("A'");
    assert_eq!(no_recur.productions(a).unwrap().len(), 0);
    let tail = no_recur.productions(a1).unwrap();
    assert_eq!(tail.len(), 1);
    assert!(tail.get(0).unwrap().is_empty());
}

#[test]
fn fresh_symbol_avoids_collision() {
    let set = Rc::new(SymbolSet::new());
    let g = Grammar::parse(
        &set,
        "
    E  -> E op E
       -> int
    E' -> x
  ",
    )
    .unwrap();
    let no_recur = remove_left_recursion(&g);
    // E' is taken by the grammar; the fresh tail symbol gets a second apostrophe
    let e2 = set.get("E''").unwrap();
    assert!(no_recur.productions(e2).is_some());
    assert!(!is_left_recursive(&no_recur));
}
