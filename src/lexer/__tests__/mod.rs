use crate::lexer::StackLexer;
use crate::symbol::SymbolSet;
use crate::util::Position;
use crate::{GrammarError, ILexer};
use std::rc::Rc;

const DEF: &str = r#"
    == main ==
      START innerLexer
      outerword  /\w+/
      shared
    == innerLexer ==
      STOP ^
      innerword  /\w+/
      shared
    == shared ==
      space /\s+/ -
  "#;

fn assert_stream(set: &Rc<SymbolSet>, lexemes: &[crate::Lexeme], expected: &[(&str, &str, usize, usize)]) {
    assert_eq!(lexemes.len(), expected.len(), "{:?}", lexemes);
    for (i, (kind, value, line, column)) in expected.iter().enumerate() {
        let lex = &lexemes[i];
        assert_eq!(set.name(lex.kind), *kind, "kind at {}", i);
        assert_eq!(lex.value, *value, "value at {}", i);
        assert_eq!(lex.position, Position::new(*line, *column), "position of '{}'", value);
    }
}

#[test]
fn push_and_pop() {
    let set = Rc::new(SymbolSet::new());
    let lexer = StackLexer::new(&set, DEF).unwrap();
    assert_eq!(lexer.sub_lexers(), ["main", "innerLexer", "shared"]);

    let lexemes = lexer.lex("this \n START is \n a STOP test");

    assert_stream(
        &set,
        &lexemes,
        &[
            ("outerword", "this", 1, 1),
            ("START", "START", 2, 2),
            ("innerword", "is", 2, 8),
            ("innerword", "a", 3, 2),
            ("STOP", "STOP", 3, 4),
            ("outerword", "test", 3, 9),
        ],
    );
}

#[test]
fn push_and_pop_by_priority() {
    let set = Rc::new(SymbolSet::new());
    let mut lexer = StackLexer::new(&set, DEF).unwrap();
    lexer.by_priority();
    let lexemes = lexer.lex("this \n START is \n a STOP test");

    assert_stream(
        &set,
        &lexemes,
        &[
            ("outerword", "this", 1, 1),
            ("START", "START", 2, 2),
            ("innerword", "is", 2, 8),
            ("innerword", "a", 3, 2),
            ("STOP", "STOP", 3, 4),
            ("outerword", "test", 3, 9),
        ],
    );
}

#[test]
fn capture_group_value() {
    let set = Rc::new(SymbolSet::new());
    let lexer = StackLexer::new(
        &set,
        r#"
    == main ==
      START innerLexer
      outerword  /\w+/
      shared
    == innerLexer ==
      STOP ^
      foo /foo\n(\w+)foo/ (1)
      innerword  /\w+/
      shared
    == shared ==
      space /\s+/ -
      nl /\n/ -
  "#,
    )
    .unwrap();
    let lexemes = lexer.lex("this \n START foo\nbarfoo is \n a STOP test");

    assert_stream(
        &set,
        &lexemes,
        &[
            ("outerword", "this", 1, 1),
            ("START", "START", 2, 2),
            ("foo", "bar", 2, 8),
            ("innerword", "is", 3, 8),
            ("innerword", "a", 4, 2),
            ("STOP", "STOP", 4, 4),
            ("outerword", "test", 4, 9),
        ],
    );
}

#[test]
fn literal_rules_and_longest_match() {
    let set = Rc::new(SymbolSet::new());
    let lexer = StackLexer::new(
        &set,
        r#"
    == main ==
      for
      word /\w+/
      space /\s+/ -
  "#,
    )
    .unwrap();

    // "for" and "fortune" disambiguate by length, "for" by priority on a tie
    let lexemes = lexer.lex("for fortune");
    assert_stream(
        &set,
        &lexemes,
        &[("for", "for", 1, 1), ("word", "fortune", 1, 5)],
    );
}

#[test]
fn error_regions_collapse() {
    let set = Rc::new(SymbolSet::new());
    let lexer = StackLexer::new(
        &set,
        r#"
    == main ==
      word /[a-z]+/
      space / +/ -
  "#,
    )
    .unwrap();

    let lexemes = lexer.lex("abc §§12 def ??");
    assert_eq!(set.name(lexer.error_kind()), "Error");
    let errors = lexer.errors(&lexemes);
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].value, "§§12");
    assert_eq!(errors[1].value, "??");

    assert_stream(
        &set,
        &lexemes,
        &[
            ("word", "abc", 1, 1),
            ("Error", "§§12", 1, 5),
            ("word", "def", 1, 10),
            ("Error", "??", 1, 14),
        ],
    );
}

#[test]
fn pop_past_bottom_errors_the_tail() {
    let set = Rc::new(SymbolSet::new());
    let lexer = StackLexer::new(
        &set,
        r#"
    == main ==
      out ^
      word /\w+/
      space / / -
  "#,
    )
    .unwrap();

    let lexemes = lexer.lex("a out rest here");
    assert_stream(
        &set,
        &lexemes,
        &[
            ("word", "a", 1, 1),
            ("out", "out", 1, 3),
            ("Error", " rest here", 1, 6),
        ],
    );
}

#[test]
fn multi_level_pop() {
    let set = Rc::new(SymbolSet::new());
    let lexer = StackLexer::new(
        &set,
        r#"
    == a ==
      down b
      aw /x+/
      space / / -
    == b ==
      deeper c
      bw /y+/
      space / / -
    == c ==
      up2 ^^
      cw /z+/
      space / / -
  "#,
    )
    .unwrap();

    let lexemes = lexer.lex("x down y deeper z up2 x");
    let kinds: Vec<String> = lexemes.iter().map(|l| set.name(l.kind)).collect();
    assert_eq!(kinds, ["aw", "down", "bw", "deeper", "cw", "up2", "aw"]);
}

#[test]
fn inheritance_sees_later_parent_rules() {
    // "shared" gains its rules after "main" declared the inheritance edge
    let set = Rc::new(SymbolSet::new());
    let lexer = StackLexer::new(
        &set,
        r#"
    == main ==
      shared
      word /\w+/
    == shared ==
      num /\d+/
      space /\s+/ -
  "#,
    )
    .unwrap();

    let lexemes = lexer.lex("a 12 b");
    let kinds: Vec<String> = lexemes.iter().map(|l| set.name(l.kind)).collect();
    assert_eq!(kinds, ["word", "num", "word"]);
}

#[test]
fn cyclic_inheritance_is_rejected() {
    let set = Rc::new(SymbolSet::new());
    let err = StackLexer::new(
        &set,
        r#"
    == a ==
      b
      aw /x/
    == b ==
      a
      bw /y/
  "#,
    )
    .unwrap_err();
    assert!(matches!(err, GrammarError::CyclicInheritance(_)));
}

#[test]
fn duplicate_kind_is_rejected() {
    let set = Rc::new(SymbolSet::new());
    let err = StackLexer::new(
        &set,
        r#"
    == main ==
      word /\w+/
      word /[a-z]+/
  "#,
    )
    .unwrap_err();
    assert_eq!(err, GrammarError::DuplicateKind("word".into()));
}

#[test]
fn unknown_push_target_is_rejected() {
    let set = Rc::new(SymbolSet::new());
    let err = StackLexer::new(
        &set,
        r#"
    == main ==
      word /\w+/ nowhere
  "#,
    )
    .unwrap_err();
    assert_eq!(err, GrammarError::UnknownSubLexer("nowhere".into()));
}

#[test]
fn nullable_pattern_is_rejected() {
    let set = Rc::new(SymbolSet::new());
    let err = StackLexer::new(
        &set,
        r#"
    == main ==
      word /a*/
  "#,
    )
    .unwrap_err();
    assert!(matches!(err, GrammarError::BadPattern(_)));
}
