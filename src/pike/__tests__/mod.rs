use crate::pike::Pike;

fn best(pattern: &str, input: &str) -> Option<usize> {
    Pike::new(pattern).unwrap().longest_match(input).map(|m| m.end)
}

#[test]
fn literal_match() {
    assert_eq!(best("cat", "cat"), Some(3));
    assert_eq!(best("cat", "ct"), None);
    assert_eq!(best("cat", "cot"), None);
    assert_eq!(best("cat", "caot"), None);
    // anchored prefix match; trailing input is not consumed
    assert_eq!(best("cat", "cattle"), Some(3));
}

#[test]
fn any_rune() {
    assert_eq!(best("c.t", "cat"), Some(3));
    assert_eq!(best("c.t", "cot"), Some(3));
    assert_eq!(best("c.t", "ct"), None);
    assert_eq!(best("c.t", "caot"), None);
}

#[test]
fn kleene_star() {
    assert_eq!(best("ca*t", "ct"), Some(2));
    assert_eq!(best("ca*t", "cat"), Some(3));
    assert_eq!(best("ca*t", "caaat"), Some(5));
    assert_eq!(best("ca*t", "aaat"), None);
}

#[test]
fn one_or_more() {
    assert_eq!(best("ca+t", "ct"), None);
    assert_eq!(best("ca+t", "cat"), Some(3));
    assert_eq!(best("ca+t", "caaat"), Some(5));
}

#[test]
fn optional() {
    assert_eq!(best("ca?t", "ct"), Some(2));
    assert_eq!(best("ca?t", "cat"), Some(3));
    assert_eq!(best("ca?t", "caat"), None);
}

#[test]
fn alternation() {
    assert_eq!(best("ca|ot", "cat"), Some(3));
    assert_eq!(best("ca|ot", "cot"), Some(3));
    assert_eq!(best("ca|ot", "caot"), None);
}

#[test]
fn alternation_binds_looser_than_repetition() {
    // the {2,2} applies to "b", not to "a|b"
    assert_eq!(best("a|b{2,2}", "a"), Some(1));
    assert_eq!(best("a|b{2,2}", "bb"), Some(2));
    assert_eq!(best("a|b{2,2}", "ba"), None);
}

#[test]
fn bounded_repetition() {
    assert_eq!(best("ca{2,3}t", "cat"), None);
    assert_eq!(best("ca{2,3}t", "caat"), Some(4));
    assert_eq!(best("ca{2,3}t", "caaat"), Some(5));
    assert_eq!(best("ca{2,3}t", "caaaat"), None);

    assert_eq!(best("ca{,3}t", "cat"), Some(3));
    assert_eq!(best("ca{,3}t", "caat"), Some(4));
    assert_eq!(best("ca{,3}t", "caaat"), Some(5));
    assert_eq!(best("ca{,3}t", "caaaat"), None);

    assert_eq!(best("ca{3,}t", "cat"), None);
    assert_eq!(best("ca{3,}t", "caat"), None);
    assert_eq!(best("ca{3,}t", "caaat"), Some(5));
    assert_eq!(best("ca{3,}t", "caaaat"), Some(6));
}

#[test]
fn nested_bounded_repetition() {
    let re = Pike::new("c(a*|o{2,3}){1,2}t").unwrap();
    assert!(re.longest_match("caaat").is_some());
    assert!(re.longest_match("coot").is_some());
    assert!(re.longest_match("cooaat").is_some());
    assert!(re.longest_match("cot").is_none());
}

#[test]
fn groups() {
    let re = Pike::new("c(a*|o)t").unwrap();

    let m = re.longest_match("cat").unwrap();
    assert_eq!(m.end, 3);
    assert_eq!(m.group(1), Some(&[(1, 2)][..]));

    let m = re.longest_match("cot").unwrap();
    assert_eq!(m.end, 3);
    assert_eq!(m.group(1), Some(&[(1, 2)][..]));

    let m = re.longest_match("caaat").unwrap();
    assert_eq!(m.end, 5);
    assert_eq!(m.group(1), Some(&[(1, 4)][..]));

    assert!(re.longest_match("dog").is_none());
}

#[test]
fn repeated_group_captures_every_pass() {
    let re = Pike::new("(ab)+").unwrap();
    let m = re.longest_match("ababab").unwrap();
    assert_eq!(m.end, 6);
    assert_eq!(m.group(1), Some(&[(0, 2), (2, 4), (4, 6)][..]));
}

#[test]
fn classes() {
    assert_eq!(best(r"[a-z]+", "abz9"), Some(3));
    assert_eq!(best(r"[a-z0-9]+", "abz9"), Some(4));
    assert_eq!(best(r"[^a-z]", "A"), Some(1));
    assert_eq!(best(r"[^a-z]", "a"), None);
    assert_eq!(best(r"\d+", "123x"), Some(3));
    assert_eq!(best(r"\w+", "snake_case rest"), Some(10));
    assert_eq!(best(r"\s+", " \t\n x"), Some(4));
    assert_eq!(best(r"[\d,]+", "1,2x"), Some(3));
    assert_eq!(best(r"\S+", "ab cd"), Some(2));
}

#[test]
fn escapes() {
    assert_eq!(best(r"a\.b", "a.b"), Some(3));
    assert_eq!(best(r"a\.b", "axb"), None);
    assert_eq!(best(r"a\\b", "a\\b"), Some(3));
    assert_eq!(best(r"a\nb", "a\nb"), Some(3));
    assert_eq!(best(r"\(\)", "()"), Some(2));
}

#[test]
fn empty_pattern_accepts_at_zero() {
    assert_eq!(best("", "anything"), Some(0));
    assert_eq!(best("", ""), Some(0));
    assert_eq!(best("a*", "bbb"), Some(0));
}

#[test]
fn unicode_offsets_are_byte_offsets() {
    let re = Pike::new("(é)+").unwrap();
    let m = re.longest_match("ééx").unwrap();
    assert_eq!(m.end, 4);
    assert_eq!(m.group(1), Some(&[(0, 2), (2, 4)][..]));
}

#[test]
fn pathological_star_terminates() {
    // star over a nullable body must not loop
    assert_eq!(best("(a*)*b", "aaab"), Some(4));
    assert_eq!(best("(a*)*", "aaaa"), Some(4));
    assert_eq!(best("(|a)*b", "ab"), Some(2));
}

#[test]
fn bad_patterns() {
    assert!(Pike::new("a{2}t").is_err());
    assert!(Pike::new("(ab").is_err());
    assert!(Pike::new("ab)").is_err());
    assert!(Pike::new("[ab").is_err());
    assert!(Pike::new("*a").is_err());
    assert!(Pike::new(r"a\").is_err());
    assert!(Pike::new("[z-a]").is_err());
}

#[test]
fn listing_resolves_targets() {
    let re = Pike::new("c(a*|o)t").unwrap();
    let listing = format!("{}", re);
    assert!(listing.contains("match 'c'"));
    assert!(listing.contains("branch"));
    assert!(listing.contains("groupS 1"));
    assert!(listing.contains("accept"));
    // every jump target resolves to a numbered line or the implicit end
    for line in listing.lines() {
        assert!(!line.contains("jump ?"));
    }
}
