use crate::dfa::{CompileError, Dfa};
use crate::parser;
use crate::regex::class::ClassSet;
use crate::regex::deriv::{class_partitions, derivative, nullable, CaptureEdit};
use crate::regex::{Regex, Term};
use ::regex::Regex as LibRegex;
use proptest::prelude::*;
use rand::prelude::*;
use rand::Rng;
use std::sync::Arc;

fn compile(pattern: &str) -> Dfa {
    Regex::from(parser::regex(pattern).unwrap())
        .compile()
        .unwrap()
}

fn chr(c: char) -> Arc<Term> {
    Term::class(ClassSet::single(c))
}

#[test]
fn group_in_anchored_match() {
    let dfa = compile("(a|b)c");
    let m = dfa.match_anchored("ac").unwrap();
    assert_eq!(m.span(), (0, 2));
    assert_eq!(m.group(0), Some((0, 2)));
    assert_eq!(m.group(1), Some((0, 1)));

    let m = dfa.match_anchored("bc").unwrap();
    assert_eq!(m.group(1), Some((0, 1)));

    assert!(dfa.match_anchored("cc").is_none());
    assert!(dfa.match_anchored("").is_none());
}

#[test]
fn group_in_scan() {
    let dfa = compile("(a|b)c");
    let all = dfa.search_all("xxbcxx");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].span(), (2, 4));
    assert_eq!(all[0].group(0), Some((2, 4)));
    assert_eq!(all[0].group(1), Some((2, 3)));
}

#[test]
fn longest_prefix_wins() {
    let dfa = compile("a*");
    let m = dfa.match_anchored("aaa").unwrap();
    assert_eq!(m.span(), (0, 3));
    assert_eq!(m.group_count(), 0);

    let dfa = compile("a|ab|abc");
    assert_eq!(dfa.match_anchored("abcd").unwrap().span(), (0, 3));
    assert_eq!(dfa.match_anchored("abd").unwrap().span(), (0, 2));
    assert_eq!(dfa.match_anchored("ad").unwrap().span(), (0, 1));
}

#[test]
fn intersection_with_complement() {
    let dfa = compile(".*&~.*bad.*");
    let m = dfa.match_anchored("good things").unwrap();
    assert_eq!(m.span(), (0, 11));
    // The longest prefix not containing "bad" stops just before the 'd'
    let m = dfa.match_anchored("some bad thing").unwrap();
    assert_eq!(m.span(), (0, 7));
}

#[test]
fn star_capture_keeps_last_iteration() {
    let dfa = compile("(x)*");
    let m = dfa.match_anchored("xxx").unwrap();
    assert_eq!(m.span(), (0, 3));
    assert_eq!(m.group(1), Some((2, 3)));

    let dfa = compile("(ab)*");
    let m = dfa.match_anchored("abab").unwrap();
    assert_eq!(m.span(), (0, 4));
    assert_eq!(m.group(1), Some((2, 4)));
}

#[test]
fn failed_scan_is_none() {
    let dfa = compile("a+");
    assert!(dfa.search("bbb").is_none());
    assert!(dfa.search_all("bbb").is_empty());
}

#[test]
fn scan_returns_leftmost_match() {
    let dfa = compile("(a|b)c");
    let m = dfa.search("zzacbc").unwrap();
    assert_eq!(m.span(), (2, 4));
    assert_eq!(m.group(1), Some((2, 3)));
}

#[test]
fn multi_char_group_keeps_entry_position() {
    let dfa = compile("(ab)c");
    let m = dfa.match_anchored("abc").unwrap();
    assert_eq!(m.span(), (0, 3));
    assert_eq!(m.group(1), Some((0, 2)));
}

#[test]
fn nested_groups() {
    let dfa = compile("((a)b)c");
    let m = dfa.match_anchored("abc").unwrap();
    assert_eq!(m.span(), (0, 3));
    assert_eq!(m.group(1), Some((0, 2)));
    assert_eq!(m.group(2), Some((0, 1)));
}

#[test]
fn group_under_alternation() {
    let dfa = compile("(a|bc)d");
    let m = dfa.match_anchored("bcd").unwrap();
    assert_eq!(m.group(1), Some((0, 2)));
    let m = dfa.match_anchored("ad").unwrap();
    assert_eq!(m.group(1), Some((0, 1)));
}

#[test]
fn unmatched_group_is_absent() {
    let dfa = compile("(a)?b");
    let m = dfa.match_anchored("b").unwrap();
    assert_eq!(m.span(), (0, 1));
    assert_eq!(m.group(1), None);
    // Out-of-range group indices are absent too
    assert_eq!(m.group(7), None);

    let m = dfa.match_anchored("ab").unwrap();
    assert_eq!(m.span(), (0, 2));
    assert_eq!(m.group(1), Some((0, 1)));
}

#[test]
fn scan_all_collects_disjoint_matches() {
    let dfa = compile("a");
    let spans: Vec<_> = dfa.search_all("aa").iter().map(|m| m.span()).collect();
    assert_eq!(spans, vec![(0, 1), (1, 2)]);

    let dfa = compile("ab?");
    let spans: Vec<_> = dfa.search_all("abaab").iter().map(|m| m.span()).collect();
    assert_eq!(spans, vec![(0, 2), (2, 3), (3, 5)]);
}

#[test]
fn empty_matches_make_progress() {
    let dfa = compile("a*");
    let spans: Vec<_> = dfa.search_all("baa").iter().map(|m| m.span()).collect();
    assert_eq!(spans, vec![(0, 0), (1, 3), (3, 3)]);

    // An empty match at the very end of the input is reported once
    let spans: Vec<_> = dfa.search_all("").iter().map(|m| m.span()).collect();
    assert_eq!(spans, vec![(0, 0)]);
}

#[test]
fn offsets_are_byte_offsets() {
    let dfa = compile("é+");
    let m = dfa.match_anchored("ééé").unwrap();
    assert_eq!(m.span(), (0, 6));

    let dfa = compile("(ä)b");
    let m = dfa.search("xäb").unwrap();
    assert_eq!(m.span(), (1, 4));
    assert_eq!(m.group(1), Some((1, 3)));
}

#[test]
fn character_classes() {
    let dfa = compile("[a-c]+");
    assert_eq!(dfa.match_anchored("abcd").unwrap().span(), (0, 3));

    let dfa = compile("[^a]+");
    assert_eq!(dfa.match_anchored("bca").unwrap().span(), (0, 2));
    assert!(dfa.match_anchored("a").is_none());

    let dfa = compile("[-a]+");
    assert_eq!(dfa.match_anchored("a-a").unwrap().span(), (0, 3));
}

#[test]
fn dot_matches_any_character() {
    let dfa = compile(".");
    assert_eq!(dfa.match_anchored("x").unwrap().span(), (0, 1));
    assert_eq!(dfa.match_anchored("\n").unwrap().span(), (0, 1));
    assert!(dfa.match_anchored("").is_none());
}

#[test]
fn escaped_metacharacters() {
    let dfa = compile(r"\*+");
    assert_eq!(dfa.match_anchored("***").unwrap().span(), (0, 3));

    let dfa = compile(r"a\nb");
    assert_eq!(dfa.match_anchored("a\nb").unwrap().span(), (0, 3));
}

#[test]
fn complement_alone() {
    // ~a matches everything but exactly "a", including the empty string
    let dfa = compile("~a");
    assert_eq!(dfa.match_anchored("b").unwrap().span(), (0, 1));
    assert_eq!(dfa.match_anchored("a").unwrap().span(), (0, 0));
    assert_eq!(dfa.match_anchored("ab").unwrap().span(), (0, 2));
}

#[test]
fn intersection_drops_excluded_prefixes() {
    // Strings of a:s and b:s that don't start with b
    let dfa = compile("(a|b)*&~b.*");
    assert_eq!(dfa.match_anchored("ab").unwrap().span(), (0, 2));
    assert_eq!(dfa.match_anchored("ba").unwrap().span(), (0, 0));
}

#[test]
fn syntax_errors() {
    assert!(parser::regex("a|*").is_err());
    assert!(parser::regex("(a").is_err());
    assert!(parser::regex("a)").is_err());
    assert!(parser::regex("[]").is_err());
    assert!(parser::regex("[z-a]").is_err());
    assert!(parser::regex("").is_err());
    assert!(parser::regex("a||b").is_err());
}

#[test]
fn group_numbering_is_source_order() {
    let regex = Regex::from(parser::regex("((a)(b))(c)").unwrap());
    assert_eq!(regex.group_count(), 4);
    let dfa = regex.compile().unwrap();
    let m = dfa.match_anchored("abc").unwrap();
    assert_eq!(m.group(1), Some((0, 2)));
    assert_eq!(m.group(2), Some((0, 1)));
    assert_eq!(m.group(3), Some((1, 2)));
    assert_eq!(m.group(4), Some((2, 3)));
}

#[test]
fn open_precedes_close_on_single_step_completion() {
    let dfa = compile("(a)");
    let transition = dfa.states()[dfa.initial_state_index()]
        .transitions()
        .iter()
        .find(|t| t.class().contains('a'))
        .unwrap();
    assert_eq!(
        transition.edits(),
        [CaptureEdit::Open(1), CaptureEdit::Close(1)]
    );
}

#[test]
fn smart_constructor_identities() {
    let a = chr('a');
    let b = chr('b');

    // Concatenation: ∅ annihilates, ε is the unit, association is to the right
    assert_eq!(Term::cat(Term::empty(), a.clone()), Term::empty());
    assert_eq!(Term::cat(a.clone(), Term::empty()), Term::empty());
    assert_eq!(Term::cat(Term::epsilon(), a.clone()), a);
    assert_eq!(Term::cat(a.clone(), Term::epsilon()), a);
    assert_eq!(
        Term::cat(Term::cat(a.clone(), b.clone()), chr('c')),
        Term::cat(a.clone(), Term::cat(b.clone(), chr('c')))
    );

    // Alternation: ∅ is the unit, idempotent, commutative after sorting
    assert_eq!(Term::alt(vec![a.clone(), Term::empty()]), a);
    assert_eq!(Term::alt(vec![a.clone(), a.clone()]), a);
    assert_eq!(
        Term::alt(vec![a.clone(), b.clone()]),
        Term::alt(vec![b.clone(), a.clone()])
    );
    assert_eq!(
        Term::alt(vec![Term::alt(vec![a.clone(), b.clone()]), chr('c')]),
        Term::alt(vec![a.clone(), Term::alt(vec![b.clone(), chr('c')])])
    );

    // Intersection: ∅ annihilates, Σ* is the unit, idempotent
    assert_eq!(Term::and(vec![a.clone(), Term::empty()]), Term::empty());
    assert_eq!(Term::and(vec![Term::universal(), a.clone()]), a);
    assert_eq!(Term::and(vec![a.clone(), a.clone()]), a);

    // Complement is an involution
    assert_eq!(Term::not(Term::not(a.clone())), a);

    // Closure: ∅* = ε* = ε, and stars collapse
    assert_eq!(Term::star(Term::empty()), Term::epsilon());
    assert_eq!(Term::star(Term::epsilon()), Term::epsilon());
    assert_eq!(
        Term::star(Term::star(a.clone())),
        Term::star(a.clone())
    );

    // An empty class is the empty language
    assert_eq!(Term::class(ClassSet::empty()), Term::empty());

    // Groups are never simplified away
    assert_ne!(Term::group(1, a.clone()), a);
}

#[test]
fn nullability() {
    let a = chr('a');
    assert!(!nullable(&Term::empty()));
    assert!(nullable(&Term::epsilon()));
    assert!(!nullable(&a));
    assert!(nullable(&Term::star(a.clone())));
    assert!(!nullable(&Term::cat(a.clone(), Term::star(a.clone()))));
    assert!(nullable(&Term::cat(
        Term::star(a.clone()),
        Term::star(chr('b'))
    )));
    assert!(nullable(&Term::alt(vec![a.clone(), Term::epsilon()])));
    assert!(!nullable(&Term::and(vec![
        Term::alt(vec![a.clone(), Term::epsilon()]),
        chr('b')
    ])));
    assert!(nullable(&Term::not(a.clone())));
    assert!(!nullable(&Term::not(Term::star(a.clone()))));
    assert!(nullable(&Term::group(1, Term::star(a.clone()))));
}

#[test]
fn derivative_table() {
    let a = chr('a');
    let b = chr('b');

    assert_eq!(derivative(&Term::empty(), 'a'), Term::empty());
    assert_eq!(derivative(&Term::epsilon(), 'a'), Term::empty());
    assert_eq!(derivative(&a, 'a'), Term::epsilon());
    assert_eq!(derivative(&a, 'b'), Term::empty());

    let ab = Term::cat(a.clone(), b.clone());
    assert_eq!(derivative(&ab, 'a'), b);
    assert_eq!(derivative(&ab, 'b'), Term::empty());

    let a_star = Term::star(a.clone());
    assert_eq!(derivative(&a_star, 'a'), a_star);

    // Nullable heads expose the tail: ∂_b(a*b) = ε
    let a_star_b = Term::cat(a_star.clone(), b.clone());
    assert_eq!(derivative(&a_star_b, 'b'), Term::epsilon());
    assert_eq!(derivative(&a_star_b, 'a'), a_star_b);

    let either = Term::alt(vec![a.clone(), b.clone()]);
    assert_eq!(derivative(&either, 'a'), Term::epsilon());

    assert_eq!(
        derivative(&Term::not(a.clone()), 'a'),
        Term::not(Term::epsilon())
    );
    assert_eq!(
        derivative(&Term::not(a.clone()), 'b'),
        Term::not(Term::empty())
    );
}

#[test]
fn class_partition_shapes() {
    // A single class splits the alphabet in two
    let blocks = class_partitions(&chr('a'));
    assert_eq!(blocks.len(), 2);
    assert!(blocks[0].contains('a'));
    assert!(!blocks[1].contains('a'));

    // ε doesn't discriminate at all
    assert_eq!(class_partitions(&Term::epsilon()), vec![ClassSet::full()]);

    // (a|b)c: the tail class is invisible while the head can't be skipped
    let regex = Regex::from(parser::regex("(a|b)c").unwrap());
    let blocks = class_partitions(regex.term());
    let of = |c: char| blocks.iter().position(|b| b.contains(c)).unwrap();
    assert_eq!(of('c'), of('z'));
    assert_ne!(of('a'), of('c'));

    // a*b: the head is nullable, so both a and b get their own block
    let regex = Regex::from(parser::regex("a*b").unwrap());
    let blocks = class_partitions(regex.term());
    let of = |c: char| blocks.iter().position(|b| b.contains(c)).unwrap();
    assert_ne!(of('a'), of('b'));
    assert_ne!(of('a'), of('z'));
    assert_ne!(of('b'), of('z'));
}

#[test]
fn construction_is_deterministic() {
    let first = compile("(a|b)*c&~.*d.*");
    let second = compile("(a|b)*c&~.*d.*");
    assert_eq!(first, second);
}

#[test]
fn small_patterns_stay_small() {
    // a* needs exactly the loop state and the sink
    let dfa = compile("a*");
    assert_eq!(dfa.states().len(), 2);
    assert!(dfa.initial_state().is_accepting());
}

#[test]
fn state_ceiling_is_enforced() {
    let regex = Regex::from(parser::regex("abc").unwrap());
    assert_eq!(
        regex.compile_bounded(3),
        Err(CompileError::TooManyStates(3))
    );
    // abc, bc, c, ε and the sink: five states exactly
    let dfa = regex.compile_bounded(5).unwrap();
    assert_eq!(dfa.states().len(), 5);
}

#[test]
fn dead_states_stop_the_matcher() {
    let dfa = compile("ab");
    assert!(dfa.match_anchored("ax").is_none());
    let mut evaluator = dfa.evaluator();
    evaluator.step('a', 0);
    assert!(!evaluator.is_dead());
    evaluator.step('x', 1);
    assert!(evaluator.is_dead());
}

#[test]
fn evaluator_steps_through_input() {
    let dfa = compile("ab*");
    let mut evaluator = dfa.evaluator();
    assert!(!evaluator.is_accepting());
    evaluator.step('a', 0);
    assert!(evaluator.is_accepting());
    evaluator.step('b', 1);
    assert!(evaluator.is_accepting());
}

#[test]
fn class_set_operations() {
    let letters = ClassSet::from_ranges([('a', 'f'), ('0', '9')]);
    assert!(letters.contains('c'));
    assert!(letters.contains('5'));
    assert!(!letters.contains('z'));

    // Adjacent and overlapping ranges merge
    let merged = ClassSet::from_ranges([('a', 'c'), ('d', 'f'), ('e', 'h')]);
    assert_eq!(merged, ClassSet::range('a', 'h'));
    assert_eq!(merged.ranges().len(), 1);

    let vowels = ClassSet::from_ranges("aeiou".chars().map(|c| (c, c)));
    let union = letters.union(&vowels);
    assert!(union.contains('o'));
    assert!(union.contains('b'));

    let common = letters.intersect(&vowels);
    assert!(common.contains('a'));
    assert!(common.contains('e'));
    assert!(!common.contains('o'));

    let rest = letters.difference(&vowels);
    assert!(rest.contains('b'));
    assert!(!rest.contains('a'));

    assert_eq!(ClassSet::full().complement(), ClassSet::empty());
    assert_eq!(ClassSet::empty().complement(), ClassSet::full());
    assert_eq!(letters.complement().complement(), letters);
    assert!(letters.union(&letters.complement()).is_full());
    assert!(letters.intersect(&letters.complement()).is_empty());

    // Inverted ranges are empty
    assert!(ClassSet::range('z', 'a').is_empty());
}

#[test]
fn class_complement_membership_fuzz() {
    let mut rng = thread_rng();
    let set = ClassSet::from_ranges([('a', 'f'), ('0', '9'), ('x', 'z'), ('à', 'ü')]);
    let complement = set.complement();
    for _ in 0..1000 {
        let c = rng.gen::<char>();
        assert_eq!(set.contains(c), !complement.contains(c));
    }
}

#[test]
fn compiled_dfa_is_shareable() {
    fn assert_shareable<T: Send + Sync>() {}
    assert_shareable::<Dfa>();
}

#[test]
fn table_rendering() {
    let dfa = compile("(a)");
    let table = dfa.to_table();
    assert!(table.contains("→"));
    assert!(table.contains("s0"));
    assert!(table.contains("open 1, close 1"));
    assert!(dfa.ascii_table().contains("->"));
}

fn random_pattern() -> impl Strategy<Value = String> {
    "[a-c]".prop_recursive(6, 32, 8, |inner| {
        prop_oneof![
            8 => (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{a}{b}")),
            4 => (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a}|{b})")),
            2 => inner.clone().prop_map(|r| format!("({r})*")),
            2 => inner.clone().prop_map(|r| format!("({r})+")),
            2 => inner.clone().prop_map(|r| format!("({r})?")),
        ]
    })
}

prop_compose! {
    fn class_pair()(low in prop::char::range('a', 'z'), high in prop::char::range('a', 'z')) -> (char, char) {
        if low <= high {
            (low, high)
        } else {
            (high, low)
        }
    }
}

prop_compose! {
    fn class_set()(ranges in prop::collection::vec(class_pair(), 0..5)) -> ClassSet {
        ClassSet::from_ranges(ranges)
    }
}

proptest! {
    /// Tests that the boolean class-set operations agree with pointwise membership
    #[test]
    fn class_algebra(
        a in class_set(),
        b in class_set(),
        probes in prop::collection::vec(prop::char::range('Z', '{'), 32)
    ) {
        let union = a.union(&b);
        let intersection = a.intersect(&b);
        let difference = a.difference(&b);
        let complement = a.complement();
        for &c in probes.iter().chain(['\0', char::MAX].iter()) {
            prop_assert_eq!(union.contains(c), a.contains(c) || b.contains(c));
            prop_assert_eq!(intersection.contains(c), a.contains(c) && b.contains(c));
            prop_assert_eq!(difference.contains(c), a.contains(c) && !b.contains(c));
            prop_assert_eq!(complement.contains(c), !a.contains(c));
        }
    }

    /// Tests that anchored acceptance agrees with the regex crate on the fragment both
    /// engines share
    #[test]
    fn matcher_agrees_with_regex_crate(
        pattern in random_pattern(),
        tests in prop::collection::vec("[a-c]{0,8}", 20)
    ) {
        let dfa = Regex::from(parser::regex(&pattern).unwrap()).compile().unwrap();
        let oracle = LibRegex::new(&format!("^(?:{pattern})$")).unwrap();
        for test in tests.iter() {
            let accepted = dfa
                .match_anchored(test)
                .map_or(false, |m| m.end() == test.len());
            prop_assert_eq!(accepted, oracle.is_match(test), "pattern {} on {:?}", &pattern, test);
        }
    }

    /// Tests that the character-class partition of a term is a real partition with a
    /// uniform derivative per block
    #[test]
    fn partition_blocks_are_sound(pattern in random_pattern()) {
        let regex = Regex::from(parser::regex(&pattern).unwrap());
        let blocks = class_partitions(regex.term());

        for (idx, a) in blocks.iter().enumerate() {
            for b in blocks[idx + 1..].iter() {
                prop_assert!(a.intersect(b).is_empty());
            }
        }

        let mut cover = ClassSet::empty();
        for block in blocks.iter() {
            cover = cover.union(block);
        }
        prop_assert!(cover.is_full());

        for block in blocks.iter() {
            let representative = block.first().unwrap();
            let expected = derivative(regex.term(), representative);
            for range in block.ranges() {
                prop_assert_eq!(&derivative(regex.term(), range.start()), &expected);
                prop_assert_eq!(&derivative(regex.term(), range.end()), &expected);
            }
        }
    }

    /// Tests that structurally equal patterns compile to identical automata
    #[test]
    fn compilation_is_deterministic(pattern in random_pattern()) {
        let first = Regex::from(parser::regex(&pattern).unwrap()).compile().unwrap();
        let second = Regex::from(parser::regex(&pattern).unwrap()).compile().unwrap();
        prop_assert_eq!(first, second);
    }
}
