#![deny(warnings)]

use crate::compiler::compile;
use crate::grammar::{Grammar, Symbol};
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

fn rules(grammar: &Grammar) -> Vec<String> {
    grammar.rules().iter().map(|r| r.to_string()).collect()
}

// Recognizer used as reference, it handles epsilon and unit rules by
// computing which variables derive each span of `word` until nothing changes.
fn derives(grammar: &Grammar, word: &str) -> bool {
    let word: Vec<Symbol> = word.chars().map(Symbol::new).collect();
    let n = word.len();
    let mut table = vec![vec![BTreeSet::new(); n + 1]; n + 1];
    loop {
        let mut changed = false;
        for rule in grammar.rules() {
            for i in 0..=n {
                let mut reach = BTreeSet::from([i]);
                for sym in rule.production() {
                    let mut next = BTreeSet::new();
                    for &p in &reach {
                        if sym.is_empty_word() {
                            next.insert(p);
                        } else if sym.is_terminal() {
                            if word.get(p) == Some(sym) {
                                next.insert(p + 1);
                            }
                        } else {
                            next.extend((p..=n).filter(|&q| table[p][q].contains(sym)));
                        }
                    }
                    reach = next;
                }
                for j in reach {
                    changed |= table[i][j].insert(rule.name());
                }
            }
        }
        if !changed {
            break;
        }
    }
    table[0][n].contains(&grammar.start())
}

fn words_up_to(alphabet: &[char], max_len: usize) -> Vec<String> {
    let mut words = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..max_len {
        frontier = frontier.iter()
            .flat_map(|w| alphabet.iter().map(move |c| format!("{}{}", w, c)))
            .collect();
        words.extend(frontier.iter().cloned());
    }
    words
}

fn check_invariants(grammar: &Grammar) {
    for rule in grammar.rules() {
        assert!(!rule.production().is_empty(), "epsilon rule {}", rule);
        assert!(!rule.is_unit(), "unit rule {}", rule);
        assert!(rule.production().iter().all(|s| !s.is_empty_word()), "marker in {}", rule);
    }
    let mut sorted = grammar.rules().to_vec();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted, grammar.rules());
}

const SAMPLES: &[&str] = &[
    "mu(x).xbx + a + #",
    "mu(x).ab(mu(y).cxa) + #",
    "mu(s).(mu(x).ax+#)(mu(x).bx+#)",
    "mu(X).XX + (mu(Y).YY + (mu(Z).ZZ + a + #))",
    "mu(x).(mu(y).(mu(z).x + c) + b) + a",
    "mu(x).a(mu(y).(mu(z).#))b",
    "mu(x).a#x# + #b",
    "mu(x).(mu(y).ayb + #)(mu(z).czx + #)",
];

///////////////////////////////////////////////////////////////////////////////

#[test]
fn epsilon_single_binder() {
    let mut g = compile("mu(x).xbx + a + #").unwrap();
    g.remove_epsilon_productions();
    assert_eq!(rules(&g), vec!["A -> Ab", "A -> AbA", "A -> a", "A -> b", "A -> bA"]);
    assert!(g.includes_empty_word());
    assert!(!g.is_normalized());
}

#[test]
fn epsilon_nested_binder() {
    let mut g = compile("mu(x).ab(mu(y).cxa) + #").unwrap();
    g.remove_epsilon_productions();
    assert_eq!(rules(&g), vec!["A -> abB", "B -> cAa", "B -> ca"]);
    assert!(g.includes_empty_word());
}

#[test]
fn epsilon_start_nullable_through_rules() {
    // A -> BC has no direct empty production but both B and C are nullable
    let mut g = compile("mu(s).(mu(x).ax+#)(mu(x).bx+#)").unwrap();
    g.remove_epsilon_productions();
    assert_eq!(rules(&g), vec![
        "A -> B", "A -> BC", "A -> C", "B -> a", "B -> aB", "C -> b", "C -> bC",
    ]);
    assert!(g.includes_empty_word());
}

#[test]
fn epsilon_nullable_chain() {
    // C -> # makes B -> C nullable too
    let mut g = compile("mu(x).a(mu(y).(mu(z).#))b").unwrap();
    g.remove_epsilon_productions();
    assert_eq!(rules(&g), vec!["A -> aBb", "A -> ab", "B -> C"]);
    assert!(!g.includes_empty_word());
    assert!(g.matches("ab"));
    assert!(!g.matches(""));
}

#[test]
fn epsilon_markers_inside_productions() {
    let mut g = compile("mu(x).a#x# + #b").unwrap();
    g.remove_epsilon_productions();
    assert_eq!(rules(&g), vec!["A -> aA", "A -> b"]);
    assert!(!g.includes_empty_word());
}

#[test]
fn unit_elimination_chain() {
    let mut g = compile("mu(X).XX + (mu(Y).YY + (mu(Z).ZZ + a + #))").unwrap();
    g.remove_epsilon_productions();
    assert_eq!(rules(&g), vec![
        "A -> A", "A -> AA", "A -> B", "B -> B", "B -> BB", "B -> C",
        "C -> C", "C -> CC", "C -> a",
    ]);
    g.remove_unit_productions();
    let once = rules(&g);
    assert_eq!(once, vec![
        "A -> AA", "A -> BB", "A -> CC", "A -> a", "B -> BB", "B -> CC", "B -> a",
        "C -> CC", "C -> a",
    ]);
    g.remove_unit_productions();
    assert_eq!(rules(&g), once);
    check_invariants(&g);
}

#[test]
fn unit_elimination_cycle() {
    let mut g = compile("mu(x).(mu(y).(mu(z).x + c) + b) + a").unwrap();
    assert_eq!(rules(&g), vec!["A -> B", "A -> a", "B -> C", "B -> b", "C -> A", "C -> c"]);
    g.simplify();
    assert_eq!(rules(&g), vec![
        "A -> a", "A -> b", "A -> c", "B -> a", "B -> b", "B -> c",
        "C -> a", "C -> b", "C -> c",
    ]);
    assert!(g.is_normalized());
}

#[test]
fn unit_elimination_single_pass() {
    // chains and cycles are substituted through in one pass
    for text in SAMPLES {
        let mut g = compile(text).unwrap();
        g.remove_epsilon_productions();
        g.remove_unit_productions();
        assert!(g.rules().iter().all(|r| !r.is_unit()), "unit rule left in {}", text);
        let once = rules(&g);
        g.remove_unit_productions();
        assert_eq!(rules(&g), once);
    }
}

#[test]
fn unit_elimination_fixpoint() {
    for text in SAMPLES {
        let mut g = compile(text).unwrap();
        g.remove_epsilon_productions();
        let mut counts = vec![g.rules().len()];
        loop {
            g.remove_unit_productions();
            counts.push(g.rules().len());
            if counts[counts.len() - 1] == counts[counts.len() - 2] {
                break;
            }
            assert!(counts.len() < 10, "no fixpoint for {}: {:?}", text, counts);
        }
        // once stable, further passes leave the count alone
        g.remove_unit_productions();
        assert_eq!(g.rules().len(), counts[counts.len() - 1]);
        check_invariants(&g);
    }
}

#[test]
fn simplify_idempotent() {
    for text in SAMPLES {
        let mut g = compile(text).unwrap();
        g.simplify();
        let once = rules(&g);
        let includes = g.includes_empty_word();
        g.simplify();
        assert_eq!(rules(&g), once);
        // re-running the passes on a normalized grammar changes nothing
        g.remove_epsilon_productions();
        g.remove_unit_productions();
        assert_eq!(rules(&g), once);
        assert_eq!(g.includes_empty_word(), includes);
        check_invariants(&g);
    }
}

#[test]
fn simplify_preserves_language() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x6d75);
    for text in SAMPLES {
        let original = compile(text).unwrap();
        let mut normalized = original.clone();
        normalized.simplify();
        let alphabet: Vec<char> = original.alphabet().iter().map(Symbol::as_char).collect();

        let mut words = words_up_to(&alphabet, 5);
        for _ in 0..40 {
            let len = rng.random_range(6..=9);
            words.push((0..len)
                .map(|_| alphabet[rng.random_range(0..alphabet.len())])
                .collect());
        }
        for word in words {
            assert_eq!(derives(&original, &word), normalized.matches(&word),
                       "{} disagrees on {:?}", text, word);
        }
    }
}

#[test]
fn reference_recognizer_sanity() {
    let g = compile("mu(x).xbx + a + #").unwrap();
    assert!(derives(&g, ""));
    assert!(derives(&g, "bab"));
    assert!(!derives(&g, "aa"));
}
