#![deny(warnings)]

use crate::grammar::{Grammar, Rule, Symbol};
use crate::items::Item;
use log::{debug, trace};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Decides membership of words in the language of a Grammar.
/// Borrows the grammar for its lifetime, build one per `matches` call.
/// Normalized grammars are the common case, but epsilon and unit rules are
/// handled too: predicting a nullable variable also steps over it.
pub struct EarleyRecognizer<'g> {
    grammar: &'g Grammar,
    // rules indexed by the variable they rewrite, used for predictions
    predictions: HashMap<Symbol, Vec<&'g Rule>>,
    // variables deriving the empty word, empty once normalized
    nullable: BTreeSet<Symbol>,
}

/// Items reachable at one input position. Insertion order doubles as the
/// work queue while the set is being built.
#[derive(Default)]
pub(crate) struct StateSet<'g> {
    items: Vec<Item<'g>>,
    seen: HashSet<Item<'g>>,
}

/// One StateSet per input position, `0..=len(word)`.
pub(crate) struct Chart<'g>(Vec<StateSet<'g>>);

///////////////////////////////////////////////////////////////////////////////

impl<'g> StateSet<'g> {
    /// Returns false if the item was already present.
    fn insert(&mut self, item: Item<'g>) -> bool {
        if self.seen.insert(item) {
            self.items.push(item);
            return true;
        }
        false
    }

    #[cfg(test)]
    pub(crate) fn items(&self) -> &[Item<'g>] {
        &self.items
    }
}

impl<'g> Chart<'g> {
    #[cfg(test)]
    pub(crate) fn statesets(&self) -> &[StateSet<'g>] {
        &self.0
    }

    pub(crate) fn item_count(&self) -> usize {
        self.0.iter().map(|set| set.items.len()).sum()
    }
}

impl<'g> EarleyRecognizer<'g> {
    pub fn new(grammar: &'g Grammar) -> EarleyRecognizer<'g> {
        let nullable = grammar.nullable_variables();
        if !nullable.is_empty() {
            debug!("Recognizing with nullable variables {:?}", nullable);
        }
        let mut predictions: HashMap<Symbol, Vec<&'g Rule>> = HashMap::new();
        for rule in grammar.rules() {
            predictions.entry(rule.name()).or_default().push(rule);
        }
        EarleyRecognizer{grammar, predictions, nullable}
    }

    fn rules_for(&self, var: Symbol) -> impl Iterator<Item=&'g Rule> + '_ {
        self.predictions.get(&var).into_iter().flatten().copied()
    }

    /// Build the chart for `word`. Each StateSet is processed as a queue
    /// until no new items show up, only then the next one is visited.
    pub(crate) fn build_chart(&self, word: &[Symbol]) -> Chart<'g> {
        let mut statesets: Vec<StateSet<'g>> =
            (0..=word.len()).map(|_| StateSet::default()).collect();

        // Populate S0, add items for each rule matching the start symbol
        for rule in self.rules_for(self.grammar.start()) {
            statesets[0].insert(Item::predict_new(rule, 0));
        }

        for idx in 0..=word.len() {
            let mut cursor = 0;
            while let Some(&item) = statesets[idx].items.get(cursor) {
                cursor += 1;
                match item.next_symbol() {
                    // Complete: advance items in the origin set waiting on this rule
                    None => {
                        let name = item.rule.name();
                        let completions: Vec<_> = statesets[item.origin].items.iter()
                            .filter(|waiting| waiting.next_symbol() == Some(name))
                            .map(Item::advance)
                            .collect();
                        for completion in completions {
                            statesets[idx].insert(completion);
                        }
                    }
                    // Predict. A nullable variable may complete in this very
                    // set before `item` waits on it, so advance over it now.
                    Some(sym) if sym.is_variable() => {
                        for rule in self.rules_for(sym) {
                            statesets[idx].insert(Item::predict_new(rule, idx));
                        }
                        if self.nullable.contains(&sym) {
                            statesets[idx].insert(item.advance());
                        }
                    }
                    // Scan: the empty-word marker consumes nothing
                    Some(sym) if sym.is_empty_word() => {
                        statesets[idx].insert(item.advance());
                    }
                    Some(sym) => {
                        if word.get(idx) == Some(&sym) {
                            statesets[idx + 1].insert(item.advance());
                        }
                    }
                }
            }
            trace!("StateSet {}: {} items", idx, statesets[idx].items.len());
        }

        // debug StateSets
        if cfg!(feature="debug") {
            for (idx, stateset) in statesets.iter().enumerate() {
                eprintln!("=== StateSet {} ===", idx);
                for item in &stateset.items {
                    eprintln!("{:?}", item);
                }
            }
        }
        Chart(statesets)
    }

    /// Accept `word` if some item in the last StateSet a. is finished,
    /// b. started at position 0 and c. rewrites the start variable.
    pub fn accepts(&self, word: &[Symbol]) -> bool {
        if word.is_empty() && self.grammar.includes_empty_word() {
            return true;
        }
        let alphabet = self.grammar.alphabet();
        if word.iter().any(|sym| !alphabet.contains(sym)) {
            trace!("Rejecting word with symbols outside the alphabet");
            return false;
        }
        let chart = self.build_chart(word);
        let start = self.grammar.start();
        let accepted = chart.0.last().is_some_and(|last| last.items.iter().any(
            |item| item.finished() && item.origin == 0 && item.rule.name() == start));
        debug!("Word of length {} {} after {} items",
               word.len(), if accepted { "accepted" } else { "rejected" }, chart.item_count());
        accepted
    }
}

impl Grammar {
    /// Check if `word` belongs to the language of this grammar.
    /// The grammar is normalized on first use.
    pub fn matches(&mut self, word: &str) -> bool {
        self.simplify();
        let word: Vec<Symbol> = word.chars().map(Symbol::new).collect();
        EarleyRecognizer::new(self).accepts(&word)
    }
}
