#![deny(warnings)]

use crate::grammar::{Rule, Symbol};
use std::fmt;

/// An Item is a partially matched `Rule`. `dot` shows the match progress.
/// Items are deduped by all three fields.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Item<'g> {
    pub rule: &'g Rule,  // dotted rule, borrowed from the grammar
    pub dot: usize,      // dot position within the production
    pub origin: usize,   // input position where matching of the rule started
}

impl<'g> Item<'g> {
    /// Build a new `Prediction` based Item.
    pub fn predict_new(rule: &'g Rule, origin: usize) -> Item<'g> {
        Item{rule, dot: 0, origin}
    }

    /// Same rule instance with the dot moved over the next symbol.
    pub fn advance(&self) -> Item<'g> {
        Item{rule: self.rule, dot: self.dot + 1, origin: self.origin}
    }

    /// Item is finished if its Rule has been fully matched
    pub fn finished(&self) -> bool {
        self.dot >= self.rule.production().len()
    }

    /// Exposes the next symbol in the progress of the Rule
    pub fn next_symbol(&self) -> Option<Symbol> {
        self.rule.production().get(self.dot).copied()
    }
}

impl fmt::Debug for Item<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (pre, post) = self.rule.production().split_at(self.dot);
        let render = |syms: &[Symbol]| syms.iter().map(Symbol::as_char).collect::<String>();
        write!(f, "({}) {} -> {} \u{00b7} {}",
               self.origin, self.rule.name(), render(pre), render(post))
    }
}

///////////////////////////////////////////////////////////////////////////////
