#![deny(warnings)]

use crate::grammar::{Grammar, Rule, Symbol};
use log::{debug, trace};
use std::collections::{BTreeMap, BTreeSet};

impl Grammar {
    /// Normalize the grammar so that no rule is an epsilon or unit production.
    /// Runs once, further calls are no-ops.
    pub fn simplify(&mut self) {
        if self.normalized {
            return;
        }
        self.remove_epsilon_productions();
        loop {
            let count = self.rules.len();
            self.remove_unit_productions();
            if self.rules.len() == count {
                break;
            }
        }
        self.normalized = true;
        debug!("Normalized grammar: {} rules, empty word {}",
               self.rules.len(), if self.includes_empty_word { "included" } else { "excluded" });
    }

    /// Variables deriving the empty word. Seeded by rules whose production
    /// is empty (or only empty-word markers) and closed over rules made only
    /// of nullable variables.
    pub(crate) fn nullable_variables(&self) -> BTreeSet<Symbol> {
        let mut nullable = BTreeSet::new();
        loop {
            let prev_len = nullable.len();
            for rule in &self.rules {
                if rule.production().iter().all(|s| s.is_empty_word() || nullable.contains(s)) {
                    nullable.insert(rule.name());
                }
            }
            if prev_len == nullable.len() {
                return nullable;
            }
        }
    }

    /// Drop epsilon productions, compensating every rule that references a
    /// nullable variable with copies that omit it.
    ///
    /// A rule with `k` nullable occurrences expands into up to `2^k` rules,
    /// callers with long productions of nullable variables should expect that
    /// growth. If the start variable is nullable `includes_empty_word` is set.
    pub fn remove_epsilon_productions(&mut self) {
        // Empty-word markers match nothing, a production of only markers is empty
        for rule in &mut self.rules {
            rule.production_mut().retain(|s| !s.is_empty_word());
        }
        let nullable = self.nullable_variables();
        if nullable.contains(&self.start) {
            self.includes_empty_word = true;
        }
        trace!("Nullable variables: {:?}", nullable);

        let mut next_rules = Vec::new();
        for rule in self.rules.drain(..) {
            for production in omit_nullable(rule.production(), &nullable) {
                if !production.is_empty() {
                    next_rules.push(Rule::new(rule.name(), production));
                }
            }
        }
        self.rules = next_rules;
        self.canonicalize();
    }

    /// Replace each unit rule `A -> B` by `A -> γ` for every non-unit `γ`
    /// that `B` reaches through a chain of unit rules. Self units vanish.
    ///
    /// Substitution follows whole unit chains, so a single pass leaves no
    /// unit rules behind and a second pass is a no-op: the rule-count
    /// fixpoint loop in `simplify` settles after the first pass.
    pub fn remove_unit_productions(&mut self) {
        let mut units: BTreeMap<Symbol, BTreeSet<Symbol>> = BTreeMap::new();
        for rule in self.rules.iter().filter(|r| r.is_unit()) {
            units.entry(rule.name()).or_default().insert(rule.production()[0]);
        }
        if units.is_empty() {
            return;
        }
        let mut substitutions = Vec::new();
        for &var in units.keys() {
            for target in unit_closure(var, &units) {
                for rule in self.rules_for(target).filter(|r| !r.is_unit()) {
                    substitutions.push(Rule::new(var, rule.production().to_vec()));
                }
            }
        }
        trace!("Removing {} unit rules, adding {} substitutions",
               units.values().map(BTreeSet::len).sum::<usize>(), substitutions.len());
        self.rules.retain(|rule| !rule.is_unit());
        self.rules.extend(substitutions);
        self.canonicalize();
    }
}

/// Every production obtained by deleting any subset of the nullable
/// occurrences in `production`, including the original and possibly the
/// empty one. Built right to left with an explicit list of partial suffixes.
fn omit_nullable(production: &[Symbol], nullable: &BTreeSet<Symbol>) -> Vec<Vec<Symbol>> {
    // suffixes are kept reversed so that extending is a push
    let mut suffixes: Vec<Vec<Symbol>> = vec![Vec::new()];
    for sym in production.iter().rev() {
        if nullable.contains(sym) {
            let omitted = suffixes.clone();
            for suffix in &mut suffixes {
                suffix.push(*sym);
            }
            suffixes.extend(omitted);
        } else {
            for suffix in &mut suffixes {
                suffix.push(*sym);
            }
        }
    }
    for suffix in &mut suffixes {
        suffix.reverse();
    }
    suffixes
}

/// Variables reachable from `var` through unit rules, excluding `var`.
fn unit_closure(var: Symbol, units: &BTreeMap<Symbol, BTreeSet<Symbol>>) -> BTreeSet<Symbol> {
    let mut reached = BTreeSet::new();
    let mut pending = vec![var];
    while let Some(current) = pending.pop() {
        for &next in units.get(&current).into_iter().flatten() {
            if next != var && reached.insert(next) {
                pending.push(next);
            }
        }
    }
    reached
}

///////////////////////////////////////////////////////////////////////////////
