#![deny(warnings)]

use std::collections::BTreeSet;
use std::fmt;

/// Marker for the empty word. It is a terminal that consumes no input.
pub const EMPTY_WORD: char = '#';

/// A grammar symbol. Whether it's a terminal or a variable is derived from
/// the character: lowercase letters and `#` are terminals, anything else
/// (in practice uppercase letters) names a variable.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(char);

/// A rule `name -> production`.
/// Field order matters: derived `Ord` sorts by name, then by production.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rule {
    name: Symbol,
    production: Vec<Symbol>,
}

#[derive(Clone, Debug)]
pub struct Grammar {
    pub(crate) alphabet: BTreeSet<Symbol>,
    pub(crate) rules: Vec<Rule>,
    pub(crate) start: Symbol,
    pub(crate) includes_empty_word: bool,
    pub(crate) normalized: bool,
}


impl Symbol {
    pub fn new(c: char) -> Self {
        Symbol(c)
    }

    pub fn empty_word() -> Self {
        Symbol(EMPTY_WORD)
    }

    pub fn as_char(&self) -> char {
        self.0
    }

    pub fn is_terminal(&self) -> bool {
        self.0 == EMPTY_WORD || self.0.is_ascii_lowercase()
    }

    pub fn is_variable(&self) -> bool {
        !self.is_terminal()
    }

    pub fn is_empty_word(&self) -> bool {
        self.0 == EMPTY_WORD
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Symbol(c)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_terminal() {
            write!(f, "Term({})", self.0)
        } else {
            write!(f, "Var({})", self.0)
        }
    }
}

impl Rule {
    pub fn new(name: Symbol, production: Vec<Symbol>) -> Self {
        Rule{name, production}
    }

    pub fn name(&self) -> Symbol {
        self.name
    }

    pub fn production(&self) -> &[Symbol] {
        &self.production
    }

    /// A unit rule rewrites a variable into exactly one variable.
    pub fn is_unit(&self) -> bool {
        self.production.len() == 1 && self.production[0].is_variable()
    }

    /// Production as text, `#` stands in for an empty production.
    pub fn render_production(&self) -> String {
        if self.production.is_empty() {
            return EMPTY_WORD.to_string();
        }
        self.production.iter().map(Symbol::as_char).collect()
    }

    pub(crate) fn production_mut(&mut self) -> &mut Vec<Symbol> {
        &mut self.production
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.name, self.render_production())
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Grammar {
    pub(crate) fn new(start: Symbol) -> Self {
        Grammar{
            alphabet: BTreeSet::new(),
            rules: Vec::new(),
            start,
            includes_empty_word: false,
            normalized: false,
        }
    }

    pub fn alphabet(&self) -> &BTreeSet<Symbol> {
        &self.alphabet
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn start(&self) -> Symbol {
        self.start
    }

    /// Only meaningful once the grammar has been normalized.
    pub fn includes_empty_word(&self) -> bool {
        self.includes_empty_word
    }

    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Variables that head some rule, plus the start variable.
    pub fn variables(&self) -> BTreeSet<Symbol> {
        let mut vars: BTreeSet<_> = self.rules.iter().map(Rule::name).collect();
        vars.insert(self.start);
        vars
    }

    /// Rules rewriting `var`, in the grammar's rule order.
    pub fn rules_for(&self, var: Symbol) -> impl Iterator<Item=&Rule> {
        self.rules.iter().filter(move |rule| rule.name == var)
    }

    /// Deterministic rendering: alphabet, variables, start and rules.
    pub fn describe(&self) -> String {
        let join = |symbols: &BTreeSet<Symbol>| symbols.iter()
            .map(|s| s.to_string()).collect::<Vec<_>>().join(" ");
        let mut out = format!(
            "Alphabet: {}\nVariables: {}\nStart: {}\nRules:\n",
            join(&self.alphabet), join(&self.variables()), self.start);
        for rule in &self.rules {
            out.push_str(&format!("  {}\n", rule));
        }
        out
    }

    /// Sort rules by name then production and drop duplicates.
    pub(crate) fn canonicalize(&mut self) {
        self.rules.sort();
        self.rules.dedup();
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

///////////////////////////////////////////////////////////////////////////////
