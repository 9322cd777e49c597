#![deny(warnings)]

use crate::grammar::{Grammar, Rule, Symbol, EMPTY_WORD};
use crate::scanner::Scanner;
use log::{debug, trace};
use std::fmt;

/// Variables are named `A` to `Z`, one per `mu` binder.
const MAX_BINDERS: u8 = 26;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Offending character offset and a description of what was expected.
    MalformedExpression { position: usize, expected: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MalformedExpression{position, expected} => write!(
                f, "Malformed expression at position {}: expected {}", position, expected),
        }
    }
}

impl std::error::Error for Error {}

// Characters that carry syntax and so can't name a parameter
fn is_structural(c: char) -> bool {
    matches!(c, '(' | ')' | '+' | EMPTY_WORD) || c.is_whitespace()
}

fn malformed(position: usize, expected: impl Into<String>) -> Error {
    Error::MalformedExpression{position, expected: expected.into()}
}

/// Compile a mu-expression such as `mu(x).axb + #` into a Grammar.
///
/// Every `mu(p).body` introduces a fresh variable (`A`, `B`, ... in order of
/// appearance) and binds `p` to it while compiling `body`. `p` is any
/// character without syntactic meaning, not just a letter. Bindings are
/// lexically scoped: an inner binder of the same parameter shadows the outer one
/// and the outer binding is restored once the inner expression closes.
pub fn compile(text: &str) -> Result<Grammar, Error> {
    let mut compiler = MuCompiler{
        scanner: Scanner::new(text),
        grammar: Grammar::new(Symbol::new('A')),
        binders: 0,
        scope: Vec::new(),
    };
    compiler.scanner.skip_whitespace();
    compiler.grammar.start = compiler.mu_expr(false)?;
    let mut grammar = compiler.grammar;
    grammar.canonicalize();
    debug!("Compiled {:?} into {} rules over {} variables",
           text, grammar.rules.len(), grammar.variables().len());
    Ok(grammar)
}

impl Grammar {
    pub fn from_mu_expression(text: &str) -> Result<Grammar, Error> {
        compile(text)
    }
}

struct MuCompiler {
    scanner: Scanner,
    grammar: Grammar,
    binders: u8,
    // (parameter, variable) bindings, innermost last
    scope: Vec<(char, Symbol)>,
}

impl MuCompiler {
    fn expect(&mut self, literal: &str) -> Result<(), Error> {
        self.scanner.accept_literal(literal)
            .map_err(|pos| malformed(pos, format!("{:?}", literal)))
    }

    fn fresh_variable(&mut self, position: usize) -> Result<Symbol, Error> {
        if self.binders >= MAX_BINDERS {
            return Err(malformed(position, "at most 26 mu binders"));
        }
        let var = Symbol::new((b'A' + self.binders) as char);
        self.binders += 1;
        Ok(var)
    }

    // MuExpr := "mu(" Param ")." Alternatives
    fn mu_expr(&mut self, nested: bool) -> Result<Symbol, Error> {
        let binder_pos = self.scanner.pos();
        self.expect("mu(")?;
        let param_pos = self.scanner.pos();
        let param = match self.scanner.next() {
            Some(c) if !is_structural(c) => c,
            _ => return Err(malformed(param_pos, "parameter")),
        };
        let var = self.fresh_variable(binder_pos)?;
        self.expect(").")?;
        trace!("Binding {:?} to {} at {}", param, var, binder_pos);
        self.scope.push((param, var));
        let alternatives = self.alternatives(var, nested);
        self.scope.pop();
        alternatives.map(|_| var)
    }

    // Alternatives := Term ("+" Term)*
    // A nested body is closed by ')', the outermost one by end of input.
    fn alternatives(&mut self, var: Symbol, nested: bool) -> Result<(), Error> {
        let mut production = Vec::new();
        loop {
            let pos = self.scanner.pos();
            match self.scanner.next() {
                None if nested => return Err(malformed(pos, "\")\"")),
                None => break,
                Some(')') if nested => break,
                Some(')') => return Err(malformed(pos, "end of expression")),
                Some(c) if c.is_whitespace() => (),
                Some('(') => {
                    self.scanner.skip_whitespace();
                    production.push(self.mu_expr(true)?);
                }
                Some('+') => {
                    self.grammar.rules.push(Rule::new(var, std::mem::take(&mut production)));
                }
                Some(EMPTY_WORD) => production.push(Symbol::empty_word()),
                Some(c) => production.push(self.resolve(c, pos)?),
            }
        }
        self.grammar.rules.push(Rule::new(var, production));
        Ok(())
    }

    // Literal: a bound parameter becomes its variable, any other lowercase
    // letter is a terminal and joins the alphabet.
    fn resolve(&mut self, c: char, pos: usize) -> Result<Symbol, Error> {
        if let Some((_, var)) = self.scope.iter().rev().find(|(param, _)| *param == c) {
            return Ok(*var);
        }
        if c.is_ascii_lowercase() {
            let terminal = Symbol::new(c);
            self.grammar.alphabet.insert(terminal);
            return Ok(terminal);
        }
        if c.is_ascii_uppercase() {
            return Err(malformed(pos, "bound parameter"));
        }
        Err(malformed(pos, "terminal, '#', '+', '(' or ')'"))
    }
}
