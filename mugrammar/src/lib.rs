#![deny(warnings)]

mod grammar;
pub use crate::grammar::{Grammar, Rule, Symbol, EMPTY_WORD};

mod scanner;
mod compiler;
pub use crate::compiler::{compile, Error};

mod normalize;

mod items;
mod recognizer;
pub use crate::recognizer::EarleyRecognizer;

#[cfg(test)]
mod normalize_test;
