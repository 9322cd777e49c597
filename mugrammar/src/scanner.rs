#![deny(warnings)]

/// Character cursor over a mu-expression. Positions are 0-based offsets in
/// characters, `pos` is the offset of the next character to be consumed.
pub struct Scanner {
    buf: Vec<char>,
    pos: usize,
}

impl Iterator for Scanner {
    type Item = char;
    fn next(&mut self) -> Option<char> {
        let next = self.buf.get(self.pos).copied();
        if next.is_some() {
            self.pos += 1;
        }
        next
    }
}

impl Scanner {
    pub fn new(source: &str) -> Scanner {
        Scanner{buf: source.chars().collect(), pos: 0}
    }

    pub fn pos(&self) -> usize { self.pos }

    pub fn peek(&self) -> Option<char> {
        self.buf.get(self.pos).copied()
    }

    // Advance only if the next char is `what`
    pub fn accept(&mut self, what: char) -> bool {
        if self.peek() == Some(what) {
            self.pos += 1;
            return true;
        }
        false
    }

    // Match every char of `literal` in sequence. On mismatch the scanner is
    // left at the offending char and its offset is returned.
    pub fn accept_literal(&mut self, literal: &str) -> Result<(), usize> {
        for c in literal.chars() {
            if !self.accept(c) {
                return Err(self.pos);
            }
        }
        Ok(())
    }

    pub fn skip_whitespace(&mut self) -> bool {
        let mut advanced = false;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
            advanced = true;
        }
        advanced
    }
}

///////////////////////////////////////////////////////////////////////////////
