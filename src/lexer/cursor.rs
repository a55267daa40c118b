use std::str::Chars;

#[derive(Clone)]
pub struct Cursor<'a> {
    chars: Chars<'a>,
    ln: u64,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        let chars = s.chars();
        Self { chars, ln: 1 }
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    pub fn peek_2nd(&self) -> Option<char> {
        // cheap to clone
        let mut chars = self.chars.clone();
        chars.next();
        chars.next()
    }

    pub fn take(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.ln += 1;
        }
        c
    }

    pub fn skip_if(&mut self, p: impl FnOnce(char) -> bool) -> bool {
        let hit = self.peek().filter(|c| p(*c)).is_some();
        if hit {
            self.take();
        }
        hit
    }

    pub fn get_ln(&self) -> u64 {
        self.ln
    }

    pub fn as_str(&self) -> &'a str {
        self.chars.as_str()
    }

    /// Skips whitespace, `//` line comments and `/* */` block comments.
    /// An unterminated block comment runs to end of input.
    pub fn skip_trivia(&mut self) {
        loop {
            while self.skip_if(char::is_whitespace) {}
            match (self.peek(), self.peek_2nd()) {
                (Some('/'), Some('/')) => {
                    while self.peek().filter(|c| *c != '\n').is_some() {
                        self.take();
                    }
                }
                (Some('/'), Some('*')) => {
                    self.take();
                    self.take();
                    loop {
                        match (self.peek(), self.peek_2nd()) {
                            (Some('*'), Some('/')) => {
                                self.take();
                                self.take();
                                break;
                            }
                            (Some(_), _) => {
                                self.take();
                            }
                            (None, _) => break,
                        }
                    }
                }
                _ => break,
            }
        }
    }
}
