//! s24 lexer: splits source text into whitespace-separated tokens.
//!
//! The language has no grammar at this level. Comments, string literals and
//! nests are all resolved later by the executor, which rejoins tokens when it
//! needs to, so the lexer only tracks where each word starts.
use s24_syntax::token::Token;

/// Longest token the lexer emits, in bytes; longer runs are cut into several
/// tokens. A cut never lands inside a multi-byte character.
pub const MAX_TOKEN_LEN: usize = 255;

/// Streaming character scanner that produces tokens with positions.
pub struct Lexer {
    src: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    /// Create a new lexer over the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            src: input.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.src.get(self.pos).copied();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        ch
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_word(&mut self) -> Token {
        let (line, col) = (self.line, self.col);
        let mut text = String::new();
        let mut len = 0usize;
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() || len + c.len_utf8() > MAX_TOKEN_LEN {
                break;
            }
            text.push(c);
            len += c.len_utf8();
            self.advance();
        }
        Token::new(text, line, col)
    }

    /// Tokenize the whole input.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek().is_none() {
                break;
            }
            tokens.push(self.read_word());
        }
        tokens
    }
}

/// Convenience wrapper around [`Lexer::tokenize`].
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        tokenize(input).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn splits_on_any_whitespace() {
        assert_eq!(texts("2 3\t+\n\n  pp"), vec!["2", "3", "+", "pp"]);
        assert!(texts("   \n\t ").is_empty());
    }

    #[test]
    fn punctuation_is_not_special() {
        assert_eq!(texts("[ 1 2 ] ( note ) \"a b\""), vec!["[", "1", "2", "]", "(", "note", ")", "\"a", "b\""]);
        assert_eq!(texts("[1"), vec!["[1"]);
    }

    #[test]
    fn records_positions() {
        let toks = tokenize("1 2\n  add");
        assert_eq!((toks[0].line, toks[0].col), (1, 1));
        assert_eq!((toks[1].line, toks[1].col), (1, 3));
        assert_eq!((toks[2].line, toks[2].col), (2, 3));
    }

    #[test]
    fn long_words_are_chunked() {
        let word = "x".repeat(MAX_TOKEN_LEN + 10);
        let toks = tokenize(&word);
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[0].text.len(), MAX_TOKEN_LEN);
        assert_eq!(toks[1].text.len(), 10);
        assert_eq!(toks[1].col, MAX_TOKEN_LEN + 1);
    }

    #[test]
    fn chunks_are_measured_in_bytes() {
        let word = "é".repeat(200);
        let toks = tokenize(&word);
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[0].text.len(), 254);
        assert_eq!(toks[1].text.len(), 146);
        assert_eq!(toks[1].col, 128);
    }
}
