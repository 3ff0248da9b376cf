//! Token ranges that the executor runs: the top-level program and every nest.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;

use s24_syntax::Token;

/// An immutable run of tokens plus lazily built jump tables.
///
/// Nests are shared by reference counting, so the tables are built at most
/// once per nest no matter how many times it runs.
pub struct Code {
    tokens: Vec<Token>,
    jumps: OnceCell<JumpTable>,
}

#[derive(Debug, Default)]
struct JumpTable {
    /// Every position of every `.label` token, in source order
    labels: HashMap<String, Vec<usize>>,
    /// `do` position -> matching `over` position
    do_over: HashMap<usize, usize>,
    /// `over` position -> matching `loop` position
    over_loop: HashMap<usize, usize>,
}

impl Code {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            jumps: OnceCell::new(),
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    fn table(&self) -> &JumpTable {
        self.jumps.get_or_init(|| JumpTable::build(&self.tokens))
    }

    /// First position holding `label` other than `referrer` itself.
    pub(crate) fn find_label(&self, label: &str, referrer: usize) -> Option<usize> {
        self.table()
            .labels
            .get(label)
            .and_then(|positions| positions.iter().copied().find(|&p| p != referrer))
    }

    /// First `.end` at or after `from`.
    pub(crate) fn next_end(&self, from: usize) -> Option<usize> {
        self.table()
            .labels
            .get(".end")
            .and_then(|positions| positions.iter().copied().find(|&p| p >= from))
    }

    pub(crate) fn matching_over(&self, do_at: usize) -> Option<usize> {
        self.table().do_over.get(&do_at).copied()
    }

    pub(crate) fn matching_loop(&self, over_at: usize) -> Option<usize> {
        self.table().over_loop.get(&over_at).copied()
    }
}

impl JumpTable {
    fn build(tokens: &[Token]) -> Self {
        let mut table = JumpTable::default();
        for (i, tok) in tokens.iter().enumerate() {
            match tok.as_str() {
                "do" => {
                    if let Some(o) = scan_forward_to_over(tokens, i) {
                        table.do_over.insert(i, o);
                    }
                }
                "over" => {
                    if let Some(l) = scan_backward_to_loop(tokens, i) {
                        table.over_loop.insert(i, l);
                    }
                }
                _ if tok.is_label() => {
                    table.labels.entry(tok.text.clone()).or_default().push(i);
                }
                _ => {}
            }
        }
        table
    }
}

fn scan_forward_to_over(tokens: &[Token], do_at: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, tok) in tokens.iter().enumerate().skip(do_at + 1) {
        match tok.as_str() {
            "do" => depth += 1,
            "over" if depth == 0 => return Some(i),
            "over" => depth -= 1,
            _ => {}
        }
    }
    None
}

fn scan_backward_to_loop(tokens: &[Token], over_at: usize) -> Option<usize> {
    let mut depth = 0usize;
    for i in (0..over_at).rev() {
        match tokens[i].as_str() {
            "over" => depth += 1,
            "loop" if depth == 0 => return Some(i),
            "loop" => depth -= 1,
            _ => {}
        }
    }
    None
}

impl PartialEq for Code {
    fn eq(&self, other: &Self) -> bool {
        self.tokens == other.tokens
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.tokens.iter().map(|t| t.as_str())).finish()
    }
}
