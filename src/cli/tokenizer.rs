//! Line tokenizer.
//!
//! Splits a command line on [`DELIMITERS`], dropping empty pieces, so
//! `vboard -i 10,200,0` and `vboard -i(10, 200, 0);` yield the same tokens.

/// Characters that separate tokens.
pub const DELIMITERS: [char; 6] = [' ', '\n', '(', ',', ')', ';'];

/// Lazy, single-pass token stream over a line.
///
/// ```rust
/// use vboard::cli::tokenizer::Tokens;
///
/// let mut tokens = Tokens::new("vboard -i 10,200,0");
/// assert_eq!(tokens.next(), Some("vboard"));
/// assert_eq!(tokens.next(), Some("-i"));
/// assert_eq!(tokens.rest(), " 10,200,0");
/// assert_eq!(tokens.count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    /// Start tokenizing `line`
    pub fn new(line: &'a str) -> Self {
        Self { rest: line }
    }

    /// Unconsumed remainder of the line
    pub fn rest(&self) -> &'a str {
        self.rest
    }
}

fn is_delimiter(c: char) -> bool {
    DELIMITERS.contains(&c)
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let start = self.rest.trim_start_matches(is_delimiter);
        if start.is_empty() {
            self.rest = start;
            return None;
        }

        let end = start.find(is_delimiter).unwrap_or(start.len());
        let (token, rest) = start.split_at(end);
        self.rest = rest;
        Some(token)
    }
}

impl core::iter::FusedIterator for Tokens<'_> {}
