pub mod diagnostics;
pub mod error;
pub mod scanner;
pub mod token;

pub use crate::{
    diagnostics::Diagnostics,
    error::{Error, ErrorKind, Result},
    scanner::Scanner,
    token::{Literal, Token, TokenKind},
};

/// Scans `src` in one go, returning the tokens together with any lexical
/// errors found along the way.
pub fn scan(src: &str) -> (Vec<Token>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let tokens = Scanner::new(src).scan_tokens(&mut diagnostics);
    (tokens, diagnostics)
}
