use std::fmt::{self, Display};

#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) lexeme: String,
    pub(crate) literal: Option<Literal>,
    pub(crate) line: usize,
}

impl Token {
    pub(crate) fn new<S: Into<String>>(
        kind: TokenKind,
        lexeme: S,
        literal: Option<Literal>,
        line: usize,
    ) -> Self {
        Token { kind, lexeme: lexeme.into(), literal, line }
    }

    pub(crate) fn end_of_file(line: usize) -> Self {
        Token::new(TokenKind::EndOfFile, "", None, line)
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn lexeme(&self) -> &str {
        self.lexeme.as_str()
    }

    pub fn literal(&self) -> Option<&Literal> {
        self.literal.as_ref()
    }

    /// The 1-based line the token starts on.
    pub fn line(&self) -> usize {
        self.line
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self.kind, self.lexeme)?;
        match &self.literal {
            Some(literal) => write!(f, " {}", literal),
            None => write!(f, " "),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Number(f64),
    Str(String),
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{}", n),
            Literal::Str(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum TokenKind {
    LeftParen, RightParen, LeftBrace, RightBrace,
    Comma, Dot, Semicolon,

    Plus, Minus, Star, Slash, Power,
    BitAnd, BitOr, BitXor,

    Bang, BangEqual,
    Equal, EqualEqual,
    Greater, GreaterEqual,
    Less, LessEqual,
    And, Or,

    Identifier, String, Number,

    Class, Else, False, Func, If, Nil, Print,
    Return, Super, This, True, Var, While,

    EndOfFile,
}
