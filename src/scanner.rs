use crate::{
    diagnostics::Diagnostics,
    error::{Error, Result},
    token::{Literal, Token, TokenKind},
};
use peekmore::{PeekMore, PeekMoreIterator};
use phf::phf_map;
use std::str::Chars;

static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "class" => TokenKind::Class,
    "else" => TokenKind::Else,
    "false" => TokenKind::False,
    "func" => TokenKind::Func,
    "if" => TokenKind::If,
    "let" => TokenKind::Var,
    "nil" => TokenKind::Nil,
    "print" => TokenKind::Print,
    "return" => TokenKind::Return,
    "super" => TokenKind::Super,
    "this" => TokenKind::This,
    "true" => TokenKind::True,
    "var" => TokenKind::Var,
    "while" => TokenKind::While,
};

type Scanned = (TokenKind, Option<Literal>);

/// Single-pass tokenizer over a borrowed source string.
///
/// Iterating yields every token and lexical error in source order, followed
/// by exactly one `EndOfFile` token, after which the iterator is exhausted.
pub struct Scanner<'a> {
    src: PeekMoreIterator<Chars<'a>>,
    lexeme_buffer: String,
    line: usize,
    done: bool,
}

impl <'a> Iterator for Scanner<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Result<Token>> {
        if self.done {
            return None;
        }

        loop {
            self.lexeme_buffer.clear();
            let start_line = self.line;

            let next_char = match self.advance() {
                Some(c) => c,
                None => {
                    self.done = true;
                    return Some(Ok(Token::end_of_file(self.line)));
                },
            };

            match self.next_token(next_char) {
                None => continue,
                Some(Err(e)) => return Some(Err(e)),
                Some(Ok((kind, literal))) => {
                    let lexeme = self.lexeme_buffer.clone();
                    return Some(Ok(Token::new(kind, lexeme, literal, start_line)));
                },
            }
        }
    }
}

impl <'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src: src.chars().peekmore(),
            lexeme_buffer: String::new(),
            line: 1,
            done: false,
        }
    }

    /// Scans the whole source, reporting lexical errors to `diagnostics` and
    /// carrying on past them. The last token is always `EndOfFile`.
    pub fn scan_tokens(self, diagnostics: &mut Diagnostics) -> Vec<Token> {
        let mut tokens = Vec::new();
        for scanned in self {
            match scanned {
                Ok(token) => tokens.push(token),
                Err(e) => diagnostics.report(e),
            }
        }
        tokens
    }

    fn next_token(&mut self, c: char) -> Option<Result<Scanned>> {
        if let Some((second, double, single)) = compound_kinds(c) {
            let kind = if self.does_next_match(second) { double } else { single };
            return Some(Ok((kind, None)));
        }

        use TokenKind::*;
        let kind = match c {
            '(' => LeftParen,
            ')' => RightParen,
            '{' => LeftBrace,
            '}' => RightBrace,
            ',' => Comma,
            '.' => Dot,
            ';' => Semicolon,
            '-' => Minus,
            '+' => Plus,
            '^' => BitXor,
            '/' => {
                if self.does_next_match('/') {
                    self.advance_until_match('\n');
                    return None;
                }
                Slash
            },
            ' ' | '\r' | '\t' => return None,
            '\n' => {
                self.line += 1;
                return None;
            },
            '"' => return Some(self.extract_string()),
            c if c.is_ascii_digit() => return Some(self.extract_number()),
            c if can_start_identifier(&c) => return Some(Ok(self.extract_identifier())),
            c => return Some(Err(Error::unexpected_character(self.line, c))),
        };
        Some(Ok((kind, None)))
    }

    fn advance(&mut self) -> Option<char> {
        let next = self.src.next()?;
        self.lexeme_buffer.push(next);
        Some(next)
    }

    fn does_next_match(&mut self, c: char) -> bool {
        match self.src.peek() {
            Some(&next) if next == c => {
                self.advance();
                true
            },
            _ => false,
        }
    }

    fn extract_string(&mut self) -> Result<Scanned> {
        let mut newline_count = 0;
        self.advance_until_match_for_each('"', |c| if c == '\n' { newline_count += 1 });
        self.line += newline_count;
        match self.advance() {
            None => Err(Error::unterminated_string(self.line)),
            Some(_) => { // must be the closing quote
                let contents = &self.lexeme_buffer[1..self.lexeme_buffer.len() - 1];
                Ok((TokenKind::String, Some(Literal::Str(contents.to_string()))))
            },
        }
    }

    fn extract_number(&mut self) -> Result<Scanned> {
        self.advance_until(|n| !n.is_ascii_digit());

        if let Some(&'.') = self.src.peek() {
            let has_fraction = self.src.peek_nth(1).map_or(false, char::is_ascii_digit);
            if has_fraction {
                self.advance();
                self.advance_until(|n| !n.is_ascii_digit());
            }
        }

        // Digit runs with at most one interior dot always parse; overlong
        // ones saturate to infinity rather than fail.
        match self.lexeme_buffer.parse() {
            Err(_) => Err(Error::lexical(
                self.line,
                format!("Could not convert {} into a number.", self.lexeme_buffer)
            )),
            Ok(number) => Ok((TokenKind::Number, Some(Literal::Number(number)))),
        }
    }

    fn extract_identifier(&mut self) -> Scanned {
        self.advance_until(|n| !is_part_of_valid_identifier(n));

        let kind = KEYWORDS
            .get(self.lexeme_buffer.as_str())
            .copied()
            .unwrap_or(TokenKind::Identifier);
        (kind, None)
    }

    fn advance_until_match(&mut self, c: char) {
        self.advance_until(|n| n == &c)
    }

    fn advance_until(&mut self, should_stop: impl Fn(&char) -> bool) {
        self.advance_until_for_each(should_stop, |_| {})
    }

    fn advance_until_match_for_each(&mut self, c: char, f: impl FnMut(char)) {
        self.advance_until_for_each(|n| n == &c, f);
    }

    fn advance_until_for_each(
        &mut self,
        should_stop: impl Fn(&char) -> bool,
        mut f: impl FnMut(char)
    ) {
        while let Some(&next) = self.src.peek() {
            if should_stop(&next) {
                break;
            }
            self.advance();
            f(next);
        }
    }
}

/// Lookahead rule for operators that may be one or two characters long.
///
/// Returns the character that completes the long form, the long form's kind,
/// and the kind to fall back on when the next character doesn't match.
fn compound_kinds(c: char) -> Option<(char, TokenKind, TokenKind)> {
    use TokenKind::*;
    match c {
        '!' => Some(('=', BangEqual, Bang)),
        '=' => Some(('=', EqualEqual, Equal)),
        '<' => Some(('=', LessEqual, Less)),
        '>' => Some(('=', GreaterEqual, Greater)),
        '&' => Some(('&', And, BitAnd)),
        '|' => Some(('|', Or, BitOr)),
        '*' => Some(('*', Power, Star)),
        _ => None,
    }
}

fn can_start_identifier(c: &char) -> bool {
    c.is_ascii_alphabetic() || c == &'_'
}

fn is_part_of_valid_identifier(c: &char) -> bool {
    can_start_identifier(c) || c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Scanner::new(src)
            .filter_map(|t| t.ok())
            .map(|t| t.kind())
            .collect()
    }

    #[test]
    fn compound_kinds_covers_every_two_character_operator() {
        use TokenKind::*;
        let expected = [
            ('!', '=', BangEqual, Bang),
            ('=', '=', EqualEqual, Equal),
            ('<', '=', LessEqual, Less),
            ('>', '=', GreaterEqual, Greater),
            ('&', '&', And, BitAnd),
            ('|', '|', Or, BitOr),
            ('*', '*', Power, Star),
        ];
        for (lead, second, double, single) in expected.iter() {
            assert_eq!(Some((*second, *double, *single)), compound_kinds(*lead));
        }
        assert_eq!(None, compound_kinds('^'));
        assert_eq!(None, compound_kinds('/'));
    }

    #[test]
    fn does_next_match_only_consumes_on_match() {
        let mut scanner = Scanner::new("=>");
        assert!(!scanner.does_next_match('>'));
        assert!(scanner.does_next_match('='));
        assert_eq!("=", scanner.lexeme_buffer);
        assert!(scanner.does_next_match('>'));
        assert!(!scanner.does_next_match('>'));
        assert_eq!("=>", scanner.lexeme_buffer);
    }

    #[test]
    fn lone_operators_fall_back_to_single_kind() {
        use TokenKind::*;
        assert_eq!(
            vec![Bang, Equal, Less, Greater, BitAnd, BitOr, Star, BitXor, Slash, EndOfFile],
            kinds("! = < > & | * ^ /")
        );
    }

    #[test]
    fn longest_match_wins_in_runs_of_operators() {
        use TokenKind::*;
        assert_eq!(vec![EqualEqual, Equal, EndOfFile], kinds("==="));
        assert_eq!(vec![Power, Star, EndOfFile], kinds("***"));
        assert_eq!(vec![BangEqual, EqualEqual, EndOfFile], kinds("!==="));
    }

    #[test]
    fn keywords_are_whole_lexeme_and_case_sensitive() {
        use TokenKind::*;
        assert_eq!(vec![Func, Identifier, Identifier, EndOfFile], kinds("func function Func"));
        assert_eq!(vec![Var, Var, Identifier, EndOfFile], kinds("let var lets"));
        assert_eq!(vec![Identifier, EndOfFile], kinds("_while2"));
    }

    #[test]
    fn comment_runs_to_end_of_input() {
        assert_eq!(vec![TokenKind::Slash, TokenKind::EndOfFile], kinds("/ // trailing"));
    }

    #[test]
    fn overlong_number_still_scans() {
        let digits = "9".repeat(400);
        let mut scanner = Scanner::new(&digits);
        let token = scanner.next().unwrap().unwrap();
        assert_eq!(TokenKind::Number, token.kind());
        assert_eq!(Some(&Literal::Number(f64::INFINITY)), token.literal());
    }

    #[test]
    fn iterator_is_exhausted_after_end_of_file() {
        let mut scanner = Scanner::new("");
        let eof = scanner.next().unwrap().unwrap();
        assert_eq!(TokenKind::EndOfFile, eof.kind());
        assert!(scanner.next().is_none());
        assert!(scanner.next().is_none());
    }
}
