//! Hand-written lexer producing a lossless, trivia-inclusive token stream.

use crate::syntax_kind::SyntaxKind;
use crate::TextRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub range: TextRange,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range.start as usize..self.range.end as usize]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub range: TextRange,
}

/// Lex `input`, discarding error details.
pub fn lex(input: &str) -> Vec<Token> {
    lex_with_errors(input).0
}

/// Lex `input` into a token stream covering every byte of the source,
/// terminated by a zero-width `Eof` token.
pub fn lex_with_errors(input: &str) -> (Vec<Token>, Vec<LexError>) {
    let mut lexer = Lexer::new(input);
    lexer.run();
    (lexer.tokens, lexer.errors)
}

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn run(&mut self) {
        while self.pos < self.input.len() {
            let start = self.pos;
            let kind = self.next_kind();
            debug_assert!(self.pos > start, "lexer must always make progress");
            self.tokens.push(Token {
                kind,
                range: TextRange::new(start, self.pos),
            });
        }
        let end = self.input.len();
        self.tokens.push(Token {
            kind: SyntaxKind::Eof,
            range: TextRange::new(end, end),
        });
    }

    fn next_kind(&mut self) -> SyntaxKind {
        let c = self.peek().expect("next_kind called at EOF");

        if c == '\n' || c == '\r' {
            return self.newline();
        }
        if c.is_whitespace() {
            return self.whitespace();
        }
        if c == '/' {
            match self.peek_nth(1) {
                Some('/') => return self.line_comment(),
                Some('*') => return self.block_comment(),
                _ => {}
            }
        }
        if c == '@' && self.peek_nth(1).is_some_and(unicode_ident::is_xid_start) {
            // Verbatim identifier: `@if` is an identifier, never a keyword.
            self.bump();
            self.eat_identifier();
            return SyntaxKind::Identifier;
        }
        if unicode_ident::is_xid_start(c) || c == '_' {
            let start = self.pos;
            self.eat_identifier();
            let text = &self.input[start..self.pos];
            return SyntaxKind::from_keyword(text).unwrap_or(SyntaxKind::Identifier);
        }
        if c.is_ascii_digit() {
            return self.number();
        }
        if c == '"' {
            return self.string_literal();
        }
        if c == '\'' {
            return self.char_literal();
        }

        self.punctuation()
    }

    fn newline(&mut self) -> SyntaxKind {
        // `\r\n`, `\r`, and `\n` each form exactly one `Newline` token, so the
        // trivia scan in the rewrite layer sees one end-of-line per line break.
        if self.peek() == Some('\r') {
            self.bump();
            if self.peek() == Some('\n') {
                self.bump();
            }
        } else {
            self.bump();
        }
        SyntaxKind::Newline
    }

    fn whitespace(&mut self) -> SyntaxKind {
        while let Some(c) = self.peek() {
            if c == '\n' || c == '\r' || !c.is_whitespace() {
                break;
            }
            self.bump();
        }
        SyntaxKind::Whitespace
    }

    fn line_comment(&mut self) -> SyntaxKind {
        let doc = self.input[self.pos..].starts_with("///")
            && !self.input[self.pos..].starts_with("////");
        while let Some(c) = self.peek() {
            if c == '\n' || c == '\r' {
                break;
            }
            self.bump();
        }
        if doc {
            SyntaxKind::DocComment
        } else {
            SyntaxKind::LineComment
        }
    }

    fn block_comment(&mut self) -> SyntaxKind {
        let start = self.pos;
        let doc = self.input[self.pos..].starts_with("/**")
            && !self.input[self.pos..].starts_with("/**/");
        self.bump(); // /
        self.bump(); // *
        loop {
            match self.peek() {
                None => {
                    self.errors.push(LexError {
                        message: "unterminated block comment".to_string(),
                        range: TextRange::new(start, self.pos),
                    });
                    break;
                }
                Some('*') if self.peek_nth(1) == Some('/') => {
                    self.bump();
                    self.bump();
                    break;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        if doc {
            SyntaxKind::DocComment
        } else {
            SyntaxKind::BlockComment
        }
    }

    fn eat_identifier(&mut self) {
        while let Some(c) = self.peek() {
            if unicode_ident::is_xid_continue(c) || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn number(&mut self) -> SyntaxKind {
        let mut real = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '_' {
                self.bump();
            } else if c == '.' && !real && self.peek_nth(1).is_some_and(|d| d.is_ascii_digit()) {
                real = true;
                self.bump();
            } else {
                break;
            }
        }
        // Numeric suffixes (`1L`, `1.5f`, `2.0m`, `3u`, ...).
        while let Some(c) = self.peek() {
            match c {
                'l' | 'L' | 'u' | 'U' => {
                    self.bump();
                }
                'f' | 'F' | 'd' | 'D' | 'm' | 'M' => {
                    real = true;
                    self.bump();
                }
                _ => break,
            }
        }
        if real {
            SyntaxKind::RealLiteral
        } else {
            SyntaxKind::IntLiteral
        }
    }

    fn string_literal(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.bump(); // "
        loop {
            match self.peek() {
                None | Some('\n') | Some('\r') => {
                    self.errors.push(LexError {
                        message: "unterminated string literal".to_string(),
                        range: TextRange::new(start, self.pos),
                    });
                    break;
                }
                Some('\\') => {
                    self.bump();
                    if self.peek().is_some() {
                        self.bump();
                    }
                }
                Some('"') => {
                    self.bump();
                    break;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        SyntaxKind::StringLiteral
    }

    fn char_literal(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.bump(); // '
        loop {
            match self.peek() {
                None | Some('\n') | Some('\r') => {
                    self.errors.push(LexError {
                        message: "unterminated character literal".to_string(),
                        range: TextRange::new(start, self.pos),
                    });
                    break;
                }
                Some('\\') => {
                    self.bump();
                    if self.peek().is_some() {
                        self.bump();
                    }
                }
                Some('\'') => {
                    self.bump();
                    break;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        SyntaxKind::CharLiteral
    }

    fn punctuation(&mut self) -> SyntaxKind {
        let rest = &self.input[self.pos..];
        // Longest match first. `>>` is intentionally absent: like the original
        // compiler, `>` is always lexed alone so nested type arguments
        // (`List<List<int>>`) close correctly; the parser recombines adjacent
        // `>` tokens where a shift operator is meant.
        let table: &[(&str, SyntaxKind)] = &[
            ("<<=", SyntaxKind::LeftShiftEq),
            ("<<", SyntaxKind::LeftShift),
            ("<=", SyntaxKind::LessEq),
            (">=", SyntaxKind::GreaterEq),
            ("==", SyntaxKind::EqEq),
            ("!=", SyntaxKind::BangEq),
            ("&&", SyntaxKind::AmpAmp),
            ("&=", SyntaxKind::AmpEq),
            ("||", SyntaxKind::PipePipe),
            ("|=", SyntaxKind::PipeEq),
            ("^=", SyntaxKind::CaretEq),
            ("++", SyntaxKind::PlusPlus),
            ("--", SyntaxKind::MinusMinus),
            ("+=", SyntaxKind::PlusEq),
            ("-=", SyntaxKind::MinusEq),
            ("*=", SyntaxKind::StarEq),
            ("/=", SyntaxKind::SlashEq),
            ("%=", SyntaxKind::PercentEq),
            ("=>", SyntaxKind::Arrow),
            ("??", SyntaxKind::QuestionQuestion),
            ("::", SyntaxKind::DoubleColon),
            ("(", SyntaxKind::LParen),
            (")", SyntaxKind::RParen),
            ("{", SyntaxKind::LBrace),
            ("}", SyntaxKind::RBrace),
            ("[", SyntaxKind::LBracket),
            ("]", SyntaxKind::RBracket),
            (";", SyntaxKind::Semicolon),
            (",", SyntaxKind::Comma),
            (".", SyntaxKind::Dot),
            (":", SyntaxKind::Colon),
            ("?", SyntaxKind::Question),
            ("@", SyntaxKind::At),
            ("+", SyntaxKind::Plus),
            ("-", SyntaxKind::Minus),
            ("*", SyntaxKind::Star),
            ("/", SyntaxKind::Slash),
            ("%", SyntaxKind::Percent),
            ("~", SyntaxKind::Tilde),
            ("!", SyntaxKind::Bang),
            ("=", SyntaxKind::Eq),
            ("<", SyntaxKind::Less),
            (">", SyntaxKind::Greater),
            ("&", SyntaxKind::Amp),
            ("|", SyntaxKind::Pipe),
            ("^", SyntaxKind::Caret),
        ];

        for (text, kind) in table {
            if rest.starts_with(text) {
                self.pos += text.len();
                return *kind;
            }
        }

        let start = self.pos;
        self.bump();
        self.errors.push(LexError {
            message: format!("unexpected character `{}`", &self.input[start..self.pos]),
            range: TextRange::new(start, self.pos),
        });
        SyntaxKind::Error
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        lex(input)
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| *k != SyntaxKind::Eof)
            .collect()
    }

    #[test]
    fn tokens_cover_the_whole_input() {
        let input = "int x = 1; // done\n";
        let tokens = lex(input);
        let mut pos = 0u32;
        for token in &tokens {
            assert_eq!(token.range.start, pos);
            pos = token.range.end;
        }
        assert_eq!(pos as usize, input.len());
    }

    #[test]
    fn newline_is_distinct_from_whitespace() {
        assert_eq!(
            kinds("  \n\t"),
            vec![
                SyntaxKind::Whitespace,
                SyntaxKind::Newline,
                SyntaxKind::Whitespace
            ]
        );
        // CRLF forms a single end-of-line token.
        assert_eq!(kinds("\r\n"), vec![SyntaxKind::Newline]);
    }

    #[test]
    fn comment_kinds() {
        assert_eq!(kinds("// c"), vec![SyntaxKind::LineComment]);
        assert_eq!(kinds("/// d"), vec![SyntaxKind::DocComment]);
        assert_eq!(kinds("/* b */"), vec![SyntaxKind::BlockComment]);
        assert_eq!(kinds("/** b */"), vec![SyntaxKind::DocComment]);
    }

    #[test]
    fn keywords_and_contextual_keywords() {
        assert_eq!(
            kinds("class var value"),
            vec![
                SyntaxKind::ClassKw,
                SyntaxKind::Whitespace,
                SyntaxKind::VarKw,
                SyntaxKind::Whitespace,
                SyntaxKind::ValueKw
            ]
        );
        assert_eq!(kinds("@class"), vec![SyntaxKind::Identifier]);
    }

    #[test]
    fn operators_longest_match() {
        assert_eq!(
            kinds("a==b"),
            vec![SyntaxKind::Identifier, SyntaxKind::EqEq, SyntaxKind::Identifier]
        );
        assert_eq!(
            kinds("x??y"),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::QuestionQuestion,
                SyntaxKind::Identifier
            ]
        );
        // `>>` stays split so `List<List<int>>` closes both type argument lists.
        assert_eq!(kinds(">>"), vec![SyntaxKind::Greater, SyntaxKind::Greater]);
    }

    #[test]
    fn unterminated_string_is_reported() {
        let (tokens, errors) = lex_with_errors("\"abc");
        assert_eq!(tokens[0].kind, SyntaxKind::StringLiteral);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn numeric_literals() {
        assert_eq!(kinds("42"), vec![SyntaxKind::IntLiteral]);
        assert_eq!(kinds("1_000L"), vec![SyntaxKind::IntLiteral]);
        assert_eq!(kinds("3.14"), vec![SyntaxKind::RealLiteral]);
        assert_eq!(kinds("2f"), vec![SyntaxKind::RealLiteral]);
    }
}
