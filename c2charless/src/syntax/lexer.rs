use super::token::{Pos, Token, TokenKind};
use std::iter::Peekable;
use std::str::CharIndices;

pub struct Lexer<'a> {
    code: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(code: &'a str) -> Self {
        Self { code }
    }

    /// Tokenize the whole source. The result always ends with [`TokenKind::Eof`].
    pub fn parse(self) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut last = 0;
        for (line_idx, line) in self.code.lines().enumerate() {
            let lexer = LineLexer::new(line, line_idx);
            tokens.extend(lexer.parse());
            last = line_idx + 1;
        }
        tokens.push(Token::new(
            TokenKind::Eof,
            Pos {
                line: last,
                col: 0,
            },
        ));
        tokens
    }
}

pub struct LineLexer<'a> {
    iter: Peekable<CharIndices<'a>>,
    line: usize,
}

impl<'a> LineLexer<'a> {
    pub fn new(line: &'a str, line_idx: usize) -> Self {
        Self {
            iter: line.char_indices().peekable(),
            line: line_idx,
        }
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

impl<'a> LineLexer<'a> {
    fn peek_nth(&self, n: usize) -> Option<(usize, char)> {
        self.iter.clone().nth(n)
    }
    fn consume(&mut self) -> Option<(usize, char)> {
        self.iter.next()
    }
}

// ----------------------------------------------------------------------------
// Parser
// ----------------------------------------------------------------------------

impl<'a> LineLexer<'a> {
    pub fn parse(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some((idx, ch0)) = self.peek_nth(0) {
            // 0. Skip whitespaces
            if ch0.is_whitespace() {
                self.consume();
                continue;
            }

            // 1. Preprocessor lines are dropped up to the end of line
            if ch0 == '#' {
                break;
            }

            let pos = Pos {
                line: self.line,
                col: idx,
            };

            // 2. Double character token
            if let Some((_, ch1)) = self.peek_nth(1) {
                if let Some(kind) = double_char_token(ch0, ch1) {
                    self.consume(); // consume
                    self.consume(); // consume second char
                    tokens.push(Token::new(kind, pos));
                    continue;
                }
            }

            // 3. Single character token
            if let Some(kind) = single_char_token(ch0) {
                self.consume();
                tokens.push(Token::new(kind, pos));
                continue;
            }

            // 4. Number literal
            if ch0.is_ascii_digit() {
                tokens.push(Token::new(self.parse_number(), pos));
                continue;
            }

            // 5. String literal
            if ch0 == '"' {
                tokens.push(Token::new(self.parse_text(), pos));
                continue;
            }

            // 6. Identifier or keyword
            if ch0.is_ascii_alphabetic() || ch0 == '_' {
                tokens.push(Token::new(self.parse_string(), pos));
                continue;
            }

            // Error
            self.consume();
            tokens.push(Token::new(TokenKind::Error(format!("{ch0}")), pos));
        }
        tokens
    }

    fn parse_string(&mut self) -> TokenKind {
        let mut lexeme = String::new();
        while let Some((_, ch)) = self
            .iter
            .next_if(|(_, ch)| matches!(ch, '_' | '0'..='9' | 'a'..='z' | 'A'..='Z'))
        {
            lexeme.push(ch);
        }
        match keyword(&lexeme) {
            Some(kind) => kind,
            None => TokenKind::Ident(lexeme),
        }
    }

    // Text: "hoge\"fuga\n"
    // An unterminated quote becomes an error token and lexing resumes right after it.
    fn parse_text(&mut self) -> TokenKind {
        let mut ahead = self.iter.clone();
        ahead.next(); // opening '"'

        let mut lexeme = String::new();
        let mut escape = false;
        let mut closed = false;
        for (_, ch) in ahead.by_ref() {
            if escape {
                lexeme.push(ch);
                escape = false;
            } else {
                match ch {
                    '"' => {
                        closed = true;
                        break;
                    }
                    '\\' => {
                        lexeme.push(ch);
                        escape = true;
                    }
                    ch => lexeme.push(ch),
                }
            }
        }

        if closed {
            self.iter = ahead;
            TokenKind::Text(lexeme)
        } else {
            self.consume();
            TokenKind::Error("\"".to_string())
        }
    }

    fn parse_number(&mut self) -> TokenKind {
        let mut lexeme = String::new();
        while let Some((_, ch)) = self.iter.next_if(|(_, ch)| ch.is_ascii_digit()) {
            lexeme.push(ch);
        }
        TokenKind::Number(lexeme)
    }
}

fn double_char_token(ch0: char, ch1: char) -> Option<TokenKind> {
    match (ch0, ch1) {
        ('=', '=') => Some(TokenKind::EqualEqual),
        ('!', '=') => Some(TokenKind::ExclEqual),
        ('<', '=') => Some(TokenKind::LAngleEqual),
        ('>', '=') => Some(TokenKind::RAngleEqual),
        _ => None,
    }
}

fn single_char_token(ch: char) -> Option<TokenKind> {
    match ch {
        '=' => Some(TokenKind::Equal),
        '+' => Some(TokenKind::Plus),
        '-' => Some(TokenKind::Minus),
        '*' => Some(TokenKind::Star),
        '/' => Some(TokenKind::Slash),
        '%' => Some(TokenKind::Percent),
        '&' => Some(TokenKind::Ampasand),
        '|' => Some(TokenKind::Pipe),
        '!' => Some(TokenKind::Excl),
        ';' => Some(TokenKind::Semicolon),
        ',' => Some(TokenKind::Comma),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        '{' => Some(TokenKind::LCurly),
        '}' => Some(TokenKind::RCurly),
        '<' => Some(TokenKind::LAngle),
        '>' => Some(TokenKind::RAngle),
        _ => None,
    }
}

fn keyword(s: &str) -> Option<TokenKind> {
    match s {
        "if" => Some(TokenKind::KwIf),
        "else" => Some(TokenKind::KwElse),
        "while" => Some(TokenKind::KwWhile),
        "return" => Some(TokenKind::KwReturn),
        "int" => Some(TokenKind::KwInt),
        "printf" => Some(TokenKind::KwPrintf),
        "scanf" => Some(TokenKind::KwScanf),
        _ => None,
    }
}
