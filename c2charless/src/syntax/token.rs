use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
}

impl Token {
    pub fn new(kind: TokenKind, pos: Pos) -> Self {
        Token { kind, pos }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Double character tokens
    EqualEqual,  // '=='
    ExclEqual,   // '!='
    RAngleEqual, // '>='
    LAngleEqual, // '<='

    // Single character tokens
    Equal,     // '='
    Plus,      // '+'
    Minus,     // '-'
    Star,      // '*'
    Slash,     // '/'
    Percent,   // '%'
    Ampasand,  // '&'
    Pipe,      // '|'
    Excl,      // '!'
    Semicolon, // ';'
    Comma,     // ','
    LParen,    // '('
    RParen,    // ')'
    LCurly,    // '{'
    RCurly,    // '}'
    LAngle,    // '<'
    RAngle,    // '>'

    // Keywords
    KwIf,     // "if"
    KwElse,   // "else"
    KwWhile,  // "while"
    KwReturn, // "return"
    KwInt,    // "int"
    KwPrintf, // "printf"
    KwScanf,  // "scanf"

    // Identifier
    Ident(String),

    // Literals
    Number(String),
    Text(String), // Raw contents between the quotes, escapes kept

    // Special
    Error(String),
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;
        let punct = match self {
            EqualEqual => "==",
            ExclEqual => "!=",
            RAngleEqual => ">=",
            LAngleEqual => "<=",
            Equal => "=",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",
            Ampasand => "&",
            Pipe => "|",
            Excl => "!",
            Semicolon => ";",
            Comma => ",",
            LParen => "(",
            RParen => ")",
            LCurly => "{",
            RCurly => "}",
            LAngle => "<",
            RAngle => ">",
            KwIf => "if",
            KwElse => "else",
            KwWhile => "while",
            KwReturn => "return",
            KwInt => "int",
            KwPrintf => "printf",
            KwScanf => "scanf",
            Ident(name) => return write!(f, "identifier `{name}`"),
            Number(lit) => return write!(f, "number `{lit}`"),
            Text(text) => return write!(f, "string \"{text}\""),
            Error(lexeme) => return write!(f, "invalid token `{lexeme}`"),
            Eof => return write!(f, "end of file"),
        };
        write!(f, "`{punct}`")
    }
}

/// Zero-based line index and byte column of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pos {
    pub line: usize,
    pub col: usize,
}
