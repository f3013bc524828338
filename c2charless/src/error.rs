use crate::syntax::token::{Token, TokenKind};
use charless_arch::EncodeError;
use color_print::ceprintln;
use std::fmt;
use thiserror::Error;

// Token information detached from the token stream
#[derive(Debug, Clone, PartialEq)]
pub struct TokenInfo {
    pub kind: TokenKind,
    pub line: usize,
    pub col: usize,
}

impl fmt::Display for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}:{}", self.kind, self.line + 1, self.col + 1)
    }
}

impl From<Token> for TokenInfo {
    fn from(token: Token) -> Self {
        TokenInfo {
            kind: token.kind,
            line: token.pos.line,
            col: token.pos.col,
        }
    }
}

impl From<&Token> for TokenInfo {
    fn from(token: &Token) -> Self {
        TokenInfo {
            kind: token.kind.clone(),
            line: token.pos.line,
            col: token.pos.col,
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    // Parse errors
    #[error("Expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: TokenInfo,
    },

    #[error("Integer literal out of range: {0}")]
    IntegerOverflow(TokenInfo),

    // Encode errors
    #[error("Cannot encode operand of {at}: {source}")]
    Operand {
        at: TokenInfo,
        #[source]
        source: EncodeError,
    },

    #[error(transparent)]
    Encode(#[from] EncodeError),

    // File errors
    #[error("Failed to open file: {0}: {1}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}: {1}")]
    FileWrite(String, #[source] std::io::Error),
}

impl Error {
    pub fn token(&self) -> Option<&TokenInfo> {
        match self {
            Error::UnexpectedToken { found, .. } => Some(found),
            Error::IntegerOverflow(info) | Error::Operand { at: info, .. } => Some(info),
            _ => None,
        }
    }

    /// Print error with diagnostic information showing file location and line content
    pub fn print_diag(&self, file: &str, source: &str) {
        ceprintln!("<red,bold>error</>: {}", self);
        if let Some(info) = self.token() {
            let line_num = info.line + 1;
            let line_content = source.lines().nth(info.line).unwrap_or("");
            ceprintln!("     <blue>--></> <underline>{}:{}:{}</>", file, line_num, info.col + 1);
            ceprintln!("      <blue>|</>");
            ceprintln!(" <blue>{:>4} |</> {}", line_num, line_content);
            ceprintln!("      <blue>|</> {}<red,bold>^</>", " ".repeat(info.col));
        }
    }
}
