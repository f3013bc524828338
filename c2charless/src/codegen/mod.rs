macro_rules! check {
    ($parser:expr, $kind:pat) => {
        $parser.check_if(|token| matches!(&token.kind, $kind))
    };
}

macro_rules! expect {
    ($parser:expr, $kind:pat, $expected:expr) => {
        $parser.expect_tobe(|token| matches!(&token.kind, $kind), $expected)
    };
}

macro_rules! optional {
    ($parser:expr, $trigger:pat) => {
        $parser.consume_if(|token| matches!(&token.kind, $trigger))
    };
}

mod expr;
mod stmt;

use crate::error::Error;
use crate::link::{Instruction, Label};
use crate::symbols::Symbols;
use crate::syntax::token::{Token, TokenKind};
use charless_arch::{grammar, Inst, OpKind};
use tracing::debug;

/// Result of code generation: the unresolved instruction list and the
/// variables it allocated.
#[derive(Debug, Clone)]
pub struct Program {
    pub insts: Vec<Instruction>,
    pub symbols: Symbols,
}

/// Compilation context: token cursor, symbol table, label counter and output.
pub struct Compiler {
    tokens: Vec<Token>,
    pos: usize,
    symbols: Symbols,
    labels: u32,
    out: Vec<Instruction>,
}

impl Compiler {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|token| match &token.kind {
                TokenKind::Error(lexeme) => {
                    debug!(lexeme = %lexeme, line = token.pos.line + 1, "drop invalid token");
                    false
                }
                _ => true,
            })
            .collect();
        if !matches!(tokens.last(), Some(Token { kind: TokenKind::Eof, .. })) {
            let pos = tokens.last().map(|token| token.pos).unwrap_or_default();
            tokens.push(Token::new(TokenKind::Eof, pos));
        }
        Compiler {
            tokens,
            pos: 0,
            symbols: Symbols::new(),
            labels: 0,
            out: Vec::new(),
        }
    }

    pub fn compile(mut self) -> Result<Program, Error> {
        self.parse_program()?;
        Ok(Program {
            insts: self.out,
            symbols: self.symbols,
        })
    }
}

// ----------------------------------------------------------------------------
// Cursor
// ----------------------------------------------------------------------------

impl Compiler {
    /// Watch the n-th token ahead without consuming it. Stays on Eof.
    pub(crate) fn peek_nth(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)]
    }

    pub(crate) fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    /// Consume next token and return it. Eof is never consumed.
    pub(crate) fn next(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    /// Next token is the last one before Eof
    pub(crate) fn is_last(&self) -> bool {
        self.pos + 2 == self.tokens.len()
    }

    pub(crate) fn check_if<F: Fn(&Token) -> bool>(&self, cond: F) -> bool {
        cond(self.peek())
    }

    pub(crate) fn consume_if<F: Fn(&Token) -> bool>(&mut self, cond: F) -> Option<Token> {
        if cond(self.peek()) {
            Some(self.next())
        } else {
            None
        }
    }

    /// Next token must match, or compilation stops.
    pub(crate) fn expect_tobe<F: Fn(&Token) -> bool>(
        &mut self,
        cond: F,
        expected: &'static str,
    ) -> Result<Token, Error> {
        if cond(self.peek()) {
            Ok(self.next())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &'static str) -> Error {
        Error::UnexpectedToken {
            expected,
            found: self.peek().into(),
        }
    }

    pub(crate) fn expect_ident(&mut self) -> Result<(String, Token), Error> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                Ok((name, self.next()))
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    pub(crate) fn expect_text(&mut self) -> Result<String, Error> {
        match &self.peek().kind {
            TokenKind::Text(text) => {
                let text = text.clone();
                self.next();
                Ok(text)
            }
            _ => Err(self.unexpected("string literal")),
        }
    }

    pub(crate) fn expect_number(&mut self) -> Result<(i64, Token), Error> {
        let lit = match &self.peek().kind {
            TokenKind::Number(lit) => lit.clone(),
            _ => return Err(self.unexpected("number")),
        };
        let token = self.next();
        match lit.parse() {
            Ok(val) => Ok((val, token)),
            Err(_) => Err(Error::IntegerOverflow(token.into())),
        }
    }
}

// ----------------------------------------------------------------------------
// Emit
// ----------------------------------------------------------------------------

impl Compiler {
    pub(crate) fn new_label(&mut self) -> Label {
        self.labels += 1;
        Label(self.labels)
    }

    pub(crate) fn emit(&mut self, inst: Inst) -> Result<(), Error> {
        self.out.push(Instruction::raw(&inst)?);
        Ok(())
    }

    /// Push an operand that came from `at` in the source.
    pub(crate) fn emit_push(&mut self, val: i64, at: &Token) -> Result<(), Error> {
        let text = grammar::encode(&Inst::Push(val)).map_err(|source| Error::Operand {
            at: at.into(),
            source,
        })?;
        self.out.push(Instruction::Raw(text));
        Ok(())
    }

    pub(crate) fn emit_label(&mut self, label: Label) {
        self.out.push(Instruction::LabelDef(label));
    }

    pub(crate) fn emit_jump(&mut self, op: OpKind, label: Label) {
        self.out.push(Instruction::Jump(op, label));
    }
}
