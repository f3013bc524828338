use super::Compiler;
use crate::error::Error;
use crate::syntax::token::Token;
use crate::syntax::token::TokenKind::*;
use charless_arch::{Inst, OpKind};
use tracing::debug;

impl Compiler {
    /// program = "int" "main" "(" ")" "{" { stmt } "}" | { stmt }
    pub(super) fn parse_program(&mut self) -> Result<(), Error> {
        let is_main = check!(self, KwInt)
            && matches!(&self.peek_nth(1).kind, Ident(name) if name == "main");
        if !is_main {
            while !check!(self, Eof) {
                self.parse_stmt()?;
            }
            return Ok(());
        }

        expect!(self, KwInt, "`int`")?;
        self.expect_ident()?;
        expect!(self, LParen, "`(`")?;
        expect!(self, RParen, "`)`")?;
        expect!(self, LCurly, "`{`")?;
        while !check!(self, Eof) {
            // Only the brace right before Eof closes main
            if check!(self, RCurly) && self.is_last() {
                self.next();
                break;
            }
            self.parse_stmt()?;
        }
        Ok(())
    }

    fn parse_stmt(&mut self) -> Result<(), Error> {
        match &self.peek().kind {
            KwInt => self.parse_decl(),
            KwWhile => self.parse_while(),
            KwIf => self.parse_if(),
            KwPrintf => self.parse_printf(),
            KwScanf => self.parse_scanf(),
            KwReturn => self.parse_return(),
            Ident(_) => self.parse_assign(),
            _ => {
                let token = self.next();
                debug!(token = %token.kind, line = token.pos.line + 1, "skip statement");
                Ok(())
            }
        }
    }

    /// block = "{" { stmt } "}"
    fn parse_block(&mut self) -> Result<(), Error> {
        expect!(self, LCurly, "`{`")?;
        while !check!(self, RCurly | Eof) {
            self.parse_stmt()?;
        }
        expect!(self, RCurly, "`}`")?;
        Ok(())
    }

    /// Emit the store of the value on top of the stack into `addr`.
    fn store(&mut self, addr: usize, at: &Token) -> Result<(), Error> {
        self.emit_push(addr as i64, at)?;
        self.emit(Inst::Store)
    }

    /// decl = "int" ident [ "=" expr ] ";"
    fn parse_decl(&mut self) -> Result<(), Error> {
        expect!(self, KwInt, "`int`")?;
        let (name, token) = self.expect_ident()?;
        let addr = self.symbols.address(&name);
        if optional!(self, Equal).is_some() {
            self.parse_expr()?;
            self.store(addr, &token)?;
        }
        expect!(self, Semicolon, "`;`")?;
        Ok(())
    }

    /// assign = ident [ "=" expr ] ";"
    fn parse_assign(&mut self) -> Result<(), Error> {
        let (name, token) = self.expect_ident()?;
        if optional!(self, Equal).is_some() {
            let addr = self.symbols.address(&name);
            self.parse_expr()?;
            self.store(addr, &token)?;
        }
        expect!(self, Semicolon, "`;`")?;
        Ok(())
    }

    /// while = "while" "(" expr ")" block
    fn parse_while(&mut self) -> Result<(), Error> {
        expect!(self, KwWhile, "`while`")?;
        expect!(self, LParen, "`(`")?;
        let start = self.new_label();
        let end = self.new_label();

        self.emit_label(start);
        self.parse_expr()?;
        expect!(self, RParen, "`)`")?;
        self.emit_jump(OpKind::Jz, end);

        self.parse_block()?;
        self.emit_jump(OpKind::Jump, start);
        self.emit_label(end);
        Ok(())
    }

    /// if = "if" "(" expr ")" block
    ///
    /// A following `else` is not attached; it is skipped as an unknown statement.
    fn parse_if(&mut self) -> Result<(), Error> {
        expect!(self, KwIf, "`if`")?;
        expect!(self, LParen, "`(`")?;
        self.parse_expr()?;
        expect!(self, RParen, "`)`")?;
        let otherwise = self.new_label();
        let end = self.new_label();

        self.emit_jump(OpKind::Jz, otherwise);
        self.parse_block()?;
        self.emit_jump(OpKind::Jump, end);
        self.emit_label(otherwise);
        self.emit_label(end);
        Ok(())
    }

    /// printf = "printf" "(" string [ "," expr ] ")" ";"
    fn parse_printf(&mut self) -> Result<(), Error> {
        expect!(self, KwPrintf, "`printf`")?;
        expect!(self, LParen, "`(`")?;
        let format = self.expect_text()?;
        if optional!(self, Comma).is_some() {
            self.parse_expr()?;
            if format.contains("%d") {
                self.emit(Inst::PrintNum)?;
            } else if format.contains("%c") {
                self.emit(Inst::PrintChar)?;
            } else {
                self.emit(Inst::Pop)?;
                self.emit(Inst::PrintStr(unescape(&format)))?;
            }
        } else {
            self.emit(Inst::PrintStr(unescape(&format)))?;
        }
        expect!(self, RParen, "`)`")?;
        expect!(self, Semicolon, "`;`")?;
        Ok(())
    }

    /// scanf = "scanf" "(" string "," "&" ident ")" ";"
    fn parse_scanf(&mut self) -> Result<(), Error> {
        expect!(self, KwScanf, "`scanf`")?;
        expect!(self, LParen, "`(`")?;
        let format = self.expect_text()?;
        expect!(self, Comma, "`,`")?;
        expect!(self, Ampasand, "`&`")?;
        let (name, token) = self.expect_ident()?;
        expect!(self, RParen, "`)`")?;
        expect!(self, Semicolon, "`;`")?;

        let addr = self.symbols.address(&name);
        if format.contains("%c") {
            self.emit(Inst::InputChar)?;
        } else {
            self.emit(Inst::InputNum)?;
        }
        self.store(addr, &token)
    }

    /// return = "return" number ";"
    fn parse_return(&mut self) -> Result<(), Error> {
        expect!(self, KwReturn, "`return`")?;
        self.expect_number()?;
        expect!(self, Semicolon, "`;`")?;
        self.emit(Inst::Halt)
    }
}

/// Resolve `\n`, `\t`, `\"` and `\\`. Other escapes are kept as written.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
