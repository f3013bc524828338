use super::Compiler;
use crate::error::Error;
use crate::syntax::token::TokenKind::*;
use charless_arch::Inst;

impl Compiler {
    /// expr = comparison
    pub(super) fn parse_expr(&mut self) -> Result<(), Error> {
        self.parse_comparison()
    }

    /// comparison = sum { ( "==" | "!=" | "<" | ">" | "<=" | ">=" ) sum }
    fn parse_comparison(&mut self) -> Result<(), Error> {
        self.parse_sum()?;
        while let Some(op) = optional!(
            self,
            EqualEqual | ExclEqual | LAngle | RAngle | LAngleEqual | RAngleEqual
        ) {
            self.parse_sum()?;
            match op.kind {
                EqualEqual => self.emit(Inst::Eq)?,
                // a != b  =>  (a == b) == 0
                ExclEqual => {
                    self.emit(Inst::Eq)?;
                    self.emit(Inst::Push(0))?;
                    self.emit(Inst::Eq)?;
                }
                LAngle => self.emit(Inst::Lt)?,
                RAngle => self.emit(Inst::Gt)?,
                LAngleEqual => self.emit(Inst::Lte)?,
                RAngleEqual => self.emit(Inst::Gte)?,
                _ => (),
            }
        }
        Ok(())
    }

    /// sum = term { ( "+" | "-" ) term }
    fn parse_sum(&mut self) -> Result<(), Error> {
        self.parse_term()?;
        while let Some(op) = optional!(self, Plus | Minus) {
            self.parse_term()?;
            match op.kind {
                Plus => self.emit(Inst::Add)?,
                Minus => self.emit(Inst::Sub)?,
                _ => (),
            }
        }
        Ok(())
    }

    /// term = factor { ( "*" | "/" | "%" ) factor }
    fn parse_term(&mut self) -> Result<(), Error> {
        self.parse_factor()?;
        while let Some(op) = optional!(self, Star | Slash | Percent) {
            self.parse_factor()?;
            match op.kind {
                Star => self.emit(Inst::Mul)?,
                Slash => self.emit(Inst::Div)?,
                Percent => self.emit(Inst::Mod)?,
                _ => (),
            }
        }
        Ok(())
    }

    /// factor = number | ident | "(" expr ")"
    fn parse_factor(&mut self) -> Result<(), Error> {
        match &self.peek().kind {
            Number(_) => {
                let (val, token) = self.expect_number()?;
                self.emit_push(val, &token)
            }
            Ident(_) => {
                let (name, token) = self.expect_ident()?;
                let addr = self.symbols.address(&name);
                self.emit_push(addr as i64, &token)?;
                self.emit(Inst::Load)
            }
            LParen => {
                expect!(self, LParen, "`(`")?;
                self.parse_expr()?;
                expect!(self, RParen, "`)`")?;
                Ok(())
            }
            _ => Err(self.unexpected("expression")),
        }
    }
}
