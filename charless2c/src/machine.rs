use crate::config::Config;
use crate::decoder::Program;
use crate::error::Error;
use charless_arch::Inst;
use std::io::{BufRead, Write};
use tracing::trace;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// `halt` was executed.
    Halt,
    /// Control reached the end offset.
    End,
}

/// Stack machine with the semantics of the emitted C runtime.
pub struct Machine<'a> {
    program: &'a Program,
    stack: Vec<i64>,
    memory: Vec<i64>,
    stack_size: usize,
    pc: usize,
    steps: u64,
}

impl<'a> Machine<'a> {
    pub fn new(program: &'a Program, config: &Config) -> Self {
        Machine {
            program,
            stack: Vec::new(),
            memory: vec![0; config.memory_size],
            stack_size: config.stack_size,
            pc: 0,
            steps: 0,
        }
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn stack(&self) -> &[i64] {
        &self.stack
    }

    pub fn memory(&self) -> &[i64] {
        &self.memory
    }

    /// Run to completion, reading `input` and writing `output`.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
        max_steps: Option<u64>,
    ) -> Result<Exit, Error> {
        let exit = loop {
            if self.pc >= self.program.insts.len() {
                break Exit::End;
            }
            if let Some(max) = max_steps {
                if self.steps >= max {
                    return Err(Error::StepLimit(max));
                }
            }
            self.steps += 1;
            if let Some(exit) = self.exec(input, output)? {
                break exit;
            }
        };
        output.flush()?;
        Ok(exit)
    }
}

// ----------------------------------------------------------------------------
// Stack
// ----------------------------------------------------------------------------

impl<'a> Machine<'a> {
    fn at(&self) -> usize {
        self.program.insts[self.pc].0
    }

    fn push(&mut self, val: i64) -> Result<(), Error> {
        if self.stack.len() >= self.stack_size {
            return Err(Error::StackOverflow(self.at()));
        }
        self.stack.push(val);
        Ok(())
    }

    fn pop(&mut self) -> Result<i64, Error> {
        match self.stack.pop() {
            Some(val) => Ok(val),
            None => Err(Error::StackUnderflow(self.at())),
        }
    }

    fn binary<F: Fn(i64, i64) -> i64>(&mut self, f: F) -> Result<(), Error> {
        let b = self.pop()?;
        let a = self.pop()?;
        self.push(f(a, b))
    }

    fn checked<F: Fn(i64, i64) -> i64>(&mut self, f: F) -> Result<(), Error> {
        let b = self.pop()?;
        let a = self.pop()?;
        if b == 0 {
            return Err(Error::DivisionByZero(self.at()));
        }
        self.push(f(a, b))
    }

    /// Instruction index of a jump target. The end offset maps past the last
    /// instruction.
    fn target(&self, target: usize) -> Result<usize, Error> {
        if target == self.program.len {
            return Ok(self.program.insts.len());
        }
        self.program
            .index_of(target)
            .ok_or(Error::UndefinedLabel {
                at: self.at(),
                target,
            })
    }
}

// ----------------------------------------------------------------------------
// Execute
// ----------------------------------------------------------------------------

impl<'a> Machine<'a> {
    fn exec<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<Option<Exit>, Error> {
        let program = self.program;
        let (addr, inst) = &program.insts[self.pc];
        trace!(addr, ?inst, stack = ?self.stack, "exec");
        let mut next = self.pc + 1;

        match inst {
            Inst::Halt => return Ok(Some(Exit::Halt)),
            Inst::PrintStr(text) => output.write_all(text.as_bytes())?,
            Inst::PrintNum => {
                let val = self.pop()?;
                write!(output, "{val}")?;
            }
            Inst::PrintChar => {
                let val = self.pop()?;
                output.write_all(&[val as u8])?;
            }
            Inst::InputChar => {
                let val = read_byte(input)?.map_or(-1, i64::from);
                self.push(val)?;
            }
            Inst::InputNum => {
                let val = read_number(input)?;
                self.push(val)?;
            }
            Inst::PrintNewline => output.write_all(b"\n")?,

            Inst::Push(val) => self.push(*val)?,
            Inst::Pop => {
                self.pop()?;
            }
            Inst::Store => {
                let addr = self.pop()?;
                let val = self.pop()?;
                if let Some(cell) = usize::try_from(addr)
                    .ok()
                    .and_then(|addr| self.memory.get_mut(addr))
                {
                    *cell = val;
                }
            }
            Inst::Load => {
                let addr = self.pop()?;
                let val = usize::try_from(addr)
                    .ok()
                    .and_then(|addr| self.memory.get(addr))
                    .copied()
                    .unwrap_or(0);
                self.push(val)?;
            }

            Inst::Add => self.binary(i64::wrapping_add)?,
            Inst::Sub => self.binary(i64::wrapping_sub)?,
            Inst::Mul => self.binary(i64::wrapping_mul)?,
            Inst::Div => self.checked(i64::wrapping_div)?,
            Inst::Mod => self.checked(i64::wrapping_rem)?,

            Inst::Jump(target) => next = self.target(*target)?,
            Inst::Jz(target) => {
                if self.pop()? == 0 {
                    next = self.target(*target)?;
                }
            }
            Inst::Jnz(target) => {
                if self.pop()? != 0 {
                    next = self.target(*target)?;
                }
            }

            Inst::Eq => self.binary(|a, b| i64::from(a == b))?,
            Inst::Gt => self.binary(|a, b| i64::from(a > b))?,
            Inst::Lt => self.binary(|a, b| i64::from(a < b))?,
            Inst::Gte => self.binary(|a, b| i64::from(a >= b))?,
            Inst::Lte => self.binary(|a, b| i64::from(a <= b))?,
        }

        self.pc = next;
        Ok(None)
    }
}

fn peek_byte<R: BufRead>(input: &mut R) -> std::io::Result<Option<u8>> {
    Ok(input.fill_buf()?.first().copied())
}

fn read_byte<R: BufRead>(input: &mut R) -> std::io::Result<Option<u8>> {
    let byte = peek_byte(input)?;
    if byte.is_some() {
        input.consume(1);
    }
    Ok(byte)
}

/// `scanf("%ld")`: skip whitespace, optional sign, decimal digits. Reads 0
/// when no digit follows.
fn read_number<R: BufRead>(input: &mut R) -> std::io::Result<i64> {
    while peek_byte(input)?.is_some_and(|b| b.is_ascii_whitespace()) {
        input.consume(1);
    }
    let negative = match peek_byte(input)? {
        Some(b'-') => {
            input.consume(1);
            true
        }
        Some(b'+') => {
            input.consume(1);
            false
        }
        _ => false,
    };
    let mut val: i64 = 0;
    while let Some(digit) = peek_byte(input)?.filter(u8::is_ascii_digit) {
        input.consume(1);
        val = val.wrapping_mul(10).wrapping_add(i64::from(digit - b'0'));
    }
    Ok(if negative { val.wrapping_neg() } else { val })
}
