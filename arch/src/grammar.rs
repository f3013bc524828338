//! Digit-stream grammar of charless text.
//!
//! The charless wire format has no delimiters other than the separator and
//! the numeric prefix, so a field boundary is only visible by lookahead. The
//! encoders and the [`Scanner`] below apply the same lookahead functions,
//! which keeps the label resolver and the decoder from drifting apart.

use thiserror::Error;

use crate::inst::Inst;
use crate::op::OpKind;

pub const SEPARATOR: &str = "200";
pub const NUM_PREFIX: &str = "990";
pub const LEGACY_SEPARATOR: &str = "20";
pub const LEGACY_NUM_PREFIX: &str = "99";
pub const LINE_COMMENT: &str = "90020";
pub const BLOCK_COMMENT: &str = "90120";

pub const OPCODE_WIDTH: usize = 3;
pub const TARGET_WIDTH: usize = 5;
pub const TARGET_MAX: usize = 99_999;

/// Encoded length of every branch: opcode, separator, prefix, target, separator.
pub const BRANCH_LEN: usize =
    OPCODE_WIDTH + SEPARATOR.len() + NUM_PREFIX.len() + TARGET_WIDTH + SEPARATOR.len();

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("Number `{0}` cannot be written: a charless number field cannot contain the separator `200`")]
    AmbiguousNumber(String),

    #[error("Negative operand cannot be encoded: {0}")]
    NegativeNumber(i64),

    #[error("Jump target {0} does not fit in 5 digits")]
    TargetOutOfRange(usize),

    #[error("`{0}` is not a branch")]
    NotABranch(OpKind),
}

// ----------------------------------------------------------------------------
// Lookahead
// ----------------------------------------------------------------------------

fn starts_with(bytes: &[u8], pat: &str) -> bool {
    bytes.starts_with(pat.as_bytes())
}

/// Number of digits taken as an opcode: at most three, stopping in front of
/// a separator or a numeric prefix.
pub fn opcode_len(bytes: &[u8]) -> usize {
    let mut len = 0;
    while len < OPCODE_WIDTH && bytes.get(len).is_some_and(u8::is_ascii_digit) {
        let rest = &bytes[len..];
        if starts_with(rest, SEPARATOR) || starts_with(rest, NUM_PREFIX) {
            break;
        }
        len += 1;
    }
    len
}

/// Number of digits in a numeric field: everything up to the first separator.
pub fn number_len(bytes: &[u8]) -> usize {
    let mut len = 0;
    while bytes.get(len).is_some_and(u8::is_ascii_digit) && !starts_with(&bytes[len..], SEPARATOR)
    {
        len += 1;
    }
    len
}

/// Number of digits in a jump target field. The encoder always writes
/// [`TARGET_WIDTH`] digits, so a full-width field followed by a separator is
/// taken as is; anything else falls back to [`number_len`].
pub fn target_len(bytes: &[u8]) -> usize {
    let fixed = bytes
        .get(..TARGET_WIDTH)
        .is_some_and(|digits| digits.iter().all(u8::is_ascii_digit))
        && starts_with(&bytes[TARGET_WIDTH..], SEPARATOR);
    if fixed {
        TARGET_WIDTH
    } else {
        number_len(bytes)
    }
}

fn parse_digits<T: std::str::FromStr>(digits: &[u8]) -> Option<T> {
    std::str::from_utf8(digits).ok()?.parse().ok()
}

// ----------------------------------------------------------------------------
// Encoder
// ----------------------------------------------------------------------------

/// Encode one instruction as charless text.
pub fn encode(inst: &Inst) -> Result<String, EncodeError> {
    let mut out = inst.op().code();
    out.push_str(SEPARATOR);
    match inst {
        Inst::Push(val) => out.push_str(&number_field(*val)?),
        Inst::Jump(target) | Inst::Jz(target) | Inst::Jnz(target) => {
            out.push_str(&target_field(*target)?)
        }
        Inst::PrintStr(text) => out.push_str(&text_field(text)),
        _ => (),
    }
    Ok(out)
}

/// Encode a branch of kind `op` to an already known offset.
pub fn branch(op: OpKind, target: usize) -> Result<String, EncodeError> {
    let inst = Inst::branch(op, target).ok_or(EncodeError::NotABranch(op))?;
    encode(&inst)
}

fn number_field(val: i64) -> Result<String, EncodeError> {
    if val < 0 {
        return Err(EncodeError::NegativeNumber(val));
    }
    let digits = val.to_string();
    let field = format!("{digits}{SEPARATOR}");
    if number_len(field.as_bytes()) != digits.len() {
        return Err(EncodeError::AmbiguousNumber(digits));
    }
    Ok(format!("{NUM_PREFIX}{field}"))
}

fn target_field(target: usize) -> Result<String, EncodeError> {
    if target > TARGET_MAX {
        return Err(EncodeError::TargetOutOfRange(target));
    }
    Ok(format!("{NUM_PREFIX}{target:05}{SEPARATOR}"))
}

// Each character is `<digit count of codepoint><codepoint>`.
fn text_field(text: &str) -> String {
    let mut out = String::new();
    for ch in text.chars() {
        let codepoint = u32::from(ch).to_string();
        out.push_str(&codepoint.len().to_string());
        out.push_str(&codepoint);
    }
    out.push_str(SEPARATOR);
    out
}

// ----------------------------------------------------------------------------
// Scanner
// ----------------------------------------------------------------------------

/// Forward-only cursor over charless text.
///
/// Every reader is lenient: a missing or malformed field reads as zero or as
/// an empty value and scanning continues.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.src.len()
    }

    pub fn is_empty(&self) -> bool {
        self.src.is_empty()
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn rest(&self) -> &'a [u8] {
        &self.src[self.pos..]
    }

    fn take(&mut self, len: usize) -> &'a [u8] {
        let taken = &self.src[self.pos..self.pos + len];
        self.pos += len;
        taken
    }

    pub fn first(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    pub fn bump(&mut self) -> Option<u8> {
        let b = self.first()?;
        self.pos += 1;
        Some(b)
    }

    pub fn at(&self, pat: &str) -> bool {
        starts_with(self.rest(), pat)
    }

    pub fn eat(&mut self, pat: &str) -> bool {
        if self.at(pat) {
            self.pos += pat.len();
            true
        } else {
            false
        }
    }

    pub fn eat_separator(&mut self) -> bool {
        self.eat(SEPARATOR) || self.eat(LEGACY_SEPARATOR)
    }

    fn eat_num_prefix(&mut self) -> bool {
        self.eat(NUM_PREFIX) || self.eat(LEGACY_NUM_PREFIX)
    }

    pub fn skip_whitespace(&mut self) -> bool {
        match self.first() {
            Some(b' ' | b'\t' | b'\n' | b'\r') => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    /// Skip a line comment (up to, not including, the newline) or a block
    /// comment (including its closing sentinel).
    pub fn skip_comment(&mut self) -> bool {
        if self.eat(LINE_COMMENT) {
            while self.first().is_some_and(|b| b != b'\n') {
                self.pos += 1;
            }
            return true;
        }
        if self.eat(BLOCK_COMMENT) {
            while !self.is_eof() && !self.at(BLOCK_COMMENT) {
                self.pos += 1;
            }
            self.eat(BLOCK_COMMENT);
            return true;
        }
        false
    }

    /// Read an opcode. Returns `None` without moving when no digit can start one.
    pub fn opcode(&mut self) -> Option<u16> {
        let len = opcode_len(self.rest());
        if len == 0 {
            return None;
        }
        parse_digits(self.take(len))
    }

    /// Read `990 <digits> 200`. Returns `None` without moving when the prefix
    /// is missing; an empty or oversized digit run reads as zero.
    pub fn number(&mut self) -> Option<i64> {
        if !self.eat_num_prefix() {
            return None;
        }
        let len = number_len(self.rest());
        let val = parse_digits(self.take(len)).unwrap_or(0);
        self.eat_separator();
        Some(val)
    }

    /// Read `990 <target> 200`, see [`target_len`].
    pub fn target(&mut self) -> Option<usize> {
        if !self.eat_num_prefix() {
            return None;
        }
        let len = target_len(self.rest());
        let val = parse_digits(self.take(len)).unwrap_or(0);
        self.eat_separator();
        Some(val)
    }

    /// Read a print-string payload and its closing separator.
    pub fn text(&mut self) -> String {
        let mut text = String::new();
        while !self.is_eof() && !self.at(SEPARATOR) {
            let Some(len) = self.first().filter(u8::is_ascii_digit) else {
                break;
            };
            self.pos += 1;
            let len = usize::from(len - b'0');
            if self.pos + len > self.src.len() {
                break;
            }
            let codepoint = parse_digits(self.take(len)).unwrap_or(0);
            text.push(char::from_u32(codepoint).unwrap_or(char::REPLACEMENT_CHARACTER));
        }
        self.eat_separator();
        text
    }
}
