use charless_arch::{Inst, OpKind, Operand, Scanner};
use tracing::{trace, warn};

/// Decoded charless text: instructions keyed by the offset of their first
/// character, in increasing order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub insts: Vec<(usize, Inst)>,
    pub len: usize,
}

impl Program {
    pub fn get(&self, offset: usize) -> Option<&Inst> {
        self.index_of(offset).map(|idx| &self.insts[idx].1)
    }

    /// Position in `insts` of the instruction starting at `offset`.
    pub fn index_of(&self, offset: usize) -> Option<usize> {
        self.insts.binary_search_by_key(&offset, |(at, _)| *at).ok()
    }

    /// Whether `offset` is an instruction start or the end offset.
    pub fn is_label(&self, offset: usize) -> bool {
        offset == self.len || self.index_of(offset).is_some()
    }

    /// `(offset, target)` of every jump whose target is not a label.
    pub fn dangling(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.insts.iter().filter_map(|(addr, inst)| {
            inst.target()
                .filter(|&target| !self.is_label(target))
                .map(|target| (*addr, target))
        })
    }
}

/// Decode charless text. Never fails: malformed fields read as zero or
/// empty, unknown opcodes are skipped.
pub fn decode(code: &str) -> Program {
    let code = code.trim();
    let mut sc = Scanner::new(code);
    let mut insts = Vec::new();

    while !sc.is_eof() {
        let addr = sc.pos();

        // 0. Skip whitespaces and comments
        if sc.skip_whitespace() || sc.skip_comment() {
            continue;
        }

        // 1. Opcode
        let Some(value) = sc.opcode() else {
            sc.bump();
            continue;
        };
        let Ok(op) = OpKind::try_from(value) else {
            warn!(addr, opcode = value, "skip unknown opcode");
            continue;
        };
        sc.eat_separator();

        // 2. Operand
        let inst = match op.operand() {
            Operand::None => Inst::nullary(op),
            Operand::Number => Some(Inst::Push(sc.number().unwrap_or(0))),
            Operand::Target => Inst::branch(op, sc.target().unwrap_or(0)),
            Operand::Text => Some(Inst::PrintStr(sc.text())),
        };
        if let Some(inst) = inst {
            trace!(addr, ?inst, "decode");
            insts.push((addr, inst));
        }
    }

    Program {
        insts,
        len: sc.len(),
    }
}
