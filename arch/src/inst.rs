use crate::op::OpKind;

use color_print::cformat;

/// One decoded charless instruction. Jump targets are character offsets
/// into the charless text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inst {
    Halt,
    PrintStr(String),
    PrintNum,
    PrintChar,
    InputChar,
    InputNum,
    PrintNewline,

    Push(i64),
    Pop,
    Store,
    Load,

    Add,
    Sub,
    Mul,
    Div,
    Mod,

    Jump(usize),
    Jz(usize),
    Jnz(usize),

    Eq,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl Inst {
    pub fn op(&self) -> OpKind {
        match self {
            Inst::Halt => OpKind::Halt,
            Inst::PrintStr(_) => OpKind::PrintStr,
            Inst::PrintNum => OpKind::PrintNum,
            Inst::PrintChar => OpKind::PrintChar,
            Inst::InputChar => OpKind::InputChar,
            Inst::InputNum => OpKind::InputNum,
            Inst::PrintNewline => OpKind::PrintNewline,
            Inst::Push(_) => OpKind::Push,
            Inst::Pop => OpKind::Pop,
            Inst::Store => OpKind::Store,
            Inst::Load => OpKind::Load,
            Inst::Add => OpKind::Add,
            Inst::Sub => OpKind::Sub,
            Inst::Mul => OpKind::Mul,
            Inst::Div => OpKind::Div,
            Inst::Mod => OpKind::Mod,
            Inst::Jump(_) => OpKind::Jump,
            Inst::Jz(_) => OpKind::Jz,
            Inst::Jnz(_) => OpKind::Jnz,
            Inst::Eq => OpKind::Eq,
            Inst::Gt => OpKind::Gt,
            Inst::Lt => OpKind::Lt,
            Inst::Gte => OpKind::Gte,
            Inst::Lte => OpKind::Lte,
        }
    }

    /// Instruction for an opcode without operand.
    pub fn nullary(op: OpKind) -> Option<Inst> {
        Some(match op {
            OpKind::Halt => Inst::Halt,
            OpKind::PrintNum => Inst::PrintNum,
            OpKind::PrintChar => Inst::PrintChar,
            OpKind::InputChar => Inst::InputChar,
            OpKind::InputNum => Inst::InputNum,
            OpKind::PrintNewline => Inst::PrintNewline,
            OpKind::Pop => Inst::Pop,
            OpKind::Store => Inst::Store,
            OpKind::Load => Inst::Load,
            OpKind::Add => Inst::Add,
            OpKind::Sub => Inst::Sub,
            OpKind::Mul => Inst::Mul,
            OpKind::Div => Inst::Div,
            OpKind::Mod => Inst::Mod,
            OpKind::Eq => Inst::Eq,
            OpKind::Gt => Inst::Gt,
            OpKind::Lt => Inst::Lt,
            OpKind::Gte => Inst::Gte,
            OpKind::Lte => Inst::Lte,
            OpKind::PrintStr | OpKind::Push | OpKind::Jump | OpKind::Jz | OpKind::Jnz => {
                return None
            }
        })
    }

    pub fn branch(op: OpKind, target: usize) -> Option<Inst> {
        match op {
            OpKind::Jump => Some(Inst::Jump(target)),
            OpKind::Jz => Some(Inst::Jz(target)),
            OpKind::Jnz => Some(Inst::Jnz(target)),
            _ => None,
        }
    }

    pub fn target(&self) -> Option<usize> {
        match self {
            Inst::Jump(target) | Inst::Jz(target) | Inst::Jnz(target) => Some(*target),
            _ => None,
        }
    }
}

impl Inst {
    pub fn cformat(&self) -> String {
        let name = self.op().to_string();
        match self {
            Inst::Push(val) => cformat!("<r>{:<8}</><y>{}</>", name, val),
            Inst::Jump(target) | Inst::Jz(target) | Inst::Jnz(target) => {
                cformat!("<r>{:<8}</><b>@{:05}</>", name, target)
            }
            Inst::PrintStr(text) => cformat!("<r>{:<8}</><g>{:?}</>", name, text),
            _ => cformat!("<r>{}</>", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_op_has_an_inst() {
        for op in OpKind::iter() {
            let inst = Inst::nullary(op)
                .or_else(|| Inst::branch(op, 0))
                .unwrap_or_else(|| match op {
                    OpKind::Push => Inst::Push(0),
                    OpKind::PrintStr => Inst::PrintStr(String::new()),
                    _ => unreachable!("{op}"),
                });
            assert_eq!(inst.op(), op);
        }
    }

    #[test]
    fn targets() {
        assert_eq!(Inst::Jz(34).target(), Some(34));
        assert_eq!(Inst::Push(34).target(), None);
    }
}
