use charless_arch::grammar::{self, EncodeError, BRANCH_LEN};
use charless_arch::{Inst, OpKind};
use indexmap::IndexMap;
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(pub u32);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Output of code generation, consumed by [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Fully encoded charless text.
    Raw(String),
    /// Binds the label to the offset of whatever follows.
    LabelDef(Label),
    /// Branch whose target offset is not known yet.
    Jump(OpKind, Label),
}

impl Instruction {
    pub fn raw(inst: &Inst) -> Result<Self, EncodeError> {
        Ok(Instruction::Raw(grammar::encode(inst)?))
    }

    /// Length in the final text. Jumps are fixed width whatever they resolve to.
    pub fn len(&self) -> usize {
        match self {
            Instruction::Raw(text) => text.len(),
            Instruction::LabelDef(_) => 0,
            Instruction::Jump(..) => BRANCH_LEN,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// First pass: offset of every defined label.
pub fn layout(insts: &[Instruction]) -> IndexMap<Label, usize> {
    let mut labels = IndexMap::new();
    let mut offset = 0;
    for inst in insts {
        if let Instruction::LabelDef(label) = inst {
            if let Some(prev) = labels.insert(*label, offset) {
                warn!(%label, prev, offset, "label redefined");
            }
        }
        offset += inst.len();
    }
    labels
}

/// Second pass: render the final charless text. A jump to a label that was
/// never defined targets offset 0.
pub fn resolve(insts: &[Instruction]) -> Result<String, EncodeError> {
    let labels = layout(insts);
    let mut out = String::with_capacity(insts.iter().map(Instruction::len).sum());
    for inst in insts {
        match inst {
            Instruction::Raw(text) => out.push_str(text),
            Instruction::LabelDef(_) => (),
            Instruction::Jump(op, label) => {
                let target = match labels.get(label) {
                    Some(&offset) => offset,
                    None => {
                        warn!(%label, "undefined label, jumping to 0");
                        0
                    }
                };
                out.push_str(&grammar::branch(*op, target)?);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(inst: Inst) -> Instruction {
        Instruction::raw(&inst).unwrap()
    }

    #[test]
    fn label_offsets() {
        let insts = vec![
            Instruction::LabelDef(Label(1)),
            raw(Inst::Push(1)),
            Instruction::Jump(OpKind::Jz, Label(2)),
            raw(Inst::Pop),
            Instruction::LabelDef(Label(2)),
            Instruction::LabelDef(Label(3)),
        ];
        let labels = layout(&insts);
        assert_eq!(labels[&Label(1)], 0);
        assert_eq!(labels[&Label(2)], 13 + 17 + 6);
        assert_eq!(labels[&Label(3)], 13 + 17 + 6);
    }

    #[test]
    fn forward_and_backward() {
        let insts = vec![
            Instruction::LabelDef(Label(1)),
            Instruction::Jump(OpKind::Jz, Label(2)),
            Instruction::Jump(OpKind::Jump, Label(1)),
            Instruction::LabelDef(Label(2)),
        ];
        assert_eq!(
            resolve(&insts).unwrap(),
            "70120099000034200".to_string() + "70020099000000200"
        );
    }

    #[test]
    fn undefined_label_is_zero() {
        let insts = vec![raw(Inst::Pop), Instruction::Jump(OpKind::Jnz, Label(9))];
        assert_eq!(resolve(&insts).unwrap(), "501200".to_string() + "70220099000000200");
    }

    #[test]
    fn target_overflow() {
        let insts = vec![
            Instruction::Raw("0".repeat(100_000)),
            Instruction::LabelDef(Label(1)),
            Instruction::Jump(OpKind::Jump, Label(1)),
        ];
        assert_eq!(
            resolve(&insts),
            Err(EncodeError::TargetOutOfRange(100_000))
        );
    }

    #[test]
    fn label_display() {
        assert_eq!(Label(3).to_string(), "L3");
    }
}
