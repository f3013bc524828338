use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumIter, EnumString};

/// Charless v3 opcode table.
///
/// The discriminant is the decimal value of the 3-digit code written on the
/// wire. Changing a value is a breaking format change.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    TryFromPrimitive,
    IntoPrimitive,
    EnumString,
    EnumIter,
    Display,
)]
#[repr(u16)]
#[strum(serialize_all = "lowercase")]
pub enum OpKind {
    Halt = 0,
    #[strum(serialize = "prints")]
    PrintStr = 10,
    #[strum(serialize = "printn")]
    PrintNum = 20,
    #[strum(serialize = "printc")]
    PrintChar = 40,
    #[strum(serialize = "inputc")]
    InputChar = 100,
    #[strum(serialize = "inputn")]
    InputNum = 101,
    #[strum(serialize = "newline")]
    PrintNewline = 210,
    Push = 500,
    Pop = 501,
    Store = 510,
    Load = 511,
    Add = 600,
    Sub = 601,
    Mul = 602,
    Div = 603,
    Mod = 604,
    Jump = 700,
    Jz = 701,
    Jnz = 702,
    Eq = 801,
    Gt = 802,
    Lt = 803,
    Gte = 804,
    Lte = 805,
}

/// Shape of the field that follows an opcode and its separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    None,
    Number,
    Target,
    Text,
}

impl OpKind {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().parse::<Self>() {
            Ok(op) => Ok(op),
            Err(_) => Err(format!("Undefined Op: {s}")),
        }
    }

    /// Zero-padded 3-digit wire code.
    pub fn code(self) -> String {
        format!("{:03}", u16::from(self))
    }

    pub fn operand(self) -> Operand {
        use OpKind::*;
        match self {
            PrintStr => Operand::Text,
            Push => Operand::Number,
            Jump | Jz | Jnz => Operand::Target,
            Halt | PrintNum | PrintChar | InputChar | InputNum | PrintNewline | Pop | Store
            | Load | Add | Sub | Mul | Div | Mod | Eq | Gt | Lt | Gte | Lte => Operand::None,
        }
    }
}
