pub mod grammar;
pub mod inst;
pub mod op;

pub use grammar::{EncodeError, Scanner};
pub use inst::Inst;
pub use op::{OpKind, Operand};
