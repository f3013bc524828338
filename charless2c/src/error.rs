use color_print::ceprintln;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Runtime errors of the emulated program
    #[error("Stack overflow at offset {0}")]
    StackOverflow(usize),

    #[error("Stack underflow at offset {0}")]
    StackUnderflow(usize),

    #[error("Division by zero at offset {0}")]
    DivisionByZero(usize),

    #[error("Jump to undefined label {target} at offset {at}")]
    UndefinedLabel { at: usize, target: usize },

    #[error("Step limit exceeded: {0}")]
    StepLimit(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Config errors
    #[error("Invalid config: {0}")]
    Config(#[from] serde_yaml::Error),

    // File errors
    #[error("Failed to open file: {0}: {1}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}: {1}")]
    FileWrite(String, #[source] std::io::Error),
}

impl Error {
    /// Offset of the instruction that failed, if the error happened at runtime.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::StackOverflow(at)
            | Error::StackUnderflow(at)
            | Error::DivisionByZero(at)
            | Error::UndefinedLabel { at, .. } => Some(*at),
            _ => None,
        }
    }

    pub fn print_diag(&self, file: &str) {
        ceprintln!("<red,bold>error</>: {}", self);
        if let Some(at) = self.offset() {
            ceprintln!("     <blue>--></> <underline>{}@{:05}</>", file, at);
        }
    }
}
