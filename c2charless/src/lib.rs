pub mod codegen;
pub mod error;
pub mod link;
pub mod symbols;
pub mod syntax;

pub use codegen::{Compiler, Program};
pub use error::{Error, TokenInfo};
pub use link::{resolve, Instruction, Label};
pub use symbols::Symbols;
pub use syntax::lexer::{Lexer, LineLexer};
pub use syntax::token::{Pos, Token, TokenKind};

/// Generate the unresolved instruction list for `source`.
pub fn generate(source: &str) -> Result<Program, Error> {
    let tokens = Lexer::new(source).parse();
    Compiler::new(tokens).compile()
}

/// Compile C source to charless text.
pub fn compile(source: &str) -> Result<String, Error> {
    let program = generate(source)?;
    Ok(resolve(&program.insts)?)
}
