pub mod config;
pub mod decoder;
pub mod dump;
pub mod emitter;
pub mod error;
pub mod machine;

pub use config::Config;
pub use decoder::{decode, Program};
pub use dump::dump;
pub use emitter::emit;
pub use error::Error;
pub use machine::{Exit, Machine};

/// Translate charless text to C with the default runtime sizes.
pub fn transpile(code: &str) -> String {
    transpile_with(code, &Config::default())
}

pub fn transpile_with(code: &str, config: &Config) -> String {
    emit(&decode(code), config)
}
