use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Runtime sizes shared by the generated C program and the emulator.
///
/// ```yaml
/// stack_size: 1024
/// memory_size: 1024
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub stack_size: usize,
    pub memory_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            stack_size: 1024,
            memory_size: 1024,
        }
    }
}

impl Config {
    pub fn from_yaml(text: &str) -> Result<Self, Error> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let file =
            File::open(path).map_err(|e| Error::FileOpen(path.display().to_string(), e))?;
        Ok(serde_yaml::from_reader(BufReader::new(file))?)
    }
}
