use std::fmt;

#[derive(Debug)]
pub enum LinkError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (threshold range, empty dataset file, etc.).
    ConfigValidation(String),
    /// A configured column is absent from the CSV header.
    MissingColumn { dataset: String, column: String },
    /// A row has an empty id value.
    MissingId { dataset: String, line: u64 },
    /// IO error (file read, CSV parse, etc.).
    Io(String),
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { dataset, column } => {
                write!(f, "dataset '{dataset}': missing column '{column}'")
            }
            Self::MissingId { dataset, line } => {
                write!(f, "dataset '{dataset}', line {line}: empty id value")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for LinkError {}
