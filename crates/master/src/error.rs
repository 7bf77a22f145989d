use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MasterError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad threshold, empty pipeline, etc.).
    ConfigValidation(String),
    /// Batch input document could not be parsed.
    InputParse(String),
    /// Master record has no lots to reconcile.
    NoLots { record_id: String },
}

impl fmt::Display for MasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::InputParse(msg) => write!(f, "input parse error: {msg}"),
            Self::NoLots { record_id } => {
                write!(f, "master record '{record_id}': no lots to reconcile")
            }
        }
    }
}

impl std::error::Error for MasterError {}
