//! Domain error types.

/// Top-level error type for fundscreen.
///
/// Only `Schema` and `InvalidParameter` originate in the transforms; the rest
/// come from the adapters and the config layer. Bad data rows never surface
/// here, they are recovered locally as missing values or excluded rows.
#[derive(Debug, thiserror::Error)]
pub enum ScreenerError {
    #[error("missing columns in {label} table: {missing:?} (available: {available:?})")]
    Schema {
        label: String,
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to read {path}: {reason}")]
    Source { path: String, reason: String },

    #[error("failed to write {path}: {reason}")]
    Output { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScreenerError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ScreenerError::Io(_) | ScreenerError::Source { .. } | ScreenerError::Output { .. } => 1,
            ScreenerError::ConfigParse { .. } | ScreenerError::ConfigInvalid { .. } => 2,
            ScreenerError::Schema { .. } => 3,
            ScreenerError::InvalidParameter { .. } => 4,
        }
    }
}

impl From<&ScreenerError> for std::process::ExitCode {
    fn from(err: &ScreenerError) -> Self {
        std::process::ExitCode::from(err.exit_code())
    }
}
