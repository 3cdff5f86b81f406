/// Result alias that carries the custom [`TimelineError`] type.
pub type Result<T> = std::result::Result<T, TimelineError>;

/// Common error type for the core crate.
///
/// Navigation never fails: out-of-range indices are clamped and missing
/// geometry is skipped. Errors only exist at the edges where configuration,
/// item files and command scripts are loaded, or where a collaborator reports
/// a failed media command.
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    /// Free-form message for collaborator failures.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Item or configuration JSON could not be parsed.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    /// A configuration value is out of its accepted range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A scripted command could not be interpreted.
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
}

impl TimelineError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for TimelineError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for TimelineError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
